//! Fireworks particle simulation.
//!
//! Rockets launch from the bottom of the display, climb against gravity and
//! burst into colored particles that scatter, fall and fade toward an ember
//! color. [`Fireworks`] owns every live particle and is advanced one frame at
//! a time by a [`FrameScheduler`].

mod burst;
mod color;
mod config;
mod particle;
mod random;
mod rocket;

pub use burst::Fade;
pub use color::Color;
pub use config::{BurstProfile, FireworksConfig, Span};
pub use particle::{Particle, ParticleKind, ParticleState, Trail, Vec2};
pub use random::RandomSource;
pub use rocket::Rocket;

use tracing::{debug, info, trace};

use crate::clock::{FrameHandle, FrameScheduler};
use crate::surface::Surface;

pub struct Fireworks<S: Surface, R: RandomSource = fastrand::Rng> {
    surface: S,
    config: FireworksConfig,
    rng: R,
    particles: Vec<Particle>,
    last_timestamp: f64,
    frame_request: Option<FrameHandle>,
}

impl<S: Surface, R: RandomSource> Fireworks<S, R> {
    pub fn new(surface: S, config: FireworksConfig, rng: R) -> Self {
        let mut fireworks = Self {
            surface,
            config,
            rng,
            particles: Vec::new(),
            last_timestamp: 0.0,
            frame_request: None,
        };
        fireworks.fit_surface();
        fireworks
    }

    pub fn config(&self) -> &FireworksConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Live particles in draw order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn is_running(&self) -> bool {
        self.frame_request.is_some()
    }

    /// Launches the opening salvo and starts requesting frames. No-op while
    /// already running.
    pub fn run(&mut self, scheduler: &mut impl FrameScheduler) {
        if self.is_running() {
            return;
        }

        let salvo = self.config.starting_rockets.sample(&mut self.rng);
        for _ in 0..salvo {
            self.launch_rocket();
        }
        info!(rockets = salvo, "fireworks started");

        self.last_timestamp = scheduler.now();
        self.frame_request = Some(scheduler.request_frame());
    }

    /// Stops requesting frames. No-op while stopped.
    pub fn stop(&mut self, scheduler: &mut impl FrameScheduler) {
        if let Some(handle) = self.frame_request.take() {
            scheduler.cancel_frame(handle);
            info!(particles = self.particles.len(), "fireworks stopped");
        }
    }

    /// Drops every particle and refits the surface to its current bounds.
    pub fn reset(&mut self) {
        self.particles.clear();
        self.fit_surface();
    }

    /// One scheduled frame: step the simulation to `timestamp`, draw it and
    /// ask for the next frame.
    pub fn frame(&mut self, scheduler: &mut impl FrameScheduler, timestamp: f64) {
        if !self.is_running() {
            return;
        }

        let dt = (timestamp - self.last_timestamp).max(0.0) as f32;
        self.last_timestamp = timestamp;

        self.update(dt);
        self.render();

        self.frame_request = Some(scheduler.request_frame());
    }

    /// Advances every particle by `dt` milliseconds, launches at most one
    /// rocket and prunes what is gone.
    pub fn update(&mut self, dt: f32) {
        let height = self.surface.height();
        let gravity = self.config.gravity * height * dt;

        let mut bursts = Vec::new();
        for particle in &mut self.particles {
            particle.velocity.y += gravity;
            if let Some(batch) = particle.update(dt, &mut self.rng) {
                particle.deactivate();
                bursts.extend(batch);
            }
        }
        self.particles.append(&mut bursts);

        if self.rng.chance(self.config.new_rocket_probability) {
            self.launch_rocket();
        }

        let before = self.particles.len();
        self.particles
            .retain(|particle| particle.position.y <= height && !particle.is_inactive());
        trace!(
            dt,
            live = self.particles.len(),
            pruned = before - self.particles.len(),
            "update"
        );
    }

    pub fn render(&mut self) {
        let (width, height) = (self.surface.width(), self.surface.height());
        self.surface.clear_rect(0.0, 0.0, width, height);
        for particle in &self.particles {
            particle.render(&mut self.surface);
        }
    }

    pub fn launch_rocket(&mut self) {
        let rocket = self.create_rocket();
        self.particles.push(rocket);
    }

    fn create_rocket(&mut self) -> Particle {
        let config = &self.config;
        let rng = &mut self.rng;
        let (width, height) = (self.surface.width(), self.surface.height());

        let x = config.launch_zone.scaled(width).sample(rng);
        let color = rng
            .pick(&config.rocket_colors)
            .copied()
            .unwrap_or(Color::WHITE);
        let burst_colors = if rng.chance(config.single_color_burst_probability) {
            vec![color]
        } else {
            let count = config.burst_colors.sample(rng);
            (0..count)
                .filter_map(|_| rng.pick(&config.burst_palette).copied())
                .collect()
        };
        let velocity = Vec2::new(
            config.rocket_horizontal_velocity.scaled(width).sample(rng),
            -config.rocket_vertical_velocity.scaled(height).sample(rng),
        );
        let ttl = config.rocket_ttl.sample(rng);
        let burst_velocity = config.rocket_burst_velocity.sample(rng);
        let size = config.rocket_size.sample(rng);

        debug!(
            x,
            dx = velocity.x,
            dy = velocity.y,
            ttl,
            color = %color,
            burst_colors = burst_colors.len(),
            "rocket launched"
        );

        let rocket = Rocket::new(
            ttl,
            burst_velocity,
            config.burst,
            burst_colors,
            (width + height) / 2.0,
        )
        .arm();

        Particle::new(
            Vec2::new(x, height),
            velocity,
            color,
            config.trail_capacity,
            ParticleKind::Rocket(rocket),
        )
        .with_size(size)
    }

    fn fit_surface(&mut self) {
        let (bounds_width, bounds_height) = self.surface.bounds();
        let scale = self.config.resolution_scale;
        self.surface
            .set_size(bounds_width / scale, bounds_height / scale);
        info!(
            width = self.surface.width(),
            height = self.surface.height(),
            "display sized"
        );
    }
}
