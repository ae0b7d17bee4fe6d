use std::collections::VecDeque;

use super::burst::Fade;
use super::color::Color;
use super::random::RandomSource;
use super::rocket::Rocket;
use crate::surface::Surface;

pub const DEFAULT_TRAIL_CAPACITY: usize = 32;
pub const DEFAULT_SIZE: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Lifecycle of a particle. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ParticleState {
    /// Moving, trail growing.
    Active,
    /// Frozen in place while the trail drains.
    Deactivating,
    /// Nothing left to draw.
    Inactive,
}

/// Past positions, oldest first, never longer than its capacity.
#[derive(Debug, Clone)]
pub struct Trail {
    points: VecDeque<Vec2>,
    capacity: usize,
}

impl Trail {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn push(&mut self, point: Vec2) {
        self.points.push_back(point);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn pop_oldest(&mut self) -> Option<Vec2> {
        self.points.pop_front()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vec2> {
        self.points.iter()
    }
}

#[derive(Debug, Clone)]
pub enum ParticleKind {
    Rocket(Rocket),
    Burst(Fade),
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Vec2,
    /// Displacement per millisecond.
    pub velocity: Vec2,
    pub color: Color,
    pub size: f32,
    trail: Trail,
    state: ParticleState,
    kind: ParticleKind,
}

impl Particle {
    pub fn new(
        position: Vec2,
        velocity: Vec2,
        color: Color,
        trail_capacity: usize,
        kind: ParticleKind,
    ) -> Self {
        Self {
            position,
            velocity,
            color,
            size: DEFAULT_SIZE,
            trail: Trail::new(trail_capacity),
            state: ParticleState::Active,
            kind,
        }
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn state(&self) -> ParticleState {
        self.state
    }

    pub fn is_inactive(&self) -> bool {
        self.state == ParticleState::Inactive
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub fn kind(&self) -> &ParticleKind {
        &self.kind
    }

    pub fn as_rocket(&self) -> Option<&Rocket> {
        match &self.kind {
            ParticleKind::Rocket(rocket) => Some(rocket),
            ParticleKind::Burst(_) => None,
        }
    }

    /// Stops motion and starts draining the trail. No-op once inactive.
    pub fn deactivate(&mut self) {
        if self.state == ParticleState::Active {
            self.state = ParticleState::Deactivating;
        }
    }

    /// Advances one tick of `dt` milliseconds.
    ///
    /// Returns the burst batch when a rocket detonates during this tick. The
    /// caller owns both the batch and the rocket's deactivation.
    pub fn update(&mut self, dt: f32, rng: &mut impl RandomSource) -> Option<Vec<Particle>> {
        self.advance(dt);

        match &mut self.kind {
            ParticleKind::Rocket(rocket) => {
                rocket.age(dt);
                if rocket.should_burst(self.velocity.y) {
                    Some(rocket.detonate(
                        self.position,
                        self.velocity,
                        self.size,
                        self.trail.capacity(),
                        rng,
                    ))
                } else {
                    None
                }
            }
            ParticleKind::Burst(fade) => {
                if self.state != ParticleState::Inactive {
                    self.color = fade.advance(dt);
                }
                None
            }
        }
    }

    fn advance(&mut self, dt: f32) {
        match self.state {
            ParticleState::Active => {
                self.trail.push(self.position);
                self.position.x += self.velocity.x * dt;
                self.position.y += self.velocity.y * dt;
            }
            ParticleState::Deactivating => {
                self.trail.pop_oldest();
                if self.trail.is_empty() {
                    self.state = ParticleState::Inactive;
                }
            }
            ParticleState::Inactive => {}
        }
    }

    /// Draws the trail, newest entries most opaque while active, then the head.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.set_fill_color(&self.color);

        let capacity = self.trail.capacity().max(1) as f32;
        let len = self.trail.len() as f32;
        for (i, point) in self.trail.iter().enumerate() {
            let alpha = match self.state {
                ParticleState::Active => (capacity - len + i as f32) / capacity,
                _ => i as f32 / capacity,
            };
            surface.set_global_alpha(alpha);
            surface.fill_rect(point.x, point.y, self.size, self.size);
        }

        surface.set_global_alpha(1.0);
        if self.state == ParticleState::Active {
            surface.fill_rect(self.position.x, self.position.y, self.size, self.size);
        }
    }
}
