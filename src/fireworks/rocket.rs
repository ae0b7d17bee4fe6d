use tracing::debug;

use super::burst::Fade;
use super::color::Color;
use super::config::BurstProfile;
use super::particle::{Particle, ParticleKind, Vec2};
use super::random::RandomSource;

/// Ascent state of a rocket particle.
#[derive(Debug, Clone)]
pub struct Rocket {
    life: f32,
    max_ttl: f32,
    /// Bursts once dy rises above this.
    burst_velocity: f32,
    armed: bool,
    has_burst: bool,
    profile: BurstProfile,
    burst_colors: Vec<Color>,
    /// Reference length the burst force is scaled by.
    display_scale: f32,
}

impl Rocket {
    pub fn new(
        max_ttl: f32,
        burst_velocity: f32,
        profile: BurstProfile,
        burst_colors: Vec<Color>,
        display_scale: f32,
    ) -> Self {
        Self {
            life: 0.0,
            max_ttl,
            burst_velocity,
            armed: false,
            has_burst: false,
            profile,
            burst_colors,
            display_scale,
        }
    }

    /// Lets the rocket burst. An unarmed rocket only flies.
    pub fn arm(mut self) -> Self {
        self.armed = true;
        self
    }

    pub fn life(&self) -> f32 {
        self.life
    }

    pub fn has_burst(&self) -> bool {
        self.has_burst
    }

    pub fn burst_colors(&self) -> &[Color] {
        &self.burst_colors
    }

    pub(super) fn age(&mut self, dt: f32) {
        self.life += dt;
    }

    /// Crested or timed out, whichever is seen first. Either suffices.
    pub(super) fn should_burst(&self, dy: f32) -> bool {
        !self.has_burst && self.armed && (dy > self.burst_velocity || self.life > self.max_ttl)
    }

    /// Marks the rocket as burst and scatters its payload from `position`.
    pub(super) fn detonate(
        &mut self,
        position: Vec2,
        velocity: Vec2,
        size: f32,
        trail_capacity: usize,
        rng: &mut impl RandomSource,
    ) -> Vec<Particle> {
        self.has_burst = true;

        let force = self.profile.force.sample(rng) * self.display_scale;
        let count = self.profile.count.sample(rng);
        debug!(
            x = position.x,
            y = position.y,
            count,
            force,
            life = self.life,
            "rocket burst"
        );

        (0..count)
            .map(|_| {
                let color = rng
                    .pick(&self.burst_colors)
                    .copied()
                    .unwrap_or(self.profile.ember);
                let mut particle = Particle::new(
                    position,
                    velocity,
                    color,
                    trail_capacity,
                    ParticleKind::Burst(Fade::new(
                        color,
                        self.profile.ember,
                        self.profile.fade_rate,
                    )),
                )
                .with_size(size);
                particle.velocity.x += force * (rng.unit() - 0.5);
                particle.velocity.y += force * (rng.unit() - 0.5);
                particle
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fireworks::config::Span;
    use crate::fireworks::particle::ParticleState;
    use crate::fireworks::random::Scripted;
    use proptest::prelude::*;

    fn profile() -> BurstProfile {
        BurstProfile::default()
    }

    fn launch(rocket: Rocket, dy: f32) -> Particle {
        Particle::new(
            Vec2::new(100.0, 500.0),
            Vec2::new(0.0, dy),
            Color::WHITE,
            32,
            ParticleKind::Rocket(rocket),
        )
    }

    fn count_bursts(
        particle: &mut Particle,
        rng: &mut impl RandomSource,
        dt: f32,
        ticks: usize,
    ) -> usize {
        let mut bursts = 0;
        for _ in 0..ticks {
            if particle.update(dt, rng).is_some() {
                bursts += 1;
                particle.deactivate();
            }
        }
        bursts
    }

    #[test]
    fn times_out_when_it_never_crests() {
        let rocket = Rocket::new(3_000.0, 0.0, profile(), vec![Color::WHITE], 300.0).arm();
        let mut particle = launch(rocket, -0.000_4);
        let mut rng = fastrand::Rng::with_seed(7);

        let mut bursts = 0;
        while particle.as_rocket().unwrap().life() <= 3_000.0 {
            assert_eq!(bursts, 0);
            if particle.update(16.0, &mut rng).is_some() {
                bursts += 1;
                particle.deactivate();
            }
        }
        assert_eq!(bursts, 1);
        assert!(particle.as_rocket().unwrap().has_burst());

        bursts += count_bursts(&mut particle, &mut rng, 16.0, 200);
        assert_eq!(bursts, 1);
        assert!(particle.as_rocket().unwrap().has_burst());
    }

    #[test]
    fn bursts_when_it_crests() {
        let rocket = Rocket::new(3_000.0, -0.000_1, profile(), vec![Color::WHITE], 300.0).arm();
        let mut particle = launch(rocket, 0.0);
        let mut rng = fastrand::Rng::with_seed(3);

        let batch = particle.update(16.0, &mut rng).expect("crested rocket bursts");
        assert!(!batch.is_empty());
        assert!(particle.as_rocket().unwrap().life() < 3_000.0);
    }

    #[test]
    fn unarmed_rocket_never_bursts() {
        let rocket = Rocket::new(10.0, -1.0, profile(), vec![Color::WHITE], 300.0);
        let mut particle = launch(rocket, 0.0);
        let mut rng = fastrand::Rng::with_seed(1);
        assert_eq!(count_bursts(&mut particle, &mut rng, 16.0, 50), 0);
        assert!(!particle.as_rocket().unwrap().has_burst());
    }

    #[test]
    fn burst_particles_start_at_rocket_and_scatter() {
        let red = Color::new(223.0, 0.0, 0.0);
        let green = Color::new(0.0, 200.0, 0.0);
        let profile = BurstProfile {
            force: Span::new(1.0, 1.0),
            count: Span::new(2, 3),
            ..BurstProfile::default()
        };
        let mut rocket = Rocket::new(1_000.0, 0.0, profile, vec![red, green], 10.0).arm();

        // force, count, then per particle: color, dx jitter, dy jitter
        let mut rng = Scripted::new(&[0.0, 0.0, 0.9, 1.0 - 1e-6, 0.5, 0.1, 0.0, 0.75]);
        let batch = rocket.detonate(Vec2::new(4.0, 5.0), Vec2::new(0.5, -0.5), 1.5, 8, &mut rng);

        assert_eq!(batch.len(), 2);
        assert!(rocket.has_burst());

        let first = &batch[0];
        assert_eq!(first.position, Vec2::new(4.0, 5.0));
        assert_eq!(first.color, green);
        assert_eq!(first.size, 1.5);
        assert_eq!(first.trail().capacity(), 8);
        assert_eq!(first.state(), ParticleState::Active);
        assert!((first.velocity.x - 5.5).abs() < 1e-3);
        assert!((first.velocity.y + 0.5).abs() < 1e-6);

        let second = &batch[1];
        assert_eq!(second.color, red);
        assert!((second.velocity.x - (0.5 - 5.0)).abs() < 1e-6);
        assert!((second.velocity.y - 2.0).abs() < 1e-6);
    }

    #[test]
    fn burst_colors_are_copies() {
        let mut rocket = Rocket::new(1_000.0, 0.0, profile(), vec![Color::WHITE], 10.0).arm();
        let mut rng = fastrand::Rng::with_seed(11);
        let mut batch = rocket.detonate(Vec2::default(), Vec2::default(), 2.0, 4, &mut rng);
        batch[0].color.red = 0.0;
        assert_eq!(rocket.burst_colors()[0], Color::WHITE);
        assert_eq!(batch[1].color, Color::WHITE);
    }

    proptest! {
        #[test]
        fn burst_count_stays_in_range(seed in any::<u64>(), min in 1usize..40, extra in 1usize..40) {
            let profile = BurstProfile {
                count: Span::new(min, min + extra),
                ..BurstProfile::default()
            };
            let mut rocket = Rocket::new(1_000.0, 0.0, profile, vec![Color::WHITE], 100.0).arm();
            let mut rng = fastrand::Rng::with_seed(seed);
            let batch = rocket.detonate(Vec2::default(), Vec2::default(), 2.0, 32, &mut rng);
            prop_assert!(batch.len() >= min && batch.len() < min + extra);
        }
    }
}
