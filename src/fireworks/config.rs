use super::color::Color;
use super::particle::DEFAULT_TRAIL_CAPACITY;
use super::random::RandomSource;

/// Sampling range: inclusive `min`, exclusive `max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span<T> {
    pub min: T,
    pub max: T,
}

impl<T> Span<T> {
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl Span<f32> {
    pub fn sample(&self, rng: &mut impl RandomSource) -> f32 {
        rng.range(self.min, self.max)
    }

    pub fn scaled(&self, factor: f32) -> Span<f32> {
        Span::new(self.min * factor, self.max * factor)
    }
}

impl Span<usize> {
    pub fn sample(&self, rng: &mut impl RandomSource) -> usize {
        rng.range_usize(self.min, self.max)
    }
}

/// What a rocket does when it bursts. Copied into every rocket at launch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurstProfile {
    /// Scatter force, multiplied by the display scale.
    pub force: Span<f32>,
    /// Number of burst particles.
    pub count: Span<usize>,
    /// Color every burst particle fades toward.
    pub ember: Color,
    /// Fade progress gained per millisecond.
    pub fade_rate: f32,
}

impl Default for BurstProfile {
    fn default() -> Self {
        Self {
            force: Span::new(0.000_06, 0.000_15),
            count: Span::new(16, 64),
            ember: Color::new(28.0, 28.0, 28.0),
            fade_rate: 0.000_04,
        }
    }
}

/// Tuning for the whole display. Times are milliseconds, velocities are
/// display units per millisecond before display scaling.
#[derive(Debug, Clone, PartialEq)]
pub struct FireworksConfig {
    /// Downward acceleration, multiplied by display height.
    pub gravity: f32,
    /// Launch dx, multiplied by display width.
    pub rocket_horizontal_velocity: Span<f32>,
    /// Launch speed upward, multiplied by display height.
    pub rocket_vertical_velocity: Span<f32>,
    pub rocket_ttl: Span<f32>,
    /// A rocket bursts once its dy rises above a threshold drawn from here.
    pub rocket_burst_velocity: Span<f32>,
    pub rocket_size: Span<f32>,
    /// Fraction of the display width rockets launch from.
    pub launch_zone: Span<f32>,
    pub starting_rockets: Span<usize>,
    pub rocket_colors: Vec<Color>,
    /// Palette multi-color bursts draw from.
    pub burst_palette: Vec<Color>,
    /// How many palette colors a multi-color burst uses.
    pub burst_colors: Span<usize>,
    /// Chance a burst reuses the rocket's own color only.
    pub single_color_burst_probability: f32,
    /// Per-tick chance of launching a new rocket.
    pub new_rocket_probability: f32,
    pub trail_capacity: usize,
    /// Surface size is its bounds divided by this.
    pub resolution_scale: f32,
    pub burst: BurstProfile,
}

impl Default for FireworksConfig {
    fn default() -> Self {
        Self {
            gravity: 0.000_000_1,
            rocket_horizontal_velocity: Span::new(-0.000_05, 0.000_05),
            rocket_vertical_velocity: Span::new(0.000_3, 0.000_45),
            rocket_ttl: Span::new(2_000.0, 4_000.0),
            rocket_burst_velocity: Span::new(-0.000_1, 0.01),
            rocket_size: Span::new(1.25, 2.4),
            launch_zone: Span::new(0.2, 0.8),
            starting_rockets: Span::new(1, 5),
            rocket_colors: vec![
                Color::WHITE,
                Color::new(255.0, 211.0, 51.0),
                Color::new(255.0, 173.0, 76.0),
                Color::new(180.0, 180.0, 180.0),
            ],
            burst_palette: vec![
                Color::WHITE,
                Color::new(223.0, 0.0, 0.0),
                Color::new(0.0, 200.0, 0.0),
                Color::new(93.0, 42.0, 255.0),
                Color::new(255.0, 211.0, 51.0),
                Color::new(255.0, 173.0, 76.0),
                Color::new(180.0, 180.0, 180.0),
            ],
            burst_colors: Span::new(2, 4),
            single_color_burst_probability: 0.4,
            new_rocket_probability: 0.05,
            trail_capacity: DEFAULT_TRAIL_CAPACITY,
            resolution_scale: 1.0,
            burst: BurstProfile::default(),
        }
    }
}
