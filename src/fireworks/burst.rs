use super::color::Color;

/// Fade of a burst particle from its launch color toward the ember color.
#[derive(Debug, Clone)]
pub struct Fade {
    start: Color,
    ember: Color,
    progress: f32,
    rate: f32,
}

impl Fade {
    pub fn new(start: Color, ember: Color, rate: f32) -> Self {
        Self {
            start,
            ember,
            progress: 0.0,
            rate,
        }
    }

    /// Progress in `[0, 1]`, never decreasing.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Moves the fade forward by `dt` milliseconds and returns the new color.
    pub fn advance(&mut self, dt: f32) -> Color {
        self.progress = (self.progress + self.rate * dt.max(0.0)).min(1.0);
        self.start.lerp(&self.ember, self.progress)
    }
}
