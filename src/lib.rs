//! Terminal fireworks: a particle simulation of rockets that climb, crest and
//! burst into fading embers, drawn with half-block cells.

pub mod clock;
pub mod error;
pub mod fireworks;
pub mod surface;

pub use error::{Error, Result};
pub use fireworks::{Color, Fireworks, FireworksConfig};
