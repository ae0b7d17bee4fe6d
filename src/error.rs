use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The terminal could not be queried for a drawing area.
    #[error("could not acquire the terminal drawing surface: {0}")]
    SurfaceUnavailable(#[source] io::Error),
    #[error("terminal reports an empty drawing area ({cols}x{rows})")]
    EmptySurface { cols: u16, rows: u16 },
    #[error("invalid hex color '{0}', expected RRGGBB (e.g. 1a1b26)")]
    InvalidColor(String),
    #[error("could not open log file {}: {source}", .path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}
