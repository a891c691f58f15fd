use std::fmt;

/// Failures the draw core surfaces to its caller. An empty day selection is
/// deliberately absent: zero qualifying entries is a valid terminal state
/// that leaves the wheel inert, not a failure.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DrawError {
    /// The leaderboard payload does not have the expected shape.
    InvalidData(String),
    /// Winner resolution was requested against an empty entry pool.
    ResolveOnEmpty,
    /// A spin was requested while another spin is still running.
    SpinAlreadyActive,
}

impl fmt::Display for DrawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawError::InvalidData(detail) => {
                write!(f, "invalid leaderboard data: {detail}")
            }
            DrawError::ResolveOnEmpty => {
                write!(f, "cannot resolve a winner from an empty entry pool")
            }
            DrawError::SpinAlreadyActive => write!(f, "a spin is already in progress"),
        }
    }
}

impl std::error::Error for DrawError {}

pub type Result<T> = std::result::Result<T, DrawError>;
