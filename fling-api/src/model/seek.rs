use std::fmt;

use serde::{Deserialize, Serialize};

/// How a seek delta is interpreted by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeekMode {
    /// Seek to an absolute position in ms, expected within `[0, duration)`
    Absolute,
    /// Seek by a signed offset in ms from the current position
    Relative,
}

impl SeekMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeekMode::Absolute => "Absolute",
            SeekMode::Relative => "Relative",
        }
    }
}

impl fmt::Display for SeekMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
