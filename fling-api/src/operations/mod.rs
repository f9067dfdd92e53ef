//! One operation per remote player method, grouped by concern.

pub mod audio;
pub mod listener;
pub mod playback;
pub mod query;

pub use audio::*;
pub use listener::*;
pub use playback::*;
pub use query::*;
