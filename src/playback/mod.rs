pub mod command;
pub mod service;

pub use command::CommandPlayback;
pub use service::{PlaybackService, PlaybackStatus};
