pub mod backend;
pub mod convert;
pub mod file;
pub mod silence;
mod tap;

pub use backend::{AudioFrame, CaptureDevice, CaptureDeviceFactory, CaptureSource, TapConfig};
pub use file::{AudioFile, FileCaptureDevice};
pub use silence::SilenceCaptureDevice;
