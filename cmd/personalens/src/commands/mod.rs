//! CLI commands module.

mod audio;
mod text;
mod util;
mod video;

pub use audio::AudioCommand;
pub use text::{ClustersCommand, DriftCommand, ReasonsCommand, SignalsCommand, TimelineCommand};
pub use video::VideoCommand;

pub(crate) use util::*;
