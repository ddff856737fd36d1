mod aac;
mod audio;
mod demuxer;
mod muxer;
mod tag;

pub use aac::*;
pub use audio::*;
pub use demuxer::*;
pub use muxer::*;
pub use tag::*;
