//! Media descriptors and local media inspection.
//!
//! - [`File`] - media already uploaded to a homeserver
//! - [`Thumbnail`] - local thumbnail image paired with its uploaded URL
//! - [`VideoData`], [`VideoProbe`] - video dimensions and duration
//! - [`PathExt`] - MIME type and base name of a local path

mod file;
mod path_ext;
mod thumbnail;
mod video;

pub use crate::media::file::File;
pub use crate::media::path_ext::PathExt;
pub use crate::media::thumbnail::Thumbnail;
#[cfg(test)]
pub use crate::media::video::MockVideoProbe;
pub use crate::media::video::{FfprobeVideoProbe, NoVideoProbe, ProbeError, VideoData, VideoProbe};
