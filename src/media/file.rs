//! Media already hosted on a homeserver.

use crate::matrix::payload::{ThumbnailDetails, ThumbnailInfo};

/// Fully described, already uploaded media.
///
/// Used to post media whose content URI is known without uploading it again.
///
/// # Examples
///
/// ```
/// use mxpost::File;
///
/// let video = File::new("mxc://example.org/abc", "clip.mp4", 1024, 640, 480, 3000, "video/mp4", None);
/// let thumb = File::thumbnail("mxc://example.org/def", 320, 240, 128, "image/jpeg");
///
/// assert_eq!(video.duration(), 3000);
/// assert_eq!(thumb.file_name(), "");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    uri: String,
    file_name: String,
    file_size: u64,
    width: u32,
    height: u32,
    /// Duration in milliseconds, 0 for still media.
    duration: u64,
    mime: String,
    blur_hash: Option<String>,
}

impl File {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        uri: &str,
        file_name: &str,
        file_size: u64,
        width: u32,
        height: u32,
        duration: u64,
        mime: &str,
        blur_hash: Option<&str>,
    ) -> Self {
        File {
            uri: uri.to_owned(),
            file_name: file_name.to_owned(),
            file_size,
            width,
            height,
            duration,
            mime: mime.to_owned(),
            blur_hash: blur_hash.map(str::to_owned),
        }
    }

    /// Creates a thumbnail reference: no file name and no duration.
    pub fn thumbnail(uri: &str, width: u32, height: u32, file_size: u64, mime: &str) -> Self {
        File::new(uri, "", file_size, width, height, 0, mime, None)
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn blur_hash(&self) -> Option<&str> {
        self.blur_hash.as_deref()
    }

    /// Thumbnail fields merged into the `info` block of the media it illustrates.
    pub fn thumbnail_info(&self) -> ThumbnailInfo {
        ThumbnailInfo {
            thumbnail_info: ThumbnailDetails {
                mimetype: self.mime.clone(),
                w: self.width,
                h: self.height,
                size: self.file_size,
            },
            thumbnail_url: self.uri.clone(),
        }
    }
}
