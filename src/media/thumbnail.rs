//! Thumbnail of a local image paired with its uploaded URL.

use std::path::{Path, PathBuf};

use image::io::Reader;
use log::debug;

use crate::error::MatrixError;
use crate::matrix::payload::{ThumbnailDetails, ThumbnailInfo};

/// A local image that has already been uploaded as a thumbnail.
///
/// The file is only read by [`Thumbnail::to_payload`], so a file changed between
/// construction and serialization is described as it is at serialization time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    filepath: PathBuf,
    uploaded_file_url: String,
}

impl Thumbnail {
    pub fn new(filepath: impl Into<PathBuf>, uploaded_file_url: &str) -> Self {
        Thumbnail {
            filepath: filepath.into(),
            uploaded_file_url: uploaded_file_url.to_owned(),
        }
    }

    pub fn filepath(&self) -> &Path {
        &self.filepath
    }

    pub fn uploaded_file_url(&self) -> &str {
        &self.uploaded_file_url
    }

    /// Reads the image and describes it as `thumbnail_info` + `thumbnail_url`.
    ///
    /// # Errors
    ///
    /// - [`MatrixError::Io`] if the file cannot be opened
    /// - [`MatrixError::UnreadableFile`] if the image format or dimensions cannot be determined
    pub fn to_payload(&self) -> Result<ThumbnailInfo, MatrixError> {
        let path = self.filepath.as_path();

        let size = std::fs::metadata(path)
            .map_err(|e| MatrixError::io(path, e))?
            .len();

        let reader = Reader::open(path)
            .and_then(|r| r.with_guessed_format())
            .map_err(|e| MatrixError::io(path, e))?;
        let format = reader.format();
        let (w, h) = reader
            .into_dimensions()
            .map_err(|source| MatrixError::UnreadableFile {
                path: path.to_owned(),
                source,
            })?;

        let mimetype = format
            .and_then(|f| f.extensions_str().first())
            .map(|ext| mime_guess::from_ext(ext).first_or_octet_stream())
            .unwrap_or(mime::APPLICATION_OCTET_STREAM);

        debug!(
            "thumbnail {} -> {} {}x{} {} bytes",
            path.display(),
            mimetype,
            w,
            h,
            size
        );

        Ok(ThumbnailInfo {
            thumbnail_info: ThumbnailDetails {
                mimetype: mimetype.essence_str().to_owned(),
                w,
                h,
                size,
            },
            thumbnail_url: self.uploaded_file_url.clone(),
        })
    }
}
