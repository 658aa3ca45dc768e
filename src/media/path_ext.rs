// Adapted from prose-core-client, util/path_ext.rs
//
// Copyright: 2023, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use image::ImageFormat;
use mime::Mime;
use std::path::Path;

pub trait PathExt {
    /// MIME type guessed from the file extension, `application/octet-stream` when unknown.
    fn media_type(&self) -> Mime;
    /// MIME type sniffed from the leading bytes of the file, falling back to
    /// [`PathExt::media_type`] when the content is not a known image format.
    fn sniffed_media_type(&self, content: &[u8]) -> Mime;
    /// Final path component, empty when the path has none.
    fn base_name(&self) -> String;
}

impl PathExt for Path {
    // https://github.com/abonander/mime_guess/issues/88
    fn media_type(&self) -> Mime {
        let media_type = mime_guess::from_path(self).first_or_octet_stream();

        if media_type.type_() == mime::AUDIO && media_type.subtype() == "m4a" {
            return "audio/mp4".parse().unwrap_or(media_type);
        }

        media_type
    }

    fn sniffed_media_type(&self, content: &[u8]) -> Mime {
        image::guess_format(content)
            .ok()
            // PNM magic is two printable bytes, too weak to override the extension
            .filter(|format| *format != ImageFormat::Pnm)
            .and_then(|format| format.extensions_str().first())
            .and_then(|ext| mime_guess::from_ext(ext).first())
            .unwrap_or_else(|| self.media_type())
    }

    fn base_name(&self) -> String {
        self.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
