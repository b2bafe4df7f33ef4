//! Which uploads count as images.
//!
//! The same extension set drives both upload validation and the listing filter,
//! so anything accepted on the way in shows up on the way out.

pub const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// Extension of `file_name` as written, if it has one after a non-empty stem.
pub fn extension_from_filename(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    let stem = stem.rsplit(['/', '\\']).next().unwrap_or(stem);
    let ext = ext.trim();
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_string())
}

pub fn is_allowed_extension(ext: &str) -> bool {
    let ext = ext.to_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str())
}

/// Accepts `image/<sub>` where `<sub>` is one of the allowed extensions.
/// Parameters after `;` are ignored.
pub fn is_allowed_mime_type(mime_type: &str) -> bool {
    let essence = mime_type
        .split(';')
        .next()
        .unwrap_or(mime_type)
        .trim()
        .to_lowercase();
    match essence.split_once('/') {
        Some(("image", subtype)) => ALLOWED_EXTENSIONS.contains(&subtype),
        _ => false,
    }
}

/// Listing filter: `\.(jpe?g|png|gif)$`, case-insensitive.
pub fn is_image_file_name(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .is_some_and(|(_, ext)| is_allowed_extension(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_keeps_its_case() {
        assert_eq!(extension_from_filename("Selfie.JPG").as_deref(), Some("JPG"));
        assert_eq!(extension_from_filename("a.b.png").as_deref(), Some("png"));
    }

    #[test]
    fn names_without_extension_or_stem_have_none() {
        assert_eq!(extension_from_filename("photo"), None);
        assert_eq!(extension_from_filename("photo."), None);
        assert_eq!(extension_from_filename(".png"), None);
        assert_eq!(extension_from_filename("C:\\fakepath\\.gif"), None);
    }

    #[test]
    fn only_image_extensions_are_allowed() {
        for ext in ["jpg", "JPEG", "png", "Gif"] {
            assert!(is_allowed_extension(ext), "{ext}");
        }
        for ext in ["bmp", "webp", "svg", "txt", "jp", ""] {
            assert!(!is_allowed_extension(ext), "{ext}");
        }
    }

    #[test]
    fn mime_type_must_be_an_allowed_image_type() {
        assert!(is_allowed_mime_type("image/jpeg"));
        assert!(is_allowed_mime_type("IMAGE/PNG"));
        assert!(is_allowed_mime_type("image/gif; charset=binary"));
        assert!(!is_allowed_mime_type("image/webp"));
        assert!(!is_allowed_mime_type("text/png"));
        assert!(!is_allowed_mime_type("application/octet-stream"));
        assert!(!is_allowed_mime_type("image/svg+xml"));
    }

    #[test]
    fn listing_filter_matches_case_insensitively() {
        assert!(is_image_file_name("1700000000000-ab12cd34.png"));
        assert!(is_image_file_name("OLD.JPEG"));
        assert!(!is_image_file_name("notes.txt"));
        assert!(!is_image_file_name("png"));
        assert!(is_image_file_name(".gif"));
        assert!(!is_image_file_name("archive.png.zip"));
    }
}
