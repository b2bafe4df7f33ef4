pub mod allow_list;
pub mod naming;
pub mod record;
pub mod storage;

pub use allow_list::{
    extension_from_filename, is_allowed_extension, is_allowed_mime_type, is_image_file_name,
};
pub use naming::{compute_hash, generate_file_name};
pub use record::StoredImage;
pub use storage::PhotoStorage;

/// URL prefix under which stored images are served.
pub const PUBLIC_URL_PREFIX: &str = "/uploads";
