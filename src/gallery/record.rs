use chrono::{DateTime, Utc};
use serde::Serialize;

/// One entry of the image listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StoredImage {
    pub url: String,
    pub name: String,
    pub uploaded: DateTime<Utc>,
}
