use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

const HASH_SUFFIX_LEN: usize = 8;

pub fn compute_hash(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}

/// Destination name for a new upload: `<unix-millis>-<hash prefix>.<ext>`.
///
/// Two uploads of the same name and size within the same nanosecond still
/// collide; storage refuses to overwrite in that case.
pub fn generate_file_name(original_name: &str, size: usize, ext: &str) -> String {
    file_name_at(Utc::now(), original_name, size, ext)
}

fn file_name_at(now: DateTime<Utc>, original_name: &str, size: usize, ext: &str) -> String {
    let millis = now.timestamp_millis();
    let nanos = now.timestamp_nanos_opt().unwrap_or(millis);
    let hash = compute_hash(&format!("{nanos}:{original_name}:{size}"));
    format!("{millis}-{}.{ext}", &hash[..HASH_SUFFIX_LEN])
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn hash_is_hex_sha256() {
        assert_eq!(
            compute_hash("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn name_starts_with_millis_and_keeps_extension() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let name = file_name_at(now, "selfie.png", 10_240, "png");
        let (token, ext) = name.rsplit_once('.').unwrap();
        assert_eq!(ext, "png");
        let (millis, suffix) = token.split_once('-').unwrap();
        assert_eq!(millis, "1700000000123");
        assert_eq!(suffix.len(), HASH_SUFFIX_LEN);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn same_millisecond_different_inputs_differ() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let a = file_name_at(now, "a.png", 10, "png");
        let b = file_name_at(now, "b.png", 10, "png");
        let c = file_name_at(now, "a.png", 11, "png");
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn same_inputs_at_same_instant_are_deterministic() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        assert_eq!(
            file_name_at(now, "a.png", 10, "png"),
            file_name_at(now, "a.png", 10, "png")
        );
    }
}
