use std::path::{Component, Path, PathBuf};

use anyhow::bail;

/// `{origin}/{bucket}/{key}`; the bucket is public, so no signing step.
pub fn bucket_public_url(origin: &str, bucket: &str, key: &str) -> String {
    format!(
        "{}/{}/{}",
        origin.trim_end_matches('/'),
        bucket,
        key.trim_start_matches('/')
    )
}

/// Maps an object key onto a path under `root`, refusing anything that could
/// escape it.
pub fn key_to_path(root: &Path, key: &str) -> anyhow::Result<PathBuf> {
    if key.is_empty() || key.starts_with('/') || key.contains('\\') {
        bail!("invalid object key: {key:?}");
    }
    let mut path = root.to_path_buf();
    for segment in key.split('/') {
        if segment.is_empty() {
            bail!("invalid object key: {key:?}");
        }
        let mut comps = Path::new(segment).components();
        match (comps.next(), comps.next()) {
            (Some(Component::Normal(c)), None) => path.push(c),
            _ => bail!("invalid object key: {key:?}"),
        }
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_url_joins_origin_bucket_and_key() {
        assert_eq!(
            bucket_public_url("https://storage.googleapis.com/", "menus", "restaurants/r1/a.pdf"),
            "https://storage.googleapis.com/menus/restaurants/r1/a.pdf"
        );
    }

    #[test]
    fn key_maps_under_root() {
        let root = Path::new("/srv/uploads");
        let p = key_to_path(root, "restaurants/r1/2024/3/abc-menu.pdf").unwrap();
        assert_eq!(p, Path::new("/srv/uploads/restaurants/r1/2024/3/abc-menu.pdf"));
    }

    #[test]
    fn traversal_and_empty_segments_are_rejected() {
        let root = Path::new("/srv/uploads");
        for key in ["", "/etc/passwd", "restaurants/../../etc", "a//b", "a/./b", "a\\b"] {
            assert!(key_to_path(root, key).is_err(), "{key}");
        }
    }
}
