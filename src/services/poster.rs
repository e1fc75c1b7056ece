/// Poster reference resolution
///
/// The catalog and the vector index store poster references in several
/// historical shapes: absolute URLs, TMDB-style paths with or without a
/// leading slash, empty strings, and the literal "nan" left behind by the
/// ingestion tooling. This normalizes all of them to an absolute URL or None.
///
/// Pure and total - every input maps to a defined output.
pub fn resolve_poster_url(raw: Option<&str>, image_base_url: &str) -> Option<String> {
    let path = raw?.trim();

    if path.is_empty() || path.eq_ignore_ascii_case("nan") {
        return None;
    }

    if path.starts_with("http") {
        Some(path.to_string())
    } else if path.starts_with('/') {
        Some(format!("{}{}", image_base_url, path))
    } else {
        Some(format!("{}/{}", image_base_url, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://image.tmdb.org/t/p/w500";

    #[test]
    fn test_leading_slash_path() {
        assert_eq!(
            resolve_poster_url(Some("/a/b.jpg"), BASE),
            Some("https://image.tmdb.org/t/p/w500/a/b.jpg".to_string())
        );
    }

    #[test]
    fn test_bare_relative_path() {
        assert_eq!(
            resolve_poster_url(Some("a/b.jpg"), BASE),
            Some("https://image.tmdb.org/t/p/w500/a/b.jpg".to_string())
        );
    }

    #[test]
    fn test_full_url_passes_through() {
        assert_eq!(
            resolve_poster_url(Some("https://x/y.jpg"), BASE),
            Some("https://x/y.jpg".to_string())
        );
    }

    #[test]
    fn test_nan_any_case_is_none() {
        assert_eq!(resolve_poster_url(Some("NaN"), BASE), None);
        assert_eq!(resolve_poster_url(Some("nan"), BASE), None);
        assert_eq!(resolve_poster_url(Some("NAN"), BASE), None);
    }

    #[test]
    fn test_empty_and_missing_are_none() {
        assert_eq!(resolve_poster_url(Some(""), BASE), None);
        assert_eq!(resolve_poster_url(Some("   "), BASE), None);
        assert_eq!(resolve_poster_url(None, BASE), None);
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        assert_eq!(
            resolve_poster_url(Some("  /a.jpg "), BASE),
            Some("https://image.tmdb.org/t/p/w500/a.jpg".to_string())
        );
    }
}
