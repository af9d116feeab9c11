//! User input validation
//!
//! The client is deliberately lenient about what counts as a downloadable
//! URL: the backend (yt-dlp) is the authority on supported sites, so the only
//! hard requirement here is that the input is non-empty after trimming.
//! Everything else is surfaced as log warnings, not rejections.

use crate::config;
use crate::core::error::AppError;
use url::Url;

/// Validates and normalizes a user-supplied URL.
///
/// Trims surrounding whitespace; an empty result is a validation error and
/// guarantees no network call is issued. Inputs that do not parse as an
/// http(s) URL are still accepted (the backend decides), but logged.
///
/// # Examples
/// ```
/// use tubedeck::core::validation::require_url;
///
/// assert_eq!(
///     require_url(" https://youtu.be/abc ").unwrap(),
///     "https://youtu.be/abc"
/// );
/// assert!(require_url("   ").is_err());
/// ```
pub fn require_url(input: &str) -> Result<String, AppError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("URLを入力してください".to_string()));
    }

    if trimmed.len() > config::validation::MAX_URL_LENGTH {
        log::warn!(
            "URL exceeds {} characters ({}), sending anyway",
            config::validation::MAX_URL_LENGTH,
            trimmed.len()
        );
    }

    match Url::parse(trimmed) {
        Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => {}
        Ok(parsed) => log::warn!("URL has unusual scheme '{}': {}", parsed.scheme(), trimmed),
        Err(e) => log::warn!("Input does not parse as a URL ({}): {}", e, trimmed),
    }

    Ok(trimmed.to_string())
}

/// Sanitizes a filename by removing filesystem-unsafe characters.
///
/// Used when a completed-file name from the backend is shown as a local
/// save suggestion: path separators, reserved characters and control
/// characters are stripped.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| !['/', '\\', ':', '*', '?', '"', '<', '>', '|'].contains(c))
        .filter(|c| !c.is_control())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_url_trims() {
        assert_eq!(
            require_url("  https://example.com/v  ").unwrap(),
            "https://example.com/v"
        );
    }

    #[test]
    fn test_require_url_rejects_empty() {
        for input in ["", "   ", "\t", "\n  \n"] {
            let err = require_url(input).unwrap_err();
            assert!(err.is_validation(), "expected validation error for {:?}", input);
        }
    }

    #[test]
    fn test_require_url_accepts_non_url_text() {
        // The backend owns URL semantics; odd input still goes through.
        assert_eq!(require_url("not a url").unwrap(), "not a url");
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("video.mp4"), "video.mp4");
        assert_eq!(sanitize_filename("a/b\\c:d.mp4"), "abcd.mp4");
        assert_eq!(sanitize_filename("file*?.mp4"), "file.mp4");
        assert_eq!(sanitize_filename("日本語タイトル.mp4"), "日本語タイトル.mp4");
    }

    #[test]
    fn test_sanitize_filename_strips_path_traversal() {
        // A backend-supplied name must never suggest writing outside the
        // current directory.
        assert_eq!(sanitize_filename("../../etc/passwd"), "....etcpasswd");
    }
}
