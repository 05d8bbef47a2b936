//! Recognising playlist and video identifiers in user-supplied URLs.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Canonical watch URL prefix used for every stored video reference
pub const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

/// Matches watch, short, embed, `/v/`, `/e/`, nocookie and channel-path URL
/// shapes. Capture group 1 is the 11 character video id.
static VIDEO_ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)(?:youtube(?:-nocookie)?\.com/(?:[^/]+/.+/|(?:v|e(?:mbed)?)/|.*[?&]v=)|youtu\.be/)([^"&?/ ]{11})"#,
    )
    .expect("video id pattern should always be valid")
});

/// Parse a URL, accepting input without a scheme (`youtube.com/playlist?...`).
fn parse_lenient(raw: &str) -> Option<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    match Url::parse(raw) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("https://{}", raw)).ok(),
        Err(_) => None,
    }
}

/// Value of the `list` query parameter, if present and non-empty.
pub fn playlist_id_from_url(raw: &str) -> Option<String> {
    let url = parse_lenient(raw)?;

    url.query_pairs()
        .find(|(key, _)| key == "list")
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// 11 character video id from any known URL shape.
pub fn video_id_from_url(raw: &str) -> Option<String> {
    VIDEO_ID_PATTERN
        .captures(raw)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}

pub fn canonical_video_url(video_id: &str) -> String {
    format!("{}{}", WATCH_URL_PREFIX, video_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playlist_id_from_url() {
        assert_eq!(
            playlist_id_from_url("https://www.youtube.com/playlist?list=PLx0sYbCqOb8TBPRdmBHs5Iftvv9TPboYG"),
            Some("PLx0sYbCqOb8TBPRdmBHs5Iftvv9TPboYG".to_string())
        );
        assert_eq!(
            playlist_id_from_url("https://www.youtube.com/watch?v=abcdefghijk&list=PL123&index=2"),
            Some("PL123".to_string())
        );
        assert_eq!(
            playlist_id_from_url("youtube.com/playlist?list=PLnoscheme"),
            Some("PLnoscheme".to_string())
        );
    }

    #[test]
    fn test_playlist_id_missing() {
        assert_eq!(playlist_id_from_url("https://www.youtube.com/playlist"), None);
        assert_eq!(playlist_id_from_url("https://www.youtube.com/playlist?list="), None);
        assert_eq!(playlist_id_from_url("https://www.youtube.com/playlist?lists=PL1"), None);
        assert_eq!(playlist_id_from_url(""), None);
        assert_eq!(playlist_id_from_url("not a url at all"), None);
    }

    #[test]
    fn test_video_id_from_known_shapes() {
        let cases = [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "http://youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?t=42",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ?rel=0",
            "https://www.youtube.com/v/dQw4w9WgXcQ",
            "https://www.youtube.com/e/dQw4w9WgXcQ",
            "https://www.youtube.com/user/SomeChannel#p/a/u/1/dQw4w9WgXcQ",
            "WWW.YOUTUBE.COM/WATCH?V=dQw4w9WgXcQ",
            "youtube.com/watch?v=dQw4w9WgXcQ",
        ];

        for url in cases {
            assert_eq!(
                video_id_from_url(url),
                Some("dQw4w9WgXcQ".to_string()),
                "failed for {}",
                url
            );
        }
    }

    #[test]
    fn test_video_id_rejects_unknown_shapes() {
        assert_eq!(video_id_from_url("https://vimeo.com/123456789"), None);
        assert_eq!(video_id_from_url("https://www.youtube.com/watch?v=short"), None);
        assert_eq!(video_id_from_url("https://www.youtube.com/playlist?list=PL1"), None);
        assert_eq!(video_id_from_url(""), None);
    }

    #[test]
    fn test_canonical_video_url() {
        assert_eq!(
            canonical_video_url("dQw4w9WgXcQ"),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
        assert_eq!(
            video_id_from_url(&canonical_video_url("dQw4w9WgXcQ")),
            Some("dQw4w9WgXcQ".to_string())
        );
    }
}
