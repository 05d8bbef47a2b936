//! Title and thumbnail normalization applied before metadata is persisted.

use bridge_traits::catalog::ThumbnailSet;

/// Title the platform reports for videos the caller may not see.
pub const PRIVATE_VIDEO_TITLE: &str = "Private video";

/// Characters trimmed from both ends after the convention name is stripped.
const SEPARATORS: &[char] = &[' ', '-', '@', ':', '\t', '\n', '\r', '\0'];

/// Strip the convention name from a remote title.
///
/// Returns `None` for the "Private video" sentinel. Otherwise the convention
/// name is removed (ASCII case-insensitively) from the front and then from the
/// back of the title, and separator characters are trimmed. The result may be
/// empty.
///
/// ```
/// use core_sync::normalize::filter_name;
///
/// assert_eq!(
///     filter_name("MyCon", "MyCon - Opening Ceremony - MyCon").as_deref(),
///     Some("Opening Ceremony")
/// );
/// assert_eq!(filter_name("MyCon", "  Private video "), None);
/// ```
pub fn filter_name(convention_name: &str, raw_title: &str) -> Option<String> {
    let convention = convention_name.trim();
    let title = raw_title.trim();

    if title == PRIVATE_VIDEO_TITLE {
        return None;
    }

    let title = strip_prefix_ignore_case(title, convention);
    let title = strip_suffix_ignore_case(title, convention);

    Some(title.trim_matches(SEPARATORS).to_string())
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> &'a str {
    if prefix.is_empty() {
        return value;
    }

    match (value.get(..prefix.len()), value.get(prefix.len()..)) {
        (Some(head), Some(rest)) if head.eq_ignore_ascii_case(prefix) => rest,
        _ => value,
    }
}

fn strip_suffix_ignore_case<'a>(value: &'a str, suffix: &str) -> &'a str {
    if suffix.is_empty() {
        return value;
    }

    let Some(split) = value.len().checked_sub(suffix.len()) else {
        return value;
    };

    match (value.get(..split), value.get(split..)) {
        (Some(rest), Some(tail)) if tail.eq_ignore_ascii_case(suffix) => rest,
        _ => value,
    }
}

/// Pick the thumbnail URL to store: `medium`, then `maxres`, otherwise none.
pub fn resolve_thumbnail(thumbnails: &ThumbnailSet) -> Option<String> {
    thumbnails
        .medium
        .as_ref()
        .or(thumbnails.maxres.as_ref())
        .map(|thumbnail| thumbnail.url.clone())
        .filter(|url| !url.is_empty())
}
