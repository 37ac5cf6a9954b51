use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Query-parameter form: .../watch?v=ID, also ids embedded after a path
    // segment or between &-separated parameters
    static ref ID_AFTER_MARKER: Regex =
        Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11})(?:[?&/]|$)").unwrap();
    // Short-link form: youtu.be/ID
    static ref SHORT_LINK: Regex = Regex::new(r"youtu\.be/([0-9A-Za-z_-]{11})").unwrap();
}

/// Extracts the 11-character video id from a YouTube URL, if the URL matches
/// one of the two known shapes. Anything else yields `None` — unsupported
/// shapes are a silently accepted degraded case, never an error.
pub fn video_id(url: &str) -> Option<String> {
    if url.is_empty() {
        return None;
    }
    for pattern in [&*ID_AFTER_MARKER, &*SHORT_LINK] {
        if let Some(captures) = pattern.captures(url) {
            return Some(captures[1].to_string());
        }
    }
    None
}

/// Builds the deterministic thumbnail URL for a video, when the id can be
/// extracted. Callers fall back to rendering the raw link when this is `None`.
pub fn thumbnail_url(url: &str) -> Option<String> {
    video_id(url).map(|id| format!("https://img.youtube.com/vi/{}/hqdefault.jpg", id))
}
