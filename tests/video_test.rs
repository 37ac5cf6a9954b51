use lookbook::video::{thumbnail_url, video_id};

#[test]
fn test_query_parameter_form() {
    assert_eq!(
        thumbnail_url("https://www.youtube.com/watch?v=0pqsNFFHyhc"),
        Some("https://img.youtube.com/vi/0pqsNFFHyhc/hqdefault.jpg".to_string())
    );
}

#[test]
fn test_query_parameter_form_with_playlist_noise() {
    assert_eq!(
        video_id("https://www.youtube.com/watch?v=g15OJDuGDCw&list=RDg15OJDuGDCw&start_radio=1"),
        Some("g15OJDuGDCw".to_string())
    );
}

#[test]
fn test_short_link_form() {
    assert_eq!(
        thumbnail_url("https://youtu.be/6loho6S--Ag"),
        Some("https://img.youtube.com/vi/6loho6S--Ag/hqdefault.jpg".to_string())
    );
}

#[test]
fn test_embed_path_form() {
    assert_eq!(
        video_id("https://www.youtube.com/embed/0pqsNFFHyhc"),
        Some("0pqsNFFHyhc".to_string())
    );
}

#[test]
fn test_bare_domain_yields_no_thumbnail() {
    assert_eq!(thumbnail_url("https://www.youtube.com"), None);
    assert_eq!(thumbnail_url("https://www.youtube.com/"), None);
}

#[test]
fn test_unrelated_urls_yield_no_thumbnail() {
    assert_eq!(thumbnail_url("https://example.com/video.mp4"), None);
    assert_eq!(thumbnail_url(""), None);
}

#[test]
fn test_id_shorter_than_eleven_characters_is_rejected() {
    assert_eq!(video_id("https://www.youtube.com/watch?v=short"), None);
}
