use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};

use super::*;

fn headers(value: &'static str) -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(CONTENT_TYPE, HeaderValue::from_static(value));
    h
}

#[test]
fn content_type_drops_parameters() {
    assert_eq!(
        content_type(&headers("Text/Plain; charset=utf-8")).as_deref(),
        Some("text/plain")
    );
    assert_eq!(
        content_type(&headers("image/png")).as_deref(),
        Some("image/png")
    );
}

#[test]
fn missing_or_blank_content_type_is_unknown() {
    assert_eq!(content_type(&HeaderMap::new()), None);
    assert_eq!(content_type(&headers("  ")), None);
}
