//! HTTP span helpers.

use uuid::Uuid;

/// Segments that are followed by a product slug.
const SLUG_PARENTS: [&str; 1] = ["products"];

/// Route label with identifiers collapsed, so metrics and span names stay
/// low-cardinality.
pub(super) fn route_label(path: &str) -> String {
    if path == "/" {
        return "/".to_owned();
    }

    let mut label = String::from("/");
    let mut previous = "";

    for (index, segment) in path.trim_start_matches('/').split('/').enumerate() {
        if index > 0 {
            label.push('/');
        }

        if Uuid::parse_str(segment).is_ok() {
            label.push_str("{uuid}");
        } else if SLUG_PARENTS.contains(&previous) && !segment.is_empty() {
            label.push_str("{slug}");
        } else if previous == "uploads" {
            label.push_str("{file}");
        } else {
            label.push_str(segment);
        }

        previous = segment;
    }

    label
}
