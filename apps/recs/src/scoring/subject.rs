//! Subject and year derived from knowledge-node ids such as `BIO.Y7.cells`.

/// Subject label used in justifications and as the video discipline vocabulary.
pub fn subject_label(node_id: &str) -> &'static str {
    if node_id.is_empty() {
        return "this topic";
    }
    let up = node_id.to_uppercase();
    if up.starts_with("BIO") {
        "Biological Sciences"
    } else if up.starts_with("CHEM") {
        "Chemical Sciences"
    } else if up.starts_with("PHYS") {
        // also covers PHYSICAL*
        "Physical Sciences"
    } else if up.starts_with("EARTH") {
        "Earth & Space Sciences"
    } else {
        "Science"
    }
}

/// First dot-separated segment starting with `Y` ("Y7"), or "" when absent.
pub fn year_token(node_id: &str) -> &str {
    node_id
        .split('.')
        .find(|part| part.starts_with('Y'))
        .unwrap_or("")
}
