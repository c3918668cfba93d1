use regex::RegexBuilder;

/// Minimum length before a query term participates in highlighting. Short
/// glue words ("is", "the", "of") stay unmarked.
const MIN_TERM_LEN: usize = 4;

/// Lower-cased query terms eligible for highlighting.
pub fn query_terms(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .filter(|t| t.len() >= MIN_TERM_LEN)
        .map(|t| t.to_string())
        .collect()
}

/// Wraps case-insensitive occurrences of the query's terms in the answer
/// with markdown emphasis. Terms are escaped first, so a query containing
/// pattern metacharacters matches literally.
pub fn highlight_terms(text: &str, query: &str) -> String {
    let mut highlighted = text.to_string();
    for term in query_terms(query) {
        let Ok(pattern) = RegexBuilder::new(&regex::escape(&term))
            .case_insensitive(true)
            .build()
        else {
            continue;
        };
        highlighted = pattern.replace_all(&highlighted, "**$0**").to_string();
    }
    highlighted
}

#[test]
fn test_highlight_wraps_matching_terms() {
    let out = highlight_terms(
        "Elasticity allows scaling on demand.",
        "explain elasticity scaling",
    );
    assert_eq!(out, "**Elasticity** allows **scaling** on demand.");
}

#[test]
fn test_short_terms_are_skipped() {
    let out = highlight_terms("the cat sat on the mat", "the cat on");
    assert_eq!(out, "the cat sat on the mat");
}

#[test]
fn test_metacharacters_match_literally() {
    let out = highlight_terms("uses (cloud) primitives", "what are (cloud) runtimes");
    assert_eq!(out, "uses **(cloud)** primitives");
}
