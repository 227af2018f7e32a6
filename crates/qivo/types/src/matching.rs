//! Section title matching
//!
//! Title lookup is deliberately fuzzy: a candidate matches when it appears anywhere in
//! the title, ignoring case. All callers go through [`title_matches`] so the heuristic
//! can be tightened in one place.

use crate::canonical::Section;

/// Case-insensitive substring match of `candidate` inside `title`.
///
/// A candidate ending in a digit must not run into another digit, so "section 1"
/// matches "Section 1 Sampling" and "Table 1 - Section 1" but not "Section 10".
pub fn title_matches(title: &str, candidate: &str) -> bool {
    let title = title.to_lowercase();
    let candidate = candidate.to_lowercase();
    if !candidate.ends_with(|c: char| c.is_ascii_digit()) {
        return title.contains(&candidate);
    }

    title.match_indices(&candidate).any(|(start, matched)| {
        !title[start + matched.len()..].starts_with(|c: char| c.is_ascii_digit())
    })
}

/// First section matching any candidate; earlier candidates take precedence
pub fn find_section<'a>(sections: &'a [Section], candidates: &[&str]) -> Option<&'a Section> {
    candidates.iter().find_map(|candidate| {
        sections
            .iter()
            .find(|section| title_matches(&section.title, candidate))
    })
}
