//! Lightweight keyword extraction used to carry thematic continuity from a
//! first-pass draft into the refinement prompt.

/// Maximum number of keywords returned.
pub const MAX_KEYWORDS: usize = 10;

/// Words carrying no thematic weight, always excluded.
const STOP_WORDS: &[&str] = &[
    "the", "and", "a", "in", "of", "to", "with", "on", "at", "for", "by",
    "is", "are", "was", "were", "be", "have", "has", "had", "this", "that",
    "i", "you", "he", "she", "it", "we", "they", "my", "your", "his", "her",
];

/// Extract up to [`MAX_KEYWORDS`] distinct keywords from draft lines, most
/// frequent first, as a comma-separated string.
///
/// Lowercases, strips punctuation, drops stop words and tokens of 3 chars or
/// fewer. An empty line list yields an empty string, never an error.
pub fn extract_keywords(lines: &[String]) -> String {
    let full_text = lines.join(" ");

    let mut freq: Vec<(String, usize)> = Vec::new();
    for raw in full_text.split_whitespace() {
        let word: String = raw
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '\'')
            .collect();

        if word.len() <= 3 || STOP_WORDS.contains(&word.as_str()) {
            continue;
        }

        match freq.iter_mut().find(|(w, _)| *w == word) {
            Some((_, count)) => *count += 1,
            None => freq.push((word, 1)),
        }
    }

    // Stable sort keeps first-seen order within equal counts.
    freq.sort_by(|a, b| b.1.cmp(&a.1));

    freq.into_iter()
        .take(MAX_KEYWORDS)
        .map(|(w, _)| w)
        .collect::<Vec<_>>()
        .join(", ")
}
