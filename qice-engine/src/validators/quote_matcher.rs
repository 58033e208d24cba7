//! Fuzzy quote matching
//!
//! Decides whether a quoted fragment actually occurs in a turn's text,
//! tolerating minor transcription and paraphrase differences. Exact substring
//! containment short-circuits to similarity 1.0; otherwise a window the
//! length of the normalized quote slides across the normalized turn text and
//! the maximum per-offset similarity is kept.
//!
//! Similarity is Jaro-Winkler, which is forgiving of small local
//! rearrangements the way interview transcripts drift ("estamos abandonados"
//! against "completamente abandonados" scores ~0.85, where an edit-distance
//! ratio punishes the misaligned prefix too hard).

/// Normalize text for matching: lowercase, whitespace collapsed to single
/// spaces
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Best similarity of `quote` against any same-length window of `text`
///
/// Returns a value in [0.0, 1.0]. Matching a quote against the exact text it
/// was drawn from always yields 1.0. An empty quote trivially matches.
pub fn best_window_similarity(quote: &str, text: &str) -> f64 {
    let quote = normalize(quote);
    let text = normalize(text);

    if quote.is_empty() {
        return 1.0;
    }
    if text.contains(&quote) {
        return 1.0;
    }
    if text.is_empty() {
        return 0.0;
    }

    let quote_chars: Vec<char> = quote.chars().collect();
    let text_chars: Vec<char> = text.chars().collect();
    let window = quote_chars.len();

    if text_chars.len() <= window {
        return strsim::jaro_winkler(&text, &quote);
    }

    let mut best: f64 = 0.0;
    for start in 0..=(text_chars.len() - window) {
        let candidate: String = text_chars[start..start + window].iter().collect();
        let similarity = strsim::jaro_winkler(&candidate, &quote);
        if similarity > best {
            best = similarity;
        }
    }
    best
}
