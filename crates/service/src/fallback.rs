//! Degraded-mode interpretation.
//!
//! When the model gateway is unreachable or misconfigured the request
//! still completes with this canned text. It counts against quota and
//! is persisted like any other reply.

/// Canned interpretation quoting the start of the dream text.
pub(crate) fn fallback_interpretation(dream_text: &str) -> String {
    let topic: String = dream_text.trim().chars().take(50).collect();
    format!(
        "Thank you for sharing your dream about \"{topic}...\"\n\n\
         This dream appears to be rich with personal symbolism. Dreams often reflect our \
         subconscious thoughts and emotions.\n\n\
         Key symbols in your dream might represent:\n\
         \u{2022} Current life situations you're processing\n\
         \u{2022} Emotions you're working through\n\
         \u{2022} Desires or fears that need attention\n\n\
         I encourage you to reflect on what these symbols mean to you personally. Consider \
         keeping a dream journal to track patterns over time.\n\n\
         What emotions did you feel most strongly in this dream?"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_quotes_dream_topic() {
        let text = fallback_interpretation("I dreamed I was flying over a city");
        assert!(text.starts_with(
            "Thank you for sharing your dream about \"I dreamed I was flying over a city...\""
        ));
        assert!(text.contains("dream journal"));
    }

    #[test]
    fn test_fallback_truncates_long_topic() {
        let long = "x".repeat(120);
        let text = fallback_interpretation(&long);
        assert!(text.contains(&format!("\"{}...\"", "x".repeat(50))));
    }
}
