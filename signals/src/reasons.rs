use crate::lexical::LexicalSignals;

const MAX_TAGS: usize = 5;

/// Builds at most five short explanations for a text's signals.
///
/// `is_outlier` marks a text whose embedding sits unusually far from its
/// comparison set's centroid.
pub fn reason_tags(signals: &LexicalSignals, is_outlier: bool) -> Vec<String> {
    let mut tags: Vec<&str> = Vec::new();

    if signals.word_count < 20 {
        tags.push("Very short (noisy signal)");
    }
    if signals.metric_hits == 0 {
        tags.push("Low specificity (few/no metrics)");
    }
    if signals.metric_hits >= 3 {
        tags.push("Has measurable specifics");
    }

    if signals.buzzword_per_100_words >= 2.0 {
        tags.push("High buzzword density");
    } else if signals.buzzword_hits >= 3 {
        tags.push("Buzzword-heavy");
    }

    if signals.absolute_hits >= 2 {
        tags.push("Overconfident language");
    }
    if signals.hedge_hits >= 2 {
        tags.push("Hedging language");
    }
    if is_outlier {
        tags.push("Semantic outlier vs timeline");
    }

    tags.into_iter().take(MAX_TAGS).map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical_signals;

    #[test]
    fn short_vague_text() {
        let tags = reason_tags(&lexical_signals("Things are going well."), false);
        assert_eq!(
            tags,
            vec!["Very short (noisy signal)", "Low specificity (few/no metrics)"]
        );
    }

    #[test]
    fn outlier_tag_is_last() {
        let tags = reason_tags(&lexical_signals("We cut p95 latency 40% across 3 regions."), true);
        assert!(tags.contains(&"Has measurable specifics".to_string()));
        assert_eq!(tags.last().map(String::as_str), Some("Semantic outlier vs timeline"));
    }

    #[test]
    fn capped_at_five() {
        let text = "AI AI AI always never maybe perhaps";
        let tags = reason_tags(&lexical_signals(text), true);
        assert_eq!(tags.len(), 5);
    }
}
