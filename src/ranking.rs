/// One row of the probability display: a label and its softmax probability.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedLabel {
    pub label: String,
    pub probability: f32,
}

impl RankedLabel {
    /// The probability as a percentage in [0, 100]
    pub fn percentage(&self) -> f32 {
        self.probability * 100.0
    }
}

/// Pairs each label with its probability and sorts descending.
///
/// The sort is stable, so equal probabilities keep vocabulary order. That is
/// an implementation detail, not a guaranteed tie-break policy. The slices
/// must be index-aligned and of equal length (the classifier guarantees this
/// for its own output).
pub fn rank(labels: &[String], probabilities: &[f32]) -> Vec<RankedLabel> {
    debug_assert_eq!(labels.len(), probabilities.len());

    let mut ranked: Vec<RankedLabel> = labels
        .iter()
        .zip(probabilities.iter())
        .map(|(label, &probability)| RankedLabel {
            label: label.clone(),
            probability,
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.probability
            .partial_cmp(&a.probability)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_rank_returns_one_pair_per_label() {
        let ranked = rank(&labels(&["a", "b", "c"]), &[0.2, 0.5, 0.3]);
        assert_eq!(ranked.len(), 3);
    }

    #[test]
    fn test_rank_is_descending() {
        let ranked = rank(&labels(&["a", "b", "c", "d"]), &[0.1, 0.4, 0.2, 0.3]);
        for pair in ranked.windows(2) {
            assert!(pair[0].probability >= pair[1].probability);
        }
        assert_eq!(ranked[0].label, "b");
    }

    #[test]
    fn test_rank_ties_keep_vocabulary_order() {
        let ranked = rank(&labels(&["a", "b", "c"]), &[0.25, 0.5, 0.25]);
        assert_eq!(ranked[0].label, "b");
        assert_eq!(ranked[1].label, "a");
        assert_eq!(ranked[2].label, "c");
    }

    #[test]
    fn test_percentages_sum_to_one_hundred() {
        let probabilities = [0.6, 0.3, 0.1];
        let ranked = rank(&labels(&["a", "b", "c"]), &probabilities);
        let total: f32 = ranked.iter().map(|r| r.percentage()).sum();
        assert!((total - 100.0).abs() < 1e-4);
    }
}
