//! Isolation forest outlier model.
//!
//! Each tree isolates a random subsample with random axis-aligned cuts; rows that
//! are isolated after few cuts are anomalous. Scores follow the usual convention:
//! `score_samples` lies in `[-1, 0)` with lower meaning more anomalous, and
//! `decision_function` shifts it by the contamination percentile so that negative
//! values mark outliers.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

use crate::error::DomainError;
use crate::services::ScoringConfig;

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

#[derive(Debug, Clone)]
pub struct IsolationForest<const N: usize> {
    trees: Vec<IsolationTree<N>>,
    sample_size: usize,
    offset: f64,
}

impl<const N: usize> IsolationForest<N> {
    /// Fits the forest with the seed from `config`; the same samples and seed
    /// always produce the same trees.
    pub fn fit(samples: &[[f64; N]], config: &ScoringConfig) -> Result<Self, DomainError> {
        if samples.is_empty() {
            return Err(DomainError::InsufficientData);
        }
        let sample_size = config.max_samples.clamp(1, samples.len());
        let max_depth = (sample_size.max(2) as f64).log2().ceil() as usize;
        let mut rng = StdRng::seed_from_u64(config.seed);

        let trees = (0..config.n_estimators.max(1))
            .map(|_| {
                let subsample = index::sample(&mut rng, samples.len(), sample_size).into_vec();
                IsolationTree::grow(samples, subsample, max_depth, &mut rng)
            })
            .collect();

        let mut forest = Self {
            trees,
            sample_size,
            offset: 0.0,
        };
        let training_scores = forest.score_samples(samples);
        forest.offset = percentile(&training_scores, 100.0 * config.contamination);
        Ok(forest)
    }

    pub fn score_samples(&self, samples: &[[f64; N]]) -> Vec<f64> {
        let normalizer = average_path_length(self.sample_size);
        samples
            .iter()
            .map(|sample| {
                let depth = self
                    .trees
                    .iter()
                    .map(|tree| tree.path_length(sample))
                    .sum::<f64>()
                    / self.trees.len() as f64;
                // a single-row subsample cannot be isolated any further
                let ratio = if normalizer > 0.0 { depth / normalizer } else { 0.0 };
                -(2f64.powf(-ratio))
            })
            .collect()
    }

    pub fn decision_function(&self, samples: &[[f64; N]]) -> Vec<f64> {
        self.score_samples(samples)
            .into_iter()
            .map(|score| score - self.offset)
            .collect()
    }
}

#[derive(Debug, Clone)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        size: usize,
    },
}

#[derive(Debug, Clone)]
struct IsolationTree<const N: usize> {
    nodes: Vec<Node>,
}

impl<const N: usize> IsolationTree<N> {
    fn grow<R: Rng + ?Sized>(
        samples: &[[f64; N]],
        subsample: Vec<usize>,
        max_depth: usize,
        rng: &mut R,
    ) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.grow_node(samples, subsample, 0, max_depth, rng);
        tree
    }

    fn grow_node<R: Rng + ?Sized>(
        &mut self,
        samples: &[[f64; N]],
        rows: Vec<usize>,
        depth: usize,
        max_depth: usize,
        rng: &mut R,
    ) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node::Leaf { size: rows.len() });
        if depth >= max_depth || rows.len() <= 1 {
            return id;
        }

        // only features that still vary inside the node can split it
        let candidates: Vec<(usize, f64, f64)> = (0..N)
            .filter_map(|feature| {
                let (lo, hi) = rows.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &row| {
                    let value = samples[row][feature];
                    (lo.min(value), hi.max(value))
                });
                (hi > lo).then_some((feature, lo, hi))
            })
            .collect();
        if candidates.is_empty() {
            return id;
        }

        let (feature, lo, hi) = candidates[rng.gen_range(0..candidates.len())];
        let threshold = draw_threshold(rng, lo, hi);
        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
            .into_iter()
            .partition(|&row| samples[row][feature] <= threshold);

        let left = self.grow_node(samples, left_rows, depth + 1, max_depth, rng);
        let right = self.grow_node(samples, right_rows, depth + 1, max_depth, rng);
        self.nodes[id] = Node::Split {
            feature,
            threshold,
            left,
            right,
        };
        id
    }

    fn path_length(&self, sample: &[f64; N]) -> f64 {
        let mut node = 0;
        let mut depth = 0.0;
        loop {
            match &self.nodes[node] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if sample[*feature] <= *threshold { *left } else { *right };
                    depth += 1.0;
                }
                Node::Leaf { size } => return depth + average_path_length(*size),
            }
        }
    }
}

/// Uniform cut in `[lo, hi)`. Spans wider than `f64::MAX` are drawn as a convex
/// combination so the width is never computed.
fn draw_threshold<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    if (hi - lo).is_finite() {
        return rng.gen_range(lo..hi);
    }
    let t: f64 = rng.gen();
    (lo * (1.0 - t) + hi * t).clamp(lo, hi)
}

/// Average path length of an unsuccessful search in a binary search tree of `n` nodes.
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

/// Percentile with linear interpolation between closest ranks.
pub fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let rank = (q.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (rank - lower as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster_with_outlier() -> Vec<[f64; 2]> {
        let mut samples: Vec<[f64; 2]> = (0..49)
            .map(|i| [100.0 + (i % 7) as f64 * 3.0, 5.0 + (i % 5) as f64 * 0.05])
            .collect();
        samples.push([900.0, 0.5]);
        samples
    }

    #[test]
    fn average_path_length_matches_reference_values() {
        assert_eq!(average_path_length(0), 0.0);
        assert_eq!(average_path_length(1), 0.0);
        assert_eq!(average_path_length(2), 1.0);
        assert!((average_path_length(256) - 10.244_770_920_119_917).abs() < 1e-9);
    }

    #[test]
    fn percentile_interpolates_between_ranks() {
        let values = [4.0, 1.0, 3.0, 2.0, 5.0];
        assert_eq!(percentile(&values, 0.0), 1.0);
        assert_eq!(percentile(&values, 50.0), 3.0);
        assert_eq!(percentile(&values, 100.0), 5.0);
        assert!((percentile(&values, 20.0) - 1.8).abs() < 1e-12);
    }

    #[test]
    fn fit_is_reproducible_for_a_fixed_seed() {
        let samples = cluster_with_outlier();
        let config = ScoringConfig::default();
        let first = IsolationForest::fit(&samples, &config).expect("fit").decision_function(&samples);
        let second = IsolationForest::fit(&samples, &config).expect("fit").decision_function(&samples);
        let first_bits: Vec<u64> = first.iter().map(|v| v.to_bits()).collect();
        let second_bits: Vec<u64> = second.iter().map(|v| v.to_bits()).collect();
        assert_eq!(first_bits, second_bits);
    }

    #[test]
    fn planted_outlier_gets_the_lowest_score() {
        let samples = cluster_with_outlier();
        let forest = IsolationForest::fit(&samples, &ScoringConfig::default()).expect("fit");
        let scores = forest.score_samples(&samples);
        let outlier = scores[samples.len() - 1];
        assert!(scores[..samples.len() - 1].iter().all(|score| *score > outlier));
        assert!(scores.iter().all(|score| (-1.0..0.0).contains(score)));
    }

    #[test]
    fn offset_flags_at_most_the_contamination_share() {
        let samples = cluster_with_outlier();
        let forest = IsolationForest::fit(&samples, &ScoringConfig::default()).expect("fit");
        let outliers = forest
            .decision_function(&samples)
            .iter()
            .filter(|decision| **decision < 0.0)
            .count();
        assert!(outliers >= 1);
        assert!(outliers <= 10, "flagged {outliers} of 50 rows");
    }

    #[test]
    fn identical_rows_score_identically() {
        let samples = vec![[10.0, 1.0]; 12];
        let forest = IsolationForest::fit(&samples, &ScoringConfig::default()).expect("fit");
        let scores = forest.score_samples(&samples);
        assert!(scores.iter().all(|score| score.to_bits() == scores[0].to_bits()));
    }

    #[test]
    fn single_row_is_fittable() {
        let samples = vec![[10.0, 1.0]];
        let forest = IsolationForest::fit(&samples, &ScoringConfig::default()).expect("fit");
        let scores = forest.score_samples(&samples);
        assert_eq!(scores, vec![-1.0]);
    }

    #[test]
    fn thresholds_stay_inside_spans_wider_than_f64_max() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let threshold = draw_threshold(&mut rng, -1e308, 1e308);
            assert!((-1e308..=1e308).contains(&threshold));
        }
        let threshold = draw_threshold(&mut rng, 2.0, 3.0);
        assert!((2.0..3.0).contains(&threshold));
    }

    #[test]
    fn empty_input_is_rejected() {
        let samples: Vec<[f64; 2]> = Vec::new();
        let err = IsolationForest::fit(&samples, &ScoringConfig::default()).expect_err("empty batch");
        assert_eq!(err, DomainError::InsufficientData);
    }
}
