use anyhow::Result;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

#[cfg(feature = "mt")]
use rayon::prelude::*;

use crate::classifier::Learner;
use crate::error::ClassifierError;

#[derive(Debug, Clone)]
pub struct ForestConfig {
    pub n_trees: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub seed: u64,
    /// Worker threads for fitting (0 = rayon default). Ignored without `mt`.
    pub threads: usize,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            seed: 0,
            threads: 0,
        }
    }
}

/// Bagged CART trees with Gini splits over a random feature subset.
#[derive(Debug, Clone)]
pub struct RandomForest {
    config: ForestConfig,
    n_features: usize,
    trees: Vec<Tree>,
}

impl RandomForest {
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            n_features: 0,
            trees: Vec::new(),
        }
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Mean leaf artifact fraction across trees.
    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        self.trees.iter().map(|t| t.predict(row)).sum::<f64>() / self.trees.len() as f64
    }
}

impl Default for RandomForest {
    fn default() -> Self {
        Self::new(ForestConfig::default())
    }
}

impl Learner for RandomForest {
    fn name(&self) -> &'static str {
        "random_forest"
    }

    fn fit(&mut self, x: &[Vec<f64>], y: &[u8]) -> Result<()> {
        if x.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet.into());
        }
        if x.len() != y.len() {
            return Err(ClassifierError::LabelMismatch {
                rows: x.len(),
                labels: y.len(),
            }
            .into());
        }
        let n_features = x[0].len();
        let max_features = ((n_features as f64).sqrt().floor() as usize).max(1);
        let params = GrowParams {
            max_depth: self.config.max_depth,
            min_samples_split: self.config.min_samples_split.max(2),
            max_features,
        };
        let seeds: Vec<u64> = (0..self.config.n_trees.max(1) as u64)
            .map(|t| self.config.seed.wrapping_add(t))
            .collect();

        #[cfg(feature = "mt")]
        let trees = {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.threads)
                .build()
                .map_err(|e| anyhow::anyhow!("failed to build thread pool: {}", e))?;
            pool.install(|| {
                seeds
                    .par_iter()
                    .map(|&seed| build_tree(x, y, &params, seed))
                    .collect::<Vec<Tree>>()
            })
        };

        #[cfg(not(feature = "mt"))]
        let trees = seeds
            .iter()
            .map(|&seed| build_tree(x, y, &params, seed))
            .collect::<Vec<Tree>>();

        self.n_features = n_features;
        self.trees = trees;
        Ok(())
    }

    fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<u8>> {
        if self.trees.is_empty() {
            return Err(ClassifierError::NotTrained.into());
        }
        let mut out = Vec::with_capacity(x.len());
        for row in x {
            if row.len() != self.n_features {
                return Err(ClassifierError::FeatureMismatch {
                    expected: self.n_features,
                    got: row.len(),
                }
                .into());
            }
            out.push(u8::from(self.predict_proba(row) > 0.5));
        }
        Ok(out)
    }
}

struct GrowParams {
    max_depth: Option<usize>,
    min_samples_split: usize,
    max_features: usize,
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        p_artifact: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn predict(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { p_artifact } => return *p_artifact,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

struct SplitChoice {
    feature: usize,
    threshold: f64,
}

fn build_tree(x: &[Vec<f64>], y: &[u8], params: &GrowParams, seed: u64) -> Tree {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = x.len();
    let bootstrap: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();

    let mut nodes = vec![Node::Leaf { p_artifact: 0.0 }];
    // (slot, sample indices, depth)
    let mut work = vec![(0usize, bootstrap, 0usize)];
    while let Some((slot, samples, depth)) = work.pop() {
        let positives = samples.iter().filter(|&&i| y[i] == 1).count();
        let p_artifact = positives as f64 / samples.len() as f64;
        let pure = positives == 0 || positives == samples.len();
        let depth_reached = params.max_depth.is_some_and(|d| depth >= d);
        if pure || depth_reached || samples.len() < params.min_samples_split {
            nodes[slot] = Node::Leaf { p_artifact };
            continue;
        }

        let Some(split) = best_split(x, y, &samples, params.max_features, &mut rng) else {
            nodes[slot] = Node::Leaf { p_artifact };
            continue;
        };
        let (left_samples, right_samples): (Vec<usize>, Vec<usize>) = samples
            .iter()
            .partition(|&&i| x[i][split.feature] <= split.threshold);

        let left = nodes.len();
        let right = left + 1;
        nodes.push(Node::Leaf { p_artifact });
        nodes.push(Node::Leaf { p_artifact });
        nodes[slot] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        work.push((left, left_samples, depth + 1));
        work.push((right, right_samples, depth + 1));
    }
    Tree { nodes }
}

// Evaluates `max_features` random features, continuing past that budget only
// while no feature has produced a valid split.
fn best_split(
    x: &[Vec<f64>],
    y: &[u8],
    samples: &[usize],
    max_features: usize,
    rng: &mut StdRng,
) -> Option<SplitChoice> {
    let mut features: Vec<usize> = (0..x[0].len()).collect();
    features.shuffle(rng);

    let total = samples.len();
    let total_pos = samples.iter().filter(|&&i| y[i] == 1).count();
    let mut best: Option<(f64, SplitChoice)> = None;
    let mut pairs: Vec<(f64, u8)> = Vec::with_capacity(total);

    for (visited, &feature) in features.iter().enumerate() {
        if visited >= max_features && best.is_some() {
            break;
        }
        pairs.clear();
        pairs.extend(samples.iter().map(|&i| (x[i][feature], y[i])));
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut left_pos = 0usize;
        for k in 1..total {
            left_pos += pairs[k - 1].1 as usize;
            let (lo, hi) = (pairs[k - 1].0, pairs[k].0);
            if lo == hi {
                continue;
            }
            let impurity = weighted_gini(k, left_pos, total - k, total_pos - left_pos);
            if best.as_ref().is_none_or(|(b, _)| impurity < *b) {
                let mid = lo + (hi - lo) / 2.0;
                let threshold = if mid < hi { mid } else { lo };
                best = Some((impurity, SplitChoice { feature, threshold }));
            }
        }
    }
    best.map(|(_, choice)| choice)
}

fn weighted_gini(n_left: usize, pos_left: usize, n_right: usize, pos_right: usize) -> f64 {
    let n = (n_left + n_right) as f64;
    (n_left as f64 * gini(n_left, pos_left) + n_right as f64 * gini(n_right, pos_right)) / n
}

fn gini(n: usize, pos: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let p = pos as f64 / n as f64;
    1.0 - p * p - (1.0 - p) * (1.0 - p)
}
