use ndarray::{Array1, Array2, ArrayView1};

/// Binary CART tree with Gini splits.
///
/// Split search visits features in column order and keeps the first split
/// with the lowest score, and leaves vote for class 1 only on a strict
/// majority. Fitting the same rows twice always yields the same tree.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    root: Node,
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        success: bool,
    },
    Split {
        feature: usize,
        /// Rows with `value <= threshold` go left.
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// Class tally for a set of rows.
#[derive(Debug, Clone, Copy, Default)]
struct Counts {
    total: usize,
    ones: usize,
}

impl Counts {
    fn of(targets: &Array1<usize>, rows: &[usize]) -> Self {
        let ones = rows.iter().filter(|&&r| targets[r] == 1).count();
        Self {
            total: rows.len(),
            ones,
        }
    }

    fn gini(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let p = self.ones as f64 / self.total as f64;
        2.0 * p * (1.0 - p)
    }

    fn is_pure(&self) -> bool {
        self.ones == 0 || self.ones == self.total
    }

    /// Ties resolve to class 0.
    fn majority_is_success(&self) -> bool {
        self.ones * 2 > self.total
    }
}

/// Best split found for one node.
struct Candidate {
    feature: usize,
    threshold: f64,
    score: f64,
}

impl DecisionTree {
    /// Grow a tree on the given row indices; repeated indices count once per occurrence.
    pub fn fit(
        features: &Array2<f64>,
        targets: &Array1<usize>,
        rows: &[usize],
        max_depth: Option<usize>,
    ) -> Self {
        let root = grow(features, targets, rows.to_vec(), 0, max_depth);
        Self { root }
    }

    pub fn predict_row(&self, row: ArrayView1<f64>) -> usize {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { success } => return usize::from(*success),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold {
                        left.as_ref()
                    } else {
                        right.as_ref()
                    };
                }
            }
        }
    }

    pub fn predict(&self, features: &Array2<f64>) -> Array1<usize> {
        features
            .rows()
            .into_iter()
            .map(|row| self.predict_row(row))
            .collect()
    }

    pub fn depth(&self) -> usize {
        self.root.depth()
    }
}

impl Node {
    fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

fn grow(
    features: &Array2<f64>,
    targets: &Array1<usize>,
    rows: Vec<usize>,
    depth: usize,
    max_depth: Option<usize>,
) -> Node {
    let counts = Counts::of(targets, &rows);
    let leaf = Node::Leaf {
        success: counts.majority_is_success(),
    };
    if counts.is_pure() || max_depth.is_some_and(|limit| depth >= limit) {
        return leaf;
    }

    let Some(best) = best_split(features, targets, &rows, counts) else {
        return leaf;
    };
    if best.score >= counts.gini() {
        return leaf;
    }

    let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
        .into_iter()
        .partition(|&r| features[[r, best.feature]] <= best.threshold);

    Node::Split {
        feature: best.feature,
        threshold: best.threshold,
        left: Box::new(grow(features, targets, left_rows, depth + 1, max_depth)),
        right: Box::new(grow(features, targets, right_rows, depth + 1, max_depth)),
    }
}

fn best_split(
    features: &Array2<f64>,
    targets: &Array1<usize>,
    rows: &[usize],
    parent: Counts,
) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    let mut sorted = rows.to_vec();

    for feature in 0..features.ncols() {
        sorted.sort_by(|&a, &b| {
            features[[a, feature]]
                .total_cmp(&features[[b, feature]])
                .then(a.cmp(&b))
        });

        let mut left = Counts::default();
        for i in 0..sorted.len().saturating_sub(1) {
            let row = sorted[i];
            left.total += 1;
            left.ones += usize::from(targets[row] == 1);

            let value = features[[row, feature]];
            let next = features[[sorted[i + 1], feature]];
            if value == next {
                continue;
            }

            let right = Counts {
                total: parent.total - left.total,
                ones: parent.ones - left.ones,
            };
            let w = left.total as f64 / parent.total as f64;
            let score = w * left.gini() + (1.0 - w) * right.gini();

            if best.as_ref().map_or(true, |b| score < b.score) {
                best = Some(Candidate {
                    feature,
                    threshold: (value + next) / 2.0,
                    score,
                });
            }
        }
    }

    best
}
