use serde::Serialize;

use crate::error::{PipelineError, PipelineResult};
use crate::types::{Dataset, Draw};

/// One evaluation draw with its predicted success probability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedDraw {
    /// 1-based position in the ranking.
    pub rank: usize,
    /// Row index in the evaluation dataset.
    pub row: usize,
    pub draw: Draw,
    pub probability: f64,
}

/// Summary statistics over a probability vector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityStats {
    pub max: f64,
    pub min: f64,
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub median: f64,
}

fn check_scores(dataset: &Dataset, probabilities: &[f64]) -> PipelineResult<()> {
    if dataset.len() != probabilities.len() {
        return Err(PipelineError::invalid_argument(format!(
            "{} probabilities for {} draws",
            probabilities.len(),
            dataset.len()
        )));
    }
    check_finite(probabilities)
}

fn check_finite(probabilities: &[f64]) -> PipelineResult<()> {
    match probabilities.iter().find(|p| !p.is_finite()) {
        Some(bad) => Err(PipelineError::invalid_argument(format!(
            "probabilities must be finite, found {}",
            bad
        ))),
        None => Ok(()),
    }
}

/// The `n` highest-probability draws, descending; ties keep row order.
pub fn rank_top_n(
    dataset: &Dataset,
    probabilities: &[f64],
    n: usize,
) -> PipelineResult<Vec<RankedDraw>> {
    check_scores(dataset, probabilities)?;

    let mut order: Vec<usize> = (0..probabilities.len()).collect();
    // stable: equal probabilities stay in row order
    order.sort_by(|&a, &b| probabilities[b].total_cmp(&probabilities[a]));

    let draws = dataset.draws();
    Ok(order
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(i, row)| RankedDraw {
            rank: i + 1,
            row,
            draw: draws[row],
            probability: probabilities[row],
        })
        .collect())
}

/// The single highest-probability draw; the earliest row wins ties.
pub fn best(dataset: &Dataset, probabilities: &[f64]) -> PipelineResult<RankedDraw> {
    rank_top_n(dataset, probabilities, 1)?
        .into_iter()
        .next()
        .ok_or_else(|| PipelineError::invalid_argument("cannot pick a best draw from an empty dataset"))
}

pub fn summary_stats(probabilities: &[f64]) -> PipelineResult<ProbabilityStats> {
    if probabilities.is_empty() {
        return Err(PipelineError::invalid_argument(
            "cannot summarise an empty probability list",
        ));
    }
    check_finite(probabilities)?;
    let n = probabilities.len() as f64;
    let max = probabilities.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = probabilities.iter().copied().fold(f64::INFINITY, f64::min);
    let mean = probabilities.iter().sum::<f64>() / n;
    let variance = probabilities.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / n;

    let mut sorted = probabilities.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    };

    Ok(ProbabilityStats {
        max,
        min,
        // rounding can push the mean a hair outside [min, max] for near-constant input
        mean: mean.clamp(min, max),
        std_dev: variance.sqrt(),
        median,
    })
}
