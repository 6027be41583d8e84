use serde::Serialize;
use std::path::Path;
use tracing::info;

use super::ranking::{ProbabilityStats, RankedDraw};
use crate::error::PipelineResult;

/// Pretty print the best combination to console
pub fn print_best_combination(best: &RankedDraw) {
    println!("\n{}", "=".repeat(60));
    println!("BEST COMBINATION FOUND");
    println!("{}", "=".repeat(60));
    println!("\nCombination: {}", best.draw);
    println!(
        "Success probability: {:.6} ({:.4}%)",
        best.probability,
        best.probability * 100.0
    );
    println!("{}", "=".repeat(60));
}

/// Pretty print probability statistics to console
pub fn print_statistics(stats: &ProbabilityStats) {
    println!("\n{}", "=".repeat(60));
    println!("Probability Statistics");
    println!("{}", "=".repeat(60));
    println!("Maximum probability:   {:.6}", stats.max);
    println!("Minimum probability:   {:.6}", stats.min);
    println!("Mean probability:      {:.6}", stats.mean);
    println!("Standard deviation:    {:.6}", stats.std_dev);
    println!("Median:                {:.6}", stats.median);
    println!("{}", "=".repeat(60));
}

/// Machine-readable record of one run's results.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub seed: Option<u64>,
    pub classifier: String,
    pub evaluated: usize,
    pub best: RankedDraw,
    pub statistics: ProbabilityStats,
    pub top: Vec<RankedDraw>,
}

impl ReportSummary {
    pub fn write_json(&self, path: &Path) -> PipelineResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        info!("Results saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Draw;

    #[test]
    fn test_summary_json_export() {
        let best = RankedDraw {
            rank: 1,
            row: 7,
            draw: Draw::new([3, 11, 19, 27, 35, 43]).unwrap(),
            probability: 0.42,
        };
        let summary = ReportSummary {
            generated_at: chrono::Utc::now(),
            seed: Some(123),
            classifier: "random_forest".to_string(),
            evaluated: 100,
            best: best.clone(),
            statistics: ProbabilityStats {
                max: 0.42,
                min: 0.0,
                mean: 0.1,
                std_dev: 0.05,
                median: 0.08,
            },
            top: vec![best],
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("summary.json");
        summary.write_json(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["seed"], 123);
        assert_eq!(value["best"]["draw"], serde_json::json!([3, 11, 19, 27, 35, 43]));
        assert_eq!(value["top"].as_array().unwrap().len(), 1);
        assert_eq!(value["statistics"]["median"], 0.08);
    }
}
