use serde::{Deserialize, Serialize};

use crate::data::DEFAULT_SUCCESS_RATE;
use crate::ml::ClassifierParams;
use crate::types::{DRAW_SIZE, MAX_NUMBER, MIN_NUMBER};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub generator: GeneratorSettings,
    pub dataset: DatasetSettings,
    pub model: ClassifierParams,
    pub report: ReportSettings,
    pub verbose: bool,
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        // Generator validation
        if self.generator.min_number > self.generator.max_number {
            errors.push("generator: min_number must be <= max_number".to_string());
        } else if ((self.generator.max_number - self.generator.min_number) as usize) + 1 < DRAW_SIZE {
            errors.push(format!("generator: range must hold at least {} numbers", DRAW_SIZE));
        }

        // Dataset validation
        if self.dataset.training_draws == 0 {
            errors.push("dataset: training_draws must be > 0".to_string());
        }
        if self.dataset.evaluation_draws == 0 {
            errors.push("dataset: evaluation_draws must be > 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.dataset.success_rate) {
            errors.push("dataset: success_rate must be between 0 and 1".to_string());
        }

        // Model validation
        if self.model.n_estimators == 0 {
            errors.push("model: n_estimators must be > 0".to_string());
        }
        if self.model.max_iterations == 0 {
            errors.push("model: max_iterations must be > 0".to_string());
        }

        // Report validation
        if self.report.top_n == 0 {
            errors.push("report: top_n must be > 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    pub seed: Option<u64>,
    pub min_number: u32,
    pub max_number: u32,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            seed: Some(123),
            min_number: MIN_NUMBER,
            max_number: MAX_NUMBER,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetSettings {
    pub training_draws: usize,
    pub evaluation_draws: usize,
    pub success_rate: f64,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            training_draws: 1000,
            evaluation_draws: 100,
            success_rate: DEFAULT_SUCCESS_RATE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub top_n: usize,
    /// SVG output; empty disables the file chart.
    pub chart_path: Option<String>,
    /// JSON results export, off unless set.
    pub summary_path: Option<String>,
    pub terminal_chart: bool,
    pub terminal_width: usize,
}

impl ReportSettings {
    pub fn chart_path(&self) -> Option<&str> {
        self.chart_path.as_deref().filter(|p| !p.trim().is_empty())
    }

    pub fn summary_path(&self) -> Option<&str> {
        self.summary_path.as_deref().filter(|p| !p.trim().is_empty())
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            top_n: 10,
            chart_path: Some("top_combinations.svg".to_string()),
            summary_path: None,
            terminal_chart: true,
            terminal_width: 50,
        }
    }
}
