use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::data::{DatasetBuilder, SeriesGenerator};
use crate::error::PipelineResult;
use crate::ml::{PredictiveModel, TrainingReport};
use crate::report::{
    self, BarChart, ChartRenderer, ProbabilityStats, RankedDraw, ReportSummary, SvgChart,
    TerminalChart,
};
use crate::types::{Dataset, ScoredBatch};

/// Everything a completed run produced.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub training: TrainingReport,
    pub scored: ScoredBatch,
    pub top: Vec<RankedDraw>,
    pub best: RankedDraw,
    pub stats: ProbabilityStats,
}

/// Generate → label → train → score → rank → report, strictly in that order.
///
/// The seeded generator is created once per pipeline and threaded through
/// both dataset builds, so a run is replayable from its seed alone.
pub struct Pipeline {
    config: PipelineConfig,
    builder: DatasetBuilder,
    model: PredictiveModel,
    renderers: Vec<Box<dyn ChartRenderer>>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let renderers = default_renderers(&config);
        Self::with_renderers(config, renderers)
    }

    pub fn with_renderers(config: PipelineConfig, renderers: Vec<Box<dyn ChartRenderer>>) -> Self {
        let generator = SeriesGenerator::with_range(
            config.generator.seed,
            config.generator.min_number,
            config.generator.max_number,
        );
        let model = PredictiveModel::new(config.model.clone());
        Self {
            builder: DatasetBuilder::new(generator),
            model,
            renderers,
            config,
        }
    }

    pub fn model(&self) -> &PredictiveModel {
        &self.model
    }

    pub fn run(&mut self) -> PipelineResult<PipelineOutcome> {
        print_header();

        let training_set = self.build_training_set()?;
        let training = self.train(&training_set)?;
        let evaluation_set = self.build_evaluation_set()?;
        let scored = self.score(evaluation_set)?;

        println!("\n[5] Showing results...");
        let best = report::best(scored.dataset(), scored.probabilities())?;
        let stats = report::summary_stats(scored.probabilities())?;
        report::print_best_combination(&best);
        report::print_statistics(&stats);

        let top_n = self.config.report.top_n;
        let top = report::rank_top_n(scored.dataset(), scored.probabilities(), top_n)?;
        self.render(&top)?;

        if let Some(path) = self.config.report.summary_path() {
            ReportSummary {
                generated_at: chrono::Utc::now(),
                seed: self.builder.seed(),
                classifier: self.config.model.kind.as_str().to_string(),
                evaluated: scored.len(),
                best: best.clone(),
                statistics: stats.clone(),
                top: top.clone(),
            }
            .write_json(std::path::Path::new(path))?;
        }

        info!(
            "Run complete: best {} at {:.6}",
            best.draw, best.probability
        );
        Ok(PipelineOutcome {
            training,
            scored,
            top,
            best,
            stats,
        })
    }

    fn build_training_set(&mut self) -> PipelineResult<Dataset> {
        println!("\n[1] Generating simulated training data...");
        let dataset = self
            .builder
            .build_labeled(self.config.dataset.training_draws, self.config.dataset.success_rate)?;

        println!("   ✓ Data generated: {} combinations", dataset.len());
        println!("   ✓ Successful combinations: {}", dataset.success_count());
        println!("   ✓ Success rate: {:.1}%", dataset.success_rate() * 100.0);
        Ok(dataset)
    }

    fn train(&mut self, training_set: &Dataset) -> PipelineResult<TrainingReport> {
        println!(
            "\n[2] Training {} model...",
            self.config.model.kind.display_name()
        );
        let report = self.model.train(training_set)?;

        println!("   ✓ Model trained successfully");
        println!("   ✓ Features scaled with StandardScaler");
        println!("   ✓ Training accuracy: {:.1}%", report.accuracy * 100.0);
        Ok(report)
    }

    fn build_evaluation_set(&mut self) -> PipelineResult<Dataset> {
        let count = self.config.dataset.evaluation_draws;
        println!("\n[3] Generating {} combinations to evaluate...", count);
        let dataset = self.builder.build_plain(count)?;
        println!("   ✓ {} combinations generated", dataset.len());
        Ok(dataset)
    }

    fn score(&self, evaluation_set: Dataset) -> PipelineResult<ScoredBatch> {
        println!("\n[4] Predicting success probabilities...");
        let probabilities = self.model.predict_probabilities(&evaluation_set)?;
        let predicted_successes = self
            .model
            .predict_labels(&evaluation_set)?
            .iter()
            .filter(|&&l| l == 1)
            .count();
        println!(
            "   ✓ Probabilities computed for {} combinations",
            probabilities.len()
        );
        println!("   ✓ Combinations classified as successes: {}", predicted_successes);
        ScoredBatch::new(evaluation_set, probabilities)
    }

    fn render(&self, top: &[RankedDraw]) -> PipelineResult<()> {
        println!("\n[6] Generating visualization...");
        println!(
            "   ✓ Showing chart of the top {} combinations...",
            self.config.report.top_n
        );
        let chart = BarChart::top_combinations(top, self.config.report.top_n);
        for renderer in &self.renderers {
            renderer.render(&chart)?;
        }
        debug!("Chart rendered by {} renderer(s)", self.renderers.len());
        Ok(())
    }
}

fn default_renderers(config: &PipelineConfig) -> Vec<Box<dyn ChartRenderer>> {
    let mut renderers: Vec<Box<dyn ChartRenderer>> = Vec::new();
    if config.report.terminal_chart {
        renderers.push(Box::new(TerminalChart::new(config.report.terminal_width)));
    }
    if let Some(path) = config.report.chart_path() {
        renderers.push(Box::new(SvgChart::new(path)));
    }
    renderers
}

fn print_header() {
    println!("{}", "=".repeat(60));
    println!("Lottery Success-Probability Simulator");
    println!("Synthetic labels: no real predictive signal");
    println!("{}", "=".repeat(60));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::report::chart::MockChartRenderer;
    use crate::types::{MAX_NUMBER, MIN_NUMBER};

    fn quiet_config() -> PipelineConfig {
        let mut config = PipelineConfig::default();
        config.report.terminal_chart = false;
        config.report.chart_path = None;
        config
    }

    #[test]
    fn test_end_to_end_seed_123() {
        let mut pipeline = Pipeline::with_renderers(quiet_config(), Vec::new());
        let outcome = pipeline.run().unwrap();

        assert_eq!(outcome.training.samples, 1000);
        assert_eq!(outcome.training.successes_in_data, 100);
        assert_eq!(outcome.scored.len(), 100);

        let best = &outcome.best;
        assert_eq!(best.draw.numbers().len(), 6);
        assert!(best
            .draw
            .numbers()
            .iter()
            .all(|&n| (MIN_NUMBER..=MAX_NUMBER).contains(&n)));
        assert!((0.0..=1.0).contains(&best.probability));
        assert_eq!(outcome.top[0], *best);
        assert_eq!(outcome.top.len(), 10);

        let s = &outcome.stats;
        assert!(s.min <= s.mean && s.mean <= s.max);
        assert!(s.min <= s.median && s.median <= s.max);
        assert!((s.max - best.probability).abs() < 1e-12);
    }

    #[test]
    fn test_same_seed_replays_identically() {
        let mut config = quiet_config();
        config.dataset.training_draws = 200;
        config.dataset.evaluation_draws = 30;
        config.model.n_estimators = 10;

        let a = Pipeline::with_renderers(config.clone(), Vec::new()).run().unwrap();
        let b = Pipeline::with_renderers(config, Vec::new()).run().unwrap();
        assert_eq!(a.scored.dataset(), b.scored.dataset());
        assert_eq!(a.scored.probabilities(), b.scored.probabilities());
        assert_eq!(a.best, b.best);
    }

    #[test]
    fn test_renderer_receives_top_n_bars() {
        let mut config = quiet_config();
        config.dataset.training_draws = 200;
        config.dataset.evaluation_draws = 40;
        config.model.n_estimators = 5;
        config.report.top_n = 7;

        let mut renderer = MockChartRenderer::new();
        renderer
            .expect_render()
            .withf(|chart| {
                chart.bars.len() == 7
                    && chart.bars.windows(2).all(|w| w[0].value >= w[1].value)
                    && chart.title.starts_with("Top 7")
            })
            .times(1)
            .returning(|_| Ok(()));

        let outcome = Pipeline::with_renderers(config, vec![Box::new(renderer)])
            .run()
            .unwrap();
        assert_eq!(outcome.top.len(), 7);
    }

    #[test]
    fn test_renderer_failure_aborts_run() {
        let mut config = quiet_config();
        config.dataset.training_draws = 100;
        config.dataset.evaluation_draws = 10;
        config.model.n_estimators = 3;

        let mut renderer = MockChartRenderer::new();
        renderer
            .expect_render()
            .returning(|_| Err(PipelineError::backend("display unavailable")));

        let err = Pipeline::with_renderers(config, vec![Box::new(renderer)])
            .run()
            .unwrap_err();
        assert_eq!(err, PipelineError::backend("display unavailable"));
    }

    #[test]
    fn test_invalid_range_propagates_invalid_argument() {
        let mut config = quiet_config();
        config.generator.min_number = 1;
        config.generator.max_number = 4;

        let mut pipeline = Pipeline::with_renderers(config, Vec::new());
        assert!(matches!(
            pipeline.run().unwrap_err(),
            PipelineError::InvalidArgument(_)
        ));
        assert!(!pipeline.model().is_trained());
    }

    #[test]
    fn test_outputs_written_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let chart_path = dir.path().join("chart.svg");
        let summary_path = dir.path().join("summary.json");

        let mut config = quiet_config();
        config.dataset.training_draws = 150;
        config.dataset.evaluation_draws = 20;
        config.model.n_estimators = 5;
        config.report.chart_path = Some(chart_path.to_string_lossy().into_owned());
        config.report.summary_path = Some(summary_path.to_string_lossy().into_owned());

        Pipeline::new(config).run().unwrap();
        assert!(std::fs::read_to_string(&chart_path).unwrap().contains("<svg"));
        let summary: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&summary_path).unwrap()).unwrap();
        assert_eq!(summary["evaluated"], 20);
        assert_eq!(summary["top"].as_array().unwrap().len(), 10);
    }
}
