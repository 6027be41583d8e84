use std::fmt::{self, Write as _};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

use super::ranking::RankedDraw;
use crate::error::{PipelineError, PipelineResult};

/// One horizontal bar: a combination label and its probability.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartBar {
    pub label: String,
    pub value: f64,
}

/// Already-ranked values handed to a renderer; renderers compute nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Highest bar first.
    pub bars: Vec<ChartBar>,
}

impl BarChart {
    pub fn top_combinations(ranked: &[RankedDraw], top_n: usize) -> Self {
        Self {
            title: format!("Top {} Combinations by Success Probability", top_n),
            x_label: "Success probability".to_string(),
            y_label: "Combinations".to_string(),
            bars: ranked
                .iter()
                .map(|r| ChartBar {
                    label: r.draw.to_string(),
                    value: r.probability,
                })
                .collect(),
        }
    }

    fn max_value(&self) -> f64 {
        self.bars.iter().map(|b| b.value).fold(0.0, f64::max)
    }
}

/// Presentation adapter for the top-N chart.
#[cfg_attr(test, mockall::automock)]
pub trait ChartRenderer {
    /// Display or persist the chart; returns once rendering is complete.
    fn render(&self, chart: &BarChart) -> PipelineResult<()>;
}

/// Horizontal bar chart drawn with block characters on stdout.
pub struct TerminalChart {
    width: usize,
}

impl TerminalChart {
    pub fn new(width: usize) -> Self {
        Self { width: width.max(1) }
    }

    pub fn render_to(&self, chart: &BarChart, out: &mut dyn Write) -> PipelineResult<()> {
        let label_width = chart.bars.iter().map(|b| b.label.len()).max().unwrap_or(0);
        let max = chart.max_value();

        writeln!(out, "\n{}", chart.title)?;
        writeln!(out, "{}", "-".repeat(chart.title.len()))?;
        for bar in &chart.bars {
            let len = if max > 0.0 {
                ((bar.value / max) * self.width as f64).round() as usize
            } else {
                0
            };
            writeln!(
                out,
                "{:<label_width$} | {} {:.4}",
                bar.label,
                "█".repeat(len),
                bar.value,
                label_width = label_width
            )?;
        }
        writeln!(out, "{:>label_width$}   {}", chart.y_label, chart.x_label, label_width = label_width)?;
        out.flush()?;
        Ok(())
    }
}

impl ChartRenderer for TerminalChart {
    fn render(&self, chart: &BarChart) -> PipelineResult<()> {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        self.render_to(chart, &mut lock)
    }
}

const SVG_WIDTH: f64 = 1200.0;
const SVG_HEIGHT: f64 = 800.0;
const MARGIN_LEFT: f64 = 230.0;
const MARGIN_RIGHT: f64 = 90.0;
const MARGIN_TOP: f64 = 80.0;
const MARGIN_BOTTOM: f64 = 80.0;
const GRID_TICKS: usize = 5;

/// Writes the chart as a standalone SVG file.
pub struct SvgChart {
    path: PathBuf,
}

impl SvgChart {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn to_svg(chart: &BarChart) -> Result<String, fmt::Error> {
        let plot_w = SVG_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_h = SVG_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        let max = chart.max_value();
        // headroom for the value annotations
        let x_max = if max > 0.0 { max * 1.15 } else { 1.0 };
        let slot = if chart.bars.is_empty() {
            plot_h
        } else {
            plot_h / chart.bars.len() as f64
        };
        let bar_h = slot * 0.7;

        let mut svg = String::new();
        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
            w = SVG_WIDTH,
            h = SVG_HEIGHT
        )?;
        writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#)?;
        writeln!(
            svg,
            r#"<text x="{}" y="{}" text-anchor="middle" font-size="18" font-weight="bold">{}</text>"#,
            SVG_WIDTH / 2.0,
            MARGIN_TOP / 2.0,
            escape(&chart.title)
        )?;

        for i in 0..=GRID_TICKS {
            let value = x_max * i as f64 / GRID_TICKS as f64;
            let x = MARGIN_LEFT + plot_w * i as f64 / GRID_TICKS as f64;
            writeln!(
                svg,
                r##"<line x1="{x:.1}" y1="{top}" x2="{x:.1}" y2="{bottom}" stroke="#cccccc" stroke-dasharray="4 4"/>"##,
                x = x,
                top = MARGIN_TOP,
                bottom = MARGIN_TOP + plot_h
            )?;
            writeln!(
                svg,
                r#"<text x="{:.1}" y="{}" text-anchor="middle" font-size="11">{:.3}</text>"#,
                x,
                MARGIN_TOP + plot_h + 18.0,
                value
            )?;
        }

        for (i, bar) in chart.bars.iter().enumerate() {
            let y = MARGIN_TOP + slot * i as f64 + (slot - bar_h) / 2.0;
            let w = plot_w * bar.value / x_max;
            let mid = y + bar_h / 2.0;
            writeln!(
                svg,
                r#"<rect x="{}" y="{:.1}" width="{:.1}" height="{:.1}" fill="steelblue" fill-opacity="0.8"/>"#,
                MARGIN_LEFT, y, w, bar_h
            )?;
            writeln!(
                svg,
                r#"<text x="{}" y="{:.1}" text-anchor="end" dominant-baseline="middle" font-size="12">{}</text>"#,
                MARGIN_LEFT - 8.0,
                mid,
                escape(&bar.label)
            )?;
            writeln!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" dominant-baseline="middle" font-size="12" font-weight="bold">{:.4}</text>"#,
                MARGIN_LEFT + w + 4.0,
                mid,
                bar.value
            )?;
        }

        writeln!(
            svg,
            r#"<text x="{}" y="{}" text-anchor="middle" font-size="14" font-weight="bold">{}</text>"#,
            MARGIN_LEFT + plot_w / 2.0,
            SVG_HEIGHT - 25.0,
            escape(&chart.x_label)
        )?;
        writeln!(
            svg,
            r#"<text transform="translate(25 {}) rotate(-90)" text-anchor="middle" font-size="14" font-weight="bold">{}</text>"#,
            MARGIN_TOP + plot_h / 2.0,
            escape(&chart.y_label)
        )?;
        svg.push_str("</svg>\n");
        Ok(svg)
    }
}

impl ChartRenderer for SvgChart {
    fn render(&self, chart: &BarChart) -> PipelineResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                PipelineError::backend(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }
        let svg = Self::to_svg(chart)
            .map_err(|e| PipelineError::backend(format!("cannot format chart: {}", e)))?;
        std::fs::write(&self.path, svg).map_err(|e| {
            PipelineError::backend(format!("cannot write chart {}: {}", self.path.display(), e))
        })?;
        info!("Chart saved to {}", self.path.display());
        Ok(())
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
