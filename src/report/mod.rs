//! Ranking, statistics and presentation of scored evaluation draws.
//!
//! `ranking` is pure computation; `console` and `chart` only present values
//! it has already produced.

pub mod ranking;
pub mod console;
pub mod chart;

pub use ranking::{best, rank_top_n, summary_stats, ProbabilityStats, RankedDraw};
pub use console::{print_best_combination, print_statistics, ReportSummary};
pub use chart::{BarChart, ChartRenderer, SvgChart, TerminalChart};
