//! Evaluation: ground truth, metrics, the experiment driver and its summary.

/// Per-query experiment driver over field-sets and modes.
pub mod experiment;
/// Synthesized relevance judgments.
pub mod ground_truth;
/// Confusion counts and precision/recall/F1.
pub mod metrics;
/// Per-mode means and quartiles.
pub mod summary;

pub use experiment::{
    Experiment, ExperimentReport, FieldSetReport, FieldSetSpec, ModeResult, ModeSpec,
    QueryReport, Strategy, BASELINE_MODE,
};
pub use ground_truth::ground_truth;
pub use metrics::{evaluate, EvalRecord, LabelConvention};
pub use summary::{summarize, ModeSummary, Quartiles, Summary};
