//! Per-mode aggregation of an experiment over one field-set.

use crate::error::{Error, Result};
use crate::eval::experiment::ExperimentReport;
use crate::eval::metrics::EvalRecord;
use serde::Serialize;

/// Five-number summary with linearly interpolated quartiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Quartiles {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl Quartiles {
    /// Summarize `values`. An empty slice yields all zeros.
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Self {
            min: sorted[0],
            q1: percentile(&sorted, 0.25),
            median: percentile(&sorted, 0.5),
            q3: percentile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        }
    }
}

/// Percentile of already sorted, non-empty `values`, interpolating linearly
/// between the two closest ranks.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let pos = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Aggregate metrics of one mode across queries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModeSummary {
    pub mode: String,
    /// Number of queries aggregated.
    pub queries: usize,
    pub mean_precision: f64,
    pub mean_recall: f64,
    pub mean_f1: f64,
    pub precision: Quartiles,
    pub recall: Quartiles,
    pub f1: Quartiles,
}

impl ModeSummary {
    fn from_records(mode: &str, records: &[EvalRecord]) -> Self {
        let precision: Vec<f64> = records.iter().map(|r| r.precision).collect();
        let recall: Vec<f64> = records.iter().map(|r| r.recall).collect();
        let f1: Vec<f64> = records.iter().map(|r| r.f1).collect();
        Self {
            mode: mode.to_string(),
            queries: records.len(),
            mean_precision: mean(&precision),
            mean_recall: mean(&recall),
            mean_f1: mean(&f1),
            precision: Quartiles::from_values(&precision),
            recall: Quartiles::from_values(&recall),
            f1: Quartiles::from_values(&f1),
        }
    }
}

/// Summary of every mode on one field-set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub field_set: String,
    pub modes: Vec<ModeSummary>,
}

/// Aggregate `report` on the field-set labelled `field_set`, one entry per
/// mode in run order.
pub fn summarize(report: &ExperimentReport, field_set: &str) -> Result<Summary> {
    if !report.field_set_labels.iter().any(|l| l == field_set) {
        return Err(Error::UnknownFieldSet(field_set.to_string()));
    }
    let modes = report
        .mode_names
        .iter()
        .map(|mode| {
            let records: Vec<EvalRecord> = report
                .queries
                .iter()
                .flat_map(|q| q.field_sets.iter().filter(|fs| fs.label == field_set))
                .flat_map(|fs| fs.results.iter().filter(|r| &r.mode == mode))
                .map(|r| r.record)
                .collect();
            ModeSummary::from_records(mode, &records)
        })
        .collect();
    Ok(Summary {
        field_set: field_set.to_string(),
        modes,
    })
}
