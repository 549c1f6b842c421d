//! Confusion counts and precision/recall/F1 under two label conventions.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// How the label vectors handed to the metric computation are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelConvention {
    /// Labels over the retrieved list only. Every entry is predicted
    /// positive, so `fn` and `tn` are always 0 and recall saturates at 1.0
    /// as soon as one relevant document is retrieved.
    Restricted,
    /// Labels over every document in the corpus.
    #[default]
    FullCollection,
}

impl LabelConvention {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelConvention::Restricted => "restricted",
            LabelConvention::FullCollection => "full_collection",
        }
    }
}

impl fmt::Display for LabelConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LabelConvention {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "restricted" => Ok(LabelConvention::Restricted),
            "full_collection" | "full" => Ok(LabelConvention::FullCollection),
            _ => Err(Error::InvalidConfig(format!(
                "unknown label convention '{s}' (expected restricted or full_collection)"
            ))),
        }
    }
}

/// Quality of one retrieval run against one ground truth.
///
/// Fields are declared in report order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvalRecord {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub tp: usize,
    pub fp: usize,
    #[serde(rename = "fn")]
    pub fn_: usize,
    pub tn: usize,
    /// Convention the counts were produced under.
    #[serde(skip, default)]
    pub convention: LabelConvention,
}

/// `num / den`, or 0.0 when the denominator is zero.
fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

impl EvalRecord {
    /// Derive precision, recall and F1 from raw confusion counts.
    pub fn from_counts(
        tp: usize,
        fp: usize,
        fn_: usize,
        tn: usize,
        convention: LabelConvention,
    ) -> Self {
        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };
        Self {
            precision,
            recall,
            f1,
            tp,
            fp,
            fn_,
            tn,
            convention,
        }
    }

    /// Sum of the four confusion counts.
    pub fn total(&self) -> usize {
        self.tp + self.fp + self.fn_ + self.tn
    }
}

/// Score `retrieved` against `ground_truth`.
///
/// `universe` is every document id of the corpus; it is only read under
/// [`LabelConvention::FullCollection`], where ids in `retrieved` that are not
/// part of it are ignored and repeated ids count once. Under
/// [`LabelConvention::Restricted`] every entry of `retrieved` is one label,
/// repeats included.
pub fn evaluate<S: AsRef<str>>(
    retrieved: &[String],
    ground_truth: &HashSet<String>,
    universe: &[S],
    convention: LabelConvention,
) -> EvalRecord {
    match convention {
        LabelConvention::Restricted => {
            let tp = retrieved
                .iter()
                .filter(|id| ground_truth.contains(id.as_str()))
                .count();
            EvalRecord::from_counts(tp, retrieved.len() - tp, 0, 0, convention)
        }
        LabelConvention::FullCollection => {
            let predicted: HashSet<&str> = retrieved.iter().map(String::as_str).collect();
            let (mut tp, mut fp, mut fn_, mut tn) = (0, 0, 0, 0);
            for id in universe {
                let id = id.as_ref();
                match (predicted.contains(id), ground_truth.contains(id)) {
                    (true, true) => tp += 1,
                    (true, false) => fp += 1,
                    (false, true) => fn_ += 1,
                    (false, false) => tn += 1,
                }
            }
            EvalRecord::from_counts(tp, fp, fn_, tn, convention)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn set(v: &[&str]) -> HashSet<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    const UNIVERSE: [&str; 5] = ["a", "b", "c", "d", "e"];

    #[test]
    fn test_full_collection_counts() {
        let r = evaluate(
            &ids(&["a", "b", "c"]),
            &set(&["a", "d"]),
            &UNIVERSE,
            LabelConvention::FullCollection,
        );
        assert_eq!((r.tp, r.fp, r.fn_, r.tn), (1, 2, 1, 1));
        assert_eq!(r.total(), UNIVERSE.len());
        assert!((r.precision - 1.0 / 3.0).abs() < 1e-12);
        assert!((r.recall - 0.5).abs() < 1e-12);
        assert!((r.f1 - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_restricted_recall_saturates() {
        let r = evaluate(
            &ids(&["a", "b", "c"]),
            &set(&["a", "d"]),
            &UNIVERSE,
            LabelConvention::Restricted,
        );
        assert_eq!((r.tp, r.fp, r.fn_, r.tn), (1, 2, 0, 0));
        assert_eq!(r.tp + r.fp, 3);
        assert_eq!(r.recall, 1.0);
        assert!((r.f1 - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_inputs_are_zero() {
        for convention in [LabelConvention::Restricted, LabelConvention::FullCollection] {
            let r = evaluate(&[], &HashSet::new(), &UNIVERSE, convention);
            assert_eq!((r.precision, r.recall, r.f1), (0.0, 0.0, 0.0));
            assert_eq!(r.tp, 0);
        }
        let r = evaluate(
            &ids(&["a"]),
            &HashSet::new(),
            &UNIVERSE,
            LabelConvention::FullCollection,
        );
        assert_eq!((r.precision, r.recall, r.f1), (0.0, 0.0, 0.0));
        assert_eq!((r.fp, r.tn), (1, 4));
    }

    #[test]
    fn test_duplicates() {
        let retrieved = ids(&["a", "a", "b"]);
        let gt = set(&["a"]);
        let full = evaluate(&retrieved, &gt, &UNIVERSE, LabelConvention::FullCollection);
        assert_eq!((full.tp, full.fp), (1, 1));
        let restricted = evaluate(&retrieved, &gt, &UNIVERSE, LabelConvention::Restricted);
        assert_eq!((restricted.tp, restricted.fp), (2, 1));
    }

    #[test]
    fn test_unknown_retrieved_ids_ignored_in_full_collection() {
        let r = evaluate(
            &ids(&["zzz"]),
            &set(&["a"]),
            &UNIVERSE,
            LabelConvention::FullCollection,
        );
        assert_eq!((r.tp, r.fp, r.fn_, r.tn), (0, 0, 1, 4));
    }

    #[test]
    fn test_convention_parsing_and_serde() {
        assert_eq!(
            "Full-Collection".parse::<LabelConvention>().unwrap(),
            LabelConvention::FullCollection
        );
        assert_eq!(
            "restricted".parse::<LabelConvention>().unwrap(),
            LabelConvention::Restricted
        );
        assert!("partial".parse::<LabelConvention>().is_err());
        assert_eq!(
            serde_json::to_string(&LabelConvention::FullCollection).unwrap(),
            "\"full_collection\""
        );
    }

    #[test]
    fn test_record_serializes_fn_key() {
        let r = EvalRecord::from_counts(1, 0, 1, 0, LabelConvention::FullCollection);
        let v = serde_json::to_value(r).unwrap();
        assert_eq!(v["fn"], 1);
        assert!(v.get("convention").is_none());
    }
}
