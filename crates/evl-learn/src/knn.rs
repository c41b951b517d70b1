//! k-nearest-neighbour classifier over training records.
//!
//! Features are min-max scaled with the bounds seen during training; a
//! feature that is constant in the training set contributes nothing to the
//! distance.  Prediction takes the `k` closest examples (ties: earlier
//! example first) and returns the most frequent `(hub, slot)` label, with
//! ties going to the smaller label.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use evl_core::{HubId, TimeSlot};

use crate::record::{FEATURES, TrainingRecord};
use crate::{LearnError, LearnResult};

/// Default neighbourhood size.
pub const DEFAULT_K: usize = 5;

/// A predicted `(hub, slot)` pair.  Ordered by hub, then slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Label {
    pub hub:  u32,
    pub slot: u8,
}

impl Label {
    pub fn hub_id(self) -> HubId {
        HubId(self.hub)
    }

    pub fn time_slot(self) -> TimeSlot {
        TimeSlot(self.slot)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Example {
    x:     [f64; FEATURES],
    label: Label,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KnnClassifier {
    k:        usize,
    lo:       [f64; FEATURES],
    hi:       [f64; FEATURES],
    examples: Vec<Example>,
}

impl KnnClassifier {
    /// Memorize `records`, scaled to their own bounds.
    pub fn fit(records: &[TrainingRecord], k: usize) -> LearnResult<Self> {
        if k == 0 {
            return Err(LearnError::InvalidK);
        }
        if records.is_empty() {
            return Err(LearnError::EmptyTraining);
        }
        let mut lo = [f64::INFINITY; FEATURES];
        let mut hi = [f64::NEG_INFINITY; FEATURES];
        for r in records {
            for (i, v) in r.features().into_iter().enumerate() {
                lo[i] = lo[i].min(v);
                hi[i] = hi[i].max(v);
            }
        }
        let mut model = Self { k, lo, hi, examples: Vec::with_capacity(records.len()) };
        model.examples = records
            .iter()
            .map(|r| Example {
                x:     model.scale(r.features()),
                label: Label { hub: r.hub_id, slot: r.slot_id },
            })
            .collect();
        debug!(examples = model.examples.len(), k, "knn classifier fitted");
        Ok(model)
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    fn scale(&self, x: [f64; FEATURES]) -> [f64; FEATURES] {
        let mut out = [0.0; FEATURES];
        for i in 0..FEATURES {
            let span = self.hi[i] - self.lo[i];
            out[i] = if span > 0.0 { (x[i] - self.lo[i]) / span } else { 0.0 };
        }
        out
    }

    /// Most common label among the `k` nearest examples.  `None` only for a
    /// model without examples (deserialized from a hand-edited file).
    pub fn predict(&self, features: [f64; FEATURES]) -> Option<Label> {
        let q = self.scale(features);
        let mut ranked: Vec<(f64, usize)> = self
            .examples
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let d: f64 = e.x.iter().zip(&q).map(|(a, b)| (a - b) * (a - b)).sum();
                (d, i)
            })
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut votes: BTreeMap<Label, usize> = BTreeMap::new();
        for &(_, i) in ranked.iter().take(self.k) {
            *votes.entry(self.examples[i].label).or_default() += 1;
        }
        // Ascending label order; strict > keeps the smaller label on ties.
        let mut best: Option<(Label, usize)> = None;
        for (label, n) in votes {
            if best.is_none_or(|(_, b)| n > b) {
                best = Some((label, n));
            }
        }
        best.map(|(label, _)| label)
    }

    // ── Persistence ───────────────────────────────────────────────────────

    pub fn to_json(&self) -> LearnResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| LearnError::Model(e.to_string()))
    }

    pub fn from_json(json: &str) -> LearnResult<Self> {
        let model: Self = serde_json::from_str(json).map_err(|e| LearnError::Model(e.to_string()))?;
        if model.k == 0 {
            return Err(LearnError::InvalidK);
        }
        Ok(model)
    }

    pub fn save_json(&self, path: &Path) -> LearnResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load_json(path: &Path) -> LearnResult<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}
