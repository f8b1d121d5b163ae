//! Batch evaluation of generated sequences against ground truth.
//!
//! Decoding is recovery-aware and total, so a malformed prediction degrades
//! to a low score instead of halting the run. Records are independent, so
//! the batch fans out with rayon.

use itertools::Itertools;
use rayon::prelude::*;
use tracing::instrument;

use crate::codec::Decoder;
use crate::model::{clean_text, MindMap, Node};
use crate::normalize;
use crate::records::{ModelOutputRecord, ScoreReport};

/// External scoring seam. The tree-edit-distance accuracy and field-level F1
/// algorithms live behind this trait; the driver only needs decoded tree
/// pairs.
pub trait Scorer: Sync {
    /// Per-example accuracy in `[0, 1]` for one prediction/ground-truth pair.
    fn accuracy(&self, prediction: &MindMap, ground_truth: &MindMap) -> f64;

    /// Aggregate field-level F1 over the whole batch.
    fn field_f1(&self, pairs: &[(MindMap, MindMap)]) -> f64;
}

/// Default scorer: per-example exact match and a micro-averaged F1 over the
/// bag of node texts and relations. A stand-in for the external evaluator,
/// adequate for smoke-testing a result file.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldOverlapScorer;

fn field_bag(node: &Node, bag: &mut Vec<String>) {
    bag.push(node.text.clone());
    bag.extend(node.relations.iter().cloned());
    for child in &node.children {
        field_bag(child, bag);
    }
}

fn bag_overlap(pred: &MindMap, truth: &MindMap) -> (usize, usize, usize) {
    let mut pred_fields = Vec::new();
    let mut truth_fields = Vec::new();
    field_bag(&pred.root, &mut pred_fields);
    field_bag(&truth.root, &mut truth_fields);

    let mut remaining = truth_fields.clone();
    let mut hits = 0;
    for field in &pred_fields {
        if let Some(pos) = remaining.iter().position(|f| f == field) {
            remaining.swap_remove(pos);
            hits += 1;
        }
    }
    (hits, pred_fields.len(), truth_fields.len())
}

impl Scorer for FieldOverlapScorer {
    fn accuracy(&self, prediction: &MindMap, ground_truth: &MindMap) -> f64 {
        if prediction == ground_truth {
            1.0
        } else {
            0.0
        }
    }

    fn field_f1(&self, pairs: &[(MindMap, MindMap)]) -> f64 {
        let (hits, predicted, expected) = pairs
            .iter()
            .map(|(pred, truth)| bag_overlap(pred, truth))
            .fold((0, 0, 0), |acc, x| (acc.0 + x.0, acc.1 + x.1, acc.2 + x.2));
        if predicted == 0 || expected == 0 {
            return 0.0;
        }
        let precision = hits as f64 / predicted as f64;
        let recall = hits as f64 / expected as f64;
        if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        }
    }
}

/// Cleans and decodes one generated sequence into a pruned document; the
/// empty document when no map structure could be recovered.
pub fn decode_prediction(decoder: &Decoder, raw: &str) -> MindMap {
    let cleaned = clean_text(raw);
    decoder
        .decode_map(&cleaned)
        .map(|map| normalize::prune(&map))
        .unwrap_or_default()
}

/// Parse-task evaluation: decode every prediction and its ground truth,
/// score pairwise, and aggregate.
#[instrument(level = "debug", skip_all, fields(records = records.len()))]
pub fn evaluate_parse<S: Scorer>(records: &[ModelOutputRecord], scorer: &S) -> ScoreReport {
    let decoder = Decoder::new();
    let pairs: Vec<(MindMap, MindMap)> = records
        .par_iter()
        .map(|record| {
            let prediction = decode_prediction(&decoder, &record.model_answer);
            let truth = record
                .ground_truth_text()
                .map(clean_text)
                .and_then(|gt| decoder.decode_map(&gt))
                .unwrap_or_default();
            (prediction, truth)
        })
        .collect();

    let ted_accuracies: Vec<f64> = pairs
        .par_iter()
        .map(|(pred, truth)| scorer.accuracy(pred, truth))
        .collect();
    let ted_accuracy = if ted_accuracies.is_empty() {
        0.0
    } else {
        ted_accuracies.iter().sum::<f64>() / ted_accuracies.len() as f64
    };

    ScoreReport {
        ted_accuracy,
        f1_accuracy: scorer.field_f1(&pairs),
        ted_accuracies,
        predictions: pairs.iter().map(|(p, _)| p.to_tagged_value()).collect(),
        ground_truths: pairs.iter().map(|(_, t)| t.to_tagged_value()).collect(),
    }
}

/// VQA-task evaluation summary.
#[derive(Debug, Clone, PartialEq)]
pub struct VqaReport {
    pub matches: Vec<bool>,
    pub match_rate: f64,
    pub f1_accuracy: f64,
}

/// VQA-task evaluation: exact match of cleaned answer strings. The reported
/// F1 treats the match list as predictions against an all-positive
/// reference, so precision is the match rate and recall is 1.
#[instrument(level = "debug", skip_all, fields(records = records.len()))]
pub fn evaluate_vqa(records: &[ModelOutputRecord]) -> VqaReport {
    let matches: Vec<bool> = records
        .iter()
        .map(|record| {
            let truth = record.ground_truth_text().unwrap_or_default();
            clean_text(&record.model_answer) == clean_text(truth)
        })
        .collect();

    let match_rate = if matches.is_empty() {
        0.0
    } else {
        matches.iter().filter(|m| **m).count() as f64 / matches.len() as f64
    };
    let f1_accuracy = if match_rate == 0.0 {
        0.0
    } else {
        2.0 * match_rate / (match_rate + 1.0)
    };

    VqaReport {
        matches,
        match_rate,
        f1_accuracy,
    }
}

/// One-line summary for terminal output.
pub fn summarize(report: &ScoreReport) -> String {
    format!(
        "Total number of samples: {}, TED-based accuracy: {:.4}, F1 accuracy: {:.4}",
        report.ted_accuracies.len(),
        report.ted_accuracy,
        report.f1_accuracy
    )
}

/// Renders the first few per-example accuracies for quick inspection.
pub fn preview_accuracies(report: &ScoreReport, limit: usize) -> String {
    report
        .ted_accuracies
        .iter()
        .take(limit)
        .map(|a| format!("{a:.2}"))
        .join(", ")
}
