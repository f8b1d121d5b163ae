//! Line-delimited JSON records exchanged with the surrounding pipeline:
//! annotation files, training labels, model outputs, and score reports.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};
use walkdir::WalkDir;

use crate::errors::{MapError, MapResult};
use crate::model::{MindMap, Node};
use crate::query;

/// One conversation turn of a label record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub from: String,
    pub value: String,
}

impl Turn {
    pub fn user(value: impl Into<String>) -> Self {
        Turn {
            from: "user".to_string(),
            value: value.into(),
        }
    }

    pub fn assistant(value: impl Into<String>) -> Self {
        Turn {
            from: "assistant".to_string(),
            value: value.into(),
        }
    }
}

/// One training/evaluation example: an image turn, a prompt turn, and the
/// assistant turn holding the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRecord {
    pub image: Vec<String>,
    pub prompt: String,
    pub text: String,
    pub system_instruction: String,
    pub conversations: Vec<Turn>,
    pub task_type: String,
}

impl LabelRecord {
    /// The three-turn QA shape shared by every generator.
    pub fn qa(image: &str, prompt: &str, answer: &str) -> Self {
        LabelRecord {
            image: vec![image.to_string()],
            prompt: String::new(),
            text: String::new(),
            system_instruction: String::new(),
            conversations: vec![
                Turn::user("<image>"),
                Turn::user(prompt),
                Turn::assistant(answer),
            ],
            task_type: "qa_sft".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundTruth {
    pub gt_parse: Value,
}

/// One annotated image: the parsed tree plus the image path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub ground_truth: GroundTruth,
    pub image: String,
}

impl AnnotationRecord {
    pub fn new(map: &MindMap, image: impl Into<String>) -> Self {
        AnnotationRecord {
            ground_truth: GroundTruth {
                gt_parse: map.to_tagged_value(),
            },
            image: image.into(),
        }
    }

    /// Reads the annotated tree; `None` when the record carries no usable
    /// `map > node-0` structure.
    pub fn mind_map(&self) -> Option<MindMap> {
        MindMap::from_value(&self.ground_truth.gt_parse)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnotationFile {
    pub annotations: Vec<AnnotationRecord>,
}

impl AnnotationFile {
    #[instrument(level = "debug")]
    pub fn load(path: &Path) -> MapResult<AnnotationFile> {
        let file = File::open(path).map_err(MapError::FileReadError)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn save(&self, path: &Path) -> MapResult<()> {
        let file = File::create(path).map_err(MapError::FileReadError)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}

/// One line of an evaluation result file. Every field defaults so a sparse
/// or malformed line degrades to an empty answer instead of aborting the
/// batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelOutputRecord {
    #[serde(default)]
    pub image: Vec<String>,
    #[serde(default)]
    pub conversations: Vec<Turn>,
    #[serde(default)]
    pub model_answer: String,
}

impl ModelOutputRecord {
    /// Ground truth sits at the third turn's value.
    pub fn ground_truth_text(&self) -> Option<&str> {
        self.conversations.get(2).map(|turn| turn.value.as_str())
    }
}

/// Aggregate scoring output for a parse-task evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    pub ted_accuracies: Vec<f64>,
    pub ted_accuracy: f64,
    pub f1_accuracy: f64,
    pub predictions: Vec<Value>,
    pub ground_truths: Vec<Value>,
}

impl ScoreReport {
    pub fn save(&self, path: &Path) -> MapResult<()> {
        let file = File::create(path).map_err(MapError::FileReadError)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}

/// Writes one JSON object per line.
#[instrument(level = "debug", skip(records))]
pub fn save_jsonl<T: Serialize>(records: &[T], path: &Path) -> MapResult<()> {
    let file = File::create(path).map_err(MapError::FileReadError)?;
    let mut writer = BufWriter::new(file);
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    debug!("saved {} records to {}", records.len(), path.display());
    Ok(())
}

/// Reads one JSON object per line, skipping blank lines.
#[instrument(level = "debug")]
pub fn load_jsonl<T: DeserializeOwned>(path: &Path) -> MapResult<Vec<T>> {
    let file = File::open(path).map_err(MapError::FileReadError)?;
    let mut records = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(MapError::FileReadError)?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line)?);
    }
    Ok(records)
}

/// Assembles an annotation file from a directory of per-image tree JSON
/// files (pre-tagged or depth-tagged form). The image path is derived from
/// the file stem: `{image_prefix}/{stem}.{image_ext}`.
#[instrument(level = "debug")]
pub fn collect_annotations(
    anno_dir: &Path,
    image_prefix: &str,
    image_ext: &str,
) -> MapResult<AnnotationFile> {
    if !anno_dir.is_dir() {
        return Err(MapError::FileNotFound(anno_dir.to_path_buf()));
    }
    let mut annotations = Vec::new();
    for entry in WalkDir::new(anno_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| MapError::InternalError(e.to_string()))?;
        if !entry.file_type().is_file()
            || entry.path().extension().and_then(|e| e.to_str()) != Some("json")
        {
            continue;
        }
        let file = File::open(entry.path()).map_err(MapError::FileReadError)?;
        let value: Value = serde_json::from_reader(BufReader::new(file))?;
        let map = MindMap::from_value(&value)
            .unwrap_or_else(|| MindMap::new(Node::from_value(&value)));
        let stem = entry
            .path()
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        let image = format!("{image_prefix}/{stem}.{image_ext}");
        annotations.push(AnnotationRecord::new(&map, image));
    }
    if annotations.is_empty() {
        return Err(MapError::NoAnnotations(anno_dir.to_path_buf()));
    }
    Ok(AnnotationFile { annotations })
}

/// Shuffles and splits annotations into train/test partitions.
pub fn split_annotations<R: Rng>(
    mut annotations: Vec<AnnotationRecord>,
    train_ratio: f64,
    rng: &mut R,
) -> (Vec<AnnotationRecord>, Vec<AnnotationRecord>) {
    annotations.shuffle(rng);
    let train_size = (annotations.len() as f64 * train_ratio) as usize;
    let test = annotations.split_off(train_size.min(annotations.len()));
    (annotations, test)
}

/// Keeps maps small enough for evaluation: at most `node_budget` nodes.
pub fn filter_easy(
    annotations: Vec<AnnotationRecord>,
    node_budget: usize,
) -> Vec<AnnotationRecord> {
    annotations
        .into_iter()
        .filter(|anno| {
            anno.mind_map()
                .map_or(false, |map| query::count_nodes(&map.root) <= node_budget)
        })
        .collect()
}
