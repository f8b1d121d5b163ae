//! Positional labels: questions grounded in per-image bounding boxes, plus
//! region-scoped parsing.

use std::path::Path;

use clap::ValueEnum;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{instrument, warn};

use crate::codec;
use crate::config::Settings;
use crate::model::MindMap;
use crate::prompts::{self, Lang};
use crate::query;
use crate::records::{AnnotationRecord, LabelRecord};
use crate::spatial::{self, BBox, BoxIndex};
use crate::tasks::render_list;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PosType {
    /// Box-grounded question/answer pairs
    Vqa,
    /// Parse the subtree inside a region
    Parse,
}

/// Question kinds in prompt-pool order: recognition by box first, grounding
/// by label second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosQuestion {
    TextInBox,
    LevelInBox,
    ParentInBox,
    ChildrenInBox,
    ParentChildBoxes,
    SiblingBoxes,
    CountInBox,
    BoxOfNode,
    ParentWithBox,
    ChildrenWithBoxes,
    SubtreeBox,
}

impl PosQuestion {
    pub const ALL: [PosQuestion; 11] = [
        PosQuestion::TextInBox,
        PosQuestion::LevelInBox,
        PosQuestion::ParentInBox,
        PosQuestion::ChildrenInBox,
        PosQuestion::ParentChildBoxes,
        PosQuestion::SiblingBoxes,
        PosQuestion::CountInBox,
        PosQuestion::BoxOfNode,
        PosQuestion::ParentWithBox,
        PosQuestion::ChildrenWithBoxes,
        PosQuestion::SubtreeBox,
    ];
}

/// Generates positional labels. The spatial index for an image is expected
/// at `{boxes_dir}/{image stem}.json`; images without one are skipped with a
/// warning rather than failing the batch.
#[instrument(level = "debug", skip(annotations, settings, rng))]
pub fn generate<R: Rng>(
    annotations: &[AnnotationRecord],
    pos_type: PosType,
    boxes_dir: &Path,
    settings: &Settings,
    rng: &mut R,
) -> Vec<LabelRecord> {
    let mut labels = Vec::new();
    for anno in annotations {
        let Some(map) = anno.mind_map() else {
            warn!("skipping {}: no usable tree", anno.image);
            continue;
        };
        let map = map.cleaned();
        let lang = Lang::from_image_path(&anno.image);
        let index = match load_index(boxes_dir, &anno.image) {
            Ok(index) => index,
            Err(e) => {
                warn!("skipping {}: {}", anno.image, e);
                continue;
            }
        };

        for _ in 0..settings.questions_per_sample {
            let label = match pos_type {
                PosType::Parse => parse_label(&map, &index, lang, &anno.image, rng),
                PosType::Vqa => vqa_label(&map, &index, lang, &anno.image, settings, rng),
            };
            if let Some(label) = label {
                labels.push(label);
            }
        }
    }
    labels
}

fn load_index(boxes_dir: &Path, image: &str) -> crate::errors::MapResult<BoxIndex> {
    let stem = Path::new(image)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    BoxIndex::load(&boxes_dir.join(format!("{stem}.json")))
}

/// Region-scoped parse: the union box of a random subtree becomes the
/// prompt, the re-rooted subtree sequence the answer.
fn parse_label<R: Rng>(
    map: &MindMap,
    index: &BoxIndex,
    lang: Lang,
    image: &str,
    rng: &mut R,
) -> Option<LabelRecord> {
    let theme = query::random_node(map, None, rng)?;
    let region = spatial::subtree_region(map, &theme, index)?;
    let subtree = query::extract_subtree(map, &theme)?;
    let prompt = prompts::pos_parse(lang)
        .choose(rng)
        .copied()
        .unwrap_or_default()
        .replace("[content]", &region.to_string());
    Some(LabelRecord::qa(image, &prompt, &codec::encode(&subtree)))
}

fn bbox_tag(bbox: Option<BBox>) -> String {
    match bbox {
        Some(b) => format!("<bbox>{b}</bbox>"),
        None => "<bbox></bbox>".to_string(),
    }
}

fn vqa_label<R: Rng>(
    map: &MindMap,
    index: &BoxIndex,
    lang: Lang,
    image: &str,
    settings: &Settings,
    rng: &mut R,
) -> Option<LabelRecord> {
    let kind = PosQuestion::ALL[rng.gen_range(0..PosQuestion::ALL.len())];
    let node1 = query::random_node(map, None, rng)?;
    let box1 = index.find(&node1);
    let box1_str = box1.map(|b| b.to_string()).unwrap_or_default();
    let template = prompts::pos_vqa(lang)[kind as usize];

    let (prompt, answer) = match kind {
        PosQuestion::TextInBox => (template.replace("[content]", &box1_str), node1.clone()),
        PosQuestion::LevelInBox => {
            let answer = match query::find_level(map, &node1) {
                Some(level) => (level + 1).to_string(),
                None => "None".to_string(),
            };
            (template.replace("[content]", &box1_str), answer)
        }
        PosQuestion::ParentInBox => (
            template.replace("[content]", &box1_str),
            query::find_parent(map, &node1).unwrap_or_else(|| "None".to_string()),
        ),
        PosQuestion::ChildrenInBox => {
            let children = query::find_children(map, &node1);
            let answer = if children.is_empty() {
                "None".to_string()
            } else {
                render_list(&children)
            };
            (template.replace("[content]", &box1_str), answer)
        }
        PosQuestion::ParentChildBoxes | PosQuestion::SiblingBoxes => {
            let node2 = query::random_node(map, None, rng)?;
            let box2_str = index.find(&node2).map(|b| b.to_string()).unwrap_or_default();
            let related = match kind {
                PosQuestion::ParentChildBoxes => {
                    query::is_parent_child(map, &node1, &node2)
                        || query::is_parent_child(map, &node2, &node1)
                }
                _ => query::are_siblings(map, &node1, &node2),
            };
            let answer = if related { lang.yes() } else { lang.no() };
            (
                template
                    .replace("[content1]", &box1_str)
                    .replace("[content2]", &box2_str),
                answer.to_string(),
            )
        }
        PosQuestion::CountInBox => {
            let node2 = query::random_node(map, None, rng)?;
            let region = BBox::union([box1?, index.find(&node2)?])?;
            let count = index.count_in_region(&region, settings.overlap_threshold);
            (
                template.replace("[content]", &region.to_string()),
                count.to_string(),
            )
        }
        PosQuestion::BoxOfNode => (template.replace("[content]", &node1), bbox_tag(box1)),
        PosQuestion::ParentWithBox => {
            let answer = match query::find_parent(map, &node1) {
                Some(parent) => {
                    let parent_box = index.find(&parent);
                    format!("{parent}{}", bbox_tag(parent_box))
                }
                None => "None".to_string(),
            };
            (template.replace("[content]", &node1), answer)
        }
        PosQuestion::ChildrenWithBoxes => {
            let grounded: Vec<String> = query::find_children(map, &node1)
                .into_iter()
                .filter_map(|child| {
                    index
                        .find(&child)
                        .map(|b| format!("{child} <bbox>{b}</bbox>"))
                })
                .collect();
            let answer = if grounded.is_empty() {
                "None".to_string()
            } else {
                render_list(&grounded)
            };
            (template.replace("[content]", &node1), answer)
        }
        PosQuestion::SubtreeBox => {
            let region = spatial::subtree_region(map, &node1, index)?;
            (
                template.replace("[content]", &node1),
                format!("<bbox>{region}</bbox>"),
            )
        }
    };
    Some(LabelRecord::qa(image, &prompt, &answer))
}
