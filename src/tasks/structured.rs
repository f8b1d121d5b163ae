//! Structural VQA labels: seven question kinds over the tree alone.

use rand::Rng;
use tracing::{instrument, warn};

use crate::config::Settings;
use crate::model::MindMap;
use crate::prompts::{self, Lang};
use crate::query;
use crate::records::{AnnotationRecord, LabelRecord};
use crate::tasks::render_list;

/// Question kinds in prompt-pool order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuredQuestion {
    RootTheme,
    Parent,
    Children,
    Level,
    NodesAtLevel,
    ParentChild,
    Siblings,
}

impl StructuredQuestion {
    pub const ALL: [StructuredQuestion; 7] = [
        StructuredQuestion::RootTheme,
        StructuredQuestion::Parent,
        StructuredQuestion::Children,
        StructuredQuestion::Level,
        StructuredQuestion::NodesAtLevel,
        StructuredQuestion::ParentChild,
        StructuredQuestion::Siblings,
    ];
}

/// Builds one prompt/answer pair for the given question kind. Target nodes
/// are sampled from the map; a question that cannot be posed (empty map)
/// yields `None`.
///
/// Levels are 0-based internally and 1-based in the rendered text; missing
/// answers render as the literal "None".
pub fn question_answer<R: Rng>(
    map: &MindMap,
    kind: StructuredQuestion,
    lang: Lang,
    settings: &Settings,
    rng: &mut R,
) -> Option<(String, String)> {
    let node1 = query::random_node(map, None, rng)?;
    let node2 = query::random_node(map, None, rng)?;
    let template = prompts::structured(lang)[kind as usize];

    let pair = match kind {
        StructuredQuestion::RootTheme => {
            (template.to_string(), query::root_theme(map).to_string())
        }
        StructuredQuestion::Parent => (
            template.replace("[content]", &node1),
            query::find_parent(map, &node1).unwrap_or_else(|| "None".to_string()),
        ),
        StructuredQuestion::Children => {
            let children = query::find_children(map, &node1);
            let answer = if children.is_empty() {
                "None".to_string()
            } else {
                render_list(&children)
            };
            (template.replace("[content]", &node1), answer)
        }
        StructuredQuestion::Level => {
            let answer = match query::find_level(map, &node1) {
                Some(level) => (level + 1).to_string(),
                None => "None".to_string(),
            };
            (template.replace("[content]", &node1), answer)
        }
        StructuredQuestion::NodesAtLevel => {
            let level = rng.gen_range(0..=settings.max_level);
            let nodes = query::nodes_at_level(map, level);
            let answer = if nodes.is_empty() {
                "None".to_string()
            } else {
                render_list(&nodes)
            };
            (
                template.replace("[content]", &(level + 1).to_string()),
                answer,
            )
        }
        StructuredQuestion::ParentChild => {
            let related = query::is_parent_child(map, &node1, &node2)
                || query::is_parent_child(map, &node2, &node1);
            let answer = if related { lang.yes() } else { lang.no() };
            (
                template
                    .replace("[content1]", &node1)
                    .replace("[content2]", &node2),
                answer.to_string(),
            )
        }
        StructuredQuestion::Siblings => {
            let answer = if query::are_siblings(map, &node1, &node2) {
                lang.yes()
            } else {
                lang.no()
            };
            (
                template
                    .replace("[content1]", &node1)
                    .replace("[content2]", &node2),
                answer.to_string(),
            )
        }
    };
    Some(pair)
}

/// Generates structural QA labels for every annotation, one record per
/// question.
#[instrument(level = "debug", skip_all)]
pub fn generate<R: Rng>(
    annotations: &[AnnotationRecord],
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
        for _ in 0..settings.questions_per_sample {
            let kind = StructuredQuestion::ALL[rng.gen_range(0..StructuredQuestion::ALL.len())];
            if let Some((prompt, answer)) = question_answer(&map, kind, lang, settings, rng) {
                labels.push(LabelRecord::qa(&anno.image, &prompt, &answer));
            }
        }
    }
    labels
}
