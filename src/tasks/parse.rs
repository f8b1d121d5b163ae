//! Parsing labels: whole-map or random-subtree token sequences.

use clap::ValueEnum;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{instrument, warn};

use crate::codec;
use crate::prompts::{self, Lang};
use crate::query;
use crate::records::{AnnotationRecord, LabelRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ParseType {
    /// Encode the whole map
    Full,
    /// Extract a random subtree, re-root it, and encode that
    Part,
}

/// Generates one parse label per annotation.
#[instrument(level = "debug", skip(annotations, rng))]
pub fn generate<R: Rng>(
    annotations: &[AnnotationRecord],
    parse_type: ParseType,
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

        let label = match parse_type {
            ParseType::Full => {
                let prompt = prompts::parse_full(lang)
                    .choose(rng)
                    .copied()
                    .unwrap_or_default();
                LabelRecord::qa(&anno.image, prompt, &codec::encode(&map))
            }
            ParseType::Part => {
                let Some(theme) = query::random_node(&map, None, rng) else {
                    continue;
                };
                let Some(subtree) = query::extract_subtree(&map, &theme) else {
                    continue;
                };
                let prompt = prompts::parse_part(lang)
                    .choose(rng)
                    .copied()
                    .unwrap_or_default()
                    .replace("[content]", &theme);
                LabelRecord::qa(&anno.image, &prompt, &codec::encode(&subtree))
            }
        };
        labels.push(label);
    }
    labels
}
