//! Spatial grounding: binds node text to pixel bounding boxes supplied per
//! image and answers region questions over them.
//!
//! The binder never owns geometry beyond the box list it was given; boxes
//! come from the `{label, xyxy}` records the renderer writes next to each
//! image.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::errors::{MapError, MapResult};
use crate::model::{clean_text, MindMap};
use crate::query;

/// Axis-aligned box in image pixel space, `x1 < x2`, `y1 < y2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BBox {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
}

impl BBox {
    pub fn new(x1: i64, y1: i64, x2: i64, y2: i64) -> Self {
        BBox { x1, y1, x2, y2 }
    }

    /// Parses the comma-joined `"x1,y1,x2,y2"` form of the spatial index
    /// files.
    pub fn parse(raw: &str) -> MapResult<BBox> {
        let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(MapError::InvalidBox {
                raw: raw.to_string(),
                reason: format!("expected 4 coordinates, got {}", parts.len()),
            });
        }
        let mut coords = [0i64; 4];
        for (slot, part) in coords.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| MapError::InvalidBox {
                raw: raw.to_string(),
                reason: format!("'{part}' is not an integer"),
            })?;
        }
        Ok(BBox::new(coords[0], coords[1], coords[2], coords[3]))
    }

    pub fn area(&self) -> i64 {
        (self.x2 - self.x1).max(0) * (self.y2 - self.y1).max(0)
    }

    /// Componentwise min/max over all boxes; `None` for an empty input.
    pub fn union<I: IntoIterator<Item = BBox>>(boxes: I) -> Option<BBox> {
        boxes.into_iter().reduce(|acc, b| BBox {
            x1: acc.x1.min(b.x1),
            y1: acc.y1.min(b.y1),
            x2: acc.x2.max(b.x2),
            y2: acc.y2.max(b.y2),
        })
    }

    pub fn intersection_area(&self, other: &BBox) -> i64 {
        let w = self.x2.min(other.x2) - self.x1.max(other.x1);
        let h = self.y2.min(other.y2) - self.y1.max(other.y1);
        w.max(0) * h.max(0)
    }

    /// Fraction of this box covered by `other` (asymmetric). A degenerate
    /// zero-area box yields 0.0.
    pub fn intersection_over_self(&self, other: &BBox) -> f64 {
        let area = self.area();
        if area == 0 {
            return 0.0;
        }
        self.intersection_area(other) as f64 / area as f64
    }

    /// Region-membership predicate: at least `threshold` of this box lies
    /// inside `region`.
    pub fn is_within(&self, region: &BBox, threshold: f64) -> bool {
        self.intersection_over_self(region) >= threshold
    }
}

impl fmt::Display for BBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.x1, self.y1, self.x2, self.y2)
    }
}

/// One record of the per-image spatial index file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledBox {
    pub label: String,
    pub xyxy: String,
}

/// Per-image label-to-box binding. Labels are cleaned on ingestion with the
/// same cleaning applied to tree text, so lookups compare like with like.
#[derive(Debug, Clone, Default)]
pub struct BoxIndex {
    entries: Vec<(String, BBox)>,
}

impl BoxIndex {
    pub fn from_records(records: &[LabeledBox]) -> MapResult<BoxIndex> {
        let mut entries = Vec::with_capacity(records.len());
        for record in records {
            entries.push((clean_text(&record.label), BBox::parse(&record.xyxy)?));
        }
        Ok(BoxIndex { entries })
    }

    #[instrument(level = "debug")]
    pub fn load(path: &Path) -> MapResult<BoxIndex> {
        let file = File::open(path).map_err(MapError::FileReadError)?;
        let records: Vec<LabeledBox> = serde_json::from_reader(BufReader::new(file))?;
        Self::from_records(&records)
    }

    /// Box of the first entry whose cleaned label equals the cleaned query
    /// text; duplicate labels resolve to the first match.
    pub fn find(&self, text: &str) -> Option<BBox> {
        let wanted = clean_text(text);
        self.entries
            .iter()
            .find(|(label, _)| *label == wanted)
            .map(|(_, bbox)| *bbox)
    }

    /// Number of indexed boxes lying within `region` per the membership
    /// predicate.
    pub fn count_in_region(&self, region: &BBox, threshold: f64) -> usize {
        self.entries
            .iter()
            .filter(|(_, bbox)| bbox.is_within(region, threshold))
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Union of the boxes bound to the target's subtree texts, skipping texts
/// without a box. `None` when the target is absent or nothing is bound.
pub fn subtree_region(map: &MindMap, target: &str, index: &BoxIndex) -> Option<BBox> {
    let texts = query::collect_subtree_texts(map, target);
    BBox::union(texts.iter().filter_map(|text| index.find(text)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_malformed_xyxy_when_parsing_then_invalid_box_error() {
        assert!(BBox::parse("1,2,3").is_err());
        assert!(BBox::parse("1,2,three,4").is_err());
        assert_eq!(BBox::parse(" 1, 2 ,3,4 ").unwrap(), BBox::new(1, 2, 3, 4));
    }

    #[test]
    fn given_degenerate_box_when_measuring_overlap_then_ratio_is_zero() {
        let degenerate = BBox::new(5, 5, 5, 5);
        let other = BBox::new(0, 0, 10, 10);
        assert_eq!(degenerate.intersection_over_self(&other), 0.0);
    }
}
