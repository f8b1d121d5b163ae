//! rsmind: mind-map dataset toolkit.
//!
//! A mind map is a labeled tree: every node carries display text, ordered
//! children, and optional free-text relations. This crate owns the pieces
//! shared by data preparation and evaluation:
//!
//! - the tree model and its normalizer ([`model`], [`normalize`]),
//! - the tag-delimited token codec with recovery-aware decoding ([`codec`]),
//! - structural queries ([`query`]) and spatial grounding ([`spatial`]),
//! - the JSONL record types and label generators ([`records`], [`tasks`]),
//! - the batch evaluation driver ([`eval`]).
//!
//! Rendering, corpus management, and the tree-edit-distance evaluator are
//! external collaborators; they exchange trees and box lists through the
//! types defined here.

pub mod cli;
pub mod codec;
pub mod config;
pub mod errors;
pub mod eval;
pub mod model;
pub mod normalize;
pub mod prompts;
pub mod query;
pub mod records;
pub mod spatial;
pub mod tasks;
pub mod util;

pub use codec::{encode, Decoder, Encoder, Fragment};
pub use errors::{MapError, MapResult};
pub use model::{clean_text, MindMap, Node};
pub use normalize::prune;
pub use spatial::{BBox, BoxIndex};
