//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::tasks::parse::ParseType;
use crate::tasks::pos::PosType;

/// Mind-map dataset toolkit: tree token codec, structural queries, spatial
/// grounding, and batch evaluation
#[derive(Parser, Debug)]
#[command(name = "rsmind")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file overriding the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate JSONL training labels from an annotation file
    Prepare {
        #[command(subcommand)]
        command: PrepareCommands,
    },

    /// Score a model result file (JSONL with model_answer per line)
    Evaluate {
        /// Result file to score
        #[arg(value_hint = ValueHint::FilePath)]
        results: PathBuf,

        /// Score answers as plain VQA strings instead of parse trees
        /// (default: inferred from a `_vqa` marker in the file name)
        #[arg(long)]
        vqa: bool,

        /// Report path (default: output.json next to the result file)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
    },

    /// Decode a token sequence and print the recovered tree
    Inspect {
        /// Sequence to decode; read from the file when absent
        sequence: Option<String>,

        /// File holding the sequence
        #[arg(long, value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Assemble an annotation file from a directory of per-image tree JSONs
    Collect {
        /// Directory of tree JSON files
        #[arg(value_hint = ValueHint::DirPath)]
        anno_dir: PathBuf,

        /// Path prefix recorded for each image
        #[arg(long, default_value = "img")]
        image_prefix: String,

        /// Image extension recorded for each image
        #[arg(long, default_value = "png")]
        image_ext: String,

        /// Output annotation file
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: PathBuf,
    },

    /// Shuffle and split an annotation file into train/test parts
    Split {
        /// Annotation file
        #[arg(value_hint = ValueHint::FilePath)]
        annotations: PathBuf,
    },

    /// Drop oversized maps from an annotation file
    Filter {
        /// Annotation file
        #[arg(value_hint = ValueHint::FilePath)]
        annotations: PathBuf,

        /// Output annotation file
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: PathBuf,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Prepare subcommands, one per label family
#[derive(Subcommand, Debug)]
pub enum PrepareCommands {
    /// Structural QA labels (parent/children/level/sibling questions)
    Structured {
        /// Annotation file
        #[arg(value_hint = ValueHint::FilePath)]
        annotations: PathBuf,

        /// Output JSONL file
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: PathBuf,
    },

    /// Token-sequence parse labels
    Parse {
        /// Annotation file
        #[arg(value_hint = ValueHint::FilePath)]
        annotations: PathBuf,

        /// Whole map or random subtree
        #[arg(long, value_enum, default_value = "full")]
        parse_type: ParseType,

        /// Output JSONL file
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: PathBuf,
    },

    /// Box-grounded labels (needs per-image spatial index files)
    Pos {
        /// Annotation file
        #[arg(value_hint = ValueHint::FilePath)]
        annotations: PathBuf,

        /// Directory of per-image {label, xyxy} JSON files
        #[arg(long, value_hint = ValueHint::DirPath)]
        boxes_dir: PathBuf,

        /// Question/answer pairs or region-scoped parsing
        #[arg(long, value_enum, default_value = "vqa")]
        pos_type: PosType,

        /// Output JSONL file
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: PathBuf,
    },
}
