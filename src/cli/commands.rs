//! Command dispatch: wires CLI arguments to the library.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::{Command, CommandFactory};
use clap_complete::{generate, Generator};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, PrepareCommands};
use crate::codec::Decoder;
use crate::config::Settings;
use crate::errors::{MapError, MapResult};
use crate::eval::{self, FieldOverlapScorer};
use crate::records::{
    collect_annotations, filter_easy, load_jsonl, save_jsonl, split_annotations, AnnotationFile,
};
use crate::tasks::{parse, pos, structured};

pub fn execute_command(cli: &Cli) -> MapResult<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    let mut rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    match &cli.command {
        Some(Commands::Prepare { command }) => match command {
            PrepareCommands::Structured { annotations, out } => {
                let file = AnnotationFile::load(annotations)?;
                let labels = structured::generate(&file.annotations, &settings, &mut rng);
                save_jsonl(&labels, out)?;
                println!("save {} samples to {}", labels.len(), out.display());
                Ok(())
            }
            PrepareCommands::Parse {
                annotations,
                parse_type,
                out,
            } => {
                let file = AnnotationFile::load(annotations)?;
                let labels = parse::generate(&file.annotations, *parse_type, &mut rng);
                save_jsonl(&labels, out)?;
                println!("save {} samples to {}", labels.len(), out.display());
                Ok(())
            }
            PrepareCommands::Pos {
                annotations,
                boxes_dir,
                pos_type,
                out,
            } => {
                let file = AnnotationFile::load(annotations)?;
                let labels =
                    pos::generate(&file.annotations, *pos_type, boxes_dir, &settings, &mut rng);
                save_jsonl(&labels, out)?;
                println!("save {} samples to {}", labels.len(), out.display());
                Ok(())
            }
        },
        Some(Commands::Evaluate { results, vqa, out }) => _evaluate(results, *vqa, out.as_deref()),
        Some(Commands::Inspect { sequence, file }) => _inspect(sequence.as_deref(), file.as_deref()),
        Some(Commands::Collect {
            anno_dir,
            image_prefix,
            image_ext,
            out,
        }) => {
            let file = collect_annotations(anno_dir, image_prefix, image_ext)?;
            file.save(out)?;
            println!(
                "collected {} annotations to {}",
                file.annotations.len(),
                out.display()
            );
            Ok(())
        }
        Some(Commands::Split { annotations }) => {
            let file = AnnotationFile::load(annotations)?;
            let (train, test) =
                split_annotations(file.annotations, settings.train_ratio, &mut rng);
            let train_path = sibling(annotations, "_train");
            let test_path = sibling(annotations, "_test");
            AnnotationFile { annotations: train }.save(&train_path)?;
            AnnotationFile { annotations: test }.save(&test_path)?;
            println!("wrote {} and {}", train_path.display(), test_path.display());
            Ok(())
        }
        Some(Commands::Filter { annotations, out }) => {
            let file = AnnotationFile::load(annotations)?;
            let total = file.annotations.len();
            let easy = filter_easy(file.annotations, settings.node_budget);
            println!("easy: {} diff: {}", easy.len(), total - easy.len());
            AnnotationFile { annotations: easy }.save(out)?;
            Ok(())
        }
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            print_completions(*shell, &mut cmd);
            Ok(())
        }
        None => Ok(()),
    }
}

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

/// `annotations.json` -> `annotations_train.json`
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("annotations");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
    path.with_file_name(format!("{stem}{suffix}.{ext}"))
}

#[instrument(level = "debug")]
fn _evaluate(results: &Path, vqa: bool, out: Option<&Path>) -> MapResult<()> {
    let records = load_jsonl(results)?;
    debug!("loaded {} result records", records.len());

    let vqa = vqa
        || results
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(false, |n| n.contains("_vqa"));

    if vqa {
        let report = eval::evaluate_vqa(&records);
        println!(
            "Total number of samples: {}, match rate: {:.4}, F1: {:.4}",
            report.matches.len(),
            report.match_rate,
            report.f1_accuracy
        );
        return Ok(());
    }

    let report = eval::evaluate_parse(&records, &FieldOverlapScorer);
    println!("{}", eval::summarize(&report));
    let out = out.map(Path::to_path_buf).unwrap_or_else(|| {
        results
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("output.json")
    });
    report.save(&out)?;
    println!("wrote {}", out.display());
    Ok(())
}

#[instrument(level = "debug")]
fn _inspect(sequence: Option<&str>, file: Option<&Path>) -> MapResult<()> {
    let raw = match (sequence, file) {
        (Some(seq), _) => seq.to_string(),
        (None, Some(path)) => fs::read_to_string(path).map_err(MapError::FileReadError)?,
        (None, None) => {
            return Err(MapError::InternalError(
                "pass a sequence or --file".to_string(),
            ))
        }
    };

    let decoder = Decoder::new();
    match decoder.decode_map(raw.trim()) {
        Some(map) => println!("{map}"),
        None => println!("no map structure recovered from input"),
    }
    Ok(())
}
