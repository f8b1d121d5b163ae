//! Tests for the label generators.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::tempdir;

use rsmind::config::Settings;
use rsmind::model::{MindMap, Node};
use rsmind::prompts::Lang;
use rsmind::records::AnnotationRecord;
use rsmind::tasks::parse::{self, ParseType};
use rsmind::tasks::pos::{self, PosType};
use rsmind::tasks::structured::{self, StructuredQuestion};

fn wide_map() -> MindMap {
    MindMap::new(Node::with_children(
        "Root",
        vec![
            Node::with_children("A", vec![Node::new("B")]),
            Node::with_children("C", vec![Node::new("D"), Node::new("E")]),
        ],
    ))
}

fn annotations() -> Vec<AnnotationRecord> {
    vec![AnnotationRecord::new(&wide_map(), "synth/en_test/img/0.jpg")]
}

fn settings() -> Settings {
    Settings::default()
}

// ============================================================
// Structured QA
// ============================================================

#[test]
fn given_root_theme_question_then_answer_is_root_text() {
    let mut rng = StdRng::seed_from_u64(1);
    let (prompt, answer) = structured::question_answer(
        &wide_map(),
        StructuredQuestion::RootTheme,
        Lang::En,
        &settings(),
        &mut rng,
    )
    .unwrap();
    assert!(prompt.contains("central theme"));
    assert_eq!(answer, "Root");
}

#[test]
fn given_parent_question_then_prompt_names_the_node_and_answer_its_parent() {
    let mut rng = StdRng::seed_from_u64(2);
    let (prompt, answer) = structured::question_answer(
        &wide_map(),
        StructuredQuestion::Parent,
        Lang::En,
        &settings(),
        &mut rng,
    )
    .unwrap();
    let node = prompt.split('"').nth(1).unwrap();
    match node {
        "Root" => assert_eq!(answer, "None"),
        "A" | "C" => assert_eq!(answer, "Root"),
        "B" => assert_eq!(answer, "A"),
        "D" | "E" => assert_eq!(answer, "C"),
        other => panic!("unexpected sampled node {other}"),
    }
}

#[test]
fn given_level_question_then_rendered_level_is_one_based() {
    let mut rng = StdRng::seed_from_u64(3);
    let (prompt, answer) = structured::question_answer(
        &wide_map(),
        StructuredQuestion::Level,
        Lang::En,
        &settings(),
        &mut rng,
    )
    .unwrap();
    let node = prompt.split('"').nth(1).unwrap();
    let expected = match node {
        "Root" => "1",
        "A" | "C" => "2",
        _ => "3",
    };
    assert_eq!(answer, expected);
}

#[test]
fn given_relation_questions_then_answers_are_yes_or_no_words() {
    let mut rng = StdRng::seed_from_u64(4);
    for kind in [StructuredQuestion::ParentChild, StructuredQuestion::Siblings] {
        let (_, answer) =
            structured::question_answer(&wide_map(), kind, Lang::En, &settings(), &mut rng)
                .unwrap();
        assert!(answer == "Yes" || answer == "No");

        let (_, answer) =
            structured::question_answer(&wide_map(), kind, Lang::Cn, &settings(), &mut rng)
                .unwrap();
        assert!(answer == "是" || answer == "否");
    }
}

#[test]
fn given_annotations_when_generating_structured_labels_then_three_turn_shape() {
    let mut rng = StdRng::seed_from_u64(5);
    let labels = structured::generate(&annotations(), &settings(), &mut rng);
    assert_eq!(labels.len(), 1);
    let label = &labels[0];
    assert_eq!(label.image, vec!["synth/en_test/img/0.jpg"]);
    assert_eq!(label.task_type, "qa_sft");
    assert_eq!(label.conversations.len(), 3);
    assert_eq!(label.conversations[0].value, "<image>");
    assert_eq!(label.conversations[2].from, "assistant");
}

// ============================================================
// Parse labels
// ============================================================

#[test]
fn given_full_parse_when_generating_then_answer_is_the_encoded_map() {
    let mut rng = StdRng::seed_from_u64(6);
    let labels = parse::generate(&annotations(), ParseType::Full, &mut rng);
    assert_eq!(labels.len(), 1);
    let answer = &labels[0].conversations[2].value;
    assert!(answer.starts_with("<s_map><s_node-0><s_text>Root</s_text>"));
    assert!(answer.ends_with("</s_node-0></s_map>"));
}

#[test]
fn given_part_parse_when_generating_then_answer_reroots_the_subtree() {
    let mut rng = StdRng::seed_from_u64(7);
    let labels = parse::generate(&annotations(), ParseType::Part, &mut rng);
    assert_eq!(labels.len(), 1);
    let answer = &labels[0].conversations[2].value;
    // whichever node was sampled, the sequence restarts at node-0
    assert!(answer.starts_with("<s_map><s_node-0><s_text>"));
    assert!(!answer.contains("node-3"));
}

// ============================================================
// Positional labels
// ============================================================

fn write_boxes(dir: &std::path::Path) {
    std::fs::write(
        dir.join("0.json"),
        r#"[
            {"label": "Root", "xyxy": "0,0,100,20"},
            {"label": "A", "xyxy": "0,40,40,60"},
            {"label": "B", "xyxy": "0,80,40,100"},
            {"label": "C", "xyxy": "60,40,100,60"},
            {"label": "D", "xyxy": "60,80,100,100"},
            {"label": "E", "xyxy": "60,120,100,140"}
        ]"#,
    )
    .unwrap();
}

#[test]
fn given_box_index_when_generating_pos_parse_then_prompt_carries_the_region() {
    let dir = tempdir().unwrap();
    write_boxes(dir.path());
    let mut rng = StdRng::seed_from_u64(8);

    let labels = pos::generate(
        &annotations(),
        PosType::Parse,
        dir.path(),
        &settings(),
        &mut rng,
    );
    assert_eq!(labels.len(), 1);
    let prompt = &labels[0].conversations[1].value;
    assert!(prompt.contains("<bbox>"));
    let answer = &labels[0].conversations[2].value;
    assert!(answer.starts_with("<s_map><s_node-0>"));
}

#[test]
fn given_box_index_when_generating_pos_vqa_then_labels_build() {
    let dir = tempdir().unwrap();
    write_boxes(dir.path());
    let mut rng = StdRng::seed_from_u64(9);
    let mut settings = settings();
    settings.questions_per_sample = 16;

    let labels = pos::generate(
        &annotations(),
        PosType::Vqa,
        dir.path(),
        &settings,
        &mut rng,
    );
    assert!(!labels.is_empty());
    for label in &labels {
        assert_eq!(label.conversations.len(), 3);
        assert!(!label.conversations[2].value.is_empty());
    }
}

#[test]
fn given_missing_box_file_when_generating_pos_then_image_is_skipped() {
    let dir = tempdir().unwrap();
    let mut rng = StdRng::seed_from_u64(10);
    let labels = pos::generate(
        &annotations(),
        PosType::Vqa,
        dir.path(),
        &settings(),
        &mut rng,
    );
    assert!(labels.is_empty());
}
