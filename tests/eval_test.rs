//! Tests for the batch evaluation driver.

use tempfile::tempdir;

use rsmind::codec::{encode, Decoder};
use rsmind::eval::{
    decode_prediction, evaluate_parse, evaluate_vqa, FieldOverlapScorer, Scorer,
};
use rsmind::model::{MindMap, Node};
use rsmind::records::{ModelOutputRecord, Turn};

fn root_a_b() -> MindMap {
    MindMap::new(Node::with_children(
        "Root",
        vec![Node::with_children("A", vec![Node::new("B")])],
    ))
}

fn output_record(model_answer: &str, ground_truth: &str) -> ModelOutputRecord {
    ModelOutputRecord {
        image: vec!["img/0.jpg".to_string()],
        conversations: vec![
            Turn::user("<image>"),
            Turn::user("Parse this mind map."),
            Turn::assistant(ground_truth),
        ],
        model_answer: model_answer.to_string(),
    }
}

#[test]
fn given_perfect_prediction_when_evaluating_then_full_scores() {
    let seq = encode(&root_a_b());
    let report = evaluate_parse(&[output_record(&seq, &seq)], &FieldOverlapScorer);

    assert_eq!(report.ted_accuracies, vec![1.0]);
    assert_eq!(report.ted_accuracy, 1.0);
    assert_eq!(report.f1_accuracy, 1.0);
    assert_eq!(report.predictions.len(), 1);
    assert_eq!(report.ground_truths.len(), 1);
}

#[test]
fn given_truncated_prediction_when_evaluating_then_run_degrades_not_fails() {
    let seq = encode(&root_a_b());
    let truncated = &seq[..seq.len() / 2];
    let report = evaluate_parse(
        &[
            output_record(truncated, &seq),
            output_record("total garbage", &seq),
        ],
        &FieldOverlapScorer,
    );

    assert_eq!(report.ted_accuracies.len(), 2);
    assert!(report.ted_accuracy < 1.0);
    // partial recovery still earns partial field credit
    assert!(report.f1_accuracy > 0.0);
}

#[test]
fn given_messy_whitespace_answer_when_decoding_then_cleaning_applies_first() {
    let decoder = Decoder::new();
    let map = root_a_b();
    let with_breaks = encode(&map).replace("</s_text>", "</s_text>\n");
    let decoded = decode_prediction(&decoder, &with_breaks);
    assert_eq!(decoded, map);
}

#[test]
fn given_prediction_with_empty_nodes_when_decoding_then_they_are_pruned() {
    let decoder = Decoder::new();
    let seq = "<s_map><s_node-0><s_text>Root</s_text><s_node-0>\
               <s_text></s_text><sep/><s_text>A</s_text></s_node-0></s_node-0></s_map>";
    let decoded = decode_prediction(&decoder, seq);
    assert_eq!(decoded.root.children.len(), 1);
    assert_eq!(decoded.root.children[0].text, "A");
}

#[test]
fn given_no_map_in_answer_when_decoding_then_empty_document() {
    let decoder = Decoder::new();
    assert_eq!(decode_prediction(&decoder, "no tags at all"), MindMap::default());
}

#[test]
fn given_mixed_field_overlap_when_scoring_then_f1_sits_between_bounds() {
    let scorer = FieldOverlapScorer;
    let pred = MindMap::new(Node::with_children("Root", vec![Node::new("A")]));
    let truth = root_a_b();
    let pairs = vec![(pred, truth)];

    let f1 = scorer.field_f1(&pairs);
    // 2 of 2 predicted fields hit, 2 of 3 expected: p=1, r=2/3
    assert!((f1 - 0.8).abs() < 1e-9);
}

#[test]
fn given_report_when_saving_then_json_lands_on_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("output.json");
    let seq = encode(&root_a_b());
    let report = evaluate_parse(&[output_record(&seq, &seq)], &FieldOverlapScorer);
    report.save(&path).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("ted_accuracy"));
    assert!(raw.contains("f1_accuracy"));
}

// ============================================================
// VQA scoring
// ============================================================

#[test]
fn given_exact_and_wrong_answers_when_scoring_vqa_then_match_rate_and_f1() {
    let records = vec![
        output_record("Yes", "Yes"),
        output_record("No ", "No"),
        output_record("Maybe", "No"),
    ];
    let report = evaluate_vqa(&records);
    assert_eq!(report.matches, vec![true, true, false]);
    let p = 2.0 / 3.0;
    assert!((report.match_rate - p).abs() < 1e-9);
    assert!((report.f1_accuracy - 2.0 * p / (p + 1.0)).abs() < 1e-9);
}

#[test]
fn given_no_records_when_scoring_vqa_then_zeroes() {
    let report = evaluate_vqa(&[]);
    assert_eq!(report.match_rate, 0.0);
    assert_eq!(report.f1_accuracy, 0.0);
}
