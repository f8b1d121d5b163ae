//! Tests for the spatial binder: box math and label binding.

use rstest::rstest;

use rsmind::model::{MindMap, Node};
use rsmind::spatial::{subtree_region, BBox, BoxIndex, LabeledBox};

fn labeled(label: &str, xyxy: &str) -> LabeledBox {
    LabeledBox {
        label: label.to_string(),
        xyxy: xyxy.to_string(),
    }
}

fn reference_index() -> BoxIndex {
    BoxIndex::from_records(&[labeled("A", "0,0,10,10"), labeled("B", "5,5,15,15")]).unwrap()
}

// ============================================================
// Box math
// ============================================================

#[test]
fn given_reference_boxes_when_unioning_then_componentwise_extent() {
    let union = BBox::union([BBox::new(0, 0, 10, 10), BBox::new(5, 5, 15, 15)]).unwrap();
    assert_eq!(union, BBox::new(0, 0, 15, 15));
}

#[test]
fn given_single_box_when_unioning_then_box_returns_unchanged() {
    let b = BBox::new(3, 4, 9, 12);
    assert_eq!(BBox::union([b]), Some(b));
}

#[test]
fn given_no_boxes_when_unioning_then_none() {
    assert_eq!(BBox::union(Vec::new()), None);
}

#[test]
fn given_reference_boxes_when_measuring_overlap_then_quarter_of_a_is_covered() {
    let a = BBox::new(0, 0, 10, 10);
    let b = BBox::new(5, 5, 15, 15);
    assert_eq!(a.intersection_over_self(&b), 0.25);
}

#[test]
fn given_identical_boxes_when_measuring_overlap_then_ratio_is_one() {
    let a = BBox::new(2, 3, 11, 17);
    assert_eq!(a.intersection_over_self(&a), 1.0);
}

#[test]
fn given_disjoint_boxes_when_measuring_overlap_then_ratio_is_zero() {
    let a = BBox::new(0, 0, 10, 10);
    let b = BBox::new(20, 20, 30, 30);
    assert_eq!(a.intersection_over_self(&b), 0.0);
}

#[rstest]
#[case(0.5, false)]
#[case(0.25, true)]
#[case(0.26, false)]
fn given_threshold_when_testing_membership_then_ratio_gates_it(
    #[case] threshold: f64,
    #[case] expected: bool,
) {
    // a quarter of `a` lies inside the region
    let a = BBox::new(0, 0, 10, 10);
    let region = BBox::new(5, 5, 15, 15);
    assert_eq!(a.is_within(&region, threshold), expected);
}

#[test]
fn given_box_when_formatting_then_comma_joined_pixels() {
    assert_eq!(BBox::new(0, 0, 15, 15).to_string(), "0,0,15,15");
    assert_eq!(BBox::parse("0,0,15,15").unwrap(), BBox::new(0, 0, 15, 15));
}

// ============================================================
// Label binding
// ============================================================

#[test]
fn given_index_when_finding_label_then_box_returns() {
    let index = reference_index();
    assert_eq!(index.find("A"), Some(BBox::new(0, 0, 10, 10)));
    assert_eq!(index.find("missing"), None);
}

#[test]
fn given_messy_label_when_finding_then_cleaning_applies_to_both_sides() {
    let index = BoxIndex::from_records(&[labeled("Multi\nline label", "1,2,3,4")]).unwrap();
    assert_eq!(index.find("Multi line label"), Some(BBox::new(1, 2, 3, 4)));
    assert_eq!(index.find("Multi\tline label "), Some(BBox::new(1, 2, 3, 4)));
}

#[test]
fn given_duplicate_labels_when_finding_then_first_match_wins() {
    let index =
        BoxIndex::from_records(&[labeled("dup", "0,0,1,1"), labeled("dup", "9,9,10,10")]).unwrap();
    assert_eq!(index.find("dup"), Some(BBox::new(0, 0, 1, 1)));
}

#[test]
fn given_region_when_counting_members_then_threshold_applies() {
    let index = reference_index();
    let region = BBox::new(0, 0, 10, 10);
    // A lies fully inside; only a quarter of B does
    assert_eq!(index.count_in_region(&region, 0.5), 1);
    assert_eq!(index.count_in_region(&region, 0.25), 2);
}

// ============================================================
// Subtree regions
// ============================================================

#[test]
fn given_subtree_when_binding_region_then_union_of_bound_boxes() {
    let map = MindMap::new(Node::with_children(
        "Root",
        vec![Node::with_children("A", vec![Node::new("B")])],
    ));
    let index = reference_index();
    // "Root" has no box; A and B contribute
    assert_eq!(
        subtree_region(&map, "Root", &index),
        Some(BBox::new(0, 0, 15, 15))
    );
    assert_eq!(
        subtree_region(&map, "B", &index),
        Some(BBox::new(5, 5, 15, 15))
    );
}

#[test]
fn given_unbound_subtree_when_binding_region_then_none() {
    let map = MindMap::new(Node::new("nowhere"));
    assert_eq!(subtree_region(&map, "nowhere", &reference_index()), None);
}
