//! Structural queries over a mind map.
//!
//! Every traversal is depth-first pre-order and deterministic given sibling
//! order. Duplicate node text resolves to the first pre-order match; a missing
//! target yields `None`/empty, which callers render as a literal "None"
//! answer, never an error.

use rand::Rng;
use std::ptr;

use crate::model::{MindMap, Node};

/// Text of the root node (the central theme of the map).
pub fn root_theme(map: &MindMap) -> &str {
    &map.root.text
}

/// Uniformly samples the text of one node, optionally restricted to a level.
/// `None` when no node sits at the requested level.
pub fn random_node<R: Rng>(map: &MindMap, level: Option<usize>, rng: &mut R) -> Option<String> {
    let mut texts: Vec<&str> = Vec::new();
    collect_level_texts(&map.root, 0, level, &mut texts);
    if texts.is_empty() {
        return None;
    }
    Some(texts[rng.gen_range(0..texts.len())].to_string())
}

fn collect_level_texts<'a>(
    node: &'a Node,
    depth: usize,
    level: Option<usize>,
    texts: &mut Vec<&'a str>,
) {
    if level.map_or(true, |l| l == depth) {
        texts.push(&node.text);
    }
    for child in &node.children {
        collect_level_texts(child, depth + 1, level, texts);
    }
}

/// First pre-order node whose text equals `target`.
pub fn find_node<'a>(node: &'a Node, target: &str) -> Option<&'a Node> {
    if node.text == target {
        return Some(node);
    }
    node.children
        .iter()
        .find_map(|child| find_node(child, target))
}

/// Parent of the first pre-order non-root node whose text equals `target`.
fn parent_of<'a>(node: &'a Node, target: &str) -> Option<&'a Node> {
    for child in &node.children {
        if child.text == target {
            return Some(node);
        }
        if let Some(parent) = parent_of(child, target) {
            return Some(parent);
        }
    }
    None
}

/// Text of the target's direct parent; `None` when the target is the root or
/// absent.
pub fn find_parent(map: &MindMap, target: &str) -> Option<String> {
    if map.root.text == target {
        return None;
    }
    parent_of(&map.root, target).map(|parent| parent.text.clone())
}

/// Ordered texts of the first matched node's direct children.
pub fn find_children(map: &MindMap, target: &str) -> Vec<String> {
    find_node(&map.root, target)
        .map(|node| node.children.iter().map(|c| c.text.clone()).collect())
        .unwrap_or_default()
}

/// 0-based depth of the first matched node.
pub fn find_level(map: &MindMap, target: &str) -> Option<usize> {
    level_of(&map.root, target, 0)
}

fn level_of(node: &Node, target: &str, depth: usize) -> Option<usize> {
    if node.text == target {
        return Some(depth);
    }
    node.children
        .iter()
        .find_map(|child| level_of(child, target, depth + 1))
}

/// Ordered texts of every node exactly at `level`.
pub fn nodes_at_level(map: &MindMap, level: usize) -> Vec<String> {
    let mut texts = Vec::new();
    collect_at_level(&map.root, 0, level, &mut texts);
    texts
}

fn collect_at_level(node: &Node, depth: usize, level: usize, texts: &mut Vec<String>) {
    if depth == level {
        texts.push(node.text.clone());
        return;
    }
    for child in &node.children {
        collect_at_level(child, depth + 1, level, texts);
    }
}

/// True iff the first match of `parent` has a direct child with text `child`.
pub fn is_parent_child(map: &MindMap, parent: &str, child: &str) -> bool {
    find_node(&map.root, parent)
        .is_some_and(|node| node.children.iter().any(|c| c.text == child))
}

/// True iff the first-found parents of `a` and `b` are the identical node.
/// Identity is by reference, not by text, so equally-labeled parents in
/// different places do not count.
pub fn are_siblings(map: &MindMap, a: &str, b: &str) -> bool {
    match (parent_of(&map.root, a), parent_of(&map.root, b)) {
        (Some(pa), Some(pb)) => ptr::eq(pa, pb),
        _ => false,
    }
}

/// Clones the first matched node out as a new document root. Depth tags in
/// any serialized form are regenerated relative to the new root.
pub fn extract_subtree(map: &MindMap, target: &str) -> Option<MindMap> {
    find_node(&map.root, target).map(|node| MindMap {
        root: node.clone(),
    })
}

/// Pre-order texts of the first matched node and all its descendants; scopes
/// spatial queries to a subtree.
pub fn collect_subtree_texts(map: &MindMap, target: &str) -> Vec<String> {
    find_node(&map.root, target)
        .map(preorder_texts)
        .unwrap_or_default()
}

/// Pre-order text listing of a subtree.
pub fn preorder_texts(node: &Node) -> Vec<String> {
    let mut texts = Vec::new();
    push_preorder(node, &mut texts);
    texts
}

fn push_preorder(node: &Node, texts: &mut Vec<String>) {
    texts.push(node.text.clone());
    for child in &node.children {
        push_preorder(child, texts);
    }
}

/// Number of nodes in a subtree, used by the difficulty filter.
pub fn count_nodes(node: &Node) -> usize {
    1 + node.children.iter().map(count_nodes).sum::<usize>()
}
