//! Postorder pruning of empty subtrees and empty relations.

use crate::model::{MindMap, Node};

/// A node is empty iff its text is blank, every child is recursively empty,
/// and it carries no non-blank relation.
pub fn is_empty(node: &Node) -> bool {
    node.text.trim().is_empty()
        && node.relations.iter().all(|r| r.trim().is_empty())
        && node.children.iter().all(is_empty)
}

/// Removes empty subtrees bottom-up, returning `None` when the node itself is
/// empty. Surviving siblings keep their order; blank relation strings are
/// dropped.
pub fn prune_node(node: &Node) -> Option<Node> {
    if is_empty(node) {
        return None;
    }
    Some(Node {
        text: node.text.clone(),
        children: node.children.iter().filter_map(prune_node).collect(),
        relations: node
            .relations
            .iter()
            .filter(|r| !r.trim().is_empty())
            .cloned()
            .collect(),
    })
}

/// Document-level prune. The root survives even when empty so that a pruned
/// map still serializes to a well-formed sequence.
pub fn prune(map: &MindMap) -> MindMap {
    MindMap {
        root: prune_node(&map.root).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Node;

    fn blank_child_tree() -> Node {
        Node {
            text: "Root".to_string(),
            children: vec![
                Node::new(""),
                Node::new("A"),
                Node::with_children("", vec![Node::new("  ")]),
            ],
            relations: vec!["".to_string(), "kept".to_string()],
        }
    }

    #[test]
    fn given_blank_subtrees_when_pruning_then_only_nonempty_siblings_survive_in_order() {
        let map = MindMap::new(blank_child_tree());
        let pruned = prune(&map);
        assert_eq!(pruned.root.children.len(), 1);
        assert_eq!(pruned.root.children[0].text, "A");
        assert_eq!(pruned.root.relations, vec!["kept"]);
    }

    #[test]
    fn given_node_rescued_by_relation_when_pruning_then_it_survives() {
        let node = Node {
            text: String::new(),
            children: Vec::new(),
            relations: vec!["ref".to_string()],
        };
        assert!(!is_empty(&node));
        assert!(prune_node(&node).is_some());
    }

    #[test]
    fn given_any_tree_when_pruning_twice_then_result_is_stable() {
        let map = MindMap::new(blank_child_tree());
        let once = prune(&map);
        assert_eq!(prune(&once), once);
    }
}
