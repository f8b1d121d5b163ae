use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use termtree::Tree;

/// Replaces line breaks and tabs with a single space and trims the ends.
///
/// Applied to node text and relations before encoding, to box labels before
/// matching, and to raw model answers before decoding.
pub fn clean_text(text: &str) -> String {
    text.replace("\r\n", " ")
        .replace(['\n', '\r', '\t'], " ")
        .trim()
        .to_string()
}

/// Squeezes runs of spaces left behind by crawl extraction.
pub fn collapse_spaces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_space = false;
    for c in text.chars() {
        if c == ' ' {
            if !prev_space {
                out.push(c);
            }
            prev_space = true;
        } else {
            out.push(c);
            prev_space = false;
        }
    }
    out
}

/// A single mind-map node: display text, ordered children, and optional
/// free-text cross-references.
///
/// Children are an explicit ordered field; the `node-{depth}` tag names of the
/// serialized forms are materialized from the depth carried during traversal,
/// so a subtree cloned out as a new root needs no renumbering pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Display text, may be empty after cleaning
    #[serde(default)]
    pub text: String,
    /// Ordered children; sibling order reflects reading order in the diagram
    #[serde(default, rename = "node", skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    /// Non-hierarchical cross-references; insertion order kept for display
    #[serde(default, rename = "relation", skip_serializing_if = "Vec::is_empty")]
    pub relations: Vec<String>,
}

/// True for the field names that carry children in the serialized forms:
/// the pre-tagged `node` and any depth-tagged `node-{d}`.
pub(crate) fn is_children_key(key: &str) -> bool {
    key == "node"
        || key
            .strip_prefix("node-")
            .is_some_and(|d| !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit()))
}

fn is_relation_key(key: &str) -> bool {
    key == "relation" || key == "relations"
}

impl Node {
    pub fn new(text: impl Into<String>) -> Self {
        Node {
            text: text.into(),
            children: Vec::new(),
            relations: Vec::new(),
        }
    }

    pub fn with_children(text: impl Into<String>, children: Vec<Node>) -> Self {
        Node {
            text: text.into(),
            children,
            relations: Vec::new(),
        }
    }

    /// Builds a node from annotation JSON, accepting both the pre-tagged
    /// `node`/`relation` form and the depth-tagged `node-{d}` form.
    ///
    /// This subsumes the annotation pipeline's key-rewriting step: whatever
    /// depth numbers the input carries, children land in an ordered list and
    /// correct tags are regenerated at serialization time.
    pub fn from_value(value: &Value) -> Node {
        match value {
            Value::Object(fields) => {
                let mut node = Node::default();
                for (key, val) in fields {
                    if key == "text" {
                        if let Value::String(s) = val {
                            node.text = s.clone();
                        }
                    } else if is_relation_key(key) {
                        node.relations = string_items(val);
                    } else if is_children_key(key) {
                        node.children.extend(node_items(val));
                    }
                }
                node
            }
            Value::String(s) => Node::new(s.clone()),
            _ => Node::default(),
        }
    }

    /// Emits the depth-tagged JSON form: `text`, then `relation`, then the
    /// children list under `node-{depth}` where `depth` is this node's
    /// root-relative depth.
    pub fn to_tagged_value(&self, depth: usize) -> Value {
        let mut fields = Map::new();
        fields.insert("text".to_string(), Value::String(self.text.clone()));
        if !self.relations.is_empty() {
            fields.insert(
                "relation".to_string(),
                Value::Array(self.relations.iter().cloned().map(Value::String).collect()),
            );
        }
        if !self.children.is_empty() {
            fields.insert(
                format!("node-{depth}"),
                Value::Array(
                    self.children
                        .iter()
                        .map(|child| child.to_tagged_value(depth + 1))
                        .collect(),
                ),
            );
        }
        Value::Object(fields)
    }

    /// Returns a copy with `clean_text` applied to every text and relation.
    pub fn cleaned(&self) -> Node {
        Node {
            text: clean_text(&self.text),
            children: self.children.iter().map(Node::cleaned).collect(),
            relations: self.relations.iter().map(|r| clean_text(r)).collect(),
        }
    }
}

fn string_items(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        Value::String(s) => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn node_items(value: &Value) -> Vec<Node> {
    match value {
        Value::Array(items) => items.iter().map(Node::from_value).collect(),
        Value::Object(_) => vec![Node::from_value(value)],
        _ => Vec::new(),
    }
}

/// A whole mind-map document: one root node, wrapped as `map > node-0` in the
/// serialized forms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MindMap {
    pub root: Node,
}

impl MindMap {
    pub fn new(root: Node) -> Self {
        MindMap { root }
    }

    /// Reads the `map > node-0` wrapper of an annotation `gt_parse` value.
    /// Returns `None` when the wrapper structure is absent.
    pub fn from_value(value: &Value) -> Option<MindMap> {
        let map = value.get("map")?.as_object()?;
        let root = map
            .iter()
            .find(|(key, _)| is_children_key(key))
            .map(|(_, val)| val)?;
        let root = match root {
            Value::Array(items) => items.first()?,
            other => other,
        };
        Some(MindMap {
            root: Node::from_value(root),
        })
    }

    pub fn to_tagged_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("node-0".to_string(), self.root.to_tagged_value(0));
        let mut doc = Map::new();
        doc.insert("map".to_string(), Value::Object(map));
        Value::Object(doc)
    }

    pub fn cleaned(&self) -> MindMap {
        MindMap {
            root: self.root.cleaned(),
        }
    }
}

pub trait TreeRender {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeRender for Node {
    fn to_tree_string(&self) -> Tree<String> {
        let label = if self.text.trim().is_empty() {
            "(empty)".to_string()
        } else {
            self.text.clone()
        };

        let mut leaves: Vec<Tree<String>> = self
            .relations
            .iter()
            .map(|r| Tree::new(format!("[rel] {r}")))
            .collect();
        leaves.extend(self.children.iter().map(|c| c.to_tree_string()));

        Tree::new(label).with_leaves(leaves)
    }
}

impl fmt::Display for MindMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root.to_tree_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn given_pre_tagged_json_when_building_node_then_reads_children_and_relations() {
        let value = json!({
            "text": "Root",
            "node": [{"text": "A", "node": [{"text": "B"}]}],
            "relation": ["see also"]
        });
        let node = Node::from_value(&value);
        assert_eq!(node.text, "Root");
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.children[0].children[0].text, "B");
        assert_eq!(node.relations, vec!["see also"]);
    }

    #[test]
    fn given_depth_tagged_json_when_building_map_then_any_depth_numbers_are_accepted() {
        // deliberately wrong depth numbers: ingestion normalizes them away
        let value = json!({
            "map": {"node-0": {"text": "Root", "node-5": [{"text": "A"}]}}
        });
        let map = MindMap::from_value(&value).unwrap();
        assert_eq!(map.root.text, "Root");
        assert_eq!(map.root.children[0].text, "A");
    }

    #[test]
    fn given_tree_when_emitting_tagged_json_then_depth_tags_match_node_depth() {
        let map = MindMap::new(Node::with_children(
            "Root",
            vec![Node::with_children("A", vec![Node::new("B")])],
        ));
        let value = map.to_tagged_value();
        let root = &value["map"]["node-0"];
        assert!(root.get("node-0").is_some());
        assert!(root["node-0"][0].get("node-1").is_some());
    }

    #[test]
    fn given_messy_text_when_cleaning_then_breaks_and_tabs_become_spaces() {
        assert_eq!(clean_text(" a\r\nb\tc\n"), "a b c");
        assert_eq!(collapse_spaces("a   b c"), "a b c");
    }
}
