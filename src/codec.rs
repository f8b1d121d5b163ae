//! Tag-delimited token codec for mind-map documents.
//!
//! The encode direction turns a document into the flat training-target form
//! `<s_map><s_node-0><s_text>…</s_text>…</s_node-0></s_map>`, lists joined by
//! `<sep/>`. The decode direction is total: model output is repaired by
//! closing open frames, then parsed best-effort; a malformed sequence yields a
//! degraded document, never an error.

use regex::Regex;

use crate::model::{is_children_key, MindMap, Node};

pub const SEP: &str = "<sep/>";

/// Generic document value the codec operates on.
///
/// `Leaf` is the pre-flattened case: a value emitted (or recovered) verbatim
/// with no tag structure. Structured nodes are `Fields` with insertion-ordered
/// keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Leaf(String),
    Scalar(String),
    List(Vec<Fragment>),
    Fields(Vec<(String, Fragment)>),
}

impl Fragment {
    pub fn scalar(s: impl Into<String>) -> Self {
        Fragment::Scalar(s.into())
    }

    /// First field with the given key, for `Fields` fragments.
    pub fn get(&self, key: &str) -> Option<&Fragment> {
        match self {
            Fragment::Fields(fields) => fields.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Fragment::Scalar(s) | Fragment::Leaf(s) => Some(s),
            _ => None,
        }
    }
}

/// Serializes fragments into the tag-delimited sequence form.
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    sort_keys: bool,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits object fields in lexicographically descending key order instead
    /// of insertion order.
    pub fn sorted() -> Self {
        Encoder { sort_keys: true }
    }

    pub fn encode(&self, fragment: &Fragment) -> String {
        let mut out = String::new();
        self.write(fragment, &mut out);
        out
    }

    pub fn encode_map(&self, map: &MindMap) -> String {
        self.encode(&map.to_fragment())
    }

    fn write(&self, fragment: &Fragment, out: &mut String) {
        match fragment {
            Fragment::Leaf(s) | Fragment::Scalar(s) => out.push_str(s),
            Fragment::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(SEP);
                    }
                    self.write(item, out);
                }
            }
            Fragment::Fields(fields) => {
                let mut order: Vec<&(String, Fragment)> = fields.iter().collect();
                if self.sort_keys {
                    order.sort_by(|a, b| b.0.cmp(&a.0));
                }
                for (key, value) in order {
                    out.push_str("<s_");
                    out.push_str(key);
                    out.push('>');
                    self.write(value, out);
                    out.push_str("</s_");
                    out.push_str(key);
                    out.push('>');
                }
            }
        }
    }
}

/// Encodes a document with the default field order.
pub fn encode(map: &MindMap) -> String {
    Encoder::new().encode_map(map)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Open(&'a str),
    Close(&'a str),
    Sep,
    Text(&'a str),
}

/// Recovery-aware parser for generated sequences.
#[derive(Debug)]
pub struct Decoder {
    tag: Regex,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    pub fn new() -> Self {
        Decoder {
            tag: Regex::new(r"<(/?)s_([^<>]+?)>|<sep/>").unwrap(),
        }
    }

    /// Appends closing tags for every frame still open at end-of-input, in
    /// LIFO order. A sequence that already closes cleanly comes back
    /// unchanged; the two shallow suffixes `</s_node-0></s_map>` and
    /// `</s_node-1></s_node-0></s_map>` fall out as special cases.
    pub fn repair(&self, input: &str) -> String {
        let mut open: Vec<&str> = Vec::new();
        for token in self.tokenize(input) {
            match token {
                Token::Open(key) => open.push(key),
                Token::Close(key) => {
                    if open.last() == Some(&key) {
                        open.pop();
                    }
                }
                _ => {}
            }
        }
        if open.is_empty() {
            return input.to_string();
        }
        let mut repaired = String::with_capacity(input.len() + open.len() * 12);
        repaired.push_str(input);
        for key in open.iter().rev() {
            repaired.push_str("</s_");
            repaired.push_str(key);
            repaired.push('>');
        }
        repaired
    }

    /// Total decode: repairs the tail, then parses the tag grammar.
    ///
    /// Unmatched closing tags are skipped, unclosed opening tags close
    /// implicitly at end-of-input, and stray text next to structured fields
    /// is discarded. Input without a single opening tag comes back as a
    /// `Leaf` holding the trimmed text.
    pub fn decode(&self, input: &str) -> Fragment {
        let repaired = self.repair(input);
        let tokens = self.tokenize(&repaired);
        if !tokens.iter().any(|t| matches!(t, Token::Open(_))) {
            return Fragment::Leaf(input.trim().to_string());
        }
        let mut pos = 0;
        parse_frame(&tokens, &mut pos, None, 0)
    }

    /// Decodes straight to a document; `None` when no `map > node-0`
    /// structure could be recovered.
    pub fn decode_map(&self, input: &str) -> Option<MindMap> {
        MindMap::from_fragment(&self.decode(input))
    }

    fn tokenize<'a>(&self, input: &'a str) -> Vec<Token<'a>> {
        let mut tokens = Vec::new();
        let mut last = 0;
        for caps in self.tag.captures_iter(input) {
            let m = caps.get(0).unwrap();
            if m.start() > last {
                tokens.push(Token::Text(&input[last..m.start()]));
            }
            match caps.get(2) {
                Some(key) => {
                    let closing = caps.get(1).is_some_and(|s| !s.as_str().is_empty());
                    if closing {
                        tokens.push(Token::Close(key.as_str()));
                    } else {
                        tokens.push(Token::Open(key.as_str()));
                    }
                }
                None => tokens.push(Token::Sep),
            }
            last = m.end();
        }
        if last < input.len() {
            tokens.push(Token::Text(&input[last..]));
        }
        tokens
    }
}

/// Nesting bound for adversarial input; frames beyond it lose their tags but
/// keep their content.
const MAX_DEPTH: usize = 128;

/// Parses one frame's content until the matching closing tag or end-of-input.
/// `<sep/>` at this nesting level splits the content into an ordered list.
fn parse_frame(tokens: &[Token], pos: &mut usize, closing: Option<&str>, depth: usize) -> Fragment {
    let mut items: Vec<Fragment> = Vec::new();
    let mut fields: Vec<(String, Fragment)> = Vec::new();
    let mut text = String::new();

    while let Some(token) = tokens.get(*pos).copied() {
        match token {
            Token::Open(key) => {
                *pos += 1;
                if depth >= MAX_DEPTH {
                    // drop the tag; its eventual close is skipped as unmatched
                    continue;
                }
                let inner = parse_frame(tokens, pos, Some(key), depth + 1);
                fields.push((key.to_string(), inner));
            }
            Token::Close(key) if Some(key) == closing => {
                *pos += 1;
                return finish_frame(items, fields, text);
            }
            Token::Close(_) => {
                *pos += 1;
            }
            Token::Sep => {
                *pos += 1;
                items.push(finish_item(
                    std::mem::take(&mut fields),
                    std::mem::take(&mut text),
                ));
            }
            Token::Text(t) => {
                *pos += 1;
                text.push_str(t);
            }
        }
    }
    finish_frame(items, fields, text)
}

fn finish_frame(
    mut items: Vec<Fragment>,
    fields: Vec<(String, Fragment)>,
    text: String,
) -> Fragment {
    items.push(finish_item(fields, text));
    if items.len() == 1 {
        items.pop().unwrap()
    } else {
        Fragment::List(items)
    }
}

fn finish_item(fields: Vec<(String, Fragment)>, text: String) -> Fragment {
    if fields.is_empty() {
        Fragment::Scalar(text.trim().to_string())
    } else {
        Fragment::Fields(fields)
    }
}

impl MindMap {
    /// Wraps the document as `map > node-0 > {text, relation?, node-{d}?}`,
    /// materializing depth tags from the traversal depth (root = 0).
    pub fn to_fragment(&self) -> Fragment {
        Fragment::Fields(vec![(
            "map".to_string(),
            Fragment::Fields(vec![("node-0".to_string(), node_fragment(&self.root, 0))]),
        )])
    }

    /// Walks `map > node-0` in a decoded fragment. Accepts a single `Fields`
    /// value where a one-element list was collapsed during decoding, any
    /// `node`/`node-{d}` key as a children field, and scalar or list
    /// relations.
    pub fn from_fragment(fragment: &Fragment) -> Option<MindMap> {
        let Fragment::Fields(doc) = fragment.get("map")? else {
            return None;
        };
        let root = doc.iter().find(|(k, _)| is_children_key(k)).map(|(_, v)| v)?;
        let root = match root {
            Fragment::List(items) => items.first()?,
            other => other,
        };
        Some(MindMap {
            root: node_from_fragment(root),
        })
    }
}

fn node_fragment(node: &Node, depth: usize) -> Fragment {
    let mut fields = vec![("text".to_string(), Fragment::Scalar(node.text.clone()))];
    if !node.relations.is_empty() {
        fields.push((
            "relation".to_string(),
            Fragment::List(node.relations.iter().cloned().map(Fragment::Scalar).collect()),
        ));
    }
    if !node.children.is_empty() {
        fields.push((
            format!("node-{depth}"),
            Fragment::List(
                node.children
                    .iter()
                    .map(|child| node_fragment(child, depth + 1))
                    .collect(),
            ),
        ));
    }
    Fragment::Fields(fields)
}

fn node_from_fragment(fragment: &Fragment) -> Node {
    match fragment {
        Fragment::Scalar(s) | Fragment::Leaf(s) => Node::new(s.clone()),
        Fragment::List(items) => items.first().map(node_from_fragment).unwrap_or_default(),
        Fragment::Fields(fields) => {
            let mut node = Node::default();
            for (key, value) in fields {
                if key == "text" {
                    if let Some(s) = value.as_scalar() {
                        node.text = s.to_string();
                    }
                } else if key == "relation" || key == "relations" {
                    node.relations = scalar_items(value);
                } else if is_children_key(key) {
                    node.children.extend(node_list(value));
                }
            }
            node
        }
    }
}

fn node_list(fragment: &Fragment) -> Vec<Node> {
    match fragment {
        Fragment::List(items) => items.iter().map(node_from_fragment).collect(),
        other => vec![node_from_fragment(other)],
    }
}

fn scalar_items(fragment: &Fragment) -> Vec<String> {
    match fragment {
        Fragment::List(items) => items
            .iter()
            .filter_map(|f| f.as_scalar().map(str::to_string))
            .collect(),
        other => other.as_scalar().map(str::to_string).into_iter().collect(),
    }
}
