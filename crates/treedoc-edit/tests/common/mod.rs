#![allow(dead_code)]

use treedoc_edit::model::text::DecimalFormat;
use treedoc_edit::model::{Legends, Node, NodeId, ScaleBar, TextElementData, Tree};

/// Builds a tree from a Newick-like string, e.g. `((A:1,B:2)X:3,C:4)R;`.
///
/// Names are stored as text node data. No quoting, comments or whitespace handling.
pub fn tree(text: &str) -> Tree {
    let mut tree = Tree::new();
    let mut parser = Parser {
        chars: text.trim().trim_end_matches(';').chars().collect(),
        pos: 0,
    };
    let root = parser.node(&mut tree);
    tree.set_paint_start(Some(root)).unwrap();
    tree
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn node(&mut self, tree: &mut Tree) -> NodeId {
        let node = tree.new_node();
        if self.peek() == Some('(') {
            self.pos += 1;
            loop {
                let child = self.node(tree);
                tree.add_child(node, child).unwrap();
                let sep = self.peek();
                self.pos += 1;
                match sep {
                    Some(',') => continue,
                    Some(')') => break,
                    other => panic!("unexpected {other:?} at {}", self.pos - 1),
                }
            }
        }
        let name = self.token();
        if !name.is_empty() {
            tree.set_node_data(node, TextElementData::text(name));
        }
        if self.peek() == Some(':') {
            self.pos += 1;
            let length: f64 = self.token().parse().unwrap();
            tree.branch_mut(node).set_length(length);
        }
        node
    }

    fn token(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(|c| !",():;".contains(c)) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }
}

/// Inverse of [`tree`].
pub fn newick(tree: &Tree) -> String {
    match tree.paint_start() {
        Some(root) => format!("{};", subtree(tree, root)),
        None => ";".to_string(),
    }
}

fn subtree(tree: &Tree, node: NodeId) -> String {
    let mut out = String::new();
    if !tree.is_leaf(node) {
        let children: Vec<String> = tree
            .children(node)
            .iter()
            .map(|&c| subtree(tree, c))
            .collect();
        out.push('(');
        out.push_str(&children.join(","));
        out.push(')');
    }
    out.push_str(&tree.node(node).data().to_string());
    if let Some(length) = tree.branch(node).defined_length() {
        out.push(':');
        out.push_str(&DecimalFormat::default().format(length));
    }
    out
}

/// First node (in preorder) whose data is the text `name`.
pub fn find(tree: &Tree, name: &str) -> NodeId {
    let root = tree.paint_start().expect("empty tree");
    tree.preorder(root)
        .into_iter()
        .find(|&n| tree.node(n).data().as_text() == Some(name))
        .unwrap_or_else(|| panic!("no node named {name}"))
}

pub fn find_all<const N: usize>(tree: &Tree, names: [&str; N]) -> [NodeId; N] {
    names.map(|name| find(tree, name))
}

/// Everything reachable, for comparing states before and after undo.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    root: Option<NodeId>,
    nodes: Vec<(NodeId, Node)>,
    legends: Legends,
    scale_bar: ScaleBar,
}

pub fn snapshot(tree: &Tree) -> Snapshot {
    let nodes = tree
        .paint_start()
        .map(|root| {
            tree.preorder(root)
                .into_iter()
                .map(|n| (n, tree.node(n).clone()))
                .collect()
        })
        .unwrap_or_default();
    Snapshot {
        root: tree.paint_start(),
        nodes,
        legends: tree.legends().clone(),
        scale_bar: tree.scale_bar().clone(),
    }
}
