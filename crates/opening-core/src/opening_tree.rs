//! Opening tree builder for repertoire drilling.
//!
//! Openings are linked to their longest named prefix: `1.e4 e5 2.Nf3` hangs
//! under `1.e4 e5` if that line is named, otherwise under `1.e4`, otherwise it
//! becomes a root. Nodes live in one arena; the id index and the forest both
//! hold `NodeId`s into it.

use serde_json::Value as JsonValue;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::error::TreeError;
use crate::moves::{line_id, Opening, OpeningMove};

/// Index of a node in the tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpeningNode {
    pub id: String,
    pub name: String,
    pub moves: Vec<OpeningMove>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl OpeningNode {
    fn new(opening: &Opening, id: String, parent: Option<NodeId>) -> Self {
        Self {
            id,
            name: opening.name.clone(),
            moves: opening.moves.clone(),
            parent,
            children: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// What to do when two openings share the same move line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// The first opening seen keeps the id; differently named ones are logged and dropped.
    #[default]
    KeepFirst,
    /// Like `KeepFirst`, but a longer name replaces the retained one.
    KeepLongestName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Same line, same name. Benign duplicate.
    Keep,
    /// Rename the existing node to the candidate's name.
    Replace,
    /// Different name, candidate dropped.
    Warn,
}

/// Decide how a candidate opening colliding with an existing node is handled.
pub fn resolve_collision(
    policy: CollisionPolicy,
    existing: &OpeningNode,
    candidate: &Opening,
) -> Resolution {
    if existing.name == candidate.name {
        return Resolution::Keep;
    }
    match policy {
        CollisionPolicy::KeepLongestName if candidate.name.len() > existing.name.len() => {
            Resolution::Replace
        }
        _ => Resolution::Warn,
    }
}

/// The built forest plus its id lookup. Read-only once built, apart from
/// `merge_custom`.
#[derive(Debug, Clone, Default)]
pub struct OpeningTree {
    nodes: Vec<OpeningNode>,
    roots: Vec<NodeId>,
    index: HashMap<String, NodeId>,
}

/// Build an opening tree with the default collision policy.
///
/// `openings` must be sorted by line length (see `moves::sort_openings`), so
/// every prefix is placed before anything that extends it.
pub fn build_opening_tree(openings: &[Opening]) -> OpeningTree {
    build_opening_tree_with(openings, CollisionPolicy::default())
}

pub fn build_opening_tree_with(openings: &[Opening], policy: CollisionPolicy) -> OpeningTree {
    openings
        .iter()
        .fold(TreeBuilder::new(policy), |mut builder, opening| {
            builder.insert(opening);
            builder
        })
        .finish()
}

struct TreeBuilder {
    tree: OpeningTree,
    policy: CollisionPolicy,
}

impl TreeBuilder {
    fn new(policy: CollisionPolicy) -> Self {
        Self {
            tree: OpeningTree::default(),
            policy,
        }
    }

    fn insert(&mut self, opening: &Opening) {
        let id = opening.id();

        if let Some(&existing) = self.tree.index.get(&id) {
            self.collide(existing, opening);
            return;
        }

        // Every placed node can take children, so the id index doubles as the
        // set of candidate parents.
        let parent = self.tree.longest_prefix(&opening.moves);

        if let Some(parent) = parent {
            let parent_name = &self.tree.nodes[parent.0].name;
            if *parent_name == opening.name {
                debug!(id = %id, name = %opening.name, "Dropping continuation named like its parent");
                return;
            }
        }

        let node_id = self.tree.push(OpeningNode::new(opening, id, parent));
        match parent {
            Some(parent) => self.tree.nodes[parent.0].children.push(node_id),
            None => self.tree.roots.push(node_id),
        }
    }

    fn collide(&mut self, existing: NodeId, opening: &Opening) {
        let node = &mut self.tree.nodes[existing.0];
        match resolve_collision(self.policy, node, opening) {
            Resolution::Keep => {
                debug!(id = %node.id, name = %node.name, "Duplicate opening ignored");
            }
            Resolution::Warn => {
                warn!(
                    id = %node.id,
                    kept = %node.name,
                    dropped = %opening.name,
                    "Openings share a move line; keeping the first"
                );
            }
            Resolution::Replace => {
                warn!(
                    id = %node.id,
                    old = %node.name,
                    new = %opening.name,
                    "Openings share a move line; renaming to the longer name"
                );
                node.name = opening.name.clone();
            }
        }
    }

    fn finish(mut self) -> OpeningTree {
        self.tree.sort_by_name();
        self.tree
    }
}

impl OpeningTree {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &OpeningNode {
        &self.nodes[id.0]
    }

    /// Look up an opening by its canonical id.
    pub fn get(&self, id: &str) -> Option<&OpeningNode> {
        self.index.get(id).map(|&node_id| self.node(node_id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn select(&self, id: &str) -> Result<&OpeningNode, TreeError> {
        self.get(id)
            .ok_or_else(|| TreeError::NotFound(id.to_string()))
    }

    /// Select by id, falling back to the first root when the id is unknown.
    /// `None` only for an empty tree.
    pub fn select_or_default(&self, id: &str) -> Option<&OpeningNode> {
        match self.select(id) {
            Ok(node) => Some(node),
            Err(e) => {
                debug!("{e}; falling back to first root");
                self.roots().next()
            }
        }
    }

    pub fn roots(&self) -> impl Iterator<Item = &OpeningNode> + '_ {
        self.roots.iter().map(|&id| self.node(id))
    }

    pub fn children<'a>(&'a self, node: &'a OpeningNode) -> impl Iterator<Item = &'a OpeningNode> + 'a {
        node.children.iter().map(|&id| self.node(id))
    }

    pub fn parent(&self, node: &OpeningNode) -> Option<&OpeningNode> {
        node.parent.map(|id| self.node(id))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.index.keys().map(String::as_str)
    }

    /// Depth-first listing in display order: `(depth, node)` with roots at 0.
    pub fn walk(&self) -> Vec<(usize, &OpeningNode)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(usize, NodeId)> = self.roots.iter().rev().map(|&id| (0, id)).collect();
        while let Some((depth, id)) = stack.pop() {
            let node = self.node(id);
            out.push((depth, node));
            stack.extend(node.children.iter().rev().map(|&child| (depth + 1, child)));
        }
        out
    }

    /// Add a user-supplied line (e.g. from an uploaded PGN) as a standalone
    /// root. It is not linked to existing prefixes.
    pub fn merge_custom(&mut self, name: &str, moves: Vec<OpeningMove>) -> Result<NodeId, TreeError> {
        let opening = Opening::new(name, moves);
        let id = opening.id();
        if self.index.contains_key(&id) {
            return Err(TreeError::DuplicateId(id));
        }

        let node_id = self.push(OpeningNode::new(&opening, id, None));
        let pos = self
            .roots
            .partition_point(|&root| self.nodes[root.0].name.as_str() <= name);
        self.roots.insert(pos, node_id);
        Ok(node_id)
    }

    /// Nested JSON view: `[{id, name, moves, children}]`, children always present.
    pub fn to_json(&self) -> JsonValue {
        JsonValue::Array(self.roots().map(|root| self.node_to_json(root)).collect())
    }

    fn node_to_json(&self, node: &OpeningNode) -> JsonValue {
        let children: Vec<JsonValue> = self
            .children(node)
            .map(|child| self.node_to_json(child))
            .collect();

        serde_json::json!({
            "id": node.id,
            "name": node.name,
            "moves": node.moves,
            "children": children,
        })
    }

    fn push(&mut self, node: OpeningNode) -> NodeId {
        let node_id = NodeId(self.nodes.len());
        self.index.insert(node.id.clone(), node_id);
        self.nodes.push(node);
        node_id
    }

    /// Nearest placed ancestor, searching the longest strict prefix first.
    /// The empty prefix is never a parent.
    fn longest_prefix(&self, moves: &[OpeningMove]) -> Option<NodeId> {
        (1..moves.len())
            .rev()
            .find_map(|len| self.index.get(&line_id(&moves[..len])).copied())
    }

    fn sort_by_name(&mut self) {
        let mut roots = std::mem::take(&mut self.roots);
        self.sort_ids(&mut roots);
        self.roots = roots;

        for i in 0..self.nodes.len() {
            let mut children = std::mem::take(&mut self.nodes[i].children);
            self.sort_ids(&mut children);
            self.nodes[i].children = children;
        }
    }

    fn sort_ids(&self, ids: &mut [NodeId]) {
        ids.sort_by(|a, b| self.nodes[a.0].name.cmp(&self.nodes[b.0].name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::{parse_line, sort_openings};

    fn opening(name: &str, line: &str) -> Opening {
        Opening::new(name, parse_line(line).unwrap())
    }

    fn root_names(tree: &OpeningTree) -> Vec<&str> {
        tree.roots().map(|n| n.name.as_str()).collect()
    }

    #[test]
    fn test_child_attaches_to_prefix() {
        let tree = build_opening_tree(&[opening("A", "e2e4"), opening("B", "e2e4 e7e5")]);

        assert_eq!(tree.len(), 2);
        assert_eq!(root_names(&tree), vec!["A"]);
        let root = tree.roots().next().unwrap();
        let children: Vec<&str> = tree.children(root).map(|n| n.name.as_str()).collect();
        assert_eq!(children, vec!["B"]);
        assert_eq!(tree.parent(tree.get("e2e4e7e5").unwrap()).unwrap().name, "A");
    }

    #[test]
    fn test_exact_duplicate_kept_once() {
        let tree = build_opening_tree(&[opening("A", "e2e4"), opening("A", "e2e4")]);
        assert_eq!(tree.len(), 1);
        assert_eq!(root_names(&tree), vec!["A"]);
    }

    #[test]
    fn test_same_line_different_name_first_wins() {
        let tree = build_opening_tree(&[opening("A", "e2e4"), opening("B", "e2e4")]);
        assert_eq!(tree.len(), 1);
        assert_eq!(root_names(&tree), vec!["A"]);
        assert_eq!(tree.get("e2e4").unwrap().name, "A");
    }

    #[test]
    fn test_keep_longest_name_renames() {
        let tree = build_opening_tree_with(
            &[opening("A", "e2e4"), opening("King's Pawn", "e2e4")],
            CollisionPolicy::KeepLongestName,
        );
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get("e2e4").unwrap().name, "King's Pawn");
    }

    #[test]
    fn test_resolve_collision() {
        let existing = OpeningNode::new(&opening("Short", "e2e4"), "e2e4".into(), None);
        let same = opening("Short", "e2e4");
        let longer = opening("Much Longer", "e2e4");
        let shorter = opening("S", "e2e4");

        assert_eq!(resolve_collision(CollisionPolicy::KeepFirst, &existing, &same), Resolution::Keep);
        assert_eq!(resolve_collision(CollisionPolicy::KeepFirst, &existing, &longer), Resolution::Warn);
        assert_eq!(
            resolve_collision(CollisionPolicy::KeepLongestName, &existing, &longer),
            Resolution::Replace
        );
        assert_eq!(
            resolve_collision(CollisionPolicy::KeepLongestName, &existing, &shorter),
            Resolution::Warn
        );
    }

    #[test]
    fn test_disjoint_roots_sorted() {
        let tree = build_opening_tree(&[opening("Queen's Pawn", "d2d4"), opening("King's Pawn", "e2e4")]);
        assert_eq!(root_names(&tree), vec!["King's Pawn", "Queen's Pawn"]);
    }

    #[test]
    fn test_attaches_to_longest_named_prefix() {
        let mut openings = vec![
            opening("King's Pawn", "e2e4"),
            opening("Open Game", "e2e4 e7e5"),
            opening("Ruy Lopez", "e2e4 e7e5 g1f3 b8c6 f1b5"),
            opening("Sicilian", "e2e4 c7c5 g1f3"),
        ];
        sort_openings(&mut openings);
        let tree = build_opening_tree(&openings);

        let ruy = tree.get("e2e4e7e5g1f3b8c6f1b5").unwrap();
        assert_eq!(tree.parent(ruy).unwrap().name, "Open Game");
        let sicilian = tree.get("e2e4c7c5g1f3").unwrap();
        assert_eq!(tree.parent(sicilian).unwrap().name, "King's Pawn");
    }

    #[test]
    fn test_continuation_with_parent_name_dropped() {
        let tree = build_opening_tree(&[
            opening("Sicilian", "e2e4 c7c5"),
            opening("Sicilian", "e2e4 c7c5 g1f3"),
            opening("Sicilian: Najdorf", "e2e4 c7c5 g1f3 d7d6"),
        ]);

        assert_eq!(tree.len(), 2);
        assert!(tree.get("e2e4c7c5g1f3").is_none());
        let najdorf = tree.get("e2e4c7c5g1f3d7d6").unwrap();
        assert_eq!(tree.parent(najdorf).unwrap().name, "Sicilian");
    }

    #[test]
    fn test_empty_line_is_root() {
        let tree = build_opening_tree(&[opening("Start", ""), opening("King's Pawn", "e2e4")]);
        assert_eq!(tree.len(), 2);
        assert_eq!(root_names(&tree), vec!["King's Pawn", "Start"]);
        assert!(tree.get("").unwrap().is_leaf());
    }

    #[test]
    fn test_children_sorted_by_name() {
        let mut openings = vec![
            opening("King's Pawn", "e2e4"),
            opening("Sicilian", "e2e4 c7c5"),
            opening("French", "e2e4 e7e6"),
            opening("Caro-Kann", "e2e4 c7c6"),
        ];
        sort_openings(&mut openings);
        let tree = build_opening_tree(&openings);

        let root = tree.get("e2e4").unwrap();
        let children: Vec<&str> = tree.children(root).map(|n| n.name.as_str()).collect();
        assert_eq!(children, vec!["Caro-Kann", "French", "Sicilian"]);
    }

    #[test]
    fn test_select_and_fallback() {
        let tree = build_opening_tree(&[opening("B", "d2d4"), opening("A", "e2e4")]);

        assert_eq!(tree.select("d2d4").unwrap().name, "B");
        assert_eq!(tree.select("h2h4"), Err(TreeError::NotFound("h2h4".into())));
        assert_eq!(tree.select_or_default("h2h4").unwrap().name, "A");
        assert!(OpeningTree::default().select_or_default("e2e4").is_none());
    }

    #[test]
    fn test_merge_custom() {
        let mut tree = build_opening_tree(&[opening("A", "e2e4"), opening("C", "d2d4")]);

        tree.merge_custom("B", parse_line("e2e4 e7e5").unwrap()).unwrap();
        assert_eq!(root_names(&tree), vec!["A", "B", "C"]);
        // standalone: not linked under "A"
        assert!(tree.get("e2e4e7e5").unwrap().is_root());
        assert!(tree.get("e2e4").unwrap().is_leaf());

        let err = tree.merge_custom("Again", parse_line("d2d4").unwrap()).unwrap_err();
        assert_eq!(err, TreeError::DuplicateId("d2d4".into()));
    }

    #[test]
    fn test_walk_order() {
        let mut openings = vec![
            opening("Queen's Pawn", "d2d4"),
            opening("King's Pawn", "e2e4"),
            opening("Sicilian", "e2e4 c7c5"),
            opening("French", "e2e4 e7e6"),
        ];
        sort_openings(&mut openings);
        let tree = build_opening_tree(&openings);

        let listing: Vec<(usize, &str)> = tree
            .walk()
            .into_iter()
            .map(|(depth, node)| (depth, node.name.as_str()))
            .collect();
        assert_eq!(
            listing,
            vec![(0, "King's Pawn"), (1, "French"), (1, "Sicilian"), (0, "Queen's Pawn")]
        );
    }

    #[test]
    fn test_to_json() {
        let tree = build_opening_tree(&[opening("A", "e2e4"), opening("B", "e2e4 e7e5")]);
        let json = tree.to_json();

        assert_eq!(json[0]["id"], "e2e4");
        assert_eq!(json[0]["moves"][0]["from"], "e2");
        assert_eq!(json[0]["children"][0]["name"], "B");
        assert_eq!(json[0]["children"][0]["children"], serde_json::json!([]));
    }
}
