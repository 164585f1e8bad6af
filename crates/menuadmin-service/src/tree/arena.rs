//! Arena representation of the menu forest.
//!
//! Nodes are stored once, keyed by id; parent and child relationships are
//! id references. A `MenuTree` is immutable after construction: the store
//! replaces it wholesale on every reload.

use std::collections::{HashMap, HashSet};

use menuadmin_core::error::AppError;
use menuadmin_core::result::AppResult;
use menuadmin_core::types::{Edge, MenuId, MenuNode, MenuTreeNode};

/// An acyclic, single-parent menu forest.
#[derive(Debug, Clone, Default)]
pub struct MenuTree {
    /// All nodes by id.
    nodes: HashMap<MenuId, MenuNode>,
    /// Child → parent.
    parents: HashMap<MenuId, MenuId>,
    /// Parent → children in sibling order.
    children: HashMap<MenuId, Vec<MenuId>>,
    /// Root nodes in order.
    roots: Vec<MenuId>,
}

impl MenuTree {
    /// Create an empty tree.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from the nested forest returned by `getTree()`.
    ///
    /// Sibling order is the order in which the backend lists children.
    pub fn from_forest(forest: Vec<MenuTreeNode>) -> AppResult<Self> {
        let mut tree = Self::empty();
        let mut stack: Vec<(Option<MenuId>, MenuTreeNode)> =
            forest.into_iter().rev().map(|n| (None, n)).collect();

        while let Some((parent, entry)) = stack.pop() {
            let MenuTreeNode { node, children } = entry;
            let id = node.id;

            if tree.nodes.contains_key(&id) {
                return Err(AppError::validation(format!(
                    "Menu node {id} appears more than once in the tree"
                )));
            }
            if node.is_item() && !children.is_empty() {
                return Err(AppError::validation(format!(
                    "Item '{}' cannot have children",
                    node.id_key
                )));
            }

            match parent {
                Some(parent_id) => {
                    tree.parents.insert(id, parent_id);
                    tree.children.entry(parent_id).or_default().push(id);
                }
                None => tree.roots.push(id),
            }
            tree.nodes.insert(id, node);

            stack.extend(children.into_iter().rev().map(|c| (Some(id), c)));
        }

        Ok(tree)
    }

    /// Build from flat node and edge lists.
    ///
    /// Nodes without an incoming edge become roots, ordered by their own
    /// `order`. Children are ordered by the edge `order`.
    pub fn from_edges(nodes: Vec<MenuNode>, edges: Vec<Edge>) -> AppResult<Self> {
        let mut tree = Self::empty();
        for node in nodes {
            let id = node.id;
            if tree.nodes.insert(id, node).is_some() {
                return Err(AppError::validation(format!("Duplicate menu node {id}")));
            }
        }

        let mut ordered: HashMap<MenuId, Vec<(i32, MenuId)>> = HashMap::new();
        for edge in &edges {
            let parent = tree.nodes.get(&edge.parent_id).ok_or_else(|| {
                AppError::validation(format!("Edge references unknown parent {}", edge.parent_id))
            })?;
            if !tree.nodes.contains_key(&edge.child_id) {
                return Err(AppError::validation(format!(
                    "Edge references unknown child {}",
                    edge.child_id
                )));
            }
            if parent.is_item() {
                return Err(AppError::validation(format!(
                    "Item '{}' cannot have children",
                    parent.id_key
                )));
            }
            if let Some(existing) = tree.parents.insert(edge.child_id, edge.parent_id) {
                return Err(AppError::validation(format!(
                    "Menu node {} has two parents ({existing} and {})",
                    edge.child_id, edge.parent_id
                )));
            }
            ordered
                .entry(edge.parent_id)
                .or_default()
                .push((edge.order, edge.child_id));
        }

        for (parent, mut kids) in ordered {
            kids.sort();
            tree.children
                .insert(parent, kids.into_iter().map(|(_, id)| id).collect());
        }

        let mut roots: Vec<&MenuNode> = tree
            .nodes
            .values()
            .filter(|n| !tree.parents.contains_key(&n.id))
            .collect();
        roots.sort_by_key(|n| (n.order, n.id));
        tree.roots = roots.into_iter().map(|n| n.id).collect();

        // Nodes on a cycle all have a parent, so they are unreachable from the roots.
        let reachable = tree.depth_first().len();
        if reachable != tree.nodes.len() {
            return Err(AppError::validation("Menu edges contain a cycle"));
        }

        Ok(tree)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node.
    pub fn get(&self, id: MenuId) -> Option<&MenuNode> {
        self.nodes.get(&id)
    }

    /// Whether the node exists.
    pub fn contains(&self, id: MenuId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Root ids in order.
    pub fn roots(&self) -> &[MenuId] {
        &self.roots
    }

    /// Child ids of a node in sibling order.
    pub fn children_of(&self, id: MenuId) -> &[MenuId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Parent of a node, `None` for roots and unknown ids.
    pub fn parent_of(&self, id: MenuId) -> Option<MenuId> {
        self.parents.get(&id).copied()
    }

    /// The ordered sibling list containing `id` (the root list for roots).
    pub fn siblings_of(&self, id: MenuId) -> AppResult<&[MenuId]> {
        if !self.contains(id) {
            return Err(AppError::not_found(format!("Menu node {id} not found")));
        }
        Ok(match self.parent_of(id) {
            Some(parent) => self.children_of(parent),
            None => &self.roots,
        })
    }

    /// 1-based position of a node among its siblings.
    pub fn position_of(&self, id: MenuId) -> Option<i32> {
        let siblings = self.siblings_of(id).ok()?;
        siblings
            .iter()
            .position(|s| *s == id)
            .map(|p| p as i32 + 1)
    }

    /// Ancestors of a node, nearest first.
    pub fn ancestors(&self, id: MenuId) -> Vec<MenuId> {
        let mut out = Vec::new();
        let mut current = self.parent_of(id);
        while let Some(parent) = current {
            out.push(parent);
            current = self.parent_of(parent);
        }
        out
    }

    /// Whether `candidate` lies strictly inside the subtree of `ancestor`.
    pub fn is_descendant(&self, candidate: MenuId, ancestor: MenuId) -> bool {
        self.ancestors(candidate).contains(&ancestor)
    }

    /// Nodes that may receive children, in display order.
    pub fn parent_candidates(&self) -> Vec<&MenuNode> {
        self.depth_first()
            .into_iter()
            .map(|(_, node)| node)
            .filter(|node| node.kind.is_container())
            .collect()
    }

    /// Find a node by its id key.
    pub fn find_by_id_key(&self, id_key: &str) -> Option<&MenuNode> {
        self.nodes.values().find(|n| n.id_key == id_key)
    }

    /// All nodes in display order, paired with their depth (roots are 0).
    pub fn depth_first(&self) -> Vec<(usize, &MenuNode)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut seen = HashSet::new();
        let mut stack: Vec<(usize, MenuId)> = self.roots.iter().rev().map(|id| (0, *id)).collect();

        while let Some((depth, id)) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            out.push((depth, node));
            stack.extend(self.children_of(id).iter().rev().map(|c| (depth + 1, *c)));
        }

        out
    }

    /// Rebuild the nested forest representation.
    pub fn to_forest(&self) -> Vec<MenuTreeNode> {
        self.roots.iter().filter_map(|id| self.subtree(*id)).collect()
    }

    fn subtree(&self, id: MenuId) -> Option<MenuTreeNode> {
        let node = self.nodes.get(&id)?.clone();
        let children = self
            .children_of(id)
            .iter()
            .filter_map(|c| self.subtree(*c))
            .collect();
        Some(MenuTreeNode::with_children(node, children))
    }
}
