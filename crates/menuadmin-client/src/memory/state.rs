//! Persisted state of the in-memory backend and the rules applied to it.
//!
//! Sibling lists are kept as ordered vectors, so every sibling set is
//! contiguous `1..=N` by construction and a node's `order` is its index + 1.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use menuadmin_core::error::{AppError, FieldErrors};
use menuadmin_core::result::AppResult;
use menuadmin_core::types::{
    ChildReorder, CreateGroup, CreateItem, DeleteOutcome, EdgeCreated, EdgeRemoved, MenuId,
    MenuKind, MenuNode, MenuTreeNode, NodePatch, RoleId, RoleMenuItem, RootReorder,
};

#[derive(Debug, Clone)]
struct Stored {
    node: MenuNode,
    deleted: bool,
}

#[derive(Debug)]
pub(crate) struct MenuState {
    nodes: BTreeMap<MenuId, Stored>,
    /// Children of each parent, in sibling order.
    children: HashMap<MenuId, Vec<MenuId>>,
    /// Single parent of each attached node.
    parent: HashMap<MenuId, MenuId>,
    /// Parentless live nodes, in root order.
    roots: Vec<MenuId>,
    /// Assigned menu ids per role.
    roles: BTreeMap<RoleId, BTreeSet<MenuId>>,
    next_id: i64,
}

impl Default for MenuState {
    fn default() -> Self {
        Self {
            nodes: BTreeMap::new(),
            children: HashMap::new(),
            parent: HashMap::new(),
            roots: Vec::new(),
            roles: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl MenuState {
    /// Load a nested forest, keeping the given ids and sibling order.
    pub(crate) fn seed(&mut self, forest: Vec<MenuTreeNode>, parent: Option<MenuId>) -> AppResult<()> {
        for tree in forest {
            let id = tree.node.id;
            if self.nodes.contains_key(&id) {
                return Err(AppError::conflict(format!("Duplicate menu node {id}")));
            }
            if !tree.children.is_empty() && tree.node.is_item() {
                return Err(AppError::validation(format!(
                    "Item '{}' cannot have children",
                    tree.node.id_key
                )));
            }
            self.next_id = self.next_id.max(id.get() + 1);
            self.nodes.insert(
                id,
                Stored {
                    node: tree.node,
                    deleted: false,
                },
            );
            self.siblings_mut(parent).push(id);
            if let Some(p) = parent {
                self.parent.insert(id, p);
            }
            self.seed(tree.children, Some(id))?;
        }
        Ok(())
    }

    pub(crate) fn add_role(&mut self, role_id: RoleId, menu_ids: &[MenuId]) {
        self.roles
            .insert(role_id, menu_ids.iter().copied().collect());
    }

    pub(crate) fn tree(&self) -> Vec<MenuTreeNode> {
        self.build(&self.roots)
    }

    pub(crate) fn create_group(&mut self, req: &CreateGroup) -> AppResult<MenuNode> {
        let mut errors = validate_new(&req.id_key, &req.title);
        if !req.kind.is_container() {
            push(&mut errors, "type", "must be group or collapse");
        }
        reject(errors)?;
        self.ensure_unique(&req.id_key)?;

        let mut node = self.allocate(&req.id_key, &req.title, req.kind);
        node.icon = non_empty(req.icon.as_deref());
        node.caption = non_empty(req.caption.as_deref());
        node.active = req.active.unwrap_or(true);

        let id = node.id;
        self.nodes.insert(id, Stored { node, deleted: false });
        insert_at(&mut self.roots, id, req.order);
        self.live_node(id)
    }

    pub(crate) fn create_item(&mut self, req: &CreateItem) -> AppResult<MenuNode> {
        let mut errors = validate_new(&req.id_key, &req.title);
        if req.kind != MenuKind::Item {
            push(&mut errors, "type", "must be item");
        }
        if req.url.trim().is_empty() {
            push(&mut errors, "url", "is required");
        }
        if let Some(parent_id) = req.parent_id {
            let parent = self
                .live(parent_id)
                .ok_or_else(|| AppError::not_found(format!("Parent node {parent_id} not found")))?;
            if parent.is_item() {
                push(&mut errors, "parentId", "items cannot contain children");
            }
        }
        reject(errors)?;
        self.ensure_unique(&req.id_key)?;

        let mut node = self.allocate(&req.id_key, &req.title, MenuKind::Item);
        node.url = Some(req.url.trim().to_string());
        node.icon = non_empty(req.icon.as_deref());
        node.caption = non_empty(req.caption.as_deref());
        node.active = req.active.unwrap_or(true);

        let id = node.id;
        self.nodes.insert(id, Stored { node, deleted: false });
        match req.parent_id {
            Some(parent_id) => {
                self.parent.insert(id, parent_id);
                insert_at(self.siblings_mut(Some(parent_id)), id, req.child_order);
            }
            None => insert_at(&mut self.roots, id, req.order),
        }
        self.live_node(id)
    }

    pub(crate) fn update_node(&mut self, id: MenuId, patch: &NodePatch) -> AppResult<Option<MenuNode>> {
        let Some(current) = self.live(id) else {
            return Ok(None);
        };

        let mut errors = FieldErrors::new();
        if let Some(title) = &patch.title
            && title.trim().is_empty()
        {
            push(&mut errors, "title", "is required");
        }
        if let Some(url) = &patch.url {
            if !current.is_item() && !url.trim().is_empty() {
                push(&mut errors, "url", "only items have a url");
            } else if current.is_item() && url.trim().is_empty() {
                push(&mut errors, "url", "is required");
            }
        }
        if let Some(order) = patch.order
            && order < 1
        {
            push(&mut errors, "order", "must be at least 1");
        }
        reject(errors)?;

        if let Some(stored) = self.nodes.get_mut(&id) {
            let node = &mut stored.node;
            if let Some(title) = &patch.title {
                node.title = title.trim().to_string();
            }
            if let Some(url) = &patch.url {
                node.url = non_empty(Some(url.as_str()));
            }
            if let Some(icon) = &patch.icon {
                node.icon = non_empty(Some(icon.as_str()));
            }
            if let Some(caption) = &patch.caption {
                node.caption = non_empty(Some(caption.as_str()));
            }
        }
        if let Some(order) = patch.order {
            let parent = self.parent.get(&id).copied();
            let siblings = self.siblings_mut(parent);
            siblings.retain(|s| *s != id);
            insert_at(siblings, id, Some(order));
        }
        self.live_node(id).map(Some)
    }

    pub(crate) fn delete_node(&mut self, id: MenuId, hard: bool) -> DeleteOutcome {
        let Some(stored) = self.nodes.get(&id) else {
            return DeleteOutcome { deleted: false };
        };

        if !hard {
            if stored.deleted {
                return DeleteOutcome { deleted: false };
            }
            self.detach(id);
            if let Some(stored) = self.nodes.get_mut(&id) {
                stored.deleted = true;
            }
            return DeleteOutcome { deleted: true };
        }

        self.detach(id);
        for child in self.children.remove(&id).unwrap_or_default() {
            self.parent.remove(&child);
            self.roots.push(child);
        }
        self.nodes.remove(&id);
        for assigned in self.roles.values_mut() {
            assigned.remove(&id);
        }
        DeleteOutcome { deleted: true }
    }

    pub(crate) fn add_edge(
        &mut self,
        parent_id: MenuId,
        child_id: MenuId,
        order: Option<i32>,
    ) -> AppResult<EdgeCreated> {
        let parent = self
            .live(parent_id)
            .ok_or_else(|| AppError::not_found(format!("Parent node {parent_id} not found")))?;
        if parent.is_item() {
            return Err(AppError::field("parentId", "items cannot contain children"));
        }
        if self.live(child_id).is_none() {
            return Err(AppError::not_found(format!("Menu node {child_id} not found")));
        }
        if parent_id == child_id {
            return Err(AppError::field("parentId", "a node cannot be its own parent"));
        }
        match self.parent.get(&child_id) {
            Some(existing) if *existing == parent_id => {
                return Err(AppError::conflict(format!(
                    "Node {child_id} is already a child of {parent_id}"
                )));
            }
            Some(existing) => {
                return Err(AppError::conflict(format!(
                    "Node {child_id} already has parent {existing}"
                )));
            }
            None => {}
        }
        if self.is_descendant(parent_id, child_id) {
            return Err(AppError::field(
                "parentId",
                "a node cannot be moved under its own descendant",
            ));
        }

        self.roots.retain(|r| *r != child_id);
        self.parent.insert(child_id, parent_id);
        insert_at(self.siblings_mut(Some(parent_id)), child_id, order);
        Ok(EdgeCreated { created: true })
    }

    pub(crate) fn remove_edge(&mut self, parent_id: MenuId, child_id: MenuId) -> EdgeRemoved {
        if self.parent.get(&child_id) != Some(&parent_id) {
            return EdgeRemoved { deleted: false };
        }
        self.detach(child_id);
        if self.live(child_id).is_some() {
            self.roots.push(child_id);
        }
        EdgeRemoved { deleted: true }
    }

    pub(crate) fn reorder_child(
        &mut self,
        parent_id: MenuId,
        child_id: MenuId,
        new_order: i32,
    ) -> AppResult<ChildReorder> {
        if self.live(parent_id).is_none() {
            return Err(AppError::not_found(format!("Parent node {parent_id} not found")));
        }
        if self.parent.get(&child_id) != Some(&parent_id) {
            return Err(AppError::not_found(format!(
                "Node {child_id} is not a child of {parent_id}"
            )));
        }

        let siblings = self.siblings_mut(Some(parent_id));
        let (effective, max) = move_within(siblings, child_id, new_order);
        Ok(ChildReorder {
            effective_order: effective,
            max_order: max,
            message: clamp_message(new_order, effective, max),
        })
    }

    pub(crate) fn reorder_root_group(&mut self, node_id: MenuId, new_order: i32) -> AppResult<RootReorder> {
        if self.live(node_id).is_none() {
            return Err(AppError::not_found(format!("Menu node {node_id} not found")));
        }
        let Some(current) = self.roots.iter().position(|r| *r == node_id) else {
            return Err(AppError::validation(format!("Node {node_id} is not a root node")));
        };

        let (effective, max) = move_within(&mut self.roots, node_id, new_order);
        Ok(RootReorder {
            effective_order: effective,
            max_order: max,
            target_order: new_order,
            current_order: position(current),
            message: clamp_message(new_order, effective, max),
        })
    }

    pub(crate) fn role_menus(&self, role_id: RoleId) -> AppResult<Vec<RoleMenuItem>> {
        let assigned = self
            .roles
            .get(&role_id)
            .ok_or_else(|| AppError::not_found(format!("Role {role_id} not found")))?;
        Ok(self.build_role(&self.roots, assigned))
    }

    pub(crate) fn save_role_menus(&mut self, role_id: RoleId, menu_ids: &[MenuId]) -> AppResult<()> {
        if !self.roles.contains_key(&role_id) {
            return Err(AppError::not_found(format!("Role {role_id} not found")));
        }
        let unknown: Vec<String> = menu_ids
            .iter()
            .filter(|id| self.live(**id).is_none())
            .map(|id| id.to_string())
            .collect();
        if !unknown.is_empty() {
            return Err(AppError::field(
                "menuIds",
                format!("unknown menu ids: {}", unknown.join(", ")),
            ));
        }
        self.roles
            .insert(role_id, menu_ids.iter().copied().collect());
        Ok(())
    }

    fn live(&self, id: MenuId) -> Option<&MenuNode> {
        self.nodes
            .get(&id)
            .filter(|s| !s.deleted)
            .map(|s| &s.node)
    }

    /// A live node with its effective sibling order filled in.
    fn live_node(&self, id: MenuId) -> AppResult<MenuNode> {
        let mut node = self
            .live(id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Menu node {id} not found")))?;
        let siblings = match self.parent.get(&id) {
            Some(p) => self.children.get(p).map(Vec::as_slice).unwrap_or_default(),
            None => self.roots.as_slice(),
        };
        if let Some(index) = siblings.iter().position(|s| *s == id) {
            node.order = position(index);
        }
        Ok(node)
    }

    fn allocate(&mut self, id_key: &str, title: &str, kind: MenuKind) -> MenuNode {
        let id = self.next_id;
        self.next_id += 1;
        let mut node = match kind {
            MenuKind::Group => MenuNode::group(id, id_key, title),
            MenuKind::Collapse => MenuNode::collapse(id, id_key, title),
            MenuKind::Item => MenuNode::item(id, id_key, title, ""),
        };
        node.id_key = id_key.trim().to_string();
        node.title = title.trim().to_string();
        node
    }

    /// Id keys stay reserved by soft-deleted nodes.
    fn ensure_unique(&self, id_key: &str) -> AppResult<()> {
        let id_key = id_key.trim();
        if self.nodes.values().any(|s| s.node.id_key == id_key) {
            let mut errors = FieldErrors::new();
            push(&mut errors, "idKey", "already exists");
            return Err(
                AppError::conflict(format!("Id key '{id_key}' already exists")).with_field_errors(errors),
            );
        }
        Ok(())
    }

    fn siblings_mut(&mut self, parent: Option<MenuId>) -> &mut Vec<MenuId> {
        match parent {
            Some(p) => self.children.entry(p).or_default(),
            None => &mut self.roots,
        }
    }

    fn detach(&mut self, id: MenuId) {
        match self.parent.remove(&id) {
            Some(p) => {
                if let Some(siblings) = self.children.get_mut(&p) {
                    siblings.retain(|s| *s != id);
                }
            }
            None => self.roots.retain(|r| *r != id),
        }
    }

    /// Whether `candidate` sits somewhere below `ancestor`.
    fn is_descendant(&self, candidate: MenuId, ancestor: MenuId) -> bool {
        let mut current = self.parent.get(&candidate);
        while let Some(p) = current {
            if *p == ancestor {
                return true;
            }
            current = self.parent.get(p);
        }
        false
    }

    fn build(&self, ids: &[MenuId]) -> Vec<MenuTreeNode> {
        ids.iter()
            .enumerate()
            .filter_map(|(index, id)| {
                let mut node = self.live(*id)?.clone();
                node.order = position(index);
                let children = self.children.get(id).map(|c| self.build(c)).unwrap_or_default();
                Some(MenuTreeNode::with_children(node, children))
            })
            .collect()
    }

    fn build_role(&self, ids: &[MenuId], assigned: &BTreeSet<MenuId>) -> Vec<RoleMenuItem> {
        ids.iter()
            .enumerate()
            .filter_map(|(index, id)| {
                let mut node = self.live(*id)?.clone();
                node.order = position(index);
                let children = self
                    .children
                    .get(id)
                    .map(|c| self.build_role(c, assigned))
                    .unwrap_or_default();
                Some(RoleMenuItem::with_children(node, assigned.contains(id), children))
            })
            .collect()
    }
}

fn validate_new(id_key: &str, title: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    let id_key = id_key.trim();
    if id_key.is_empty() {
        push(&mut errors, "idKey", "is required");
    } else if id_key.chars().any(|c| c.is_whitespace() || c.is_uppercase()) {
        push(&mut errors, "idKey", "must be lowercase without spaces");
    }
    if title.trim().is_empty() {
        push(&mut errors, "title", "is required");
    }
    errors
}

fn reject(errors: FieldErrors) -> AppResult<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation("Validation failed").with_field_errors(errors))
    }
}

fn push(errors: &mut FieldErrors, field: &str, message: &str) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.to_string());
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn position(index: usize) -> i32 {
    i32::try_from(index + 1).unwrap_or(i32::MAX)
}

/// Insert at a 1-based position, clamped to `[1, len + 1]`; append when absent.
fn insert_at(list: &mut Vec<MenuId>, id: MenuId, order: Option<i32>) {
    let slot = match order {
        Some(order) => usize::try_from(order.max(1) - 1).unwrap_or(0).min(list.len()),
        None => list.len(),
    };
    list.insert(slot, id);
}

/// Move `id` to a clamped 1-based position. Returns `(effective, max)`.
fn move_within(list: &mut Vec<MenuId>, id: MenuId, requested: i32) -> (i32, i32) {
    list.retain(|s| *s != id);
    let max = position(list.len());
    let effective = requested.clamp(1, max);
    let slot = usize::try_from(effective - 1).unwrap_or(0);
    list.insert(slot, id);
    (effective, max)
}

fn clamp_message(requested: i32, effective: i32, max: i32) -> Option<String> {
    (requested != effective).then(|| {
        format!("Position {requested} is out of range; placed at position {effective} of {max}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> MenuState {
        let mut state = MenuState::default();
        state
            .seed(
                vec![
                    MenuTreeNode::with_children(
                        MenuNode::group(1, "ventas", "Ventas"),
                        vec![
                            MenuTreeNode::leaf(MenuNode::item(2, "reporte", "Reporte", "/ventas/reporte")),
                            MenuTreeNode::leaf(MenuNode::item(3, "historial", "Historial", "/ventas/historial")),
                            MenuTreeNode::leaf(MenuNode::item(4, "diario", "Diario", "/ventas/diario")),
                        ],
                    ),
                    MenuTreeNode::leaf(MenuNode::group(5, "admin", "Admin")),
                ],
                None,
            )
            .unwrap();
        state
    }

    fn child_orders(state: &MenuState) -> Vec<(i64, i32)> {
        state.tree()[0]
            .children
            .iter()
            .map(|c| (c.node.id.get(), c.node.order))
            .collect()
    }

    #[test]
    fn test_reorder_clamps_and_reports() {
        let mut state = seeded();
        let result = state.reorder_child(MenuId(1), MenuId(2), 9).unwrap();
        assert_eq!(result.effective_order, 3);
        assert_eq!(result.max_order, 3);
        assert!(result.message.is_some());
        assert_eq!(child_orders(&state), vec![(3, 1), (4, 2), (2, 3)]);

        let exact = state.reorder_child(MenuId(1), MenuId(2), 1).unwrap();
        assert_eq!(exact.message, None);
    }

    #[test]
    fn test_orders_stay_contiguous_after_soft_delete() {
        let mut state = seeded();
        assert!(state.delete_node(MenuId(3), false).deleted);
        assert_eq!(child_orders(&state), vec![(2, 1), (4, 2)]);
        assert!(!state.delete_node(MenuId(3), false).deleted);
        // Id keys stay reserved by the hidden node.
        let req = CreateGroup {
            id_key: "historial".into(),
            title: "Historial".into(),
            kind: MenuKind::Group,
            icon: None,
            caption: None,
            order: None,
            active: None,
        };
        let err = state.create_group(&req).unwrap_err();
        assert_eq!(err.kind, menuadmin_core::ErrorKind::Conflict);
    }

    #[test]
    fn test_hard_delete_promotes_children_to_roots() {
        let mut state = seeded();
        state.add_role(RoleId(1), &[MenuId(1), MenuId(2)]);
        assert!(state.delete_node(MenuId(1), true).deleted);

        let roots: Vec<i64> = state.tree().iter().map(|t| t.node.id.get()).collect();
        assert_eq!(roots, vec![5, 2, 3, 4]);
        let role = state.role_menus(RoleId(1)).unwrap();
        assert!(role.iter().all(|r| r.node.id != MenuId(1)));
    }

    #[test]
    fn test_single_parent_enforced() {
        let mut state = seeded();
        let err = state.add_edge(MenuId(5), MenuId(2), None).unwrap_err();
        assert_eq!(err.kind, menuadmin_core::ErrorKind::Conflict);

        assert!(state.remove_edge(MenuId(1), MenuId(2)).deleted);
        assert!(state.add_edge(MenuId(5), MenuId(2), Some(1)).unwrap().created);
        assert_eq!(state.tree()[1].children[0].node.id, MenuId(2));
    }

    #[test]
    fn test_cycle_rejected() {
        let mut state = seeded();
        state.remove_edge(MenuId(1), MenuId(2));
        state.add_edge(MenuId(1), MenuId(5), None).unwrap();
        let err = state.add_edge(MenuId(5), MenuId(1), None).unwrap_err();
        assert_eq!(err.kind, menuadmin_core::ErrorKind::Validation);
    }

    #[test]
    fn test_create_item_under_item_rejected() {
        let mut state = seeded();
        let req = CreateItem {
            id_key: "nested".into(),
            title: "Nested".into(),
            kind: MenuKind::Item,
            url: "/reporte/nested".into(),
            icon: None,
            caption: None,
            external: None,
            target_blank: None,
            breadcrumbs: None,
            order: None,
            active: None,
            parent_id: Some(MenuId(2)),
            child_order: None,
        };
        let err = state.create_item(&req).unwrap_err();
        assert!(err.field_errors.contains_key("parentId"));
    }

    #[test]
    fn test_save_role_menus_rejects_unknown_ids() {
        let mut state = seeded();
        state.add_role(RoleId(7), &[]);
        let err = state
            .save_role_menus(RoleId(7), &[MenuId(1), MenuId(42)])
            .unwrap_err();
        assert!(err.field_errors.contains_key("menuIds"));
        assert!(state.save_role_menus(RoleId(8), &[]).is_err());
    }
}
