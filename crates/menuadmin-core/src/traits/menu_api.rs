//! The remote menu-admin API the engine talks to.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::{
    ChildReorder, CreateGroup, CreateItem, DeleteOutcome, EdgeCreated, EdgeRemoved, MenuId,
    MenuNode, MenuTreeNode, NodePatch, RoleId, RoleMenuItem, RootReorder,
};

/// Remote collaborator owning the persisted menu tree and role assignments.
///
/// Implementations map every failure into an [`AppError`](crate::AppError)
/// with the matching [`ErrorKind`](crate::ErrorKind): structured field
/// messages as `Validation`, a vanished node or role as `NotFound`,
/// duplicates and order clashes as `Conflict`, anything else as
/// `Transport`.
#[async_trait]
pub trait MenuApi: Send + Sync + std::fmt::Debug + 'static {
    /// Fetch the full menu forest.
    async fn get_tree(&self) -> AppResult<Vec<MenuTreeNode>>;

    /// Create a group or collapse node.
    async fn create_group(&self, req: &CreateGroup) -> AppResult<MenuNode>;

    /// Create an item node, optionally attached to a parent.
    async fn create_item(&self, req: &CreateItem) -> AppResult<MenuNode>;

    /// Apply a partial update. Returns `None` when the node no longer exists.
    async fn update_node(&self, id: MenuId, patch: &NodePatch) -> AppResult<Option<MenuNode>>;

    /// Delete a node; `hard` removes it permanently instead of hiding it.
    async fn delete_node(&self, id: MenuId, hard: bool) -> AppResult<DeleteOutcome>;

    /// Attach `child_id` under `parent_id`, optionally at a given position.
    async fn add_edge(
        &self,
        parent_id: MenuId,
        child_id: MenuId,
        order: Option<i32>,
    ) -> AppResult<EdgeCreated>;

    /// Detach `child_id` from `parent_id`.
    async fn remove_edge(&self, parent_id: MenuId, child_id: MenuId) -> AppResult<EdgeRemoved>;

    /// Move a child to a 1-based position among its siblings.
    async fn reorder_child(
        &self,
        parent_id: MenuId,
        child_id: MenuId,
        new_order: i32,
    ) -> AppResult<ChildReorder>;

    /// Move a root node to a 1-based position among the roots.
    async fn reorder_root_group(&self, node_id: MenuId, new_order: i32) -> AppResult<RootReorder>;

    /// Fetch the menu forest annotated with a role's assignments.
    async fn get_role_menus(&self, role_id: RoleId) -> AppResult<Vec<RoleMenuItem>>;

    /// Persist the full set of menu ids assigned to a role.
    async fn save_role_menus(&self, role_id: RoleId, menu_ids: &[MenuId]) -> AppResult<()>;
}
