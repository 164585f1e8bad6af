//! [`MenuApi`] implementation backed by process memory.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use menuadmin_core::error::AppError;
use menuadmin_core::result::AppResult;
use menuadmin_core::traits::MenuApi;
use menuadmin_core::types::{
    ChildReorder, CreateGroup, CreateItem, DeleteOutcome, EdgeCreated, EdgeRemoved, MenuId,
    MenuNode, MenuTreeNode, NodePatch, RoleId, RoleMenuItem, RootReorder,
};

use super::state::MenuState;

/// One call received by an [`InMemoryMenuApi`], with its arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    /// Full forest fetch.
    GetTree,
    /// New root group or collapse.
    CreateGroup(CreateGroup),
    /// New item.
    CreateItem(CreateItem),
    /// Node id and the patch sent for it.
    UpdateNode(MenuId, NodePatch),
    /// Node id and whether the delete was hard.
    DeleteNode(MenuId, bool),
    /// Parent id, child id, requested order.
    AddEdge(MenuId, MenuId, Option<i32>),
    /// Parent id, child id.
    RemoveEdge(MenuId, MenuId),
    /// Parent id, child id, requested position.
    ReorderChild(MenuId, MenuId, i32),
    /// Root group id, requested position.
    ReorderRootGroup(MenuId, i32),
    /// Role whose tree was fetched.
    GetRoleMenus(RoleId),
    /// Role id and the ids saved for it.
    SaveRoleMenus(RoleId, Vec<MenuId>),
}

impl ApiCall {
    /// Whether the call changes backend state.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::GetTree | Self::GetRoleMenus(_))
    }
}

/// In-process menu backend.
///
/// Applies the same rules as the REST backend: unique id keys, a single
/// parent per node, contiguous sibling orders, clamped reorders with an
/// advisory message, soft and hard deletes. Every call is journaled, and
/// failures can be queued to exercise error paths.
///
/// The journal is never trimmed. It exists for tests; a long-lived
/// instance should call [`clear_calls`](Self::clear_calls) periodically.
#[derive(Debug, Default)]
pub struct InMemoryMenuApi {
    state: RwLock<MenuState>,
    calls: Mutex<Vec<ApiCall>>,
    failures: Mutex<VecDeque<(AppError, Option<Duration>)>>,
    latency: Option<Duration>,
}

impl InMemoryMenuApi {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend holding the given forest. Ids and sibling order are kept.
    pub fn from_forest(forest: Vec<MenuTreeNode>) -> AppResult<Self> {
        let mut state = MenuState::default();
        state.seed(forest, None)?;
        Ok(Self {
            state: RwLock::new(state),
            ..Self::default()
        })
    }

    /// Delay every call by `latency` before it touches the state.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Register a role with its initially assigned menu ids.
    pub async fn add_role(&self, role_id: RoleId, menu_ids: &[MenuId]) {
        self.state.write().await.add_role(role_id, menu_ids);
    }

    /// Make the next call fail with `err`. Queued failures are consumed in order.
    pub fn fail_next(&self, err: AppError) {
        lock(&self.failures).push_back((err, None));
    }

    /// Like [`fail_next`](Self::fail_next), but the failing call only returns
    /// after an extra `delay`, so later calls can overtake it.
    pub fn fail_next_after(&self, err: AppError, delay: Duration) {
        lock(&self.failures).push_back((err, Some(delay)));
    }

    /// All calls received so far.
    pub fn calls(&self) -> Vec<ApiCall> {
        lock(&self.calls).clone()
    }

    /// Calls that change backend state.
    pub fn mutations(&self) -> Vec<ApiCall> {
        lock(&self.calls)
            .iter()
            .filter(|c| c.is_mutation())
            .cloned()
            .collect()
    }

    /// Forget the journal.
    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }

    async fn enter(&self, call: ApiCall) -> AppResult<()> {
        debug!(call = ?call, "In-memory menu API call");
        lock(&self.calls).push(call);
        let failure = lock(&self.failures).pop_front();
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        match failure {
            Some((err, delay)) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                Err(err)
            }
            None => Ok(()),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl MenuApi for InMemoryMenuApi {
    async fn get_tree(&self) -> AppResult<Vec<MenuTreeNode>> {
        self.enter(ApiCall::GetTree).await?;
        Ok(self.state.read().await.tree())
    }

    async fn create_group(&self, req: &CreateGroup) -> AppResult<MenuNode> {
        self.enter(ApiCall::CreateGroup(req.clone())).await?;
        self.state.write().await.create_group(req)
    }

    async fn create_item(&self, req: &CreateItem) -> AppResult<MenuNode> {
        self.enter(ApiCall::CreateItem(req.clone())).await?;
        self.state.write().await.create_item(req)
    }

    async fn update_node(&self, id: MenuId, patch: &NodePatch) -> AppResult<Option<MenuNode>> {
        self.enter(ApiCall::UpdateNode(id, patch.clone())).await?;
        self.state.write().await.update_node(id, patch)
    }

    async fn delete_node(&self, id: MenuId, hard: bool) -> AppResult<DeleteOutcome> {
        self.enter(ApiCall::DeleteNode(id, hard)).await?;
        Ok(self.state.write().await.delete_node(id, hard))
    }

    async fn add_edge(
        &self,
        parent_id: MenuId,
        child_id: MenuId,
        order: Option<i32>,
    ) -> AppResult<EdgeCreated> {
        self.enter(ApiCall::AddEdge(parent_id, child_id, order)).await?;
        self.state.write().await.add_edge(parent_id, child_id, order)
    }

    async fn remove_edge(&self, parent_id: MenuId, child_id: MenuId) -> AppResult<EdgeRemoved> {
        self.enter(ApiCall::RemoveEdge(parent_id, child_id)).await?;
        Ok(self.state.write().await.remove_edge(parent_id, child_id))
    }

    async fn reorder_child(
        &self,
        parent_id: MenuId,
        child_id: MenuId,
        new_order: i32,
    ) -> AppResult<ChildReorder> {
        self.enter(ApiCall::ReorderChild(parent_id, child_id, new_order))
            .await?;
        self.state
            .write()
            .await
            .reorder_child(parent_id, child_id, new_order)
    }

    async fn reorder_root_group(&self, node_id: MenuId, new_order: i32) -> AppResult<RootReorder> {
        self.enter(ApiCall::ReorderRootGroup(node_id, new_order))
            .await?;
        self.state
            .write()
            .await
            .reorder_root_group(node_id, new_order)
    }

    async fn get_role_menus(&self, role_id: RoleId) -> AppResult<Vec<RoleMenuItem>> {
        self.enter(ApiCall::GetRoleMenus(role_id)).await?;
        self.state.read().await.role_menus(role_id)
    }

    async fn save_role_menus(&self, role_id: RoleId, menu_ids: &[MenuId]) -> AppResult<()> {
        self.enter(ApiCall::SaveRoleMenus(role_id, menu_ids.to_vec()))
            .await?;
        self.state
            .write()
            .await
            .save_role_menus(role_id, menu_ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use menuadmin_core::ErrorKind;

    #[tokio::test]
    async fn test_journal_and_injected_failure() {
        let api = InMemoryMenuApi::from_forest(vec![MenuTreeNode::leaf(MenuNode::group(
            1, "ventas", "Ventas",
        ))])
        .unwrap();

        api.fail_next(AppError::transport("connection reset"));
        let err = api.get_tree().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Transport);

        let tree = api.get_tree().await.unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(api.calls(), vec![ApiCall::GetTree, ApiCall::GetTree]);
        assert!(api.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_node_returns_none() {
        let api = InMemoryMenuApi::new();
        let patch = NodePatch {
            title: Some("X".into()),
            ..NodePatch::default()
        };
        assert_eq!(api.update_node(MenuId(9), &patch).await.unwrap(), None);
    }
}
