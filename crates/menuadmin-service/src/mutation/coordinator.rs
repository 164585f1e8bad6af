//! State machine driving create/edit/delete/move/reorder intents.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tracing::{error, info, warn};

use menuadmin_core::error::{AppError, ErrorKind, FieldErrors};
use menuadmin_core::result::AppResult;
use menuadmin_core::traits::{MenuApi, Notice, Notifier};
use menuadmin_core::types::{
    CreateGroup, CreateItem, MenuId, MenuKind, MenuNode, NodePatch,
};

use super::busy::BusyTokens;
use super::diff::minimal_diff;
use super::draft::{CoordinatorState, NodeDraft, derive_item_url, normalize_id_key};
use crate::tree::{MenuTree, MenuTreeStore, SiblingOrderResolver};

/// Values for a new group or collapse node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupInput {
    /// Id key as typed.
    pub id_key: String,
    /// Title.
    pub title: String,
    /// `Group` or `Collapse`.
    pub kind: MenuKind,
    /// Icon name.
    pub icon: Option<String>,
    /// Caption.
    pub caption: Option<String>,
}

impl GroupInput {
    /// A plain group with no icon or caption.
    pub fn new(id_key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id_key: id_key.into(),
            title: title.into(),
            kind: MenuKind::Group,
            icon: None,
            caption: None,
        }
    }
}

/// Values for a new item node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemInput {
    /// Id key as typed.
    pub id_key: String,
    /// Title.
    pub title: String,
    /// Parent node; required.
    pub parent_id: Option<MenuId>,
    /// Icon name.
    pub icon: Option<String>,
    /// Caption.
    pub caption: Option<String>,
    /// Whether the URL points outside the console.
    pub external: bool,
    /// Open in a new browser tab.
    pub target_blank: bool,
    /// Show breadcrumbs on the target page.
    pub breadcrumbs: bool,
}

impl ItemInput {
    /// An item with default presentation flags.
    pub fn new(
        id_key: impl Into<String>,
        title: impl Into<String>,
        parent_id: Option<MenuId>,
    ) -> Self {
        Self {
            id_key: id_key.into(),
            title: title.into(),
            parent_id,
            icon: None,
            caption: None,
            external: false,
            target_blank: false,
            breadcrumbs: true,
        }
    }
}

/// Result of [`TreeMutationCoordinator::update_node`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum UpdateOutcome {
    /// The patch matched the current values; nothing was sent.
    Unchanged,
    /// The backend applied the patch.
    Updated(MenuNode),
}

/// Result of [`TreeMutationCoordinator::move_node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MoveOutcome {
    /// The node already sits under the requested parent.
    Unchanged,
    /// Both edge calls that were needed succeeded.
    Moved {
        /// Parent the node was removed from.
        detached_from: Option<MenuId>,
        /// Parent the node was added to.
        attached_to: Option<MenuId>,
    },
}

/// Result of [`TreeMutationCoordinator::reorder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReorderOutcome {
    /// Node that was moved.
    pub node_id: MenuId,
    /// Its parent, `None` for root groups.
    pub parent_id: Option<MenuId>,
    /// Position the operator asked for.
    pub requested: i32,
    /// Clamped position that was sent.
    pub sent: i32,
    /// Position the backend applied.
    pub effective_order: i32,
    /// Sibling count reported by the backend.
    pub max_order: i32,
    /// Advisory message from the backend.
    pub message: Option<String>,
}

#[derive(Debug)]
struct Session {
    state: CoordinatorState,
    draft: NodeDraft,
}

/// Coordinates structural mutations of the menu tree.
///
/// Every successful mutation ends with a reload of the [`MenuTreeStore`];
/// the coordinator never patches the local snapshot. Mutations on the same
/// node are serialized by a busy token, mutations on different nodes are
/// not ordered.
#[derive(Debug)]
pub struct TreeMutationCoordinator {
    /// Remote API.
    api: Arc<dyn MenuApi>,
    /// Tree snapshot holder.
    store: Arc<MenuTreeStore>,
    /// Operator notifications.
    notifier: Arc<dyn Notifier>,
    /// Per-node in-flight markers.
    busy: BusyTokens,
    /// Active state and draft.
    session: Mutex<Session>,
}

impl TreeMutationCoordinator {
    /// Creates a new coordinator in the `Idle` state.
    pub fn new(
        api: Arc<dyn MenuApi>,
        store: Arc<MenuTreeStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            api,
            store,
            notifier,
            busy: BusyTokens::new(),
            session: Mutex::new(Session {
                state: CoordinatorState::Idle,
                draft: NodeDraft::default(),
            }),
        }
    }

    /// The tree store this coordinator reloads.
    pub fn store(&self) -> &Arc<MenuTreeStore> {
        &self.store
    }

    /// The active state.
    pub fn state(&self) -> CoordinatorState {
        self.session().state.clone()
    }

    /// The working draft of the active state.
    pub fn draft(&self) -> NodeDraft {
        self.session().draft.clone()
    }

    /// Edit the working draft in place.
    pub fn update_draft(&self, edit: impl FnOnce(&mut NodeDraft)) {
        edit(&mut self.session().draft);
    }

    /// Whether a mutation on `id` is in flight.
    pub fn is_busy(&self, id: MenuId) -> bool {
        self.busy.is_busy(id)
    }

    // ── State transitions ───────────────────────────────────────

    /// Start creating a group.
    pub fn begin_create_group(&self) {
        self.enter(CoordinatorState::CreatingGroup, NodeDraft::for_group());
    }

    /// Start creating an item, optionally under a preselected parent.
    pub fn begin_create_item(&self, parent_id: Option<MenuId>) {
        self.enter(CoordinatorState::CreatingItem, NodeDraft::for_item(parent_id));
    }

    /// Start editing a node; the draft is seeded from its current values.
    pub async fn begin_edit(&self, id: MenuId) -> AppResult<()> {
        let (node, parent) = self.lookup(id, "Cannot edit").await?;
        let draft = NodeDraft::from_node(&node, parent);
        self.enter(CoordinatorState::Editing(node), draft);
        Ok(())
    }

    /// Start choosing a new parent for a node.
    pub async fn begin_move(&self, id: MenuId) -> AppResult<()> {
        let (node, parent) = self.lookup(id, "Cannot move").await?;
        let draft = NodeDraft::from_node(&node, parent);
        self.enter(CoordinatorState::Moving(node), draft);
        Ok(())
    }

    /// Start choosing a new position for a node.
    pub async fn begin_reorder(&self, id: MenuId) -> AppResult<()> {
        let (node, parent) = self.lookup(id, "Cannot reorder").await?;
        let draft = NodeDraft::from_node(&node, parent);
        self.enter(CoordinatorState::Reordering(node), draft);
        Ok(())
    }

    /// Ask for confirmation before deleting a node.
    ///
    /// The current state is kept so that cancelling returns to it.
    pub async fn request_delete(&self, id: MenuId) -> AppResult<()> {
        let (node, _) = self.lookup(id, "Cannot delete").await?;
        let mut session = self.session();
        let previous = std::mem::replace(&mut session.state, CoordinatorState::Idle);
        let resume = match previous {
            CoordinatorState::ConfirmingDelete { resume, .. } => resume,
            other => Box::new(other),
        };
        session.state = CoordinatorState::ConfirmingDelete { node, resume };
        Ok(())
    }

    /// Leave the active state. A pending delete confirmation returns to the
    /// state it interrupted; anything else returns to `Idle`.
    pub fn cancel(&self) {
        let mut session = self.session();
        let previous = std::mem::replace(&mut session.state, CoordinatorState::Idle);
        match previous {
            CoordinatorState::ConfirmingDelete { resume, .. } => session.state = *resume,
            _ => session.draft = NodeDraft::default(),
        }
    }

    // ── Mutations ───────────────────────────────────────────────

    /// Create a group or collapse node at the root.
    pub async fn create_group(&self, input: GroupInput) -> AppResult<MenuNode> {
        self.clear_draft_errors();
        let id_key = normalize_id_key(&input.id_key);
        let title = input.title.trim().to_string();

        let mut errors = FieldErrors::new();
        require(&mut errors, "idKey", &id_key, "Id key is required");
        require(&mut errors, "title", &title, "Title is required");
        if !input.kind.is_container() {
            push(&mut errors, "type", "A group must be of kind group or collapse");
        }
        if !errors.is_empty() {
            let err = AppError::validation("Group is incomplete").with_field_errors(errors);
            return Err(self.fail(err, None, "Cannot create group").await);
        }

        let req = CreateGroup {
            id_key,
            title,
            kind: input.kind,
            icon: non_empty(input.icon),
            caption: non_empty(input.caption),
            order: None,
            active: Some(true),
        };

        match self.api.create_group(&req).await {
            Ok(node) => {
                info!(node_id = %node.id, id_key = %node.id_key, kind = %node.kind, "Menu group created");
                self.notifier
                    .notify(Notice::success(format!("Group '{}' created", node.title)));
                self.reset_to_idle();
                self.refresh().await;
                Ok(node)
            }
            Err(e) => Err(self.fail(e, None, "Failed to create group").await),
        }
    }

    /// Create an item under its parent. The URL is derived from the
    /// parent's id key and the item's id key.
    pub async fn create_item(&self, input: ItemInput) -> AppResult<MenuNode> {
        self.clear_draft_errors();
        let tree = self.store.snapshot().await;
        let id_key = normalize_id_key(&input.id_key);
        let title = input.title.trim().to_string();

        let mut errors = FieldErrors::new();
        require(&mut errors, "idKey", &id_key, "Id key is required");
        require(&mut errors, "title", &title, "Title is required");

        let parent = match input.parent_id {
            None => {
                push(&mut errors, "parentId", "Parent is required");
                None
            }
            Some(parent_id) => match tree.get(parent_id) {
                None => {
                    let err = AppError::not_found(format!("Parent node {parent_id} not found"));
                    return Err(self.fail(err, None, "Cannot create item").await);
                }
                Some(parent) if !parent.kind.is_container() => {
                    push(&mut errors, "parentId", "Items cannot contain children");
                    None
                }
                Some(parent) => Some(parent.clone()),
            },
        };

        let url = parent
            .as_ref()
            .map(|p| derive_item_url(&p.id_key, &id_key))
            .unwrap_or_default();
        if url.is_empty() && !errors.contains_key("parentId") {
            push(&mut errors, "url", "URL is required");
        }
        if !errors.is_empty() {
            let err = AppError::validation("Item is incomplete").with_field_errors(errors);
            return Err(self.fail(err, None, "Cannot create item").await);
        }

        let req = CreateItem {
            id_key,
            title,
            kind: MenuKind::Item,
            url,
            icon: non_empty(input.icon),
            caption: non_empty(input.caption),
            external: Some(input.external),
            target_blank: Some(input.target_blank),
            breadcrumbs: Some(input.breadcrumbs),
            order: None,
            active: Some(true),
            parent_id: parent.map(|p| p.id),
            child_order: None,
        };

        match self.api.create_item(&req).await {
            Ok(node) => {
                info!(
                    node_id = %node.id,
                    id_key = %node.id_key,
                    parent_id = ?req.parent_id,
                    url = %req.url,
                    "Menu item created"
                );
                self.notifier
                    .notify(Notice::success(format!("Item '{}' created", node.title)));
                self.reset_to_idle();
                self.refresh().await;
                Ok(node)
            }
            Err(e) => Err(self.fail(e, None, "Failed to create item").await),
        }
    }

    /// Update the editable fields of a node.
    ///
    /// Only fields whose trimmed value differs from the node being edited
    /// (or, outside an edit, from the current snapshot) are sent. An empty
    /// difference is reported as "nothing to save" without a remote call.
    pub async fn update_node(&self, id: MenuId, patch: NodePatch) -> AppResult<UpdateOutcome> {
        self.clear_draft_errors();
        let editing = match &self.session().state {
            CoordinatorState::Editing(node) if node.id == id => Some(node.clone()),
            _ => None,
        };
        let original = match editing {
            Some(node) => node,
            None => self.lookup(id, "Cannot update").await?.0,
        };

        let diff = minimal_diff(&original, &patch);
        if diff.is_empty() {
            self.notifier.notify(Notice::info("Nothing to save"));
            return Ok(UpdateOutcome::Unchanged);
        }

        let mut errors = FieldErrors::new();
        if diff.title.as_deref() == Some("") {
            push(&mut errors, "title", "Title is required");
        }
        if diff.order.is_some_and(|order| order < 1) {
            push(&mut errors, "order", "Order must be at least 1");
        }
        if !errors.is_empty() {
            let err = AppError::validation("Invalid changes").with_field_errors(errors);
            return Err(self.fail(err, Some(id), "Cannot update").await);
        }

        let _guard = match self.busy.acquire(id) {
            Ok(guard) => guard,
            Err(e) => return Err(self.fail(e, Some(id), "Cannot update").await),
        };

        match self.api.update_node(id, &diff).await {
            Ok(Some(node)) => {
                info!(node_id = %id, patch = ?diff, "Menu node updated");
                self.notifier
                    .notify(Notice::success(format!("'{}' updated", node.title)));
                self.leave_if_targeting(id);
                self.refresh().await;
                Ok(UpdateOutcome::Updated(node))
            }
            Ok(None) => {
                let err = AppError::not_found(format!("Menu node {id} no longer exists"));
                Err(self.fail(err, Some(id), "Failed to update").await)
            }
            Err(e) => Err(self.fail(e, Some(id), "Failed to update").await),
        }
    }

    /// Execute the pending delete confirmation.
    pub async fn confirm_delete(&self, hard: bool) -> AppResult<()> {
        let pending = match &self.session().state {
            CoordinatorState::ConfirmingDelete { node, .. } => Some(node.id),
            _ => None,
        };
        match pending {
            Some(id) => self.delete_node(id, hard).await,
            None => {
                let err = AppError::validation("No deletion is awaiting confirmation");
                Err(self.fail(err, None, "Cannot delete").await)
            }
        }
    }

    /// Delete a node whose deletion has been confirmed via
    /// [`request_delete`](Self::request_delete). `hard` removes it
    /// permanently; otherwise it is soft-deleted.
    pub async fn delete_node(&self, id: MenuId, hard: bool) -> AppResult<()> {
        let confirmed = matches!(
            &self.session().state,
            CoordinatorState::ConfirmingDelete { node, .. } if node.id == id
        );
        if !confirmed {
            let err = AppError::validation(format!("Deleting menu node {id} requires confirmation"));
            return Err(self.fail(err, Some(id), "Cannot delete").await);
        }

        let _guard = match self.busy.acquire(id) {
            Ok(guard) => guard,
            Err(e) => return Err(self.fail(e, Some(id), "Cannot delete").await),
        };

        match self.api.delete_node(id, hard).await {
            Ok(outcome) if outcome.deleted => {
                info!(node_id = %id, hard, "Menu node deleted");
                self.finish_delete(id);
                let message = if hard {
                    "Menu node permanently deleted"
                } else {
                    "Menu node deleted"
                };
                self.notifier.notify(Notice::success(message));
                self.refresh().await;
                Ok(())
            }
            Ok(_) => {
                let err = AppError::not_found(format!("Menu node {id} no longer exists"));
                Err(self.fail(err, Some(id), "Failed to delete").await)
            }
            Err(e) => Err(self.fail(e, Some(id), "Failed to delete").await),
        }
    }

    /// Move a node under a new parent, or to the root when `new_parent` is
    /// `None`.
    ///
    /// This is two independent edge calls: remove from the old parent, then
    /// add to the new one. If the second call fails the node is left without
    /// a parent; this is reported and not retried.
    pub async fn move_node(
        &self,
        node_id: MenuId,
        new_parent: Option<MenuId>,
    ) -> AppResult<MoveOutcome> {
        let tree = self.store.snapshot().await;
        if let Err(e) = validate_move(&tree, node_id, new_parent) {
            return Err(self.fail(e, Some(node_id), "Cannot move").await);
        }

        let old_parent = tree.parent_of(node_id);
        if old_parent == new_parent {
            self.notifier.notify(Notice::info("Nothing to move"));
            return Ok(MoveOutcome::Unchanged);
        }

        let _guard = match self.busy.acquire(node_id) {
            Ok(guard) => guard,
            Err(e) => return Err(self.fail(e, Some(node_id), "Cannot move").await),
        };

        if let Some(old) = old_parent {
            match self.api.remove_edge(old, node_id).await {
                Ok(removed) if removed.deleted => {
                    info!(node_id = %node_id, parent_id = %old, "Menu node detached");
                    self.notifier.notify(Notice::success("Removed from old parent"));
                }
                Ok(_) => {
                    let err = AppError::not_found(format!(
                        "Menu node {node_id} is no longer a child of {old}"
                    ));
                    let err = self.fail(err, Some(node_id), "Failed to remove from old parent");
                    return Err(err.await);
                }
                Err(e) => {
                    let err = self.fail(e, Some(node_id), "Failed to remove from old parent");
                    return Err(err.await);
                }
            }
        }

        if let Some(new) = new_parent {
            let added = match self.api.add_edge(new, node_id, None).await {
                Ok(created) if created.created => Ok(()),
                Ok(_) => Err(AppError::conflict(format!(
                    "Menu node {node_id} is already a child of {new}"
                ))),
                Err(e) => Err(e),
            };
            if let Err(e) = added {
                let err = self.fail(e, Some(node_id), "Failed to add to new parent").await;
                if old_parent.is_some() {
                    warn!(node_id = %node_id, "Menu node left without a parent after failed move");
                    // The old edge is already gone, so the draft no longer matches the server.
                    if err.is_recoverable() {
                        self.leave_if_targeting(node_id);
                        self.refresh().await;
                    }
                }
                return Err(err);
            }
            info!(node_id = %node_id, parent_id = %new, "Menu node attached");
            self.notifier.notify(Notice::success("Added to new parent"));
        }

        self.leave_if_targeting(node_id);
        self.refresh().await;
        Ok(MoveOutcome::Moved {
            detached_from: old_parent,
            attached_to: new_parent,
        })
    }

    /// Move a node to a 1-based position among its siblings.
    ///
    /// The position is clamped to the sibling count before it is sent. The
    /// backend's effective order and advisory message are reported as-is.
    pub async fn reorder(
        &self,
        node_id: MenuId,
        parent_id: Option<MenuId>,
        requested: i32,
    ) -> AppResult<ReorderOutcome> {
        let tree = self.store.snapshot().await;
        let plan = match SiblingOrderResolver::resolve(&tree, node_id, parent_id, requested) {
            Ok(plan) => plan,
            Err(e) => return Err(self.fail(e, Some(node_id), "Cannot reorder").await),
        };

        let _guard = match self.busy.acquire(node_id) {
            Ok(guard) => guard,
            Err(e) => return Err(self.fail(e, Some(node_id), "Cannot reorder").await),
        };

        let result = match parent_id {
            Some(parent) => self
                .api
                .reorder_child(parent, node_id, plan.position)
                .await
                .map(|r| (r.effective_order, r.max_order, r.message)),
            None => self
                .api
                .reorder_root_group(node_id, plan.position)
                .await
                .map(|r| (r.effective_order, r.max_order, r.message)),
        };

        match result {
            Ok((effective_order, max_order, message)) => {
                info!(
                    node_id = %node_id,
                    parent_id = ?parent_id,
                    requested,
                    sent = plan.position,
                    effective_order,
                    "Menu node reordered"
                );
                match &message {
                    Some(text) => self.notifier.notify(Notice::warning(text.clone())),
                    None => self.notifier.notify(Notice::success(format!(
                        "Moved to position {effective_order} of {max_order}"
                    ))),
                }
                self.leave_if_targeting(node_id);
                self.refresh().await;
                Ok(ReorderOutcome {
                    node_id,
                    parent_id,
                    requested,
                    sent: plan.position,
                    effective_order,
                    max_order,
                    message,
                })
            }
            Err(e) => Err(self.fail(e, Some(node_id), "Failed to reorder").await),
        }
    }

    // ── Internals ───────────────────────────────────────────────

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn enter(&self, state: CoordinatorState, draft: NodeDraft) {
        let mut session = self.session();
        session.state = state;
        session.draft = draft;
    }

    fn reset_to_idle(&self) {
        self.enter(CoordinatorState::Idle, NodeDraft::default());
    }

    fn clear_draft_errors(&self) {
        self.session().draft.errors.clear();
    }

    /// Return to `Idle` if the active state targets `id`.
    fn leave_if_targeting(&self, id: MenuId) {
        let targeting = self.session().state.involves(id);
        if targeting {
            self.reset_to_idle();
        }
    }

    fn finish_delete(&self, id: MenuId) {
        let mut session = self.session();
        let previous = std::mem::replace(&mut session.state, CoordinatorState::Idle);
        let next = match previous {
            CoordinatorState::ConfirmingDelete { node, resume } if node.id == id => *resume,
            other => other,
        };
        if next.involves(id) {
            session.draft = NodeDraft::default();
        } else {
            session.state = next;
        }
    }

    async fn lookup(&self, id: MenuId, context: &str) -> AppResult<(MenuNode, Option<MenuId>)> {
        let tree = self.store.snapshot().await;
        match tree.get(id) {
            Some(node) => Ok((node.clone(), tree.parent_of(id))),
            None => {
                let err = AppError::not_found(format!("Menu node {id} not found"));
                Err(self.fail(err, Some(id), context).await)
            }
        }
    }

    /// Reload the store, reporting but not propagating failures.
    async fn refresh(&self) {
        if let Err(e) = self.store.reload().await {
            match e.kind {
                ErrorKind::Authentication => self.notifier.on_unauthorized(),
                ErrorKind::Authorization => self.notifier.on_forbidden(),
                _ => self.notifier.notify(Notice::error(format!(
                    "Failed to reload menu tree: {}",
                    e.message
                ))),
            }
        }
    }

    /// Apply the error policy and hand the error back to the caller.
    ///
    /// `target` is the node the failed call acted on, or `None` for a
    /// create. Only an active state owning that target is touched, so a
    /// failure on one node never discards an edit open on another.
    ///
    /// Validation, conflict, and busy errors keep the draft open.
    /// Not-found errors silently drop the stale state and reload.
    /// Everything else is reported, aborts to `Idle`, and reloads.
    async fn fail(&self, err: AppError, target: Option<MenuId>, context: &str) -> AppError {
        match err.kind {
            ErrorKind::Validation => {
                warn!(error = %err, "{context}");
                let in_draft = {
                    let mut session = self.session();
                    let owned = owns(&session.state, target);
                    if owned {
                        session.draft.errors = err.field_errors.clone();
                    }
                    owned && !err.field_errors.is_empty()
                };
                if !in_draft {
                    self.notifier
                        .notify(Notice::error(format!("{context}: {}", err.message)));
                }
            }
            ErrorKind::Conflict | ErrorKind::Busy => {
                warn!(error = %err, "{context}");
                self.notifier
                    .notify(Notice::error(format!("{context}: {}", err.message)));
            }
            ErrorKind::NotFound => {
                warn!(error = %err, "{context}; dropping stale state");
                self.abort(target);
                self.refresh().await;
            }
            ErrorKind::Authentication => {
                warn!(error = %err, "{context}");
                self.notifier.on_unauthorized();
                self.abort(target);
            }
            ErrorKind::Authorization => {
                warn!(error = %err, "{context}");
                self.notifier.on_forbidden();
                self.abort(target);
            }
            _ => {
                error!(error = %err, "{context}");
                self.notifier
                    .notify(Notice::error(format!("{context}: {}", err.message)));
                self.abort(target);
                self.refresh().await;
            }
        }
        err
    }

    /// Return to `Idle` if the active state owns the failed target.
    fn abort(&self, target: Option<MenuId>) {
        let owned = owns(&self.session().state, target);
        if owned {
            self.reset_to_idle();
        }
    }
}

/// Whether a failure on `target` belongs to `state`. Node failures belong
/// to states involving that node; create failures belong to the create
/// states and to `Idle`.
fn owns(state: &CoordinatorState, target: Option<MenuId>) -> bool {
    match target {
        Some(id) => state.involves(id),
        None => matches!(
            state,
            CoordinatorState::Idle | CoordinatorState::CreatingGroup | CoordinatorState::CreatingItem
        ),
    }
}

fn validate_move(tree: &MenuTree, node_id: MenuId, new_parent: Option<MenuId>) -> AppResult<()> {
    if !tree.contains(node_id) {
        return Err(AppError::not_found(format!("Menu node {node_id} not found")));
    }
    let Some(parent_id) = new_parent else {
        return Ok(());
    };
    let parent = tree
        .get(parent_id)
        .ok_or_else(|| AppError::not_found(format!("Parent node {parent_id} not found")))?;

    if parent_id == node_id {
        return Err(AppError::field("parentId", "A node cannot be its own parent"));
    }
    if tree.is_descendant(parent_id, node_id) {
        return Err(AppError::field(
            "parentId",
            "A node cannot be moved under one of its descendants",
        ));
    }
    if !parent.kind.is_container() {
        return Err(AppError::field("parentId", "Items cannot contain children"));
    }
    Ok(())
}

fn push(errors: &mut FieldErrors, field: &str, message: &str) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.to_string());
}

fn require(errors: &mut FieldErrors, field: &str, value: &str, message: &str) {
    if value.is_empty() {
        push(errors, field, message);
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
