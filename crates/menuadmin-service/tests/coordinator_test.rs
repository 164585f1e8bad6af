//! TreeMutationCoordinator against the in-memory backend.

mod helpers;

use std::time::Duration;

use menuadmin_client::{ApiCall, InMemoryMenuApi};
use menuadmin_core::error::{AppError, FieldErrors};
use menuadmin_core::traits::{MenuApi, NoticeLevel};
use menuadmin_core::types::{MenuId, NodePatch};
use menuadmin_core::ErrorKind;
use menuadmin_service::{CoordinatorState, GroupInput, ItemInput, MoveOutcome, UpdateOutcome};

use helpers::{Harness, sample_forest};

fn title(text: &str) -> NodePatch {
    NodePatch {
        title: Some(text.to_string()),
        ..NodePatch::default()
    }
}

// ── Create ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_group_normalizes_id_key() {
    let h = Harness::new().await;
    h.coordinator.begin_create_group();

    let node = h
        .coordinator
        .create_group(GroupInput::new("  Mis Reportes ", " Reportes "))
        .await
        .unwrap();

    assert_eq!(node.id_key, "misreportes");
    assert_eq!(node.title, "Reportes");
    assert!(matches!(h.coordinator.state(), CoordinatorState::Idle));
    let tree = h.store.snapshot().await;
    assert!(tree.find_by_id_key("misreportes").is_some());
    assert!(h.notifier.has(NoticeLevel::Success, "Reportes"));
}

#[tokio::test]
async fn test_incomplete_group_keeps_draft_open() {
    let h = Harness::new().await;
    h.coordinator.begin_create_group();

    let err = h
        .coordinator
        .create_group(GroupInput::new("  ", ""))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(matches!(h.coordinator.state(), CoordinatorState::CreatingGroup));
    let draft = h.coordinator.draft();
    assert!(draft.errors.contains_key("idKey"));
    assert!(draft.errors.contains_key("title"));
    assert!(h.api.mutations().is_empty());
}

#[tokio::test]
async fn test_duplicate_id_key_is_a_conflict() {
    let h = Harness::new().await;
    h.coordinator.begin_create_group();

    let err = h
        .coordinator
        .create_group(GroupInput::new("ventas", "Otra"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Conflict);
    assert!(matches!(h.coordinator.state(), CoordinatorState::CreatingGroup));
    assert!(h.notifier.has(NoticeLevel::Error, "already exists"));
}

#[tokio::test]
async fn test_create_item_derives_url_from_parent() {
    let h = Harness::new().await;
    h.coordinator.begin_create_item(Some(MenuId(1)));

    let node = h
        .coordinator
        .create_item(ItemInput::new("Nuevo", "Nuevo", Some(MenuId(1))))
        .await
        .unwrap();

    assert_eq!(node.url.as_deref(), Some("/ventas/nuevo"));
    let tree = h.store.snapshot().await;
    assert_eq!(tree.parent_of(node.id), Some(MenuId(1)));
    assert_eq!(tree.children_of(MenuId(1)).len(), 4);
}

#[tokio::test]
async fn test_create_item_requires_container_parent() {
    let h = Harness::new().await;
    h.coordinator.begin_create_item(None);

    let err = h
        .coordinator
        .create_item(ItemInput::new("nuevo", "Nuevo", None))
        .await
        .unwrap_err();
    assert!(err.field_errors.contains_key("parentId"));

    let err = h
        .coordinator
        .create_item(ItemInput::new("nuevo", "Nuevo", Some(MenuId(2))))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(h.coordinator.draft().errors.contains_key("parentId"));
    assert!(h.api.mutations().is_empty());
}

// ── Update ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_update_sends_only_changed_fields() {
    let h = Harness::new().await;
    h.coordinator.begin_edit(MenuId(1)).await.unwrap();

    let patch = NodePatch {
        title: Some("Sales".into()),
        icon: Some(String::new()),
        caption: Some("  ".into()),
        ..NodePatch::default()
    };
    let outcome = h.coordinator.update_node(MenuId(1), patch).await.unwrap();

    assert!(matches!(outcome, UpdateOutcome::Updated(ref node) if node.title == "Sales"));
    assert_eq!(h.api.mutations(), vec![ApiCall::UpdateNode(MenuId(1), title("Sales"))]);
    assert!(matches!(h.coordinator.state(), CoordinatorState::Idle));
    assert_eq!(h.store.snapshot().await.get(MenuId(1)).unwrap().title, "Sales");
}

#[tokio::test]
async fn test_whitespace_edit_is_nothing_to_save() {
    let h = Harness::new().await;
    h.coordinator.begin_edit(MenuId(2)).await.unwrap();

    let outcome = h
        .coordinator
        .update_node(MenuId(2), title("  Reporte  "))
        .await
        .unwrap();

    assert_eq!(outcome, UpdateOutcome::Unchanged);
    assert!(h.api.mutations().is_empty());
    assert!(h.notifier.has(NoticeLevel::Info, "Nothing to save"));
    assert!(matches!(h.coordinator.state(), CoordinatorState::Editing(_)));
}

#[tokio::test]
async fn test_update_of_vanished_node_returns_to_idle() {
    let h = Harness::new().await;
    h.coordinator.begin_edit(MenuId(2)).await.unwrap();
    h.api.delete_node(MenuId(2), true).await.unwrap();

    let err = h
        .coordinator
        .update_node(MenuId(2), title("Gone"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::NotFound);
    assert!(matches!(h.coordinator.state(), CoordinatorState::Idle));
    assert!(!h.store.snapshot().await.contains(MenuId(2)));
}

// ── Delete ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_requires_confirmation() {
    let h = Harness::new().await;

    let err = h.coordinator.delete_node(MenuId(3), false).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(h.api.mutations().is_empty());

    h.coordinator.request_delete(MenuId(3)).await.unwrap();
    h.coordinator.confirm_delete(false).await.unwrap();

    assert_eq!(h.api.mutations(), vec![ApiCall::DeleteNode(MenuId(3), false)]);
    let tree = h.store.snapshot().await;
    assert!(!tree.contains(MenuId(3)));
    assert_eq!(tree.position_of(MenuId(4)), Some(2));
}

#[tokio::test]
async fn test_cancelled_delete_resumes_edit() {
    let h = Harness::new().await;
    h.coordinator.begin_edit(MenuId(3)).await.unwrap();
    h.coordinator.request_delete(MenuId(3)).await.unwrap();
    assert!(matches!(h.coordinator.state(), CoordinatorState::ConfirmingDelete { .. }));

    h.coordinator.cancel();
    assert!(matches!(h.coordinator.state(), CoordinatorState::Editing(ref n) if n.id == MenuId(3)));
}

#[tokio::test]
async fn test_deleting_edited_node_clears_edit() {
    let h = Harness::new().await;
    h.coordinator.begin_edit(MenuId(3)).await.unwrap();
    h.coordinator.request_delete(MenuId(3)).await.unwrap();
    h.coordinator.confirm_delete(true).await.unwrap();

    assert!(matches!(h.coordinator.state(), CoordinatorState::Idle));
    assert_eq!(h.api.mutations(), vec![ApiCall::DeleteNode(MenuId(3), true)]);
}

#[tokio::test]
async fn test_deleting_other_node_resumes_edit() {
    let h = Harness::new().await;
    h.coordinator.begin_edit(MenuId(2)).await.unwrap();
    h.coordinator.request_delete(MenuId(4)).await.unwrap();
    h.coordinator.confirm_delete(false).await.unwrap();

    assert!(matches!(h.coordinator.state(), CoordinatorState::Editing(ref n) if n.id == MenuId(2)));
}

// ── Reorder ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_reorder_clamps_before_sending() {
    let h = Harness::new().await;

    let low = h.coordinator.reorder(MenuId(3), Some(MenuId(1)), 0).await.unwrap();
    assert_eq!((low.requested, low.sent), (0, 1));

    let high = h.coordinator.reorder(MenuId(3), Some(MenuId(1)), 99).await.unwrap();
    assert_eq!((high.sent, high.effective_order, high.max_order), (3, 3, 3));

    assert_eq!(
        h.api.mutations(),
        vec![
            ApiCall::ReorderChild(MenuId(1), MenuId(3), 1),
            ApiCall::ReorderChild(MenuId(1), MenuId(3), 3),
        ]
    );
    assert!(h.notifier.has(NoticeLevel::Success, "Moved to position 3 of 3"));
    let tree = h.store.snapshot().await;
    assert_eq!(tree.children_of(MenuId(1)), &[MenuId(2), MenuId(4), MenuId(3)]);
}

#[tokio::test]
async fn test_reorder_root_group() {
    let h = Harness::new().await;

    let outcome = h.coordinator.reorder(MenuId(7), None, 1).await.unwrap();

    assert_eq!(outcome.effective_order, 1);
    assert_eq!(h.api.mutations(), vec![ApiCall::ReorderRootGroup(MenuId(7), 1)]);
    assert_eq!(
        h.store.snapshot().await.roots(),
        &[MenuId(7), MenuId(1), MenuId(5)]
    );
}

#[tokio::test]
async fn test_reorder_with_wrong_parent_is_rejected_locally() {
    let h = Harness::new().await;

    let err = h
        .coordinator
        .reorder(MenuId(6), Some(MenuId(1)), 1)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(h.api.mutations().is_empty());
}

// ── Move ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_move_detaches_then_attaches() {
    let h = Harness::new().await;

    let outcome = h.coordinator.move_node(MenuId(2), Some(MenuId(5))).await.unwrap();

    assert_eq!(
        outcome,
        MoveOutcome::Moved {
            detached_from: Some(MenuId(1)),
            attached_to: Some(MenuId(5)),
        }
    );
    assert_eq!(
        h.api.mutations(),
        vec![
            ApiCall::RemoveEdge(MenuId(1), MenuId(2)),
            ApiCall::AddEdge(MenuId(5), MenuId(2), None),
        ]
    );
    let tree = h.store.snapshot().await;
    assert_eq!(tree.parent_of(MenuId(2)), Some(MenuId(5)));
    assert_eq!(tree.position_of(MenuId(3)), Some(1));
}

#[tokio::test]
async fn test_move_to_current_parent_is_a_no_op() {
    let h = Harness::new().await;

    let outcome = h.coordinator.move_node(MenuId(2), Some(MenuId(1))).await.unwrap();

    assert_eq!(outcome, MoveOutcome::Unchanged);
    assert!(h.api.mutations().is_empty());
    assert!(h.notifier.has(NoticeLevel::Info, "Nothing to move"));
}

#[tokio::test]
async fn test_invalid_moves_never_reach_the_backend() {
    let h = Harness::new().await;

    for (node, parent) in [(1, 1), (5, 6), (2, 3)] {
        let err = h
            .coordinator
            .move_node(MenuId(node), Some(MenuId(parent)))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation, "move {node} under {parent}");
    }
    assert!(h.api.mutations().is_empty());
}

#[tokio::test]
async fn test_failed_attach_leaves_node_parentless() {
    let h = Harness::new().await;
    // The target disappears after the snapshot was taken.
    h.api.delete_node(MenuId(7), true).await.unwrap();
    h.api.clear_calls();

    let err = h
        .coordinator
        .move_node(MenuId(2), Some(MenuId(7)))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(
        h.api.mutations(),
        vec![
            ApiCall::RemoveEdge(MenuId(1), MenuId(2)),
            ApiCall::AddEdge(MenuId(7), MenuId(2), None),
        ]
    );
    assert!(h.notifier.has(NoticeLevel::Success, "Removed from old parent"));
    assert!(!h.notifier.has(NoticeLevel::Success, "Added to new parent"));

    let tree = h.store.snapshot().await;
    assert!(tree.contains(MenuId(2)));
    assert_eq!(tree.parent_of(MenuId(2)), None);
    assert!(matches!(h.coordinator.state(), CoordinatorState::Idle));
}

// ── Concurrency and error policy ────────────────────────────────

#[tokio::test]
async fn test_same_node_mutations_are_serialized() {
    let api = InMemoryMenuApi::from_forest(sample_forest())
        .unwrap()
        .with_latency(Duration::from_millis(50));
    let h = Harness::over(api).await;

    let (first, second) = tokio::join!(
        h.coordinator.update_node(MenuId(2), title("Uno")),
        h.coordinator.update_node(MenuId(2), title("Dos")),
    );

    assert!(first.is_ok());
    assert_eq!(second.unwrap_err().kind, ErrorKind::Busy);
    assert!(!h.coordinator.is_busy(MenuId(2)));
    assert_eq!(h.api.mutations().len(), 1);
}

#[tokio::test]
async fn test_different_nodes_proceed_concurrently() {
    let api = InMemoryMenuApi::from_forest(sample_forest())
        .unwrap()
        .with_latency(Duration::from_millis(20));
    let h = Harness::over(api).await;

    let (a, b) = tokio::join!(
        h.coordinator.update_node(MenuId(2), title("Uno")),
        h.coordinator.update_node(MenuId(3), title("Dos")),
    );

    assert!(a.is_ok());
    assert!(b.is_ok());
    let tree = h.store.snapshot().await;
    assert_eq!(tree.get(MenuId(2)).unwrap().title, "Uno");
    assert_eq!(tree.get(MenuId(3)).unwrap().title, "Dos");
}

#[tokio::test]
async fn test_transport_failure_aborts_to_idle() {
    let h = Harness::new().await;
    h.coordinator.begin_create_group();
    h.api.fail_next(AppError::transport("connection reset"));

    let err = h
        .coordinator
        .create_group(GroupInput::new("nuevo", "Nuevo"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Transport);
    assert!(matches!(h.coordinator.state(), CoordinatorState::Idle));
    assert!(h.notifier.has(NoticeLevel::Error, "connection reset"));
}

#[tokio::test]
async fn test_auth_failures_use_callbacks() {
    let h = Harness::new().await;

    h.api.fail_next(AppError::authentication("expired"));
    let err = h.coordinator.reorder(MenuId(2), Some(MenuId(1)), 2).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authentication);
    assert_eq!(h.notifier.unauthorized_calls(), 1);

    h.api.fail_next(AppError::authorization("denied"));
    h.coordinator.begin_edit(MenuId(2)).await.unwrap();
    let err = h.coordinator.update_node(MenuId(2), title("X")).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
    assert_eq!(h.notifier.forbidden_calls(), 1);
    assert!(matches!(h.coordinator.state(), CoordinatorState::Idle));
}

#[tokio::test]
async fn test_failure_on_other_node_keeps_open_edit() {
    let h = Harness::new().await;
    h.coordinator.begin_edit(MenuId(3)).await.unwrap();
    h.coordinator.update_draft(|draft| draft.title = "Historial nuevo".into());
    h.api.fail_next(AppError::transport("connection reset"));

    let err = h
        .coordinator
        .reorder(MenuId(2), Some(MenuId(1)), 2)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Transport);
    assert!(matches!(
        h.coordinator.state(),
        CoordinatorState::Editing(ref node) if node.id == MenuId(3)
    ));
    assert_eq!(h.coordinator.draft().title, "Historial nuevo");
    assert!(h.notifier.has(NoticeLevel::Error, "connection reset"));
}

#[tokio::test]
async fn test_backend_field_errors_reach_create_draft() {
    let h = Harness::new().await;
    h.coordinator.begin_create_item(Some(MenuId(1)));
    let mut fields = FieldErrors::new();
    fields.insert("idKey".into(), vec!["is reserved".into()]);
    h.api.fail_next(AppError::validation("Invalid item").with_field_errors(fields));

    let err = h
        .coordinator
        .create_item(ItemInput::new("nuevo", "Nuevo", Some(MenuId(1))))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(matches!(h.coordinator.state(), CoordinatorState::CreatingItem));
    assert_eq!(h.coordinator.draft().errors["idKey"], vec!["is reserved".to_string()]);
    assert_eq!(h.api.mutations().len(), 1);
}

#[tokio::test]
async fn test_backend_field_errors_reach_edit_draft() {
    let h = Harness::new().await;
    h.coordinator.begin_edit(MenuId(2)).await.unwrap();

    let patch = NodePatch {
        url: Some(String::new()),
        ..NodePatch::default()
    };
    let err = h.coordinator.update_node(MenuId(2), patch).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(h.api.mutations().len(), 1);
    assert!(matches!(h.coordinator.state(), CoordinatorState::Editing(_)));
    assert!(h.coordinator.draft().errors.contains_key("url"));
    assert_eq!(
        h.store.snapshot().await.get(MenuId(2)).unwrap().url.as_deref(),
        Some("/ventas/reporte")
    );
}
