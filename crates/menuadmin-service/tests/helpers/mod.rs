//! Shared fixtures for the service integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use menuadmin_client::InMemoryMenuApi;
use menuadmin_core::traits::{MenuApi, Notice, NoticeLevel, Notifier};
use menuadmin_core::types::{MenuNode, MenuTreeNode};
use menuadmin_service::{MenuTreeStore, TreeMutationCoordinator};

/// Notifier that keeps every notice and callback for assertions.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
    unauthorized: Mutex<u32>,
    forbidden: Mutex<u32>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn messages(&self, level: NoticeLevel) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter(|n| n.level == level)
            .map(|n| n.message)
            .collect()
    }

    pub fn has(&self, level: NoticeLevel, text: &str) -> bool {
        self.messages(level).iter().any(|m| m.contains(text))
    }

    pub fn unauthorized_calls(&self) -> u32 {
        *self.unauthorized.lock().unwrap()
    }

    pub fn forbidden_calls(&self) -> u32 {
        *self.forbidden.lock().unwrap()
    }

    pub fn clear(&self) {
        self.notices.lock().unwrap().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }

    fn on_unauthorized(&self) {
        *self.unauthorized.lock().unwrap() += 1;
    }

    fn on_forbidden(&self) {
        *self.forbidden.lock().unwrap() += 1;
    }
}

/// ventas(1) -> [reporte(2), historial(3), diario(4)]
/// archivo(5, collapse) -> [anual(6)]
/// admin(7)
pub fn sample_forest() -> Vec<MenuTreeNode> {
    vec![
        MenuTreeNode::with_children(
            MenuNode::group(1, "ventas", "Ventas"),
            vec![
                MenuTreeNode::leaf(MenuNode::item(2, "reporte", "Reporte", "/ventas/reporte")),
                MenuTreeNode::leaf(MenuNode::item(3, "historial", "Historial", "/ventas/historial")),
                MenuTreeNode::leaf(MenuNode::item(4, "diario", "Diario", "/ventas/diario")),
            ],
        ),
        MenuTreeNode::with_children(
            MenuNode::collapse(5, "archivo", "Archivo"),
            vec![MenuTreeNode::leaf(MenuNode::item(6, "anual", "Anual", "/archivo/anual"))],
        ),
        MenuTreeNode::leaf(MenuNode::group(7, "admin", "Admin")),
    ]
}

pub struct Harness {
    pub api: Arc<InMemoryMenuApi>,
    pub notifier: Arc<RecordingNotifier>,
    pub store: Arc<MenuTreeStore>,
    pub coordinator: TreeMutationCoordinator,
}

impl Harness {
    /// Build over `api` and load the first snapshot. The journal starts empty.
    pub async fn over(api: InMemoryMenuApi) -> Self {
        let api = Arc::new(api);
        let dyn_api: Arc<dyn MenuApi> = api.clone();
        let notifier = Arc::new(RecordingNotifier::default());
        let store = Arc::new(MenuTreeStore::new(Arc::clone(&dyn_api)));
        store.reload().await.unwrap();
        api.clear_calls();

        let coordinator = TreeMutationCoordinator::new(dyn_api, Arc::clone(&store), notifier.clone());
        Self {
            api,
            notifier,
            store,
            coordinator,
        }
    }

    pub async fn new() -> Self {
        Self::over(InMemoryMenuApi::from_forest(sample_forest()).unwrap()).await
    }
}
