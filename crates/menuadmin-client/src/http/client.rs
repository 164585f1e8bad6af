//! reqwest-backed [`MenuApi`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use menuadmin_core::config::api::ApiConfig;
use menuadmin_core::error::{AppError, ErrorKind, FieldErrors};
use menuadmin_core::result::AppResult;
use menuadmin_core::traits::MenuApi;
use menuadmin_core::types::{
    ChildReorder, CreateGroup, CreateItem, DeleteOutcome, EdgeCreated, EdgeRemoved, MenuId,
    MenuNode, MenuTreeNode, NodePatch, RoleId, RoleMenuItem, RootReorder,
};

use super::envelope::{ApiEnvelope, error_for_status};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EdgeBody {
    parent_id: MenuId,
    child_id: MenuId,
    #[serde(skip_serializing_if = "Option::is_none")]
    order: Option<i32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderBody {
    new_order: i32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RoleMenusBody<'a> {
    menu_ids: &'a [MenuId],
}

/// Client for the menu-admin REST backend.
///
/// Every response is a JSON envelope; the session cookie from
/// configuration is sent with each request.
#[derive(Debug, Clone)]
pub struct HttpMenuApi {
    client: Client,
    base_url: String,
}

impl HttpMenuApi {
    /// Build a client from configuration.
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = config.session_cookie.as_deref().filter(|c| !c.is_empty()) {
            let value = HeaderValue::from_str(cookie).map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Invalid session cookie", e)
            })?;
            headers.insert(COOKIE, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
    }

    /// Send a request and unwrap the envelope. `Ok(None)` means the
    /// backend answered successfully with no `data`.
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> AppResult<Option<T>> {
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.bytes().await.map_err(transport_error)?;
        debug!(status = status.as_u16(), path = %url, bytes = body.len(), "Menu API response");

        if !status.is_success() {
            // Error bodies are usually envelopes, but proxies answer with HTML.
            let envelope = serde_json::from_slice::<ApiEnvelope<serde_json::Value>>(&body).ok();
            let err = match envelope {
                Some(envelope) => envelope.into_error(status),
                None => error_for_status(status, None, FieldErrors::new()),
            };
            warn!(status = status.as_u16(), path = %url, error = %err, "Menu API request failed");
            return Err(err);
        }

        if body.is_empty() || status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let envelope: ApiEnvelope<T> = serde_json::from_slice(&body).map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Unexpected response body from {url}"),
                e,
            )
        })?;
        if !envelope.success {
            return Err(envelope.into_error(status));
        }
        Ok(envelope.data)
    }

    async fn send_data<T: DeserializeOwned>(&self, builder: RequestBuilder) -> AppResult<T> {
        self.send(builder)
            .await?
            .ok_or_else(|| AppError::transport("Response envelope carries no data"))
    }
}

fn transport_error(err: reqwest::Error) -> AppError {
    let message = if err.is_timeout() {
        "Menu API request timed out"
    } else if err.is_connect() {
        "Could not connect to the menu API"
    } else if err.is_decode() {
        "Could not read the menu API response"
    } else {
        "Menu API request failed"
    };
    AppError::with_source(ErrorKind::Transport, message, err)
}

#[async_trait]
impl MenuApi for HttpMenuApi {
    async fn get_tree(&self) -> AppResult<Vec<MenuTreeNode>> {
        Ok(self
            .send(self.request(Method::GET, "/menus/tree"))
            .await?
            .unwrap_or_default())
    }

    async fn create_group(&self, req: &CreateGroup) -> AppResult<MenuNode> {
        self.send_data(self.request(Method::POST, "/menus/groups").json(req))
            .await
    }

    async fn create_item(&self, req: &CreateItem) -> AppResult<MenuNode> {
        self.send_data(self.request(Method::POST, "/menus/items").json(req))
            .await
    }

    async fn update_node(&self, id: MenuId, patch: &NodePatch) -> AppResult<Option<MenuNode>> {
        let result = self
            .send(self.request(Method::PATCH, &format!("/menus/{id}")).json(patch))
            .await;
        match result {
            Err(e) if e.kind == ErrorKind::NotFound => Ok(None),
            other => other,
        }
    }

    async fn delete_node(&self, id: MenuId, hard: bool) -> AppResult<DeleteOutcome> {
        let path = format!("/menus/{id}?hard={hard}");
        Ok(self
            .send(self.request(Method::DELETE, &path))
            .await?
            .unwrap_or(DeleteOutcome { deleted: true }))
    }

    async fn add_edge(
        &self,
        parent_id: MenuId,
        child_id: MenuId,
        order: Option<i32>,
    ) -> AppResult<EdgeCreated> {
        let body = EdgeBody {
            parent_id,
            child_id,
            order,
        };
        Ok(self
            .send(self.request(Method::POST, "/menus/edges").json(&body))
            .await?
            .unwrap_or(EdgeCreated { created: true }))
    }

    async fn remove_edge(&self, parent_id: MenuId, child_id: MenuId) -> AppResult<EdgeRemoved> {
        let path = format!("/menus/edges/{parent_id}/{child_id}");
        Ok(self
            .send(self.request(Method::DELETE, &path))
            .await?
            .unwrap_or(EdgeRemoved { deleted: true }))
    }

    async fn reorder_child(
        &self,
        parent_id: MenuId,
        child_id: MenuId,
        new_order: i32,
    ) -> AppResult<ChildReorder> {
        let path = format!("/menus/{parent_id}/children/{child_id}/order");
        self.send_data(
            self.request(Method::PUT, &path)
                .json(&OrderBody { new_order }),
        )
        .await
    }

    async fn reorder_root_group(&self, node_id: MenuId, new_order: i32) -> AppResult<RootReorder> {
        let path = format!("/menus/roots/{node_id}/order");
        self.send_data(
            self.request(Method::PUT, &path)
                .json(&OrderBody { new_order }),
        )
        .await
    }

    async fn get_role_menus(&self, role_id: RoleId) -> AppResult<Vec<RoleMenuItem>> {
        Ok(self
            .send(self.request(Method::GET, &format!("/roles/{role_id}/menus")))
            .await?
            .unwrap_or_default())
    }

    async fn save_role_menus(&self, role_id: RoleId, menu_ids: &[MenuId]) -> AppResult<()> {
        let body = RoleMenusBody { menu_ids };
        self.send::<serde_json::Value>(
            self.request(Method::PUT, &format!("/roles/{role_id}/menus"))
                .json(&body),
        )
        .await?;
        Ok(())
    }
}
