//! JSON endpoints consumed by the presentation layer.
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::cms::{CmsError, CmsTransport};
use crate::contact::{self, ContactError, ContactForm};
use crate::content;
use crate::menu;
use crate::model::{CategoryListing, MenuItem, Page, PageSummary, Project, ProjectSummary};

#[derive(Clone)]
pub struct AppState {
    pub cms: Arc<dyn CmsTransport>,
    pub contact_form_id: String,
}

impl AppState {
    pub fn new(cms: Arc<dyn CmsTransport>, contact_form_id: impl Into<String>) -> Self {
        Self {
            cms,
            contact_form_id: contact_form_id.into(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/pages", get(list_pages))
        .route("/api/pages/:slug", get(get_page))
        .route("/api/projects", get(list_projects))
        .route("/api/projects/:slug", get(get_project))
        .route("/api/projects/category/:category", get(get_category))
        .route("/api/menu/:menu_id", get(get_menu))
        .route("/api/contact", post(post_contact))
        .with_state(state)
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn not_found(what: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("{} not found", what))
    }

    fn upstream(context: &str, err: CmsError) -> Self {
        error!(%err, "{}", context);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, context)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

async fn healthz() -> &'static str {
    "ok"
}

async fn list_pages(State(state): State<AppState>) -> ApiResult<Vec<PageSummary>> {
    content::fetch_all_pages(state.cms.as_ref())
        .await
        .map(Json)
        .map_err(|err| ApiError::upstream("Failed to fetch pages", err))
}

async fn get_page(State(state): State<AppState>, Path(slug): Path<String>) -> ApiResult<Page> {
    match content::fetch_page_by_slug(state.cms.as_ref(), &slug).await {
        Ok(Some(page)) => Ok(Json(page)),
        Ok(None) => Err(ApiError::not_found("Page")),
        Err(err) => Err(ApiError::upstream("Failed to fetch page", err)),
    }
}

async fn list_projects(State(state): State<AppState>) -> ApiResult<Vec<ProjectSummary>> {
    content::fetch_projects(state.cms.as_ref())
        .await
        .map(Json)
        .map_err(|err| ApiError::upstream("Failed to fetch projects", err))
}

async fn get_project(State(state): State<AppState>, Path(slug): Path<String>) -> ApiResult<Project> {
    match content::fetch_project_by_slug(state.cms.as_ref(), &slug).await {
        Ok(Some(project)) => Ok(Json(project)),
        Ok(None) => Err(ApiError::not_found("Project")),
        Err(err) => Err(ApiError::upstream("Failed to fetch project", err)),
    }
}

async fn get_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> ApiResult<CategoryListing> {
    match content::fetch_projects_in_category(state.cms.as_ref(), &category).await {
        Ok(Some(listing)) => Ok(Json(listing)),
        Ok(None) => Err(ApiError::not_found("Category")),
        Err(err) => Err(ApiError::upstream("Failed to fetch projects", err)),
    }
}

async fn get_menu(State(state): State<AppState>, Path(menu_id): Path<String>) -> Json<Vec<MenuItem>> {
    Json(menu::fetch_menu(state.cms.as_ref(), &menu_id).await)
}

async fn post_contact(
    State(state): State<AppState>,
    body: Result<Json<ContactForm>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(form) = body.map_err(|rejection| {
        warn!(%rejection, "rejected contact request body");
        ApiError::new(rejection.status(), "Invalid request body")
    })?;
    match contact::submit_contact(state.cms.as_ref(), &state.contact_form_id, &form).await {
        Ok(()) => {
            info!("contact form accepted");
            Ok((
                StatusCode::OK,
                Json(json!({ "message": "Message sent successfully" })),
            ))
        }
        Err(err @ (ContactError::MissingFields | ContactError::InvalidEmail)) => {
            Err(ApiError::new(StatusCode::BAD_REQUEST, err.to_string()))
        }
        Err(ContactError::Cms(err)) => {
            let message = match err.status() {
                Some(status) => format!("Failed to send message. Status: {}", status),
                None => "Failed to send message".to_string(),
            };
            error!(%err, "contact forwarding failed");
            Err(ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, message))
        }
    }
}
