//! Built-in template catalog routes.

use axum::{
    Json, Router,
    extract::Path,
    response::IntoResponse,
    routing::get,
};
use serde::Serialize;

use crate::{AppState, error::ApiError};
use docuvault_core::template;
use docuvault_shared::AppError;

/// Creates the template routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/templates", get(list_templates))
        .route("/templates/{id}", get(get_template))
}

/// A catalog entry without its body.
#[derive(Debug, Serialize)]
pub struct TemplateSummary {
    /// Stable catalog id.
    pub id: &'static str,
    /// Human-readable template name.
    pub name: &'static str,
    /// Product line the template targets.
    pub product: &'static str,
    /// Placeholder names appearing in the content.
    pub fields: &'static [&'static str],
}

/// GET `/templates` — list the catalog without template bodies.
async fn list_templates() -> impl IntoResponse {
    let summaries: Vec<TemplateSummary> = template::all()
        .iter()
        .map(|t| TemplateSummary {
            id: t.id,
            name: t.name,
            product: t.product,
            fields: t.fields,
        })
        .collect();
    Json(summaries)
}

/// GET `/templates/{id}` — fetch one template including its body.
async fn get_template(Path(id): Path<String>) -> Result<impl IntoResponse, ApiError> {
    template::get(&id)
        .map(Json)
        .ok_or_else(|| ApiError(AppError::NotFound(format!("template {id}"))))
}
