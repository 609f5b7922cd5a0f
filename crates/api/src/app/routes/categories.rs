use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use catalog_core::CategoryId;

use crate::app::dto::{self, CategoryRequest};
use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
}

pub async fn list_categories(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.categories().list().await {
        Ok(categories) => {
            let items: Vec<dto::CategoryView> = categories.iter().map(dto::category_view).collect();
            Json(serde_json::json!({ "items": items })).into_response()
        }
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn get_category(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let Some(id) = parse_id(&id) else {
        return errors::not_found();
    };

    match services.categories().get(id).await {
        Ok(category) => Json(dto::category_view(&category)).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn create_category(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<CategoryRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::invalid_body(rejection),
    };

    match services.categories().create(body.name.as_deref()).await {
        Ok(category) => (StatusCode::CREATED, Json(dto::category_view(&category))).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn update_category(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<CategoryRequest>, JsonRejection>,
) -> axum::response::Response {
    let Some(id) = parse_id(&id) else {
        return errors::not_found();
    };
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::invalid_body(rejection),
    };
    if body.id.is_some_and(|raw| raw != id.get()) {
        return errors::not_found();
    }

    match services.categories().update(id, body.name.as_deref()).await {
        Ok(category) => Json(dto::category_view(&category)).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn delete_category(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let Some(id) = parse_id(&id) else {
        return errors::not_found();
    };

    match services.categories().delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

fn parse_id(raw: &str) -> Option<CategoryId> {
    raw.parse().ok()
}
