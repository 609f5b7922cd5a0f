use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use catalog_core::ProductId;
use catalog_infra::CatalogError;

use crate::app::dto::{self, ProductForm, ProductRequest};
use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/new", get(new_product_form))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/:id/edit", get(edit_product_form))
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.products().list().await {
        Ok(products) => {
            let items: Vec<dto::ProductView> = products.iter().map(dto::product_view).collect();
            Json(serde_json::json!({ "items": items })).into_response()
        }
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let Some(id) = parse_id(&id) else {
        return errors::not_found();
    };

    match services.products().get(id).await {
        Ok(product) => Json(dto::product_view(&product)).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn new_product_form(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.categories().list().await {
        Ok(categories) => Json(ProductForm::blank(&categories)).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn edit_product_form(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let Some(id) = parse_id(&id) else {
        return errors::not_found();
    };

    let product = match services.products().get(id).await {
        Ok(p) => p,
        Err(e) => return errors::catalog_error_to_response(e),
    };
    match services.categories().list().await {
        Ok(categories) => Json(ProductForm::for_product(&product, &categories)).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<ProductRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::invalid_body(rejection),
    };

    let created = services
        .products()
        .create(body.category_id(), body.name.as_deref(), body.price)
        .await;

    match created {
        Ok(product) => (StatusCode::CREATED, Json(dto::product_view(&product))).into_response(),
        Err(e) => reject_with_form(&services, None, &body, e).await,
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<ProductRequest>, JsonRejection>,
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

    let updated = services
        .products()
        .update(id, body.category_id(), body.name.as_deref(), body.price)
        .await;

    match updated {
        Ok(product) => Json(dto::product_view(&product)).into_response(),
        Err(e) => reject_with_form(&services, Some(id), &body, e).await,
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let Some(id) = parse_id(&id) else {
        return errors::not_found();
    };

    match services.products().delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

/// Field-level rejections re-render the submitted form with the category
/// list; everything else maps straight to an error body. `id` is the product
/// being edited, taken from the path.
async fn reject_with_form(
    services: &AppServices,
    id: Option<ProductId>,
    body: &ProductRequest,
    err: CatalogError,
) -> axum::response::Response {
    let reselect = match &err {
        CatalogError::Validation {
            selected_category_id,
            ..
        }
        | CatalogError::ReferenceNotFound {
            selected_category_id,
            ..
        } => Some(selected_category_id.or_else(|| body.category_id())),
        _ => None,
    };
    let Some(reselect) = reselect else {
        return errors::catalog_error_to_response(err);
    };

    match services.categories().list().await {
        Ok(categories) => {
            let form = ProductForm::resubmitted(id, body, &categories, reselect);
            errors::catalog_error_with_form(err, Some(form))
        }
        Err(e) => errors::catalog_error_to_response(e),
    }
}

fn parse_id(raw: &str) -> Option<ProductId> {
    raw.parse().ok()
}
