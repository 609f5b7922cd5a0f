use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::{json, Value};

use catalog_infra::CatalogError;

use crate::app::dto::ProductForm;

pub fn catalog_error_to_response(err: CatalogError) -> axum::response::Response {
    catalog_error_with_form(err, None)
}

/// Like [`catalog_error_to_response`], attaching a re-rendered form to
/// validation and reference rejections.
pub fn catalog_error_with_form(
    err: CatalogError,
    form: Option<ProductForm>,
) -> axum::response::Response {
    match err {
        CatalogError::Validation { errors, .. } => {
            let mut body = error_body("validation_error", errors.to_string());
            body["fields"] = json!(errors);
            attach_form(&mut body, form);
            (StatusCode::BAD_REQUEST, axum::Json(body)).into_response()
        }
        CatalogError::ReferenceNotFound { error, .. } => {
            let mut body = error_body("reference_not_found", error.message.clone());
            body["fields"] = json!([error]);
            attach_form(&mut body, form);
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(body)).into_response()
        }
        CatalogError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        CatalogError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        CatalogError::Store(e) => {
            tracing::error!(error = %e, "store failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_error",
                e.to_string(),
            )
        }
    }
}

/// Body that failed to deserialize (malformed JSON, wrong types).
pub fn invalid_body(rejection: JsonRejection) -> axum::response::Response {
    json_error(
        StatusCode::BAD_REQUEST,
        "validation_error",
        rejection.body_text(),
    )
}

pub fn not_found() -> axum::response::Response {
    catalog_error_to_response(CatalogError::NotFound)
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (status, axum::Json(error_body(code, message.into()))).into_response()
}

fn error_body(code: &'static str, message: String) -> Value {
    json!({
        "error": code,
        "message": message,
    })
}

fn attach_form(body: &mut Value, form: Option<ProductForm>) {
    if let Some(form) = form {
        body["form"] = json!(form);
    }
}
