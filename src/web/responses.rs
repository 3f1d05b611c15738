//! # Response Envelopes
//!
//! Helpers for the success shapes handlers share: create → 201
//! `{ message, <resource> }`, mutation → 200 `{ message, <resource> }`,
//! delete → 200 `{ message }`, builder-driven lists →
//! `{ status, total, results, data }`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

pub fn created<T: Serialize>(message: &str, resource_key: &str, resource: &T) -> Response {
    (
        StatusCode::CREATED,
        Json(json!({ "message": message, resource_key: resource })),
    )
        .into_response()
}

pub fn updated<T: Serialize>(message: &str, resource_key: &str, resource: &T) -> Response {
    Json(json!({ "message": message, resource_key: resource })).into_response()
}

pub fn deleted(message: &str) -> Response {
    Json(json!({ "message": message })).into_response()
}

/// List envelope for builder-driven collections. `total` counts every row
/// matching the filters; `data` holds the current page.
pub fn list<T: Serialize>(total: i64, data: &[T]) -> Response {
    Json(json!({
        "status": "success",
        "total": total,
        "results": data.len(),
        "data": data,
    }))
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            created("ok", "item", &"x").status(),
            StatusCode::CREATED
        );
        assert_eq!(updated("ok", "item", &"x").status(), StatusCode::OK);
        assert_eq!(deleted("ok").status(), StatusCode::OK);
        assert_eq!(list(0, &Vec::<String>::new()).status(), StatusCode::OK);
    }
}
