//! HTTP request handlers

use std::sync::Arc;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::features::FeatureRecord;

use super::error::{Result, ServerError};
use super::state::AppState;

// ============================================================================
// Prediction Handlers
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub predicted_price_in_rupees: f64,
}

/// Whether the request declares a JSON body: `application/json` or an
/// `application/*+json` media type, parameters ignored.
fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

/// The body is parsed by hand so that a missing JSON content type, an empty
/// body and malformed JSON all get the same structured 400.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Json<PredictResponse>> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ServerError::PayloadTooLarge
        } else {
            ServerError::BadRequest(rejection.body_text())
        }
    })?;

    if !is_json_content_type(&headers) {
        return Err(ServerError::EmptyJson);
    }

    let value = match serde_json::from_slice::<Value>(&body) {
        Ok(Value::Null) | Err(_) => return Err(ServerError::EmptyJson),
        Ok(value) => value,
    };

    let record = FeatureRecord::from_json(value)?;
    let estimate = state.estimator.estimate(&record)?;

    Ok(Json(PredictResponse {
        predicted_price_in_rupees: estimate.price,
    }))
}

// ============================================================================
// System Handlers
// ============================================================================

/// Liveness only: does not inspect the loaded bundle
pub async fn health_check() -> Json<Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    #[test]
    fn test_json_content_types() {
        assert!(is_json_content_type(&headers_with("application/json")));
        assert!(is_json_content_type(&headers_with("application/json; charset=utf-8")));
        assert!(is_json_content_type(&headers_with("Application/JSON")));
        assert!(is_json_content_type(&headers_with("application/merge-patch+json")));
    }

    #[test]
    fn test_non_json_content_types() {
        assert!(!is_json_content_type(&HeaderMap::new()));
        assert!(!is_json_content_type(&headers_with("text/plain")));
        assert!(!is_json_content_type(&headers_with("text/json+xml")));
        assert!(!is_json_content_type(&headers_with("application/x-www-form-urlencoded")));
    }
}
