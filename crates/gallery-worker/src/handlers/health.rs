use axum::Json;
use serde_json::{json, Value};

use crate::constants::SERVICE_NAME;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
    }))
}
