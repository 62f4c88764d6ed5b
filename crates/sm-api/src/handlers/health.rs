use axum::Json;
use serde_json::json;

pub async fn livez() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
