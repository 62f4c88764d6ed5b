use axum::{extract::State, Json};
use serde::Serialize;

use crate::SharedState;

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<String>,
}

pub async fn list_jobs(State(state): State<SharedState>) -> Json<JobListResponse> {
    let jobs = state
        .matcher
        .list_jobs()
        .into_iter()
        .map(str::to_string)
        .collect();

    Json(JobListResponse { jobs })
}
