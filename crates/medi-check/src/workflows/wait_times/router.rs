use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::calculator::WaitTimeCalculator;
use super::queue::QueueStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitTimeRequest {
    pub diagnosis: String,
    #[serde(default)]
    pub age: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueJoinRequest {
    pub care_option: String,
    pub diagnosis: String,
}

/// Router builder exposing wait-time estimates and queue joins.
pub fn wait_time_router<Q>(calculator: Arc<WaitTimeCalculator<Q>>) -> Router
where
    Q: QueueStore + 'static,
{
    Router::new()
        .route("/api/v1/wait-times", post(estimate_handler::<Q>))
        .route(
            "/api/v1/queues",
            post(join_handler::<Q>).get(snapshot_handler::<Q>),
        )
        .with_state(calculator)
}

pub(crate) async fn estimate_handler<Q>(
    State(calculator): State<Arc<WaitTimeCalculator<Q>>>,
    axum::Json(request): axum::Json<WaitTimeRequest>,
) -> Response
where
    Q: QueueStore + 'static,
{
    let report = calculator.report(&request.diagnosis, request.age);
    (StatusCode::OK, axum::Json(report)).into_response()
}

pub(crate) async fn join_handler<Q>(
    State(calculator): State<Arc<WaitTimeCalculator<Q>>>,
    axum::Json(request): axum::Json<QueueJoinRequest>,
) -> Response
where
    Q: QueueStore + 'static,
{
    if calculator.add_to_queue(&request.care_option, &request.diagnosis) {
        let payload = json!({
            "joined": true,
            "care_option": request.care_option,
            "queued_minutes": calculator.queued_minutes(&request.care_option),
        });
        (StatusCode::OK, axum::Json(payload)).into_response()
    } else {
        let payload = json!({
            "joined": false,
            "error": format!(
                "cannot join '{}' for diagnosis '{}'",
                request.care_option, request.diagnosis
            ),
        });
        (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
    }
}

pub(crate) async fn snapshot_handler<Q>(
    State(calculator): State<Arc<WaitTimeCalculator<Q>>>,
) -> Response
where
    Q: QueueStore + 'static,
{
    (StatusCode::OK, axum::Json(calculator.queue_snapshot())).into_response()
}
