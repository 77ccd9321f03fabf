// POST /api/v1/moderate — moderate one complaint.
//
// Body: {"text": "...", "complaint_id": "...", "user_id": "..."}
// The ids are optional and only used to tag log lines.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::pipeline::moderation::ModerationRequest;
use crate::web::{api_error, AppState};

pub async fn moderate_text(
    State(state): State<AppState>,
    payload: Result<Json<ModerationRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return api_error(rejection.status(), &rejection.body_text()),
    };

    let result = state.moderator.moderate(&request).await;
    Json(result).into_response()
}
