use axum::{extract::State, http::StatusCode, response::Response};
use serde_json::json;

use crate::{
    AppState, VERSION,
    infra::{
        errors::AppResult,
        json::{Envelope, write_json},
    },
};

pub async fn healthcheck_handler(State(state): State<AppState>) -> AppResult<Response> {
    let envelope = Envelope::new().with("status", "available").with(
        "system_info",
        json!({
            "environment": state.config.environment.as_str(),
            "version": VERSION,
        }),
    );

    Ok(write_json(StatusCode::OK, &envelope, None)?)
}
