use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::{
    waitlist::{EntryId, SignupPayload},
    web::{Error, WebResult},
    AppState,
};

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    message: &'static str,
    id: EntryId,
}

/// Adds a signup to the waitlist and answers with the id of the new entry.
/// A JSON `null` body counts as a signup without an email.
#[tracing::instrument(name = "Adding signup to the waitlist", skip_all)]
pub async fn waitlist_submit(
    State(app_state): State<AppState>,
    payload: Result<Json<Option<SignupPayload>>, JsonRejection>,
) -> WebResult<(StatusCode, Json<SubmitResponse>)> {
    let Json(payload) = payload.map_err(|rej| Error::MalformedBody(rej.body_text()))?;

    let id = app_state
        .registrar
        .submit(payload.unwrap_or_default())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            message: "Successfully added to waitlist!",
            id,
        }),
    ))
}
