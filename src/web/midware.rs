use std::sync::Arc;

use axum::{
    http::{Method, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::web::{log, Error, REQUEST_ID_HEADER};

/// Turns a `web::Error` stashed in the response extensions into the JSON error the client sees,
/// and writes the request log line.
pub async fn response_mapper(req_method: Method, uri: Uri, resp: Response) -> Response {
    let req_id = resp
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|id| id.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let web_error = resp.extensions().get::<Arc<Error>>().map(Arc::as_ref);
    let client_status_and_error = web_error.map(Error::status_code_and_client_error);

    if let (Some(er), Some((status, _))) = (web_error, &client_status_and_error) {
        if status.is_server_error() {
            tracing::error!("SERVER ERROR: {er:?} REQ_ID: {req_id}");
        }
    }

    let err_resp = client_status_and_error.as_ref().map(|(status, cl_err)| {
        let client_error_body = json!({
            "error": cl_err.to_string(),
            "req_id": req_id,
        });

        let mut err_resp = (*status, Json(client_error_body)).into_response();
        // The fresh response lost the propagated request id.
        if let Some(id) = resp.headers().get(REQUEST_ID_HEADER) {
            err_resp.headers_mut().insert(REQUEST_ID_HEADER, id.clone());
        }
        err_resp
    });

    log::log_request(
        &req_id,
        req_method,
        uri,
        resp.status(),
        web_error,
        client_status_and_error,
    );

    err_resp.unwrap_or(resp)
}
