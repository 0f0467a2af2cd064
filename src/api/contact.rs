use crate::api::AppState;
use crate::api::schemas::contact::ContactForm;
use crate::domain::submission::{SubmissionInput, SubmissionResponse};
use crate::error::Result;
use axum::{
    Form, Json,
    body::Bytes,
    extract::{FromRequest, Request, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use std::convert::Infallible;

/// The submission carried by a request body, if one could be decoded.
///
/// `application/x-www-form-urlencoded` bodies are decoded as a form, every other
/// body as JSON whatever its content type. A body that cannot be read or decoded,
/// including an empty one, yields `None` so validation reports the input as missing.
#[derive(Debug)]
pub struct SubmissionPayload(pub Option<SubmissionInput>);

impl<S> FromRequest<S> for SubmissionPayload
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        let decoded = if is_form {
            Form::<ContactForm>::from_request(req, state).await.map(|Form(form)| form).map_err(|e| e.body_text())
        } else {
            match Bytes::from_request(req, state).await {
                Ok(body) => serde_json::from_slice::<ContactForm>(&body).map_err(|e| e.to_string()),
                Err(e) => Err(e.body_text()),
            }
        };

        match decoded {
            Ok(form) => Ok(Self(Some(form.into()))),
            Err(reason) => {
                tracing::debug!(reason = %reason, "Submission body could not be decoded");
                Ok(Self(None))
            }
        }
    }
}

impl IntoResponse for SubmissionResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Relays a contact form submission to the configured mailbox.
///
/// # Errors
/// Returns `SubmissionError::Input` (400) if a field is missing and a 500
/// variant if the mail could not be sent.
pub async fn submit(
    State(state): State<AppState>,
    SubmissionPayload(input): SubmissionPayload,
) -> Result<SubmissionResponse> {
    state.contact_service.submit(input).await?;
    Ok(SubmissionResponse::sent())
}
