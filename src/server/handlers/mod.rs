pub mod fonts;
pub mod render;

use axum::http::StatusCode;

use crate::error::LabelError;

/// Status code and message for a failed request.
pub(crate) fn error_response(e: LabelError) -> (StatusCode, String) {
    let status = match e {
        LabelError::Json(_)
        | LabelError::DuplicateKey(_)
        | LabelError::UnknownKey(_)
        | LabelError::FontSpec(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}
