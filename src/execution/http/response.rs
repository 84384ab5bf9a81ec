//! Error classification for non-success responses

use crate::error::PortalError;
use crate::types::ErrorBody;

/// Message for a failed response whose body is shown verbatim: the body
/// text if any, otherwise `HTTP Error {status}`.
pub(crate) fn body_or_status_message(status: u16, body: &str) -> String {
    if body.is_empty() {
        format!("HTTP Error {status}")
    } else {
        body.to_string()
    }
}

/// Consume a failed response, keeping its body text as the message.
pub(crate) async fn error_from_body_text(response: reqwest::Response) -> PortalError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    PortalError::api_error(status, body_or_status_message(status, &body))
}

/// Consume a failed response, taking the message from a `detail` error body
/// and falling back to `fallback` when there is none.
pub(crate) async fn error_from_detail(response: reqwest::Response, fallback: &str) -> PortalError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.first_message())
        .unwrap_or_else(|| fallback.to_string());
    classify(status, message)
}

pub(crate) fn classify(status: u16, message: String) -> PortalError {
    if status == 401 {
        PortalError::AuthenticationError(message)
    } else {
        PortalError::api_error(status, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_falls_back_to_status() {
        assert_eq!(body_or_status_message(502, ""), "HTTP Error 502");
        assert_eq!(body_or_status_message(413, "File too large"), "File too large");
    }

    #[test]
    fn unauthorized_is_an_authentication_error() {
        assert!(matches!(
            classify(401, "Invalid credentials".into()),
            PortalError::AuthenticationError(_)
        ));
        assert_eq!(classify(422, "bad".into()).status_code(), Some(422));
    }
}
