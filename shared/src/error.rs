use thiserror::Error;

use crate::ErrorBody;

/// Fallback text when the server sends no usable message.
pub const GENERIC_FAILURE: &str = "Something went wrong";

/// Input rejected before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter your email or phone number")]
    MissingContact,
    #[error("Please fill all the fields ({0} is missing)")]
    MissingField(&'static str),
    #[error("Please enter the verification code")]
    MissingCode,
    #[error("No pending verification; log in or sign up first")]
    NoPendingVerification,
    #[error("Please choose a rating")]
    MissingRating,
    #[error("Rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(u8),
    #[error("Please select an image")]
    MissingImage,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("storage: {0}")]
pub struct StoreError(pub String);

/// Every failure a client flow can surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("network: {0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    #[error("unauthorized: {message}")]
    AuthExpired { message: String },

    #[error("not logged in")]
    Unauthenticated,

    #[error("decode: {0}")]
    Decode(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl ClientError {
    /// Map a non-2xx response to an error, pulling `message` out of a JSON
    /// body when the server sent one.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE.to_string());

        if status == 401 {
            ClientError::AuthExpired { message }
        } else {
            ClientError::Server { status, message }
        }
    }

    /// Text for the blocking notification shown at the flow boundary.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation(v) => v.to_string(),
            ClientError::Network(_) => "Network error or server unavailable".to_string(),
            ClientError::Server { message, .. } | ClientError::AuthExpired { message } => {
                message.clone()
            }
            ClientError::Unauthenticated => "Please login again to continue.".to_string(),
            ClientError::Decode(_) => GENERIC_FAILURE.to_string(),
            ClientError::Storage(e) => e.to_string(),
        }
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            ClientError::AuthExpired { .. } | ClientError::Unauthenticated
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_is_extracted() {
        let err = ClientError::from_response(400, r#"{"message":"Book not found"}"#);
        assert_eq!(
            err,
            ClientError::Server {
                status: 400,
                message: "Book not found".into()
            }
        );
        assert_eq!(err.user_message(), "Book not found");
    }

    #[test]
    fn non_json_body_falls_back_to_generic() {
        let err = ClientError::from_response(502, "<html>bad gateway</html>");
        assert_eq!(err.user_message(), GENERIC_FAILURE);
    }

    #[test]
    fn unauthorized_maps_to_auth_expired() {
        let err = ClientError::from_response(401, r#"{"message":"Token is not valid"}"#);
        assert!(matches!(err, ClientError::AuthExpired { .. }));
        assert!(err.is_auth_failure());
    }

    #[test]
    fn network_errors_use_fixed_text() {
        let err = ClientError::Network("connection refused".into());
        assert_eq!(err.user_message(), "Network error or server unavailable");
    }
}
