//! API Response types
//!
//! Standardized response envelope shared with the backend REST API.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorCode};

/// Unified API response envelope
///
/// All backend responses follow this format:
/// ```json
/// {
///     "success": true,
///     "code": 0,
///     "message": "OK",
///     "data": { ... }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the operation succeeded
    pub success: bool,
    /// Numeric error code (0 for success)
    pub code: u16,
    /// Human-readable message
    pub message: String,
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create a success response with data
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            code: ErrorCode::Success.code(),
            message: "OK".to_string(),
            data: Some(data),
        }
    }

    /// Create an error response
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            code: code.code(),
            message: message.into(),
            data: None,
        }
    }

    /// Convert the envelope into a typed result
    ///
    /// A success envelope without a `data` field is treated as a malformed
    /// response. Unknown error codes map to [`ErrorCode::Unknown`] so a
    /// newer backend never crashes an older client.
    pub fn into_result(self) -> Result<T, AppError> {
        if self.success {
            match self.data {
                Some(data) => Ok(data),
                None => Err(AppError::internal("Success response missing data")),
            }
        } else {
            let code = ErrorCode::try_from(self.code).unwrap_or(ErrorCode::Unknown);
            Err(AppError::with_message(code, self.message))
        }
    }
}

impl ApiResponse<()> {
    /// Create a success response without data
    pub fn ok_empty() -> Self {
        Self {
            success: true,
            code: ErrorCode::Success.code(),
            message: "OK".to_string(),
            data: None,
        }
    }
}

impl<T> From<AppError> for ApiResponse<T> {
    fn from(err: AppError) -> Self {
        Self {
            success: false,
            code: err.code.code(),
            message: err.message,
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_envelope() {
        let response = ApiResponse::ok(42);
        assert!(response.success);
        assert_eq!(response.code, 0);
        assert_eq!(response.data, Some(42));
    }

    #[test]
    fn test_error_envelope() {
        let response: ApiResponse<()> =
            ApiResponse::error(ErrorCode::InvalidCredentials, "Invalid username or password");
        assert!(!response.success);
        assert_eq!(response.code, 1002);
        assert!(response.data.is_none());
    }

    #[test]
    fn test_into_result_ok() {
        let result = ApiResponse::ok("hello").into_result();
        assert_eq!(result.unwrap(), "hello");
    }

    #[test]
    fn test_into_result_error() {
        let response: ApiResponse<String> =
            ApiResponse::error(ErrorCode::SessionExpired, "Session has expired");
        let err = response.into_result().unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionExpired);
        assert_eq!(err.message, "Session has expired");
    }

    #[test]
    fn test_into_result_unknown_code() {
        let json = r#"{"success":false,"code":4242,"message":"weird"}"#;
        let response: ApiResponse<String> = serde_json::from_str(json).unwrap();
        let err = response.into_result().unwrap_err();
        assert_eq!(err.code, ErrorCode::Unknown);
        assert_eq!(err.message, "weird");
    }

    #[test]
    fn test_into_result_missing_data() {
        let json = r#"{"success":true,"code":0,"message":"OK"}"#;
        let response: ApiResponse<String> = serde_json::from_str(json).unwrap();
        let err = response.into_result().unwrap_err();
        assert_eq!(err.code, ErrorCode::InternalError);
    }

    #[test]
    fn test_serialize() {
        let response = ApiResponse::ok("hello");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"success\":true"));
        assert!(json.contains("\"code\":0"));
        assert!(json.contains("\"data\":\"hello\""));
    }

    #[test]
    fn test_deserialize() {
        let json = r#"{"success":true,"code":0,"message":"OK","data":7}"#;
        let response: ApiResponse<i32> = serde_json::from_str(json).unwrap();
        assert!(response.success);
        assert_eq!(response.data, Some(7));
    }
}
