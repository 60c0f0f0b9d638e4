// mangrove-client/src/http.rs
// HTTP 客户端 - 网络通信

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use shared::ApiResponse;
use shared::client::{LoginRequest, LoginResponse, UserInfo};
use shared::error::{AppError, ErrorCode};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Auth API surface consumed by the session manager
///
/// The trait is the injection seam: production code uses [`HttpApiClient`],
/// tests supply an in-memory implementation.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// `POST /api/auth/login`
    async fn login(&self, req: &LoginRequest) -> ClientResult<LoginResponse>;

    /// `GET /api/auth/me` with the given bearer token
    async fn me(&self, token: &str) -> ClientResult<UserInfo>;

    /// `POST /api/auth/logout` with the given bearer token
    async fn logout(&self, token: &str) -> ClientResult<()>;
}

/// Network HTTP client for the backend REST API
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    client: Client,
    base_url: String,
}

impl HttpApiClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> ClientResult<T> {
        let status = response.status();
        let text = response.text().await?;

        // The backend wraps everything in the envelope, including errors
        if let Ok(envelope) = serde_json::from_str::<ApiResponse<T>>(&text) {
            return envelope.into_result().map_err(ClientError::from);
        }

        // 非封套响应：按状态码降级处理
        if !status.is_success() {
            return match status {
                StatusCode::UNAUTHORIZED => Err(ClientError::SessionExpired),
                StatusCode::FORBIDDEN => Err(ClientError::Forbidden(text)),
                _ => Err(ClientError::InvalidResponse(format!(
                    "HTTP {}: {}",
                    status, text
                ))),
            };
        }
        Err(ClientError::InvalidResponse(
            "Response is not a valid API envelope".to_string(),
        ))
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn login(&self, req: &LoginRequest) -> ClientResult<LoginResponse> {
        let response = self
            .client
            .post(self.url("api/auth/login"))
            .json(req)
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn me(&self, token: &str) -> ClientResult<UserInfo> {
        let response = self
            .client
            .get(self.url("api/auth/me"))
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {}", token))
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn logout(&self, token: &str) -> ClientResult<()> {
        let response = self
            .client
            .post(self.url("api/auth/logout"))
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {}", token))
            .send()
            .await?;
        // Logout returns an empty-data envelope
        let status = response.status();
        let text = response.text().await?;
        if let Ok(envelope) = serde_json::from_str::<ApiResponse<serde_json::Value>>(&text) {
            if envelope.success {
                return Ok(());
            }
            let code = ErrorCode::try_from(envelope.code).unwrap_or(ErrorCode::Unknown);
            return Err(ClientError::from(AppError::with_message(
                code,
                envelope.message,
            )));
        }
        if status.is_success() {
            return Ok(());
        }
        Err(ClientError::InvalidResponse(format!(
            "HTTP {}: {}",
            status, text
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let config = ClientConfig::new("http://localhost:8080/");
        let client = HttpApiClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(
            client.url("/api/auth/login"),
            "http://localhost:8080/api/auth/login"
        );
        assert_eq!(
            client.url("api/auth/me"),
            "http://localhost:8080/api/auth/me"
        );
    }

    #[test]
    fn test_error_envelope_maps_to_client_error() {
        let json = r#"{"success":false,"code":1002,"message":"Invalid username or password"}"#;
        let envelope: ApiResponse<LoginResponse> = serde_json::from_str(json).unwrap();
        let err = envelope.into_result().map_err(ClientError::from).unwrap_err();
        assert!(matches!(err, ClientError::InvalidCredentials));

        let json = r#"{"success":false,"code":1005,"message":"Session has expired"}"#;
        let envelope: ApiResponse<UserInfo> = serde_json::from_str(json).unwrap();
        let err = envelope.into_result().map_err(ClientError::from).unwrap_err();
        assert!(matches!(err, ClientError::SessionExpired));

        let json = r#"{"success":false,"code":9001,"message":"Internal server error"}"#;
        let envelope: ApiResponse<UserInfo> = serde_json::from_str(json).unwrap();
        let err = envelope.into_result().map_err(ClientError::from).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Api {
                code: ErrorCode::InternalError,
                ..
            }
        ));
    }
}
