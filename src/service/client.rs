use crate::common::{FaceAuthError, Result, SdkOptions};
use crate::service::protocol::{
    ApiErrorBody, AuthCall, AuthResult, CustomFields, FaceAuthRequest, API_KEY_HEADER,
};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// The two face-auth calls the capture controller can make.
#[async_trait]
pub trait FaceAuthApi: Send + Sync {
    async fn login(&self, image_base64: String) -> Result<AuthResult>;

    async fn signup(
        &self,
        image_base64: String,
        custom_fields: Option<CustomFields>,
    ) -> Result<AuthResult>;

    async fn call(&self, call: AuthCall, image_base64: String) -> Result<AuthResult> {
        match call {
            AuthCall::Login => self.login(image_base64).await,
            AuthCall::Signup { custom_fields } => self.signup(image_base64, custom_fields).await,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ApiClient {
    pub fn new(options: &SdkOptions) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base_url: options.resolved_base_url().trim_end_matches('/').to_string(),
            api_key: options.api_key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn post<T, P>(&self, endpoint: &str, payload: &P) -> Result<T>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let message = error_message(status, &body);
            tracing::warn!("{} failed with {}: {}", endpoint, status.as_u16(), message);
            return Err(FaceAuthError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn signup(
        &self,
        image_base64: String,
        custom_fields: Option<CustomFields>,
    ) -> Result<AuthResult> {
        let call = AuthCall::Signup { custom_fields };
        let endpoint = call.endpoint();
        self.post(endpoint, &call.into_request(image_base64)).await
    }

    pub async fn login(&self, image_base64: String) -> Result<AuthResult> {
        let request = FaceAuthRequest {
            image_base64,
            custom_fields: None,
        };
        self.post(AuthCall::Login.endpoint(), &request).await
    }
}

#[async_trait]
impl FaceAuthApi for ApiClient {
    async fn login(&self, image_base64: String) -> Result<AuthResult> {
        ApiClient::login(self, image_base64).await
    }

    async fn signup(
        &self,
        image_base64: String,
        custom_fields: Option<CustomFields>,
    ) -> Result<AuthResult> {
        ApiClient::signup(self, image_base64, custom_fields).await
    }
}

/// Server `detail` if the body carries one, otherwise a status-code fallback.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    match serde_json::from_slice::<ApiErrorBody>(body) {
        Ok(ApiErrorBody { detail: Some(detail) }) if !detail.is_empty() => detail,
        _ => format!(
            "API Error: {} - {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        ),
    }
}
