//! `reqwest` transport for [`BookApi`].

use async_trait::async_trait;
use bookworm_shared::{
    BookApi, BookPage, ClientError, CreateBook, LoginRequest, LogoutRequest, OtpResponse,
    Recommendation, SignupRequest, TokenResponse, VerifyRequest,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::Config;

pub struct HttpApi {
    http: reqwest::Client,
    base_url: String,
}

fn network(e: reqwest::Error) -> ClientError {
    ClientError::Network(e.to_string())
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// # Errors
    ///
    /// Fails if the underlying HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("bookworm/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(network)?;
        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map non-2xx to `ClientError`, pulling the server message when present.
    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), %body, "request rejected");
        Err(ClientError::from_response(status.as_u16(), &body))
    }

    async fn parse<R: DeserializeOwned>(resp: reqwest::Response) -> Result<R, ClientError> {
        Self::check(resp)
            .await?
            .json::<R>()
            .await
            .map_err(|e| ClientError::Decode(format!("response body: {e}")))
    }

    async fn post_json<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ClientError> {
        let resp = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(network)?;
        Self::parse(resp).await
    }
}

#[async_trait(?Send)]
impl BookApi for HttpApi {
    async fn login(&self, req: &LoginRequest) -> Result<OtpResponse, ClientError> {
        self.post_json("/api/user/login", req).await
    }

    async fn signup(&self, req: &SignupRequest) -> Result<OtpResponse, ClientError> {
        self.post_json("/api/user/signup", req).await
    }

    async fn verify(&self, req: &VerifyRequest) -> Result<TokenResponse, ClientError> {
        self.post_json("/api/user/verify", req).await
    }

    async fn logout(&self, req: &LogoutRequest) -> Result<(), ClientError> {
        let resp = self
            .http
            .post(self.url("/api/user/logout"))
            .json(req)
            .send()
            .await
            .map_err(network)?;
        Self::check(resp).await.map(drop)
    }

    async fn list_books(
        &self,
        token: &str,
        page: u32,
        limit: u32,
    ) -> Result<BookPage, ClientError> {
        let resp = self
            .http
            .get(self.url("/api/book"))
            .query(&[("page", page), ("limit", limit)])
            .bearer_auth(token)
            .send()
            .await
            .map_err(network)?;
        Self::parse(resp).await
    }

    async fn user_books(&self, token: &str) -> Result<Vec<Recommendation>, ClientError> {
        let resp = self
            .http
            .get(self.url("/api/book/user"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(network)?;
        Self::parse(resp).await
    }

    async fn create_book(
        &self,
        token: &str,
        req: &CreateBook,
    ) -> Result<Recommendation, ClientError> {
        let resp = self
            .http
            .post(self.url("/api/book"))
            .bearer_auth(token)
            .json(req)
            .send()
            .await
            .map_err(network)?;
        Self::parse(resp).await
    }

    async fn delete_book(&self, token: &str, id: &str) -> Result<(), ClientError> {
        let resp = self
            .http
            .delete(self.url(&format!("/api/book/{id}")))
            .bearer_auth(token)
            .send()
            .await
            .map_err(network)?;
        Self::check(resp).await.map(drop)
    }
}
