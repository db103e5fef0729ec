use async_trait::async_trait;
use bookworm_shared::session::UnauthorizedPolicy;
use bookworm_shared::{
    BookApi, BookPage, ClientError, CreateBook, LoginRequest, LogoutRequest, OtpResponse,
    Recommendation, SignupRequest, TokenResponse, VerifyRequest,
};
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use web_sys::window;

const DEFAULT_API_URL: &str = "https://bookworm-backend-092v.onrender.com";

fn meta_content(name: &str) -> Option<String> {
    let document = window()?.document()?;
    let el = document
        .query_selector(&format!("meta[name='{name}']"))
        .ok()
        .flatten()?;
    el.get_attribute("content").filter(|c| !c.is_empty())
}

fn api_base() -> String {
    // Set by the hosting page, falling back to the public backend
    meta_content("bookworm-api")
        .map(|url| url.trim_end_matches('/').to_string())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// `<meta name="bookworm-logout-on-401" content="true">` opts into dropping
/// the session when the server rejects the token.
pub fn unauthorized_policy() -> UnauthorizedPolicy {
    match meta_content("bookworm-logout-on-401").as_deref() {
        Some("true") | Some("1") => UnauthorizedPolicy::ClearSession,
        _ => UnauthorizedPolicy::Surface,
    }
}

fn network(e: gloo_net::Error) -> ClientError {
    ClientError::Network(e.to_string())
}

fn url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

fn bearer(req: RequestBuilder, token: &str) -> RequestBuilder {
    req.header("Authorization", &format!("Bearer {token}"))
}

async fn check(resp: Response) -> Result<Response, ClientError> {
    if resp.ok() {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    Err(ClientError::from_response(status, &body))
}

async fn parse<R: DeserializeOwned>(resp: Response) -> Result<R, ClientError> {
    check(resp)
        .await?
        .json::<R>()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))
}

async fn send_json<B: Serialize>(req: RequestBuilder, body: &B) -> Result<Response, ClientError> {
    req.json(body)
        .map_err(network)?
        .send()
        .await
        .map_err(network)
}

/// Browser transport over `fetch`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooApi;

#[async_trait(?Send)]
impl BookApi for GlooApi {
    async fn login(&self, req: &LoginRequest) -> Result<OtpResponse, ClientError> {
        parse(send_json(Request::post(&url("/api/user/login")), req).await?).await
    }

    async fn signup(&self, req: &SignupRequest) -> Result<OtpResponse, ClientError> {
        parse(send_json(Request::post(&url("/api/user/signup")), req).await?).await
    }

    async fn verify(&self, req: &VerifyRequest) -> Result<TokenResponse, ClientError> {
        parse(send_json(Request::post(&url("/api/user/verify")), req).await?).await
    }

    async fn logout(&self, req: &LogoutRequest) -> Result<(), ClientError> {
        check(send_json(Request::post(&url("/api/user/logout")), req).await?)
            .await
            .map(drop)
    }

    async fn list_books(
        &self,
        token: &str,
        page: u32,
        limit: u32,
    ) -> Result<BookPage, ClientError> {
        let page = page.to_string();
        let limit = limit.to_string();
        let resp = bearer(Request::get(&url("/api/book")), token)
            .query([("page", page.as_str()), ("limit", limit.as_str())])
            .send()
            .await
            .map_err(network)?;
        parse(resp).await
    }

    async fn user_books(&self, token: &str) -> Result<Vec<Recommendation>, ClientError> {
        let resp = bearer(Request::get(&url("/api/book/user")), token)
            .send()
            .await
            .map_err(network)?;
        parse(resp).await
    }

    async fn create_book(
        &self,
        token: &str,
        req: &CreateBook,
    ) -> Result<Recommendation, ClientError> {
        parse(send_json(bearer(Request::post(&url("/api/book")), token), req).await?).await
    }

    async fn delete_book(&self, token: &str, id: &str) -> Result<(), ClientError> {
        let resp = bearer(Request::delete(&url(&format!("/api/book/{id}"))), token)
            .send()
            .await
            .map_err(network)?;
        check(resp).await.map(drop)
    }
}
