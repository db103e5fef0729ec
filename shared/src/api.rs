use async_trait::async_trait;

use crate::{
    BookPage, ClientError, CreateBook, LoginRequest, LogoutRequest, OtpResponse, Recommendation,
    SignupRequest, TokenResponse, VerifyRequest,
};

/// The BookWorm REST API as seen by the client.
///
/// Implemented over `reqwest` for native builds and over `gloo-net` in the
/// browser. Futures are not required to be `Send`: every consumer runs on a
/// single-threaded executor.
///
/// Endpoints taking a `token` send it as a bearer credential.
#[async_trait(?Send)]
pub trait BookApi {
    /// POST /api/user/login
    async fn login(&self, req: &LoginRequest) -> Result<OtpResponse, ClientError>;

    /// POST /api/user/signup
    async fn signup(&self, req: &SignupRequest) -> Result<OtpResponse, ClientError>;

    /// POST /api/user/verify
    async fn verify(&self, req: &VerifyRequest) -> Result<TokenResponse, ClientError>;

    /// POST /api/user/logout
    async fn logout(&self, req: &LogoutRequest) -> Result<(), ClientError>;

    /// GET /api/book?page=&limit=
    async fn list_books(&self, token: &str, page: u32, limit: u32)
        -> Result<BookPage, ClientError>;

    /// GET /api/book/user
    async fn user_books(&self, token: &str) -> Result<Vec<Recommendation>, ClientError>;

    /// POST /api/book
    async fn create_book(&self, token: &str, req: &CreateBook)
        -> Result<Recommendation, ClientError>;

    /// DELETE /api/book/:id
    async fn delete_book(&self, token: &str, id: &str) -> Result<(), ClientError>;
}
