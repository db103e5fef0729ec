use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::session::{KeyValueStore, MemoryStore};
use crate::{
    BookApi, BookPage, ClientError, CreateBook, LoginRequest, LogoutRequest, OtpResponse,
    Recommendation, SignupRequest, StoreError, TokenResponse, VerifyRequest,
};

/// One map behind every clone, like `localStorage` across handles.
#[derive(Debug, Clone, Default)]
pub struct SharedStore(Rc<RefCell<MemoryStore>>);

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.0.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.0.borrow_mut().set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.0.borrow_mut().remove(key)
    }
}

pub fn book(id: &str) -> Recommendation {
    Recommendation {
        id: id.to_string(),
        username: "ana".to_string(),
        name: format!("Book {id}"),
        caption: format!("Caption for {id}"),
        image_url: format!("https://img.example/{id}.png"),
        ratings: 4,
        created_at: Utc.with_ymd_and_hms(2025, 3, 4, 10, 0, 0).unwrap(),
    }
}

pub fn page(ids: &[&str], total_pages: u32) -> BookPage {
    BookPage {
        books: ids.iter().map(|id| book(id)).collect(),
        total_pages,
    }
}

pub fn otp(phone: &str) -> OtpResponse {
    OtpResponse {
        token: None,
        otp: "123456".to_string(),
        username: "ana".to_string(),
        email: Some("ana@example.com".to_string()),
        phonenumber: phone.to_string(),
    }
}

/// Scripted `BookApi`: each endpoint pops its next queued answer and every
/// call is recorded.
#[derive(Default)]
pub struct FakeApi {
    pub calls: RefCell<Vec<String>>,
    pub pages: RefCell<VecDeque<Result<BookPage, ClientError>>>,
    pub auth: RefCell<VecDeque<Result<OtpResponse, ClientError>>>,
    pub tokens: RefCell<VecDeque<Result<TokenResponse, ClientError>>>,
    pub unit: RefCell<VecDeque<Result<(), ClientError>>>,
    pub created: RefCell<VecDeque<Result<Recommendation, ClientError>>>,
    pub shelves: RefCell<VecDeque<Result<Vec<Recommendation>, ClientError>>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_page(&self, result: Result<BookPage, ClientError>) {
        self.pages.borrow_mut().push_back(result);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

fn next<T>(queue: &RefCell<VecDeque<Result<T, ClientError>>>) -> Result<T, ClientError> {
    queue
        .borrow_mut()
        .pop_front()
        .unwrap_or_else(|| Err(ClientError::Network("no scripted response".into())))
}

#[async_trait(?Send)]
impl BookApi for FakeApi {
    async fn login(&self, req: &LoginRequest) -> Result<OtpResponse, ClientError> {
        self.record(format!("login {:?} {:?}", req.email, req.phonenumber));
        next(&self.auth)
    }

    async fn signup(&self, req: &SignupRequest) -> Result<OtpResponse, ClientError> {
        self.record(format!("signup {}", req.username));
        next(&self.auth)
    }

    async fn verify(&self, req: &VerifyRequest) -> Result<TokenResponse, ClientError> {
        self.record(format!("verify {} {}", req.phonenumber, req.code));
        next(&self.tokens)
    }

    async fn logout(&self, req: &LogoutRequest) -> Result<(), ClientError> {
        self.record(format!("logout {}", req.token));
        next(&self.unit)
    }

    async fn list_books(
        &self,
        token: &str,
        page: u32,
        limit: u32,
    ) -> Result<BookPage, ClientError> {
        self.record(format!("list {token} {page} {limit}"));
        next(&self.pages)
    }

    async fn user_books(&self, token: &str) -> Result<Vec<Recommendation>, ClientError> {
        self.record(format!("mine {token}"));
        next(&self.shelves)
    }

    async fn create_book(
        &self,
        token: &str,
        req: &CreateBook,
    ) -> Result<Recommendation, ClientError> {
        self.record(format!("create {token} {}", req.name));
        next(&self.created)
    }

    async fn delete_book(&self, token: &str, id: &str) -> Result<(), ClientError> {
        self.record(format!("delete {token} {id}"));
        next(&self.unit)
    }
}
