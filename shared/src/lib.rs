pub mod api;
pub mod auth;
pub mod delete;
pub mod draft;
pub mod error;
pub mod feed;
pub mod format;
pub mod session;
pub mod shelf;

#[cfg(test)]
mod testing;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub use api::BookApi;
pub use error::{ClientError, StoreError, ValidationError};

// ── Auth ──

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub phonenumber: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub phonenumber: String,
}

/// Returned by login and signup. The server hands the OTP back directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub otp: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub phonenumber: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub phonenumber: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoutRequest {
    pub token: String,
}

// ── Books ──

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub username: String,
    pub name: String,
    pub caption: String,
    pub image_url: String,
    #[serde(deserialize_with = "rating")]
    pub ratings: u8,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPage {
    pub books: Vec<Recommendation>,
    #[serde(default)]
    pub total_pages: u32,
}

/// Body of `POST /api/book`. The server expects `ratings` as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBook {
    pub name: String,
    pub caption: String,
    pub ratings: String,
    pub image: String,
}

/// Error payload the server sends alongside non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

// ── Serde helpers ──

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Str(String),
    Int(i64),
    Float(f64),
}

fn string_or_number<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(match StringOrNumber::deserialize(de)? {
        StringOrNumber::Str(s) => s,
        StringOrNumber::Int(n) => n.to_string(),
        StringOrNumber::Float(f) => f.to_string(),
    })
}

fn rating<'de, D: Deserializer<'de>>(de: D) -> Result<u8, D::Error> {
    let value = match StringOrNumber::deserialize(de)? {
        StringOrNumber::Str(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid rating: {s:?}")))?,
        StringOrNumber::Int(n) => n as f64,
        StringOrNumber::Float(f) => f,
    };
    Ok(value.round().clamp(0.0, 5.0) as u8)
}
