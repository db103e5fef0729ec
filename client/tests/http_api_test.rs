//! HTTP transport against a mock BookWorm server.

use bookworm_client::HttpApi;
use bookworm_shared::{BookApi, ClientError, CreateBook, LoginRequest, LogoutRequest};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn book_json(id: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "username": "ana",
        "name": format!("Book {id}"),
        "caption": "A great read",
        "imageUrl": format!("https://img.example/{id}.png"),
        "ratings": 4,
        "createdAt": "2025-03-04T10:00:00.000Z"
    })
}

#[tokio::test]
async fn list_books_sends_bearer_and_paging() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/book"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "5"))
        .and(header("Authorization", "Bearer jwt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "books": [book_json("a"), book_json("b")],
            "currentPage": 2,
            "totalBooks": 7,
            "totalPages": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpApi::new(server.uri());
    let page = api.list_books("jwt", 2, 5).await.unwrap();
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.books.len(), 2);
    assert_eq!(page.books[0].id, "a");
}

#[tokio::test]
async fn login_posts_contact_and_returns_otp() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/user/login"))
        .and(body_json(json!({ "email": null, "phonenumber": "5551234" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "otp": "4321",
            "username": "ana",
            "email": "ana@example.com",
            "phonenumber": 5551234
        })))
        .mount(&server)
        .await;

    let api = HttpApi::new(server.uri());
    let resp = api
        .login(&LoginRequest {
            email: None,
            phonenumber: Some("5551234".into()),
        })
        .await
        .unwrap();
    assert_eq!(resp.otp, "4321");
    assert_eq!(resp.phonenumber, "5551234");
}

#[tokio::test]
async fn server_error_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/book"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "Please provide all fields" })),
        )
        .mount(&server)
        .await;

    let api = HttpApi::new(server.uri());
    let err = api
        .create_book(
            "jwt",
            &CreateBook {
                name: "Dune".into(),
                caption: "Spice".into(),
                ratings: "4".into(),
                image: "data:image/png;base64,AQID".into(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ClientError::Server {
            status: 400,
            message: "Please provide all fields".into()
        }
    );
}

#[tokio::test]
async fn unauthorized_is_auth_expired() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/book/user"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Token is not valid" })),
        )
        .mount(&server)
        .await;

    let api = HttpApi::new(server.uri());
    let err = api.user_books("stale").await.unwrap_err();
    assert_eq!(
        err,
        ClientError::AuthExpired {
            message: "Token is not valid".into()
        }
    );
}

#[tokio::test]
async fn delete_and_logout_accept_empty_success() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/book/b1"))
        .and(header("Authorization", "Bearer jwt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Book deleted" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/user/logout"))
        .and(body_json(json!({ "token": "jwt" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpApi::new(server.uri());
    api.delete_book("jwt", "b1").await.unwrap();
    api.logout(&LogoutRequest { token: "jwt".into() }).await.unwrap();
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/book"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let api = HttpApi::new(server.uri());
    let err = api.list_books("jwt", 1, 5).await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    let api = HttpApi::new("http://127.0.0.1:9");
    let err = api.list_books("jwt", 1, 5).await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_)));
    assert_eq!(err.user_message(), "Network error or server unavailable");
}
