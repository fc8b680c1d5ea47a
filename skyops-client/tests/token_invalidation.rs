//! Token lifecycle against a real socket: an authentication failure from
//! any endpoint must clear the stored token, while a data-flavored 403
//! leaves the session intact.

use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use skyops_client::api::FlightApi;
use skyops_client::config::ApiConfig;
use skyops_client::{ApiError, HttpApi, TokenStore};

/// Serve exactly one canned HTTP response, then close.
async fn one_shot_server(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        // Drain the request headers before answering.
        let mut buf = vec![0u8; 4096];
        let mut read = 0;
        loop {
            let n = socket.read(&mut buf[read..]).await.unwrap();
            if n == 0 {
                break;
            }
            read += n;
            if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") || read == buf.len() {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 {status_line}\r\n\
             Content-Type: application/json\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
    });

    format!("http://{addr}")
}

fn client_with_token(base_url: String) -> (Arc<TokenStore>, HttpApi) {
    let tokens = Arc::new(TokenStore::in_memory());
    tokens.set("session-jwt");
    let api = HttpApi::new(
        &ApiConfig {
            base_url,
            timeout_seconds: 5,
        },
        tokens.clone(),
    )
    .unwrap();
    (tokens, api)
}

#[tokio::test]
async fn a_401_clears_the_stored_token() {
    let base = one_shot_server("401 Unauthorized", r#"{"message":"bad credentials"}"#).await;
    let (tokens, api) = client_with_token(base);

    let err = api.list_flights().await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthenticated(_)));
    assert!(tokens.token().is_none(), "token must be invalidated");
}

#[tokio::test]
async fn an_auth_flavored_403_clears_the_stored_token() {
    let base = one_shot_server("403 Forbidden", r#"{"message":"JWT token expired"}"#).await;
    let (tokens, api) = client_with_token(base);

    let err = api.list_flights().await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthenticated(_)));
    assert!(tokens.token().is_none(), "token must be invalidated");
}

#[tokio::test]
async fn a_data_403_keeps_the_stored_token() {
    let base = one_shot_server(
        "403 Forbidden",
        r#"{"message":"seat 12C is blocked for crew"}"#,
    )
    .await;
    let (tokens, api) = client_with_token(base);

    let err = api.list_flights().await.unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));
    assert_eq!(
        tokens.token().as_deref(),
        Some("session-jwt"),
        "a data 403 must not end the session"
    );
}
