use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use skyops_core::models::{Flight, Passenger, Seat, Service};

use crate::api::{
    AuthApi, FlightApi, FlightPayload, PassengerApi, PassengerPayload, SeatApi, SeatUpdate,
    ServiceApi, ServicePayload,
};
use crate::auth::{AuthSession, Credentials, TokenStore};
use crate::config::ApiConfig;
use crate::error::{extract_message, ApiError};

/// The one real implementation of the API traits, speaking JSON over HTTP
/// to the operations backend. Every request carries the stored bearer token
/// and a correlation id; an authentication failure on any call clears the
/// token store before the error is returned.
pub struct HttpApi {
    http: Client,
    base_url: String,
    tokens: Arc<TokenStore>,
}

impl HttpApi {
    pub fn new(config: &ApiConfig, tokens: Arc<TokenStore>) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    pub fn tokens(&self) -> &Arc<TokenStore> {
        &self.tokens
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Response, ApiError> {
        let request_id = Uuid::new_v4();
        let url = format!("{}{}", self.base_url, path);

        let mut req = self
            .http
            .request(method.clone(), &url)
            .header("X-Request-Id", request_id.to_string());
        if let Some(token) = self.tokens.token() {
            req = req.bearer_auth(token);
        }
        if let Some(body) = &body {
            req = req.json(body);
        }

        tracing::debug!(%request_id, %method, path, "dispatching request");
        let resp = req.send().await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let message = extract_message(&resp.text().await.unwrap_or_default());
        let err = ApiError::from_status(status, message);
        if err.is_auth_failure() {
            tracing::warn!(%request_id, path, "authentication failure, clearing stored token");
            self.tokens.clear();
        }
        Err(err)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self.send(Method::GET, path, None).await?;
        resp.json()
            .await
            .map_err(|e| ApiError::Transport(format!("decoding {path}: {e}")))
    }

    /// GET a list endpoint as raw JSON for the wire normalizers.
    async fn get_values(&self, path: &str) -> Result<Vec<Value>, ApiError> {
        self.get_json(path).await
    }

    async fn send_json<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::Transport(format!("encoding {path}: {e}")))?;
        self.send(method, path, Some(body)).await.map(drop)
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(Method::DELETE, path, None).await.map(drop)
    }
}

#[async_trait]
impl AuthApi for HttpApi {
    async fn login(&self, credentials: &Credentials) -> Result<AuthSession, ApiError> {
        let body = serde_json::to_value(credentials)
            .map_err(|e| ApiError::Transport(format!("encoding credentials: {e}")))?;
        let resp = self.send(Method::POST, "/api/auth/login", Some(body)).await?;
        let session: AuthSession = resp
            .json()
            .await
            .map_err(|e| ApiError::Transport(format!("decoding auth response: {e}")))?;
        self.tokens.set(&session.token);
        tracing::info!(username = %session.user.username, role = %session.user.role, "logged in");
        Ok(session)
    }
}

#[async_trait]
impl FlightApi for HttpApi {
    async fn list_flights(&self) -> Result<Vec<Flight>, ApiError> {
        self.get_json("/api/flights").await
    }

    async fn create_flight(&self, flight: &FlightPayload) -> Result<(), ApiError> {
        self.send_json(Method::POST, "/api/flights", flight).await
    }

    async fn update_flight(&self, id: i64, flight: &FlightPayload) -> Result<(), ApiError> {
        self.send_json(Method::PUT, &format!("/api/flights/{id}"), flight)
            .await
    }

    async fn delete_flight(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/api/flights/{id}")).await
    }
}

#[async_trait]
impl PassengerApi for HttpApi {
    async fn list_passengers(&self) -> Result<Vec<Passenger>, ApiError> {
        let rows = self.get_values("/api/passengers").await?;
        Ok(rows.iter().filter_map(crate::wire::passenger_from_value).collect())
    }

    async fn create_passenger(&self, passenger: &PassengerPayload) -> Result<(), ApiError> {
        self.send_json(Method::POST, "/api/passengers", passenger).await
    }

    async fn update_passenger(
        &self,
        id: i64,
        passenger: &PassengerPayload,
    ) -> Result<(), ApiError> {
        self.send_json(Method::PUT, &format!("/api/passengers/{id}"), passenger)
            .await
    }

    async fn delete_passenger(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/api/passengers/{id}")).await
    }
}

#[async_trait]
impl SeatApi for HttpApi {
    async fn list_seats(&self) -> Result<Vec<Seat>, ApiError> {
        let rows = self.get_values("/api/seats").await?;
        Ok(rows.iter().filter_map(crate::wire::seat_from_value).collect())
    }

    async fn update_seat(&self, id: i64, update: &SeatUpdate) -> Result<(), ApiError> {
        self.send_json(Method::PUT, &format!("/api/seats/{id}"), update)
            .await
    }
}

#[async_trait]
impl ServiceApi for HttpApi {
    async fn list_services(&self) -> Result<Vec<Service>, ApiError> {
        let rows = self.get_values("/api/services").await?;
        Ok(rows.iter().filter_map(crate::wire::service_from_value).collect())
    }

    async fn create_service(&self, service: &ServicePayload) -> Result<(), ApiError> {
        self.send_json(Method::POST, "/api/services", service).await
    }

    async fn update_service(&self, id: i64, service: &ServicePayload) -> Result<(), ApiError> {
        self.send_json(Method::PUT, &format!("/api/services/{id}"), service)
            .await
    }

    async fn delete_service(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/api/services/{id}")).await
    }

    async fn passenger_services(&self, passenger_id: i64) -> Result<Vec<Service>, ApiError> {
        let rows = self
            .get_values(&format!("/api/passengers/{passenger_id}/services"))
            .await?;
        Ok(rows.iter().filter_map(crate::wire::service_from_value).collect())
    }

    async fn link_service(&self, passenger_id: i64, service_id: i64) -> Result<(), ApiError> {
        self.send_json(
            Method::POST,
            &format!("/api/passengers/{passenger_id}/services"),
            &serde_json::json!({ "serviceId": service_id }),
        )
        .await
    }

    async fn unlink_service(&self, passenger_id: i64, service_id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/api/passengers/{passenger_id}/services/{service_id}"))
            .await
    }
}
