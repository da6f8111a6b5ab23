use async_trait::async_trait;
use log::{error, info, warn};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    ApiEnvelope, Booking, BookingData, BookingListData, BookingPayload, BookingStatus, Branch,
    BranchListData, Customer, CustomerListData, ServerErrorBody, UpdateBookingStatusRequest,
    Vaccination, VaccinationListData,
};
use std::sync::Arc;
use std::time::Duration;

use crate::config::ConsoleConfig;
use crate::domain::query::BookingScope;
use crate::error::{ConsoleError, Result};
use crate::services::session::{credentials_from_config, CredentialProvider};
use crate::store::{BookingStore, CatalogSource};

/// API client for the clinic REST backend. Every request is signed with the
/// bearer token of the injected credential provider.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl ApiClient {
    /// Create a client for `base_url` (scheme + host, no `/api` suffix)
    pub fn new(base_url: impl Into<String>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// Create a client from console configuration
    pub fn from_config(config: &ConsoleConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ConsoleError::Config(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: config.api_root().to_string(),
            credentials: Arc::from(credentials_from_config(config)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// Sign and send a request, mapping transport failures and non-2xx answers
    async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let token = self.credentials.bearer_token().await?;

        let response = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ConsoleError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            warn!("🔒 Booking service rejected the session credential");
            return Err(ConsoleError::AuthFailure);
        }

        let body = response.text().await.unwrap_or_default();
        let parsed: ServerErrorBody = serde_json::from_str(&body).unwrap_or_default();
        error!("Booking service answered {}: {}", status, body);
        Err(ConsoleError::ServerRejection {
            status: status.as_u16(),
            message: parsed.message,
            field_errors: parsed.errors,
        })
    }

    async fn fetch_data<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.execute(request).await?;
        response
            .json::<ApiEnvelope<T>>()
            .await
            .map(|envelope| envelope.data)
            .map_err(|e| ConsoleError::ResponseParseFailed(e.to_string()))
    }

    /// `GET /api/bookings[?month=M&year=Y]`
    pub async fn get_bookings(&self, scope: &BookingScope) -> Result<Vec<Booking>> {
        let mut request = self.client.get(self.url("/bookings"));
        if let Some((month, year)) = scope.date_params() {
            request = request.query(&[("month", month.to_string()), ("year", year.to_string())]);
        }

        let data: BookingListData = self.fetch_data(request).await?;
        info!("📅 Fetched {} bookings for {}", data.bookings.len(), scope);
        Ok(data.bookings)
    }

    /// `POST /api/bookings`
    pub async fn post_booking(&self, payload: &BookingPayload) -> Result<Booking> {
        let request = self.client.post(self.url("/bookings")).json(payload);
        let data: BookingData = self.fetch_data(request).await?;
        info!("Created booking {}", data.booking.booking_number);
        Ok(data.booking)
    }

    /// `PUT /api/bookings/:id`
    pub async fn put_booking(&self, booking_id: &str, payload: &BookingPayload) -> Result<Booking> {
        let request = self
            .client
            .put(self.url(&format!("/bookings/{}", booking_id)))
            .json(payload);
        let data: BookingData = self.fetch_data(request).await?;
        info!("Updated booking {}", data.booking.booking_number);
        Ok(data.booking)
    }

    /// `DELETE /api/bookings/:id`
    pub async fn remove_booking(&self, booking_id: &str) -> Result<()> {
        let request = self.client.delete(self.url(&format!("/bookings/{}", booking_id)));
        self.execute(request).await?;
        info!("Deleted booking {}", booking_id);
        Ok(())
    }

    /// `PATCH /api/bookings/:id/status`
    pub async fn patch_booking_status(&self, booking_id: &str, status: BookingStatus) -> Result<Booking> {
        let request = self
            .client
            .patch(self.url(&format!("/bookings/{}/status", booking_id)))
            .json(&UpdateBookingStatusRequest { status });
        let data: BookingData = self.fetch_data(request).await?;
        info!("Booking {} is now {}", data.booking.booking_number, data.booking.status);
        Ok(data.booking)
    }

    pub async fn get_customers(&self) -> Result<Vec<Customer>> {
        let data: CustomerListData = self.fetch_data(self.client.get(self.url("/customers"))).await?;
        Ok(data.customers)
    }

    pub async fn get_vaccinations(&self) -> Result<Vec<Vaccination>> {
        let data: VaccinationListData = self
            .fetch_data(self.client.get(self.url("/vaccinations")))
            .await?;
        Ok(data.vaccinations)
    }

    pub async fn get_branches(&self) -> Result<Vec<Branch>> {
        let data: BranchListData = self.fetch_data(self.client.get(self.url("/branches"))).await?;
        Ok(data.branches)
    }
}

#[async_trait]
impl BookingStore for ApiClient {
    async fn list_bookings(&self, scope: &BookingScope) -> Result<Vec<Booking>> {
        self.get_bookings(scope).await
    }

    async fn create_booking(&self, payload: &BookingPayload) -> Result<Booking> {
        self.post_booking(payload).await
    }

    async fn update_booking(&self, booking_id: &str, payload: &BookingPayload) -> Result<Booking> {
        self.put_booking(booking_id, payload).await
    }

    async fn delete_booking(&self, booking_id: &str) -> Result<()> {
        self.remove_booking(booking_id).await
    }

    async fn update_booking_status(&self, booking_id: &str, status: BookingStatus) -> Result<Booking> {
        self.patch_booking_status(booking_id, status).await
    }
}

#[async_trait]
impl CatalogSource for ApiClient {
    async fn list_customers(&self) -> Result<Vec<Customer>> {
        self.get_customers().await
    }

    async fn list_vaccinations(&self) -> Result<Vec<Vaccination>> {
        self.get_vaccinations().await
    }

    async fn list_branches(&self) -> Result<Vec<Branch>> {
        self.get_branches().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::session::StaticCredentials;

    #[test]
    fn test_client_creation() {
        let client = ApiClient::new(
            "http://localhost:5000/",
            Arc::new(StaticCredentials::new("tok")),
        );
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url("/bookings"), "http://localhost:5000/api/bookings");
    }

    #[test]
    fn test_client_from_config() {
        let config = ConsoleConfig {
            api_base_url: "https://clinic.example.com/".to_string(),
            token_override: Some("tok".to_string()),
            ..ConsoleConfig::default()
        };
        let client = ApiClient::from_config(&config).unwrap();
        assert_eq!(client.base_url(), "https://clinic.example.com");
    }
}
