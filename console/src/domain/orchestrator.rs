//! # Booking Orchestrator
//!
//! Runs the create, update, delete and status-change flows against a
//! [`BookingStore`] and keeps the bookings view in step with the store.
//!
//! ## Responsibilities
//! - Validate the draft before anything goes out
//! - Send exactly one mutation request per operation
//! - Re-fetch the visible list once after every successful mutation
//! - Leave the list and the draft alone when anything fails
//!
//! Nothing is updated optimistically and nothing is retried.

use std::sync::Arc;

use log::{error, info, warn};
use shared::{Booking, BookingPayload, BookingStatus};

use crate::domain::cascade::SelectionCascade;
use crate::domain::query::{BookingQueryService, BookingScope};
use crate::domain::status;
use crate::error::{ConsoleError, Result};
use crate::store::BookingStore;

/// Asks the operator before a booking is deleted
pub trait DeleteConfirmation {
    fn confirm(&self, booking_number: &str) -> bool;
}

impl<F> DeleteConfirmation for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, booking_number: &str) -> bool {
        self(booking_number)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The operator said no; nothing was sent
    Declined,
}

pub struct BookingOrchestrator<S: BookingStore + ?Sized> {
    store: Arc<S>,
    query: BookingQueryService,
}

impl<S: BookingStore + ?Sized> BookingOrchestrator<S> {
    pub fn new(store: Arc<S>, scope: BookingScope) -> Self {
        Self {
            store,
            query: BookingQueryService::new(scope),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn query(&self) -> &BookingQueryService {
        &self.query
    }

    /// Filters live on the query service and never fetch
    pub fn query_mut(&mut self) -> &mut BookingQueryService {
        &mut self.query
    }

    /// Fetch the current scope
    pub async fn refresh(&mut self) -> Result<()> {
        self.query.refresh(self.store.as_ref()).await?;
        Ok(())
    }

    pub async fn set_show_all(&mut self, show_all: bool) -> Result<bool> {
        self.query.set_show_all(self.store.as_ref(), show_all).await
    }

    pub async fn set_month(&mut self, month: u32, year: i32) -> Result<bool> {
        self.query.set_month(self.store.as_ref(), month, year).await
    }

    pub async fn previous_month(&mut self) -> Result<bool> {
        let scope = self.query.scope().previous_month();
        self.query.set_scope(self.store.as_ref(), scope).await
    }

    pub async fn next_month(&mut self) -> Result<bool> {
        let scope = self.query.scope().next_month();
        self.query.set_scope(self.store.as_ref(), scope).await
    }

    /// Submit the cascade's draft as a new booking
    pub async fn create(&mut self, cascade: &SelectionCascade) -> Result<Booking> {
        let payload = cascade.build_payload()?;
        let created = self
            .store
            .create_booking(&payload)
            .await
            .map_err(|e| log_failure("create", &payload, e))?;

        info!(
            "✅ Created booking {} for {}",
            created.booking_number, created.customer.name
        );
        self.refetch_after("create").await;
        Ok(created)
    }

    /// Resubmit the cascade's draft over the booking `booking_id`
    pub async fn update(&mut self, booking_id: &str, cascade: &SelectionCascade) -> Result<Booking> {
        let payload = cascade.build_payload()?;
        let updated = self
            .store
            .update_booking(booking_id, &payload)
            .await
            .map_err(|e| log_failure("update", &payload, e))?;

        info!("✅ Updated booking {}", updated.booking_number);
        self.refetch_after("update").await;
        Ok(updated)
    }

    /// Delete after the operator confirms
    pub async fn delete(
        &mut self,
        booking_id: &str,
        confirmation: &dyn DeleteConfirmation,
    ) -> Result<DeleteOutcome> {
        let label = self
            .query
            .find(booking_id)
            .map(|b| b.booking_number.clone())
            .unwrap_or_else(|| booking_id.to_string());

        if !confirmation.confirm(&label) {
            info!("Delete of booking {} declined", label);
            return Ok(DeleteOutcome::Declined);
        }

        self.store.delete_booking(booking_id).await.map_err(|e| {
            warn!("Delete of booking {} failed: {}", label, e);
            e
        })?;

        info!("🗑️ Deleted booking {}", label);
        self.refetch_after("delete").await;
        Ok(DeleteOutcome::Deleted)
    }

    /// Move a booking from the fetched list to `new_status`
    pub async fn change_status(&mut self, booking_id: &str, new_status: BookingStatus) -> Result<Booking> {
        let booking = self
            .query
            .find(booking_id)
            .cloned()
            .ok_or_else(|| ConsoleError::NotFound {
                kind: "booking",
                id: booking_id.to_string(),
            })?;
        status::transition(self.store.as_ref(), &mut self.query, &booking, new_status).await
    }

    /// The mutation already succeeded, so a failing re-fetch only gets logged
    async fn refetch_after(&mut self, operation: &str) {
        if let Err(e) = self.query.refresh(self.store.as_ref()).await {
            warn!("Re-fetch after {} failed: {}", operation, e);
        }
    }
}

fn log_failure(operation: &str, payload: &BookingPayload, e: ConsoleError) -> ConsoleError {
    match &e {
        ConsoleError::ServerRejection { status, .. } if *status >= 500 => {
            error!("Booking {} for customer {} failed: {}", operation, payload.customer, e)
        }
        _ => warn!("Booking {} for customer {} failed: {}", operation, payload.customer, e),
    }
    e
}
