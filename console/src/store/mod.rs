//! # Store Traits
//!
//! The booking store is the system of record; the console only ever holds a
//! transient copy of what it returned. These traits let the domain layer work
//! against the REST backend (`ApiClient`) or the in-memory store without
//! knowing which one it has.

pub mod memory;

use async_trait::async_trait;
use shared::{Booking, BookingPayload, BookingStatus, Branch, Customer, Vaccination};

use crate::domain::query::BookingScope;
use crate::error::Result;

pub use memory::{InMemoryBookingStore, InjectedFailure, StoreCalls};

/// Booking persistence operations
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Bookings whose appointment falls in the scope's month, or all of them
    /// when the scope shows everything
    async fn list_bookings(&self, scope: &BookingScope) -> Result<Vec<Booking>>;

    /// Persist a new booking. The store assigns id and booking number.
    async fn create_booking(&self, payload: &BookingPayload) -> Result<Booking>;

    /// Replace an existing booking with a resubmitted draft
    async fn update_booking(&self, booking_id: &str, payload: &BookingPayload) -> Result<Booking>;

    async fn delete_booking(&self, booking_id: &str) -> Result<()>;

    async fn update_booking_status(&self, booking_id: &str, status: BookingStatus) -> Result<Booking>;
}

/// Read-only access to the records a booking is composed from
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn list_customers(&self) -> Result<Vec<Customer>>;

    async fn list_vaccinations(&self) -> Result<Vec<Vaccination>>;

    async fn list_branches(&self) -> Result<Vec<Branch>>;
}
