//! In-memory booking store.
//!
//! Behaves like the REST backend for the operations the console uses: scoped
//! listing, generated booking numbers, customer summaries populated from the
//! customer list. Records every call so callers can check how many requests
//! an operation issued, and can be told to fail the next request.

use async_trait::async_trait;
use chrono::Datelike;
use log::debug;
use shared::{
    Booking, BookingPayload, BookingStatus, Branch, Customer, CustomerSummary, FieldErrorBody,
    Vaccination,
};
use std::sync::{Mutex, MutexGuard};

use crate::domain::query::BookingScope;
use crate::error::{ConsoleError, Result};
use crate::store::{BookingStore, CatalogSource};

/// Number of requests of each kind the store has answered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCalls {
    pub list: usize,
    pub create: usize,
    pub update: usize,
    pub delete: usize,
    pub status: usize,
}

impl StoreCalls {
    pub fn mutations(&self) -> usize {
        self.create + self.update + self.delete + self.status
    }
}

/// Failure to answer the next request with
#[derive(Debug, Clone, PartialEq)]
pub enum InjectedFailure {
    Transport(String),
    Unauthorized,
    Rejection {
        status: u16,
        message: Option<String>,
        field_errors: Vec<FieldErrorBody>,
    },
}

impl From<InjectedFailure> for ConsoleError {
    fn from(failure: InjectedFailure) -> Self {
        match failure {
            InjectedFailure::Transport(message) => ConsoleError::RequestFailed(message),
            InjectedFailure::Unauthorized => ConsoleError::AuthFailure,
            InjectedFailure::Rejection {
                status,
                message,
                field_errors,
            } => ConsoleError::ServerRejection {
                status,
                message,
                field_errors,
            },
        }
    }
}

#[derive(Default)]
struct MemoryState {
    bookings: Vec<Booking>,
    customers: Vec<Customer>,
    vaccinations: Vec<Vaccination>,
    branches: Vec<Branch>,
    next_number: u32,
    calls: StoreCalls,
    scopes_requested: Vec<BookingScope>,
    pending_failure: Option<InjectedFailure>,
    pending_list_failure: Option<InjectedFailure>,
}

#[derive(Default)]
pub struct InMemoryBookingStore {
    state: Mutex<MemoryState>,
}

impl InMemoryBookingStore {
    pub fn new(customers: Vec<Customer>, vaccinations: Vec<Vaccination>, branches: Vec<Branch>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                customers,
                vaccinations,
                branches,
                next_number: 1,
                ..MemoryState::default()
            }),
        }
    }

    /// Seed bookings as if they had been created earlier
    pub fn with_bookings(self, bookings: Vec<Booking>) -> Self {
        {
            let mut state = self.lock();
            state.next_number += bookings.len() as u32;
            state.bookings.extend(bookings);
        }
        self
    }

    /// Answer the next request, whatever it is, with `failure`
    pub fn fail_next(&self, failure: InjectedFailure) {
        self.lock().pending_failure = Some(failure);
    }

    /// Answer the next `list_bookings` call with `failure`, letting other requests through
    pub fn fail_next_list(&self, failure: InjectedFailure) {
        self.lock().pending_list_failure = Some(failure);
    }

    pub fn calls(&self) -> StoreCalls {
        self.lock().calls
    }

    /// Scopes passed to `list_bookings`, oldest first
    pub fn scopes_requested(&self) -> Vec<BookingScope> {
        self.lock().scopes_requested.clone()
    }

    pub fn stored_bookings(&self) -> Vec<Booking> {
        self.lock().bookings.clone()
    }

    /// Edit a catalog entry in place, the way the catalog screens would
    pub fn update_vaccination(&self, vaccination: Vaccination) {
        let mut state = self.lock();
        if let Some(existing) = state.vaccinations.iter_mut().find(|v| v.id == vaccination.id) {
            *existing = vaccination;
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl MemoryState {
    fn take_failure(&mut self) -> Result<()> {
        match self.pending_failure.take() {
            Some(failure) => Err(failure.into()),
            None => Ok(()),
        }
    }

    fn materialize(&self, id: String, booking_number: String, payload: &BookingPayload) -> Result<Booking> {
        let customer = self
            .customers
            .iter()
            .find(|c| c.id == payload.customer)
            .map(CustomerSummary::from)
            .ok_or_else(|| rejection("customer", "not found"))?;
        if !self.branches.iter().any(|b| b.id == payload.branch) {
            return Err(rejection("branch", "not found"));
        }

        Ok(Booking {
            id,
            booking_number,
            customer,
            animal: payload.animal.clone(),
            vaccination: payload.vaccination.clone(),
            branch: payload.branch.clone(),
            appointment_date: payload.appointment_date,
            appointment_time: payload.appointment_time,
            price: payload.price,
            payment_method: payload.payment_method,
            notes: payload.notes.clone(),
            status: payload.status,
        })
    }

    fn position(&self, booking_id: &str) -> Result<usize> {
        self.bookings
            .iter()
            .position(|b| b.id == booking_id)
            .ok_or_else(|| ConsoleError::ServerRejection {
                status: 404,
                message: Some("Booking not found".to_string()),
                field_errors: vec![],
            })
    }
}

fn rejection(field: &str, message: &str) -> ConsoleError {
    ConsoleError::ServerRejection {
        status: 400,
        message: Some("Validation failed".to_string()),
        field_errors: vec![FieldErrorBody {
            field: field.to_string(),
            message: message.to_string(),
        }],
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn list_bookings(&self, scope: &BookingScope) -> Result<Vec<Booking>> {
        let mut state = self.lock();
        state.calls.list += 1;
        state.scopes_requested.push(*scope);
        if let Some(failure) = state.pending_list_failure.take() {
            return Err(failure.into());
        }
        state.take_failure()?;

        let bookings: Vec<Booking> = state
            .bookings
            .iter()
            .filter(|b| scope.contains(b.appointment_date))
            .cloned()
            .collect();
        debug!("In-memory store listing {} bookings for {}", bookings.len(), scope);
        Ok(bookings)
    }

    async fn create_booking(&self, payload: &BookingPayload) -> Result<Booking> {
        let mut state = self.lock();
        state.calls.create += 1;
        state.take_failure()?;

        let booking_number = format!(
            "BK-{}-{:04}",
            payload.appointment_date.year(),
            state.next_number
        );
        let booking = state.materialize(uuid::Uuid::new_v4().to_string(), booking_number, payload)?;
        state.next_number += 1;
        state.bookings.push(booking.clone());
        Ok(booking)
    }

    async fn update_booking(&self, booking_id: &str, payload: &BookingPayload) -> Result<Booking> {
        let mut state = self.lock();
        state.calls.update += 1;
        state.take_failure()?;

        let index = state.position(booking_id)?;
        let booking_number = state.bookings[index].booking_number.clone();
        let booking = state.materialize(booking_id.to_string(), booking_number, payload)?;
        state.bookings[index] = booking.clone();
        Ok(booking)
    }

    async fn delete_booking(&self, booking_id: &str) -> Result<()> {
        let mut state = self.lock();
        state.calls.delete += 1;
        state.take_failure()?;

        let index = state.position(booking_id)?;
        state.bookings.remove(index);
        Ok(())
    }

    async fn update_booking_status(&self, booking_id: &str, status: BookingStatus) -> Result<Booking> {
        let mut state = self.lock();
        state.calls.status += 1;
        state.take_failure()?;

        let index = state.position(booking_id)?;
        state.bookings[index].status = status;
        Ok(state.bookings[index].clone())
    }
}

#[async_trait]
impl CatalogSource for InMemoryBookingStore {
    async fn list_customers(&self) -> Result<Vec<Customer>> {
        let mut state = self.lock();
        state.take_failure()?;
        Ok(state.customers.clone())
    }

    async fn list_vaccinations(&self) -> Result<Vec<Vaccination>> {
        let mut state = self.lock();
        state.take_failure()?;
        Ok(state.vaccinations.clone())
    }

    async fn list_branches(&self) -> Result<Vec<Branch>> {
        let mut state = self.lock();
        state.take_failure()?;
        Ok(state.branches.clone())
    }
}
