//! Booking lifecycle and scheduling core of the veterinary clinic console.
//!
//! The console talks to the clinic's booking store over REST. This crate holds
//! what happens in between: composing a valid booking, scoping and filtering
//! the bookings list, and driving create/update/delete/status changes so the
//! list always reflects the store.

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod services;
pub mod state;
pub mod store;

#[cfg(test)]
mod test_utils;

pub use config::ConsoleConfig;
pub use error::{ConsoleError, DraftField, FieldIssue, Result};
pub use services::{ApiClient, CredentialProvider, SessionFile, StaticCredentials};
pub use store::{BookingStore, CatalogSource, InMemoryBookingStore};
