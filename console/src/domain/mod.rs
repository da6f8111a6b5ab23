//! # Domain Layer
//!
//! Booking rules that do not depend on how bookings are stored:
//!
//! - **eligibility**: which vaccinations fit a species
//! - **cascade**: the dependent-field booking form and its validation
//! - **query**: month scope, filters and the fetched booking list
//! - **status**: the status transition table
//! - **orchestrator**: create/update/delete/status flows with re-fetch

pub mod cascade;
pub mod eligibility;
pub mod orchestrator;
pub mod query;
pub mod status;

pub use cascade::{AnimalInput, AnimalSelection, BookingDraft, SelectionCascade};
pub use eligibility::{eligible_vaccinations, find_with_eligibility};
pub use orchestrator::{BookingOrchestrator, DeleteConfirmation, DeleteOutcome};
pub use query::{
    BookingFilter, BookingQueryService, BookingScope, FetchOutcome, FetchTicket, StatusFilter,
};
pub use status::{allowed_targets, can_transition};
