//! # Booking Screen State
//!
//! Everything the bookings screen holds between operator actions.
//!
//! ## Responsibilities:
//! - The bookings list view (scope, filters, fetched list) via the orchestrator
//! - The booking form: its selection cascade and whether it edits or creates
//! - Messages shown to the operator after an action
//!
//! ## Purpose:
//! A failed action only ever changes the messages. The draft and the list
//! stay exactly as the operator left them so the form can be corrected and
//! resubmitted.

use std::sync::Arc;

use log::info;
use shared::{Booking, BookingStatus};

use crate::domain::cascade::SelectionCascade;
use crate::domain::orchestrator::{BookingOrchestrator, DeleteConfirmation, DeleteOutcome};
use crate::domain::query::{BookingScope, StatusFilter};
use crate::error::{ConsoleError, Result};
use crate::store::{BookingStore, CatalogSource};

/// Which booking the form is working on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Closed,
    Creating,
    Editing(String),
}

/// Booking form messages
#[derive(Debug, Clone, Default)]
pub struct FormState {
    /// Lines from the last failed submit, shown above the form
    pub errors: Vec<String>,

    /// Whether a submit request is in flight
    pub is_saving: bool,
}

impl FormState {
    pub fn clear(&mut self) {
        self.errors.clear();
        self.is_saving = false;
    }
}

pub struct BookingScreen<S: BookingStore + CatalogSource + ?Sized> {
    orchestrator: BookingOrchestrator<S>,

    /// Form draft plus the customers, catalog and branches it picks from
    pub cascade: SelectionCascade,

    pub mode: FormMode,

    pub form: FormState,

    /// Confirmation of the last successful action
    pub success_message: Option<String>,

    /// Why the list could not be refreshed, if it could not
    pub list_error: Option<String>,

    /// Why the last list action was refused before any request went out
    pub action_error: Option<String>,
}

impl<S: BookingStore + CatalogSource + ?Sized> BookingScreen<S> {
    /// Load the form's pick lists and the bookings for `scope`
    pub async fn open(store: Arc<S>, scope: BookingScope) -> Result<Self> {
        let cascade = SelectionCascade::load(store.as_ref()).await?;
        let mut screen = Self {
            orchestrator: BookingOrchestrator::new(store, scope),
            cascade,
            mode: FormMode::Closed,
            form: FormState::default(),
            success_message: None,
            list_error: None,
            action_error: None,
        };
        screen.reload().await;
        Ok(screen)
    }

    pub fn orchestrator(&self) -> &BookingOrchestrator<S> {
        &self.orchestrator
    }

    pub fn scope(&self) -> &BookingScope {
        self.orchestrator.query().scope()
    }

    /// Bookings after status and search filters
    pub fn visible(&self) -> Vec<&Booking> {
        self.orchestrator.query().visible()
    }

    pub async fn reload(&mut self) {
        let result = self.orchestrator.refresh().await;
        self.record_list_result(result.map(|_| true));
    }

    fn record_list_result(&mut self, result: Result<bool>) {
        match result {
            Ok(_) => self.list_error = None,
            Err(e) if e.is_local() => self.action_error = Some(e.user_messages().join("; ")),
            Err(e) => {
                let prefix = if self.orchestrator.query().has_loaded() {
                    "Showing the last loaded bookings"
                } else {
                    "Bookings could not be loaded"
                };
                self.list_error = Some(format!("{}: {}", prefix, e.user_messages().join("; ")));
            }
        }
    }

    /// Local refusals leave the list as it is; store failures mark it stale
    fn record_action_error(&mut self, e: ConsoleError) {
        let message = e.user_messages().join("; ");
        if e.is_local() {
            self.action_error = Some(message);
        } else {
            self.list_error = Some(message);
        }
    }

    pub async fn previous_month(&mut self) {
        let result = self.orchestrator.previous_month().await;
        self.record_list_result(result);
    }

    pub async fn next_month(&mut self) {
        let result = self.orchestrator.next_month().await;
        self.record_list_result(result);
    }

    pub async fn toggle_show_all(&mut self) {
        let show_all = !self.scope().show_all();
        let result = self.orchestrator.set_show_all(show_all).await;
        self.record_list_result(result);
    }

    pub fn set_status_filter(&mut self, status: StatusFilter) {
        self.orchestrator.query_mut().set_status_filter(status);
    }

    pub fn set_search_term(&mut self, term: &str) {
        self.orchestrator.query_mut().set_search_term(term);
    }

    pub fn start_new_booking(&mut self) {
        self.cascade.reset();
        self.form.clear();
        self.mode = FormMode::Creating;
    }

    /// Open the form on a booking from the fetched list
    pub fn start_edit(&mut self, booking_id: &str) -> Result<()> {
        let booking = self
            .orchestrator
            .query()
            .find(booking_id)
            .ok_or_else(|| ConsoleError::NotFound {
                kind: "booking",
                id: booking_id.to_string(),
            })?;
        self.cascade.edit(booking)?;
        self.form.clear();
        self.mode = FormMode::Editing(booking_id.to_string());
        Ok(())
    }

    pub fn close_form(&mut self) {
        self.form.clear();
        self.mode = FormMode::Closed;
    }

    /// Create or update from the form. On failure the form stays open with
    /// its draft and shows why.
    pub async fn submit(&mut self) -> Option<Booking> {
        self.form.is_saving = true;
        self.success_message = None;

        let result = match &self.mode {
            FormMode::Closed => {
                self.form.is_saving = false;
                return None;
            }
            FormMode::Creating => self.orchestrator.create(&self.cascade).await,
            FormMode::Editing(id) => {
                let id = id.clone();
                self.orchestrator.update(&id, &self.cascade).await
            }
        };
        self.form.is_saving = false;

        match result {
            Ok(booking) => {
                let verb = if self.mode == FormMode::Creating { "created" } else { "updated" };
                self.success_message = Some(format!("Booking {} {}", booking.booking_number, verb));
                self.cascade.reset();
                self.close_form();
                Some(booking)
            }
            Err(e) => {
                info!("Booking form kept open: {}", e);
                self.form.errors = e.user_messages();
                None
            }
        }
    }

    pub async fn delete(&mut self, booking_id: &str, confirmation: &dyn DeleteConfirmation) {
        self.success_message = None;
        self.action_error = None;
        match self.orchestrator.delete(booking_id, confirmation).await {
            Ok(DeleteOutcome::Deleted) => {
                self.success_message = Some("Booking deleted".to_string());
                if self.mode == FormMode::Editing(booking_id.to_string()) {
                    self.close_form();
                }
            }
            Ok(DeleteOutcome::Declined) => {}
            Err(e) => self.record_action_error(e),
        }
    }

    pub async fn change_status(&mut self, booking_id: &str, status: BookingStatus) {
        self.success_message = None;
        self.action_error = None;
        match self.orchestrator.change_status(booking_id, status).await {
            Ok(booking) => {
                self.success_message = Some(format!(
                    "Booking {} is now {}",
                    booking.booking_number, booking.status
                ))
            }
            Err(e) => self.record_action_error(e),
        }
    }
}
