//! Booking query and filter service.
//!
//! Decides which bookings the bookings screen shows. The *scope* (one calendar
//! month, or everything) is sent to the store and changing it always costs
//! exactly one fetch. Status and free-text filters narrow the fetched list
//! locally and never fetch.
//!
//! Every fetch is tagged with a sequence number. A response is applied only
//! if it belongs to the most recently issued fetch, so a slow answer for an
//! old scope can never overwrite the list for the current one.

use chrono::{Datelike, Local, Month, NaiveDate};
use log::{debug, warn};
use shared::{Booking, BookingStatus};
use std::fmt;

use crate::error::{ConsoleError, Result};
use crate::store::BookingStore;

/// Which bookings a fetch asks the store for. Months are zero-based, as the
/// REST API expects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingScope {
    show_all: bool,
    month: u32,
    year: i32,
}

impl BookingScope {
    /// Scope limited to one calendar month (`month` is 0 for January)
    pub fn for_month(month: u32, year: i32) -> Result<Self> {
        if month > 11 {
            return Err(ConsoleError::InvalidMonth { month });
        }
        Ok(Self {
            show_all: false,
            month,
            year,
        })
    }

    /// The current calendar month
    pub fn current() -> Self {
        let today = Local::now().date_naive();
        Self {
            show_all: false,
            month: today.month0(),
            year: today.year(),
        }
    }

    /// Same selected month, with the "all bookings" switch set to `show_all`
    pub fn with_show_all(self, show_all: bool) -> Self {
        Self { show_all, ..self }
    }

    pub fn show_all(&self) -> bool {
        self.show_all
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// `(month, year)` query parameters, or `None` when every booking is wanted
    pub fn date_params(&self) -> Option<(u32, i32)> {
        if self.show_all {
            None
        } else {
            Some((self.month, self.year))
        }
    }

    /// Whether a booking on `date` belongs to this scope
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.show_all || (date.month0() == self.month && date.year() == self.year)
    }

    pub fn previous_month(self) -> Self {
        if self.month == 0 {
            Self {
                month: 11,
                year: self.year - 1,
                ..self
            }
        } else {
            Self {
                month: self.month - 1,
                ..self
            }
        }
    }

    pub fn next_month(self) -> Self {
        if self.month == 11 {
            Self {
                month: 0,
                year: self.year + 1,
                ..self
            }
        } else {
            Self {
                month: self.month + 1,
                ..self
            }
        }
    }
}

impl fmt::Display for BookingScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.show_all {
            return f.write_str("all bookings");
        }
        match Month::try_from((self.month + 1) as u8) {
            Ok(month) => write!(f, "{} {}", month.name(), self.year),
            Err(_) => write!(f, "month {} of {}", self.month, self.year),
        }
    }
}

/// Status narrowing applied after a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(BookingStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: BookingStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }

    /// Parse the status dropdown value: "all" or a status name
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_lowercase();
        if value == "all" {
            return Some(StatusFilter::All);
        }
        BookingStatus::ALL
            .iter()
            .find(|status| status.as_str() == value)
            .map(|status| StatusFilter::Only(*status))
    }
}

/// Local narrowing of a fetched booking list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingFilter {
    pub status: StatusFilter,
    pub search_term: String,
}

impl BookingFilter {
    /// Status must match, and the search term (case-insensitive) must occur
    /// in the customer name, customer phone, animal name or booking number.
    pub fn matches(&self, booking: &Booking) -> bool {
        self.status.matches(booking.status) && self.matches_search(booking)
    }

    fn matches_search(&self, booking: &Booking) -> bool {
        let term = self.search_term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        [
            &booking.customer.name,
            &booking.customer.phone,
            &booking.animal.name,
            &booking.booking_number,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&term))
    }

    pub fn apply<'a>(&self, bookings: &'a [Booking]) -> Vec<&'a Booking> {
        bookings.iter().filter(|b| self.matches(b)).collect()
    }
}

/// Handle for one issued fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    sequence: u64,
    scope: BookingScope,
}

impl FetchTicket {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn scope(&self) -> &BookingScope {
        &self.scope
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response replaced the fetched list; holds the new list length
    Applied(usize),
    /// A newer fetch was issued meanwhile; the response was dropped
    Stale,
}

/// Owns the scope, the filters and the fetched list of one bookings view
#[derive(Debug)]
pub struct BookingQueryService {
    scope: BookingScope,
    filter: BookingFilter,
    bookings: Vec<Booking>,
    issued: u64,
    applied: Option<u64>,
}

impl BookingQueryService {
    pub fn new(scope: BookingScope) -> Self {
        Self {
            scope,
            filter: BookingFilter::default(),
            bookings: Vec::new(),
            issued: 0,
            applied: None,
        }
    }

    pub fn scope(&self) -> &BookingScope {
        &self.scope
    }

    pub fn filter(&self) -> &BookingFilter {
        &self.filter
    }

    /// Everything the last applied fetch returned
    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn find(&self, booking_id: &str) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.id == booking_id)
    }

    /// Whether any fetch result has been applied yet
    pub fn has_loaded(&self) -> bool {
        self.applied.is_some()
    }

    /// The fetched list narrowed by the current filters
    pub fn visible(&self) -> Vec<&Booking> {
        self.filter.apply(&self.bookings)
    }

    pub fn set_status_filter(&mut self, status: StatusFilter) {
        self.filter.status = status;
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.filter.search_term = term.into();
    }

    /// Issue a fetch for the current scope. Any earlier ticket becomes stale.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        debug!("Issuing booking fetch #{} for {}", self.issued, self.scope);
        FetchTicket {
            sequence: self.issued,
            scope: self.scope,
        }
    }

    /// Apply the result of a fetch. Results of superseded fetches, successful
    /// or not, are discarded. A failed current fetch keeps the previous list.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: Result<Vec<Booking>>) -> Result<FetchOutcome> {
        if ticket.sequence != self.issued {
            debug!(
                "Discarding stale booking fetch #{} (latest is #{})",
                ticket.sequence, self.issued
            );
            return Ok(FetchOutcome::Stale);
        }

        match result {
            Ok(bookings) => {
                let count = bookings.len();
                self.bookings = bookings;
                self.applied = Some(ticket.sequence);
                Ok(FetchOutcome::Applied(count))
            }
            Err(e) => {
                warn!("Booking fetch #{} failed: {}", ticket.sequence, e);
                Err(e)
            }
        }
    }

    /// Fetch the current scope from `store` and apply the result
    pub async fn refresh<S: BookingStore + ?Sized>(&mut self, store: &S) -> Result<FetchOutcome> {
        let ticket = self.begin_fetch();
        let result = store.list_bookings(ticket.scope()).await;
        self.complete_fetch(ticket, result)
    }

    /// Change the scope. Returns whether a fetch was issued: a changed scope
    /// always fetches once, an unchanged one never does.
    pub async fn set_scope<S: BookingStore + ?Sized>(&mut self, store: &S, scope: BookingScope) -> Result<bool> {
        if scope == self.scope {
            return Ok(false);
        }
        self.scope = scope;
        self.refresh(store).await?;
        Ok(true)
    }

    pub async fn set_show_all<S: BookingStore + ?Sized>(&mut self, store: &S, show_all: bool) -> Result<bool> {
        let scope = self.scope.with_show_all(show_all);
        self.set_scope(store, scope).await
    }

    /// Select a month (zero-based) and year
    pub async fn set_month<S: BookingStore + ?Sized>(&mut self, store: &S, month: u32, year: i32) -> Result<bool> {
        let scope = BookingScope::for_month(month, year)?.with_show_all(self.scope.show_all);
        self.set_scope(store, scope).await
    }
}
