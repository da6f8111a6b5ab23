//! Booking status machine.
//!
//! Transitions are operator corrections rather than a strict workflow: every
//! status may currently be set from every other one, `completed` and
//! `cancelled` included. The table below is the only place that decides this.

use log::{info, warn};
use shared::{Booking, BookingStatus};

use crate::domain::query::BookingQueryService;
use crate::error::{ConsoleError, Result};
use crate::store::BookingStore;

/// Allowed moves, indexed `[from][to]` in `BookingStatus::ALL` order
const TRANSITIONS: [[bool; 4]; 4] = [
    // to: pending, confirmed, completed, cancelled
    [true, true, true, true], // from pending
    [true, true, true, true], // from confirmed
    [true, true, true, true], // from completed
    [true, true, true, true], // from cancelled
];

fn index(status: BookingStatus) -> usize {
    match status {
        BookingStatus::Pending => 0,
        BookingStatus::Confirmed => 1,
        BookingStatus::Completed => 2,
        BookingStatus::Cancelled => 3,
    }
}

pub fn can_transition(from: BookingStatus, to: BookingStatus) -> bool {
    TRANSITIONS[index(from)][index(to)]
}

/// Statuses the status control offers for a booking currently in `from`
pub fn allowed_targets(from: BookingStatus) -> Vec<BookingStatus> {
    BookingStatus::ALL
        .iter()
        .copied()
        .filter(|to| can_transition(from, *to))
        .collect()
}

/// Persist `new_status` for `booking`, then re-fetch the visible list once.
///
/// A failed persistence call leaves the fetched list untouched and issues no
/// re-fetch. Once the store has accepted the change, a failing re-fetch is
/// logged but does not turn the transition into an error.
pub async fn transition<S: BookingStore + ?Sized>(
    store: &S,
    query: &mut BookingQueryService,
    booking: &Booking,
    new_status: BookingStatus,
) -> Result<Booking> {
    if !can_transition(booking.status, new_status) {
        return Err(ConsoleError::InvalidTransition {
            from: booking.status,
            to: new_status,
        });
    }

    let updated = store
        .update_booking_status(&booking.id, new_status)
        .await
        .map_err(|e| {
            warn!(
                "Status change {} -> {} for {} failed: {}",
                booking.status, new_status, booking.booking_number, e
            );
            e
        })?;

    info!(
        "✅ Booking {} moved {} -> {}",
        booking.booking_number, booking.status, updated.status
    );

    if let Err(e) = query.refresh(store).await {
        warn!("Re-fetch after status change failed: {}", e);
    }
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::query::BookingScope;
    use crate::store::InjectedFailure;
    use crate::test_utils::*;

    #[test]
    fn test_every_pair_is_allowed() {
        for from in BookingStatus::ALL {
            for to in BookingStatus::ALL {
                assert!(can_transition(from, to), "{} -> {}", from, to);
            }
            assert_eq!(allowed_targets(from), BookingStatus::ALL.to_vec());
        }
    }

    #[tokio::test]
    async fn test_cancel_then_confirm_each_persist_and_refetch_once() {
        let store = seeded_store();
        let mut query = BookingQueryService::new(BookingScope::for_month(9, 2025).unwrap());
        query.refresh(&store).await.unwrap();

        let booking = query.find("b1").unwrap().clone();
        assert_eq!(booking.status, BookingStatus::Pending);

        let cancelled = transition(&store, &mut query, &booking, BookingStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        assert_eq!(store.calls().status, 1);
        assert_eq!(store.calls().list, 2);
        assert_eq!(query.find("b1").unwrap().status, BookingStatus::Cancelled);

        let confirmed = transition(&store, &mut query, &cancelled, BookingStatus::Confirmed)
            .await
            .unwrap();
        assert_eq!(confirmed.status, BookingStatus::Confirmed);
        assert_eq!(store.calls().status, 2);
        assert_eq!(store.calls().list, 3);
        assert_eq!(query.find("b1").unwrap().status, BookingStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_failed_persistence_leaves_status_unchanged() {
        let store = seeded_store();
        let mut query = BookingQueryService::new(BookingScope::for_month(9, 2025).unwrap());
        query.refresh(&store).await.unwrap();
        let booking = query.find("b2").unwrap().clone();

        store.fail_next(InjectedFailure::Rejection {
            status: 500,
            message: Some("database unavailable".to_string()),
            field_errors: vec![],
        });
        let result = transition(&store, &mut query, &booking, BookingStatus::Completed).await;

        assert!(matches!(result, Err(ConsoleError::ServerRejection { status: 500, .. })));
        assert_eq!(query.find("b2").unwrap().status, BookingStatus::Confirmed);
        assert_eq!(store.calls().list, 1);
    }
}
