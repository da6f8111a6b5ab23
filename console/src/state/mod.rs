//! Screen state owned by the console between operator actions

pub mod booking_screen;

pub use booking_screen::{BookingScreen, FormMode, FormState};
