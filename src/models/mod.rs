//! Data models for Courtbook

pub mod club;
pub mod enums;
pub mod reservation;
pub mod summary;
pub mod user;

// Re-export commonly used types
pub use club::{Club, Court, OperatingHours, TariffRule};
pub use enums::{CourtState, PaymentStatus, ReservationKind, ReservationStatus, TariffSource};
pub use reservation::{BookingRequest, NewReservation, Reservation, TimeWindow};
pub use summary::{DaySummary, Summary, SummaryTotals};
pub use user::{UserClaims, UserProfile};
