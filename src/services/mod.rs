//! Business logic services

pub mod conflict;
pub mod hours;
pub mod lifecycle;
pub mod reservations;
pub mod summary;
pub mod tariff;

use std::sync::Arc;

use crate::{clock::Clock, config::BookingConfig, repository::{BookingStore, Repository}};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub reservations: reservations::ReservationsService,
    pub summary: summary::SummaryService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, clock: Arc<dyn Clock>, booking: &BookingConfig) -> Self {
        let store: Arc<dyn BookingStore> = Arc::new(repository);
        Self {
            reservations: reservations::ReservationsService::new(store.clone(), clock),
            summary: summary::SummaryService::new(store, booking.max_summary_days),
        }
    }
}
