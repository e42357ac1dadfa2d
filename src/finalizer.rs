use std::time::Duration;

use tracing::debug;

use crate::services::reservations::ReservationsService;

/// Background task that periodically moves elapsed reservations to finalizada.
pub async fn run_finalizer(reservations: ReservationsService, period: Duration) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        if let Err(e) = reservations.finalize_elapsed().await {
            tracing::error!("Finalizer pass failed: {}", e);
        } else {
            debug!("Finalizer pass completed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clock::FixedClock, repository::MockBookingStore};
    use chrono::NaiveDate;
    use mockall::predicate::eq;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    #[tokio::test(start_paused = true)]
    async fn finalizer_runs_with_the_clock_time() {
        let now = NaiveDate::from_ymd_opt(2026, 6, 1)
            .unwrap()
            .and_hms_opt(23, 0, 0)
            .unwrap();
        let passes = Arc::new(AtomicUsize::new(0));
        let counter = passes.clone();
        let mut store = MockBookingStore::new();
        store
            .expect_finalize_elapsed()
            .with(eq(now))
            .returning(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(3)
            });

        let service = ReservationsService::new(Arc::new(store), Arc::new(FixedClock(now)));
        let task = tokio::spawn(run_finalizer(service, Duration::from_secs(60)));

        // Ticks at 0s and 60s
        tokio::time::sleep(Duration::from_secs(61)).await;
        task.abort();
        assert_eq!(passes.load(Ordering::SeqCst), 2);
    }
}
