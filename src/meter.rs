//! Trip timing and fare accumulation.
//!
//! An active trip is in exactly one of two phases, stopped or moving, and
//! each phase accrues fare at its own fixed per-second rate. Elapsed time is
//! committed ("folded") into the leaving phase's accumulator at every phase
//! change; between changes, [`Meter::observe`] projects the running phase's
//! elapsed time on top of the committed totals without touching them.
//!
//! The meter reads no clocks: every operation takes `now` from the caller.
//! Durations are measured on [`Instant`] so a system clock adjustment cannot
//! corrupt a fare; wall-clock time only annotates the finished record.

use std::time::Instant;

use jiff::civil::DateTime;

use crate::model::{Phase, TripRecord};

/// Fare rate while stopped, in euros per second.
pub const STOPPED_RATE: f64 = 0.02;

/// Fare rate while moving, in euros per second.
pub const MOVING_RATE: f64 = 0.05;

/// The fare for the given per-phase totals. Pure; no rounding.
pub fn fare(stopped_secs: f64, moving_secs: f64) -> f64 {
    stopped_secs * STOPPED_RATE + moving_secs * MOVING_RATE
}

/// Errors from meter operations.
///
/// Both are user-correctable and neither mutates any meter state.
#[derive(Debug, thiserror::Error)]
pub enum MeterError {
    #[error("a trip is already in progress")]
    AlreadyActive,

    #[error("no trip in progress")]
    NoActiveTrip,
}

/// One open trip: the running phase, when it began, and the committed totals.
#[derive(Debug)]
struct Trip {
    phase: Phase,
    phase_started_at: Instant,
    stopped_secs: f64,
    moving_secs: f64,
}

impl Trip {
    /// Commits elapsed-since-transition time into the running phase's
    /// accumulator and re-bases the phase start on `now`.
    fn fold(&mut self, now: Instant) {
        let elapsed = now.duration_since(self.phase_started_at).as_secs_f64();
        match self.phase {
            Phase::Stopped => self.stopped_secs += elapsed,
            Phase::Moving => self.moving_secs += elapsed,
        }
        self.phase_started_at = now;
    }
}

/// A live reading of the meter, fit for rendering.
///
/// The running phase's elapsed time is included transiently; nothing in a
/// reading has been committed back to the trip.
#[derive(Debug, Clone, Copy)]
pub struct Reading {
    /// The running phase, or `None` when no trip is active.
    pub phase: Option<Phase>,
    pub stopped_secs: f64,
    pub moving_secs: f64,
    pub fare: f64,
}

impl Reading {
    const IDLE: Self = Self {
        phase: None,
        stopped_secs: 0.0,
        moving_secs: 0.0,
        fare: 0.0,
    };
}

/// The fare meter: at most one trip open at a time.
#[derive(Debug, Default)]
pub struct Meter {
    trip: Option<Trip>,
}

impl Meter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a trip is currently open.
    pub fn is_active(&self) -> bool {
        self.trip.is_some()
    }

    /// Opens a trip in the stopped phase with zeroed accumulators.
    pub fn start(&mut self, now: Instant) -> Result<(), MeterError> {
        if self.trip.is_some() {
            return Err(MeterError::AlreadyActive);
        }
        self.trip = Some(Trip {
            phase: Phase::Stopped,
            phase_started_at: now,
            stopped_secs: 0.0,
            moving_secs: 0.0,
        });
        Ok(())
    }

    /// Switches the open trip to `target`, folding the elapsed time into the
    /// phase being left.
    ///
    /// Targeting the phase already running is legal: the fold happens and the
    /// phase start is re-based, leaving the accumulators exactly as a plain
    /// fold would.
    pub fn transition(&mut self, target: Phase, now: Instant) -> Result<(), MeterError> {
        let trip = self.trip.as_mut().ok_or(MeterError::NoActiveTrip)?;
        trip.fold(now);
        trip.phase = target;
        Ok(())
    }

    /// Closes the open trip: folds the running phase one last time, clears
    /// the meter, and returns the finished record.
    ///
    /// `finished_at` is the caller's wall-clock reading; it only annotates
    /// the record and plays no part in the tallies.
    pub fn finish(
        &mut self,
        now: Instant,
        finished_at: DateTime,
    ) -> Result<TripRecord, MeterError> {
        let mut trip = self.trip.take().ok_or(MeterError::NoActiveTrip)?;
        trip.fold(now);
        Ok(TripRecord {
            finished_at,
            stopped_secs: trip.stopped_secs,
            moving_secs: trip.moving_secs,
            total_fare: fare(trip.stopped_secs, trip.moving_secs),
        })
    }

    /// A read-only projection of the meter at `now`.
    ///
    /// Idle when no trip is open. Otherwise the running phase's elapsed time
    /// is added on top of the committed accumulators so callers see live
    /// totals; the trip itself is untouched.
    pub fn observe(&self, now: Instant) -> Reading {
        let Some(trip) = &self.trip else {
            return Reading::IDLE;
        };

        let elapsed = now.duration_since(trip.phase_started_at).as_secs_f64();
        let (stopped_secs, moving_secs) = match trip.phase {
            Phase::Stopped => (trip.stopped_secs + elapsed, trip.moving_secs),
            Phase::Moving => (trip.stopped_secs, trip.moving_secs + elapsed),
        };

        Reading {
            phase: Some(trip.phase),
            stopped_secs,
            moving_secs,
            fare: fare(stopped_secs, moving_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)] // Instants are injected at whole seconds; the arithmetic is exact.

    use std::time::Duration;

    use super::*;

    fn at(t0: Instant, secs: u64) -> Instant {
        t0 + Duration::from_secs(secs)
    }

    fn sample_datetime() -> DateTime {
        DateTime::constant(2026, 8, 25, 14, 30, 0, 0)
    }

    #[test]
    fn fare_is_the_two_rate_formula() {
        assert_eq!(fare(0.0, 0.0), 0.0);
        assert_eq!(fare(1.0, 0.0), STOPPED_RATE);
        assert_eq!(fare(0.0, 1.0), MOVING_RATE);
        assert_eq!(fare(20.0, 30.0), 20.0 * STOPPED_RATE + 30.0 * MOVING_RATE);
    }

    #[test]
    fn start_opens_a_stopped_trip() {
        let t0 = Instant::now();
        let mut meter = Meter::new();

        meter.start(t0).unwrap();

        assert!(meter.is_active());
        let reading = meter.observe(t0);
        assert_eq!(reading.phase, Some(Phase::Stopped));
        assert_eq!(reading.stopped_secs, 0.0);
        assert_eq!(reading.moving_secs, 0.0);
        assert_eq!(reading.fare, 0.0);
    }

    #[test]
    fn start_while_active_fails_and_changes_nothing() {
        let t0 = Instant::now();
        let mut meter = Meter::new();
        meter.start(t0).unwrap();
        meter.transition(Phase::Moving, at(t0, 10)).unwrap();

        let err = meter.start(at(t0, 15)).unwrap_err();

        assert!(matches!(err, MeterError::AlreadyActive));
        let reading = meter.observe(at(t0, 15));
        assert_eq!(reading.phase, Some(Phase::Moving));
        assert_eq!(reading.stopped_secs, 10.0);
        assert_eq!(reading.moving_secs, 5.0);
    }

    #[test]
    fn transition_folds_into_the_leaving_phase() {
        let t0 = Instant::now();
        let mut meter = Meter::new();
        meter.start(t0).unwrap();

        meter.transition(Phase::Moving, at(t0, 10)).unwrap();
        let reading = meter.observe(at(t0, 10));
        assert_eq!(reading.phase, Some(Phase::Moving));
        assert_eq!(reading.stopped_secs, 10.0);
        assert_eq!(reading.moving_secs, 0.0);

        meter.transition(Phase::Stopped, at(t0, 40)).unwrap();
        let reading = meter.observe(at(t0, 40));
        assert_eq!(reading.phase, Some(Phase::Stopped));
        assert_eq!(reading.stopped_secs, 10.0);
        assert_eq!(reading.moving_secs, 30.0);
    }

    #[test]
    fn transition_to_current_phase_is_a_plain_fold() {
        let t0 = Instant::now();
        let mut meter = Meter::new();
        meter.start(t0).unwrap();

        // Re-basing twice at the same instant is equivalent to once.
        meter.transition(Phase::Stopped, at(t0, 5)).unwrap();
        meter.transition(Phase::Stopped, at(t0, 5)).unwrap();

        let reading = meter.observe(at(t0, 5));
        assert_eq!(reading.phase, Some(Phase::Stopped));
        assert_eq!(reading.stopped_secs, 5.0);
        assert_eq!(reading.moving_secs, 0.0);
    }

    #[test]
    fn transition_without_trip_fails() {
        let mut meter = Meter::new();

        let err = meter.transition(Phase::Moving, Instant::now()).unwrap_err();

        assert!(matches!(err, MeterError::NoActiveTrip));
        assert!(!meter.is_active());
    }

    #[test]
    fn finish_without_trip_fails() {
        let mut meter = Meter::new();

        let err = meter.finish(Instant::now(), sample_datetime()).unwrap_err();

        assert!(matches!(err, MeterError::NoActiveTrip));
    }

    #[test]
    fn observe_commits_nothing() {
        let t0 = Instant::now();
        let mut meter = Meter::new();
        meter.start(t0).unwrap();

        // Repeated mid-phase observations see live, non-decreasing totals...
        assert_eq!(meter.observe(at(t0, 1)).stopped_secs, 1.0);
        assert_eq!(meter.observe(at(t0, 2)).stopped_secs, 2.0);
        assert_eq!(meter.observe(at(t0, 2)).stopped_secs, 2.0);

        // ...but the fold at the next transition measures from the phase
        // start, untouched by any of those observations.
        meter.transition(Phase::Moving, at(t0, 10)).unwrap();
        assert_eq!(meter.observe(at(t0, 10)).stopped_secs, 10.0);
    }

    #[test]
    fn observe_projects_only_the_running_phase() {
        let t0 = Instant::now();
        let mut meter = Meter::new();
        meter.start(t0).unwrap();
        meter.transition(Phase::Moving, at(t0, 10)).unwrap();

        let reading = meter.observe(at(t0, 17));
        assert_eq!(reading.stopped_secs, 10.0);
        assert_eq!(reading.moving_secs, 7.0);
        assert_eq!(reading.fare, fare(10.0, 7.0));
    }

    #[test]
    fn observe_idle_is_zeroed() {
        let meter = Meter::new();

        let reading = meter.observe(Instant::now());

        assert_eq!(reading.phase, None);
        assert_eq!(reading.stopped_secs, 0.0);
        assert_eq!(reading.moving_secs, 0.0);
        assert_eq!(reading.fare, 0.0);
    }

    #[test]
    fn full_trip_tallies_and_fare() {
        let t0 = Instant::now();
        let mut meter = Meter::new();

        meter.start(t0).unwrap();
        meter.transition(Phase::Moving, at(t0, 10)).unwrap();
        meter.transition(Phase::Stopped, at(t0, 40)).unwrap();
        let record = meter.finish(at(t0, 50), sample_datetime()).unwrap();

        assert_eq!(record.finished_at, sample_datetime());
        assert_eq!(record.stopped_secs, 20.0);
        assert_eq!(record.moving_secs, 30.0);
        assert_eq!(record.total_fare, fare(20.0, 30.0));
        assert_eq!(format!("{:.2}", record.total_fare), "1.90");
        assert!(!meter.is_active());
    }

    #[test]
    fn accumulated_time_equals_trip_duration() {
        let t0 = Instant::now();
        let mut meter = Meter::new();

        meter.start(t0).unwrap();
        meter.transition(Phase::Moving, at(t0, 3)).unwrap();
        meter.transition(Phase::Moving, at(t0, 11)).unwrap();
        meter.transition(Phase::Stopped, at(t0, 24)).unwrap();
        meter.transition(Phase::Moving, at(t0, 30)).unwrap();
        let record = meter.finish(at(t0, 47), sample_datetime()).unwrap();

        assert_eq!(record.stopped_secs + record.moving_secs, 47.0);
        assert_eq!(record.stopped_secs, 9.0);
        assert_eq!(record.moving_secs, 38.0);
    }

    #[test]
    fn zero_duration_trip_is_free() {
        let t0 = Instant::now();
        let mut meter = Meter::new();

        meter.start(t0).unwrap();
        let record = meter.finish(t0, sample_datetime()).unwrap();

        assert_eq!(record.stopped_secs, 0.0);
        assert_eq!(record.moving_secs, 0.0);
        assert_eq!(record.total_fare, 0.0);
        assert_eq!(format!("{:.2}", record.total_fare), "0.00");
    }
}
