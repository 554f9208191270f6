//! Core data model for Farebox.
//!
//! The vocabulary shared by the meter, the record store, and the terminal
//! shell: trip phases and finished-trip records.

use jiff::civil::DateTime;

/// Which fare rate is accruing on an active trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The cab is waiting: time accrues at the stopped rate.
    Stopped,

    /// The cab is driving: time accrues at the moving rate.
    Moving,
}

impl Phase {
    /// Lowercase label used in status lines.
    pub fn label(self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Moving => "moving",
        }
    }
}

/// An immutable summary of one finished trip, as persisted to the trip log.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    /// Local wall-clock time the trip finished.
    /// Annotation only; durations are measured on the monotonic clock.
    pub finished_at: DateTime,

    /// Seconds spent stopped, unrounded.
    pub stopped_secs: f64,

    /// Seconds spent moving, unrounded.
    pub moving_secs: f64,

    /// Total fare in euros, unrounded. Rounding happens at display time.
    pub total_fare: f64,
}

impl TripRecord {
    /// The printable ticket block shown when a trip finishes.
    pub fn ticket(&self) -> String {
        format!(
            "--- Trip Summary ---\n\
             Stopped time: {:.1} seconds\n\
             Moving time: {:.1} seconds\n\
             Total fare: €{:.2}\n\
             ---------------------",
            self.stopped_secs, self.moving_secs, self.total_fare
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_labels() {
        assert_eq!(Phase::Stopped.label(), "stopped");
        assert_eq!(Phase::Moving.label(), "moving");
    }

    #[test]
    fn ticket_rounds_for_display_only() {
        let record = TripRecord {
            finished_at: DateTime::constant(2026, 8, 25, 14, 30, 0, 0),
            stopped_secs: 20.0,
            moving_secs: 30.04,
            total_fare: 20.0 * 0.02 + 30.04 * 0.05,
        };

        let ticket = record.ticket();
        assert!(ticket.starts_with("--- Trip Summary ---"));
        assert!(ticket.contains("Stopped time: 20.0 seconds"));
        assert!(ticket.contains("Moving time: 30.0 seconds"));
        assert!(ticket.contains("Total fare: €1.90"));
    }
}
