//! Time management — convert clock state and game phase into search limits.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use crate::search::control::SearchControl;

/// Discrete phase bucket, derived from the continuous phase by thresholds.
/// Used for time allocation only — evaluation always works with the
/// continuous value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseBucket {
    Opening,
    Middlegame,
    Endgame,
}

impl PhaseBucket {
    /// Bucket a continuous phase in [0, 1].
    pub fn from_phase(phase: f32) -> Self {
        if phase > 0.7 {
            PhaseBucket::Opening
        } else if phase > 0.3 {
            PhaseBucket::Middlegame
        } else {
            PhaseBucket::Endgame
        }
    }

    /// Clock divisor and absolute per-move ceiling for this bucket.
    fn budget_shape(self) -> (f64, f64) {
        match self {
            PhaseBucket::Opening => (50.0, 30_000.0),
            PhaseBucket::Middlegame => (30.0, 20_000.0),
            PhaseBucket::Endgame => (40.0, 10_000.0),
        }
    }
}

/// Reserve against protocol and scheduling latency.
const OVERHEAD_MS: f64 = 10.0;

/// Share of the increment folded into every budget.
const INCREMENT_SHARE: f64 = 0.8;

/// Below this clock reading the pressure tier takes over.
const PRESSURE_THRESHOLD_MS: f64 = 60_000.0;

/// Pressure tier: burn a tenth of what is left, never more than 5 seconds.
const PRESSURE_DIVISOR: f64 = 10.0;
const PRESSURE_CEILING_MS: f64 = 5_000.0;

/// Slack the hard limit grants over the soft budget, allowing the driver to
/// finish a depth it already started (25%).
const HARD_SLACK: f64 = 1.25;

/// Compute the soft and hard limits for one move.
///
/// The soft budget is `remaining / divisor + 0.8 · increment`, with divisor
/// and ceiling chosen by phase bucket (50/30/40, capped at 30 s / 20 s /
/// 10 s). Under a minute on the clock, a steeper tier applies: a tenth of
/// the remaining time with a 5-second ceiling. An explicit `movestogo`
/// overrides the divisor. Everything is capped by the remaining clock less
/// a fixed overhead; the hard limit is the soft budget plus 25% slack.
pub fn allocate(
    remaining: Duration,
    increment: Duration,
    movestogo: Option<u32>,
    bucket: PhaseBucket,
) -> (Duration, Duration) {
    let remaining_ms = remaining.as_millis() as f64;
    if remaining_ms < OVERHEAD_MS {
        let floor = Duration::from_millis(1);
        return (floor, floor);
    }

    let usable = remaining_ms - OVERHEAD_MS;
    let (mut divisor, mut ceiling) = bucket.budget_shape();
    if remaining_ms < PRESSURE_THRESHOLD_MS {
        divisor = PRESSURE_DIVISOR;
        ceiling = PRESSURE_CEILING_MS;
    }
    if let Some(mtg) = movestogo {
        divisor = f64::from(mtg.max(1));
    }

    let soft = (usable / divisor + increment.as_millis() as f64 * INCREMENT_SHARE)
        .min(ceiling)
        .min(usable)
        .max(1.0);
    let hard = (soft * HARD_SLACK).min(usable).max(1.0);

    (
        Duration::from_millis(soft as u64),
        Duration::from_millis(hard as u64),
    )
}

/// Build a [`SearchControl`] from UCI `go` parameters.
///
/// Priority: `infinite` wins; then an explicit `movetime` (soft = hard);
/// then a remaining-clock budget via [`allocate`]; a bare or depth-only
/// `go` searches without time limits.
#[allow(clippy::too_many_arguments)]
pub fn limits_from_go(
    remaining: Option<Duration>,
    increment: Option<Duration>,
    movestogo: Option<u32>,
    movetime: Option<Duration>,
    infinite: bool,
    bucket: PhaseBucket,
    stopped: Arc<AtomicBool>,
) -> SearchControl {
    if infinite {
        return SearchControl::new_infinite(stopped);
    }
    if let Some(mt) = movetime {
        return SearchControl::new_timed(stopped, mt, mt);
    }
    if let Some(rem) = remaining {
        let inc = increment.unwrap_or(Duration::ZERO);
        let (soft, hard) = allocate(rem, inc, movestogo, bucket);
        return SearchControl::new_timed(stopped, soft, hard);
    }
    SearchControl::new_infinite(stopped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_divides_by_fifty() {
        let (soft, hard) = allocate(
            Duration::from_secs(300),
            Duration::ZERO,
            None,
            PhaseBucket::Opening,
        );
        // (300000 - 10) / 50 ≈ 6000 ms.
        assert!(soft.as_millis() >= 5_900 && soft.as_millis() <= 6_100, "soft={soft:?}");
        assert!(hard > soft);
        assert!(hard.as_millis() <= soft.as_millis() * 13 / 10);
    }

    #[test]
    fn middlegame_spends_more_than_opening() {
        let clock = Duration::from_secs(300);
        let (opening, _) = allocate(clock, Duration::ZERO, None, PhaseBucket::Opening);
        let (middlegame, _) = allocate(clock, Duration::ZERO, None, PhaseBucket::Middlegame);
        let (endgame, _) = allocate(clock, Duration::ZERO, None, PhaseBucket::Endgame);
        assert!(middlegame > opening);
        assert!(middlegame > endgame);
        assert!(endgame > opening);
    }

    #[test]
    fn increment_adds_its_share() {
        let without = allocate(
            Duration::from_secs(300),
            Duration::ZERO,
            None,
            PhaseBucket::Middlegame,
        )
        .0;
        let with = allocate(
            Duration::from_secs(300),
            Duration::from_secs(2),
            None,
            PhaseBucket::Middlegame,
        )
        .0;
        let delta = with.as_millis() as i64 - without.as_millis() as i64;
        assert!((delta - 1_600).abs() <= 2, "increment share off: {delta} ms");
    }

    #[test]
    fn ceilings_cap_long_clocks() {
        let clock = Duration::from_secs(3 * 60 * 60);
        let (opening, _) = allocate(clock, Duration::ZERO, None, PhaseBucket::Opening);
        let (middlegame, _) = allocate(clock, Duration::ZERO, None, PhaseBucket::Middlegame);
        let (endgame, _) = allocate(clock, Duration::ZERO, None, PhaseBucket::Endgame);
        assert_eq!(opening, Duration::from_secs(30));
        assert_eq!(middlegame, Duration::from_secs(20));
        assert_eq!(endgame, Duration::from_secs(10));
    }

    #[test]
    fn pressure_tier_under_a_minute() {
        let (soft, _) = allocate(
            Duration::from_secs(50),
            Duration::ZERO,
            None,
            PhaseBucket::Middlegame,
        );
        // (50000 - 10) / 10 ≈ 5000, capped at 5000.
        assert!(soft.as_millis() <= 5_000);
        assert!(soft.as_millis() >= 4_900);
    }

    #[test]
    fn one_second_clock_stays_safe() {
        let (soft, hard) = allocate(
            Duration::from_secs(1),
            Duration::ZERO,
            None,
            PhaseBucket::Opening,
        );
        // A tenth of the remaining second.
        assert!(soft.as_millis() <= 100, "soft={soft:?}");
        assert!(hard.as_millis() <= 130, "hard={hard:?}");
    }

    #[test]
    fn nearly_flagged_clock_gets_the_floor() {
        let (soft, hard) = allocate(
            Duration::from_millis(5),
            Duration::ZERO,
            None,
            PhaseBucket::Endgame,
        );
        assert_eq!(soft, Duration::from_millis(1));
        assert_eq!(hard, Duration::from_millis(1));
    }

    #[test]
    fn movestogo_overrides_divisor() {
        let (soft, _) = allocate(
            Duration::from_secs(300),
            Duration::ZERO,
            Some(10),
            PhaseBucket::Opening,
        );
        // (300000 - 10) / 10 ≈ 30000, at the opening ceiling.
        assert!(soft.as_millis() >= 29_000);
    }

    #[test]
    fn budget_never_exceeds_remaining() {
        for ms in [15u64, 80, 300, 2_000, 45_000, 600_000] {
            for bucket in [PhaseBucket::Opening, PhaseBucket::Middlegame, PhaseBucket::Endgame] {
                let clock = Duration::from_millis(ms);
                let (soft, hard) = allocate(clock, Duration::from_secs(5), None, bucket);
                assert!(soft <= clock, "soft {soft:?} over clock {clock:?}");
                assert!(hard <= clock, "hard {hard:?} over clock {clock:?}");
                assert!(hard >= soft);
            }
        }
    }

    #[test]
    fn movetime_sets_equal_soft_and_hard() {
        let control = limits_from_go(
            None,
            None,
            None,
            Some(Duration::from_millis(200)),
            false,
            PhaseBucket::Opening,
            Arc::new(AtomicBool::new(false)),
        );
        assert!(!control.should_stop_iterating());
    }

    #[test]
    fn bare_go_is_infinite() {
        let control = limits_from_go(
            None,
            None,
            None,
            None,
            false,
            PhaseBucket::Opening,
            Arc::new(AtomicBool::new(false)),
        );
        assert!(!control.should_stop(2048));
        assert!(!control.should_stop_iterating());
    }

    #[test]
    fn bucket_thresholds() {
        assert_eq!(PhaseBucket::from_phase(1.0), PhaseBucket::Opening);
        assert_eq!(PhaseBucket::from_phase(0.8), PhaseBucket::Opening);
        assert_eq!(PhaseBucket::from_phase(0.5), PhaseBucket::Middlegame);
        assert_eq!(PhaseBucket::from_phase(0.3), PhaseBucket::Endgame);
        assert_eq!(PhaseBucket::from_phase(0.0), PhaseBucket::Endgame);
    }
}
