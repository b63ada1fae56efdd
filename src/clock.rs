use crate::consts;
use std::time::{Duration, Instant};

/// Which periodic callback is due
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Tick {
    Movement,
    Countdown,
}

/// The movement and countdown timers that drive a session in play.
///
/// Armed on entering play and cancelled on leaving it, so that a deadline
/// computed for one stretch of play can never fire during another.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Schedule {
    movement: Option<Timer>,
    countdown: Option<Timer>,
}

impl Schedule {
    /// Start both timers, with their first deadlines one period after `now`.
    /// Any previously-armed deadlines are discarded.
    pub(crate) fn arm(&mut self, now: Instant, movement_period: Duration) {
        self.movement = Some(Timer::new(now, movement_period));
        self.countdown = Some(Timer::new(now, consts::COUNTDOWN_PERIOD));
    }

    pub(crate) fn cancel(&mut self) {
        self.movement = None;
        self.countdown = None;
    }

    pub(crate) fn is_armed(&self) -> bool {
        self.movement.is_some() || self.countdown.is_some()
    }

    /// The earliest pending deadline
    pub(crate) fn next_deadline(&self) -> Option<Instant> {
        self.movement
            .iter()
            .chain(self.countdown.iter())
            .map(|t| t.deadline)
            .min()
    }

    /// If a timer's deadline has passed, advance it to its first deadline
    /// after `now` and report which one fired.  A timer that fell several
    /// periods behind fires only once.  When both are due, the one with the
    /// earlier deadline fires first; movement wins ties.
    pub(crate) fn pop_due(&mut self, now: Instant) -> Option<Tick> {
        let movement = self.movement.filter(|t| t.deadline <= now);
        let countdown = self.countdown.filter(|t| t.deadline <= now);
        let tick = match (movement, countdown) {
            (Some(m), Some(c)) if c.deadline < m.deadline => Tick::Countdown,
            (Some(_), _) => Tick::Movement,
            (None, Some(_)) => Tick::Countdown,
            (None, None) => return None,
        };
        let timer = match tick {
            Tick::Movement => self.movement.as_mut(),
            Tick::Countdown => self.countdown.as_mut(),
        };
        if let Some(t) = timer {
            t.advance(now);
        }
        Some(tick)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Timer {
    period: Duration,
    deadline: Instant,
}

impl Timer {
    fn new(now: Instant, period: Duration) -> Timer {
        Timer {
            period,
            deadline: now + period,
        }
    }

    /// Advance from the previous deadline rather than from the current time
    /// so that late wakeups do not accumulate, skipping any periods that
    /// already ended by `now`
    fn advance(&mut self, now: Instant) {
        self.deadline += self.period;
        if self.deadline <= now {
            let missed = (now - self.deadline)
                .as_nanos()
                .checked_div(self.period.as_nanos())
                .unwrap_or(0);
            let skip = u32::try_from(missed.saturating_add(1)).unwrap_or(u32::MAX);
            self.deadline += self.period.saturating_mul(skip);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TICK: Duration = Duration::from_millis(150);

    #[test]
    fn unarmed() {
        let mut sched = Schedule::default();
        assert!(!sched.is_armed());
        assert_eq!(sched.next_deadline(), None);
        assert_eq!(sched.pop_due(Instant::now()), None);
    }

    #[test]
    fn fires_in_order() {
        let t0 = Instant::now();
        let mut sched = Schedule::default();
        sched.arm(t0, TICK);
        assert_eq!(sched.next_deadline(), Some(t0 + TICK));
        assert_eq!(sched.pop_due(t0), None);
        let mut fired = Vec::new();
        for ms in (50..=1050).step_by(50) {
            while let Some(tick) = sched.pop_due(t0 + Duration::from_millis(ms)) {
                fired.push(tick);
            }
        }
        // Movement at 150, 300, ..., 900; countdown at 1000; movement at 1050
        let mut expected = vec![Tick::Movement; 6];
        expected.extend([Tick::Countdown, Tick::Movement]);
        assert_eq!(fired, expected);
        assert_eq!(sched.next_deadline(), Some(t0 + Duration::from_millis(1200)));
    }

    #[test]
    fn late_wakeup_fires_each_timer_once() {
        let t0 = Instant::now();
        let mut sched = Schedule::default();
        sched.arm(t0, TICK);
        let now = t0 + Duration::from_millis(2500);
        let mut fired = Vec::new();
        while let Some(tick) = sched.pop_due(now) {
            fired.push(tick);
        }
        assert_eq!(fired, [Tick::Movement, Tick::Countdown]);
        // Both timers resume on their original grids
        assert_eq!(sched.next_deadline(), Some(t0 + Duration::from_millis(2550)));
        assert_eq!(
            sched.pop_due(t0 + Duration::from_millis(2550)),
            Some(Tick::Movement)
        );
        assert_eq!(sched.pop_due(t0 + Duration::from_millis(2699)), None);
        let now = t0 + Duration::from_millis(3000);
        let mut fired = Vec::new();
        while let Some(tick) = sched.pop_due(now) {
            fired.push(tick);
        }
        assert_eq!(fired, [Tick::Movement, Tick::Countdown]);
    }

    #[test]
    fn no_drift() {
        let t0 = Instant::now();
        let mut sched = Schedule::default();
        sched.arm(t0, TICK);
        // Wake up late; the next deadline still lands on the same grid
        assert_eq!(
            sched.pop_due(t0 + Duration::from_millis(170)),
            Some(Tick::Movement)
        );
        assert_eq!(sched.next_deadline(), Some(t0 + Duration::from_millis(300)));
    }

    #[test]
    fn cancel_discards_deadlines() {
        let t0 = Instant::now();
        let mut sched = Schedule::default();
        sched.arm(t0, TICK);
        sched.cancel();
        assert!(!sched.is_armed());
        assert_eq!(sched.pop_due(t0 + Duration::from_secs(5)), None);
    }

    #[test]
    fn rearm_restarts_periods() {
        let t0 = Instant::now();
        let mut sched = Schedule::default();
        sched.arm(t0, TICK);
        let t1 = t0 + Duration::from_millis(700);
        sched.arm(t1, Duration::from_millis(90));
        assert_eq!(sched.next_deadline(), Some(t1 + Duration::from_millis(90)));
        assert_eq!(sched.pop_due(t1 + Duration::from_millis(89)), None);
    }
}
