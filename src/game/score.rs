use super::difficulty::Difficulty;

/// Score and combo accounting for a session.
///
/// The combo multiplier is never stored; it is always computed from the
/// current streak.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Score {
    pub(super) total: u32,
    pub(super) streak: u32,
}

impl Score {
    pub(crate) fn total(&self) -> u32 {
        self.total
    }

    /// Number of consecutive meals since the last failure
    pub(crate) fn streak(&self) -> u32 {
        self.streak
    }

    pub(crate) fn multiplier(&self) -> f64 {
        f64::from(combo_multiplier_tenths(self.streak)) / 10.0
    }

    /// Extend the combo and award `base` points scaled by the combo and
    /// difficulty multipliers (rounded down).  Returns the points awarded.
    pub(crate) fn on_food_consumed(&mut self, base: u32, tier: Difficulty) -> u32 {
        self.streak = self.streak.saturating_add(1);
        let scaled = u64::from(base)
            * u64::from(combo_multiplier_tenths(self.streak))
            * u64::from(tier.score_multiplier_tenths())
            / 100;
        let delta = u32::try_from(scaled).unwrap_or(u32::MAX);
        self.total = self.total.saturating_add(delta);
        delta
    }

    /// Break the combo.  Points already earned are kept.
    pub(crate) fn on_failure(&mut self) {
        self.streak = 0;
    }
}

/// Combo multiplier for a streak, in tenths (10 = ×1.0).  The highest
/// threshold reached wins.
pub(crate) fn combo_multiplier_tenths(streak: u32) -> u32 {
    match streak {
        10.. => 30,
        7..=9 => 25,
        5..=6 => 20,
        3..=4 => 15,
        _ => 10,
    }
}
