//! Decaying-value countdown shared by item spoilage and container self-destruct.

/// A duration that decays towards zero as time is ticked into it.
///
/// The countdown never fires anything on its own. Owners poll [`Countdown::expired`]
/// and keep their own "fired" guard, since every tick after expiry keeps
/// reporting `true`.
#[derive(Debug, Clone, PartialEq)]
pub struct Countdown {
    total: f32,
    remaining: f32,
}

impl Countdown {
    pub fn new(total: f32) -> Self {
        let total = total.max(0.0);
        Self {
            total,
            remaining: total,
        }
    }

    /// Decrement by `dt` (clamped at zero) and return the remaining fraction.
    pub fn tick(&mut self, dt: f32) -> f32 {
        self.remaining = (self.remaining - dt.max(0.0)).max(0.0);
        self.fraction()
    }

    /// Remaining time as a fraction of the total, in `[0, 1]`.
    ///
    /// A zero-length countdown reports `0.0`.
    pub fn fraction(&self) -> f32 {
        if self.total <= 0.0 {
            return 0.0;
        }
        (self.remaining / self.total).clamp(0.0, 1.0)
    }

    pub fn expired(&self) -> bool {
        self.remaining <= 0.0
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn total(&self) -> f32 {
        self.total
    }

    /// Refill to the full duration.
    pub fn reset(&mut self) {
        self.remaining = self.total;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_reports_remaining_fraction() {
        let mut countdown = Countdown::new(4.0);
        assert_eq!(countdown.tick(1.0), 0.75);
        assert_eq!(countdown.tick(1.0), 0.5);
        assert!(!countdown.expired());
    }

    #[test]
    fn overshoot_clamps_at_zero() {
        let mut countdown = Countdown::new(1.0);
        assert_eq!(countdown.tick(5.0), 0.0);
        assert_eq!(countdown.remaining(), 0.0);
        assert!(countdown.expired());

        // Further ticks stay pinned at zero.
        assert_eq!(countdown.tick(1.0), 0.0);
        assert!(countdown.expired());
    }

    #[test]
    fn zero_length_countdown_is_already_expired() {
        let countdown = Countdown::new(0.0);
        assert!(countdown.expired());
        assert_eq!(countdown.fraction(), 0.0);
    }

    #[test]
    fn negative_dt_is_ignored() {
        let mut countdown = Countdown::new(2.0);
        countdown.tick(-1.0);
        assert_eq!(countdown.remaining(), 2.0);
    }

    #[test]
    fn reset_refills() {
        let mut countdown = Countdown::new(2.0);
        countdown.tick(2.0);
        countdown.reset();
        assert_eq!(countdown.fraction(), 1.0);
    }
}
