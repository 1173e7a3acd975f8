//! Press debouncing and edge detection

/// Contact edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Press,
    Release,
}

/// Consecutive-observation press filter
///
/// Fed one pressed/released observation per poll. A press is reported once
/// `min_press` pressed observations arrive in a row. It is then latched:
/// further pressed observations report nothing until a released one clears
/// the latch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debouncer {
    min_press: u8,
    streak: u8,
    latched: bool,
}

impl Debouncer {
    /// Create a debouncer; `min_press` of 0 is treated as 1
    pub fn new(min_press: u8) -> Self {
        Self {
            min_press: min_press.max(1),
            streak: 0,
            latched: false,
        }
    }

    /// Feed one poll's observation
    pub fn update(&mut self, pressed: bool) -> Option<Edge> {
        if pressed {
            self.streak = self.streak.saturating_add(1);
            if !self.latched && self.streak >= self.min_press {
                self.latched = true;
                return Some(Edge::Press);
            }
            None
        } else {
            self.streak = 0;
            if self.latched {
                self.latched = false;
                Some(Edge::Release)
            } else {
                None
            }
        }
    }

    /// Whether a press has been reported and not yet released
    pub fn is_held(&self) -> bool {
        self.latched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_consecutive_observations() {
        let mut d = Debouncer::new(2);
        assert_eq!(d.update(true), None);
        assert_eq!(d.update(true), Some(Edge::Press));
        assert!(d.is_held());
    }

    #[test]
    fn test_bounce_resets_streak() {
        let mut d = Debouncer::new(2);
        assert_eq!(d.update(true), None);
        assert_eq!(d.update(false), None);
        assert_eq!(d.update(true), None);
        assert_eq!(d.update(true), Some(Edge::Press));
    }

    #[test]
    fn test_held_press_reported_once() {
        let mut d = Debouncer::new(2);
        d.update(true);
        d.update(true);
        for _ in 0..300 {
            assert_eq!(d.update(true), None);
        }
        assert_eq!(d.update(false), Some(Edge::Release));
        assert_eq!(d.update(false), None);
    }

    #[test]
    fn test_zero_threshold_is_one() {
        let mut d = Debouncer::new(0);
        assert_eq!(d.update(true), Some(Edge::Press));
    }
}
