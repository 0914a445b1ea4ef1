//! Progressive "drawing" of the selected destination's arc.

use crate::registry::DestinationId;

/// Reveal progress of one destination's arc.
///
/// Exists only while that destination is selected. Selecting another
/// destination replaces it with a fresh reveal starting at zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealState {
    destination: DestinationId,
    progress: f64,
}

impl RevealState {
    pub fn new(destination: DestinationId) -> Self {
        Self {
            destination,
            progress: 0.0,
        }
    }

    pub fn destination(&self) -> DestinationId {
        self.destination
    }

    /// Fraction of the arc revealed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }

    /// Advance by `speed`, saturating at 1.
    ///
    /// Returns `true` if progress changed.
    pub fn advance(&mut self, speed: f64) -> bool {
        if self.is_complete() || speed <= 0.0 {
            return false;
        }
        self.progress = (self.progress + speed).min(1.0);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reveal_starts_at_zero() {
        let reveal = RevealState::new(DestinationId(3));
        assert_eq!(reveal.destination(), DestinationId(3));
        assert!(reveal.progress().abs() < f64::EPSILON);
        assert!(!reveal.is_complete());
    }

    #[test]
    fn test_reveal_monotonic_and_saturating() {
        let mut reveal = RevealState::new(DestinationId(0));
        let mut previous = reveal.progress();
        let mut frames = 0;
        while reveal.advance(0.03) {
            assert!(reveal.progress() >= previous);
            assert!(reveal.progress() <= 1.0);
            previous = reveal.progress();
            frames += 1;
        }
        // ceil(1 / 0.03) frames to finish.
        assert_eq!(frames, 34);
        assert!(reveal.is_complete());
        assert!(!reveal.advance(0.03));
        assert!((reveal.progress() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reveal_full_speed() {
        let mut reveal = RevealState::new(DestinationId(0));
        assert!(reveal.advance(1.0));
        assert!(reveal.is_complete());
    }
}
