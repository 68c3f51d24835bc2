// Last known pointer position and whether it has moved recently. Times are
// milliseconds on the host's clock.

use vecmath::Vector2;

/// How long after the last move the pointer stops influencing particles.
pub const POINTER_ACTIVE_MS: f64 = 100.0;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PointerState {
    pub pos: Vector2<f64>,
    active_until: Option<f64>,
}

impl PointerState {
    pub fn moved(&mut self, x: f64, y: f64, now: f64) {
        self.pos = [x, y];
        self.active_until = Some(now + POINTER_ACTIVE_MS);
    }

    /// Clear the active flag once its debounce window has passed.
    pub fn expire(&mut self, now: f64) {
        if matches!(self.active_until, Some(deadline) if now >= deadline) {
            self.active_until = None;
        }
    }

    pub fn is_active(&self) -> bool {
        self.active_until.is_some()
    }

    /// The position, but only while the pointer counts as active.
    pub fn active_position(&self) -> Option<Vector2<f64>> {
        if self.is_active() {
            Some(self.pos)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_inactive() {
        assert_eq!(PointerState::default().active_position(), None);
    }

    #[test]
    fn expires_after_debounce_window() {
        let mut pointer = PointerState::default();
        pointer.moved(100.0, 100.0, 1_000.0);
        pointer.expire(1_099.0);
        assert_eq!(pointer.active_position(), Some([100.0, 100.0]));
        pointer.expire(1_100.0);
        assert_eq!(pointer.active_position(), None);
    }

    #[test]
    fn each_move_extends_the_window() {
        let mut pointer = PointerState::default();
        pointer.moved(1.0, 1.0, 0.0);
        pointer.moved(2.0, 2.0, 80.0);
        pointer.expire(150.0);
        assert!(pointer.is_active());
        assert_eq!(pointer.pos, [2.0, 2.0]);
        pointer.expire(180.0);
        assert!(!pointer.is_active());
    }
}
