//! Pointer press tracking: tells drags from clicks.

use log::trace;
use tree_model::Point;

#[derive(Clone, Copy, Debug)]
struct Press {
    origin: Point,
    last: Point,
    dragging: bool,
}

/// Follows one pointer from press to release.
///
/// A press becomes a drag once the pointer travels further than the
/// threshold from where it went down. The click the host delivers after a
/// drag's release is swallowed.
#[derive(Clone, Debug)]
pub struct PointerTracker {
    threshold: f32,
    press: Option<Press>,
    suppress_click: bool,
}

impl PointerTracker {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            press: None,
            suppress_click: false,
        }
    }

    pub fn press(&mut self, at: Point) {
        self.press = Some(Press {
            origin: at,
            last: at,
            dragging: false,
        });
        self.suppress_click = false;
    }

    /// Pointer moved; returns the pan delta once the press is a drag.
    pub fn moved(&mut self, to: Point) -> Option<Point> {
        let press = self.press.as_mut()?;
        if !press.dragging && press.origin.distance(to) > self.threshold {
            trace!("Press at {} became a drag", press.origin);
            press.dragging = true;
        }
        if !press.dragging {
            return None;
        }
        let delta = to - press.last;
        press.last = to;
        Some(delta)
    }

    /// Pointer released; returns the final pan delta if it was a drag.
    pub fn release(&mut self, at: Point) -> Option<Point> {
        let delta = self.moved(at);
        let press = self.press.take()?;
        self.suppress_click = press.dragging;
        delta
    }

    /// True if the press in progress has turned into a drag.
    pub fn is_dragging(&self) -> bool {
        self.press.map_or(false, |press| press.dragging)
    }

    /// Consume the pending click suppression, if any.
    pub fn take_click_suppression(&mut self) -> bool {
        std::mem::take(&mut self.suppress_click)
    }

    pub fn reset(&mut self) {
        self.press = None;
        self.suppress_click = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_movement_stays_a_click() {
        let mut tracker = PointerTracker::new(2.0);
        tracker.press(Point::new(10.0, 10.0));
        assert_eq!(tracker.moved(Point::new(11.0, 11.0)), None);
        assert_eq!(tracker.release(Point::new(11.0, 11.0)), None);
        assert!(!tracker.take_click_suppression());
    }

    #[test]
    fn test_drag_reports_deltas_and_suppresses_click() {
        let mut tracker = PointerTracker::new(2.0);
        tracker.press(Point::new(0.0, 0.0));

        assert_eq!(tracker.moved(Point::new(5.0, 0.0)), Some(Point::new(5.0, 0.0)));
        assert!(tracker.is_dragging());
        assert_eq!(tracker.moved(Point::new(5.0, 3.0)), Some(Point::new(0.0, 3.0)));
        assert_eq!(tracker.release(Point::new(5.0, 3.0)), Some(Point::ZERO));

        assert!(tracker.take_click_suppression());
        assert!(!tracker.take_click_suppression());
    }

    #[test]
    fn test_new_press_clears_suppression() {
        let mut tracker = PointerTracker::new(2.0);
        tracker.press(Point::ZERO);
        tracker.moved(Point::new(10.0, 0.0));
        tracker.release(Point::new(10.0, 0.0));

        tracker.press(Point::ZERO);
        tracker.release(Point::ZERO);
        assert!(!tracker.take_click_suppression());
    }

    #[test]
    fn test_move_without_press_is_ignored() {
        let mut tracker = PointerTracker::new(2.0);
        assert_eq!(tracker.moved(Point::new(50.0, 50.0)), None);
        assert_eq!(tracker.release(Point::new(50.0, 50.0)), None);
    }
}
