// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Swipe interaction: drag displacement to decision and to visual feedback.
//!
//! The decision and the feedback are separate pure functions of the
//! horizontal displacement so each can be checked on its own.

/// Displacement beyond which a release accepts (or, negated, rejects) a card.
pub const SWIPE_THRESHOLD: f64 = 100.0;

/// Discrete outcome of a drag release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDecision {
    Accept,
    Reject,
}

/// Decide what a release at `displacement` means.
///
/// Strictly beyond ±[`SWIPE_THRESHOLD`] decides; anything within the band
/// (bounds included) springs back.
pub fn decide(displacement: f64) -> Option<SwipeDecision> {
    if displacement > SWIPE_THRESHOLD {
        Some(SwipeDecision::Accept)
    } else if displacement < -SWIPE_THRESHOLD {
        Some(SwipeDecision::Reject)
    } else {
        None
    }
}

/// Cosmetic state of the top card while it is being dragged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeFeedback {
    /// Card rotation in degrees
    pub rotation_deg: f64,
    /// Card opacity in `[0, 1]`
    pub opacity: f64,
    /// "LIKE" label opacity in `[0, 1]`
    pub like_opacity: f64,
    /// "NOPE" label opacity in `[0, 1]`
    pub nope_opacity: f64,
    /// Colour wash direction, if any
    pub tint: Option<SwipeDecision>,
}

impl SwipeFeedback {
    pub fn like_visible(&self) -> bool {
        self.like_opacity > 0.0
    }

    pub fn nope_visible(&self) -> bool {
        self.nope_opacity > 0.0
    }
}

/// Visual feedback for a displacement.
pub fn feedback(displacement: f64) -> SwipeFeedback {
    let tint = if displacement > 0.0 {
        Some(SwipeDecision::Accept)
    } else if displacement < 0.0 {
        Some(SwipeDecision::Reject)
    } else {
        None
    };

    SwipeFeedback {
        rotation_deg: interpolate(displacement, &[-200.0, 200.0], &[-25.0, 25.0]),
        opacity: interpolate(
            displacement,
            &[-200.0, -150.0, 0.0, 150.0, 200.0],
            &[0.0, 1.0, 1.0, 1.0, 0.0],
        ),
        like_opacity: interpolate(displacement, &[0.0, SWIPE_THRESHOLD], &[0.0, 1.0]),
        nope_opacity: interpolate(displacement, &[-SWIPE_THRESHOLD, 0.0], &[1.0, 0.0]),
        tint,
    }
}

/// Piecewise-linear map of `x` through `input` breakpoints onto `output`,
/// clamped at both ends. `input` must be ascending and the same length as
/// `output`.
fn interpolate(x: f64, input: &[f64], output: &[f64]) -> f64 {
    debug_assert_eq!(input.len(), output.len());
    debug_assert!(input.len() >= 2);

    if x.is_nan() {
        return output[0];
    }
    if x <= input[0] {
        return output[0];
    }
    let last = input.len() - 1;
    if x >= input[last] {
        return output[last];
    }

    let segment = input.windows(2).position(|w| x < w[1]).unwrap_or(last - 1);
    let (x0, x1) = (input[segment], input[segment + 1]);
    let (y0, y1) = (output[segment], output[segment + 1]);
    y0 + (x - x0) / (x1 - x0) * (y1 - y0)
}

/// Horizontal drag on the top card.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragGesture {
    active: bool,
    displacement: f64,
}

impl DragGesture {
    pub fn begin(&mut self) {
        self.active = true;
        self.displacement = 0.0;
    }

    /// Record the current displacement from the drag origin.
    pub fn update(&mut self, displacement: f64) {
        if self.active {
            self.displacement = displacement;
        }
    }

    /// End the drag. The card springs back to zero either way.
    pub fn release(&mut self) -> Option<SwipeDecision> {
        if !self.active {
            return None;
        }
        let decision = decide(self.displacement);
        *self = Self::default();
        decision
    }

    /// Abandon the drag without deciding.
    pub fn cancel(&mut self) {
        *self = Self::default();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn displacement(&self) -> f64 {
        self.displacement
    }

    pub fn feedback(&self) -> SwipeFeedback {
        feedback(self.displacement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decide_thresholds_are_strict() {
        assert_eq!(decide(150.0), Some(SwipeDecision::Accept));
        assert_eq!(decide(100.01), Some(SwipeDecision::Accept));
        assert_eq!(decide(100.0), None);
        assert_eq!(decide(0.0), None);
        assert_eq!(decide(-100.0), None);
        assert_eq!(decide(-100.01), Some(SwipeDecision::Reject));
        assert_eq!(decide(-150.0), Some(SwipeDecision::Reject));
    }

    #[test]
    fn test_decide_sweep() {
        for step in -400..=400 {
            let d = step as f64 * 0.5;
            let expected = if d > 100.0 {
                Some(SwipeDecision::Accept)
            } else if d < -100.0 {
                Some(SwipeDecision::Reject)
            } else {
                None
            };
            assert_eq!(decide(d), expected, "displacement {}", d);
        }
    }

    #[test]
    fn test_feedback_at_rest() {
        let fb = feedback(0.0);
        assert_eq!(fb.rotation_deg, 0.0);
        assert_eq!(fb.opacity, 1.0);
        assert!(!fb.like_visible());
        assert!(!fb.nope_visible());
        assert_eq!(fb.tint, None);
    }

    #[test]
    fn test_feedback_right_drag() {
        let fb = feedback(50.0);
        assert!((fb.rotation_deg - 6.25).abs() < 1e-9);
        assert!((fb.like_opacity - 0.5).abs() < 1e-9);
        assert_eq!(fb.nope_opacity, 0.0);
        assert_eq!(fb.tint, Some(SwipeDecision::Accept));

        let fb = feedback(175.0);
        assert!((fb.opacity - 0.5).abs() < 1e-9);
        assert_eq!(fb.like_opacity, 1.0);
    }

    #[test]
    fn test_feedback_clamps_far_left() {
        let fb = feedback(-1000.0);
        assert_eq!(fb.rotation_deg, -25.0);
        assert_eq!(fb.opacity, 0.0);
        assert_eq!(fb.nope_opacity, 1.0);
        assert_eq!(fb.like_opacity, 0.0);
        assert_eq!(fb.tint, Some(SwipeDecision::Reject));
    }

    #[test]
    fn test_drag_gesture_release_resets() {
        let mut drag = DragGesture::default();
        drag.update(300.0);
        assert_eq!(drag.release(), None, "inactive drag never decides");

        drag.begin();
        drag.update(40.0);
        drag.update(130.0);
        assert!(drag.is_active());
        assert_eq!(drag.release(), Some(SwipeDecision::Accept));
        assert!(!drag.is_active());
        assert_eq!(drag.displacement(), 0.0);

        drag.begin();
        drag.update(-90.0);
        assert_eq!(drag.release(), None);
    }
}
