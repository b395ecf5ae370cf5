//! # Animation Module
//!
//! Time-driven tweens for the portrait, the input box, the busy spinner and
//! the output reveal.
//!
//! Every animation is a pure function of a start [`Instant`](std::time::Instant)
//! and the instant it is sampled at, so the render loop simply asks for the
//! current [`Appearance`] of each element on every frame. Nothing here owns a
//! timer or a task.
//!
//! ## Elements
//!
//! | Element | Variant | Duration | Easing |
//! |---|---|---|---|
//! | support / centre strokes | `VisibleFaster` | 0.7s | ease-out |
//! | face outline, neck | `VisibleFast` | 1.7s | ease-in-out |
//! | mouth, chin, nose | `Fast` | 0.5s | ease-in-out |
//! | input box | `Risen` | 1.7s | ease-in-out |
//! | spinner | looping | 1s | linear |
//! | output | replayed per answer | 0.5s | ease-in-out |

mod sequencer;
mod spinner;
mod tween;

pub use sequencer::{
    AnimationSequencer, AnimationState, Appearance, Element, ElementAnimation, OutputReveal,
    Variant,
};
pub use spinner::Spinner;
pub use tween::{Easing, Tween};
