use std::time::{Duration, Instant};

use super::spinner::Spinner;
use super::tween::{Easing, Tween};

/// Decorative elements animated on mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    SupportStroke,
    CenterStroke,
    FaceOutline,
    NeckLeft,
    NeckRight,
    Mouth,
    Chin,
    Nose,
    InputBox,
}

impl Element {
    pub const ALL: [Element; 9] = [
        Element::SupportStroke,
        Element::CenterStroke,
        Element::FaceOutline,
        Element::NeckLeft,
        Element::NeckRight,
        Element::Mouth,
        Element::Chin,
        Element::Nose,
        Element::InputBox,
    ];

    /// The visible state each element animates into.
    pub fn target(self) -> Variant {
        match self {
            Element::SupportStroke | Element::CenterStroke => Variant::VisibleFaster,
            Element::FaceOutline | Element::NeckLeft | Element::NeckRight => Variant::VisibleFast,
            Element::Mouth | Element::Chin | Element::Nose => Variant::Fast,
            Element::InputBox => Variant::Risen,
        }
    }
}

/// Terminal visible states. Each carries its own transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Stroke drawn in 0.5s, ease-in-out.
    Fast,
    /// Stroke drawn in 1.7s, ease-in-out.
    VisibleFast,
    /// Stroke drawn in 0.7s, ease-out.
    VisibleFaster,
    /// Fades in while rising 100 units, 1.7s ease-in-out.
    Risen,
}

impl Variant {
    pub fn transition(self) -> Tween {
        match self {
            Variant::Fast => Tween::new(0.0, 1.0, Duration::from_millis(500), Easing::EaseInOut),
            Variant::VisibleFast => {
                Tween::new(0.0, 1.0, Duration::from_millis(1700), Easing::EaseInOut)
            }
            Variant::VisibleFaster => {
                Tween::new(0.0, 1.0, Duration::from_millis(700), Easing::EaseOut)
            }
            Variant::Risen => Tween::new(0.0, 1.0, Duration::from_millis(1700), Easing::EaseInOut),
        }
    }

    /// Vertical offset the element starts from when hidden.
    pub fn hidden_offset(self) -> f64 {
        match self {
            Variant::Risen => 100.0,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationState {
    Hidden,
    Entering { progress: f64 },
    Visible(Variant),
}

/// How an element should be drawn at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Appearance {
    /// Fraction of a stroke's length to draw.
    pub path_length: f64,
    pub opacity: f64,
    /// Remaining downward offset, in the element's own units.
    pub offset_y: f64,
}

impl Appearance {
    pub const HIDDEN: Appearance = Appearance {
        path_length: 0.0,
        opacity: 0.0,
        offset_y: 0.0,
    };

    fn at(variant: Variant, eased: f64) -> Self {
        match variant {
            Variant::Risen => Appearance {
                path_length: 1.0,
                opacity: eased,
                offset_y: variant.hidden_offset() * (1.0 - eased),
            },
            _ => Appearance {
                path_length: eased,
                opacity: 1.0,
                offset_y: 0.0,
            },
        }
    }
}

/// One element's hidden → visible state machine.
#[derive(Debug, Clone)]
pub struct ElementAnimation {
    pub element: Element,
    target: Variant,
    started_at: Option<Instant>,
}

impl ElementAnimation {
    pub fn new(element: Element) -> Self {
        Self {
            element,
            target: element.target(),
            started_at: None,
        }
    }

    /// Begin the entrance transition. Only the first call has any effect.
    pub fn trigger(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    pub fn state_at(&self, now: Instant) -> AnimationState {
        let Some(started_at) = self.started_at else {
            return AnimationState::Hidden;
        };
        let tween = self.target.transition();
        let elapsed = now.saturating_duration_since(started_at);
        if tween.is_complete(elapsed) {
            AnimationState::Visible(self.target)
        } else {
            AnimationState::Entering {
                progress: tween.progress(elapsed),
            }
        }
    }

    pub fn appearance_at(&self, now: Instant) -> Appearance {
        let Some(started_at) = self.started_at else {
            return Appearance {
                offset_y: self.target.hidden_offset(),
                ..Appearance::HIDDEN
            };
        };
        let eased = self.target.transition().sample(started_at, now);
        Appearance::at(self.target, eased)
    }
}

/// Fade-and-rise applied to the output panel whenever it gets new content.
#[derive(Debug, Clone)]
pub struct OutputReveal {
    tween: Tween,
    offset: f64,
    started_at: Option<Instant>,
}

impl Default for OutputReveal {
    fn default() -> Self {
        Self {
            tween: Tween::new(0.0, 1.0, Duration::from_millis(500), Easing::EaseInOut),
            offset: 20.0,
            started_at: None,
        }
    }
}

impl OutputReveal {
    /// Replay the reveal from the start.
    pub fn show(&mut self, now: Instant) {
        self.started_at = Some(now);
    }

    pub fn hide(&mut self) {
        self.started_at = None;
    }

    pub fn appearance_at(&self, now: Instant) -> Appearance {
        let Some(started_at) = self.started_at else {
            return Appearance {
                offset_y: self.offset,
                ..Appearance::HIDDEN
            };
        };
        let eased = self.tween.sample(started_at, now);
        Appearance {
            path_length: 1.0,
            opacity: eased,
            offset_y: self.offset * (1.0 - eased),
        }
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.started_at
            .is_some_and(|s| !self.tween.is_complete(now.saturating_duration_since(s)))
    }
}

/// Owns every animated element of the view.
#[derive(Debug, Clone)]
pub struct AnimationSequencer {
    elements: Vec<ElementAnimation>,
    pub spinner: Spinner,
    pub output: OutputReveal,
}

impl Default for AnimationSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationSequencer {
    pub fn new() -> Self {
        Self {
            elements: Element::ALL.iter().copied().map(ElementAnimation::new).collect(),
            spinner: Spinner::default(),
            output: OutputReveal::default(),
        }
    }

    /// Start every entrance transition. Later calls are ignored.
    pub fn mount(&mut self, now: Instant) {
        for element in &mut self.elements {
            element.trigger(now);
        }
    }

    pub fn get(&self, element: Element) -> Option<&ElementAnimation> {
        self.elements.iter().find(|e| e.element == element)
    }

    pub fn appearance(&self, element: Element, now: Instant) -> Appearance {
        self.get(element)
            .map_or(Appearance::HIDDEN, |e| e.appearance_at(now))
    }

    /// Keep the spinner in step with the busy flag.
    pub fn sync_busy(&mut self, busy: bool, now: Instant) {
        match (busy, self.spinner.is_running()) {
            (true, false) => self.spinner.start(now),
            (false, true) => self.spinner.stop(),
            _ => {}
        }
    }

    /// True while anything on screen still moves; used to pick the redraw rate.
    pub fn is_animating(&self, now: Instant) -> bool {
        self.spinner.is_running()
            || self.output.is_animating(now)
            || self
                .elements
                .iter()
                .any(|e| matches!(e.state_at(now), AnimationState::Entering { .. }))
    }
}
