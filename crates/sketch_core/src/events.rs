//! Input event model
//!
//! Raw platform event types, the normalized [`InputEvent`] handed to
//! collaborator callbacks, and the static dispatch table that maps a raw event
//! type onto the ordered list of callback slots it triggers.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Raw event types delivered by a platform event source
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    MouseDown,
    TouchStart,
    MouseMove,
    TouchMove,
    MouseUp,
    TouchEnd,
    Click,
    MouseOut,
    MouseOver,
    KeyDown,
    KeyUp,
    Focus,
    Blur,
    Resize,
}

impl EventType {
    /// All event types in declaration order.
    pub const ALL: [EventType; 14] = [
        EventType::MouseDown,
        EventType::TouchStart,
        EventType::MouseMove,
        EventType::TouchMove,
        EventType::MouseUp,
        EventType::TouchEnd,
        EventType::Click,
        EventType::MouseOut,
        EventType::MouseOver,
        EventType::KeyDown,
        EventType::KeyUp,
        EventType::Focus,
        EventType::Blur,
        EventType::Resize,
    ];

    /// Platform name of the event (`"mousedown"`, `"touchstart"`, ...)
    pub const fn name(self) -> &'static str {
        match self {
            EventType::MouseDown => "mousedown",
            EventType::TouchStart => "touchstart",
            EventType::MouseMove => "mousemove",
            EventType::TouchMove => "touchmove",
            EventType::MouseUp => "mouseup",
            EventType::TouchEnd => "touchend",
            EventType::Click => "click",
            EventType::MouseOut => "mouseout",
            EventType::MouseOver => "mouseover",
            EventType::KeyDown => "keydown",
            EventType::KeyUp => "keyup",
            EventType::Focus => "focus",
            EventType::Blur => "blur",
            EventType::Resize => "resize",
        }
    }

    /// Pointer-class events: mouse, touch, click and hover.
    pub const fn is_pointer(self) -> bool {
        matches!(
            self,
            EventType::MouseDown
                | EventType::TouchStart
                | EventType::MouseMove
                | EventType::TouchMove
                | EventType::MouseUp
                | EventType::TouchEnd
                | EventType::Click
                | EventType::MouseOut
                | EventType::MouseOver
        )
    }

    pub const fn is_keyboard(self) -> bool {
        matches!(self, EventType::KeyDown | EventType::KeyUp)
    }

    /// Dragging transition implied by a pointer event name.
    ///
    /// Names containing "down" or "start" begin a drag, names containing "up"
    /// or "end" finish it, anything else leaves the flag alone. Only
    /// meaningful for pointer events.
    pub fn drag_transition(self) -> Option<bool> {
        let name = self.name();
        if name.contains("down") || name.contains("start") {
            Some(true)
        } else if name.contains("up") || name.contains("end") {
            Some(false)
        } else {
            None
        }
    }

    /// Normalized kind, `None` for window-level events.
    pub const fn kind(self) -> Option<EventKind> {
        match self {
            EventType::MouseDown | EventType::TouchStart => Some(EventKind::Down),
            EventType::MouseMove | EventType::TouchMove => Some(EventKind::Move),
            EventType::MouseUp | EventType::TouchEnd => Some(EventKind::Up),
            EventType::Click => Some(EventKind::Click),
            EventType::MouseOver => Some(EventKind::HoverIn),
            EventType::MouseOut => Some(EventKind::HoverOut),
            EventType::KeyDown => Some(EventKind::KeyDown),
            EventType::KeyUp => Some(EventKind::KeyUp),
            EventType::Focus | EventType::Blur | EventType::Resize => None,
        }
    }

    /// Callback slots triggered by this event type, in declaration order.
    pub fn slots(self) -> &'static [CallbackSlot] {
        DISPATCH_TABLE
            .iter()
            .find(|(ty, _)| *ty == self)
            .map(|(_, slots)| *slots)
            .unwrap_or(&[])
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown event name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown event type: {0}")]
pub struct ParseEventTypeError(pub String);

impl FromStr for EventType {
    type Err = ParseEventTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .into_iter()
            .find(|ty| ty.name() == s)
            .ok_or_else(|| ParseEventTypeError(s.to_string()))
    }
}

/// Normalized interaction kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Down,
    Move,
    Up,
    Click,
    HoverIn,
    HoverOut,
    KeyDown,
    KeyUp,
}

/// Named callback slots a context can fill
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallbackSlot {
    MouseDown,
    TouchStart,
    MouseMove,
    TouchMove,
    MouseUp,
    TouchEnd,
    Click,
    MouseOut,
    MouseOver,
    KeyDown,
    KeyUp,
    Focus,
    Blur,
}

/// Raw event type → callback slots.
///
/// Mouse and touch events of the same phase share a group, so a `touchstart`
/// reaches both the `mousedown` and `touchstart` slots and vice versa. Slots
/// within a group fire in the order listed. `resize` has no event slot; it is
/// routed through the sizing path and the lifecycle `resize` callback.
static DISPATCH_TABLE: &[(EventType, &[CallbackSlot])] = &[
    (
        EventType::MouseDown,
        &[CallbackSlot::MouseDown, CallbackSlot::TouchStart],
    ),
    (
        EventType::TouchStart,
        &[CallbackSlot::MouseDown, CallbackSlot::TouchStart],
    ),
    (
        EventType::MouseMove,
        &[CallbackSlot::MouseMove, CallbackSlot::TouchMove],
    ),
    (
        EventType::TouchMove,
        &[CallbackSlot::MouseMove, CallbackSlot::TouchMove],
    ),
    (
        EventType::MouseUp,
        &[CallbackSlot::MouseUp, CallbackSlot::TouchEnd],
    ),
    (
        EventType::TouchEnd,
        &[CallbackSlot::MouseUp, CallbackSlot::TouchEnd],
    ),
    (EventType::Click, &[CallbackSlot::Click]),
    (EventType::MouseOut, &[CallbackSlot::MouseOut]),
    (EventType::MouseOver, &[CallbackSlot::MouseOver]),
    (EventType::KeyDown, &[CallbackSlot::KeyDown]),
    (EventType::KeyUp, &[CallbackSlot::KeyUp]),
    (EventType::Focus, &[CallbackSlot::Focus]),
    (EventType::Blur, &[CallbackSlot::Blur]),
    (EventType::Resize, &[]),
];

/// One contact of a raw touch event, in page coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    pub id: u64,
    pub page_x: f32,
    pub page_y: f32,
}

impl TouchPoint {
    pub fn new(id: u64, page_x: f32, page_y: f32) -> Self {
        Self { id, page_x, page_y }
    }
}

/// Event as delivered by the platform, before normalization
#[derive(Clone, Debug, PartialEq)]
pub struct RawEvent {
    pub event_type: EventType,
    /// Page X position (pointer events)
    pub page_x: f32,
    /// Page Y position (pointer events)
    pub page_y: f32,
    /// Active contacts, `Some` only for touch events
    pub touches: Option<Vec<TouchPoint>>,
    /// Numeric key code (keyboard events)
    pub key_code: Option<u32>,
}

impl RawEvent {
    pub fn mouse(event_type: EventType, page_x: f32, page_y: f32) -> Self {
        Self {
            event_type,
            page_x,
            page_y,
            touches: None,
            key_code: None,
        }
    }

    pub fn touch(event_type: EventType, touches: Vec<TouchPoint>) -> Self {
        let (page_x, page_y) = touches
            .first()
            .map(|t| (t.page_x, t.page_y))
            .unwrap_or((0.0, 0.0));
        Self {
            event_type,
            page_x,
            page_y,
            touches: Some(touches),
            key_code: None,
        }
    }

    pub fn key(event_type: EventType, key_code: u32) -> Self {
        Self {
            event_type,
            page_x: 0.0,
            page_y: 0.0,
            touches: None,
            key_code: Some(key_code),
        }
    }

    /// Focus, blur or resize
    pub fn window(event_type: EventType) -> Self {
        Self {
            event_type,
            page_x: 0.0,
            page_y: 0.0,
            touches: None,
            key_code: None,
        }
    }
}

/// Surface-relative position of one contact, with its previous sample and delta
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
    pub ox: f32,
    pub oy: f32,
    pub dx: f32,
    pub dy: f32,
}

impl PointerSample {
    /// First sample of a contact; its delta is zero.
    pub fn first(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            ox: x,
            oy: y,
            dx: 0.0,
            dy: 0.0,
        }
    }

    /// Next sample following `previous`, or a first sample if there is none.
    pub fn next(previous: Option<&PointerSample>, x: f32, y: f32) -> Self {
        match previous {
            Some(prev) => Self {
                x,
                y,
                ox: prev.x,
                oy: prev.y,
                dx: x - prev.x,
                dy: y - prev.y,
            },
            None => Self::first(x, y),
        }
    }
}

/// Normalized input event passed to context callbacks
#[derive(Clone, Debug, PartialEq)]
pub struct InputEvent {
    pub kind: EventKind,
    /// Primary contact (mouse, or the first touch)
    pub pointer: PointerSample,
    /// Every active contact, ordered by slot
    pub touches: SmallVec<[PointerSample; 4]>,
    /// The originating platform event
    pub raw: RawEvent,
}

impl InputEvent {
    pub fn event_type(&self) -> EventType {
        self.raw.event_type
    }

    pub fn x(&self) -> f32 {
        self.pointer.x
    }

    pub fn y(&self) -> f32 {
        self.pointer.y
    }

    pub fn delta(&self) -> (f32, f32) {
        (self.pointer.dx, self.pointer.dy)
    }
}
