//! Input normalization
//!
//! Turns raw pointer, touch and keyboard events into [`InputEvent`]s in
//! surface coordinates, keeping the per-contact history deltas are computed
//! against.

use sketch_core::{EventType, InputEvent, KeyState, PointerSample, RawEvent};
use sketch_platform::{EventTarget, Rect, SurfaceId};
use smallvec::SmallVec;

/// Where a group of event types is subscribed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindingTarget {
    Surface,
    Document,
    Window,
}

impl BindingTarget {
    pub fn resolve(self, surface: SurfaceId) -> EventTarget {
        match self {
            BindingTarget::Surface => EventTarget::Surface(surface),
            BindingTarget::Document => EventTarget::Document,
            BindingTarget::Window => EventTarget::Window,
        }
    }
}

/// Subscriptions every context makes at creation
pub static BINDINGS: &[(BindingTarget, &[EventType])] = &[
    (
        BindingTarget::Surface,
        &[
            EventType::MouseDown,
            EventType::TouchStart,
            EventType::MouseMove,
            EventType::TouchMove,
            EventType::MouseUp,
            EventType::TouchEnd,
            EventType::Click,
            EventType::MouseOut,
            EventType::MouseOver,
        ],
    ),
    (BindingTarget::Document, &[EventType::KeyDown, EventType::KeyUp]),
    (
        BindingTarget::Window,
        &[EventType::Focus, EventType::Blur, EventType::Resize],
    ),
];

/// Input snapshot of one context
#[derive(Clone, Debug, Default)]
pub struct InputNormalizer {
    mouse: Option<PointerSample>,
    touches: SmallVec<[PointerSample; 4]>,
    keys: KeyState,
    dragging: bool,
}

impl InputNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Primary pointer: the mouse, or the first touch of the last touch event
    pub fn pointer(&self) -> PointerSample {
        self.mouse.unwrap_or_default()
    }

    /// Contacts of the last pointer event, in slot order
    pub fn touches(&self) -> SmallVec<[PointerSample; 4]> {
        self.touches.clone()
    }

    pub fn keys(&self) -> &KeyState {
        &self.keys
    }

    pub fn dragging(&self) -> bool {
        self.dragging
    }

    /// Normalize a pointer event.
    ///
    /// Page coordinates are shifted by the surface's bounding offset and the
    /// page scroll. Each touch contact continues the history of whatever
    /// contact held the same slot on the previous event; a mouse event
    /// replaces the contact list with the single mouse record.
    pub fn pointer_event(&mut self, raw: &RawEvent, bounds: Rect, scroll: (f32, f32)) -> InputEvent {
        let align = |page_x: f32, page_y: f32| {
            (
                page_x - bounds.left - scroll.0,
                page_y - bounds.top - scroll.1,
            )
        };

        match &raw.touches {
            Some(points) => {
                let next: SmallVec<[PointerSample; 4]> = points
                    .iter()
                    .enumerate()
                    .map(|(slot, point)| {
                        let (x, y) = align(point.page_x, point.page_y);
                        PointerSample::next(self.touches.get(slot), x, y)
                    })
                    .collect();
                self.touches = next;
            }
            None => {
                let (x, y) = align(raw.page_x, raw.page_y);
                let sample = PointerSample::next(self.mouse.as_ref(), x, y);
                self.touches.clear();
                self.touches.push(sample);
            }
        }

        if let Some(first) = self.touches.first() {
            self.mouse = Some(*first);
        }

        if let Some(dragging) = raw.event_type.drag_transition() {
            self.dragging = dragging;
        }

        self.event(raw)
    }

    /// Record a key transition and build its event.
    pub fn key_event(&mut self, raw: &RawEvent) -> InputEvent {
        if let Some(code) = raw.key_code {
            self.keys.set(code, raw.event_type == EventType::KeyDown);
        }
        self.event(raw)
    }

    fn event(&self, raw: &RawEvent) -> InputEvent {
        InputEvent {
            kind: raw
                .event_type
                .kind()
                .unwrap_or(sketch_core::EventKind::Move),
            pointer: self.pointer(),
            touches: self.touches(),
            raw: raw.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketch_core::{EventKind, TouchPoint};

    fn origin() -> Rect {
        Rect::new(0.0, 0.0, 300.0, 150.0)
    }

    #[test]
    fn test_alignment_subtracts_bounds_and_scroll() {
        let mut input = InputNormalizer::new();
        let event = input.pointer_event(
            &RawEvent::mouse(EventType::MouseMove, 150.0, 260.0),
            Rect::new(50.0, 100.0, 300.0, 150.0),
            (0.0, 40.0),
        );
        assert_eq!((event.x(), event.y()), (100.0, 120.0));
    }

    #[test]
    fn test_first_sample_has_zero_delta() {
        let mut input = InputNormalizer::new();
        let event = input.pointer_event(
            &RawEvent::mouse(EventType::MouseMove, 10.0, 20.0),
            origin(),
            (0.0, 0.0),
        );
        assert_eq!(event.delta(), (0.0, 0.0));
        assert_eq!((event.pointer.ox, event.pointer.oy), (10.0, 20.0));
    }

    #[test]
    fn test_mouse_delta_accumulates() {
        let mut input = InputNormalizer::new();
        input.pointer_event(&RawEvent::mouse(EventType::MouseMove, 10.0, 20.0), origin(), (0.0, 0.0));
        let event = input.pointer_event(
            &RawEvent::mouse(EventType::MouseMove, 15.0, 18.0),
            origin(),
            (0.0, 0.0),
        );
        assert_eq!(event.delta(), (5.0, -2.0));
        assert_eq!(event.touches.len(), 1);
        assert_eq!(input.pointer().x, 15.0);
    }

    #[test]
    fn test_touches_keep_history_by_slot() {
        let mut input = InputNormalizer::new();
        input.pointer_event(
            &RawEvent::touch(
                EventType::TouchStart,
                vec![TouchPoint::new(1, 10.0, 10.0), TouchPoint::new(2, 100.0, 100.0)],
            ),
            origin(),
            (0.0, 0.0),
        );
        let event = input.pointer_event(
            &RawEvent::touch(
                EventType::TouchMove,
                vec![TouchPoint::new(1, 12.0, 13.0), TouchPoint::new(2, 90.0, 105.0)],
            ),
            origin(),
            (0.0, 0.0),
        );

        assert_eq!(event.touches.len(), 2);
        assert_eq!((event.touches[0].dx, event.touches[0].dy), (2.0, 3.0));
        assert_eq!((event.touches[1].dx, event.touches[1].dy), (-10.0, 5.0));
        assert_eq!(event.pointer, event.touches[0]);
    }

    #[test]
    fn test_duplicate_touch_ids_keep_separate_history() {
        let mut input = InputNormalizer::new();
        input.pointer_event(
            &RawEvent::touch(
                EventType::TouchStart,
                vec![TouchPoint::new(0, 10.0, 10.0), TouchPoint::new(0, 100.0, 100.0)],
            ),
            origin(),
            (0.0, 0.0),
        );
        let event = input.pointer_event(
            &RawEvent::touch(
                EventType::TouchMove,
                vec![TouchPoint::new(0, 12.0, 13.0), TouchPoint::new(0, 101.0, 102.0)],
            ),
            origin(),
            (0.0, 0.0),
        );

        assert_eq!((event.touches[0].dx, event.touches[0].dy), (2.0, 3.0));
        assert_eq!((event.touches[1].dx, event.touches[1].dy), (1.0, 2.0));
    }

    #[test]
    fn test_first_touch_continues_mouse_record() {
        let mut input = InputNormalizer::new();
        input.pointer_event(&RawEvent::mouse(EventType::MouseMove, 20.0, 20.0), origin(), (0.0, 0.0));
        let event = input.pointer_event(
            &RawEvent::touch(EventType::TouchStart, vec![TouchPoint::new(3, 25.0, 30.0)]),
            origin(),
            (0.0, 0.0),
        );
        assert_eq!(event.delta(), (5.0, 10.0));
    }

    #[test]
    fn test_touch_end_keeps_last_pointer() {
        let mut input = InputNormalizer::new();
        input.pointer_event(
            &RawEvent::touch(EventType::TouchStart, vec![TouchPoint::new(7, 40.0, 50.0)]),
            origin(),
            (0.0, 0.0),
        );
        let event = input.pointer_event(&RawEvent::touch(EventType::TouchEnd, vec![]), origin(), (0.0, 0.0));
        assert!(event.touches.is_empty());
        assert_eq!((event.x(), event.y()), (40.0, 50.0));
        assert!(!input.dragging());
    }

    #[test]
    fn test_dragging_follows_phase() {
        let mut input = InputNormalizer::new();
        let at = |ty| RawEvent::mouse(ty, 0.0, 0.0);
        input.pointer_event(&at(EventType::MouseDown), origin(), (0.0, 0.0));
        assert!(input.dragging());
        input.pointer_event(&at(EventType::MouseMove), origin(), (0.0, 0.0));
        assert!(input.dragging());
        input.pointer_event(&at(EventType::MouseOut), origin(), (0.0, 0.0));
        assert!(input.dragging());
        input.pointer_event(&at(EventType::MouseUp), origin(), (0.0, 0.0));
        assert!(!input.dragging());
    }

    #[test]
    fn test_keys_by_code_and_name() {
        let mut input = InputNormalizer::new();
        let event = input.key_event(&RawEvent::key(EventType::KeyDown, 32));
        assert_eq!(event.kind, EventKind::KeyDown);
        assert!(input.keys().is_pressed("SPACE"));
        assert!(input.keys().is_code_pressed(32));

        input.key_event(&RawEvent::key(EventType::KeyDown, 65));
        assert!(input.keys().is_pressed("A"));

        input.key_event(&RawEvent::key(EventType::KeyUp, 32));
        assert!(!input.keys().is_pressed("SPACE"));
        assert!(input.keys().is_pressed("A"));
    }

    #[test]
    fn test_bindings_cover_every_slot_source() {
        let bound: Vec<EventType> = BINDINGS
            .iter()
            .flat_map(|(_, types)| types.iter().copied())
            .collect();
        assert_eq!(bound.len(), EventType::ALL.len());
        for ty in EventType::ALL {
            assert!(bound.contains(&ty), "{ty}");
        }
    }
}
