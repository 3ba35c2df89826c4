//! Event listener bookkeeping
//!
//! A host delivers raw events to a target (a surface, the document or the
//! window). [`Listeners`] records which owner subscribed to which event type
//! on which target, and answers in subscription order.

use crate::surface::SurfaceId;
use sketch_core::EventType;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle of one subscription
    pub struct ListenerId;
}

/// Where a raw event was delivered
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventTarget {
    /// Pointer and touch events land on the surface itself
    Surface(SurfaceId),
    /// Keyboard events
    Document,
    /// Focus, blur and viewport resize
    Window,
}

#[derive(Clone, Debug)]
struct Subscription<O> {
    target: EventTarget,
    event_type: EventType,
    owner: O,
    seq: u64,
}

/// Subscriptions keyed by [`ListenerId`]
#[derive(Clone, Debug)]
pub struct Listeners<O> {
    entries: SlotMap<ListenerId, Subscription<O>>,
    next_seq: u64,
}

impl<O: Copy + PartialEq> Listeners<O> {
    pub fn new() -> Self {
        Self {
            entries: SlotMap::with_key(),
            next_seq: 0,
        }
    }

    pub fn add(&mut self, target: EventTarget, event_type: EventType, owner: O) -> ListenerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(Subscription {
            target,
            event_type,
            owner,
            seq,
        })
    }

    /// Drop every subscription held by `owner`, returning how many went.
    pub fn remove_owner(&mut self, owner: O) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, sub| sub.owner != owner);
        before - self.entries.len()
    }

    /// Owners subscribed to `event_type` on `target`, oldest first
    pub fn owners(&self, target: EventTarget, event_type: EventType) -> Vec<O> {
        let mut matching: Vec<&Subscription<O>> = self
            .entries
            .values()
            .filter(|sub| sub.target == target && sub.event_type == event_type)
            .collect();
        matching.sort_by_key(|sub| sub.seq);
        matching.into_iter().map(|sub| sub.owner).collect()
    }

    /// Number of subscriptions held by `owner`
    pub fn count_for(&self, owner: O) -> usize {
        self.entries.values().filter(|sub| sub.owner == owner).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<O: Copy + PartialEq> Default for Listeners<O> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owners_in_subscription_order() {
        let mut listeners = Listeners::new();
        listeners.add(EventTarget::Document, EventType::KeyDown, 2u32);
        listeners.add(EventTarget::Document, EventType::KeyUp, 9u32);
        listeners.add(EventTarget::Document, EventType::KeyDown, 1u32);

        assert_eq!(
            listeners.owners(EventTarget::Document, EventType::KeyDown),
            vec![2, 1]
        );
        assert!(listeners
            .owners(EventTarget::Window, EventType::KeyDown)
            .is_empty());
    }

    #[test]
    fn test_targets_are_distinct() {
        let mut listeners = Listeners::new();
        listeners.add(EventTarget::Surface(SurfaceId(1)), EventType::MouseMove, 'a');
        listeners.add(EventTarget::Surface(SurfaceId(2)), EventType::MouseMove, 'b');
        assert_eq!(
            listeners.owners(EventTarget::Surface(SurfaceId(2)), EventType::MouseMove),
            vec!['b']
        );
    }

    #[test]
    fn test_remove_owner() {
        let mut listeners = Listeners::new();
        listeners.add(EventTarget::Window, EventType::Blur, 1u8);
        listeners.add(EventTarget::Window, EventType::Focus, 1u8);
        listeners.add(EventTarget::Window, EventType::Focus, 2u8);

        assert_eq!(listeners.count_for(1), 2);
        assert_eq!(listeners.remove_owner(1), 2);
        assert_eq!(listeners.len(), 1);
        assert_eq!(listeners.remove_owner(1), 0);
    }
}
