//! Event subscriber registry.
//!
//! At most one handler per event id. A newer registration replaces the older
//! one, and each registration carries a generation so a stale disposer can
//! never remove its replacement.

use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;

pub(crate) type EventHandler = Rc<dyn Fn(Value)>;

struct Registration {
    generation: u64,
    handler: EventHandler,
}

/// Identifies one specific registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SubscriptionToken {
    pub(crate) event_id: String,
    pub(crate) generation: u64,
}

#[derive(Default)]
pub(crate) struct EventRegistry {
    handlers: HashMap<String, Registration>,
    next_generation: u64,
}

impl EventRegistry {
    /// Register `handler`, superseding any handler for the same id.
    pub(crate) fn register(&mut self, event_id: &str, handler: EventHandler) -> SubscriptionToken {
        let generation = self.next_generation;
        self.next_generation += 1;
        self.handlers.insert(
            event_id.to_string(),
            Registration {
                generation,
                handler,
            },
        );
        SubscriptionToken {
            event_id: event_id.to_string(),
            generation,
        }
    }

    /// Remove the registration named by `token`, if it is still the active one.
    pub(crate) fn remove(&mut self, token: &SubscriptionToken) -> bool {
        match self.handlers.get(&token.event_id) {
            Some(active) if active.generation == token.generation => {
                self.handlers.remove(&token.event_id);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn handler(&self, event_id: &str) -> Option<EventHandler> {
        self.handlers.get(event_id).map(|r| Rc::clone(&r.handler))
    }

    pub(crate) fn is_active(&self, token: &SubscriptionToken) -> bool {
        self.handlers
            .get(&token.event_id)
            .is_some_and(|r| r.generation == token.generation)
    }

    pub(crate) fn len(&self) -> usize {
        self.handlers.len()
    }

    pub(crate) fn clear(&mut self) {
        self.handlers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn recorder() -> (Rc<RefCell<Vec<Value>>>, EventHandler) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, Rc::new(move |v| sink.borrow_mut().push(v)))
    }

    #[test]
    fn later_registration_supersedes() {
        let mut registry = EventRegistry::default();
        let (first, h1) = recorder();
        let (second, h2) = recorder();
        registry.register("x", h1);
        registry.register("x", h2);

        registry.handler("x").unwrap()(Value::from(1));
        assert!(first.borrow().is_empty());
        assert_eq!(second.borrow().len(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn stale_token_does_not_remove_newer_handler() {
        let mut registry = EventRegistry::default();
        let (_, h1) = recorder();
        let (_, h2) = recorder();
        let stale = registry.register("x", h1);
        let fresh = registry.register("x", h2);

        assert!(!registry.remove(&stale));
        assert!(registry.is_active(&fresh));
        assert!(registry.remove(&fresh));
        assert!(registry.handler("x").is_none());
    }

    #[test]
    fn remove_is_idempotent() {
        let mut registry = EventRegistry::default();
        let (_, h) = recorder();
        let token = registry.register("x", h);
        assert!(registry.remove(&token));
        assert!(!registry.remove(&token));
    }

    #[test]
    fn generations_never_repeat_across_ids() {
        let mut registry = EventRegistry::default();
        let (_, h1) = recorder();
        let (_, h2) = recorder();
        let a = registry.register("a", h1);
        let b = registry.register("b", h2);
        assert_ne!(a.generation, b.generation);
    }

    #[test]
    fn clear_drops_everything() {
        let mut registry = EventRegistry::default();
        let (_, h) = recorder();
        registry.register("a", h);
        registry.clear();
        assert_eq!(registry.len(), 0);
    }
}
