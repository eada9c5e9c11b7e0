//! Named-event emitter for components and the orchestrator

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Handle returned by [`Emitter::register`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Handler<E> {
    id: ListenerId,
    once: bool,
    callback: Rc<dyn Fn(&E)>,
}

/// Single-threaded event emitter.
///
/// Handlers run outside the internal borrow, so a handler may register or
/// unregister listeners (including itself) while an event is being emitted.
pub struct Emitter<E> {
    next_id: Cell<u64>,
    handlers: RefCell<Vec<Handler<E>>>,
}

impl<E> Emitter<E> {
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(0),
            handlers: RefCell::new(Vec::new()),
        }
    }

    /// Register a handler for every future event
    pub fn register(&self, callback: impl Fn(&E) + 'static) -> ListenerId {
        self.push(false, Rc::new(callback))
    }

    /// Register a handler that runs for the next event only
    pub fn once(&self, callback: impl Fn(&E) + 'static) -> ListenerId {
        self.push(true, Rc::new(callback))
    }

    /// Remove a handler; returns whether it was still registered
    pub fn unregister(&self, id: ListenerId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|h| h.id != id);
        handlers.len() != before
    }

    /// Run every registered handler in registration order.
    ///
    /// Returns how many handlers ran.
    pub fn emit(&self, event: &E) -> usize {
        let snapshot: Vec<Rc<dyn Fn(&E)>> = {
            let mut handlers = self.handlers.borrow_mut();
            let snapshot: Vec<_> = handlers.iter().map(|h| h.callback.clone()).collect();
            handlers.retain(|h| !h.once);
            snapshot
        };

        for callback in &snapshot {
            callback(event);
        }
        snapshot.len()
    }

    pub fn listener_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    fn push(&self, once: bool, callback: Rc<dyn Fn(&E)>) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.handlers.borrow_mut().push(Handler { id, once, callback });
        id
    }
}

impl<E> Default for Emitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for Emitter<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_emit() {
        let emitter = Emitter::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        emitter.register(move |value: &u32| sink.borrow_mut().push(*value));

        assert_eq!(emitter.emit(&1), 1);
        assert_eq!(emitter.emit(&2), 1);
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_once_runs_a_single_time() {
        let emitter = Emitter::new();
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        emitter.once(move |_: &()| counter.set(counter.get() + 1));

        emitter.emit(&());
        emitter.emit(&());
        assert_eq!(count.get(), 1);
        assert_eq!(emitter.listener_count(), 0);
    }

    #[test]
    fn test_unregister() {
        let emitter: Emitter<()> = Emitter::new();
        let id = emitter.register(|_| {});
        assert!(emitter.unregister(id));
        assert!(!emitter.unregister(id));
        assert_eq!(emitter.emit(&()), 0);
    }

    #[test]
    fn test_handler_may_register_during_emit() {
        let emitter: Rc<Emitter<()>> = Rc::new(Emitter::new());
        let inner = emitter.clone();
        emitter.once(move |_| {
            inner.register(|_| {});
        });

        emitter.emit(&());
        assert_eq!(emitter.listener_count(), 1);
    }
}
