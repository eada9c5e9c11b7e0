//! DOM Events
//!
//! Click and load events with bubbling and `preventDefault`.

use std::rc::Rc;

use crate::NodeId;

/// DOM event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Click,
    Load,
}

impl EventType {
    /// Whether events of this type bubble to ancestors
    pub fn bubbles(self) -> bool {
        matches!(self, EventType::Click)
    }
}

/// Event listener callback
pub type Listener = Rc<dyn Fn(&mut DomEvent)>;

/// DOM event
#[derive(Debug, Clone)]
pub struct DomEvent {
    pub event_type: EventType,
    pub target: NodeId,
    pub current_target: Option<NodeId>,
    pub bubbles: bool,
    pub cancelable: bool,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl DomEvent {
    fn new(event_type: EventType, target: NodeId, cancelable: bool) -> Self {
        Self {
            event_type,
            target,
            current_target: None,
            bubbles: event_type.bubbles(),
            cancelable,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Create click event
    pub fn click(target: NodeId) -> Self {
        Self::new(EventType::Click, target, true)
    }

    /// Create load event
    pub fn load(target: NodeId) -> Self {
        Self::new(EventType::Load, target, false)
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Stop propagation
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Run listeners collected along a propagation path.
///
/// The path comes from [`crate::Document::event_path`]; it is collected up
/// front so listeners are free to borrow the document again. Returns `true`
/// when the default action should still run.
pub fn dispatch(path: Vec<(NodeId, Listener)>, event: &mut DomEvent) -> bool {
    let mut current = None;
    for (node, listener) in path {
        if event.propagation_stopped && current != Some(node) {
            break;
        }
        current = Some(node);
        event.current_target = Some(node);
        listener(event);
    }
    event.current_target = None;
    !event.default_prevented
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_load_not_cancelable() {
        let mut event = DomEvent::load(NodeId(3));
        event.prevent_default();
        assert!(!event.is_default_prevented());
        assert!(!event.bubbles);
    }

    #[test]
    fn test_dispatch_stops_between_nodes() {
        let hits = Rc::new(Cell::new(0));
        let first = {
            let hits = hits.clone();
            Rc::new(move |e: &mut DomEvent| {
                hits.set(hits.get() + 1);
                e.prevent_default();
                e.stop_propagation();
            }) as Listener
        };
        let same_node = {
            let hits = hits.clone();
            Rc::new(move |_: &mut DomEvent| hits.set(hits.get() + 1)) as Listener
        };
        let parent = {
            let hits = hits.clone();
            Rc::new(move |_: &mut DomEvent| hits.set(hits.get() + 100)) as Listener
        };

        let mut event = DomEvent::click(NodeId(2));
        let proceed = dispatch(
            vec![(NodeId(2), first), (NodeId(2), same_node), (NodeId(1), parent)],
            &mut event,
        );

        assert!(!proceed);
        assert_eq!(hits.get(), 2);
    }
}
