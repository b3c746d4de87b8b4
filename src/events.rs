use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::dom::NodeId;
use crate::page::Page;
use crate::Result;

type Callback = dyn Fn(&mut Page, &mut EventState) -> Result<()>;

/// A registered event callback.
///
/// Callbacks are reference-counted so a listener list can be snapshotted
/// before dispatch and shared with cloned nodes.
#[derive(Clone)]
pub(crate) struct Listener {
    callback: Rc<Callback>,
}

impl Listener {
    pub(crate) fn new<F>(callback: F) -> Self
    where
        F: Fn(&mut Page, &mut EventState) -> Result<()> + 'static,
    {
        Self {
            callback: Rc::new(callback),
        }
    }

    pub(crate) fn invoke(&self, page: &mut Page, event: &mut EventState) -> Result<()> {
        (self.callback)(page, event)
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener").finish_non_exhaustive()
    }
}

#[derive(Debug, Default, Clone)]
pub(crate) struct ListenerStore {
    map: HashMap<NodeId, HashMap<String, Vec<Listener>>>,
}

impl ListenerStore {
    pub(crate) fn add(&mut self, node_id: NodeId, event: &str, listener: Listener) {
        self.map
            .entry(node_id)
            .or_default()
            .entry(event.to_string())
            .or_default()
            .push(listener);
    }

    pub(crate) fn get(&self, node_id: NodeId, event: &str) -> Vec<Listener> {
        self.map
            .get(&node_id)
            .and_then(|events| events.get(event))
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn count(&self, node_id: NodeId, event: &str) -> usize {
        self.map
            .get(&node_id)
            .and_then(|events| events.get(event))
            .map_or(0, Vec::len)
    }

    /// Drops every listener registered on `node_id`.
    pub(crate) fn remove_all(&mut self, node_id: NodeId) {
        self.map.remove(&node_id);
    }

    /// Gives `to` a copy of every listener registered on `from`.
    pub(crate) fn copy_all(&mut self, from: NodeId, to: NodeId) {
        let Some(events) = self.map.get(&from).cloned() else {
            return;
        };
        let target = self.map.entry(to).or_default();
        for (event, listeners) in events {
            target.entry(event).or_default().extend(listeners);
        }
    }
}

/// State of one event as it travels from its target up the tree.
#[derive(Debug, Clone)]
pub struct EventState {
    pub event_type: String,
    pub target: NodeId,
    pub current_target: NodeId,
    pub default_prevented: bool,
    pub propagation_stopped: bool,
}

impl EventState {
    pub(crate) fn new(event_type: &str, target: NodeId) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: target,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }
}
