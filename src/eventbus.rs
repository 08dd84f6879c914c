use crate::event::{ControllerEvent, ControllerEventKind};
use std::collections::BTreeMap;

/// Trait for reacting to controller notifications.
pub trait ControllerListener: Send {
    fn on_event(&mut self, event: &ControllerEvent);
}

/// Determines which kinds of events a listener wants to receive.
#[derive(Debug, Clone, Copy)]
pub enum EventFilter {
    All,
    ControlsOnly,
    ActivationOnly,
    Custom(fn(&ControllerEvent) -> bool),
}

impl EventFilter {
    fn accepts(&self, event: &ControllerEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::ControlsOnly => {
                matches!(event.kind, ControllerEventKind::ControlChanged { .. })
            }
            EventFilter::ActivationOnly => {
                matches!(event.kind, ControllerEventKind::ActivationChanged { .. })
            }
            EventFilter::Custom(f) => f(event),
        }
    }
}

/// Listener with filter, tag and mute flag.
struct ListenerEntry {
    listener: Box<dyn ControllerListener>,
    enabled: bool,
    filter: EventFilter,
    tag: Option<String>, // controller name
}

#[derive(Default)]
pub struct ControllerEventBus {
    next_id: u64,
    listeners: BTreeMap<u64, ListenerEntry>,
}

impl ControllerEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener. With a `tag`, only events of the controller with that
    /// name are delivered.
    pub fn add_listener(
        &mut self,
        listener: impl ControllerListener + 'static,
        filter: EventFilter,
        tag: Option<String>,
    ) -> u64 {
        let id = self.next_id;
        self.listeners.insert(
            id,
            ListenerEntry {
                listener: Box::new(listener),
                enabled: true,
                filter,
                tag,
            },
        );
        self.next_id += 1;
        id
    }

    pub fn enable(&mut self, id: u64) {
        if let Some(entry) = self.listeners.get_mut(&id) {
            entry.enabled = true;
        }
    }

    /// Mutes a listener without removing it.
    pub fn disable(&mut self, id: u64) {
        if let Some(entry) = self.listeners.get_mut(&id) {
            entry.enabled = false;
        }
    }

    pub fn remove_listener(&mut self, id: u64) -> bool {
        self.listeners.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Delivers one event to every enabled, matching listener in registration order.
    pub fn emit(&mut self, event: &ControllerEvent) {
        for entry in self.listeners.values_mut() {
            if !entry.enabled {
                continue;
            }
            if let Some(ref wanted) = entry.tag {
                if event.controller_name != *wanted {
                    continue;
                }
            }
            if entry.filter.accepts(event) {
                entry.listener.on_event(event);
            }
        }
    }
}
