//! Pending-change queue between backend threads and the update thread.
//!
//! Backends on any thread record "this control changed" here; the thread that owns
//! the [`InputManager`](crate::manager::InputManager) drains it once per `update()`.
//!
//! Semantics:
//! - FIFO by *first* arrival. A control queued again before the drain keeps its slot.
//! - Last write wins. Only the latest value of a control is dispatched.
//! - The mutex only guards enqueue/drain; no decode or dispatch work runs under it.

use crate::control::{ControlId, ControlValue};
use crate::controller::ControllerId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// One drained entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Pending {
    /// Value written from another thread, applied (guarded) on drain.
    pub value: Option<ControlValue>,
    /// The control already changed in place on the update thread.
    pub dirty: bool,
}

#[derive(Debug, Default)]
struct PendingUpdates {
    order: Vec<ControlId>,
    entries: HashMap<ControlId, Pending>,
}

impl PendingUpdates {
    fn slot(&mut self, id: ControlId) -> &mut Pending {
        if !self.entries.contains_key(&id) {
            self.order.push(id);
        }
        self.entries.entry(id).or_insert(Pending {
            value: None,
            dirty: false,
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct UpdateQueue {
    inner: Arc<Mutex<PendingUpdates>>,
}

impl UpdateQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, PendingUpdates> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// A control changed in place. Supersedes any value still pending for it.
    pub(crate) fn mark_changed(&self, id: ControlId) {
        let mut pending = self.lock();
        let slot = pending.slot(id);
        slot.value = None;
        slot.dirty = true;
    }

    /// Record a value to be applied on the next drain.
    pub(crate) fn push_value(&self, id: ControlId, value: ControlValue) {
        self.lock().slot(id).value = Some(value);
    }

    /// Take everything queued so far, in first-arrival order.
    pub(crate) fn drain(&self) -> Vec<(ControlId, Pending)> {
        let PendingUpdates { order, mut entries } = std::mem::take(&mut *self.lock());
        order
            .into_iter()
            .filter_map(|id| entries.remove(&id).map(|p| (id, p)))
            .collect()
    }

    /// Drop entries of a removed controller.
    pub(crate) fn discard_controller(&self, controller: ControllerId) {
        let mut pending = self.lock();
        pending.order.retain(|id| id.controller() != controller);
        pending.entries.retain(|id, _| id.controller() != controller);
    }

    pub fn len(&self) -> usize {
        self.lock().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn sender(&self) -> UpdateSender {
        UpdateSender {
            queue: self.clone(),
        }
    }
}

/// Cloneable, thread-safe write handle for backends running off the update thread.
///
/// Values are applied with the usual change guard when the manager drains the queue.
#[derive(Clone, Debug)]
pub struct UpdateSender {
    queue: UpdateQueue,
}

impl UpdateSender {
    pub fn send(&self, control: ControlId, value: ControlValue) {
        self.queue.push_value(control, value);
    }

    pub fn set_pressed(&self, control: ControlId, pressed: bool) {
        self.send(control, ControlValue::Button(pressed));
    }

    pub fn set_axis(&self, control: ControlId, value: f32, relative: bool) {
        self.send(control, ControlValue::Axis { value, relative });
    }

    pub fn set_led(&self, control: ControlId, bits: u32) {
        self.send(control, ControlValue::Led(bits));
    }

    pub fn set_effect(&self, control: ControlId, value: f32) {
        self.send(control, ControlValue::Effect(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(controller: u32, index: usize) -> ControlId {
        ControlId::new(ControllerId(controller), index)
    }

    #[test]
    fn dedup_keeps_first_slot_and_last_value() {
        let q = UpdateQueue::new();
        let s = q.sender();
        s.set_pressed(id(0, 0), true);
        s.set_axis(id(0, 1), 0.5, false);
        s.set_pressed(id(0, 0), false);

        let drained = q.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].0, id(0, 0));
        assert_eq!(drained[0].1.value, Some(ControlValue::Button(false)));
        assert_eq!(drained[1].0, id(0, 1));
        assert!(q.is_empty());
    }

    #[test]
    fn local_change_supersedes_pending_value() {
        let q = UpdateQueue::new();
        q.push_value(id(0, 0), ControlValue::Button(true));
        q.mark_changed(id(0, 0));
        let drained = q.drain();
        assert_eq!(
            drained[0].1,
            Pending {
                value: None,
                dirty: true
            }
        );
    }

    #[test]
    fn later_value_keeps_dirty_flag() {
        let q = UpdateQueue::new();
        q.mark_changed(id(0, 0));
        q.push_value(id(0, 0), ControlValue::Button(true));
        let drained = q.drain();
        assert!(drained[0].1.dirty);
        assert_eq!(drained[0].1.value, Some(ControlValue::Button(true)));
    }

    #[test]
    fn senders_work_across_threads() {
        let q = UpdateQueue::new();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let s = q.sender();
                std::thread::spawn(move || s.set_pressed(id(1, i), true))
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(q.len(), 4);
    }

    #[test]
    fn discard_drops_one_controller() {
        let q = UpdateQueue::new();
        q.mark_changed(id(0, 0));
        q.mark_changed(id(1, 0));
        q.discard_controller(ControllerId(0));
        let drained = q.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].0.controller(), ControllerId(1));
    }
}
