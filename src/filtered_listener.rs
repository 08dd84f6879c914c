use crate::event::ControllerEvent;
use crate::eventbus::ControllerListener;

/// Wraps a listener and forwards only events accepted by a predicate.
pub struct FilteredListener {
    predicate: Box<dyn Fn(&ControllerEvent) -> bool + Send + Sync>,
    inner: Box<dyn ControllerListener>,
}

impl FilteredListener {
    pub fn new(
        predicate: impl Fn(&ControllerEvent) -> bool + Send + Sync + 'static,
        inner: impl ControllerListener + 'static,
    ) -> Self {
        Self {
            predicate: Box::new(predicate),
            inner: Box::new(inner),
        }
    }

    /// Only events of controls whose name starts with `prefix`.
    pub fn control_prefix(prefix: &str, inner: impl ControllerListener + 'static) -> Self {
        let prefix = prefix.to_string();
        Self::new(
            move |event| event.control_name().is_some_and(|n| n.starts_with(&prefix)),
            inner,
        )
    }
}

impl ControllerListener for FilteredListener {
    fn on_event(&mut self, event: &ControllerEvent) {
        if (self.predicate)(event) {
            self.inner.on_event(event);
        }
    }
}
