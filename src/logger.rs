use crate::event::{ControllerEvent, ControllerEventKind};
use crate::eventbus::ControllerListener;
use tracing::info;

/// A listener that reports every notification through `tracing` at info level.
#[derive(Debug, Default)]
pub struct Logger;

impl Logger {
    pub fn new() -> Self {
        Logger
    }
}

impl ControllerListener for Logger {
    fn on_event(&mut self, event: &ControllerEvent) {
        match &event.kind {
            ControllerEventKind::ControlChanged { name, value, .. } => {
                info!(
                    controller = %event.controller_name,
                    control = %name,
                    ?value,
                    "control changed"
                );
            }
            ControllerEventKind::ActivationChanged { active } => {
                info!(controller = %event.controller_name, active, "activation changed");
            }
        }
    }
}
