//! The [`InputManager`] context: controller registry, connection graph and the
//! once-per-frame `update()` that turns queued control changes into notifications.
//!
//! There is no global instance. Create as many managers as you need (one per game
//! session, one per test); each owns its controllers, connections, providers and
//! pending-change queue.
//!
//! # Threading
//! The manager itself lives on one thread. Backends running elsewhere write through
//! an [`UpdateSender`] obtained from [`InputManager::sender`]; those writes are applied
//! and dispatched on the next [`InputManager::update`].
//!
//! # Propagation
//! A change travels exactly one connection hop per dispatch. The receiving control is
//! written immediately and queued, so its own connections fire on the following
//! `update()`. Cyclic graphs therefore settle instead of recursing.

use crate::binding::BindingProfile;
use crate::connection::{ConnectError, Connection, ConnectionId, Endpoint};
use crate::control::{Control, ControlId, ControlKind, ControlValue};
use crate::controller::{Controller, ControllerId, ControllerKind};
use crate::event::ControllerEvent;
use crate::eventbus::ControllerEventBus;
use crate::provider::{Detection, Provider};
use crate::queue::{UpdateQueue, UpdateSender};
use crate::snapshot::{ControllerState, Snapshot};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, warn};

#[derive(Default)]
pub struct InputManager {
    controllers: BTreeMap<ControllerId, Controller>,
    names: HashMap<String, ControllerId>,
    connections: BTreeMap<ConnectionId, Connection>,
    providers: BTreeMap<String, Box<dyn Provider>>,
    queue: UpdateQueue,
    events: ControllerEventBus,
    next_controller: u32,
    next_connection: u32,
}

impl InputManager {
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------------
    // Controller registry
    // ---------------------------------------------------------------------

    /// Register a controller under its name.
    ///
    /// Names are unique: if one is already taken the existing controller stays and
    /// `None` is returned.
    pub fn add_controller(&mut self, controller: Controller) -> Option<ControllerId> {
        if let Some(existing) = self.names.get(controller.name()) {
            warn!(
                controller = controller.name(),
                %existing,
                "controller name already registered; keeping the existing one"
            );
            return None;
        }
        let id = ControllerId(self.next_controller);
        self.next_controller += 1;
        debug!(%id, controller = controller.name(), kind = ?controller.kind(), "controller added");
        self.names.insert(controller.name().to_string(), id);
        self.controllers.insert(id, controller);
        Some(id)
    }

    /// Unregister a controller, tearing down every connection it takes part in.
    pub fn remove_controller(&mut self, id: ControllerId) -> Option<Controller> {
        let mut controller = self.controllers.remove(&id)?;
        self.names.remove(controller.name());
        for connection in controller.take_connections() {
            self.drop_connection(connection);
        }
        self.queue.discard_controller(id);
        debug!(%id, controller = controller.name(), "controller removed");
        Some(controller)
    }

    pub fn controller(&self, id: ControllerId) -> Option<&Controller> {
        self.controllers.get(&id)
    }

    pub fn controller_mut(&mut self, id: ControllerId) -> Option<&mut Controller> {
        self.controllers.get_mut(&id)
    }

    pub fn controller_id(&self, name: &str) -> Option<ControllerId> {
        self.names.get(name).copied()
    }

    pub fn controller_by_name(&self, name: &str) -> Option<&Controller> {
        self.controller_id(name).and_then(|id| self.controller(id))
    }

    /// All controllers in registration order.
    pub fn controllers(&self) -> impl Iterator<Item = (ControllerId, &Controller)> {
        self.controllers.iter().map(|(id, c)| (*id, c))
    }

    /// Device controllers only.
    pub fn devices(&self) -> impl Iterator<Item = (ControllerId, &Controller)> {
        self.controllers()
            .filter(|(_, c)| c.kind() == ControllerKind::Device)
    }

    pub fn control(&self, id: ControlId) -> Option<&Control> {
        self.controllers
            .get(&id.controller())
            .and_then(|c| c.control_at(id.index()))
    }

    pub fn control_id(&self, controller: ControllerId, name: &str) -> Option<ControlId> {
        self.controllers
            .get(&controller)
            .and_then(|c| c.control_index(name))
            .map(|index| ControlId::new(controller, index))
    }

    /// Returns and clears the controller's changed flag.
    pub fn has_changed(&mut self, controller: ControllerId) -> bool {
        self.controllers
            .get_mut(&controller)
            .is_some_and(|c| c.has_changed())
    }

    /// Character of the last key hit on `controller`, consumed by this call.
    pub fn take_char(&mut self, controller: ControllerId) -> Option<char> {
        self.controllers
            .get_mut(&controller)
            .and_then(|c| c.take_char())
    }

    /// Activate or deactivate a virtual controller. Device controllers stay active.
    pub fn set_active(&mut self, controller: ControllerId, active: bool) -> bool {
        let Some(c) = self.controllers.get_mut(&controller) else {
            return false;
        };
        if !c.set_active(active) {
            return false;
        }
        let event = ControllerEvent::activation_changed(controller, c.name(), active);
        self.events.emit(&event);
        true
    }

    // ---------------------------------------------------------------------
    // Writes
    // ---------------------------------------------------------------------

    /// Guarded write on the update thread. A change is dispatched on the next `update()`.
    pub fn set(&mut self, control: ControlId, value: ControlValue) -> bool {
        let changed = self.apply_value(control, value);
        if changed {
            self.queue.mark_changed(control);
        }
        changed
    }

    pub fn set_pressed(&mut self, control: ControlId, pressed: bool) -> bool {
        self.set(control, ControlValue::Button(pressed))
    }

    pub fn set_axis(&mut self, control: ControlId, value: f32, relative: bool) -> bool {
        self.set(control, ControlValue::Axis { value, relative })
    }

    pub fn set_led(&mut self, control: ControlId, bits: u32) -> bool {
        self.set(control, ControlValue::Led(bits))
    }

    pub fn set_effect(&mut self, control: ControlId, value: f32) -> bool {
        self.set(control, ControlValue::Effect(value))
    }

    /// Thread-safe write handle for backends.
    pub fn sender(&self) -> UpdateSender {
        self.queue.sender()
    }

    /// Number of controls waiting for the next `update()`.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    fn apply_value(&mut self, control: ControlId, value: ControlValue) -> bool {
        self.controllers
            .get_mut(&control.controller())
            .and_then(|c| c.control_at_mut(control.index()))
            .is_some_and(|c| c.apply(value))
    }

    // ---------------------------------------------------------------------
    // Connections
    // ---------------------------------------------------------------------

    /// Connect `input` to the control named `output` on `controller`.
    ///
    /// Invalid requests are dropped and yield `None`; the reason is only logged.
    /// Use [`try_connect`](Self::try_connect) to get it back.
    pub fn connect(
        &mut self,
        controller: ControllerId,
        output: &str,
        input: ControlId,
        scale: f32,
    ) -> Option<ConnectionId> {
        match self.try_connect(controller, output, input, scale) {
            Ok(id) => Some(id),
            Err(err) => {
                debug!(%controller, output, ?input, %err, "connection rejected");
                None
            }
        }
    }

    pub fn try_connect(
        &mut self,
        controller: ControllerId,
        output: &str,
        input: ControlId,
        scale: f32,
    ) -> Result<ConnectionId, ConnectError> {
        let id = ConnectionId(self.next_connection);
        let connection = {
            let input_owner = self
                .controllers
                .get(&input.controller())
                .ok_or(ConnectError::MissingInput)?;
            let input_control = input_owner
                .control_at(input.index())
                .ok_or(ConnectError::MissingInput)?;
            let output_owner = self
                .controllers
                .get(&controller)
                .ok_or_else(|| ConnectError::MissingOutput(output.to_string()))?;
            let output_index = output_owner
                .control_index(output)
                .ok_or_else(|| ConnectError::MissingOutput(output.to_string()))?;
            let output_control = output_owner
                .control_at(output_index)
                .ok_or_else(|| ConnectError::MissingOutput(output.to_string()))?;

            Connection::validated(
                id,
                Endpoint {
                    id: input,
                    control: input_control,
                    owner: input_owner.kind(),
                },
                Endpoint {
                    id: ControlId::new(controller, output_index),
                    control: output_control,
                    owner: output_owner.kind(),
                },
                scale,
            )?
        };

        self.next_connection += 1;
        for side in [connection.input(), connection.output()] {
            if let Some(c) = self.controllers.get_mut(&side.controller()) {
                c.add_connection(id);
            }
        }
        self.connections.insert(id, connection);
        Ok(id)
    }

    /// Connect every control of `source` whose name starts with `input_prefix` to the
    /// control on `controller` named `output_prefix` + the rest of the name.
    ///
    /// Controls without a counterpart are skipped. Returns the number of connections made.
    pub fn connect_all(
        &mut self,
        controller: ControllerId,
        source: ControllerId,
        output_prefix: &str,
        input_prefix: &str,
    ) -> usize {
        let Some(source_controller) = self.controllers.get(&source) else {
            return 0;
        };
        let Some(target) = self.controllers.get(&controller) else {
            return 0;
        };
        let pairs: Vec<(String, ControlId)> = source_controller
            .controls()
            .iter()
            .enumerate()
            .filter_map(|(index, control)| {
                let rest = control.name().strip_prefix(input_prefix)?;
                let output = format!("{output_prefix}{rest}");
                target
                    .control_index(&output)
                    .map(|_| (output, ControlId::new(source, index)))
            })
            .collect();

        pairs
            .into_iter()
            .filter(|(output, input)| self.connect(controller, output, *input, 1.0).is_some())
            .count()
    }

    pub fn disconnect(&mut self, connection: ConnectionId) -> bool {
        self.drop_connection(connection).is_some()
    }

    fn drop_connection(&mut self, id: ConnectionId) -> Option<Connection> {
        let connection = self.connections.remove(&id)?;
        for side in [connection.input(), connection.output()] {
            if let Some(c) = self.controllers.get_mut(&side.controller()) {
                c.remove_connection(id);
            }
        }
        Some(connection)
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&id)
    }

    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Apply a binding profile with `target` as the output side.
    pub fn apply_profile(&mut self, target: ControllerId, profile: &BindingProfile) -> usize {
        profile.apply(self, target)
    }

    // ---------------------------------------------------------------------
    // Frame update
    // ---------------------------------------------------------------------

    /// Poll every backend, then dispatch every queued change once, in arrival order.
    ///
    /// Returns the number of controls dispatched.
    pub fn update(&mut self) -> usize {
        let ids: Vec<ControllerId> = self.controllers.keys().copied().collect();
        for id in ids {
            if let Some(controller) = self.controllers.get_mut(&id) {
                controller.poll_backend(id, &self.queue);
            }
        }

        let mut dispatched = 0;
        for (control, pending) in self.queue.drain() {
            let mut changed = pending.dirty;
            if let Some(value) = pending.value {
                changed |= self.apply_value(control, value);
            }
            if changed {
                self.inform_control(control);
                dispatched += 1;
            }
        }
        dispatched
    }

    /// Local bookkeeping for a changed control, then one hop along its connections.
    pub(crate) fn inform_control(&mut self, id: ControlId) {
        let Some(controller) = self.controllers.get_mut(&id.controller()) else {
            return;
        };
        let Some(control) = controller.control_at(id.index()) else {
            return;
        };
        let value = control.value();
        let kind = control.kind();
        let event = ControllerEvent::control_changed(id, controller.name(), control.name(), value);

        let active = controller.is_active();
        if active {
            controller.mark_changed();
        }
        if kind == ControlKind::Button {
            controller.capture_char(id.index());
        }
        if !kind.is_input() && !controller.push_output(id.index()) && controller.has_backend() {
            debug!(control = ?id, "backend did not accept output control");
        }
        let connections = controller.connections().to_vec();

        self.events.emit(&event);

        if !active {
            return;
        }
        for connection in connections {
            let Some(connection) = self.connections.get(&connection).copied() else {
                continue;
            };
            let (target, passed) = if connection.input() == id {
                (connection.output(), connection.pass_value(value))
            } else if connection.output() == id {
                (connection.input(), connection.pass_value_backwards(value))
            } else {
                continue;
            };
            let Some(passed) = passed else {
                continue;
            };
            let Some(receiver) = self.controllers.get_mut(&target.controller()) else {
                continue;
            };
            if !receiver.is_active() {
                continue;
            }
            if receiver
                .control_at_mut(target.index())
                .is_some_and(|c| c.apply(passed))
            {
                self.queue.mark_changed(target);
            }
        }
    }

    // ---------------------------------------------------------------------
    // Notifications and views
    // ---------------------------------------------------------------------

    pub fn events(&mut self) -> &mut ControllerEventBus {
        &mut self.events
    }

    /// Owned view of every controller's buttons and axes.
    pub fn snapshot(&self) -> Snapshot {
        let mut snapshot = Snapshot::default();
        for controller in self.controllers.values() {
            let mut state = ControllerState::default();
            for control in controller.controls() {
                match control.value() {
                    ControlValue::Button(pressed) => {
                        state.buttons.entry(control.name().to_string()).or_insert(pressed);
                    }
                    ControlValue::Axis { value, .. } => {
                        state.axes.entry(control.name().to_string()).or_insert(value);
                    }
                    ControlValue::Led(_) | ControlValue::Effect(_) => {}
                }
            }
            snapshot.0.insert(controller.name().to_string(), state);
        }
        snapshot
    }

    // ---------------------------------------------------------------------
    // Providers
    // ---------------------------------------------------------------------

    /// Register a provider. Names are unique; a duplicate is rejected.
    pub fn add_provider(&mut self, provider: impl Provider + 'static) -> bool {
        let name = provider.name().to_string();
        if self.providers.contains_key(&name) {
            warn!(provider = %name, "provider already registered");
            return false;
        }
        self.providers.insert(name, Box::new(provider));
        true
    }

    /// Unregister a provider together with every device it detected.
    pub fn remove_provider(&mut self, name: &str) -> bool {
        if self.providers.remove(name).is_none() {
            return false;
        }
        self.remove_provider_devices(name);
        true
    }

    pub fn providers(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    /// Run detection on every provider. With `reset`, each provider's devices are
    /// removed first so they are rebuilt from scratch.
    ///
    /// Returns the number of devices added.
    pub fn detect_devices(&mut self, reset: bool) -> usize {
        let names: Vec<String> = self.providers.keys().cloned().collect();
        let mut added = 0;
        for name in names {
            let Some(mut provider) = self.providers.remove(&name) else {
                continue;
            };
            if reset {
                self.remove_provider_devices(&name);
            }
            let mut detection = Detection::new(self, &name);
            provider.detect_devices(&mut detection);
            let found = detection.added();
            info!(provider = %name, added = found, "device detection finished");
            added += found;
            self.providers.insert(name, provider);
        }
        added
    }

    fn remove_provider_devices(&mut self, provider: &str) {
        let owned: Vec<ControllerId> = self
            .controllers
            .iter()
            .filter(|(_, c)| c.provider() == Some(provider))
            .map(|(id, _)| *id)
            .collect();
        for id in owned {
            self.remove_controller(id);
        }
    }
}

impl std::fmt::Debug for InputManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputManager")
            .field("controllers", &self.controllers.len())
            .field("connections", &self.connections.len())
            .field("providers", &self.providers.keys().collect::<Vec<_>>())
            .field("pending", &self.queue.len())
            .finish()
    }
}
