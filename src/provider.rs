//! Device providers.
//!
//! A provider knows one source of devices (a HID bus, the OS raw-input layer, a test
//! script) and registers a device controller for each one it finds. Providers are
//! registered on the [`InputManager`] under a unique name and run through
//! [`InputManager::detect_devices`].

use crate::control::ControlId;
use crate::controller::{Controller, ControllerId};
use crate::manager::InputManager;
use crate::queue::UpdateSender;

pub trait Provider {
    /// Unique registry name.
    fn name(&self) -> &str;

    /// Register any devices not registered yet.
    ///
    /// Devices kept from an earlier run (no reset) are visible through
    /// [`Detection::has_device`], so a provider can skip them.
    fn detect_devices(&mut self, detection: &mut Detection<'_>);
}

/// Registration context handed to [`Provider::detect_devices`].
pub struct Detection<'a> {
    manager: &'a mut InputManager,
    provider: String,
    added: usize,
}

impl<'a> Detection<'a> {
    pub(crate) fn new(manager: &'a mut InputManager, provider: &str) -> Self {
        Self {
            manager,
            provider: provider.to_string(),
            added: 0,
        }
    }

    /// `true` if a controller with this name is already registered.
    pub fn has_device(&self, name: &str) -> bool {
        self.manager.controller_id(name).is_some()
    }

    /// Register a device controller on behalf of the provider.
    ///
    /// Returns `None` if the name is taken.
    pub fn add_device(&mut self, mut controller: Controller) -> Option<ControllerId> {
        controller.set_provider(&self.provider);
        let id = self.manager.add_controller(controller)?;
        self.added += 1;
        Some(id)
    }

    /// Unregister a device this provider added earlier. Devices of other providers
    /// and virtual controllers are left alone.
    pub fn remove_device(&mut self, name: &str) -> bool {
        let Some(id) = self.manager.controller_id(name) else {
            return false;
        };
        let owned = self
            .manager
            .controller(id)
            .is_some_and(|c| c.provider() == Some(self.provider.as_str()));
        owned && self.manager.remove_controller(id).is_some()
    }

    pub fn control_id(&self, controller: ControllerId, name: &str) -> Option<ControlId> {
        self.manager.control_id(controller, name)
    }

    /// Thread-safe write handle, for backends fed from another thread.
    pub fn sender(&self) -> UpdateSender {
        self.manager.sender()
    }

    pub(crate) fn added(&self) -> usize {
        self.added
    }
}
