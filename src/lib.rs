//! inputlink: a controller/control/connection input graph with a generic HID report model.
//!
//! Devices and virtual controllers are [`Controller`]s holding named, typed
//! [`Control`]s (buttons, axes, LEDs, effects). An [`InputManager`] owns them, routes
//! changes along scaled [`Connection`]s and dispatches each change once per
//! [`InputManager::update`].
//!
//! ```
//! use inputlink::devices::{keyboard, standard_controller};
//! use inputlink::{BindingProfile, InputManager};
//!
//! let mut input = InputManager::new();
//! let game = input.add_controller(standard_controller()).unwrap();
//! let kb = input.add_controller(keyboard()).unwrap();
//! input.apply_profile(game, &BindingProfile::standard());
//!
//! let w = input.control_id(kb, "W").unwrap();
//! input.set_pressed(w, true);
//! input.update();
//!
//! let forward = input.controller(game).and_then(|c| c.control("Forward")).unwrap();
//! assert!(forward.is_pressed());
//! ```
//!
//! HID devices are described by capability tables ([`hid::HidCapability`]) parsed from
//! their report descriptors; [`backends::HidJoystick`] maps decoded reports onto a
//! joystick controller.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod backends;
pub mod binding;
pub mod config;
pub mod connection;
pub mod control;
pub mod controller;
pub mod device;
pub mod devices;
pub mod error;
pub mod event;
pub mod eventbus;
pub mod filtered_listener;
pub mod hid;
pub mod logger;
pub mod manager;
pub mod metadata;
pub mod provider;
pub mod queue;
pub mod snapshot;

pub use binding::*;
pub use config::*;
pub use connection::*;
pub use control::*;
pub use controller::*;
pub use device::*;
pub use error::*;
pub use event::*;
pub use eventbus::*;
pub use filtered_listener::*;
pub use logger::*;
pub use manager::*;
pub use metadata::*;
pub use provider::*;
pub use queue::*;
pub use snapshot::*;
