//! Factories for the common controller layouts.
//!
//! Each function returns an unregistered [`Controller`](crate::controller::Controller)
//! populated with named controls. Attach a backend with
//! [`Controller::with_backend`](crate::controller::Controller::with_backend) and register
//! it on an [`InputManager`](crate::manager::InputManager).

pub mod joystick;
pub mod keyboard;
pub mod mouse;
pub mod space_mouse;
pub mod standard;
pub mod wiimote;

pub use joystick::joystick;
pub use keyboard::{key_for_vkey, keyboard, Key, KEYS};
pub use mouse::mouse;
pub use space_mouse::space_mouse;
pub use standard::{standard_controller, STANDARD_CONTROLLER};
pub use wiimote::wiimote;
