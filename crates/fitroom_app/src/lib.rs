pub mod controller;
pub mod controls;

pub use controller::{AppController, ControllerError, ControllerEvent};
pub use controls::Controls;
