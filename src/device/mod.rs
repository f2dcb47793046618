//! # Device Services
//!
//! Camera permission and image picking, behind traits so the controller and
//! tests never depend on real hardware.

pub mod permissions;
pub mod picker;

pub use permissions::{DevicePermissions, PermissionError, PermissionGate, PermissionStatus};
pub use picker::{
    Asset, CommandPicker, ImagePicker, ImageSource, MediaType, PickError, PickerOptions,
    PickerResponse, load_asset,
};
