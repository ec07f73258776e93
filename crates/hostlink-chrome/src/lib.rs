//! Window chrome built on the bridge: a grip zone that grabs the window, a
//! pointer gesture machine, and an optional toolbar header.

pub mod commands;
pub mod gesture;
pub mod grip_zone;
pub mod surface;
pub mod toolbar;

pub use commands::PointerPosition;
pub use gesture::{DragState, GestureMachine};
pub use grip_zone::{grip_zone_resize_delivery, GripZone};
pub use surface::ChromeSurface;
pub use toolbar::{Toolbar, ToolbarSpec};
