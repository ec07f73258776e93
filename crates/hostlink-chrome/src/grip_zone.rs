//! The grip zone: a band at the top of the surface where a press grabs the
//! window.

use std::cell::Cell;
use std::rc::Rc;

use hostlink_bridge::InboundDelivery;
use hostlink_config::ChromeConfig;

use crate::commands::GRIP_RESIZE;

/// Shared, runtime-mutable grip zone threshold.
///
/// Clones share the same height, so the gesture machine and its resize
/// listener see the same value.
#[derive(Debug, Clone, Default)]
pub struct GripZone {
    height: Rc<Cell<f64>>,
}

impl GripZone {
    pub fn new(height: f64) -> Self {
        Self {
            height: Rc::new(Cell::new(height)),
        }
    }

    pub fn from_config(config: &ChromeConfig) -> Self {
        Self::new(config.grip_zone_height)
    }

    pub fn height(&self) -> f64 {
        self.height.get()
    }

    /// Replace the threshold. Any value is accepted; a negative height
    /// disables grabbing.
    pub fn set_height(&self, height: f64) {
        self.height.set(height);
    }

    /// Whether a press at `y` lands in the zone. The bottom edge is inclusive.
    pub fn contains(&self, y: f64) -> bool {
        y <= self.height.get()
    }

    /// Payload of a `grip::resize` event moving the zone to `height`.
    pub fn resize_event_payload(height: f64) -> serde_json::Value {
        serde_json::Value::from(height)
    }
}

/// Host side: the delivery that moves a surface's grip zone to `height`.
pub fn grip_zone_resize_delivery(height: f64) -> InboundDelivery {
    InboundDelivery::event(GRIP_RESIZE, GripZone::resize_event_payload(height))
}
