//! Routes pointer input on one surface to its toolbar and gesture machine.

use hostlink_bridge::Bridge;
use hostlink_common::BridgeError;
use hostlink_config::ChromeConfig;

use crate::gesture::GestureMachine;
use crate::grip_zone::GripZone;
use crate::toolbar::{Toolbar, ToolbarSpec};

pub struct ChromeSurface {
    gesture: GestureMachine,
    toolbar: Option<Toolbar>,
}

impl ChromeSurface {
    pub fn new(bridge: &Bridge, config: &ChromeConfig) -> Self {
        Self {
            gesture: GestureMachine::new(bridge, GripZone::from_config(config)),
            toolbar: ToolbarSpec::from_config(config).map(|spec| Toolbar::new(bridge, spec)),
        }
    }

    pub fn gesture(&self) -> &GestureMachine {
        &self.gesture
    }

    pub fn toolbar(&self) -> Option<&Toolbar> {
        self.toolbar.as_ref()
    }

    /// A press on the header starts a window move, then bubbles to the
    /// gesture machine like any other press. The first failure is returned.
    pub fn pointer_down(&mut self, x: f64, y: f64, button: i16) -> Result<(), BridgeError> {
        let header = match &self.toolbar {
            Some(toolbar) if toolbar.hit(y) => toolbar.pointer_down(x, y),
            _ => Ok(()),
        };
        let gesture = self.gesture.pointer_down(x, y, button);
        header.and(gesture)
    }

    pub fn pointer_up(&mut self, button: i16) -> Result<(), BridgeError> {
        self.gesture.pointer_up(button)
    }

    pub fn pointer_leave(&mut self) -> Result<(), BridgeError> {
        self.gesture.pointer_leave()
    }

    pub fn pointer_move(&mut self, dx: f64, dy: f64) -> Result<(), BridgeError> {
        self.gesture.pointer_move(dx, dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{GRIP_GRAB, MOUSE_DOWN, WEBVIEW_MOVE_START};
    use hostlink_bridge::{BridgeOptions, MemoryTransport, OutboundEnvelope};

    fn surface(config: ChromeConfig) -> (ChromeSurface, MemoryTransport) {
        let outbox = MemoryTransport::new();
        let bridge = Bridge::new(outbox.clone(), BridgeOptions::default());
        (ChromeSurface::new(&bridge, &config), outbox)
    }

    fn command_names(outbox: &MemoryTransport) -> Vec<String> {
        outbox
            .take_envelopes()
            .unwrap()
            .into_iter()
            .filter_map(|env| match env {
                OutboundEnvelope::Command(msg) => Some(msg.id),
                OutboundEnvelope::Event(_) => None,
            })
            .collect()
    }

    #[test]
    fn header_press_moves_then_bubbles() {
        let (mut surface, outbox) = surface(ChromeConfig {
            toolbar_enabled: true,
            ..Default::default()
        });
        surface.pointer_down(5.0, 10.0, 0).unwrap();
        assert_eq!(
            command_names(&outbox),
            vec![WEBVIEW_MOVE_START, MOUSE_DOWN, GRIP_GRAB]
        );
    }

    #[test]
    fn press_below_header_skips_move() {
        let (mut surface, outbox) = surface(ChromeConfig {
            toolbar_enabled: true,
            toolbar_height: 20.0,
            grip_zone_height: 0.0,
            ..Default::default()
        });
        surface.pointer_down(5.0, 40.0, 0).unwrap();
        assert_eq!(command_names(&outbox), vec![MOUSE_DOWN]);
    }

    #[test]
    fn no_toolbar_when_disabled() {
        let (mut surface, outbox) = surface(ChromeConfig::default());
        assert!(surface.toolbar().is_none());
        surface.pointer_down(5.0, 1.0, 0).unwrap();
        assert_eq!(command_names(&outbox), vec![MOUSE_DOWN, GRIP_GRAB]);
    }

    #[test]
    fn secondary_press_on_header_still_moves() {
        let (mut surface, outbox) = surface(ChromeConfig {
            toolbar_enabled: true,
            ..Default::default()
        });
        surface.pointer_down(5.0, 1.0, 2).unwrap();
        assert_eq!(command_names(&outbox), vec![WEBVIEW_MOVE_START]);
    }
}
