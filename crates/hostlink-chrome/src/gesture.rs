//! Pointer gesture state machine for custom window chrome.
//!
//! Translates raw pointer activity on the surface into host commands:
//!
//! ```text
//! Idle --down(primary)--> PointerDown   mouse::down, plus grip::grab when y is in the grip zone
//! any --up(primary)--> Idle             mouse::up, then the grip::release event
//! PointerDown --leave--> Idle           mouse::up
//! PointerDown --move--> PointerDown     grip::drag event with the delta
//! ```
//!
//! Commands are sent detached: pointer handlers never wait for the host.

use hostlink_bridge::{Bridge, Subscription};
use hostlink_common::BridgeError;
use tracing::{debug, trace};

use crate::commands::{
    PointerPosition, GRIP_DRAG, GRIP_GRAB, GRIP_RELEASE, GRIP_RESIZE, MOUSE_DOWN, MOUSE_UP,
    PRIMARY_BUTTON,
};
use crate::grip_zone::GripZone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    PointerDown,
}

pub struct GestureMachine {
    bridge: Bridge,
    grip: GripZone,
    state: DragState,
    resize: Subscription,
}

impl GestureMachine {
    /// Attach to `bridge` and start following `grip::resize` events.
    pub fn new(bridge: &Bridge, grip: GripZone) -> Self {
        let target = grip.clone();
        let resize = bridge.listen_as::<f64>(GRIP_RESIZE, move |height| {
            debug!(height, "grip zone resized");
            target.set_height(height);
        });
        Self {
            bridge: bridge.clone(),
            grip,
            state: DragState::Idle,
            resize,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn grip_zone(&self) -> &GripZone {
        &self.grip
    }

    /// A button was pressed at `(x, y)`.
    pub fn pointer_down(&mut self, x: f64, y: f64, button: i16) -> Result<(), BridgeError> {
        if button != PRIMARY_BUTTON {
            trace!(button, "non-primary press ignored");
            return Ok(());
        }
        self.state = DragState::PointerDown;
        self.bridge.invoke_detached(MOUSE_DOWN, None)?;

        if self.grip.contains(y) {
            let position = PointerPosition::new(x, y);
            debug!(x, y, height = self.grip.height(), "grip zone grabbed");
            self.bridge.invoke_detached(GRIP_GRAB, Some(position.to_value()))?;
        }
        Ok(())
    }

    /// A button was released. A primary release also tells the host the
    /// grip is let go; leaving the surface does not.
    pub fn pointer_up(&mut self, button: i16) -> Result<(), BridgeError> {
        if button != PRIMARY_BUTTON {
            trace!(button, "non-primary release ignored");
            return Ok(());
        }
        self.release()?;
        self.bridge.emit(GRIP_RELEASE, &serde_json::Value::Null)
    }

    /// The pointer left the surface. Releases only a press in progress.
    pub fn pointer_leave(&mut self) -> Result<(), BridgeError> {
        match self.state {
            DragState::PointerDown => self.release(),
            DragState::Idle => Ok(()),
        }
    }

    /// The pointer moved by `(dx, dy)`. Forwarded only while pressed.
    pub fn pointer_move(&mut self, dx: f64, dy: f64) -> Result<(), BridgeError> {
        if self.state == DragState::Idle {
            return Ok(());
        }
        self.bridge.emit(GRIP_DRAG, &PointerPosition::new(dx, dy))
    }

    fn release(&mut self) -> Result<(), BridgeError> {
        self.state = DragState::Idle;
        self.bridge.invoke_detached(MOUSE_UP, None)?;
        Ok(())
    }
}

impl Drop for GestureMachine {
    fn drop(&mut self) {
        self.resize.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostlink_bridge::{BridgeOptions, MemoryTransport, OutboundEnvelope};
    use hostlink_common::TransportError;
    use serde_json::json;

    fn setup(threshold: f64) -> (GestureMachine, Bridge, MemoryTransport) {
        let outbox = MemoryTransport::new();
        let bridge = Bridge::new(outbox.clone(), BridgeOptions::default());
        let machine = GestureMachine::new(&bridge, GripZone::new(threshold));
        (machine, bridge, outbox)
    }

    /// Drain the outbox as `(name, decoded args or payload)` pairs.
    fn sent(outbox: &MemoryTransport) -> Vec<(String, Option<serde_json::Value>)> {
        outbox
            .take_envelopes()
            .unwrap()
            .into_iter()
            .map(|env| match env {
                OutboundEnvelope::Command(msg) => {
                    let args = msg.decoded_args().unwrap();
                    (msg.id, args)
                }
                OutboundEnvelope::Event(msg) => {
                    let payload = msg.decoded_payload().unwrap();
                    (msg.event_id, Some(payload))
                }
            })
            .collect()
    }

    fn names(outbox: &MemoryTransport) -> Vec<String> {
        sent(outbox).into_iter().map(|(name, _)| name).collect()
    }

    #[test]
    fn press_in_grip_zone_grabs() {
        let (mut machine, _bridge, outbox) = setup(10.0);
        machine.pointer_down(7.0, 5.0, 0).unwrap();

        assert_eq!(
            sent(&outbox),
            vec![
                (MOUSE_DOWN.to_string(), None),
                (GRIP_GRAB.to_string(), Some(json!({"x": 7.0, "y": 5.0}))),
            ]
        );
        assert_eq!(machine.state(), DragState::PointerDown);
    }

    #[test]
    fn press_below_grip_zone_only_reports_down() {
        let (mut machine, _bridge, outbox) = setup(10.0);
        machine.pointer_down(7.0, 50.0, 0).unwrap();
        assert_eq!(names(&outbox), vec![MOUSE_DOWN]);
    }

    #[test]
    fn leave_releases_exactly_once() {
        let (mut machine, _bridge, outbox) = setup(10.0);
        machine.pointer_down(7.0, 50.0, 0).unwrap();
        outbox.take_all();

        machine.pointer_leave().unwrap();
        assert_eq!(names(&outbox), vec![MOUSE_UP]);
        assert_eq!(machine.state(), DragState::Idle);

        machine.pointer_leave().unwrap();
        assert!(outbox.is_empty());
    }

    #[test]
    fn resize_event_moves_the_threshold() {
        let (mut machine, bridge, outbox) = setup(10.0);
        assert!(bridge.emit_delivery("grip::resize", "100").unwrap());
        assert_eq!(machine.grip_zone().height(), 100.0);

        machine.pointer_down(7.0, 50.0, 0).unwrap();
        assert_eq!(names(&outbox), vec![MOUSE_DOWN, GRIP_GRAB]);
    }

    #[test]
    fn resize_accepts_negative_heights() {
        let (mut machine, bridge, outbox) = setup(10.0);
        bridge.emit_delivery("grip::resize", "-1").unwrap();
        machine.pointer_down(0.0, 0.0, 0).unwrap();
        assert_eq!(names(&outbox), vec![MOUSE_DOWN]);
    }

    #[test]
    fn non_primary_buttons_are_ignored() {
        let (mut machine, _bridge, outbox) = setup(10.0);
        machine.pointer_down(1.0, 1.0, 2).unwrap();
        assert_eq!(machine.state(), DragState::Idle);

        machine.pointer_down(1.0, 50.0, 0).unwrap();
        outbox.take_all();
        machine.pointer_up(1).unwrap();
        assert!(outbox.is_empty());
        assert_eq!(machine.state(), DragState::PointerDown);
    }

    #[test]
    fn primary_up_always_reports_release() {
        let (mut machine, _bridge, outbox) = setup(10.0);
        machine.pointer_up(0).unwrap();
        assert_eq!(
            sent(&outbox),
            vec![
                (MOUSE_UP.to_string(), None),
                (GRIP_RELEASE.to_string(), Some(json!(null))),
            ]
        );
        assert_eq!(machine.state(), DragState::Idle);
    }

    #[test]
    fn grab_then_primary_up_releases_the_grip() {
        let (mut machine, bridge, outbox) = setup(10.0);
        machine.pointer_down(2.0, 3.0, 0).unwrap();
        machine.pointer_up(0).unwrap();

        assert_eq!(names(&outbox), vec![MOUSE_DOWN, GRIP_GRAB, MOUSE_UP, GRIP_RELEASE]);
        // The release is an event: only the three commands wait on the host.
        assert_eq!(bridge.pending_count(), 3);
    }

    #[test]
    fn moves_are_forwarded_only_while_pressed() {
        let (mut machine, _bridge, outbox) = setup(10.0);
        machine.pointer_move(3.0, -2.0).unwrap();
        assert!(outbox.is_empty());

        machine.pointer_down(0.0, 50.0, 0).unwrap();
        outbox.take_all();
        machine.pointer_move(3.0, -2.0).unwrap();
        assert_eq!(
            sent(&outbox),
            vec![(GRIP_DRAG.to_string(), Some(json!({"x": 3.0, "y": -2.0})))]
        );
    }

    #[test]
    fn commands_are_tracked_until_the_host_answers() {
        let (mut machine, bridge, _outbox) = setup(10.0);
        machine.pointer_down(0.0, 0.0, 0).unwrap();
        assert_eq!(bridge.pending_count(), 2);
    }

    #[test]
    fn transport_failure_surfaces_but_state_advances() {
        let (mut machine, _bridge, outbox) = setup(10.0);
        outbox.set_failure(Some(TransportError::Closed));
        assert!(machine.pointer_down(0.0, 0.0, 0).is_err());
        assert_eq!(machine.state(), DragState::PointerDown);
    }

    #[test]
    fn drop_stops_following_resize() {
        let (machine, bridge, _outbox) = setup(10.0);
        let zone = machine.grip_zone().clone();
        drop(machine);

        assert!(!bridge.emit_delivery("grip::resize", "100").unwrap());
        assert_eq!(zone.height(), 10.0);
    }
}
