//! Drives the chrome end to end through a bridge and an in-process host.

use std::cell::RefCell;
use std::rc::Rc;

use hostlink_bridge::{Bridge, BridgeOptions, LoopbackHost, MemoryTransport};
use hostlink_chrome::commands::{GRIP_DRAG, GRIP_GRAB, GRIP_RELEASE, MOUSE_DOWN, MOUSE_UP};
use hostlink_chrome::{grip_zone_resize_delivery, ChromeSurface, DragState};
use hostlink_config::ChromeConfig;
use serde_json::{json, Value};

fn setup(grip_zone_height: f64) -> (ChromeSurface, Bridge, LoopbackHost, Rc<RefCell<Vec<String>>>) {
    let outbox = MemoryTransport::new();
    let bridge = Bridge::new(outbox.clone(), BridgeOptions::default());
    let config = ChromeConfig {
        grip_zone_height,
        ..Default::default()
    };
    let surface = ChromeSurface::new(&bridge, &config);

    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut host = LoopbackHost::new(outbox);
    for name in [MOUSE_DOWN, MOUSE_UP, GRIP_GRAB] {
        let log = Rc::clone(&seen);
        host.on_command(name, move |_| {
            log.borrow_mut().push(name.to_string());
            Ok(Value::Null)
        });
    }
    (surface, bridge, host, seen)
}

#[test]
fn grab_then_release_drains_the_table() {
    let (mut surface, bridge, mut host, seen) = setup(10.0);

    surface.pointer_down(4.0, 5.0, 0).unwrap();
    surface.pointer_leave().unwrap();
    surface.pointer_leave().unwrap();
    host.pump(&bridge).unwrap();

    assert_eq!(*seen.borrow(), vec![MOUSE_DOWN, GRIP_GRAB, MOUSE_UP]);
    assert_eq!(bridge.pending_count(), 0);
    assert_eq!(surface.gesture().state(), DragState::Idle);
}

#[test]
fn host_resize_widens_the_grip_zone() {
    let (mut surface, bridge, mut host, seen) = setup(10.0);

    surface.pointer_down(4.0, 50.0, 0).unwrap();
    surface.pointer_up(0).unwrap();
    assert!(bridge.deliver(grip_zone_resize_delivery(100.0)));
    surface.pointer_down(4.0, 50.0, 0).unwrap();
    host.pump(&bridge).unwrap();

    assert_eq!(
        *seen.borrow(),
        vec![MOUSE_DOWN, MOUSE_UP, MOUSE_DOWN, GRIP_GRAB]
    );
}

#[test]
fn drag_deltas_reach_the_host_as_events() {
    let (mut surface, bridge, mut host, _) = setup(10.0);

    surface.pointer_down(0.0, 0.0, 0).unwrap();
    surface.pointer_move(5.0, 1.0).unwrap();
    surface.pointer_up(0).unwrap();
    surface.pointer_move(9.0, 9.0).unwrap();
    host.pump(&bridge).unwrap();

    let events = host.take_events();
    let ids: Vec<&str> = events.iter().map(|e| e.event_id.as_str()).collect();
    assert_eq!(ids, vec![GRIP_DRAG, GRIP_RELEASE]);
    assert_eq!(events[0].decoded_payload().unwrap(), json!({"x": 5.0, "y": 1.0}));
    assert_eq!(events[1].decoded_payload().unwrap(), Value::Null);
}

#[test]
fn host_errors_do_not_disturb_the_gesture() {
    let outbox = MemoryTransport::new();
    let bridge = Bridge::new(outbox.clone(), BridgeOptions::default());
    let mut surface = ChromeSurface::new(&bridge, &ChromeConfig::default());
    let mut host = LoopbackHost::new(outbox).with_fallback(|_| Err(json!("not supported")));

    surface.pointer_down(0.0, 0.0, 0).unwrap();
    host.pump(&bridge).unwrap();

    assert_eq!(bridge.pending_count(), 0);
    assert_eq!(surface.gesture().state(), DragState::PointerDown);
}
