//! Trace replay: feed recorded pointer activity and host deliveries through a
//! real bridge and chrome surface, printing every envelope the surface posts.
//!
//! A trace is JSON lines. Blank lines and lines starting with `#` are skipped.
//!
//! ```text
//! {"step":"pointer_down","x":4,"y":5,"button":0}
//! {"step":"pointer_move","dx":3,"dy":-1}
//! {"step":"pointer_leave"}
//! {"step":"resize","height":48}
//! {"step":"deliver","frame":{"kind":"event","event_id":"grip::resize","payload":10}}
//! ```

use std::io::Write;

use hostlink_bridge::{Bridge, BridgeOptions, InboundDelivery, LoopbackHost, MemoryTransport};
use hostlink_chrome::{grip_zone_resize_delivery, ChromeSurface};
use hostlink_common::HostlinkError;
use hostlink_config::HostlinkConfig;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    PointerDown {
        x: f64,
        y: f64,
        #[serde(default)]
        button: i16,
    },
    PointerUp {
        #[serde(default)]
        button: i16,
    },
    PointerLeave,
    PointerMove {
        dx: f64,
        dy: f64,
    },
    Resize {
        height: f64,
    },
    Deliver {
        frame: InboundDelivery,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub steps: usize,
    pub envelopes: usize,
    /// Deliveries that matched no pending command or listener.
    pub unmatched: usize,
}

pub fn parse_step(line: &str, line_no: usize) -> Result<Step, HostlinkError> {
    serde_json::from_str(line)
        .map_err(|e| HostlinkError::Other(format!("trace line {line_no}: {e}")))
}

/// Run `trace` against a fresh bridge and write posted envelopes to `out`.
///
/// Commands are answered with `{"Ok":null}` so nothing stays pending.
pub fn run(
    trace: &str,
    config: &HostlinkConfig,
    out: &mut impl Write,
) -> Result<ReplaySummary, HostlinkError> {
    let outbox = MemoryTransport::new();
    let bridge = Bridge::new(outbox.clone(), BridgeOptions::from(&config.bridge));
    let mut surface = ChromeSurface::new(&bridge, &config.chrome);
    let mut host = LoopbackHost::new(outbox).with_fallback(|_| Ok(Value::Null));
    let mut summary = ReplaySummary::default();

    for (index, line) in trace.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let step = parse_step(line, index + 1)?;
        debug!(line = index + 1, ?step, "replaying");

        let matched = match step {
            Step::PointerDown { x, y, button } => surface.pointer_down(x, y, button).map(|_| true)?,
            Step::PointerUp { button } => surface.pointer_up(button).map(|_| true)?,
            Step::PointerLeave => surface.pointer_leave().map(|_| true)?,
            Step::PointerMove { dx, dy } => surface.pointer_move(dx, dy).map(|_| true)?,
            Step::Resize { height } => bridge.deliver(grip_zone_resize_delivery(height)),
            Step::Deliver { frame } => bridge.deliver(frame),
        };
        if !matched {
            summary.unmatched += 1;
        }
        summary.steps += 1;

        host.pump(&bridge)?;
        for raw in host.take_transcript() {
            writeln!(out, "{raw}")?;
            summary.envelopes += 1;
        }
    }

    bridge.shutdown();
    info!(
        steps = summary.steps,
        envelopes = summary.envelopes,
        unmatched = summary.unmatched,
        "replay finished"
    );
    Ok(summary)
}
