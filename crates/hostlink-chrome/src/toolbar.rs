//! Fixed toolbar header that starts a native window move on press.
//!
//! The header sits above the page content. A press anywhere on it issues
//! `mouse::webview_move_start` regardless of the grip zone.

use hostlink_bridge::Bridge;
use hostlink_common::BridgeError;
use hostlink_config::ChromeConfig;
use tracing::debug;

use crate::commands::{PointerPosition, WEBVIEW_MOVE_START};

const INSTALL_TEMPLATE: &str = r#";(() => {
    window.addEventListener('DOMContentLoaded', () => {
        const root = document.createElement('div');
        root.style.position = 'absolute';
        document.body.parentElement.insertBefore(root, document.body);
        document.body.style.position = 'relative';
        document.body.style.top = __HEIGHT__;

        const header = document.createElement('header');
        header.onmousedown = (e) => {
            __NAMESPACE__.invoke(__COMMAND__, { x: e.clientX, y: e.clientY });
        };
        header.style.height = __HEIGHT__;
        header.style.background = __COLOR__;
        header.style.width = '100%';
        header.style.position = 'fixed';
        header.style.top = '0';
        header.style.zIndex = 'calc(infinity)';

        root.appendChild(header);
        root.appendChild(document.body);
    });
})();"#;

#[derive(Debug, Clone, PartialEq)]
pub struct ToolbarSpec {
    pub height: f64,
    pub color: String,
}

impl ToolbarSpec {
    /// `None` when the toolbar is disabled.
    pub fn from_config(config: &ChromeConfig) -> Option<Self> {
        config.toolbar_enabled.then(|| Self {
            height: config.toolbar_height,
            color: config.toolbar_color.clone(),
        })
    }
}

pub struct Toolbar {
    bridge: Bridge,
    spec: ToolbarSpec,
}

impl Toolbar {
    pub fn new(bridge: &Bridge, spec: ToolbarSpec) -> Self {
        Self {
            bridge: bridge.clone(),
            spec,
        }
    }

    pub fn spec(&self) -> &ToolbarSpec {
        &self.spec
    }

    /// Whether `y` falls on the header.
    pub fn hit(&self, y: f64) -> bool {
        (0.0..self.spec.height).contains(&y)
    }

    /// A press on the header. Any button starts the move.
    pub fn pointer_down(&self, x: f64, y: f64) -> Result<(), BridgeError> {
        debug!(x, y, "toolbar pressed");
        self.bridge
            .invoke_detached(WEBVIEW_MOVE_START, Some(PointerPosition::new(x, y).to_value()))?;
        Ok(())
    }

    /// Script that builds the header and wires it to the bridge's entry object.
    pub fn install_script(&self) -> String {
        INSTALL_TEMPLATE
            .replace("__NAMESPACE__", self.bridge.entry_namespace())
            .replace("__COMMAND__", &js_string(WEBVIEW_MOVE_START))
            .replace("__HEIGHT__", &js_string(&format!("{}px", self.spec.height)))
            .replace("__COLOR__", &js_string(&self.spec.color))
    }
}

fn js_string(text: &str) -> String {
    serde_json::Value::from(text).to_string()
}
