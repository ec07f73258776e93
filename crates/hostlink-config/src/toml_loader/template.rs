//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Hostlink Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[bridge]
# invoke_timeout_ms = 30000               # 1-3600000, omit to wait forever
# entry_namespace = "window.__HOSTLINK__"

[chrome]
# grip_zone_height = 20.0                 # CSS px from the top edge
# toolbar_enabled = false
# toolbar_height = 20.0                   # 0-200
# toolbar_color = "#2b2b2b"

[logging]
# level = "INFO"                          # DEBUG, INFO, WARNING, ERROR
"##
    .to_string()
}
