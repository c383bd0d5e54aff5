pub const APP_DISPLAY_NAME: &str = "Custom Taskbar";

/// Directory name under the user's application-data directory.
pub const APP_DIR_NAME: &str = "CustomTaskbar";

pub const STARTUP_ENTRY_NAME: &str = "CustomTaskbar";

pub const LOG_FILE_PREFIX: &str = "custom_taskbar.log";
