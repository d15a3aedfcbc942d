pub mod ui_plugin;
pub mod wheel_plugin;
