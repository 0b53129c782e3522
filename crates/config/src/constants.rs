//! Fixed values that are not exposed through TOML configuration

/// Directory name under the platform data dir
pub const APP_DIR_NAME: &str = "arcade";

/// Installed titles live under `<data>/Apps/<title id>/`
pub const APPS_DIR_NAME: &str = "Apps";

/// Archives are staged under `<data>/Downloads/`
pub const DOWNLOADS_DIR_NAME: &str = "Downloads";

pub const LOGS_DIR_NAME: &str = "logs";

pub const CONFIG_FILE_NAME: &str = "config.toml";

pub const DEFAULT_CATALOG_URL: &str = "http://cuderoger.tecwolf.com.br/launcher/experiences.json";

pub const DEFAULT_LAUNCH_ARGUMENT: &str = "-AppCommandLineArg";
