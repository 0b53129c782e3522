//! Integration tests for config

#[cfg(test)]
mod tests {
    use arcade_config::*;
    use arcade_types::SingleFlight;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to ensure env var tests don't run concurrently
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        std::env::remove_var("ARCADE_CATALOG_URL");
        std::env::remove_var("ARCADE_DATA_DIR");
        std::env::remove_var("ARCADE_SINGLE_FLIGHT");
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.catalog.url, constants::DEFAULT_CATALOG_URL);
        assert_eq!(config.catalog.refresh_interval_secs, 60);
        assert!(config.catalog.retain_on_failure);
        assert_eq!(config.launcher.argument, "-AppCommandLineArg");
        assert_eq!(config.pipeline.single_flight, SingleFlight::Global);
        assert_eq!(config.pipeline.error_hide_delay_secs, 5);
        assert!(config.network.timeout.is_none());
    }

    #[tokio::test]
    async fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[catalog]
url = "http://localhost:9000/catalog.json"
refresh_interval_secs = 15
retain_on_failure = false

[paths]
data_dir = "/tmp/arcade-data"

[launcher]
argument = "-windowed"

[pipeline]
single_flight = "per_title"
        "#
        )
        .unwrap();

        let config = Config::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(config.catalog.url, "http://localhost:9000/catalog.json");
        assert_eq!(config.catalog.refresh_interval_secs, 15);
        assert!(!config.catalog.retain_on_failure);
        assert_eq!(config.launcher.argument, "-windowed");
        assert_eq!(config.pipeline.single_flight, SingleFlight::PerTitle);
        // unset sections keep their defaults
        assert_eq!(config.network.connect_timeout, 30);
        assert_eq!(
            config.apps_dir().unwrap(),
            PathBuf::from("/tmp/arcade-data/Apps")
        );
        assert_eq!(
            config.downloads_dir().unwrap(),
            PathBuf::from("/tmp/arcade-data/Downloads")
        );
    }

    #[tokio::test]
    async fn test_zero_refresh_interval_rejected() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[catalog]\nrefresh_interval_secs = 0").unwrap();
        assert!(Config::load_from_file(temp_file.path()).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let result = Config::load_from_file(std::path::Path::new("/nonexistent/arcade.toml")).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_explicit_apps_dir_wins() {
        let mut config = Config::default();
        config.paths.data_dir = Some(PathBuf::from("/data"));
        config.paths.apps_dir = Some(PathBuf::from("/games"));
        assert_eq!(config.apps_dir().unwrap(), PathBuf::from("/games"));
        assert_eq!(config.logs_dir().unwrap(), PathBuf::from("/data/logs"));
    }

    #[test]
    fn test_merge_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("ARCADE_CATALOG_URL", "http://mirror/catalog.json");
        std::env::set_var("ARCADE_DATA_DIR", "/srv/arcade");
        std::env::set_var("ARCADE_SINGLE_FLIGHT", "per_title");

        let mut config = Config::default();
        config.merge_env().unwrap();

        assert_eq!(config.catalog.url, "http://mirror/catalog.json");
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/srv/arcade"));
        assert_eq!(config.pipeline.single_flight, SingleFlight::PerTitle);

        clear_env();
    }

    #[test]
    fn test_invalid_env_value() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("ARCADE_SINGLE_FLIGHT", "sometimes");

        let mut config = Config::default();
        assert!(config.merge_env().is_err());

        clear_env();
    }
}
