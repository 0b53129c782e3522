//! Integration tests for platform crate

#[cfg(test)]
mod tests {
    use arcade_errors::{Error, PlatformError};
    use arcade_platform::*;
    use arcade_types::Platform;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_find_executable_first_by_name() {
        let temp = tempdir().unwrap();
        for name in ["zeta.bat", "alpha.bat", "readme.txt", "winver.json"] {
            std::fs::write(temp.path().join(name), "").unwrap();
        }

        let found = find_executable(temp.path(), Platform::Windows)
            .await
            .unwrap();
        assert_eq!(found.file_name().unwrap(), "alpha.bat");
    }

    #[tokio::test]
    async fn test_find_app_bundle_directory() {
        let temp = tempdir().unwrap();
        std::fs::create_dir_all(temp.path().join("Game.app/Contents")).unwrap();

        let found = find_executable(temp.path(), Platform::MacOs).await.unwrap();
        assert_eq!(found.file_name().unwrap(), "Game.app");
    }

    #[tokio::test]
    async fn test_find_executable_missing() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("game.exe"), "").unwrap();

        let error = find_executable(temp.path(), Platform::Windows)
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            Error::Platform(PlatformError::ExecutableNotFound { .. })
        ));

        // a missing directory reads the same way
        assert!(find_executable(&temp.path().join("absent"), Platform::Linux)
            .await
            .is_err());
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_native_launch_runs_in_install_dir() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("run.sh"), "echo \"$1\" > launched.txt\nexit 3\n").unwrap();

        let launcher = NativeLauncher::new(Platform::Linux);
        let mut process = launcher
            .launch(temp.path(), "-AppCommandLineArg")
            .await
            .unwrap();
        let code = process.wait().await.unwrap();

        assert_eq!(code, Some(3));
        assert_eq!(
            std::fs::read_to_string(temp.path().join("launched.txt")).unwrap(),
            "-AppCommandLineArg\n"
        );
        // killing an exited process is a no-op
        process.kill().await.unwrap();
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_native_kill() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("run.sh"), "sleep 30\n").unwrap();

        let mut process = NativeLauncher::new(Platform::Linux)
            .launch(temp.path(), "")
            .await
            .unwrap();
        process.kill().await.unwrap();
        process.kill().await.unwrap();

        let code = tokio::time::timeout(std::time::Duration::from_secs(5), process.wait())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(code, None);
    }
}
