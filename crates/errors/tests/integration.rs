//! Integration tests for error types

#[cfg(test)]
mod tests {
    use arcade_errors::*;

    #[test]
    fn test_error_conversion() {
        let net_err = NetworkError::Timeout {
            url: "https://example.com".into(),
        };
        let err: Error = net_err.into();
        assert!(matches!(err, Error::Network(_)));
    }

    #[test]
    fn test_error_display() {
        let err = CatalogError::TitleNotFound { id: "g1".into() };
        assert_eq!(err.to_string(), "title not found: g1");
    }

    #[test]
    fn test_error_clone() {
        let err = InstallError::ExtractionFailed {
            message: "bad header".into(),
        };
        let cloned = err.clone();
        assert_eq!(err.to_string(), cloned.to_string());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "test");
        let err: Error = io_err.into();
        assert!(matches!(
            err,
            Error::Io {
                kind: std::io::ErrorKind::PermissionDenied,
                ..
            }
        ));
    }

    #[test]
    fn test_user_codes() {
        let err: Error = PlatformError::ExecutableNotFound {
            dir: "/tmp/g1".into(),
            extension: ".sh".into(),
        }
        .into();
        assert_eq!(err.user_code(), Some("platform.executable_not_found"));
        assert!(!err.is_retryable());

        assert_eq!(Error::Cancelled.user_code(), Some("error.cancelled"));
        assert!(Error::Cancelled.is_cancelled());
    }
}
