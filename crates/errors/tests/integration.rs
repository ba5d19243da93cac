//! Integration tests for error types

#[cfg(test)]
mod tests {
    use xscan_errors::*;

    #[test]
    fn test_error_conversion() {
        let net_err = NetworkError::Timeout {
            url: "https://scan.example.com".into(),
        };
        let err: Error = net_err.into();
        assert!(matches!(err, Error::Network(_)));

        let err: Error = ConfigError::MissingCredentials.into();
        assert!(matches!(err, Error::Config(ConfigError::MissingCredentials)));
    }

    #[test]
    fn test_error_display() {
        let err = AuthError::Rejected {
            url: "https://scan.example.com/".into(),
            status: 401,
        };
        assert_eq!(
            err.to_string(),
            "failed while attempting to authenticate with https://scan.example.com/: credentials rejected (HTTP 401)"
        );
    }

    #[test]
    fn test_shortfall_display() {
        let shortfall = ThresholdShortfall {
            kind: FindingKind::Violations,
            expected: 3,
            actual: 1,
        };
        assert_eq!(shortfall.deficit(), 2);
        assert_eq!(
            shortfall.to_string(),
            "expected at least 3 violations in scan results, but got 1 violations (short by 2)"
        );
    }

    #[test]
    fn test_below_threshold_lists_every_category() {
        let err = ValidationError::BelowThreshold {
            shortfalls: vec![
                ThresholdShortfall {
                    kind: FindingKind::Vulnerabilities,
                    expected: 1,
                    actual: 0,
                },
                ThresholdShortfall {
                    kind: FindingKind::Licenses,
                    expected: 2,
                    actual: 0,
                },
            ],
        };
        let message = err.to_string();
        assert!(message.contains("vulnerabilities"));
        assert!(message.contains("licenses"));
        assert!(err.shortfall(FindingKind::Licenses).is_some());
        assert!(err.shortfall(FindingKind::Violations).is_none());
    }

    #[test]
    fn test_user_facing_codes() {
        let err: Error = VersionError::FetchFailed {
            message: "connection refused".into(),
        }
        .into();
        assert_eq!(err.user_code(), Some("version.fetch_failed"));
        assert!(err.is_retryable());

        let err: Error = ValidationError::DataFormat {
            message: "expected value".into(),
        }
        .into();
        assert_eq!(err.user_code(), Some("validation.data_format"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_error_clone() {
        let err = OpsError::NoScanTargets {
            pattern: "dist/*".into(),
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
}
