//! Integration tests for types

#[cfg(test)]
mod tests {
    use xscan_types::*;

    #[test]
    fn test_graph_scan_gate_constant_parses() {
        let min = ServiceVersion::parse(GRAPH_SCAN_MIN_VERSION).unwrap();
        assert!(ServiceVersion::parse("3.29.0").unwrap().at_least(&min));
        assert!(!ServiceVersion::parse("3.28.0").unwrap().at_least(&min));
    }

    #[test]
    fn test_version_info_payload() {
        let info: VersionInfo =
            serde_json::from_str(r#"{"version": "3.41.4", "revision": "a1b2"}"#).unwrap();
        let version = ServiceVersion::parse(&info.version).unwrap();
        assert_eq!(version.to_string(), "3.41.4");

        let info: VersionInfo = serde_json::from_str(r#"{"version": "3.41.4"}"#).unwrap();
        assert!(info.revision.is_none());
    }

    #[test]
    fn test_scan_response_sequence_roundtrips_through_json() {
        let responses = vec![ScanResponse {
            scan_id: "s1".into(),
            licenses: vec![License {
                key: "Apache-2.0".into(),
                ..License::default()
            }],
            ..ScanResponse::default()
        }];
        let json = serde_json::to_string(&responses).unwrap();
        let parsed: Vec<ScanResponse> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, responses);
    }

    #[test]
    fn test_threshold_display_and_zero() {
        assert!(Threshold::default().is_zero());
        let threshold = Threshold::new(0, 1, 1);
        assert!(!threshold.is_zero());
        assert_eq!(
            threshold.to_string(),
            "violations >= 0, vulnerabilities >= 1, licenses >= 1"
        );
    }

    #[test]
    fn test_ecosystem_manifests() {
        assert_eq!(Ecosystem::Npm.manifest_names(), &["package.json"]);
        assert!(Ecosystem::Gradle.manifest_names().contains(&"build.gradle.kts"));
        assert!(Ecosystem::Maven.is_multi_module());
        assert!(!Ecosystem::Npm.is_multi_module());
        assert_eq!(Ecosystem::Gradle.to_string(), "gradle");
    }
}
