//! Scan result validation
//!
//! Captured command output is a JSON array of scan responses. Only the first
//! response is checked against the threshold, and every count is a floor.

use xscan_errors::{FindingKind, ThresholdShortfall, ValidationError};
use xscan_types::{ScanResponse, ScanSummary, Threshold};

/// Parse captured output as a list of scan responses
///
/// # Errors
///
/// Returns `ValidationError::DataFormat` if the bytes are not a JSON array
/// of scan responses.
pub fn parse_scan_output(output: &[u8]) -> Result<Vec<ScanResponse>, ValidationError> {
    serde_json::from_slice(output).map_err(|e| ValidationError::DataFormat {
        message: e.to_string(),
    })
}

/// Check captured output against minimum finding counts
///
/// Returns the counts of the first response, or all zeros when the output
/// is an empty list and nothing was required.
///
/// # Errors
///
/// Returns `ValidationError::DataFormat` for unparsable output,
/// `ValidationError::NoResults` for an empty list when any floor is above
/// zero, and `ValidationError::BelowThreshold` listing every category that
/// fell short.
pub fn validate_scan(output: &[u8], threshold: &Threshold) -> Result<ScanSummary, ValidationError> {
    let responses = parse_scan_output(output)?;

    let Some(first) = responses.first() else {
        if threshold.is_zero() {
            return Ok(ScanSummary::default());
        }
        return Err(ValidationError::NoResults {
            min_violations: threshold.min_violations,
            min_vulnerabilities: threshold.min_vulnerabilities,
            min_licenses: threshold.min_licenses,
        });
    };

    let summary = first.summary();
    let shortfalls: Vec<ThresholdShortfall> = [
        (
            FindingKind::Violations,
            threshold.min_violations,
            summary.violations,
        ),
        (
            FindingKind::Vulnerabilities,
            threshold.min_vulnerabilities,
            summary.vulnerabilities,
        ),
        (FindingKind::Licenses, threshold.min_licenses, summary.licenses),
    ]
    .into_iter()
    .filter(|(_, expected, actual)| actual < expected)
    .map(|(kind, expected, actual)| ThresholdShortfall {
        kind,
        expected,
        actual,
    })
    .collect();

    if shortfalls.is_empty() {
        Ok(summary)
    } else {
        Err(ValidationError::BelowThreshold { shortfalls })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_OF_EACH: &str = r#"[{
        "scan_id": "a",
        "violations": [{"issue_id": "V1"}],
        "vulnerabilities": [{"issue_id": "X1"}],
        "licenses": [{"key": "MIT"}]
    }]"#;

    #[test]
    fn test_floor_not_equality() {
        let summary = validate_scan(ONE_OF_EACH.as_bytes(), &Threshold::new(0, 1, 1)).unwrap();
        assert_eq!(summary.violations, 1);

        assert!(validate_scan(ONE_OF_EACH.as_bytes(), &Threshold::new(1, 1, 1)).is_ok());
        assert!(validate_scan(ONE_OF_EACH.as_bytes(), &Threshold::new(0, 0, 0)).is_ok());
    }

    #[test]
    fn test_all_shortfalls_reported() {
        let err = validate_scan(ONE_OF_EACH.as_bytes(), &Threshold::new(2, 1, 3)).unwrap_err();

        let violations = err.shortfall(FindingKind::Violations).unwrap();
        assert_eq!((violations.expected, violations.actual), (2, 1));
        assert!(err.shortfall(FindingKind::Vulnerabilities).is_none());
        assert_eq!(err.shortfall(FindingKind::Licenses).unwrap().deficit(), 2);
    }

    #[test]
    fn test_only_first_response_counts() {
        let output = r#"[
            {"violations": []},
            {"violations": [{"issue_id": "V1"}, {"issue_id": "V2"}]}
        ]"#;
        let err = validate_scan(output.as_bytes(), &Threshold::new(1, 0, 0)).unwrap_err();
        assert_eq!(err.shortfall(FindingKind::Violations).unwrap().actual, 0);
    }

    #[test]
    fn test_empty_sequence_rules() {
        assert_eq!(
            validate_scan(b"[]", &Threshold::default()).unwrap(),
            ScanSummary::default()
        );
        assert!(matches!(
            validate_scan(b"[]", &Threshold::new(0, 0, 1)),
            Err(ValidationError::NoResults { min_licenses: 1, .. })
        ));
    }

    #[test]
    fn test_null_finding_arrays_count_as_zero() {
        let output = br#"[{"violations": null, "vulnerabilities": [{"issue_id": "X"}], "licenses": null}]"#;
        let summary = validate_scan(output, &Threshold::new(0, 1, 0)).unwrap();
        assert_eq!(summary.vulnerabilities, 1);

        let err = validate_scan(output, &Threshold::new(1, 1, 0)).unwrap_err();
        assert_eq!(err.shortfall(FindingKind::Violations).unwrap().actual, 0);
    }

    #[test]
    fn test_malformed_output_is_data_format_error() {
        let outputs: [&[u8]; 5] = [b"", b"   ", b"not json", b"{\"violations\": []}", b"[1, 2]"];
        for output in outputs {
            assert!(matches!(
                validate_scan(output, &Threshold::default()),
                Err(ValidationError::DataFormat { .. })
            ));
        }
    }
}
