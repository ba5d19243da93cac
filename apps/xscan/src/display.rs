//! Output rendering and formatting

use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use console::{Style, Term};
use std::io::{self, Write};
use xscan_harness::VerifyOutcome;
use xscan_ops::{OperationResult, ServerInfo};
use xscan_types::{ColorChoice, OutputFormat, ScanResponse, Severity};

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    format: OutputFormat,
    color_choice: ColorChoice,
    term: Term,
}

impl OutputRenderer {
    /// Create new output renderer
    pub fn new(format: OutputFormat, color_choice: ColorChoice) -> Self {
        Self {
            format,
            color_choice,
            term: Term::stdout(),
        }
    }

    /// Render operation result
    pub fn render_result(&self, result: &OperationResult, out: &mut dyn Write) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                let json = result.to_json().map_err(io::Error::other)?;
                writeln!(out, "{json}")
            }
            OutputFormat::Table => match result {
                OperationResult::ScanResults(results) => self.render_scan_results(results, out),
                OperationResult::ServerInfo(info) => self.render_server_info(info, out),
            },
        }
    }

    /// Render the outcome of a verification run
    pub fn render_verify(&self, outcome: &VerifyOutcome, out: &mut dyn Write) -> io::Result<()> {
        match outcome {
            VerifyOutcome::Passed { summary, .. } => {
                let label = self.styled("[OK]", &Style::new().green().bold());
                writeln!(out, "{label} Verification passed: {summary}")
            }
            VerifyOutcome::Skipped { reason } => {
                let label = self.styled("[SKIP]", &Style::new().yellow().bold());
                writeln!(out, "{label} {reason}")
            }
        }
    }

    fn render_scan_results(&self, results: &[ScanResponse], out: &mut dyn Write) -> io::Result<()> {
        if results.is_empty() {
            writeln!(out, "No scan results.")?;
            return Ok(());
        }

        let mut table = self.new_table();
        table.set_header(vec![
            Cell::new("Scan ID").add_attribute(Attribute::Bold),
            Cell::new("Violations").add_attribute(Attribute::Bold),
            Cell::new("Vulnerabilities").add_attribute(Attribute::Bold),
            Cell::new("Licenses").add_attribute(Attribute::Bold),
        ]);
        for result in results {
            let summary = result.summary();
            table.add_row(vec![
                Cell::new(if result.scan_id.is_empty() {
                    "-"
                } else {
                    result.scan_id.as_str()
                }),
                Cell::new(summary.violations),
                Cell::new(summary.vulnerabilities),
                Cell::new(summary.licenses),
            ]);
        }
        writeln!(out, "{table}")?;

        let findings: Vec<(&str, Severity, &str, &str)> = results
            .iter()
            .flat_map(|result| {
                let violations = result
                    .violations
                    .iter()
                    .map(|v| (v.issue_id.as_str(), v.severity, "violation", v.summary.as_str()));
                let vulnerabilities = result.vulnerabilities.iter().map(|v| {
                    (
                        v.issue_id.as_str(),
                        v.severity,
                        "vulnerability",
                        v.summary.as_str(),
                    )
                });
                violations.chain(vulnerabilities)
            })
            .collect();

        if !findings.is_empty() {
            let mut table = self.new_table();
            table.set_header(vec![
                Cell::new("Issue").add_attribute(Attribute::Bold),
                Cell::new("Severity").add_attribute(Attribute::Bold),
                Cell::new("Kind").add_attribute(Attribute::Bold),
                Cell::new("Summary").add_attribute(Attribute::Bold),
            ]);
            for (issue, severity, kind, summary) in findings {
                table.add_row(vec![
                    Cell::new(issue),
                    Self::format_severity(severity),
                    Cell::new(kind),
                    Cell::new(if summary.is_empty() { "-" } else { summary }),
                ]);
            }
            writeln!(out)?;
            writeln!(out, "{table}")?;
        }

        Ok(())
    }

    fn render_server_info(&self, info: &ServerInfo, out: &mut dyn Write) -> io::Result<()> {
        let url = self.styled(&info.url, &Style::new().bold());
        writeln!(out, "Scan service: {url}")?;
        writeln!(out, "Version: {}", info.version)
    }

    fn new_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        match self.color_choice {
            ColorChoice::Always => {
                table.enforce_styling();
            }
            ColorChoice::Never => {
                table.force_no_tty();
            }
            ColorChoice::Auto => {}
        }
        table
    }

    fn format_severity(severity: Severity) -> Cell {
        let cell = Cell::new(severity);
        match severity {
            Severity::Critical => cell.fg(Color::Red).add_attribute(Attribute::Bold),
            Severity::High => cell.fg(Color::Red),
            Severity::Medium => cell.fg(Color::Yellow),
            Severity::Low => cell.fg(Color::Green),
            Severity::Unknown => cell,
        }
    }

    fn styled(&self, text: &str, style: &Style) -> String {
        if self.supports_color() {
            style.apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// Check if color output is supported
    fn supports_color(&self) -> bool {
        match self.color_choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.term.features().colors_supported(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xscan_capture::CapturedOutput;
    use xscan_types::{ScanSummary, Violation};

    fn render(renderer: &OutputRenderer, result: &OperationResult) -> String {
        let mut out = Vec::new();
        renderer.render_result(result, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_json_scan_results_are_an_array() {
        let renderer = OutputRenderer::new(OutputFormat::Json, ColorChoice::Never);
        let text = render(
            &renderer,
            &OperationResult::ScanResults(vec![ScanResponse::default()]),
        );
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_table_lists_findings() {
        let renderer = OutputRenderer::new(OutputFormat::Table, ColorChoice::Never);
        let response = ScanResponse {
            scan_id: "s-1".to_string(),
            violations: vec![Violation {
                issue_id: "XRAY-42".to_string(),
                severity: Severity::High,
                ..Violation::default()
            }],
            ..ScanResponse::default()
        };
        let text = render(&renderer, &OperationResult::ScanResults(vec![response]));
        assert!(text.contains("s-1"));
        assert!(text.contains("XRAY-42"));
        assert!(text.contains("High"));
    }

    #[test]
    fn test_empty_table() {
        let renderer = OutputRenderer::new(OutputFormat::Table, ColorChoice::Never);
        let text = render(&renderer, &OperationResult::ScanResults(Vec::new()));
        assert_eq!(text, "No scan results.\n");
    }

    #[test]
    fn test_verify_outcomes() {
        let renderer = OutputRenderer::new(OutputFormat::Table, ColorChoice::Never);

        let mut out = Vec::new();
        renderer
            .render_verify(
                &VerifyOutcome::Passed {
                    summary: ScanSummary {
                        violations: 0,
                        vulnerabilities: 1,
                        licenses: 1,
                    },
                    output: CapturedOutput::default(),
                },
                &mut out,
            )
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[OK] Verification passed: 0 violations, 1 vulnerabilities, 1 licenses\n"
        );

        let mut out = Vec::new();
        renderer
            .render_verify(
                &VerifyOutcome::Skipped {
                    reason: "too old".to_string(),
                },
                &mut out,
            )
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[SKIP] too old\n");
    }
}
