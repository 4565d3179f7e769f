//! Report formatting functions

use crate::error::Result;
use crate::models::AnalysisReport;
use ansi_term::Colour::{Cyan, Green, Yellow};
use ansi_term::Style;

/// Format an analysis report as human-readable text
pub fn format_report_text(report: &AnalysisReport, use_colors: bool, verbose: bool) -> String {
    let mut output = String::new();

    if use_colors {
        output.push_str(&format!(
            "{} {}\n",
            Green.bold().paint("Entry:"),
            report.entry.display()
        ));
    } else {
        output.push_str(&format!("Entry: {}\n", report.entry.display()));
    }

    if report.scripts.is_empty() {
        output.push_str("No script dependencies.\n");
    } else {
        let header = format!("Scripts ({}):", report.scripts.len());
        if use_colors {
            output.push_str(&format!("{}\n", Cyan.bold().paint(header)));
        } else {
            output.push_str(&format!("{}\n", header));
        }
        for (index, script) in report.scripts.iter().enumerate() {
            output.push_str(&format!("  {:>3}. {}\n", index + 1, script.display()));
        }
    }

    if !report.libraries.is_empty() {
        let header = format!("Native libraries ({}):", report.libraries.len());
        if use_colors {
            output.push_str(&format!("{}\n", Yellow.bold().paint(header)));
        } else {
            output.push_str(&format!("{}\n", header));
        }
        for library in &report.libraries {
            output.push_str(&format!("  - {}\n", library.display()));
        }
    }

    if verbose {
        let footer = format!(
            "Analyzed at {} ({} artifacts)",
            report.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.artifact_count()
        );
        if use_colors {
            output.push_str(&format!("{}\n", Style::new().dimmed().paint(footer)));
        } else {
            output.push_str(&format!("{}\n", footer));
        }
    }

    output
}

/// Format an analysis report as JSON
pub fn format_report_json(report: &AnalysisReport, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    Ok(json)
}
