// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use crate::geometry::GeometryStats;
use crate::model::Faceplate;
use colored::*;
use std::time::Duration;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    /// Print the build summary followed by the part's statistics
    pub fn report_build(faceplate: &Faceplate) {
        println!("{}", "=".repeat(60).bright_black());
        println!("{}", "Heating Control Faceplate created!".green().bold());
        println!("{}", "=".repeat(60).bright_black());

        for line in faceplate.summary_lines() {
            if line.starts_with("Sharp corners") {
                println!("{}", line.yellow());
            } else if let Some(rest) = line.strip_prefix("  ->") {
                println!("  {}{}", "->".bright_black(), rest);
            } else {
                println!("{}", line);
            }
        }

        println!("{}", "=".repeat(60).bright_black());

        let report = &faceplate.report;
        println!("\n{}", "Geometry:".bold());
        Self::print_stats(&report.stats);
        println!(
            "  {} {}",
            "Reference:".bright_black(),
            format!("{} objects", report.reference_objects).cyan()
        );
        println!(
            "  {} {}",
            "Time:".bright_black(),
            Self::format_duration(Duration::from_millis(report.build_time_ms)).yellow()
        );
    }

    fn print_stats(stats: &GeometryStats) {
        let [x, y, z] = stats.size();
        println!(
            "  {} {}",
            "Volume:".bright_black(),
            format!("{:.2} mm³", stats.volume).cyan()
        );
        println!(
            "  {} {}",
            "Area:".bright_black(),
            format!("{:.2} mm²", stats.surface_area).cyan()
        );
        println!(
            "  {} {}",
            "Size:".bright_black(),
            format!("{:.2} x {:.2} x {:.2} mm", x, y, z).cyan()
        );
        println!(
            "  {} {} / {}",
            "Mesh:".bright_black(),
            format!("{} vertices", stats.vertex_count).cyan(),
            format!("{} triangles", stats.triangle_count).cyan()
        );

        let watertight = if stats.is_watertight {
            "yes".green()
        } else {
            "no".red()
        };
        println!("  {} {}", "Watertight:".bright_black(), watertight);
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Report warning
    pub fn report_warning(message: &str) {
        println!("\n{} {}", "⚠️  Warning:".yellow().bold(), message);
    }

    /// Print success message
    pub fn success(message: &str) {
        println!("{} {}", "✅".green(), message.green());
    }

    /// Format duration for display
    fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(
            Reporter::format_duration(Duration::from_micros(500)),
            "500µs"
        );
        assert_eq!(
            Reporter::format_duration(Duration::from_millis(5)),
            "5.00ms"
        );
        assert_eq!(Reporter::format_duration(Duration::from_secs(2)), "2.00s");
    }
}
