//! Report generation for suite results
//!
//! Generate formatted reports in text and Markdown.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::results::compare::{EnvironmentComparator, EnvironmentComparison};
use crate::results::storage::{ResultsStorage, StoredRun};

/// Report generator
pub struct ReportGenerator {
    storage: ResultsStorage,
}

impl ReportGenerator {
    /// Create a new report generator
    pub fn new(storage: ResultsStorage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &ResultsStorage {
        &self.storage
    }

    /// Generate a single environment report
    pub fn environment_report(&self, run: &StoredRun, format: ReportFormat) -> String {
        match format {
            ReportFormat::Text => self.format_text_report(run),
            ReportFormat::Markdown => self.format_markdown_report(run),
        }
    }

    /// Generate comparison report
    pub fn comparison_report(&self, runs: &[StoredRun], format: ReportFormat) -> String {
        let comparison = EnvironmentComparator::compare(runs);
        match format {
            ReportFormat::Text => self.format_text_comparison(&comparison),
            ReportFormat::Markdown => self.format_markdown_comparison(&comparison),
        }
    }

    fn format_text_report(&self, run: &StoredRun) -> String {
        let mut output = String::new();

        // Header
        writeln!(output, "\n{:=^70}", " GemPlay QA Report ").unwrap();
        writeln!(output).unwrap();

        // Summary
        writeln!(output, "Environment: {}", run.environment).unwrap();
        writeln!(output, "Base URL: {}", run.base_url).unwrap();
        writeln!(output, "Run ID: {}", run.id).unwrap();
        writeln!(output, "Started: {}", format_datetime(&run.started_at)).unwrap();
        writeln!(output, "Completed: {}", format_datetime(&run.completed_at)).unwrap();
        writeln!(output, "Rounds: {}", run.rounds).unwrap();
        writeln!(output).unwrap();

        // Aggregate stats
        if let Some(agg) = &run.aggregate {
            writeln!(output, "{:-^70}", " Aggregate Statistics ").unwrap();
            writeln!(
                output,
                "Average Pass Rate: {:.1}%",
                agg.avg_pass_rate * 100.0
            )
            .unwrap();
            writeln!(
                output,
                "Pass Rate Range: {:.1}% - {:.1}%",
                agg.min_pass_rate * 100.0,
                agg.max_pass_rate * 100.0
            )
            .unwrap();
            writeln!(output, "Average Duration: {}ms", agg.avg_duration_ms).unwrap();
            writeln!(output, "Total Duration: {}ms", agg.total_duration_ms).unwrap();
            writeln!(output).unwrap();

            // Per-scenario stats
            writeln!(output, "{:-^70}", " Per-Scenario Statistics ").unwrap();
            writeln!(
                output,
                "{:<25} {:>8} {:>8} {:>8} {:>8}",
                "Scenario", "Pass%", "Avg(ms)", "Min(ms)", "Max(ms)"
            )
            .unwrap();
            writeln!(output, "{:-<70}", "").unwrap();

            for (name, stats) in &agg.scenario_stats {
                writeln!(
                    output,
                    "{:<25} {:>7.1}% {:>8} {:>8} {:>8}",
                    truncate(name, 25),
                    stats.pass_rate * 100.0,
                    stats.avg_duration_ms,
                    stats.min_duration_ms,
                    stats.max_duration_ms
                )
                .unwrap();
            }
        }

        // Round details
        writeln!(output, "\n{:-^70}", " Round Details ").unwrap();
        for summary in &run.summaries {
            writeln!(
                output,
                "\nRound {}: {}/{} passed ({:.1}%) in {}ms",
                summary.round,
                summary.passed,
                summary.total,
                summary.pass_rate * 100.0,
                summary.duration_ms
            )
            .unwrap();
        }

        writeln!(output, "\n{:=^70}", "").unwrap();
        output
    }

    fn format_markdown_report(&self, run: &StoredRun) -> String {
        let mut output = String::new();

        // Header
        writeln!(output, "# GemPlay QA Report\n").unwrap();
        writeln!(output, "## Summary\n").unwrap();
        writeln!(output, "| Property | Value |").unwrap();
        writeln!(output, "|----------|-------|").unwrap();
        writeln!(output, "| Environment | {} |", run.environment).unwrap();
        writeln!(output, "| Base URL | {} |", run.base_url).unwrap();
        writeln!(output, "| Run ID | `{}` |", run.id).unwrap();
        writeln!(output, "| Started | {} |", format_datetime(&run.started_at)).unwrap();
        writeln!(
            output,
            "| Completed | {} |",
            format_datetime(&run.completed_at)
        )
        .unwrap();
        writeln!(output, "| Rounds | {} |", run.rounds).unwrap();

        // Aggregate stats
        if let Some(agg) = &run.aggregate {
            writeln!(output, "\n## Aggregate Statistics\n").unwrap();
            writeln!(output, "| Metric | Value |").unwrap();
            writeln!(output, "|--------|-------|").unwrap();
            writeln!(
                output,
                "| Average Pass Rate | {:.1}% |",
                agg.avg_pass_rate * 100.0
            )
            .unwrap();
            writeln!(
                output,
                "| Min Pass Rate | {:.1}% |",
                agg.min_pass_rate * 100.0
            )
            .unwrap();
            writeln!(
                output,
                "| Max Pass Rate | {:.1}% |",
                agg.max_pass_rate * 100.0
            )
            .unwrap();
            writeln!(output, "| Average Duration | {}ms |", agg.avg_duration_ms).unwrap();
            writeln!(output, "| Total Duration | {}ms |", agg.total_duration_ms).unwrap();

            writeln!(output, "\n## Per-Scenario Results\n").unwrap();
            writeln!(
                output,
                "| Scenario | Pass Rate | Avg (ms) | Min (ms) | Max (ms) |"
            )
            .unwrap();
            writeln!(
                output,
                "|----------|-----------|----------|----------|----------|"
            )
            .unwrap();

            for (name, stats) in &agg.scenario_stats {
                writeln!(
                    output,
                    "| {} | {:.1}% | {} | {} | {} |",
                    name,
                    stats.pass_rate * 100.0,
                    stats.avg_duration_ms,
                    stats.min_duration_ms,
                    stats.max_duration_ms
                )
                .unwrap();
            }
        }

        // Round details
        writeln!(output, "\n## Round Details\n").unwrap();
        for summary in &run.summaries {
            writeln!(output, "### Round {}\n", summary.round).unwrap();
            writeln!(output, "- **Passed:** {}/{}", summary.passed, summary.total).unwrap();
            writeln!(output, "- **Pass Rate:** {:.1}%", summary.pass_rate * 100.0).unwrap();
            writeln!(output, "- **Duration:** {}ms\n", summary.duration_ms).unwrap();
        }

        output
    }

    fn format_text_comparison(&self, comparison: &EnvironmentComparison) -> String {
        crate::results::compare::ComparisonFormatter::format_table(comparison)
    }

    fn format_markdown_comparison(&self, comparison: &EnvironmentComparison) -> String {
        let mut output = String::new();

        writeln!(output, "# GemPlay Environment Comparison Report\n").unwrap();

        writeln!(output, "## Summary\n").unwrap();
        writeln!(output, "| Metric | Value |").unwrap();
        writeln!(output, "|--------|-------|").unwrap();
        writeln!(
            output,
            "| Environments Compared | {} |",
            comparison.summary.environment_count
        )
        .unwrap();
        writeln!(
            output,
            "| Scenarios Compared | {} |",
            comparison.summary.scenario_count
        )
        .unwrap();
        writeln!(
            output,
            "| Best Overall | {} |",
            comparison.summary.best_overall.as_deref().unwrap_or("N/A")
        )
        .unwrap();
        writeln!(
            output,
            "| Most Reliable | {} |",
            comparison.summary.most_reliable.as_deref().unwrap_or("N/A")
        )
        .unwrap();
        writeln!(
            output,
            "| Fastest | {} |",
            comparison.summary.fastest.as_deref().unwrap_or("N/A")
        )
        .unwrap();

        writeln!(output, "\n## Rankings by Pass Rate\n").unwrap();
        writeln!(output, "| Rank | Environment | Pass Rate |").unwrap();
        writeln!(output, "|------|-------------|-----------|").unwrap();
        for rank in &comparison.rankings.by_pass_rate {
            writeln!(
                output,
                "| {} | {} | {:.1}% |",
                rank.rank,
                rank.environment,
                rank.value * 100.0
            )
            .unwrap();
        }

        writeln!(output, "\n## Rankings by Speed\n").unwrap();
        writeln!(output, "| Rank | Environment | Avg Duration |").unwrap();
        writeln!(output, "|------|-------------|--------------|").unwrap();
        for rank in &comparison.rankings.by_duration {
            writeln!(
                output,
                "| {} | {} | {:.0}ms |",
                rank.rank, rank.environment, rank.value
            )
            .unwrap();
        }

        writeln!(output, "\n## Scenario Wins\n").unwrap();
        writeln!(output, "| Environment | Wins |").unwrap();
        writeln!(output, "|-------------|------|").unwrap();
        for (environment, wins) in &comparison.rankings.wins {
            writeln!(output, "| {environment} | {wins} |").unwrap();
        }

        writeln!(output, "\n## Scenario Result Distribution\n").unwrap();
        writeln!(
            output,
            "- **Universal Pass:** {} scenarios",
            comparison.summary.universal_pass
        )
        .unwrap();
        writeln!(
            output,
            "- **Universal Fail:** {} scenarios",
            comparison.summary.universal_fail
        )
        .unwrap();
        writeln!(
            output,
            "- **Mixed Results:** {} scenarios",
            comparison.summary.mixed_results
        )
        .unwrap();

        output
    }
}

/// Report output format
#[derive(Clone, Copy, Debug)]
pub enum ReportFormat {
    Text,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Markdown => "md",
        }
    }
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len - 3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_format() {
        assert!(matches!(
            ReportFormat::from_str("text"),
            Some(ReportFormat::Text)
        ));
        assert!(matches!(
            ReportFormat::from_str("md"),
            Some(ReportFormat::Markdown)
        ));
        assert!(ReportFormat::from_str("html").is_none());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
    }
}
