//! Probe session report formatting

use std::fmt::Write;

use super::runner::ProbeOutcome;

/// Format a probe outcome as a text timeline
pub fn format_outcome(outcome: &ProbeOutcome, colorize: bool) -> String {
    let mut output = String::new();

    writeln!(output, "\n{:=^64}", " Bot Probe Report ").unwrap();
    writeln!(output, "Environment: {}", outcome.environment).unwrap();
    writeln!(
        output,
        "Samples: {} | Duration: {}ms",
        outcome.samples.len(),
        outcome.duration_ms
    )
    .unwrap();
    writeln!(output, "{:-<64}", "").unwrap();

    for (i, snapshot) in outcome.samples.iter().enumerate() {
        write!(
            output,
            "  [{}] {} bots, {} active, {} open bets",
            i + 1,
            snapshot.observations.len(),
            snapshot.active_count(),
            snapshot.total_active_bets()
        )
        .unwrap();

        if i > 0 {
            let diff = &outcome.diffs[i - 1];
            if diff.is_quiet() {
                write!(output, "  (quiet)").unwrap();
            } else {
                write!(
                    output,
                    "  (+{} opened, -{} settled)",
                    diff.bets_opened, diff.bets_settled
                )
                .unwrap();
            }
        }
        writeln!(output).unwrap();
    }

    writeln!(output, "{:-<64}", "").unwrap();

    if outcome.violations.is_empty() {
        let line = "✓ No cycle violations observed";
        if colorize {
            writeln!(output, "\x1b[32m{line}\x1b[0m").unwrap();
        } else {
            writeln!(output, "{line}").unwrap();
        }
    } else {
        for v in &outcome.violations {
            let line = format!("✗ {v}");
            if colorize {
                writeln!(output, "\x1b[31m{line}\x1b[0m").unwrap();
            } else {
                writeln!(output, "{line}").unwrap();
            }
        }
    }

    writeln!(output, "{:=^64}", "").unwrap();
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_report_mentions_no_violations() {
        let outcome = ProbeOutcome {
            environment: "preview".to_string(),
            samples: Vec::new(),
            diffs: Vec::new(),
            violations: Vec::new(),
            duration_ms: 1200,
        };
        let report = format_outcome(&outcome, false);
        assert!(report.contains("No cycle violations"));
        assert!(report.contains("preview"));
    }
}
