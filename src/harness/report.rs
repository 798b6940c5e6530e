//! End-of-run summary table.

use std::fmt::Write as _;

use crate::harness::scheduler::MatchSummary;

const RULE: &str = "+-----------------+-------+----------+";

pub fn render_report(summary: &MatchSummary) -> String {
    let tally = &summary.tally;
    let total = tally.games();
    let decisive = total - tally.draws;
    let win_rate = |wins: u32| {
        if decisive > 0 {
            f64::from(wins) / f64::from(decisive) * 100.0
        } else {
            0.0
        }
    };
    let [engine1, engine2] = &summary.engine_names;

    let mut out = String::new();
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "|     Outcome     |   #   | Win Rate |");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "| {:<16}|{:>6} |{:>8.2}% |", engine1, tally.engine1_wins, win_rate(tally.engine1_wins));
    let _ = writeln!(out, "| {:<16}|{:>6} |{:>8.2}% |", engine2, tally.engine2_wins, win_rate(tally.engine2_wins));
    let _ = writeln!(out, "| Draws           |{:>6} |          |", tally.draws);
    let _ = writeln!(out, "| Total           |{:>6} |{:>6} ms |", total, summary.movetime_ms);
    let _ = writeln!(out, "{RULE}");

    let failed = summary.failed_workers();
    if failed > 0 {
        let _ = writeln!(out, "{failed} of {} match(es) stopped on an engine error", summary.reports.len());
    }

    let _ = writeln!(
        out,
        "{} is {:.2} (+/- {:.2}) elo ahead of {}",
        engine1,
        tally.elo(),
        tally.elo_margin(),
        engine2
    );
    out
}

#[cfg(test)]
mod tests {
    use super::render_report;
    use crate::harness::match_worker::{MatchTally, ProtocolViolation, WorkerOutcome, WorkerReport};
    use crate::harness::scheduler::MatchSummary;

    fn summary(reports: Vec<WorkerReport>) -> MatchSummary {
        MatchSummary {
            engine_names: ["alpha".to_owned(), "beta".to_owned()],
            tally: MatchTally {
                engine1_wins: 10,
                engine2_wins: 5,
                draws: 5,
            },
            movetime_ms: 100,
            reports,
        }
    }

    #[test]
    fn table_rows() {
        let text = render_report(&summary(Vec::new()));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[3], "| alpha           |    10 |   66.67% |");
        assert_eq!(lines[4], "| beta            |     5 |   33.33% |");
        assert_eq!(lines[5], "| Draws           |     5 |          |");
        assert_eq!(lines[6], "| Total           |    20 |   100 ms |");
        assert!(lines[8].starts_with("alpha is 88.74 (+/- "), "{}", lines[8]);
        assert!(lines[8].ends_with("elo ahead of beta"));
    }

    #[test]
    fn failed_workers_are_counted() {
        let failed = WorkerReport {
            id: 2,
            engine_names: ["alpha".to_owned(), "beta".to_owned()],
            tally: MatchTally::default(),
            outcome: WorkerOutcome::EngineError(ProtocolViolation {
                engine: "beta".to_owned(),
                response: "e2e5".to_owned(),
                fen: "8/8/8/8/8/8/8/8 w - - 0 1".to_owned(),
            }),
        };
        let ok = WorkerReport {
            outcome: WorkerOutcome::Completed,
            id: 1,
            ..failed.clone()
        };
        let text = render_report(&summary(vec![ok, failed]));
        assert!(text.contains("1 of 2 match(es) stopped on an engine error"));
    }
}
