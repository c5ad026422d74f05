// rust/platformer_cli/src/rollout/sinks.rs
#![forbid(unsafe_code)]

use indicatif::ProgressBar;

/// One periodic table row (aggregates only).
#[derive(Clone, Debug)]
pub struct ReportRow {
    pub episode: u64,
    pub episodes_total: u64,
    pub tps: f64,

    pub completions: u64,
    pub deaths: u64,

    pub avg_score: f64,
    pub avg_coins: f64,
    pub avg_distance: f64,
    pub max_distance: u64,
}

pub trait RolloutSink {
    fn on_report_row(&mut self, row: &ReportRow, pb: Option<&ProgressBar>);
}

pub struct NoopSink;

impl RolloutSink for NoopSink {
    fn on_report_row(&mut self, _row: &ReportRow, _pb: Option<&ProgressBar>) {}
}

/// Fixed-width table; the header is repeated every `header_every` rows.
pub struct TableSink {
    header_every: u64,
    rows: u64,
}

impl TableSink {
    pub fn new(header_every: u64) -> Self {
        Self {
            header_every: header_every.max(1),
            rows: 0,
        }
    }

    fn header() -> String {
        format!(
            "{:>11} {:>9} {:>6} {:>6} {:>10} {:>9} {:>9} {:>8}",
            "episode", "ticks/s", "done", "dead", "avg_score", "avg_coin", "avg_dist", "max_dist"
        )
    }

    fn format_row(row: &ReportRow) -> String {
        format!(
            "{:>5}/{:<5} {:>9.0} {:>6} {:>6} {:>10.1} {:>9.2} {:>9.1} {:>8}",
            row.episode,
            row.episodes_total,
            row.tps,
            row.completions,
            row.deaths,
            row.avg_score,
            row.avg_coins,
            row.avg_distance,
            row.max_distance,
        )
    }
}

impl RolloutSink for TableSink {
    fn on_report_row(&mut self, row: &ReportRow, pb: Option<&ProgressBar>) {
        // Print through the progress bar so lines don't tear it.
        let emit = |line: String| match pb {
            Some(pb) => pb.println(line),
            None => println!("{line}"),
        };
        if self.rows % self.header_every == 0 {
            emit(Self::header());
        }
        emit(Self::format_row(row));
        self.rows += 1;
    }
}
