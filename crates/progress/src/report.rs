//! Report block written between the README markers.

use timebar_core::{LocalTime, Period, ProgressRatio, RenderConfig, UtcOffset};

use crate::bar::{render, ProgressBar};
use crate::calculator::ProgressSnapshot;

/// Footer timestamp format.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %p";

/// One rendered line of the report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    /// Period the line describes
    pub period: Period,

    /// Rendered bar
    pub bar: ProgressBar,

    /// Ratio the bar was rendered from
    pub ratio: ProgressRatio,
}

/// Year, month and week bars plus the footer data.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Lines in year, month, week order
    pub lines: Vec<ReportLine>,

    /// When the ratios were computed
    pub timestamp: LocalTime,

    /// Offset shown in the footer
    pub offset: UtcOffset,
}

impl Report {
    /// Render every period of `snapshot` with `config`.
    pub fn build(snapshot: &ProgressSnapshot, config: &RenderConfig) -> Self {
        let lines = Period::ALL
            .iter()
            .map(|&period| {
                let ratio = snapshot.ratio(period);
                ReportLine {
                    period,
                    bar: render(ratio, &config.alphabet, config.bar_length),
                    ratio,
                }
            })
            .collect();

        Self {
            lines,
            timestamp: snapshot.now,
            offset: config.offset,
        }
    }
}

/// Format `report` as a fenced `text` block of three bar lines followed by
/// a blank line and an `Updated at ... UTC+N` footer.
pub fn format_report(report: &Report) -> String {
    let mut out = String::from("``` text\n");
    for line in &report.lines {
        out.push_str(&format!(
            "{:<5} progress {{ {}  }} {:05.2} %\n",
            line.period.label(),
            line.bar,
            line.ratio.percent()
        ));
    }
    out.push_str("```\n\n");
    out.push_str(&format!(
        "⏰ *Updated at {} UTC{}*\n",
        report.timestamp.format(TIMESTAMP_FORMAT),
        report.offset
    ));
    out
}
