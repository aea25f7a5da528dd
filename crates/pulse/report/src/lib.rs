//! # Pulse Report - On-demand Sentiment Reports
//!
//! [`generate_report`] filters a monitor's history to a [`ReportPeriod`] and
//! summarises it: aggregate statistics, the strongest positive and negative
//! mentions, an hourly or daily timeline, a keyword table, and the monitor's
//! alerts in the period. Reports are computed on request and never stored.
//!
//! [`render`] returns either the structured [`Report`] or a Markdown
//! document produced from it by [`MarkdownRenderer`].

pub mod document;
pub mod error;
pub mod period;
pub mod report;

pub use document::MarkdownRenderer;
pub use error::ReportError;
pub use period::{Granularity, ReportFormat, ReportPeriod};
pub use report::{
    generate_report, AlertSummary, EmptyReport, KeywordCount, Report, ReportExcerpt,
    ReportSummary, SentimentReport, TimelineBucket, RECENT_ALERTS, TOP_EXCERPTS,
};

use serde::Serialize;

/// A report in the requested format.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "format", content = "body", rename_all = "lowercase")]
pub enum ReportOutput {
    Data(Report),
    Document(String),
}

impl ReportOutput {
    pub fn as_document(&self) -> Option<&str> {
        match self {
            ReportOutput::Document(doc) => Some(doc),
            ReportOutput::Data(_) => None,
        }
    }

    pub fn as_data(&self) -> Option<&Report> {
        match self {
            ReportOutput::Data(report) => Some(report),
            ReportOutput::Document(_) => None,
        }
    }
}

/// Present `report` in `format`.
pub fn render(report: Report, format: ReportFormat) -> ReportOutput {
    match format {
        ReportFormat::Data => ReportOutput::Data(report),
        ReportFormat::Document => ReportOutput::Document(MarkdownRenderer::render(&report)),
    }
}
