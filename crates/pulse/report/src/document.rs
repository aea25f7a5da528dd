//! Markdown rendering of a [`Report`].
//!
//! Pure presentation: everything printed here is already in the report.

use crate::report::{Report, ReportExcerpt, SentimentReport};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// Renders reports as Markdown documents.
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    pub fn render(report: &Report) -> String {
        match report {
            Report::NoData(empty) => {
                let mut doc = String::new();
                doc.push_str(&format!("# Sentiment Report: {}\n\n", empty.target));
                doc.push_str(&format!(
                    "_Period: {} | Generated {}_\n\n",
                    empty.period,
                    empty.generated_at.format(TIMESTAMP_FORMAT)
                ));
                doc.push_str(&format!("{}\n", empty.message));
                doc
            }
            Report::Complete(report) => Self::render_complete(report),
        }
    }

    fn render_complete(report: &SentimentReport) -> String {
        let mut doc = String::new();

        doc.push_str(&format!("# Sentiment Report: {}\n\n", report.target));
        doc.push_str(&format!(
            "_Period: {} | Source: {} | Generated {}_\n\n",
            report.period,
            report.source_type,
            report.generated_at.format(TIMESTAMP_FORMAT)
        ));

        let summary = &report.summary;
        doc.push_str("## Summary\n\n");
        doc.push_str("| Metric | Value |\n|---|---|\n");
        doc.push_str(&format!("| Total mentions | {} |\n", summary.total_mentions));
        doc.push_str(&format!("| Average score | {:.2} |\n", summary.average_score));
        doc.push_str(&format!("| Median score | {:.2} |\n", summary.median_score));
        doc.push_str(&format!(
            "| Positive / Neutral / Negative | {} / {} / {} |\n",
            summary.distribution.positive,
            summary.distribution.neutral,
            summary.distribution.negative
        ));
        doc.push_str(&format!("| Trend | {} |\n", summary.trend));
        doc.push_str(&format!("| Rolling average | {:.2} |\n", summary.rolling_average));
        doc.push_str(&format!("| Volatility | {:.2} |\n\n", summary.volatility));

        doc.push_str("## Timeline\n\n");
        doc.push_str("| Period start | Average score | Mentions |\n|---|---|---|\n");
        for bucket in &report.timeline {
            doc.push_str(&format!(
                "| {} | {:.2} | {} |\n",
                bucket.start.format(TIMESTAMP_FORMAT),
                bucket.average_score,
                bucket.count
            ));
        }
        doc.push('\n');

        Self::render_excerpts(&mut doc, "Top Positive Mentions", &report.top_positive);
        Self::render_excerpts(&mut doc, "Top Negative Mentions", &report.top_negative);

        doc.push_str("## Keywords\n\n");
        if report.keywords.is_empty() {
            doc.push_str("No keywords matched.\n\n");
        } else {
            doc.push_str("| Keyword | Count |\n|---|---|\n");
            for keyword in &report.keywords {
                doc.push_str(&format!("| {} | {} |\n", keyword.keyword, keyword.count));
            }
            doc.push('\n');
        }

        doc.push_str("## Alerts\n\n");
        doc.push_str(&format!("{} alert(s) in period.\n", report.alerts.count));
        if !report.alerts.recent.is_empty() {
            doc.push('\n');
        }
        for alert in &report.alerts.recent {
            doc.push_str(&format!(
                "- **{}** `{}` at {}: {}\n",
                alert.severity,
                alert.alert_type,
                alert.timestamp.format(TIMESTAMP_FORMAT),
                alert.message
            ));
        }

        doc
    }

    fn render_excerpts(doc: &mut String, heading: &str, excerpts: &[ReportExcerpt]) {
        doc.push_str(&format!("## {heading}\n\n"));
        if excerpts.is_empty() {
            doc.push_str("None.\n\n");
            return;
        }
        for excerpt in excerpts {
            doc.push_str(&format!("> {}\n>\n", excerpt.text.replace('\n', " ")));
            let author = excerpt.author.as_deref().unwrap_or("unknown");
            doc.push_str(&format!("> {} ({:+.2})", author, excerpt.score));
            if let Some(url) = &excerpt.source_url {
                doc.push_str(&format!(" <{url}>"));
            }
            doc.push_str("\n\n");
        }
    }
}
