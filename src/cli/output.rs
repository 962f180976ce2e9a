use std::fmt::Write as FmtWrite;

use serde::Serialize;

use crate::models::{OutputFormat, SearchResults, SearchView};
use crate::services::Probe;
use crate::utils::escape_html;

pub const NO_RESULTS: &str = "No results found";

/// Local run of the response generator.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub message: String,
    pub probe: Probe,
    pub leaked: bool,
    pub response: String,
}

pub trait Formatter {
    fn format_search_results(&self, results: &SearchResults<'_>) -> String;
    fn format_probe(&self, report: &ProbeReport) -> String;
    fn format_message(&self, message: &str) -> String;
    fn format_error(&self, error: &str) -> String;
}

pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format_search_results(&self, results: &SearchResults<'_>) -> String {
        match &results.view {
            SearchView::Cleared => String::new(),
            SearchView::NoResults => format!("{NO_RESULTS}\n"),
            SearchView::Results(docs) => {
                let mut output = String::new();
                writeln!(output, "Search results for: \"{}\"", results.query).unwrap();
                writeln!(output, "Showing {} results\n", docs.len()).unwrap();

                for (i, doc) in docs.iter().enumerate() {
                    writeln!(output, "{}. {}", i + 1, doc.title).unwrap();
                    writeln!(output, "   URL: {}", doc.url).unwrap();
                    if !doc.tags.is_empty() {
                        writeln!(output, "   Tags: {}", doc.tags.join(", ")).unwrap();
                    }
                    if !doc.excerpt.is_empty() {
                        writeln!(output, "   {}", doc.excerpt).unwrap();
                    }
                    writeln!(output).unwrap();
                }
                output
            }
        }
    }

    fn format_probe(&self, report: &ProbeReport) -> String {
        let mut output = String::new();
        let leak = if report.leaked { "[LEAKED]" } else { "[SAFE]" };
        writeln!(output, "Probe: {} {}", report.probe, leak).unwrap();
        writeln!(output, "---").unwrap();
        writeln!(output, "{}", report.response).unwrap();
        output
    }

    fn format_message(&self, message: &str) -> String {
        format!("{}\n", message)
    }

    fn format_error(&self, error: &str) -> String {
        format!("Error: {}\n", error)
    }
}

pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render(&self, value: &impl Serialize) -> String {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }).to_string())
    }
}

impl Formatter for JsonFormatter {
    fn format_search_results(&self, results: &SearchResults<'_>) -> String {
        format!("{}\n", self.render(results))
    }

    fn format_probe(&self, report: &ProbeReport) -> String {
        format!("{}\n", self.render(report))
    }

    fn format_message(&self, message: &str) -> String {
        serde_json::json!({"message": message}).to_string()
    }

    fn format_error(&self, error: &str) -> String {
        serde_json::json!({"error": error}).to_string()
    }
}

pub struct MarkdownFormatter;

impl Formatter for MarkdownFormatter {
    fn format_search_results(&self, results: &SearchResults<'_>) -> String {
        match &results.view {
            SearchView::Cleared => String::new(),
            SearchView::NoResults => {
                format!("## {NO_RESULTS}\n\nQuery: `{}`\n", results.query)
            }
            SearchView::Results(docs) => {
                let mut output = String::new();
                writeln!(output, "## Search Results\n").unwrap();
                writeln!(output, "**Query:** `{}`\n", results.query).unwrap();

                for doc in docs {
                    writeln!(output, "### [{}]({})\n", doc.title, doc.url).unwrap();
                    if !doc.tags.is_empty() {
                        let tags: Vec<String> =
                            doc.tags.iter().map(|t| format!("`{}`", t)).collect();
                        writeln!(output, "**Tags:** {}\n", tags.join(", ")).unwrap();
                    }
                    if !doc.excerpt.is_empty() {
                        writeln!(output, "{}\n", doc.excerpt).unwrap();
                    }
                }
                output
            }
        }
    }

    fn format_probe(&self, report: &ProbeReport) -> String {
        let mut output = String::new();
        let leak = if report.leaked { "⚠️ leaked" } else { "✅ safe" };
        writeln!(output, "## Probe: `{}` ({})\n", report.probe, leak).unwrap();
        writeln!(output, "> {}\n", report.message).unwrap();
        writeln!(output, "```").unwrap();
        writeln!(output, "{}", report.response).unwrap();
        writeln!(output, "```").unwrap();
        output
    }

    fn format_message(&self, message: &str) -> String {
        format!("> {}\n", message)
    }

    fn format_error(&self, error: &str) -> String {
        format!("> ⚠️ **Error:** {}\n", error)
    }
}

/// Renders the markup the site's search widget injects into the page.
pub struct HtmlFormatter;

impl Formatter for HtmlFormatter {
    fn format_search_results(&self, results: &SearchResults<'_>) -> String {
        match &results.view {
            SearchView::Cleared => String::new(),
            SearchView::NoResults => format!("<p>{NO_RESULTS}</p>\n"),
            SearchView::Results(docs) => {
                let mut output = String::new();
                for doc in docs {
                    writeln!(output, "<div class=\"search-result\">").unwrap();
                    writeln!(
                        output,
                        "  <h3><a href=\"{}\">{}</a></h3>",
                        escape_html(&doc.url),
                        escape_html(&doc.title)
                    )
                    .unwrap();
                    writeln!(output, "  <p>{}</p>", escape_html(&doc.excerpt)).unwrap();
                    writeln!(output, "</div>").unwrap();
                }
                output
            }
        }
    }

    fn format_probe(&self, report: &ProbeReport) -> String {
        format!(
            "<div class=\"probe\" data-probe=\"{}\" data-leaked=\"{}\">\n  <pre>{}</pre>\n</div>\n",
            report.probe,
            report.leaked,
            escape_html(&report.response)
        )
    }

    fn format_message(&self, message: &str) -> String {
        format!("<p>{}</p>\n", escape_html(message))
    }

    fn format_error(&self, error: &str) -> String {
        format!("<p class=\"error\">{}</p>\n", escape_html(error))
    }
}

pub fn get_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
        OutputFormat::Markdown => Box::new(MarkdownFormatter),
        OutputFormat::Html => Box::new(HtmlFormatter),
    }
}
