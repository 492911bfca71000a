//! Plain-text rendering of a scrape report.
//!
//! ```text
//! Running all news scrapers...
//! ============================
//!
//! Success: elpais
//! ---------------
//! // Found 2 articles:
//!   #1: La bolsa sube
//!   URL: https://elpais.com/economia/...
//!   Body:
//!     First paragraph.
//!
//! Failures and Warnings
//! ---------------------
//! Scraper  Message
//! elmundo  No articles were found. ...
//!
//! [OK] All scrapers finished.
//! ```

use crate::report::ScrapeReport;
use std::fmt::Write;

const TITLE: &str = "Running all news scrapers...";

pub fn render_report(report: &ScrapeReport) -> String {
    let mut out = String::new();
    heading(&mut out, TITLE, '=');

    if report.is_empty() {
        writeln!(out, "[WARNING] No scrapers were executed or found.").unwrap();
        return out;
    }

    for (id, result) in report.results() {
        heading(&mut out, &format!("Success: {id}"), '-');
        writeln!(out, "// Found {} articles:", result.count).unwrap();
        for (index, item) in result.items.iter().enumerate() {
            writeln!(out, "  #{}: {}", index + 1, item.title).unwrap();
            writeln!(out, "  URL: {}", item.url).unwrap();
            writeln!(out, "  Body:").unwrap();
            for line in item.body.lines() {
                if line.trim().is_empty() {
                    writeln!(out).unwrap();
                } else {
                    writeln!(out, "    {line}").unwrap();
                }
            }
            writeln!(out).unwrap();
        }
    }

    if report.errors_len() > 0 {
        heading(&mut out, "Failures and Warnings", '-');
        let width = report
            .errors()
            .map(|(id, _)| id.as_str().len())
            .max()
            .unwrap_or(0)
            .max("Scraper".len());
        writeln!(out, "{:<width$}  Message", "Scraper").unwrap();
        for (id, message) in report.errors() {
            writeln!(out, "{:<width$}  {}", id.as_str(), message).unwrap();
        }
        writeln!(out).unwrap();
    }

    writeln!(out, "[OK] All scrapers finished.").unwrap();
    out
}

fn heading(out: &mut String, text: &str, underline: char) {
    writeln!(out, "{text}").unwrap();
    writeln!(out, "{}", underline.to_string().repeat(text.chars().count())).unwrap();
    writeln!(out).unwrap();
}
