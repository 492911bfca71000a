//! Presentation of scrape reports and stored articles.
//!
//! # Submodules
//!
//! - [`console`]: renders a [`ScrapeReport`](crate::report::ScrapeReport) as readable text
//! - [`json`]: serializes reports and articles for machine consumption
//!
//! Both return strings; writing them to stdout is left to `main`.

pub mod console;
pub mod json;
