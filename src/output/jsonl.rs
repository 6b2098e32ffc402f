//! JSON-lines reporting sink
//!
//! Writes one JSON object per line: `{"kind":"sitemap",...}` for sitemap
//! results, `{"kind":"page",...}` for flagged pages and a final
//! `{"kind":"summary",...}`.

use crate::crawler::PageCheck;
use crate::output::traits::{OutputResult, ReportSink, RunSummary};
use crate::sitemap::SitemapResult;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum Row<'a> {
    Sitemap(&'a SitemapResult),
    Page(&'a PageCheck),
    Summary(&'a RunSummary),
}

/// Sink writing JSON lines to any writer (file, stdout, buffer)
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_row(&mut self, row: &Row<'_>) -> OutputResult<()> {
        serde_json::to_writer(&mut self.writer, row)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

impl<W: Write> ReportSink for JsonLinesSink<W> {
    fn sitemap(&mut self, result: &SitemapResult) -> OutputResult<()> {
        self.write_row(&Row::Sitemap(result))
    }

    fn page(&mut self, check: &PageCheck) -> OutputResult<()> {
        self.write_row(&Row::Page(check))
    }

    fn finish(&mut self, summary: &RunSummary) -> OutputResult<()> {
        self.write_row(&Row::Summary(summary))?;
        self.writer.flush()?;
        Ok(())
    }
}
