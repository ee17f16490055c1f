use crate::output::{OutputFormatter, ViewReport};
use std::io::Write;

/// Machine-readable view, breadcrumbs, and navigation state.
#[derive(Debug, Default)]
pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }
}

impl OutputFormatter for JsonOutput {
    fn format<W: Write>(&self, report: &ViewReport<'_>, writer: &mut W) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(report).map_err(std::io::Error::other)?;
        writeln!(writer, "{}", json)
    }
}
