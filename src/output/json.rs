use serde::Serialize;

use crate::error::Result;
use crate::result::{ScanResult, ValidationError};
use crate::runner::Decision;

use super::OutputFormatter;

pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    decision: Option<&'static str>,
    summary: Summary,
    errors: &'a [ValidationError],
}

#[derive(Serialize)]
struct Summary {
    scanned: usize,
    errors: usize,
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &ScanResult, decision: Option<&Decision>) -> Result<String> {
        let output = JsonOutput {
            decision: decision.map(|d| match d {
                Decision::Accepted => "accepted",
                Decision::Rejected(_) => "rejected",
            }),
            summary: Summary {
                scanned: result.scanned,
                errors: result.count(),
            },
            errors: &result.errors,
        };

        Ok(serde_json::to_string_pretty(&output)?)
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
