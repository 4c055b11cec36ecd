//! CSV export of per-run sweep records, one row per run, for offline analysis.

use std::io::Write;

use serde::Serialize;

use crate::error::HiresimError;
use crate::sweep::ScenarioResult;

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    scenario: &'a str,
    elimination: &'static str,
    run: usize,
    total_time: f64,
    final_score: f64,
    true_skill: i32,
    candidates_screened: usize,
    hired: bool,
}

/// Write every record of every scenario, with a header row.
pub fn write_records_csv<W: Write>(writer: W, results: &[ScenarioResult]) -> Result<(), HiresimError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for result in results {
        for record in &result.records {
            csv_writer.serialize(CsvRow {
                scenario: &result.scenario.name,
                elimination: result.scenario.elimination.as_str(),
                run: record.run,
                total_time: record.total_time,
                final_score: record.final_score,
                true_skill: record.true_skill,
                candidates_screened: record.candidates_screened,
                hired: record.hired,
            })?;
        }
    }
    csv_writer.flush()?;
    Ok(())
}
