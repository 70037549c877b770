//! Registered program row adapter
//!
//! Both the open-data CSV rows and the backend's snake_case rows are folded
//! into [`RegisteredProgram`]. Adaptation is total: malformed fields become
//! absent instead of failing the row.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::{
    Identifier, LooseValue, RegisteredCsvRow, RegisteredProgram, RegisteredRecord,
};

/// Trimmed text, `None` when blank
fn clean(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Tolerant numeric parse; blank, unparsable and non-finite input is absent
fn to_num(value: Option<&str>) -> Option<f64> {
    clean(value)?.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn loose_num(value: Option<&LooseValue>) -> Option<f64> {
    match value? {
        LooseValue::Integer(n) => Some(*n as f64),
        LooseValue::Float(x) => Some(*x).filter(|x| x.is_finite()),
        LooseValue::Text(s) => to_num(Some(s.as_str())),
    }
}

fn pad2(part: &str) -> String {
    format!("{part:0>2}")
}

/// `HH:MM:00`, only when both parts are present
fn synth_time(hour: Option<String>, minute: Option<String>) -> Option<String> {
    match (hour, minute) {
        (Some(h), Some(m)) => Some(format!("{}:{}:00", pad2(&h), pad2(&m))),
        _ => None,
    }
}

/// Adapt one open-data CSV row
#[must_use]
pub fn adapt_csv_row(row: &RegisteredCsvRow) -> RegisteredProgram {
    RegisteredProgram {
        course_title: clean(row.course_title.as_deref()).unwrap_or_default(),
        days_of_week: clean(row.days_of_week.as_deref()),
        program_category: clean(row.program_category.as_deref()),
        min_age: to_num(row.min_age.as_deref()),
        max_age: to_num(row.max_age.as_deref()),
        day_of_week: None,
        start_time: synth_time(
            clean(row.start_hour.as_deref()),
            clean(row.start_min.as_deref()),
        ),
        end_time: synth_time(clean(row.end_hour.as_deref()), clean(row.end_min.as_deref())),
        course_id: clean(row.course_id.as_deref()).map(Identifier::Text),
        course_instance_id: None,
        occurrence_id: None,
        program_id: None,
        location_id: clean(row.location_id.as_deref()).map(Identifier::Text),
        section: clean(row.section.as_deref()),
        activity_title: clean(row.activity_title.as_deref()),
        from_to: clean(row.from_to.as_deref()),
        activity_url: clean(row.activity_url.as_deref()),
        status_info: clean(row.status_info.as_deref()),
    }
}

/// Adapt one backend registered row, applying the same time synthesis
#[must_use]
pub fn adapt_record(record: &RegisteredRecord) -> RegisteredProgram {
    let text = |v: Option<&LooseValue>| v.and_then(LooseValue::as_text);
    RegisteredProgram {
        course_title: clean(record.course_title.as_deref()).unwrap_or_default(),
        days_of_week: clean(record.days_of_week.as_deref()),
        program_category: clean(record.program_category.as_deref()),
        min_age: loose_num(record.min_age.as_ref()),
        max_age: loose_num(record.max_age.as_ref()),
        day_of_week: clean(record.day_of_week.as_deref()),
        start_time: synth_time(
            text(record.start_hour.as_ref()),
            text(record.start_minute.as_ref()),
        ),
        end_time: synth_time(text(record.end_hour.as_ref()), text(record.end_minute.as_ref())),
        course_id: record.course_id.clone().or_else(|| record.id.clone()),
        course_instance_id: record.course_instance_id.clone(),
        occurrence_id: record.occurrence_id.clone(),
        program_id: record.program_id.clone(),
        location_id: record.location_id.clone(),
        section: clean(record.section.as_deref()),
        activity_title: clean(record.activity_title.as_deref()),
        from_to: clean(record.from_to.as_deref()),
        activity_url: clean(record.activity_url.as_deref()),
        status_info: clean(record.status_info.as_deref()),
    }
}

/// Adapt a batch of backend rows
#[must_use]
pub fn adapt_records(records: &[RegisteredRecord]) -> Vec<RegisteredProgram> {
    records.iter().map(adapt_record).collect()
}

/// Read a registered-programs CSV export and adapt every decodable row
///
/// Rows the CSV reader cannot decode are skipped with a warning; failing to
/// open or read the file is an error.
pub fn read_registered_csv(path: &Path) -> Result<Vec<RegisteredProgram>> {
    info!("Reading registered programs from {}", path.display());
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_path(path)?;

    let mut programs = Vec::new();
    let mut skipped = 0usize;
    for (index, row) in reader.deserialize::<RegisteredCsvRow>().enumerate() {
        match row {
            Ok(row) => programs.push(adapt_csv_row(&row)),
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                skipped += 1;
                warn!("Skipping CSV row {}: {}", index + 1, e);
            }
        }
    }

    debug!("Skipped {} undecodable rows", skipped);
    info!("Adapted {} registered programs", programs.len());
    Ok(programs)
}
