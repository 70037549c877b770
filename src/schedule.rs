//! Schedule labels and occurrence identity
//!
//! Two different strings are derived from a program occurrence. The schedule
//! key (`"Monday 18:00–19:00"`) is shown to users as a selectable option for
//! one sport. The dedup key additionally folds in identity, location,
//! facility and age range so that sessions split only by age eligibility
//! stay distinct while true duplicates collapse.

use std::collections::{BTreeSet, HashSet};

use crate::classify::classify_dropin;
use crate::filter::known_age;
use crate::models::{DropInProgram, Identifier, RegisteredProgram};

/// `"18:00:00"` -> `"18:00"`; absent -> empty
#[must_use]
pub fn fmt_time(time: Option<&str>) -> &str {
    match time {
        Some(t) => t.get(..5).unwrap_or(t),
        None => "",
    }
}

/// Human-facing schedule option, e.g. `"Monday 18:00–19:00"`
#[must_use]
pub fn schedule_key(program: &DropInProgram) -> String {
    let day = program.day_of_week.as_deref().unwrap_or_default();
    let start = fmt_time(program.start_time.as_deref());
    let end = fmt_time(program.end_time.as_deref());
    let key = if end.is_empty() {
        format!("{day} {start}")
    } else {
        format!("{day} {start}–{end}")
    };
    key.trim().to_string()
}

/// Distinct schedule keys for programs classified under `sport`, sorted
#[must_use]
pub fn schedules_for_sport(programs: &[DropInProgram], sport: &str) -> Vec<String> {
    programs
        .iter()
        .filter(|p| classify_dropin(p) == sport)
        .map(schedule_key)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Records that can be collapsed by occurrence identity
pub trait DedupKey {
    fn dedup_key(&self) -> String;
}

fn id_text(id: Option<&Identifier>) -> Option<String> {
    id.map(Identifier::to_string)
}

/// Zero and unknown bounds both render empty
fn age_part(min: Option<f64>, max: Option<f64>) -> String {
    let bound = |b: Option<f64>| known_age(b).map(|v| v.to_string()).unwrap_or_default();
    format!("{}-{}", bound(min), bound(max))
}

/// Replace every whitespace run with a single `_`
fn squash_whitespace(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_run = false;
    for c in raw.chars() {
        if c.is_whitespace() {
            if !in_run {
                out.push('_');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

struct KeyParts<'a> {
    id_like: String,
    location: String,
    facility: String,
    day: &'a str,
    start: &'a str,
    end: &'a str,
    ages: String,
}

impl KeyParts<'_> {
    fn render(&self) -> String {
        squash_whitespace(&format!(
            "{}__loc{}__fac{}__{}__{}__{}__age{}",
            self.id_like, self.location, self.facility, self.day, self.start, self.end, self.ages
        ))
    }
}

impl DedupKey for DropInProgram {
    fn dedup_key(&self) -> String {
        let id_like = id_text(self.course_id.as_ref())
            .or_else(|| self.course_code.clone())
            .or_else(|| id_text(self.program_id.as_ref()))
            .or_else(|| self.activity.clone())
            .unwrap_or_else(|| self.course_title.clone());
        KeyParts {
            id_like,
            location: id_text(self.location_id.as_ref()).unwrap_or_default(),
            facility: id_text(self.facility_id.as_ref()).unwrap_or_default(),
            day: self.day_of_week.as_deref().unwrap_or_default(),
            start: self.start_time.as_deref().unwrap_or_default(),
            end: self.end_time.as_deref().unwrap_or_default(),
            ages: age_part(self.age_min, self.age_max),
        }
        .render()
    }
}

impl DedupKey for RegisteredProgram {
    fn dedup_key(&self) -> String {
        let id_like = id_text(self.identity())
            .or_else(|| self.activity_title.clone())
            .unwrap_or_else(|| self.course_title.clone());
        KeyParts {
            id_like,
            location: id_text(self.location_id.as_ref()).unwrap_or_default(),
            facility: String::new(),
            day: self
                .day_of_week
                .as_deref()
                .or(self.days_of_week.as_deref())
                .unwrap_or_default(),
            start: self.start_time.as_deref().unwrap_or_default(),
            end: self.end_time.as_deref().unwrap_or_default(),
            ages: age_part(self.min_age, self.max_age),
        }
        .render()
    }
}

/// Keep the first occurrence per dedup key, preserving input order
#[must_use]
pub fn dedupe<T: DedupKey + Clone>(programs: &[T]) -> Vec<T> {
    let mut seen = HashSet::new();
    programs
        .iter()
        .filter(|p| seen.insert(p.dedup_key()))
        .cloned()
        .collect()
}
