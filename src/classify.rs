//! Sport and category classification
//!
//! Classification is derived from text fields on every call and never stored
//! back on the record.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::models::{DropInProgram, RegisteredProgram};
use crate::taxonomy::{CategoryTag, category_for_section};

/// Keywords searched in a lower-cased course title, first hit wins
const TITLE_KEYWORDS: [&str; 8] = [
    "badminton",
    "basketball",
    "pickleball",
    "table tennis",
    "swim",
    "yoga",
    "dance",
    "gym",
];

/// Sport label used when neither the activity nor the title says anything
pub const OTHER_SPORT: &str = "Other";

/// Canonical sport label of a drop-in program
///
/// A non-blank explicit `activity` is returned trimmed and otherwise verbatim.
/// Without one, the course title is scanned for known keywords.
#[must_use]
pub fn classify_dropin(program: &DropInProgram) -> String {
    if let Some(activity) = program
        .activity
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
    {
        return activity.to_string();
    }
    sport_from_title(&program.course_title)
}

fn sport_from_title(title: &str) -> String {
    let lower = title.to_lowercase();
    match TITLE_KEYWORDS.iter().find(|k| lower.contains(*k)) {
        Some(&"table tennis") => "Table Tennis".to_string(),
        Some(keyword) => capitalize(keyword),
        None => OTHER_SPORT.to_string(),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Case-insensitive ordering with the original text as tie-break
fn locale_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Distinct sport labels present in `programs`, sorted for display
#[must_use]
pub fn sports_for(programs: &[DropInProgram]) -> Vec<String> {
    let mut sports: Vec<String> = programs
        .iter()
        .map(classify_dropin)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    sports.sort_by(|a, b| locale_order(a, b));
    sports
}

/// Category of a registered program, from its section text
#[must_use]
pub fn category_of(program: &RegisteredProgram) -> CategoryTag {
    category_for_section(program.section.as_deref())
}

/// Distinct categories present in `programs`, in fixed taxonomy order
#[must_use]
pub fn categories_for(programs: &[RegisteredProgram]) -> Vec<CategoryTag> {
    let present: BTreeSet<CategoryTag> = programs.iter().map(category_of).collect();
    CategoryTag::ALL
        .into_iter()
        .filter(|tag| present.contains(tag))
        .collect()
}

/// A canonical section together with how many loaded programs carry it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionOption {
    pub section: &'static str,
    pub count: usize,
}

impl SectionOption {
    /// Sections with no matching program are shown but cannot be picked
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.count > 0
    }
}

/// Canonical sections of `category` with their program counts
#[must_use]
pub fn section_options(programs: &[RegisteredProgram], category: CategoryTag) -> Vec<SectionOption> {
    category
        .canonical_sections()
        .iter()
        .map(|&section| SectionOption {
            section,
            count: programs
                .iter()
                .filter(|p| p.section.as_deref().map(str::trim) == Some(section))
                .count(),
        })
        .collect()
}
