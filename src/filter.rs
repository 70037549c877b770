//! Filter pipeline over loaded programs
//!
//! Every filter is pure and order-preserving, and an absent facet is the
//! identity. The pipeline narrows by age first, then sport or category, then
//! schedule or section.

use chrono::{Datelike, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::classify::classify_dropin;
use crate::error::{RecFinderError, Result};
use crate::models::{DropInProgram, RegisteredProgram};
use crate::schedule::schedule_key;
use crate::taxonomy::{CategoryTag, category_for_section};

/// Age bracket offered by the filter panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeBracket {
    Young,
    Teen,
    Adult,
    Senior,
}

impl AgeBracket {
    pub const ALL: [AgeBracket; 4] = [
        AgeBracket::Young,
        AgeBracket::Teen,
        AgeBracket::Adult,
        AgeBracket::Senior,
    ];

    /// Inclusive `[low, high]` ages covered by the bracket
    #[must_use]
    pub fn bounds(self) -> (f64, f64) {
        match self {
            AgeBracket::Young => (0.0, 12.0),
            AgeBracket::Teen => (13.0, 18.0),
            AgeBracket::Adult => (19.0, 65.0),
            AgeBracket::Senior => (55.0, f64::INFINITY),
        }
    }

    /// Query parameter value understood by the backend
    #[must_use]
    pub fn as_param(self) -> &'static str {
        match self {
            AgeBracket::Young => "young",
            AgeBracket::Teen => "teen",
            AgeBracket::Adult => "adult",
            AgeBracket::Senior => "senior",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            AgeBracket::Young => "Under 12",
            AgeBracket::Teen => "13-18",
            AgeBracket::Adult => "19-65",
            AgeBracket::Senior => "65+",
        }
    }

    /// Overlap test; an unknown bound never excludes
    #[must_use]
    pub fn admits(self, min: Option<f64>, max: Option<f64>) -> bool {
        let (low, high) = self.bounds();
        known_age(min).is_none_or(|min| min <= high) && known_age(max).is_none_or(|max| max >= low)
    }
}

impl fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AgeBracket {
    type Err = RecFinderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "young" | "child" | "kids" => Ok(AgeBracket::Young),
            "teen" | "youth" => Ok(AgeBracket::Teen),
            "adult" => Ok(AgeBracket::Adult),
            "senior" | "older-adult" => Ok(AgeBracket::Senior),
            other => Err(RecFinderError::validation(format!(
                "Unknown age bracket '{other}'. Expected young, teen, adult or senior"
            ))),
        }
    }
}

/// Age bound as the source data means it: 0 and NaN stand for "not set"
#[must_use]
pub fn known_age(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}

/// Parse a weekday given as `0`-`6` (Monday first), an English name or
/// abbreviation, or `today` in Toronto local time
pub fn parse_weekday(raw: &str) -> Result<Weekday> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("today") {
        let local = chrono::Utc::now().with_timezone(&chrono_tz::America::Toronto);
        return Ok(local.weekday());
    }
    if let Ok(index) = raw.parse::<u8>() {
        return Weekday::try_from(index).map_err(|_| {
            RecFinderError::validation(format!("Weekday index {index} out of range 0-6"))
        });
    }
    raw.parse::<Weekday>()
        .map_err(|_| RecFinderError::validation(format!("Unknown weekday '{raw}'")))
}

/// Records carrying an optional eligible age range
pub trait AgeBounds {
    fn age_bounds(&self) -> (Option<f64>, Option<f64>);
}

impl AgeBounds for DropInProgram {
    fn age_bounds(&self) -> (Option<f64>, Option<f64>) {
        (self.age_min, self.age_max)
    }
}

impl AgeBounds for RegisteredProgram {
    fn age_bounds(&self) -> (Option<f64>, Option<f64>) {
        (self.min_age, self.max_age)
    }
}

/// Programs whose known age bounds overlap `bracket`
#[must_use]
pub fn filter_by_age<T: AgeBounds + Clone>(programs: &[T], bracket: Option<AgeBracket>) -> Vec<T> {
    let Some(bracket) = bracket else {
        return programs.to_vec();
    };
    programs
        .iter()
        .filter(|p| {
            let (min, max) = p.age_bounds();
            bracket.admits(min, max)
        })
        .cloned()
        .collect()
}

/// Drop-in programs matching a sport and, within it, a schedule key
#[must_use]
pub fn filter_dropin(
    programs: &[DropInProgram],
    sport: Option<&str>,
    schedule: Option<&str>,
) -> Vec<DropInProgram> {
    programs
        .iter()
        .filter(|p| sport.is_none_or(|sport| classify_dropin(p) == sport))
        .filter(|p| schedule.is_none_or(|key| schedule_key(p) == key))
        .cloned()
        .collect()
}

/// Registered programs matching a category and, within it, a section
///
/// A program without section text cannot be placed under any requested
/// facet and is dropped whenever either facet is set.
#[must_use]
pub fn filter_registered(
    programs: &[RegisteredProgram],
    category: Option<CategoryTag>,
    section: Option<&str>,
) -> Vec<RegisteredProgram> {
    if category.is_none() && section.is_none() {
        return programs.to_vec();
    }
    programs
        .iter()
        .filter(|p| {
            let Some(own) = p.section.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
                return false;
            };
            category.is_none_or(|c| category_for_section(Some(own)) == c)
                && section.is_none_or(|s| own == s.trim())
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn dropin_aged(title: &str, min: Option<f64>, max: Option<f64>) -> DropInProgram {
        DropInProgram {
            age_min: min,
            age_max: max,
            ..DropInProgram::new(title)
        }
    }

    fn registered(section: Option<&str>) -> RegisteredProgram {
        RegisteredProgram {
            course_title: "Course".to_string(),
            section: section.map(str::to_string),
            ..RegisteredProgram::default()
        }
    }

    #[rstest]
    #[case(Some(5.0), Some(11.0), AgeBracket::Young, true)]
    #[case(Some(5.0), Some(11.0), AgeBracket::Senior, false)]
    #[case(Some(5.0), Some(11.0), AgeBracket::Teen, false)]
    #[case(Some(12.0), Some(14.0), AgeBracket::Teen, true)]
    #[case(Some(60.0), None, AgeBracket::Adult, true)]
    #[case(Some(60.0), None, AgeBracket::Senior, true)]
    #[case(Some(18.0), Some(54.0), AgeBracket::Senior, false)]
    #[case(None, Some(6.0), AgeBracket::Adult, false)]
    #[case(None, None, AgeBracket::Young, true)]
    #[case(None, None, AgeBracket::Senior, true)]
    #[case(Some(0.0), Some(0.0), AgeBracket::Young, true)]
    #[case(Some(0.0), Some(0.0), AgeBracket::Teen, true)]
    #[case(Some(0.0), Some(0.0), AgeBracket::Adult, true)]
    #[case(Some(0.0), Some(0.0), AgeBracket::Senior, true)]
    #[case(Some(0.0), Some(6.0), AgeBracket::Young, true)]
    #[case(Some(0.0), Some(6.0), AgeBracket::Teen, false)]
    #[case(Some(19.0), Some(0.0), AgeBracket::Senior, true)]
    fn test_bracket_overlap(
        #[case] min: Option<f64>,
        #[case] max: Option<f64>,
        #[case] bracket: AgeBracket,
        #[case] expected: bool,
    ) {
        assert_eq!(bracket.admits(min, max), expected);
    }

    #[test]
    fn test_filter_by_age_preserves_order() {
        let programs = vec![
            dropin_aged("A", Some(5.0), Some(11.0)),
            dropin_aged("B", Some(19.0), None),
            dropin_aged("C", None, None),
        ];
        let young: Vec<String> = filter_by_age(&programs, Some(AgeBracket::Young))
            .into_iter()
            .map(|p| p.course_title)
            .collect();
        assert_eq!(young, vec!["A", "C"]);
        assert_eq!(filter_by_age(&programs, None), programs);
    }

    #[test]
    fn test_filter_dropin_by_sport_then_schedule() {
        let mut monday = DropInProgram::new("Badminton Drop-in");
        monday.day_of_week = Some("Monday".to_string());
        monday.start_time = Some("18:00:00".to_string());
        monday.end_time = Some("19:00:00".to_string());
        let mut friday = monday.clone();
        friday.day_of_week = Some("Friday".to_string());
        let swim = DropInProgram::new("Lane Swim");

        let programs = vec![monday.clone(), swim, friday];
        assert_eq!(filter_dropin(&programs, Some("Badminton"), None).len(), 2);
        assert_eq!(
            filter_dropin(&programs, Some("Badminton"), Some("Monday 18:00–19:00")),
            vec![monday]
        );
        assert_eq!(filter_dropin(&programs, None, None), programs);
    }

    #[test]
    fn test_filter_registered_requires_section_only_when_filtering() {
        let programs = vec![
            registered(Some("Swim - Clinics")),
            registered(None),
            registered(Some("  ")),
            registered(Some("Arts - Music")),
        ];
        assert_eq!(filter_registered(&programs, None, None).len(), 4);

        let swim = filter_registered(&programs, Some(CategoryTag::Swim), None);
        assert_eq!(swim, vec![registered(Some("Swim - Clinics"))]);

        let others = filter_registered(&programs, Some(CategoryTag::Others), None);
        assert!(others.is_empty());

        let music = filter_registered(&programs, None, Some("Arts - Music"));
        assert_eq!(music.len(), 1);
    }

    #[rstest]
    #[case("0", Weekday::Mon)]
    #[case("6", Weekday::Sun)]
    #[case("wednesday", Weekday::Wed)]
    #[case("Fri", Weekday::Fri)]
    fn test_parse_weekday(#[case] raw: &str, #[case] expected: Weekday) {
        assert_eq!(parse_weekday(raw).unwrap(), expected);
    }

    #[test]
    fn test_parse_weekday_rejects_garbage() {
        assert!(parse_weekday("7").is_err());
        assert!(parse_weekday("someday").is_err());
        assert!(parse_weekday("today").is_ok());
    }

    #[test]
    fn test_parse_age_bracket() {
        assert_eq!("Senior".parse::<AgeBracket>().unwrap(), AgeBracket::Senior);
        assert!("toddler".parse::<AgeBracket>().is_err());
    }
}
