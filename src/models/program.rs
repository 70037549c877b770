//! Program records: drop-in sessions, registered courses and raw row shapes

use serde::{Deserialize, Serialize};

use super::ids::{Identifier, LooseValue};

/// A single drop-in session occurrence
///
/// Every schedule and age field is optional; absent means "unknown", never zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DropInProgram {
    #[serde(default)]
    pub id: Option<Identifier>,
    #[serde(default)]
    pub course_id: Option<Identifier>,
    #[serde(default)]
    pub course_code: Option<String>,
    #[serde(default)]
    pub program_id: Option<Identifier>,
    /// Centre reference
    #[serde(default, alias = "centre_id")]
    pub location_id: Option<Identifier>,
    #[serde(default)]
    pub facility_id: Option<Identifier>,
    #[serde(default)]
    pub course_title: String,
    /// Explicit activity / sport, when the backend provides one
    #[serde(default)]
    pub activity: Option<String>,
    #[serde(default)]
    pub section: Option<String>,
    /// e.g. "Monday"
    #[serde(default)]
    pub day_of_week: Option<String>,
    /// `HH:MM:SS`
    #[serde(default)]
    pub start_time: Option<String>,
    /// `HH:MM:SS`
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub age_min: Option<f64>,
    #[serde(default)]
    pub age_max: Option<f64>,

    // Location context, filled in by the cross-centre search endpoint
    #[serde(default)]
    pub location_name: Option<String>,
    #[serde(default)]
    pub asset_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    /// 0 = Monday .. 6 = Sunday
    #[serde(default)]
    pub weekday: Option<u8>,
    #[serde(default)]
    pub date_range: Option<String>,
    #[serde(default)]
    pub first_date: Option<String>,
    #[serde(default)]
    pub last_date: Option<String>,
}

impl DropInProgram {
    /// Minimal record, mostly useful for building fixtures
    #[must_use]
    pub fn new(course_title: impl Into<String>) -> Self {
        Self {
            course_title: course_title.into(),
            ..Self::default()
        }
    }

    /// Display name for the place this session happens at
    #[must_use]
    pub fn place_name(&self) -> &str {
        self.location_name
            .as_deref()
            .or(self.asset_name.as_deref())
            .unwrap_or("Unknown Location")
    }
}

/// A single registered-course section occurrence, normalized
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegisteredProgram {
    pub course_title: String,
    pub days_of_week: Option<String>,
    pub program_category: Option<String>,
    pub min_age: Option<f64>,
    pub max_age: Option<f64>,

    /// Single weekday, when the source carries one
    pub day_of_week: Option<String>,
    /// `HH:MM:SS`
    pub start_time: Option<String>,
    /// `HH:MM:SS`
    pub end_time: Option<String>,

    // Source data is inconsistent about which identifier is populated
    pub course_id: Option<Identifier>,
    pub course_instance_id: Option<Identifier>,
    pub occurrence_id: Option<Identifier>,
    pub program_id: Option<Identifier>,
    pub location_id: Option<Identifier>,

    pub section: Option<String>,
    pub activity_title: Option<String>,
    /// Human readable "from–to" date range
    pub from_to: Option<String>,
    pub activity_url: Option<String>,
    pub status_info: Option<String>,
}

impl RegisteredProgram {
    /// First populated identifier, used as a stable list key
    #[must_use]
    pub fn identity(&self) -> Option<&Identifier> {
        self.course_id
            .as_ref()
            .or(self.course_instance_id.as_ref())
            .or(self.occurrence_id.as_ref())
            .or(self.program_id.as_ref())
    }
}

/// Registered program row as served by the backend (snake_case, split times)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisteredRecord {
    #[serde(default)]
    pub id: Option<Identifier>,
    #[serde(default)]
    pub course_id: Option<Identifier>,
    #[serde(default)]
    pub course_instance_id: Option<Identifier>,
    #[serde(default)]
    pub occurrence_id: Option<Identifier>,
    #[serde(default)]
    pub program_id: Option<Identifier>,
    #[serde(default)]
    pub location_id: Option<Identifier>,
    #[serde(default)]
    pub course_title: Option<String>,
    #[serde(default)]
    pub activity_title: Option<String>,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub days_of_week: Option<String>,
    #[serde(default)]
    pub day_of_week: Option<String>,
    #[serde(default)]
    pub from_to: Option<String>,
    #[serde(default)]
    pub start_hour: Option<LooseValue>,
    #[serde(default)]
    pub start_minute: Option<LooseValue>,
    #[serde(default)]
    pub end_hour: Option<LooseValue>,
    #[serde(default)]
    pub end_minute: Option<LooseValue>,
    #[serde(default)]
    pub min_age: Option<LooseValue>,
    #[serde(default)]
    pub max_age: Option<LooseValue>,
    #[serde(default)]
    pub program_category: Option<String>,
    #[serde(default)]
    pub registration_date: Option<String>,
    #[serde(default)]
    pub status_info: Option<String>,
    #[serde(default)]
    pub activity_url: Option<String>,
}

/// Raw registered-program CSV row (Toronto open data column names)
///
/// Only ever passed through [`crate::adapter::adapt_csv_row`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisteredCsvRow {
    #[serde(rename = "Course_ID", default)]
    pub course_id: Option<String>,
    #[serde(rename = "Location ID", default)]
    pub location_id: Option<String>,
    #[serde(rename = "Section", default)]
    pub section: Option<String>,
    #[serde(rename = "Activity Title", default)]
    pub activity_title: Option<String>,
    #[serde(rename = "Course Title", default)]
    pub course_title: Option<String>,
    #[serde(rename = "Days of The Week", default)]
    pub days_of_week: Option<String>,
    #[serde(rename = "From To", default)]
    pub from_to: Option<String>,
    #[serde(rename = "Start Hour", default)]
    pub start_hour: Option<String>,
    #[serde(rename = "Start Min", default)]
    pub start_min: Option<String>,
    #[serde(rename = "End Hour", default)]
    pub end_hour: Option<String>,
    #[serde(rename = "End Min", default)]
    pub end_min: Option<String>,
    #[serde(rename = "Min Age", default)]
    pub min_age: Option<String>,
    #[serde(rename = "Max Age", default)]
    pub max_age: Option<String>,
    #[serde(rename = "Program Category", default)]
    pub program_category: Option<String>,
    #[serde(rename = "Activity URL", default)]
    pub activity_url: Option<String>,
    #[serde(rename = "Status / Information", default)]
    pub status_info: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dropin_deserializes_with_missing_fields() {
        let program: DropInProgram = serde_json::from_str(
            r#"{"course_title": "Badminton Drop-in", "day_of_week": "Monday",
                "start_time": "18:00:00", "end_time": null, "age_min": null, "centre_id": 12}"#,
        )
        .unwrap();
        assert_eq!(program.course_title, "Badminton Drop-in");
        assert_eq!(program.day_of_week.as_deref(), Some("Monday"));
        assert_eq!(program.end_time, None);
        assert_eq!(program.age_min, None);
        assert_eq!(program.location_id, Some(Identifier::Number(12)));
    }

    #[test]
    fn test_dropin_place_name_fallbacks() {
        let mut program = DropInProgram::new("Yoga");
        assert_eq!(program.place_name(), "Unknown Location");
        program.asset_name = Some("Main Gym".to_string());
        assert_eq!(program.place_name(), "Main Gym");
        program.location_name = Some("Wellesley CRC".to_string());
        assert_eq!(program.place_name(), "Wellesley CRC");
    }

    #[test]
    fn test_registered_identity_prefers_course_id() {
        let program = RegisteredProgram {
            occurrence_id: Some(Identifier::from("occ-1")),
            course_id: Some(Identifier::Number(77)),
            ..RegisteredProgram::default()
        };
        assert_eq!(program.identity(), Some(&Identifier::Number(77)));

        let program = RegisteredProgram {
            occurrence_id: Some(Identifier::from("occ-1")),
            ..RegisteredProgram::default()
        };
        assert_eq!(program.identity(), Some(&Identifier::from("occ-1")));
    }
}
