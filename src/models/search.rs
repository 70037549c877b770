//! Cross-centre program search responses

use serde::{Deserialize, Serialize};

use super::ids::{Identifier, loose_count};
use super::program::{DropInProgram, RegisteredRecord};

/// Response of `/api/programs/search`, discriminated by `program_type`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "program_type", rename_all = "lowercase")]
pub enum ProgramSearchResult {
    Dropin {
        #[serde(default)]
        total: usize,
        #[serde(default)]
        programs: Vec<DropInProgram>,
    },
    Registered {
        #[serde(default)]
        total: usize,
        #[serde(default)]
        programs: Vec<RegisteredRecord>,
    },
}

impl ProgramSearchResult {
    #[must_use]
    pub fn total(&self) -> usize {
        match self {
            ProgramSearchResult::Dropin { total, .. }
            | ProgramSearchResult::Registered { total, .. } => *total,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCount {
    #[serde(deserialize_with = "loose_count")]
    pub programs: u64,
    #[serde(deserialize_with = "loose_count")]
    pub centres: u64,
}

/// Response of `/api/programs/search/stats`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub dropin: SearchCount,
    pub registered: SearchCount,
    pub total: SearchCount,
}

impl std::fmt::Display for SearchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Found {} programs at {} centres ({} drop-in, {} registered)",
            self.total.programs, self.total.centres, self.dropin.programs, self.registered.programs
        )
    }
}

/// Row of `/api/centres/nearby`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyCentre {
    pub location_id: Identifier,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub facility_type: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub distance_km: Option<f64>,
    #[serde(default)]
    pub total_programs: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_result_is_tagged_by_program_type() {
        let dropin: ProgramSearchResult = serde_json::from_str(
            r#"{"program_type": "dropin", "total": 1, "filters": {"age": null},
                "programs": [{"course_title": "Pickleball", "day_of_week": "Friday"}]}"#,
        )
        .unwrap();
        match &dropin {
            ProgramSearchResult::Dropin { programs, .. } => {
                assert_eq!(programs[0].course_title, "Pickleball");
            }
            ProgramSearchResult::Registered { .. } => panic!("expected drop-in results"),
        }
        assert_eq!(dropin.total(), 1);

        let registered: ProgramSearchResult = serde_json::from_str(
            r#"{"program_type": "registered", "total": 0, "programs": []}"#,
        )
        .unwrap();
        assert!(matches!(registered, ProgramSearchResult::Registered { .. }));
    }

    #[test]
    fn test_unknown_program_type_is_rejected() {
        let result = serde_json::from_str::<ProgramSearchResult>(
            r#"{"program_type": "camps", "programs": []}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_stats_display() {
        let stats: SearchStats = serde_json::from_str(
            r#"{"dropin": {"programs": 20, "centres": 8},
                "registered": {"programs": 5, "centres": 12},
                "total": {"programs": 25, "centres": 12}}"#,
        )
        .unwrap();
        assert_eq!(
            stats.to_string(),
            "Found 25 programs at 12 centres (20 drop-in, 5 registered)"
        );
    }
}
