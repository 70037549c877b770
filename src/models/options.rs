//! Filter option enumerations with counts

use serde::{Deserialize, Serialize};

use super::ids::{loose_count, loose_count_opt};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityOption {
    pub activity: String,
    #[serde(deserialize_with = "loose_count")]
    pub count: u64,
    #[serde(default, deserialize_with = "loose_count_opt")]
    pub locations: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictOption {
    pub district: String,
    #[serde(deserialize_with = "loose_count")]
    pub location_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityTypeOption {
    pub facility_type: String,
    #[serde(deserialize_with = "loose_count")]
    pub count: u64,
}

/// Everything the filter panel offers, fetched in one round
#[derive(Debug, Clone, Default, Serialize)]
pub struct FilterOptions {
    pub activities: Vec<ActivityOption>,
    pub districts: Vec<DistrictOption>,
    pub facility_types: Vec<FacilityTypeOption>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_option_from_combined_sum() {
        let options: Vec<ActivityOption> = serde_json::from_str(
            r#"[{"activity": "Lane Swim", "count": 340.0, "locations": 41.0},
                {"activity": "Badminton", "count": 12}]"#,
        )
        .unwrap();
        assert_eq!(options[0].count, 340);
        assert_eq!(options[0].locations, Some(41));
        assert_eq!(options[1].locations, None);
    }
}
