//! Centre facts, facility inventory and per-centre program payloads

use serde::{Deserialize, Serialize};

use super::ids::{Identifier, LooseValue};
use super::program::{DropInProgram, RegisteredRecord};

/// Static descriptive facts about a recreation centre
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CentreDetail {
    #[serde(alias = "location_id")]
    pub id: Identifier,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub intersection: Option<String>,
    #[serde(default)]
    pub ttc_information: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub accessibility: Option<String>,
    #[serde(default)]
    pub amenities: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub facility_type: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

/// The backend serialises missing text columns as the literal "None"
fn present(value: Option<&String>) -> Option<&str> {
    value
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && *s != "None")
}

impl CentreDetail {
    #[must_use]
    pub fn display_name(&self) -> &str {
        present(self.name.as_ref()).unwrap_or("Centre Details")
    }

    #[must_use]
    pub fn address(&self) -> Option<&str> {
        present(self.address.as_ref())
    }

    #[must_use]
    pub fn district(&self) -> Option<&str> {
        present(self.district.as_ref())
    }

    #[must_use]
    pub fn intersection(&self) -> Option<&str> {
        present(self.intersection.as_ref())
    }

    #[must_use]
    pub fn ttc_information(&self) -> Option<&str> {
        present(self.ttc_information.as_ref())
    }

    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        present(self.phone.as_ref())
    }

    #[must_use]
    pub fn accessibility(&self) -> Option<&str> {
        present(self.accessibility.as_ref())
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        present(self.description.as_ref())
    }

    #[must_use]
    pub fn facility_type(&self) -> Option<&str> {
        present(self.facility_type.as_ref())
    }

    #[must_use]
    pub fn url(&self) -> Option<&str> {
        present(self.url.as_ref())
    }

    /// Comma separated amenities, trimmed, blanks dropped
    #[must_use]
    pub fn amenity_list(&self) -> Vec<&str> {
        present(self.amenities.as_ref())
            .map(|all| {
                all.split(',')
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// One facility (pool, gym, rink, ...) at a centre
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CentreFacility {
    #[serde(default)]
    pub facility_id: Option<Identifier>,
    pub facility_type: String,
    #[serde(default)]
    pub facility_type_code: Option<LooseValue>,
    #[serde(default)]
    pub asset_name: Option<String>,
    #[serde(default)]
    pub permit: Option<String>,
    #[serde(default)]
    pub facility_rating: Option<LooseValue>,
}

impl CentreFacility {
    /// Facility types with their counts, in first-seen order
    #[must_use]
    pub fn tally(facilities: &[CentreFacility]) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for facility in facilities {
            match counts
                .iter_mut()
                .find(|(kind, _)| *kind == facility.facility_type)
            {
                Some((_, count)) => *count += 1,
                None => counts.push((facility.facility_type.clone(), 1)),
            }
        }
        counts
    }
}

/// Payload of `/api/centres/{id}/programs`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CentrePrograms {
    #[serde(default)]
    pub dropin: Vec<DropInProgram>,
    #[serde(default)]
    pub registered: Vec<RegisteredRecord>,
}

/// Detail, programs and facilities for one centre, fetched together
#[derive(Debug, Clone)]
pub struct CentreDetails {
    pub detail: CentreDetail,
    pub programs: CentrePrograms,
    pub facilities: Vec<CentreFacility>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facility(kind: &str) -> CentreFacility {
        CentreFacility {
            facility_id: None,
            facility_type: kind.to_string(),
            facility_type_code: None,
            asset_name: None,
            permit: None,
            facility_rating: None,
        }
    }

    #[test]
    fn test_none_strings_are_absent() {
        let detail: CentreDetail = serde_json::from_str(
            r#"{"location_id": "101", "name": "Wellesley CRC", "phone": "None",
                "amenities": "Pool, Gym,, Sauna ", "url": "None"}"#,
        )
        .unwrap();
        assert_eq!(detail.id.to_string(), "101");
        assert_eq!(detail.display_name(), "Wellesley CRC");
        assert_eq!(detail.phone(), None);
        assert_eq!(detail.url(), None);
        assert_eq!(detail.amenity_list(), vec!["Pool", "Gym", "Sauna"]);
    }

    #[test]
    fn test_facility_tally_keeps_first_seen_order() {
        let facilities = vec![
            facility("Pool"),
            facility("Gymnasium"),
            facility("Pool"),
            facility("Arena"),
        ];
        assert_eq!(
            CentreFacility::tally(&facilities),
            vec![
                ("Pool".to_string(), 2),
                ("Gymnasium".to_string(), 1),
                ("Arena".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_centre_programs_default_to_empty() {
        let programs: CentrePrograms = serde_json::from_str("{}").unwrap();
        assert!(programs.dropin.is_empty());
        assert!(programs.registered.is_empty());
    }
}
