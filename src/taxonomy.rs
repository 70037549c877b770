//! Registered program category taxonomy
//!
//! Toronto's registered programs carry a free-text `section` such as
//! `"Swim - Ultra Swim 1-9"`. Sections are bucketed into eight fixed
//! categories, each with its canonical list of sections.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RecFinderError;

/// UI-facing category of a registered program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CategoryTag {
    Arts,
    Camp,
    Fitness,
    #[serde(rename = "Hobbies and Interests")]
    HobbiesAndInterests,
    Skate,
    Sports,
    Swim,
    Others,
}

impl CategoryTag {
    /// Fixed display order
    pub const ALL: [CategoryTag; 8] = [
        CategoryTag::Arts,
        CategoryTag::Camp,
        CategoryTag::Fitness,
        CategoryTag::HobbiesAndInterests,
        CategoryTag::Skate,
        CategoryTag::Sports,
        CategoryTag::Swim,
        CategoryTag::Others,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            CategoryTag::Arts => "Arts",
            CategoryTag::Camp => "Camp",
            CategoryTag::Fitness => "Fitness",
            CategoryTag::HobbiesAndInterests => "Hobbies and Interests",
            CategoryTag::Skate => "Skate",
            CategoryTag::Sports => "Sports",
            CategoryTag::Swim => "Swim",
            CategoryTag::Others => "Others",
        }
    }

    /// Canonical sections offered under this category, in display order
    #[must_use]
    pub fn canonical_sections(self) -> &'static [&'static str] {
        match self {
            CategoryTag::Arts => ARTS,
            CategoryTag::Camp => CAMP,
            CategoryTag::Fitness => FITNESS,
            CategoryTag::HobbiesAndInterests => HOBBIES,
            CategoryTag::Skate => SKATE,
            CategoryTag::Sports => SPORTS,
            CategoryTag::Swim => SWIM,
            CategoryTag::Others => OTHERS,
        }
    }
}

impl fmt::Display for CategoryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CategoryTag {
    type Err = RecFinderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        CategoryTag::ALL
            .into_iter()
            .find(|tag| tag.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                RecFinderError::validation(format!(
                    "Unknown category '{wanted}'. Expected one of: {}",
                    CategoryTag::ALL.map(CategoryTag::label).join(", ")
                ))
            })
    }
}

/// Bucket a section into its category. Total: blank or unknown text is `Others`.
#[must_use]
pub fn category_for_section(section: Option<&str>) -> CategoryTag {
    let section = section.unwrap_or_default().trim();
    if section.starts_with("Arts - ") {
        CategoryTag::Arts
    } else if section.starts_with("CampTO") {
        CategoryTag::Camp
    } else if section.starts_with("FitnessTO - ") {
        CategoryTag::Fitness
    } else if section.starts_with("Hobbies and Interests - ") {
        CategoryTag::HobbiesAndInterests
    } else if section.starts_with("Skate - ") {
        CategoryTag::Skate
    } else if section.starts_with("Sports - ") {
        CategoryTag::Sports
    } else if section.starts_with("Swim - ") || section == "Swim" {
        CategoryTag::Swim
    } else {
        CategoryTag::Others
    }
}

/// Canonical sections for an optional category; nothing selected yields nothing
#[must_use]
pub fn canonical_sections(category: Option<CategoryTag>) -> &'static [&'static str] {
    category
        .map(CategoryTag::canonical_sections)
        .unwrap_or_default()
}

const ARTS: &[&str] = &[
    "Arts - Crafts",
    "Arts - Dance",
    "Arts - Music",
    "Arts - Performing Arts",
    "Arts - Visual Arts",
    "Arts - Workshops",
];

const CAMP: &[&str] = &["CampTO", "CampTO Explore", "CampTO Plus"];

const FITNESS: &[&str] = &[
    "FitnessTO - Cardio",
    "FitnessTO - Dance",
    "FitnessTO - Functional Fit",
    "FitnessTO - Low Impact",
    "FitnessTO - Mind and Body",
    "FitnessTO - Strength",
];

const HOBBIES: &[&str] = &[
    "Hobbies and Interests - Cards and Games",
    "Hobbies and Interests - Clubs",
    "Hobbies and Interests - Cooking",
    "Hobbies and Interests - Gardening",
    "Hobbies and Interests - Learning",
    "Hobbies and Interests - Nature",
    "Hobbies and Interests - Older Adult Trip",
    "Hobbies and Interests - Science",
    "Hobbies and Interests - Special Events",
    "Hobbies and Interests - Technology",
    "Hobbies and Interests - Workshops",
];

const SKATE: &[&str] = &[
    "Skate - Figure Skating",
    "Skate - Hockey",
    "Skate - Learn to Skate",
];

const SPORTS: &[&str] = &[
    "Sports - Adventure Sports",
    "Sports - Badminton",
    "Sports - Ball Hockey",
    "Sports - Baseball/Softball",
    "Sports - Basketball",
    "Sports - Clinics and Workshops",
    "Sports - Cricket",
    "Sports - Cycling",
    "Sports - Dodgeball",
    "Sports - Golf",
    "Sports - Gymnastics",
    "Sports - Martial Arts",
    "Sports - Multi-Sport",
    "Sports - Pickleball",
    "Sports - Soccer",
    "Sports - Tennis and Table Tennis",
    "Sports - Volleyball",
];

const SWIM: &[&str] = &[
    "Swim - Adult and Older Adult Swim 1-3",
    "Swim - Aquatic Sport and Competitive",
    "Swim - Clinics",
    "Swim - Guardian Swim 1-3",
    "Swim - Pre-Lifeguard",
    "Swim - Preschool Swim 1-4 and Tiny Tots",
    "Swim - Small Group/Semi/Private Lessons",
    "Swim - Stroke Improvement and Swim Fit",
    "Swim - Swim to Survive",
    "Swim - Ultra Swim 1-9",
    "Swim - Youth Ultra Swim 1-3",
];

const OTHERS: &[&str] = &[
    "Adapted Activities",
    "Adapted CampTO",
    "Adapted Swim",
    "Adapted Virtual Programming",
    "After School Care Programs",
    "Aquatic Leadership",
    "Early Years Play Programming",
    "Leadership and Employment Readiness",
];

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("Arts - Music"), CategoryTag::Arts)]
    #[case(Some("CampTO Explore"), CategoryTag::Camp)]
    #[case(Some("FitnessTO - Strength"), CategoryTag::Fitness)]
    #[case(Some("Hobbies and Interests - Cooking"), CategoryTag::HobbiesAndInterests)]
    #[case(Some("Skate - Hockey"), CategoryTag::Skate)]
    #[case(Some("  Sports - Badminton  "), CategoryTag::Sports)]
    #[case(Some("Swim - Ultra Swim 1-9"), CategoryTag::Swim)]
    #[case(Some("Swim"), CategoryTag::Swim)]
    #[case(Some("Swimming"), CategoryTag::Others)]
    #[case(Some("Adapted CampTO"), CategoryTag::Others)]
    #[case(Some("Arts"), CategoryTag::Others)]
    #[case(Some(""), CategoryTag::Others)]
    #[case(None, CategoryTag::Others)]
    fn test_category_for_section(#[case] section: Option<&str>, #[case] expected: CategoryTag) {
        assert_eq!(category_for_section(section), expected);
    }

    #[test]
    fn test_canonical_sections_classify_back_to_their_category() {
        for tag in CategoryTag::ALL {
            for section in tag.canonical_sections() {
                assert_eq!(category_for_section(Some(section)), tag, "{section}");
            }
        }
    }

    #[test]
    fn test_canonical_sections_for_nothing_selected() {
        assert!(canonical_sections(None).is_empty());
        assert_eq!(canonical_sections(Some(CategoryTag::Camp)).len(), 3);
    }

    #[test]
    fn test_parse_category_labels() {
        assert_eq!(
            "hobbies and interests".parse::<CategoryTag>().unwrap(),
            CategoryTag::HobbiesAndInterests
        );
        assert_eq!(" Swim ".parse::<CategoryTag>().unwrap(), CategoryTag::Swim);
        assert!("Aquatics".parse::<CategoryTag>().is_err());
    }

    #[test]
    fn test_all_is_in_display_order() {
        let labels: Vec<&str> = CategoryTag::ALL.iter().map(|t| t.label()).collect();
        assert_eq!(
            labels,
            vec![
                "Arts",
                "Camp",
                "Fitness",
                "Hobbies and Interests",
                "Skate",
                "Sports",
                "Swim",
                "Others"
            ]
        );
    }
}
