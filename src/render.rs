//! Plain-text rendering of centres, programs and search results

use std::fmt::Write;

use crate::classify::SectionOption;
use crate::details::CentreProgramView;
use crate::filter::known_age;
use crate::models::{
    CentreDetails, CentreFacility, CentreFeatureCollection, DropInProgram, FilterOptions,
    NearbyCentre, RegisteredProgram,
};
use crate::schedule::{dedupe, fmt_time};

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// `"6-12"`, `"19+"`, `"Under 6"`, or `None` when neither bound is set
#[must_use]
pub fn age_label(min: Option<f64>, max: Option<f64>) -> Option<String> {
    match (known_age(min), known_age(max)) {
        (Some(min), Some(max)) => Some(format!("{min}-{max}")),
        (Some(min), None) => Some(format!("{min}+")),
        (None, Some(max)) => Some(format!("Under {max}")),
        (None, None) => None,
    }
}

/// `"Monday 18:00-19:00"`, `"Monday 18:00"` or just the day
#[must_use]
pub fn time_label(program: &DropInProgram) -> String {
    let day = program.day_of_week.as_deref().unwrap_or_default();
    let start = fmt_time(program.start_time.as_deref());
    let end = fmt_time(program.end_time.as_deref());
    match (day.is_empty(), start.is_empty(), end.is_empty()) {
        (false, false, false) => format!("{day} {start}-{end}"),
        (false, false, true) => format!("{day} {start}"),
        _ => day.to_string(),
    }
}

/// Programs grouped by weekday, Monday first; unknown days follow in
/// first-seen order and empty days are left out
#[must_use]
pub fn group_by_day(programs: &[DropInProgram]) -> Vec<(String, Vec<&DropInProgram>)> {
    let mut groups: Vec<(String, Vec<&DropInProgram>)> = WEEKDAYS
        .iter()
        .map(|d| ((*d).to_string(), Vec::new()))
        .collect();
    for program in programs {
        let day = program
            .day_of_week
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or("Unknown");
        match groups.iter_mut().find(|(name, _)| name == day) {
            Some((_, list)) => list.push(program),
            None => groups.push((day.to_string(), vec![program])),
        }
    }
    groups.retain(|(_, list)| !list.is_empty());
    groups
}

/// Day-by-day schedule of search results
#[must_use]
pub fn weekly_schedule(programs: &[DropInProgram]) -> String {
    if programs.is_empty() {
        return "No programs found matching your criteria\n".to_string();
    }
    let mut out = String::new();
    for (day, list) in group_by_day(programs) {
        let _ = writeln!(out, "{day}");
        for program in list {
            let _ = writeln!(
                out,
                "  {} - {}  {}  ({})",
                fmt_time(program.start_time.as_deref()),
                fmt_time(program.end_time.as_deref()),
                program.place_name(),
                age_label(program.age_min, program.age_max).unwrap_or_else(|| "All Ages".into())
            );
        }
    }
    out
}

/// Deduplicated drop-in list of one centre
#[must_use]
pub fn dropin_list(programs: &[DropInProgram]) -> String {
    let items = dedupe(programs);
    if items.is_empty() {
        return "No drop-in programs match your filters\n".to_string();
    }
    let mut out = String::from("Drop-in Programs\n");
    for program in &items {
        let title = if program.course_title.is_empty() {
            program.activity.as_deref().unwrap_or_default()
        } else {
            program.course_title.as_str()
        };
        let mut details = time_label(program);
        if let Some(ages) = age_label(program.age_min, program.age_max) {
            let _ = write!(details, " | Ages: {ages}");
        }
        let _ = writeln!(out, "  {title}\n    {}", details.trim_start());
    }
    out
}

/// Registered list of one centre
#[must_use]
pub fn registered_list(programs: &[RegisteredProgram]) -> String {
    if programs.is_empty() {
        return "No registered programs match your filters\n".to_string();
    }
    let dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    let mut out = String::from("Registered Programs\n");
    for program in programs {
        let _ = writeln!(out, "  [{}]", dash(&program.section));
        let _ = writeln!(out, "  {}", dash(&program.activity_title));
        let title = if program.course_title.is_empty() {
            "-"
        } else {
            program.course_title.as_str()
        };
        let _ = writeln!(out, "    {title}");
        let mut details = format!(
            "Days: {} | From–To: {}",
            dash(&program.days_of_week),
            dash(&program.from_to)
        );
        if let Some(ages) = age_label(program.min_age, program.max_age) {
            let _ = write!(details, " | Ages: {ages}");
        }
        if let Some(status) = &program.status_info {
            let _ = write!(details, " | Status: {status}");
        }
        let _ = writeln!(out, "    {details}");
        if let Some(url) = &program.activity_url {
            let _ = writeln!(out, "    View: {url}");
        }
    }
    out
}

/// Section dropdown entries; unavailable sections are marked
#[must_use]
pub fn section_menu(options: &[SectionOption]) -> String {
    let mut out = String::new();
    for option in options {
        let marker = if option.is_available() { ' ' } else { 'x' };
        let _ = writeln!(out, "  [{marker}] {} ({})", option.section, option.count);
    }
    out
}

fn facility_badges(facilities: &[CentreFacility]) -> String {
    CentreFacility::tally(facilities)
        .into_iter()
        .map(|(kind, count)| format!("{kind} ({count})"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Full sidebar rendering for one centre
#[must_use]
pub fn centre_details(details: &CentreDetails, view: &CentreProgramView) -> String {
    let detail = &details.detail;
    let mut out = String::new();
    let _ = writeln!(out, "{}", detail.display_name());
    let _ = writeln!(
        out,
        "{}",
        detail.facility_type().unwrap_or("Recreation Centre")
    );

    let _ = writeln!(out, "\nLocation Information");
    let rows = [
        ("Address", detail.address()),
        ("District", detail.district()),
        ("Intersection", detail.intersection()),
        ("TTC", detail.ttc_information()),
        ("Phone", detail.phone()),
    ];
    for (label, value) in rows {
        if let Some(value) = value {
            let _ = writeln!(out, "  {label}: {value}");
        }
    }

    let _ = writeln!(
        out,
        "\nAccessibility\n  {}",
        detail.accessibility().unwrap_or("Information not available")
    );

    let amenities = detail.amenity_list();
    if !amenities.is_empty() {
        let _ = writeln!(out, "\nAmenities\n  {}", amenities.join(", "));
    }

    if view.is_empty() {
        let _ = writeln!(out, "\nNo programs match your age filter");
    } else {
        if !view.dropin.is_empty() {
            let _ = write!(out, "\n{}", dropin_list(&view.dropin));
        }
        if !view.registered.is_empty() {
            let _ = write!(out, "\n{}", registered_list(&view.registered));
        }
    }

    if !details.facilities.is_empty() {
        let _ = writeln!(out, "\nFacilities\n  {}", facility_badges(&details.facilities));
    }
    if let Some(description) = detail.description() {
        let _ = writeln!(out, "\nDescription\n  {description}");
    }
    if let Some(url) = detail.url() {
        let _ = writeln!(out, "\nView on Toronto.ca: {url}");
    }
    out
}

/// Filter panel options with counts
#[must_use]
pub fn filter_options(options: &FilterOptions) -> String {
    let mut out = String::from("Activities\n");
    for a in &options.activities {
        match a.locations {
            Some(locations) => {
                let _ = writeln!(out, "  {} ({}, {} centres)", a.activity, a.count, locations);
            }
            None => {
                let _ = writeln!(out, "  {} ({})", a.activity, a.count);
            }
        }
    }
    let _ = writeln!(out, "\nDistricts");
    for d in &options.districts {
        let _ = writeln!(out, "  {} ({})", d.district, d.location_count);
    }
    let _ = writeln!(out, "\nFacility Types");
    for t in &options.facility_types {
        let _ = writeln!(out, "  {} ({})", t.facility_type, t.count);
    }
    out
}

/// One line per centre on the map
#[must_use]
pub fn centre_table(centres: &CentreFeatureCollection) -> String {
    if centres.features.is_empty() {
        return "No centres match your filters\n".to_string();
    }
    let mut out = String::new();
    for feature in &centres.features {
        let p = &feature.properties;
        let _ = writeln!(
            out,
            "{:>8}  {:<40}  {:>3} programs  {}",
            p.id.to_string(),
            feature.name(),
            p.total_programs.unwrap_or(0),
            p.district.as_deref().unwrap_or_default()
        );
    }
    out
}

#[must_use]
pub fn nearby_table(centres: &[NearbyCentre]) -> String {
    if centres.is_empty() {
        return "No centres found nearby\n".to_string();
    }
    let mut out = String::new();
    for c in centres {
        let _ = writeln!(
            out,
            "{:>6.2} km  {:<40}  {:>3} programs  {}",
            c.distance_km.unwrap_or_default(),
            c.name.as_deref().unwrap_or("Unnamed centre"),
            c.total_programs.unwrap_or(0),
            c.address.as_deref().unwrap_or_default()
        );
    }
    out
}
