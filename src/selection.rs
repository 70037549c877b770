//! Facet selections for a centre's program lists
//!
//! Facets are hierarchical: picking a coarser facet (sport, category)
//! always clears the finer one (schedule, section) beneath it.

use crate::classify::{SectionOption, categories_for, section_options, sports_for};
use crate::filter::{AgeBracket, filter_by_age, filter_dropin, filter_registered};
use crate::models::{DropInProgram, RegisteredProgram};
use crate::schedule::{dedupe, schedules_for_sport};
use crate::taxonomy::CategoryTag;

/// Sport and schedule picked for drop-in programs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropinSelection {
    sport: Option<String>,
    schedule: Option<String>,
}

impl DropinSelection {
    #[must_use]
    pub fn sport(&self) -> Option<&str> {
        self.sport.as_deref()
    }

    #[must_use]
    pub fn schedule(&self) -> Option<&str> {
        self.schedule.as_deref()
    }

    /// Select a sport (or `None` for all); any schedule choice is dropped
    pub fn select_sport(&mut self, sport: Option<String>) {
        self.sport = sport;
        self.schedule = None;
    }

    /// Schedules only make sense within a sport and are ignored without one
    pub fn select_schedule(&mut self, schedule: Option<String>) {
        if self.sport.is_some() {
            self.schedule = schedule;
        }
    }

    /// Sport options for the loaded programs
    #[must_use]
    pub fn sports(programs: &[DropInProgram]) -> Vec<String> {
        sports_for(programs)
    }

    /// Schedule options for the selected sport; empty until a sport is picked
    #[must_use]
    pub fn schedules(&self, programs: &[DropInProgram]) -> Vec<String> {
        self.sport
            .as_deref()
            .map(|sport| schedules_for_sport(programs, sport))
            .unwrap_or_default()
    }

    /// Age, then sport, then schedule; duplicates collapsed for display
    #[must_use]
    pub fn apply(&self, programs: &[DropInProgram], age: Option<AgeBracket>) -> Vec<DropInProgram> {
        let by_age = filter_by_age(programs, age);
        let narrowed = filter_dropin(&by_age, self.sport(), self.schedule());
        dedupe(&narrowed)
    }
}

/// Category and section picked for registered programs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisteredSelection {
    category: Option<CategoryTag>,
    section: Option<String>,
}

impl RegisteredSelection {
    #[must_use]
    pub fn category(&self) -> Option<CategoryTag> {
        self.category
    }

    #[must_use]
    pub fn section(&self) -> Option<&str> {
        self.section.as_deref()
    }

    /// Select a category; any section choice is dropped
    pub fn select_category(&mut self, category: Option<CategoryTag>) {
        self.category = category;
        self.section = None;
    }

    pub fn select_section(&mut self, section: Option<String>) {
        if self.category.is_some() {
            self.section = section;
        }
    }

    #[must_use]
    pub fn categories(programs: &[RegisteredProgram]) -> Vec<CategoryTag> {
        categories_for(programs)
    }

    /// Canonical sections of the selected category with availability counts
    #[must_use]
    pub fn sections(&self, programs: &[RegisteredProgram]) -> Vec<SectionOption> {
        self.category
            .map(|category| section_options(programs, category))
            .unwrap_or_default()
    }

    /// Age, then category and section; repeated course rows collapse
    #[must_use]
    pub fn apply(
        &self,
        programs: &[RegisteredProgram],
        age: Option<AgeBracket>,
    ) -> Vec<RegisteredProgram> {
        let by_age = filter_by_age(programs, age);
        let narrowed = filter_registered(&by_age, self.category, self.section());
        dedupe(&narrowed)
    }
}
