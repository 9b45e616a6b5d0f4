//! Task model: one recurring household chore.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{EngineError, non_negative};

/// Highest cognitive/emotional load rating.
pub const MAX_LOAD: u8 = 3;

/// Fixed chore categories. Declaration order is the tie-break order for rankings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    #[serde(rename = "Cooking & Meals", alias = "cooking-meals")]
    CookingMeals,
    #[serde(rename = "Cleaning & Tidying", alias = "cleaning-tidying")]
    CleaningTidying,
    #[serde(rename = "Laundry", alias = "laundry")]
    Laundry,
    #[serde(rename = "Shopping & Errands", alias = "shopping-errands")]
    ShoppingErrands,
    #[serde(rename = "Childcare & Eldercare", alias = "childcare-eldercare")]
    ChildcareEldercare,
    #[serde(rename = "Home Upkeep (repairs/paperwork)", alias = "home-upkeep")]
    HomeUpkeep,
    #[serde(rename = "Finances & Admin", alias = "finances-admin")]
    FinancesAdmin,
    #[serde(rename = "Emotional Care", alias = "emotional-care")]
    EmotionalCare,
    #[serde(rename = "Planning & Scheduling", alias = "planning-scheduling")]
    PlanningScheduling,
    #[serde(rename = "Other", alias = "other")]
    Other,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::CookingMeals,
        Category::CleaningTidying,
        Category::Laundry,
        Category::ShoppingErrands,
        Category::ChildcareEldercare,
        Category::HomeUpkeep,
        Category::FinancesAdmin,
        Category::EmotionalCare,
        Category::PlanningScheduling,
        Category::Other,
    ];

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Category::CookingMeals => "Cooking & Meals",
            Category::CleaningTidying => "Cleaning & Tidying",
            Category::Laundry => "Laundry",
            Category::ShoppingErrands => "Shopping & Errands",
            Category::ChildcareEldercare => "Childcare & Eldercare",
            Category::HomeUpkeep => "Home Upkeep (repairs/paperwork)",
            Category::FinancesAdmin => "Finances & Admin",
            Category::EmotionalCare => "Emotional Care",
            Category::PlanningScheduling => "Planning & Scheduling",
            Category::Other => "Other",
        }
    }

    /// Short kebab-case name, handy on the command line
    pub fn slug(&self) -> &'static str {
        match self {
            Category::CookingMeals => "cooking-meals",
            Category::CleaningTidying => "cleaning-tidying",
            Category::Laundry => "laundry",
            Category::ShoppingErrands => "shopping-errands",
            Category::ChildcareEldercare => "childcare-eldercare",
            Category::HomeUpkeep => "home-upkeep",
            Category::FinancesAdmin => "finances-admin",
            Category::EmotionalCare => "emotional-care",
            Category::PlanningScheduling => "planning-scheduling",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(needle) || c.slug().eq_ignore_ascii_case(needle))
            .ok_or_else(|| format!("unknown category '{needle}'"))
    }
}

/// Who carries a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Assignee {
    #[default]
    A,
    B,
    #[serde(alias = "shared", alias = "both")]
    Shared,
}

impl fmt::Display for Assignee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Assignee::A => "A",
            Assignee::B => "B",
            Assignee::Shared => "Shared",
        })
    }
}

impl FromStr for Assignee {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "a" => Ok(Assignee::A),
            "b" => Ok(Assignee::B),
            "shared" | "both" => Ok(Assignee::Shared),
            other => Err(format!("unknown assignee '{other}' (expected A, B or Shared)")),
        }
    }
}

/// A recurring chore as entered by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque id, stable across edits
    pub id: String,
    pub title: String,
    pub category: Category,
    /// Occurrences per week.
    pub freq_per_week: f64,
    /// Minutes per occurrence.
    pub minutes_per_occur: f64,
    /// 0-3 planning/decision burden per occurrence.
    pub cognitive_load: u8,
    /// 0-3 emotional-care burden per occurrence.
    pub emotional_load: u8,
    pub assignee: Assignee,
}

impl Task {
    /// Default row: once a week, ten minutes, no extra load, carried by A.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: Category::Other,
            freq_per_week: 1.0,
            minutes_per_occur: 10.0,
            cognitive_load: 0,
            emotional_load: 0,
            assignee: Assignee::A,
        }
    }

    /// Untitled default row with a fresh id.
    pub fn blank() -> Self {
        Self::new(new_task_id(), "")
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_frequency(mut self, per_week: f64) -> Self {
        self.freq_per_week = per_week;
        self
    }

    pub fn with_minutes(mut self, minutes: f64) -> Self {
        self.minutes_per_occur = minutes;
        self
    }

    pub fn with_cognitive(mut self, load: u8) -> Self {
        self.cognitive_load = load;
        self
    }

    pub fn with_emotional(mut self, load: u8) -> Self {
        self.emotional_load = load;
        self
    }

    pub fn with_assignee(mut self, assignee: Assignee) -> Self {
        self.assignee = assignee;
        self
    }

    /// Reject anything the aggregator cannot account for.
    pub fn validate(&self) -> Result<(), EngineError> {
        non_negative(self.freq_per_week)
            .map_err(|reason| EngineError::invalid_task(&self.id, "freqPerWeek", reason))?;
        non_negative(self.minutes_per_occur)
            .map_err(|reason| EngineError::invalid_task(&self.id, "minutesPerOccur", reason))?;
        if self.cognitive_load > MAX_LOAD {
            return Err(EngineError::invalid_task(
                &self.id,
                "cognitiveLoad",
                format!("must be in 0..={MAX_LOAD}, got {}", self.cognitive_load),
            ));
        }
        if self.emotional_load > MAX_LOAD {
            return Err(EngineError::invalid_task(
                &self.id,
                "emotionalLoad",
                format!("must be in 0..={MAX_LOAD}, got {}", self.emotional_load),
            ));
        }
        Ok(())
    }
}

/// Short random id for new rows.
pub fn new_task_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

/// Starter list shown to a fresh session.
pub fn default_template() -> Vec<Task> {
    use Assignee::{A, B};
    use Category::*;

    let rows: [(&str, Category, f64, f64, u8, u8, Assignee); 10] = [
        ("Plan the week's meals", PlanningScheduling, 5.0, 10.0, 3, 1, A),
        ("Write the shopping list", PlanningScheduling, 2.0, 10.0, 2, 0, A),
        ("Grocery run", ShoppingErrands, 2.0, 45.0, 1, 0, B),
        ("Cooking", CookingMeals, 10.0, 25.0, 1, 0, B),
        ("Dishes", CookingMeals, 7.0, 15.0, 0, 0, B),
        ("Cleaning (floors/toilet/bath)", CleaningTidying, 4.0, 20.0, 0, 0, B),
        ("Laundry (wash/hang/fold)", Laundry, 5.0, 20.0, 0, 0, A),
        ("Household budget & bills", FinancesAdmin, 1.0, 45.0, 2, 1, A),
        ("Appointments & bookings", HomeUpkeep, 1.0, 20.0, 2, 1, A),
        ("Pet care", EmotionalCare, 7.0, 10.0, 0, 2, B),
    ];

    rows.into_iter()
        .map(|(title, category, freq, minutes, cog, emo, assignee)| {
            Task::new(new_task_id(), title)
                .with_category(category)
                .with_frequency(freq)
                .with_minutes(minutes)
                .with_cognitive(cog)
                .with_emotional(emo)
                .with_assignee(assignee)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_row() {
        let t = Task::new("t1", "Dishes");
        assert_eq!(t.category, Category::Other);
        assert_eq!(t.freq_per_week, 1.0);
        assert_eq!(t.minutes_per_occur, 10.0);
        assert_eq!(t.assignee, Assignee::A);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_category_parse_label_and_slug() {
        assert_eq!("Laundry".parse::<Category>().unwrap(), Category::Laundry);
        assert_eq!("finances-admin".parse::<Category>().unwrap(), Category::FinancesAdmin);
        assert_eq!("cooking & meals".parse::<Category>().unwrap(), Category::CookingMeals);
        assert!("Gardening".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_serde_uses_label() {
        let json = serde_json::to_string(&Category::EmotionalCare).unwrap();
        assert_eq!(json, "\"Emotional Care\"");
        let back: Category = serde_json::from_str("\"emotional-care\"").unwrap();
        assert_eq!(back, Category::EmotionalCare);
    }

    #[test]
    fn test_assignee_parse() {
        assert_eq!("a".parse::<Assignee>().unwrap(), Assignee::A);
        assert_eq!("Shared".parse::<Assignee>().unwrap(), Assignee::Shared);
        assert_eq!("both".parse::<Assignee>().unwrap(), Assignee::Shared);
        assert!("C".parse::<Assignee>().is_err());
    }

    #[test]
    fn test_task_serializes_camel_case() {
        let t = Task::new("t1", "Dishes").with_assignee(Assignee::Shared);
        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(v["freqPerWeek"], 1.0);
        assert_eq!(v["minutesPerOccur"], 10.0);
        assert_eq!(v["assignee"], "Shared");
        assert_eq!(v["category"], "Other");
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let err = Task::new("t1", "x").with_cognitive(4).validate().unwrap_err();
        assert_eq!(err.field(), "cognitiveLoad");

        let err = Task::new("t2", "x").with_frequency(-1.0).validate().unwrap_err();
        assert_eq!(err.field(), "freqPerWeek");

        let err = Task::new("t3", "x").with_minutes(f64::NAN).validate().unwrap_err();
        assert_eq!(err.field(), "minutesPerOccur");
    }

    #[test]
    fn test_template_is_valid_and_unique() {
        let tasks = default_template();
        assert_eq!(tasks.len(), 10);
        assert!(tasks.iter().all(|t| t.validate().is_ok()));
        let mut ids: Vec<_> = tasks.iter().map(|t| t.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn test_new_task_id_shape() {
        let id = new_task_id();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
