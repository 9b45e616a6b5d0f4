//! Aggregator: turns a task snapshot into weighted minutes per task,
//! per person, per category and overall.
//!
//! Shared tasks always count toward the overall and per-category `total`
//! figures. They only count toward the person figures when
//! `Weights::include_shared` is on, so with the toggle off `a + b` can be
//! less than `total_all`. That gap is reported by
//! [`AggregateResult::unattributed_minutes`].

use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::EngineError;
use crate::task::{Category, Task};
use crate::weights::Weights;

/// A task plus its weekly weighted minutes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedRow {
    #[serde(flatten)]
    pub task: Task,
    pub exec_minutes: f64,
    pub cog_minutes: f64,
    pub emo_minutes: f64,
    pub total_minutes: f64,
}

impl DerivedRow {
    pub fn derive(task: &Task, weights: &Weights) -> Self {
        let freq = task.freq_per_week;
        let exec_minutes = freq * task.minutes_per_occur;
        let cog_minutes = freq * f64::from(task.cognitive_load) * weights.weight_cognitive;
        let emo_minutes = freq * f64::from(task.emotional_load) * weights.weight_emotional;
        Self {
            task: task.clone(),
            exec_minutes,
            cog_minutes,
            emo_minutes,
            total_minutes: exec_minutes + cog_minutes + emo_minutes,
        }
    }
}

/// Minutes attributed to each person.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PersonTotals {
    pub a: f64,
    pub b: f64,
}

impl PersonTotals {
    pub fn sum(&self) -> f64 {
        self.a + self.b
    }
}

/// Per-category minutes: each person's share and the full category total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CategoryTotals {
    pub a: f64,
    pub b: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    pub rows: Vec<DerivedRow>,
    pub totals_by_person: PersonTotals,
    /// Only categories present in the input.
    pub totals_by_category: BTreeMap<Category, CategoryTotals>,
    /// Categories in the order they first appear in the task list.
    #[serde(skip)]
    pub category_order: Vec<Category>,
    pub total_all: f64,
    pub total_exec: f64,
    pub total_cog: f64,
    pub total_emo: f64,
    /// (cog + emo) / all, or 0 when nothing is recorded.
    pub mental_load_index: f64,
}

impl AggregateResult {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// |A - B| in minutes
    pub fn imbalance_minutes(&self) -> f64 {
        (self.totals_by_person.a - self.totals_by_person.b).abs()
    }

    /// Minutes of shared tasks left out of the person totals.
    pub fn unattributed_minutes(&self) -> f64 {
        (self.total_all - self.totals_by_person.sum()).max(0.0)
    }

    /// Category totals in first-seen order. Rankings built on this keep
    /// that order among ties.
    pub fn categories_in_input_order(&self) -> impl Iterator<Item = (Category, &CategoryTotals)> {
        self.category_order
            .iter()
            .filter_map(|c| self.totals_by_category.get(c).map(|t| (*c, t)))
    }

    pub fn cognitive_rate(&self) -> f64 {
        ratio(self.total_cog, self.total_all)
    }

    pub fn emotional_rate(&self) -> f64 {
        ratio(self.total_emo, self.total_all)
    }
}

fn ratio(part: f64, whole: f64) -> f64 {
    if whole > 0.0 { part / whole } else { 0.0 }
}

/// Aggregate a task snapshot under the given weights.
///
/// Fails on the first invalid weight or task; never produces NaN.
pub fn aggregate(tasks: &[Task], weights: &Weights) -> Result<AggregateResult, EngineError> {
    weights.validate()?;
    for task in tasks {
        task.validate()?;
    }

    let rows: Vec<DerivedRow> = tasks.iter().map(|t| DerivedRow::derive(t, weights)).collect();

    let mut totals_by_person = PersonTotals::default();
    let mut totals_by_category: BTreeMap<Category, CategoryTotals> = BTreeMap::new();
    let mut category_order: Vec<Category> = Vec::new();

    for row in &rows {
        let (a_share, b_share) = weights.shares(row.task.assignee);
        let a = row.total_minutes * a_share;
        let b = row.total_minutes * b_share;

        totals_by_person.a += a;
        totals_by_person.b += b;

        if !category_order.contains(&row.task.category) {
            category_order.push(row.task.category);
        }
        let entry = totals_by_category.entry(row.task.category).or_default();
        entry.a += a;
        entry.b += b;
        entry.total += row.total_minutes;
    }

    let total_all: f64 = rows.iter().map(|r| r.total_minutes).sum();
    let total_exec: f64 = rows.iter().map(|r| r.exec_minutes).sum();
    let total_cog: f64 = rows.iter().map(|r| r.cog_minutes).sum();
    let total_emo: f64 = rows.iter().map(|r| r.emo_minutes).sum();

    tracing::debug!(
        tasks = rows.len(),
        categories = totals_by_category.len(),
        total_all,
        "aggregated task snapshot"
    );

    Ok(AggregateResult {
        rows,
        totals_by_person,
        totals_by_category,
        category_order,
        total_all,
        total_exec,
        total_cog,
        total_emo,
        mental_load_index: ratio(total_cog + total_emo, total_all),
    })
}
