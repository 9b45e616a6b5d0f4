//! AdvisorEngine: deterministic, rule-based advice over an [`AggregateResult`].
//!
//! Rules run in a fixed order and each appends zero or more sections:
//! summary, balance, cognitive flag, emotional flag, quick wins, next steps.
//! No randomness and no ordering that depends on hashing, so identical
//! input always renders identical text.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::aggregate::AggregateResult;
use crate::task::Category;
use crate::units::min_to_h;

/// Rebalancing advice kicks in at this rounded hour difference.
pub const BALANCE_THRESHOLD_HOURS: f64 = 1.0;
/// Cognitive minutes / all minutes at which the cognitive flag is raised.
pub const COGNITIVE_RATE_THRESHOLD: f64 = 0.35;
/// Emotional minutes / all minutes at which the emotional flag is raised.
pub const EMOTIONAL_RATE_THRESHOLD: f64 = 0.25;
pub const MAX_REBALANCE_CATEGORIES: usize = 3;
pub const MAX_QUICK_WIN_CATEGORIES: usize = 2;

const NO_INPUT_MESSAGE: &str =
    "No tasks to analyze yet. Add at least one task to get a balance report.";

/// Thresholds and cutoffs. `Default` uses the published constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorPolicy {
    pub balance_threshold_hours: f64,
    pub cognitive_rate_threshold: f64,
    pub emotional_rate_threshold: f64,
    pub max_rebalance_categories: usize,
    pub max_quick_win_categories: usize,
}

impl Default for AdvisorPolicy {
    fn default() -> Self {
        Self {
            balance_threshold_hours: BALANCE_THRESHOLD_HOURS,
            cognitive_rate_threshold: COGNITIVE_RATE_THRESHOLD,
            emotional_rate_threshold: EMOTIONAL_RATE_THRESHOLD,
            max_rebalance_categories: MAX_REBALANCE_CATEGORIES,
            max_quick_win_categories: MAX_QUICK_WIN_CATEGORIES,
        }
    }
}

/// Display names for person A and person B.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct People {
    pub a: String,
    pub b: String,
}

impl People {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self { a: a.into(), b: b.into() }
    }
}

impl Default for People {
    fn default() -> Self {
        Self::new("Me", "Partner")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionKind {
    Summary,
    Rebalance,
    BalanceGood,
    CognitiveLoad,
    EmotionalLoad,
    QuickWins,
    NextSteps,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub kind: SectionKind,
    pub heading: String,
    pub lines: Vec<String>,
}

impl Section {
    fn new(kind: SectionKind, heading: &str, lines: Vec<String>) -> Self {
        Self {
            kind,
            heading: heading.to_string(),
            lines,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "sections", rename_all = "kebab-case")]
pub enum Advice {
    /// Nothing was entered; there is nothing to compare.
    NoInput,
    Report(Vec<Section>),
}

impl Advice {
    pub fn sections(&self) -> &[Section] {
        match self {
            Advice::NoInput => &[],
            Advice::Report(sections) => sections,
        }
    }

    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections().iter().find(|s| s.kind == kind)
    }
}

impl fmt::Display for Advice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sections = match self {
            Advice::NoInput => return f.write_str(NO_INPUT_MESSAGE),
            Advice::Report(sections) => sections,
        };
        for (i, section) in sections.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
                writeln!(f)?;
            }
            write!(f, "■ {}", section.heading)?;
            for line in &section.lines {
                write!(f, "\n{line}")?;
            }
        }
        Ok(())
    }
}

/// Keyword → tip. Checked top to bottom against the lowercased category
/// label; the first rule with any matching keyword wins.
pub const QUICK_WIN_RULES: &[(&[&str], &str)] = &[
    (
        &["planning", "admin"],
        "turn it into a standing checklist with reminders so the decisions run themselves",
    ),
    (
        &["cooking"],
        "cook in batches, try meal kits or lean on the dishwasher to cut execution time",
    ),
    (
        &["cleaning"],
        "fix a time slot and a home for every tool (robot vacuum, water-repellent coating)",
    ),
    (
        &["laundry"],
        "use a dryer and no-fold storage to split off the bottleneck",
    ),
];

pub const QUICK_WIN_FALLBACK: &str =
    "review the minutes per occurrence and see if the weekly count can drop by one";

/// Tip for a category label. Matching is substring-based and case-insensitive.
pub fn quick_win_tip(label: &str) -> &'static str {
    let label = label.to_lowercase();
    QUICK_WIN_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| label.contains(k)))
        .map(|(_, tip)| *tip)
        .unwrap_or(QUICK_WIN_FALLBACK)
}

pub const NEXT_STEPS: [&str; 3] = [
    "1) Shift the shared-task split by ±5% and try it for a week",
    "2) Template the top cognitive task (checklist / recurring booking)",
    "3) Bring a time-saving tool into the category with the most execution time",
];

/// Advise using the default policy.
pub fn advise(result: &AggregateResult, people: &People) -> Advice {
    advise_with(result, people, &AdvisorPolicy::default())
}

pub fn advise_with(result: &AggregateResult, people: &People, policy: &AdvisorPolicy) -> Advice {
    if result.is_empty() {
        return Advice::NoInput;
    }

    let mut sections = vec![summary(result, people)];
    sections.push(balance(result, people, policy));

    if result.cognitive_rate() >= policy.cognitive_rate_threshold {
        sections.push(Section::new(
            SectionKind::CognitiveLoad,
            "Cognitive load is high",
            vec![
                "Template planning and decisions (fixed shopping list, recurring bookings, meal rotation) to aim for a 5-15% cut."
                    .to_string(),
            ],
        ));
    }

    if result.emotional_rate() >= policy.emotional_rate_threshold {
        sections.push(Section::new(
            SectionKind::EmotionalLoad,
            "Emotional load is high",
            vec![
                "Put emotional-care time on the calendar. Keeping 'care time' apart from 'task time' lowers the felt burden. Agree on a signal for asking for support if needed."
                    .to_string(),
            ],
        ));
    }

    if let Some(quick) = quick_wins(result, policy) {
        sections.push(quick);
    }

    sections.push(Section::new(
        SectionKind::NextSteps,
        "Next steps (experiments)",
        NEXT_STEPS.iter().map(|s| s.to_string()).collect(),
    ));

    tracing::debug!(sections = sections.len(), "advice generated");
    Advice::Report(sections)
}

fn summary(result: &AggregateResult, people: &People) -> Section {
    let a = result.totals_by_person.a;
    let b = result.totals_by_person.b;
    Section::new(
        SectionKind::Summary,
        "Overall summary",
        vec![
            format!(
                "Weekly total {}h / {}: {}h, {}: {}h, difference: {}h",
                min_to_h(result.total_all),
                people.a,
                min_to_h(a),
                people.b,
                min_to_h(b),
                min_to_h(result.imbalance_minutes()),
            ),
            format!(
                "Execution: {}h / Cognitive: {}h / Emotional: {}h",
                min_to_h(result.total_exec),
                min_to_h(result.total_cog),
                min_to_h(result.total_emo),
            ),
        ],
    )
}

fn balance(result: &AggregateResult, people: &People, policy: &AdvisorPolicy) -> Section {
    if min_to_h(result.imbalance_minutes()) < policy.balance_threshold_hours {
        return Section::new(
            SectionKind::BalanceGood,
            "Balance looks good!",
            vec![
                "Keep it up. Agree in advance on a rule for temporarily adjusting the shared split when something unexpected comes up."
                    .to_string(),
            ],
        );
    }

    let a_heavier = result.totals_by_person.a > result.totals_by_person.b;
    let (heavier, lighter) = if a_heavier {
        (&people.a, &people.b)
    } else {
        (&people.b, &people.a)
    };

    let ranked = rebalance_candidates(result, a_heavier, policy.max_rebalance_categories);
    let line = if ranked.is_empty() {
        "Try moving the shared-task split by just 5-10%.".to_string()
    } else {
        let names: Vec<&str> = ranked.iter().map(|c| c.label()).collect();
        format!(
            "{heavier} carries the most in {}. Handing 30-60 min/week from these to {lighter} will narrow the gap.",
            names.join(" / ")
        )
    };
    Section::new(SectionKind::Rebalance, "Rebalancing suggestions", vec![line])
}

/// Categories where the heavier person's share exceeds the other's, largest gap first.
/// Ties keep the order the categories first appear in the task list.
pub fn rebalance_candidates(result: &AggregateResult, a_heavier: bool, limit: usize) -> Vec<Category> {
    let mut over: Vec<(Category, f64)> = result
        .categories_in_input_order()
        .map(|(category, t)| {
            let diff = if a_heavier { t.a - t.b } else { t.b - t.a };
            (category, diff)
        })
        .filter(|(_, diff)| *diff > 0.0)
        .collect();
    over.sort_by(|x, y| y.1.total_cmp(&x.1));
    over.into_iter().take(limit).map(|(c, _)| c).collect()
}

/// Categories with the most total minutes, largest first.
pub fn top_categories(result: &AggregateResult, limit: usize) -> Vec<Category> {
    let mut by_total: Vec<(Category, f64)> = result
        .categories_in_input_order()
        .map(|(category, t)| (category, t.total))
        .collect();
    by_total.sort_by(|x, y| y.1.total_cmp(&x.1));
    by_total.into_iter().take(limit).map(|(c, _)| c).collect()
}

fn quick_wins(result: &AggregateResult, policy: &AdvisorPolicy) -> Option<Section> {
    let top = top_categories(result, policy.max_quick_win_categories);
    if top.is_empty() {
        return None;
    }
    let lines = top
        .iter()
        .map(|c| format!("・{}: {}", c.label(), quick_win_tip(c.label())))
        .collect();
    Some(Section::new(SectionKind::QuickWins, "Quick wins", lines))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::task::{Assignee, Task};
    use crate::weights::Weights;

    fn run(tasks: &[Task]) -> Advice {
        let result = aggregate(tasks, &Weights::default()).unwrap();
        advise(&result, &People::new("Alex", "Sam"))
    }

    fn minutes(id: &str, category: Category, assignee: Assignee, mins: f64) -> Task {
        Task::new(id, id)
            .with_category(category)
            .with_assignee(assignee)
            .with_minutes(mins)
    }

    #[test]
    fn test_empty_is_no_input() {
        let advice = run(&[]);
        assert_eq!(advice, Advice::NoInput);
        assert_eq!(advice.to_string(), NO_INPUT_MESSAGE);
        assert!(advice.sections().is_empty());
    }

    #[test]
    fn test_section_order() {
        let tasks = vec![
            minutes("plan", Category::PlanningScheduling, Assignee::A, 10.0).with_cognitive(3),
            minutes("care", Category::EmotionalCare, Assignee::B, 10.0).with_emotional(3),
        ];
        let kinds: Vec<_> = run(&tasks).sections().iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            [
                SectionKind::Summary,
                SectionKind::BalanceGood,
                SectionKind::CognitiveLoad,
                SectionKind::EmotionalLoad,
                SectionKind::QuickWins,
                SectionKind::NextSteps,
            ]
        );
    }

    #[test]
    fn test_summary_lines() {
        let tasks = vec![
            minutes("a", Category::Laundry, Assignee::A, 90.0),
            minutes("b", Category::CookingMeals, Assignee::B, 30.0),
        ];
        let advice = run(&tasks);
        let summary = advice.section(SectionKind::Summary).unwrap();
        assert_eq!(
            summary.lines[0],
            "Weekly total 2h / Alex: 1.5h, Sam: 0.5h, difference: 1h"
        );
        assert_eq!(summary.lines[1], "Execution: 2h / Cognitive: 0h / Emotional: 0h");
    }

    #[test]
    fn test_rebalance_names_heavier_categories() {
        let tasks = vec![
            minutes("l", Category::Laundry, Assignee::B, 100.0),
            minutes("c", Category::CookingMeals, Assignee::B, 40.0),
            minutes("o", Category::Other, Assignee::A, 20.0),
        ];
        let advice = run(&tasks);
        let section = advice.section(SectionKind::Rebalance).unwrap();
        assert_eq!(
            section.lines[0],
            "Sam carries the most in Laundry / Cooking & Meals. Handing 30-60 min/week from these to Alex will narrow the gap."
        );
    }

    #[test]
    fn test_rebalance_takes_top_three() {
        let tasks = vec![
            minutes("1", Category::Laundry, Assignee::A, 50.0),
            minutes("2", Category::CookingMeals, Assignee::A, 40.0),
            minutes("3", Category::Other, Assignee::A, 30.0),
            minutes("4", Category::EmotionalCare, Assignee::A, 20.0),
        ];
        let result = aggregate(&tasks, &Weights::default()).unwrap();
        let ranked = rebalance_candidates(&result, true, MAX_REBALANCE_CATEGORIES);
        assert_eq!(
            ranked,
            [Category::Laundry, Category::CookingMeals, Category::Other]
        );
    }

    #[test]
    fn test_shared_split_drives_rebalance() {
        // Everything is shared; A is heavier only through the split.
        let tasks = vec![minutes("s", Category::Other, Assignee::Shared, 600.0)];
        let weights = Weights {
            shared_split_percent: 60.0,
            ..Weights::default()
        };
        let result = aggregate(&tasks, &weights).unwrap();
        let advice = advise(&result, &People::default());
        // A = 360, B = 240; Other has A-B = 120 > 0, so it is a candidate.
        assert!(advice.section(SectionKind::Rebalance).unwrap().lines[0].contains("Other"));

        // With shared excluded A and B are both zero: no rebalance at all.
        let weights = Weights {
            include_shared: false,
            ..Weights::default()
        };
        let result = aggregate(&tasks, &weights).unwrap();
        let advice = advise(&result, &People::default());
        assert!(advice.section(SectionKind::BalanceGood).is_some());
    }

    #[test]
    fn test_rebalance_no_positive_category() {
        // Lowering the threshold to zero forces the balance branch with no gap anywhere.
        let tasks = vec![minutes("a", Category::Laundry, Assignee::Shared, 60.0)];
        let result = aggregate(&tasks, &Weights::default()).unwrap();
        let policy = AdvisorPolicy {
            balance_threshold_hours: 0.0,
            ..AdvisorPolicy::default()
        };
        let advice = advise_with(&result, &People::default(), &policy);
        assert_eq!(
            advice.section(SectionKind::Rebalance).unwrap().lines[0],
            "Try moving the shared-task split by just 5-10%."
        );
    }

    #[test]
    fn test_cognitive_threshold_boundary() {
        // exec 65, cog 35 → rate exactly 0.35
        let tasks = vec![
            minutes("x", Category::Other, Assignee::A, 65.0),
            Task::new("c", "c")
                .with_frequency(3.5)
                .with_minutes(0.0)
                .with_cognitive(1),
        ];
        let result = aggregate(&tasks, &Weights::default()).unwrap();
        assert_eq!(result.cognitive_rate(), 0.35);
        let advice = advise(&result, &People::default());
        assert!(advice.section(SectionKind::CognitiveLoad).is_some());
        assert!(advice.section(SectionKind::EmotionalLoad).is_none());
    }

    #[test]
    fn test_emotional_threshold_boundary() {
        // exec 75, emo 25 → rate exactly 0.25
        let tasks = vec![
            minutes("x", Category::Other, Assignee::A, 75.0),
            Task::new("e", "e")
                .with_frequency(2.5)
                .with_minutes(0.0)
                .with_emotional(1),
        ];
        let result = aggregate(&tasks, &Weights::default()).unwrap();
        assert_eq!(result.emotional_rate(), EMOTIONAL_RATE_THRESHOLD);
        let advice = advise(&result, &People::default());
        assert!(advice.section(SectionKind::EmotionalLoad).is_some());
        assert!(advice.section(SectionKind::CognitiveLoad).is_none());
    }

    #[test]
    fn test_ties_rank_in_entry_order() {
        let tasks = vec![
            minutes("o", Category::Other, Assignee::A, 50.0),
            minutes("l", Category::Laundry, Assignee::A, 50.0),
            minutes("c", Category::CookingMeals, Assignee::A, 50.0),
        ];
        let advice = run(&tasks);
        let quick = advice.section(SectionKind::QuickWins).unwrap();
        assert!(quick.lines[0].starts_with("・Other: "));
        assert!(quick.lines[1].starts_with("・Laundry: "));
        assert_eq!(
            advice.section(SectionKind::Rebalance).unwrap().lines[0],
            "Alex carries the most in Other / Laundry / Cooking & Meals. Handing 30-60 min/week from these to Sam will narrow the gap."
        );
    }

    #[test]
    fn test_emotional_threshold_below() {
        // exec 80, emo 20 → rate 0.2
        let tasks = vec![
            minutes("x", Category::Other, Assignee::A, 80.0),
            Task::new("e", "e")
                .with_frequency(2.0)
                .with_minutes(0.0)
                .with_emotional(1),
        ];
        let advice = run(&tasks);
        assert!(advice.section(SectionKind::EmotionalLoad).is_none());
    }

    #[test]
    fn test_quick_win_tips_table() {
        assert_eq!(quick_win_tip("Planning & Scheduling"), QUICK_WIN_RULES[0].1);
        assert_eq!(quick_win_tip("Finances & Admin"), QUICK_WIN_RULES[0].1);
        assert_eq!(quick_win_tip("Cooking & Meals"), QUICK_WIN_RULES[1].1);
        assert_eq!(quick_win_tip("Cleaning & Tidying"), QUICK_WIN_RULES[2].1);
        assert_eq!(quick_win_tip("Laundry"), QUICK_WIN_RULES[3].1);
        assert_eq!(quick_win_tip("Emotional Care"), QUICK_WIN_FALLBACK);
        assert_eq!(quick_win_tip("Home Upkeep (repairs/paperwork)"), QUICK_WIN_FALLBACK);
    }

    #[test]
    fn test_quick_win_priority_order() {
        assert_eq!(quick_win_tip("Cleaning after cooking"), QUICK_WIN_RULES[1].1);
        assert_eq!(quick_win_tip("Laundry admin"), QUICK_WIN_RULES[0].1);
    }

    #[test]
    fn test_quick_wins_top_two() {
        let tasks = vec![
            minutes("1", Category::Other, Assignee::A, 10.0),
            minutes("2", Category::Laundry, Assignee::A, 50.0),
            minutes("3", Category::CookingMeals, Assignee::B, 40.0),
        ];
        let advice = run(&tasks);
        let quick = advice.section(SectionKind::QuickWins).unwrap();
        assert_eq!(quick.lines.len(), 2);
        assert!(quick.lines[0].starts_with("・Laundry: "));
        assert!(quick.lines[1].starts_with("・Cooking & Meals: "));
    }

    #[test]
    fn test_next_steps_always_last() {
        let advice = run(&[minutes("1", Category::Other, Assignee::A, 10.0)]);
        let last = advice.sections().last().unwrap();
        assert_eq!(last.kind, SectionKind::NextSteps);
        assert_eq!(last.lines, NEXT_STEPS.map(String::from));
    }

    #[test]
    fn test_render_layout() {
        let advice = run(&[minutes("1", Category::Other, Assignee::A, 10.0)]);
        let text = advice.to_string();
        assert!(text.starts_with("■ Overall summary\nWeekly total 0.2h"));
        assert!(text.contains("\n\n■ Balance looks good!\n"));
        assert!(text.ends_with(NEXT_STEPS[2]));
    }
}
