//! Plain-text rendering of the task list and the aggregate report.

use loadshare_core::{AggregateResult, Assignee, People, Task, min_to_h};
use std::fmt::{self, Write};

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn title_or_placeholder(t: &Task) -> &str {
    if t.title.trim().is_empty() { "(untitled)" } else { &t.title }
}

fn percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 { (part / whole * 100.0).round() } else { 0.0 }
}

pub fn render_task_list(tasks: &[Task], people: &People) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(
        out,
        "{:<8}  {:<24}  {:<22}  {:>5}  {:>5}  {:>3}  {:>3}  {}",
        "ID", "TITLE", "CATEGORY", "FREQ", "MIN", "COG", "EMO", "WHO"
    )?;
    for t in tasks {
        let who = match t.assignee {
            Assignee::A => people.a.as_str(),
            Assignee::B => people.b.as_str(),
            Assignee::Shared => "Shared",
        };
        writeln!(
            out,
            "{:<8}  {:<24}  {:<22}  {:>5}  {:>5}  {:>3}  {:>3}  {}",
            t.id,
            truncate(title_or_placeholder(t), 24),
            truncate(t.category.label(), 22),
            t.freq_per_week,
            t.minutes_per_occur,
            t.cognitive_load,
            t.emotional_load,
            who
        )?;
    }
    write!(out, "{} task(s)", tasks.len())?;
    Ok(out)
}

pub fn render_report(
    result: &AggregateResult,
    people: &People,
    include_shared: bool,
) -> Result<String, fmt::Error> {
    let mut out = String::new();

    writeln!(out, "# Weekly load\n")?;
    writeln!(
        out,
        "{:<8}  {:<24}  {:>7}  {:>7}  {:>7}  {:>7}",
        "ID", "TITLE", "EXEC", "COG", "EMO", "TOTAL"
    )?;
    for row in &result.rows {
        writeln!(
            out,
            "{:<8}  {:<24}  {:>7.1}  {:>7.1}  {:>7.1}  {:>7.1}",
            row.task.id,
            truncate(title_or_placeholder(&row.task), 24),
            row.exec_minutes,
            row.cog_minutes,
            row.emo_minutes,
            row.total_minutes
        )?;
    }

    let a = result.totals_by_person.a;
    let b = result.totals_by_person.b;
    let attributed = result.totals_by_person.sum();
    writeln!(out, "\n## By person\n")?;
    writeln!(out, "- {}: {}h ({}%)", people.a, min_to_h(a), percent(a, attributed))?;
    writeln!(out, "- {}: {}h ({}%)", people.b, min_to_h(b), percent(b, attributed))?;
    if !include_shared && result.unattributed_minutes() > 0.0 {
        writeln!(
            out,
            "- not attributed (shared excluded): {}h",
            min_to_h(result.unattributed_minutes())
        )?;
    }
    writeln!(out, "- difference: {}h", min_to_h(result.imbalance_minutes()))?;

    writeln!(out, "\n## By category (hours: {} / {} / total)\n", people.a, people.b)?;
    for (category, t) in result.categories_in_input_order() {
        writeln!(
            out,
            "- {}: {} / {} / {}",
            category.label(),
            min_to_h(t.a),
            min_to_h(t.b),
            min_to_h(t.total)
        )?;
    }

    writeln!(
        out,
        "\nTotal {}h (execution {}h, cognitive {}h, emotional {}h)",
        min_to_h(result.total_all),
        min_to_h(result.total_exec),
        min_to_h(result.total_cog),
        min_to_h(result.total_emo)
    )?;
    write!(
        out,
        "Mental load index: {}%",
        (result.mental_load_index * 100.0).round()
    )?;
    Ok(out)
}
