use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use loadshare_core::{Assignee, Category, Task, advise_with, aggregate, new_task_id};
use loadshare_ingest::{ExportFormat, load_tasks_csv, load_tasks_json};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod blank;
mod config;
mod render;
mod state;

use state::{Session, SessionStore};

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("LOADSHARE_GIT_VERSION"), ")");

#[derive(Parser, Debug)]
#[command(
    name = "loadshare",
    version,
    long_version = LONG_VERSION,
    about = "Weigh household chores, including the invisible planning and emotional work"
)]
struct Cli {
    /// State directory (default: ~/.loadshare)
    #[arg(long, global = true, env = "LOADSHARE_HOME")]
    home: Option<PathBuf>,

    /// Blank session: start from one empty row and never save. Commands
    /// that change the session are refused
    #[arg(long, global = true)]
    blank: bool,

    /// Shared link; `?blank=1`, `?fresh=1` or `?kiosk=1` starts a blank session
    #[arg(long, global = true, value_name = "URL")]
    link: Option<String>,

    /// More logging (-v info, -vv debug, -vvv trace); RUST_LOG wins when set
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the task list
    List,

    /// Weighted minutes per task, person and category
    Report {
        /// Print the raw aggregate as JSON
        #[arg(long)]
        json: bool,
    },

    /// Balance analysis and suggestions
    Advise {
        /// Print the advice sections as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a task (unset fields take the default-row values)
    Add {
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "other")]
        category: Category,
        /// Times per week
        #[arg(long, default_value_t = 1.0)]
        freq: f64,
        /// Minutes per occurrence
        #[arg(long, default_value_t = 10.0)]
        minutes: f64,
        /// Cognitive load 0-3
        #[arg(long, default_value_t = 0)]
        cognitive: u8,
        /// Emotional load 0-3
        #[arg(long, default_value_t = 0)]
        emotional: u8,
        /// A, B or Shared
        #[arg(long, default_value = "A")]
        assignee: Assignee,
    },

    /// Change fields of an existing task
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        category: Option<Category>,
        #[arg(long)]
        freq: Option<f64>,
        #[arg(long)]
        minutes: Option<f64>,
        #[arg(long)]
        cognitive: Option<u8>,
        #[arg(long)]
        emotional: Option<u8>,
        #[arg(long)]
        assignee: Option<Assignee>,
    },

    /// Remove a task
    Remove { id: String },

    /// Replace the task list with the starter template
    Reset,

    /// Replace the task list with a single empty row
    Clear,

    /// Show or change names, weights and the shared split
    Settings {
        #[arg(long)]
        person_a: Option<String>,
        #[arg(long)]
        person_b: Option<String>,
        /// Minutes per cognitive-load point
        #[arg(long)]
        weight_cognitive: Option<f64>,
        /// Minutes per emotional-load point
        #[arg(long)]
        weight_emotional: Option<f64>,
        /// Percent of shared tasks attributed to person A (0-100)
        #[arg(long)]
        shared_split: Option<f64>,
        /// Count shared tasks toward each person's total
        #[arg(long)]
        include_shared: Option<bool>,
    },

    /// Replace the task list from a JSON or CSV file
    Import {
        path: PathBuf,
        /// json or csv (default: from the file extension)
        #[arg(long)]
        format: Option<ExportFormat>,
    },

    /// Write the task list as JSON or CSV
    Export {
        /// json or csv (default: from --out, else json)
        #[arg(long)]
        format: Option<ExportFormat>,
        /// Output file (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print a link that opens a blank session
    ShareUrl { base: String },

    /// Write a default config.toml into the state directory
    InitConfig,
}

impl Command {
    /// Subcommand name when it changes the stored session.
    fn mutation(&self) -> Option<&'static str> {
        match self {
            Command::Add { .. } => Some("add"),
            Command::Edit { .. } => Some("edit"),
            Command::Remove { .. } => Some("remove"),
            Command::Reset => Some("reset"),
            Command::Clear => Some("clear"),
            Command::Import { .. } => Some("import"),
            Command::Settings {
                person_a,
                person_b,
                weight_cognitive,
                weight_emotional,
                shared_split,
                include_shared,
            } => {
                let changes = person_a.is_some()
                    || person_b.is_some()
                    || weight_cognitive.is_some()
                    || weight_emotional.is_some()
                    || shared_split.is_some()
                    || include_shared.is_some();
                changes.then_some("settings")
            }
            Command::List
            | Command::Report { .. }
            | Command::Advise { .. }
            | Command::Export { .. }
            | Command::ShareUrl { .. }
            | Command::InitConfig => None,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let home = match cli.home {
        Some(h) => h,
        None => state::default_home()?,
    };

    let blank = cli.blank
        || match cli.link.as_deref() {
            Some(link) => blank::is_blank_link(link)?,
            None => false,
        };
    if blank {
        info!("blank session: nothing is loaded or saved");
    }

    run(cli.command, &home, blank)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run(command: Command, home: &Path, blank: bool) -> Result<()> {
    match &command {
        Command::InitConfig => return config::init_config(home),
        Command::ShareUrl { base } => {
            println!("{}", blank::blank_share_url(base)?);
            return Ok(());
        }
        _ => {}
    }

    if blank && let Some(name) = command.mutation() {
        bail!("`{name}` is not available in a blank session: nothing is saved (drop --blank/--link)");
    }

    let cfg = config::load_config(home)?;
    let store = SessionStore::new(home, blank);
    let mut session = store.load(&cfg.session)?;

    match command {
        Command::List => {
            println!("{}", render::render_task_list(&session.tasks, &session.people())?);
        }

        Command::Report { json } => {
            let result = aggregate(&session.tasks, &session.weights())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!(
                    "{}",
                    render::render_report(&result, &session.people(), session.include_shared)?
                );
            }
        }

        Command::Advise { json } => {
            let result = aggregate(&session.tasks, &session.weights())?;
            let advice = advise_with(&result, &session.people(), &cfg.advisor);
            if json {
                println!("{}", serde_json::to_string_pretty(&advice)?);
            } else {
                println!("{advice}");
            }
        }

        Command::Add {
            title,
            category,
            freq,
            minutes,
            cognitive,
            emotional,
            assignee,
        } => {
            let task = Task::new(new_task_id(), title)
                .with_category(category)
                .with_frequency(freq)
                .with_minutes(minutes)
                .with_cognitive(cognitive)
                .with_emotional(emotional)
                .with_assignee(assignee);
            task.validate()?;
            let id = session.add_task(task)?.id.clone();
            save(&store, &mut session)?;
            println!("Added {id}");
        }

        Command::Edit {
            id,
            title,
            category,
            freq,
            minutes,
            cognitive,
            emotional,
            assignee,
        } => {
            let task = session.task_mut(&id)?;
            let mut edited = task.clone();
            if let Some(v) = title {
                edited.title = v;
            }
            if let Some(v) = category {
                edited.category = v;
            }
            if let Some(v) = freq {
                edited.freq_per_week = v;
            }
            if let Some(v) = minutes {
                edited.minutes_per_occur = v;
            }
            if let Some(v) = cognitive {
                edited.cognitive_load = v;
            }
            if let Some(v) = emotional {
                edited.emotional_load = v;
            }
            if let Some(v) = assignee {
                edited.assignee = v;
            }
            edited.validate()?;
            *task = edited;
            save(&store, &mut session)?;
            println!("Updated {id}");
        }

        Command::Remove { id } => {
            let removed = session.remove_task(&id)?;
            save(&store, &mut session)?;
            println!("Removed {} ({})", removed.id, removed.title);
        }

        Command::Reset => {
            session.reset_template();
            save(&store, &mut session)?;
            println!("Loaded the starter template ({} tasks)", session.tasks.len());
        }

        Command::Clear => {
            session.clear();
            save(&store, &mut session)?;
            println!("Cleared the task list");
        }

        Command::Settings {
            person_a,
            person_b,
            weight_cognitive,
            weight_emotional,
            shared_split,
            include_shared,
        } => {
            let mut updated = session.clone();
            if let Some(v) = person_a {
                updated.person_a = v;
            }
            if let Some(v) = person_b {
                updated.person_b = v;
            }
            if let Some(v) = weight_cognitive {
                updated.weight_cognitive = v;
            }
            if let Some(v) = weight_emotional {
                updated.weight_emotional = v;
            }
            if let Some(v) = shared_split {
                updated.shared_split = v;
            }
            if let Some(v) = include_shared {
                updated.include_shared = v;
            }
            updated.weights().validate()?;

            if updated != session {
                session = updated;
                save(&store, &mut session)?;
            }
            print_settings(&session);
        }

        Command::Import { path, format } => {
            let format = match format.or_else(|| ExportFormat::from_path(&path)) {
                Some(f) => f,
                None => bail!(
                    "cannot tell the format of {} (pass --format json|csv)",
                    path.display()
                ),
            };
            let tasks = match format {
                ExportFormat::Json => load_tasks_json(&path),
                ExportFormat::Csv => load_tasks_csv(&path),
            }
            .with_context(|| format!("importing {}", path.display()))?;

            session.tasks = tasks;
            save(&store, &mut session)?;
            println!("Imported {} tasks from {}", session.tasks.len(), path.display());
        }

        Command::Export { format, out } => {
            let format = format
                .or_else(|| out.as_deref().and_then(ExportFormat::from_path))
                .unwrap_or(ExportFormat::Json);
            let text = format.render(&session.tasks)?;
            match out {
                Some(p) => {
                    std::fs::write(&p, text).with_context(|| format!("write {}", p.display()))?;
                    println!("Wrote {} tasks to {}", session.tasks.len(), p.display());
                }
                None => println!("{text}"),
            }
        }

        Command::ShareUrl { .. } | Command::InitConfig => {}
    }

    Ok(())
}

fn save(store: &SessionStore, session: &mut Session) -> Result<()> {
    if store.save(session)? {
        info!(path = %store.path().display(), "session saved");
    }
    Ok(())
}

fn print_settings(session: &Session) {
    println!("Person A:          {}", session.person_a);
    println!("Person B:          {}", session.person_b);
    println!("Cognitive weight:  {} min/point", session.weight_cognitive);
    println!("Emotional weight:  {} min/point", session.weight_emotional);
    println!(
        "Shared split:      {}% {} / {}% {}",
        session.shared_split,
        session.person_a,
        100.0 - session.shared_split,
        session.person_b
    );
    println!(
        "Include shared:    {}",
        if session.include_shared { "yes" } else { "no" }
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add() -> Command {
        Command::Add {
            title: "Bins".to_string(),
            category: Category::Other,
            freq: 1.0,
            minutes: 10.0,
            cognitive: 0,
            emotional: 0,
            assignee: Assignee::A,
        }
    }

    #[test]
    fn test_mutating_commands() {
        assert_eq!(add().mutation(), Some("add"));
        assert_eq!(Command::Reset.mutation(), Some("reset"));
        assert_eq!(Command::List.mutation(), None);
        assert_eq!(Command::Advise { json: false }.mutation(), None);
        let show = Command::Settings {
            person_a: None,
            person_b: None,
            weight_cognitive: None,
            weight_emotional: None,
            shared_split: None,
            include_shared: None,
        };
        assert_eq!(show.mutation(), None);
    }

    #[test]
    fn test_blank_session_refuses_changes() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(add(), dir.path(), true).unwrap_err();
        assert!(err.to_string().contains("blank session"));
        assert!(!SessionStore::new(dir.path(), false).path().exists());

        run(Command::Report { json: false }, dir.path(), true).unwrap();
    }

    #[test]
    fn test_add_saves_outside_blank_mode() {
        let dir = tempfile::tempdir().unwrap();
        run(add(), dir.path(), false).unwrap();
        let store = SessionStore::new(dir.path(), false);
        let session = store.load(&config::SessionDefaults::default()).unwrap();
        assert_eq!(session.tasks.len(), 11);
        assert_eq!(session.tasks[10].title, "Bins");
    }
}
