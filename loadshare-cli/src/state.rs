use anyhow::{Context, Result, bail};
use loadshare_core::{People, Task, Weights, default_template};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::SessionDefaults;

/// Fixed storage key; the session file is `<home>/<SESSION_KEY>.json`.
pub const SESSION_KEY: &str = "household-load-v1";

pub fn default_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".loadshare"))
}

pub fn ensure_home(home: &Path) -> Result<()> {
    fs::create_dir_all(home).with_context(|| format!("create {}", home.display()))
}

/// Everything the user has entered, saved as one bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default = "default_template")]
    pub tasks: Vec<Task>,
    #[serde(default = "default_person_a")]
    pub person_a: String,
    #[serde(default = "default_person_b")]
    pub person_b: String,
    #[serde(default = "default_weight")]
    pub weight_cognitive: f64,
    #[serde(default = "default_weight")]
    pub weight_emotional: f64,
    #[serde(default = "default_split")]
    pub shared_split: f64,
    /// Absent in a stored bundle means off.
    #[serde(default, rename = "includeSharedToggle")]
    pub include_shared: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at_utc: Option<String>,
}

fn default_person_a() -> String {
    SessionDefaults::default().person_a
}

fn default_person_b() -> String {
    SessionDefaults::default().person_b
}

fn default_weight() -> f64 {
    10.0
}

fn default_split() -> f64 {
    50.0
}

impl Session {
    /// New session seeded from config: the starter template, or one empty row when blank.
    pub fn fresh(defaults: &SessionDefaults, blank: bool) -> Self {
        Self {
            tasks: if blank { vec![Task::blank()] } else { default_template() },
            person_a: defaults.person_a.clone(),
            person_b: defaults.person_b.clone(),
            weight_cognitive: defaults.weight_cognitive,
            weight_emotional: defaults.weight_emotional,
            shared_split: defaults.shared_split,
            include_shared: defaults.include_shared,
            saved_at_utc: None,
        }
    }

    pub fn weights(&self) -> Weights {
        Weights {
            weight_cognitive: self.weight_cognitive,
            weight_emotional: self.weight_emotional,
            shared_split_percent: self.shared_split,
            include_shared: self.include_shared,
        }
    }

    pub fn people(&self) -> People {
        People::new(&self.person_a, &self.person_b)
    }

    pub fn add_task(&mut self, task: Task) -> Result<&Task> {
        if self.tasks.iter().any(|t| t.id == task.id) {
            bail!("task id '{}' already exists", task.id);
        }
        self.tasks.push(task);
        self.tasks.last().context("task list is empty after push")
    }

    pub fn task_mut(&mut self, id: &str) -> Result<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .with_context(|| format!("no task with id '{id}' (see `loadshare list`)"))
    }

    pub fn remove_task(&mut self, id: &str) -> Result<Task> {
        let idx = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .with_context(|| format!("no task with id '{id}' (see `loadshare list`)"))?;
        Ok(self.tasks.remove(idx))
    }

    /// Back to the starter template.
    pub fn reset_template(&mut self) {
        self.tasks = default_template();
    }

    /// Down to a single empty row.
    pub fn clear(&mut self) {
        self.tasks = vec![Task::blank()];
    }
}

/// Loads and saves the session bundle. In blank mode nothing touches disk.
#[derive(Debug, Clone)]
pub struct SessionStore {
    root: PathBuf,
    blank: bool,
}

impl SessionStore {
    pub fn new(root: impl Into<PathBuf>, blank: bool) -> Self {
        Self {
            root: root.into(),
            blank,
        }
    }

    pub fn path(&self) -> PathBuf {
        self.root.join(format!("{SESSION_KEY}.json"))
    }

    pub fn load(&self, defaults: &SessionDefaults) -> Result<Session> {
        if self.blank {
            return Ok(Session::fresh(defaults, true));
        }
        let p = self.path();
        if !p.exists() {
            return Ok(Session::fresh(defaults, false));
        }
        let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
        match serde_json::from_str(&s) {
            Ok(session) => Ok(session),
            Err(e) => {
                tracing::warn!(path = %p.display(), error = %e, "ignoring unreadable session");
                Ok(Session::fresh(defaults, false))
            }
        }
    }

    /// Returns false when nothing was written (blank mode).
    pub fn save(&self, session: &mut Session) -> Result<bool> {
        if self.blank {
            tracing::debug!("blank session, skipping save");
            return Ok(false);
        }
        ensure_home(&self.root)?;
        session.saved_at_utc = Some(chrono::Utc::now().to_rfc3339());
        let p = self.path();
        let json = serde_json::to_string_pretty(session)?;
        fs::write(&p, json).with_context(|| format!("write {}", p.display()))?;
        tracing::debug!(path = %p.display(), tasks = session.tasks.len(), "session saved");
        Ok(true)
    }
}
