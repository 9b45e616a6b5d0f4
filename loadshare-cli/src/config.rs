use anyhow::{Context, Result};
use loadshare_core::AdvisorPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::ensure_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Seeds a session when nothing is stored yet.
    #[serde(default)]
    pub session: SessionDefaults,
    /// Advice thresholds; unset keys keep the built-in values.
    #[serde(default)]
    pub advisor: AdvisorPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionDefaults {
    pub person_a: String,
    pub person_b: String,
    pub weight_cognitive: f64,
    pub weight_emotional: f64,
    pub shared_split: f64,
    pub include_shared: bool,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            person_a: "Me".to_string(),
            person_b: "Partner".to_string(),
            weight_cognitive: 10.0,
            weight_emotional: 10.0,
            shared_split: 50.0,
            include_shared: true,
        }
    }
}

pub fn config_path(home: &Path) -> PathBuf {
    home.join("config.toml")
}

pub fn load_config(home: &Path) -> Result<Config> {
    let p = config_path(home);
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(home: &Path, cfg: &Config) -> Result<()> {
    ensure_home(home)?;
    let p = config_path(home);
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config(home: &Path) -> Result<()> {
    let p = config_path(home);
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(home, &Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_default() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_config(dir.path()).unwrap(), Config::default());
    }

    #[test]
    fn test_partial_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            config_path(dir.path()),
            "[session]\nperson_b = \"Sam\"\n\n[advisor]\nbalance_threshold_hours = 2.0\n",
        )
        .unwrap();
        let cfg = load_config(dir.path()).unwrap();
        assert_eq!(cfg.session.person_b, "Sam");
        assert_eq!(cfg.session.person_a, "Me");
        assert_eq!(cfg.advisor.balance_threshold_hours, 2.0);
        assert_eq!(cfg.advisor.cognitive_rate_threshold, 0.35);
    }

    #[test]
    fn test_init_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        init_config(dir.path()).unwrap();
        assert!(config_path(dir.path()).exists());
        assert_eq!(load_config(dir.path()).unwrap(), Config::default());
    }
}
