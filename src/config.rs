use std::path::PathBuf;

use anyhow::Result;

use crate::data::loader;
use crate::data::model::PenguinDataset;
use crate::data::sample::{DEFAULT_SEED, synthetic_penguins};

/// Environment variable naming the dataset file when no argument is given.
pub const DATA_ENV: &str = "PENGUINS_DATA";

pub const WINDOW_TITLE: &str = "Palmer Penguins Explorer";
/// Sidebar link to the project repository.
pub const LINK_TEXT: &str = "My GitHub Repo";
pub const LINK_URL: &str = "https://github.com/nhansen23/cintel-02-data";

/// Startup settings resolved from the command line and environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Dataset file; `None` means the built-in sample.
    pub data_path: Option<PathBuf>,
    pub inner_size: [f32; 2],
    pub min_inner_size: [f32; 2],
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: None,
            inner_size: [1280.0, 860.0],
            min_inner_size: [720.0, 480.0],
        }
    }
}

impl Settings {
    /// The first positional argument wins over the environment variable.
    /// Empty values are ignored.
    pub fn resolve(mut args: impl Iterator<Item = String>, env_path: Option<String>) -> Self {
        let given = |p: &String| !p.trim().is_empty();
        let data_path = args
            .next()
            .filter(given)
            .or_else(|| env_path.filter(given))
            .map(PathBuf::from);
        Settings {
            data_path,
            ..Settings::default()
        }
    }

    pub fn from_env() -> Self {
        Self::resolve(std::env::args().skip(1), std::env::var(DATA_ENV).ok())
    }

    /// Produce the dataset for this process. Called exactly once at startup.
    pub fn load_dataset(&self) -> Result<PenguinDataset> {
        match &self.data_path {
            Some(path) => loader::load_file(path),
            None => {
                log::info!("No dataset file given, using the built-in sample (seed {DEFAULT_SEED})");
                Ok(synthetic_penguins(DEFAULT_SEED))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn argument_beats_environment() {
        let s = Settings::resolve(args(&["cli.csv"]), Some("env.csv".into()));
        assert_eq!(s.data_path, Some(PathBuf::from("cli.csv")));
    }

    #[test]
    fn environment_used_without_argument() {
        let s = Settings::resolve(args(&[]), Some("env.parquet".into()));
        assert_eq!(s.data_path, Some(PathBuf::from("env.parquet")));
    }

    #[test]
    fn nothing_given_means_builtin_sample() {
        let s = Settings::resolve(args(&[]), Some("  ".into()));
        assert_eq!(s.data_path, None);
        assert_eq!(s.load_dataset().unwrap().len(), 344);
    }

    #[test]
    fn empty_argument_falls_back_to_environment() {
        let s = Settings::resolve(args(&[""]), Some("env.json".into()));
        assert_eq!(s.data_path, Some(PathBuf::from("env.json")));
    }

    #[test]
    fn sidebar_link_targets_project_repository() {
        assert_eq!(LINK_TEXT, "My GitHub Repo");
        assert!(LINK_URL.starts_with("https://github.com/"));
        assert!(LINK_URL.ends_with("/cintel-02-data"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let s = Settings::resolve(args(&["/nonexistent/penguins.csv"]), None);
        assert!(s.load_dataset().is_err());
    }
}
