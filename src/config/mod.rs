//! Watcher configuration.
//!
//! Everything the save cycle needs to know (watched root, tool commands,
//! toggles) lives in one [`WatchConfig`] value that is handed to the session
//! when it is built. It can be loaded from a JSON file; any field left out
//! keeps its default.

use crate::error::{FmtspliceError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// How diff directives are replayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplayMode {
    /// Parse and apply one summary line at a time, bottom up. A malformed line
    /// aborts with earlier edits left in place.
    #[default]
    Incremental,
    /// Parse the whole summary first and edit only if every line parses.
    Atomic,
}

/// An external program and its leading arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Program name or path.
    pub program: String,
    /// Arguments placed before any per-call arguments.
    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Build a command from a program and arguments.
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Arguments with every `{pkg}` replaced by `package`.
    pub fn args_for_package(&self, package: &str) -> Vec<String> {
        self.args.iter().map(|a| a.replace("{pkg}", package)).collect()
    }

    /// `program arg1 arg2`, as echoed into the report.
    pub fn display_with(&self, args: &[String]) -> String {
        std::iter::once(self.program.as_str())
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Configuration for one watcher process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Only files under this directory are handled.
    pub root: PathBuf,
    /// Only files ending with this suffix are handled.
    pub extension: String,
    /// Formatter; the saved file's path is appended.
    pub formatter: CommandSpec,
    /// Formatter output containing this text is a fatal-class failure.
    pub fatal_marker: String,
    /// Line diff tool; the original and reformatted paths are appended.
    pub diff: CommandSpec,
    /// Test command run after a clean reformat; `{pkg}` expands to the
    /// relative package. `None` stops the cycle after formatting.
    pub test: Option<CommandSpec>,
    /// Install command, run when `install_after` is set.
    pub install: CommandSpec,
    /// Run `install` after the tests pass.
    pub install_after: bool,
    /// Shell command run after every successful build.
    pub run_after: Option<String>,
    /// Shell used for `run_after`, invoked as `<shell> -c <cmd>`.
    pub shell: String,
    /// Replay strategy.
    pub replay_mode: ReplayMode,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            extension: ".go".to_string(),
            formatter: CommandSpec::new("goimports", &[]),
            fatal_marker: "fatal error".to_string(),
            diff: CommandSpec::new("diff", &[]),
            test: Some(CommandSpec::new("go", &["test", "{pkg}"])),
            install: CommandSpec::new("go", &["install", "./cmd/..."]),
            install_after: false,
            run_after: None,
            shell: "sh".to_string(),
            replay_mode: ReplayMode::Incremental,
        }
    }
}

impl WatchConfig {
    /// Load a configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| FmtspliceError::io(path, e))?;
        let config: WatchConfig =
            serde_json::from_str(&content).map_err(|e| FmtspliceError::Config {
                path: path.to_path_buf(),
                message: format!("JSON parse error: {}", e),
            })?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let invalid = |message: &str| FmtspliceError::Config {
            path: path.to_path_buf(),
            message: message.to_string(),
        };
        if self.extension.is_empty() {
            return Err(invalid("extension must not be empty"));
        }
        if self.formatter.program.is_empty() {
            return Err(invalid("formatter.program must not be empty"));
        }
        if self.diff.program.is_empty() {
            return Err(invalid("diff.program must not be empty"));
        }
        Ok(())
    }

    /// Use `root` as the watched directory.
    ///
    /// A path naming an existing file is replaced by its parent directory.
    pub fn with_root(mut self, root: &Path) -> Self {
        self.root = if root.is_file() {
            root.parent().map(Path::to_path_buf).unwrap_or_default()
        } else {
            root.to_path_buf()
        };
        self
    }

    /// Returns true when `path` is a file this watcher should handle.
    pub fn watches(&self, path: &Path) -> bool {
        path.starts_with(&self.root)
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| name.ends_with(&self.extension))
    }

    /// Package of `file` relative to the root: `"."` or `"./sub/dir"`.
    ///
    /// Returns `None` for files outside the root.
    pub fn relative_package(&self, file: &Path) -> Option<String> {
        let dir = file.parent()?;
        let rel = dir.strip_prefix(&self.root).ok()?;
        let parts: Vec<String> = rel
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        if parts.is_empty() {
            Some(".".to_string())
        } else {
            Some(format!("./{}", parts.join("/")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(root: &str) -> WatchConfig {
        WatchConfig {
            root: PathBuf::from(root),
            ..WatchConfig::default()
        }
    }

    #[test]
    fn test_relative_package() {
        let config = config("/src/proj");
        assert_eq!(
            config.relative_package(Path::new("/src/proj/main.go")),
            Some(".".to_string())
        );
        assert_eq!(
            config.relative_package(Path::new("/src/proj/cmd/tool/main.go")),
            Some("./cmd/tool".to_string())
        );
        assert_eq!(config.relative_package(Path::new("/elsewhere/x.go")), None);
    }

    #[test]
    fn test_watches() {
        let config = config("/src/proj");
        assert!(config.watches(Path::new("/src/proj/a/b.go")));
        assert!(!config.watches(Path::new("/src/proj/a/b.rs")));
        assert!(!config.watches(Path::new("/src/project/b.go")));
        assert!(!config.watches(Path::new("/other/b.go")));
    }

    #[test]
    fn test_package_substitution() {
        let test = CommandSpec::new("go", &["test", "{pkg}"]);
        let args = test.args_for_package("./cmd/x");
        assert_eq!(args, vec!["test", "./cmd/x"]);
        assert_eq!(test.display_with(&args), "go test ./cmd/x");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{"extension": ".rs", "formatter": {"program": "rustfmt", "args": ["--emit=stdout"]}, "replay_mode": "atomic"}"#;
        let config: WatchConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.extension, ".rs");
        assert_eq!(config.formatter.args, vec!["--emit=stdout"]);
        assert_eq!(config.replay_mode, ReplayMode::Atomic);
        assert_eq!(config.diff.program, "diff");
        assert_eq!(config.fatal_marker, "fatal error");
    }
}
