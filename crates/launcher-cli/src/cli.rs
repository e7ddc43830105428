//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::Parser;
use launcher_core::StartupMode;

/// Feature Launcher - Resolve a feature descriptor into an installation plan
#[derive(Parser, Debug)]
#[command(name = "feature-launcher")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Application feature descriptor (file path or artifact coordinate).
    ///
    /// When omitted, the descriptor cached by a previous run under the
    /// launcher home is used.
    #[arg(short = 'f', long = "feature")]
    pub feature: Option<String>,

    /// Launcher home directory (defaults to ~/.feature-launcher)
    #[arg(long)]
    pub home: Option<PathBuf>,

    /// Local artifact repository directory; repeatable, probed in order
    #[arg(short = 'r', long = "repository")]
    pub repositories: Vec<PathBuf>,

    /// Startup mode: "install" allows extension artifacts, "modules-only"
    /// restricts the launch to bundles
    #[arg(long, default_value = "install")]
    pub mode: StartupMode,

    /// Variable override as key=value; repeatable
    #[arg(short = 'D', long = "define", value_name = "KEY=VALUE")]
    pub defines: Vec<String>,

    /// Only resolve all referenced artifacts (cache warm-up) and print
    /// the mapping, without building a plan
    #[arg(long)]
    pub cache_only: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Split `-D key=value` pairs; a pair without `=` is an error.
    pub fn parse_defines(&self) -> Result<Vec<(String, String)>, String> {
        self.defines
            .iter()
            .map(|define| {
                define
                    .split_once('=')
                    .map(|(key, value)| (key.to_string(), value.to_string()))
                    .ok_or_else(|| format!("invalid variable definition {define:?}, expected KEY=VALUE"))
            })
            .collect()
    }
}
