//! Launcher configuration: home directory, startup mode, variable
//! overrides.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;

/// Startup-mode policy.
///
/// `ModulesOnly` restricts a launch to bundles; any extension declaring
/// additional installable artifacts aborts preparation. `Install` permits
/// them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StartupMode {
    /// Bundles only; artifact-list extensions are a policy violation.
    ModulesOnly,
    /// Bundles plus additional installable artifacts.
    #[default]
    Install,
}

impl FromStr for StartupMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "modules-only" => Ok(Self::ModulesOnly),
            "install" => Ok(Self::Install),
            other => Err(format!(
                "invalid startup mode {other:?}, expected \"install\" or \"modules-only\""
            )),
        }
    }
}

impl std::fmt::Display for StartupMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ModulesOnly => write!(f, "modules-only"),
            Self::Install => write!(f, "install"),
        }
    }
}

/// Configuration for one launch.
#[derive(Debug, Clone)]
pub struct LauncherConfig {
    /// Launcher home directory; the descriptor cache lives below it.
    pub home_directory: PathBuf,
    /// Explicit application descriptor location (path or coordinate).
    /// When absent, the cached descriptor under the home directory is
    /// loaded instead.
    pub application_file: Option<String>,
    /// Variable overrides applied during descriptor loading; they take
    /// precedence over the feature's own variable defaults.
    pub variables: BTreeMap<String, String>,
    pub startup_mode: StartupMode,
}

impl LauncherConfig {
    pub fn new(home_directory: impl Into<PathBuf>) -> Self {
        Self {
            home_directory: home_directory.into(),
            application_file: None,
            variables: BTreeMap::new(),
            startup_mode: StartupMode::default(),
        }
    }

    pub fn with_application_file(mut self, location: impl Into<String>) -> Self {
        self.application_file = Some(location.into());
        self
    }

    pub fn with_startup_mode(mut self, mode: StartupMode) -> Self {
        self.startup_mode = mode;
        self
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Where the loaded-and-resolved application descriptor is cached
    /// between runs: `<home>/resources/provisioning/application.json`.
    pub fn application_cache_path(&self) -> PathBuf {
        self.home_directory
            .join("resources")
            .join("provisioning")
            .join("application.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn cache_path_is_under_home() {
        let config = LauncherConfig::new("/opt/launcher");
        assert_eq!(
            config.application_cache_path(),
            PathBuf::from("/opt/launcher/resources/provisioning/application.json")
        );
    }

    #[test]
    fn startup_mode_parses_both_values() {
        assert_eq!(
            "install".parse::<StartupMode>().unwrap(),
            StartupMode::Install
        );
        assert_eq!(
            "modules-only".parse::<StartupMode>().unwrap(),
            StartupMode::ModulesOnly
        );
        assert!("pure".parse::<StartupMode>().is_err());
    }

    #[test]
    fn default_mode_is_permissive() {
        let config = LauncherConfig::new("/tmp");
        assert_eq!(config.startup_mode, StartupMode::Install);
        assert!(config.application_file.is_none());
    }

    #[test]
    fn startup_mode_displays_its_parse_form() {
        for mode in [StartupMode::Install, StartupMode::ModulesOnly] {
            assert_eq!(mode.to_string().parse::<StartupMode>().unwrap(), mode);
        }
    }
}
