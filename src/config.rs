use std::{
    collections::HashMap,
    fmt::Display,
    fs::{create_dir_all, read_to_string, write},
    path::{Path, PathBuf},
    str::FromStr,
    sync::OnceLock,
};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    error::{VespaError, VespaResult},
    target::Target,
};

pub const CONFIG_FILE: &str = "config.yaml";
pub const HOME_ENV: &str = "VESPA_CLI_HOME";

/// Options persisted in `config.yaml` under the CLI home.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct CliConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiet: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum Color {
    #[default]
    Auto,
    Never,
    Always,
}
impl FromStr for Color {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "never" => Ok(Self::Never),
            "always" => Ok(Self::Always),
            _ => Err("must be one of auto, never, always".to_string()),
        }
    }
}
impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Never => write!(f, "never"),
            Self::Always => write!(f, "always"),
        }
    }
}

impl CliConfig {
    pub const OPTIONS: [&'static str; 4] = ["application", "color", "quiet", "target"];

    /// `$VESPA_CLI_HOME`, otherwise `$HOME/.vespa`.
    pub fn home(env: &HashMap<String, String>) -> VespaResult<PathBuf> {
        match (env.get(HOME_ENV), env.get("HOME")) {
            (Some(home), _) if !home.is_empty() => Ok(PathBuf::from(home)),
            (_, Some(home)) if !home.is_empty() => Ok(Path::new(home).join(".vespa")),
            _ => Err(VespaError::NoHomeDirectory),
        }
    }

    pub fn read<P: AsRef<Path>>(home: P) -> VespaResult<Self> {
        let path = home.as_ref().join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = read_to_string(&path).map_err(|source| VespaError::CannotRead { path: path.clone(), source })?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content).map_err(|source| VespaError::InvalidConfigFile { path, source })
    }

    pub fn write<P: AsRef<Path>>(&self, home: P) -> VespaResult<()> {
        let home = home.as_ref();
        create_dir_all(home).map_err(|source| VespaError::CannotWrite { path: home.to_path_buf(), source })?;
        let path = home.join(CONFIG_FILE);
        let content =
            serde_yaml::to_string(self).map_err(|source| VespaError::InvalidConfigFile { path: path.clone(), source })?;
        write(&path, content).map_err(|source| VespaError::CannotWrite { path, source })
    }

    pub fn get(&self, option: &str) -> VespaResult<Option<String>> {
        match option {
            "target" => Ok(self.target.clone()),
            "application" => Ok(self.application.clone()),
            "color" => Ok(self.color.map(|c| c.to_string())),
            "quiet" => Ok(self.quiet.map(|q| q.to_string())),
            _ => Err(VespaError::UnknownOption(option.to_string())),
        }
    }

    pub fn set(&mut self, option: &str, value: &str) -> VespaResult<()> {
        let invalid = |reason: String| VespaError::InvalidOptionValue {
            option: option.to_string(),
            value: value.to_string(),
            reason,
        };
        match option {
            "target" => {
                Target::from_str(value).map_err(|e| invalid(e.to_string()))?;
                self.target = Some(value.to_string());
            }
            "application" => {
                validate_application(value).map_err(invalid)?;
                self.application = Some(value.to_string());
            }
            "color" => self.color = Some(value.parse().map_err(invalid)?),
            "quiet" => self.quiet = Some(value.parse().map_err(|_| invalid("must be true or false".to_string()))?),
            _ => Err(VespaError::UnknownOption(option.to_string()))?,
        }
        Ok(())
    }

    pub fn unset(&mut self, option: &str) -> VespaResult<()> {
        match option {
            "target" => self.target = None,
            "application" => self.application = None,
            "color" => self.color = None,
            "quiet" => self.quiet = None,
            _ => Err(VespaError::UnknownOption(option.to_string()))?,
        }
        Ok(())
    }

    pub fn target(&self) -> VespaResult<Target> {
        self.target.as_deref().map(Target::from_str).transpose().map(Option::unwrap_or_default)
    }
}

/// `tenant.application` or `tenant.application.instance`.
pub fn validate_application(application: &str) -> Result<(), String> {
    static APPLICATION: OnceLock<Regex> = OnceLock::new();
    let re = APPLICATION.get_or_init(|| {
        Regex::new(r"^[a-z][a-z0-9_-]*\.[a-z][a-z0-9_-]*(\.[a-z][a-z0-9_-]*)?$")
            .unwrap_or_else(|e| unreachable!("application pattern must compile: {}", e))
    });
    if re.is_match(application) {
        Ok(())
    } else {
        Err("must be <tenant>.<application> or <tenant>.<application>.<instance>".to_string())
    }
}
