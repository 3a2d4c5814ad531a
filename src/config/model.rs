// src/config/model.rs

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

use crate::errors::{Result, WormholeError};

/// Address used when the config file has no `listen` value.
pub const DEFAULT_ADDR: &str = "127.0.0.1:5115";

/// Top-level configuration as read from a TOML file.
///
/// This is a direct mapping of the config file:
///
/// ```toml
/// listen = "127.0.0.1:5115"
///
/// [[mapping]]
/// from = "/home/"
/// to = "A:"
///
/// [apps]
/// sublime = "/opt/sublime/sublime"
/// explorer = ["cmd.exe", "/c", "start"]
/// ```
///
/// All sections are optional and have reasonable defaults. Use
/// `WormholeConfig::try_from` to turn this into the validated form.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfig {
    /// `host:port` to bind; falls back to [`DEFAULT_ADDR`] when absent.
    #[serde(default)]
    pub listen: Option<String>,

    /// Path prefix substitution rules from `[[mapping]]`.
    ///
    /// An array of tables rather than a plain table so the declared order
    /// survives deserialization.
    #[serde(default)]
    pub mapping: Vec<MappingRule>,

    /// All apps from `[apps]`. Keys are the logical app names clients use
    /// in `INVOKE` requests.
    #[serde(default)]
    pub apps: BTreeMap<String, RawAppSpec>,
}

/// One `from` prefix -> `to` prefix substitution rule.
#[derive(Debug, Clone, Deserialize)]
pub struct MappingRule {
    pub from: String,
    pub to: String,
}

/// An app value before interpretation: either a command string or an
/// explicit argv array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawAppSpec {
    Line(String),
    Argv(Vec<String>),
}

/// Validated configuration snapshot.
///
/// Snapshots are immutable once built; a reload replaces the whole value
/// rather than mutating it in place.
#[derive(Debug, Clone)]
pub struct WormholeConfig {
    listen: Option<String>,
    pub mapping: Vec<MappingRule>,
    pub apps: BTreeMap<String, AppSpec>,
}

impl WormholeConfig {
    /// The address to bind, defaulting to [`DEFAULT_ADDR`].
    pub fn addr(&self) -> &str {
        match self.listen.as_deref() {
            Some(addr) if !addr.is_empty() => addr,
            _ => DEFAULT_ADDR,
        }
    }

    /// Look up the app mapped by `name`.
    pub fn app(&self, name: &str) -> Result<&AppSpec> {
        self.apps
            .get(name)
            .ok_or_else(|| WormholeError::NotFound(name.to_string()))
    }

    /// Comma-joined list of configured app names, used in error messages.
    /// Order is not significant.
    pub fn available_apps(&self) -> String {
        self.apps
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl TryFrom<RawConfig> for WormholeConfig {
    type Error = WormholeError;

    fn try_from(raw: RawConfig) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for rule in &raw.mapping {
            if !seen.insert(rule.from.as_str()) {
                return Err(WormholeError::Config(format!(
                    "duplicate mapping prefix '{}'",
                    rule.from
                )));
            }
        }

        let mut apps = BTreeMap::new();
        for (name, value) in raw.apps {
            let spec = AppSpec::from_raw(&name, value)?;
            apps.insert(name, spec);
        }

        Ok(Self {
            listen: raw.listen,
            mapping: raw.mapping,
            apps,
        })
    }
}

/// An executable plus its base arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSpec {
    pub executable: String,
    pub args: Vec<String>,
}

impl AppSpec {
    /// Interpret a raw app value.
    ///
    /// - An argv array uses its first element as the executable and the
    ///   rest as base arguments.
    /// - A string whose content is wrapped in double quotes is kept as one
    ///   opaque executable token with no arguments (for paths containing
    ///   spaces).
    /// - Any other string splits on whitespace: first token executable,
    ///   remaining tokens arguments. An unquoted path containing spaces
    ///   splits too; quote it or use the array form instead.
    fn from_raw(name: &str, raw: RawAppSpec) -> Result<Self> {
        match raw {
            RawAppSpec::Line(line) => {
                let line = line.trim();
                if let Some(quoted) = unquote(line) {
                    if quoted.is_empty() {
                        return Err(WormholeError::Config(format!(
                            "app '{name}' has an empty quoted command"
                        )));
                    }
                    return Ok(Self {
                        executable: quoted.to_string(),
                        args: Vec::new(),
                    });
                }

                let mut words = line.split_whitespace();
                let Some(executable) = words.next() else {
                    return Err(WormholeError::Config(format!(
                        "app '{name}' has an empty command"
                    )));
                };
                Ok(Self {
                    executable: executable.to_string(),
                    args: words.map(str::to_string).collect(),
                })
            }
            RawAppSpec::Argv(argv) => {
                let Some((executable, args)) = argv.split_first() else {
                    return Err(WormholeError::Config(format!(
                        "app '{name}' has an empty argument array"
                    )));
                };
                if executable.is_empty() {
                    return Err(WormholeError::Config(format!(
                        "app '{name}' has an empty executable"
                    )));
                }
                Ok(Self {
                    executable: executable.clone(),
                    args: args.to_vec(),
                })
            }
        }
    }
}

/// Strip one surrounding pair of double quotes, if present.
fn unquote(line: &str) -> Option<&str> {
    line.strip_prefix('"')?.strip_suffix('"')
}
