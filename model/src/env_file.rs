use crate::error::{self, Result};
use log::debug;
use snafu::{ensure, ResultExt};
use std::collections::BTreeMap;
use std::path::Path;

/// A snapshot of the variables `arc-lab` reads its settings from: the process environment with
/// the pairs from an env file layered on top. Building one never mutates the process
/// environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    /// Snapshot the process environment and overlay `env_file` if it exists.
    pub fn load(env_file: &Path) -> Result<Self> {
        let mut environment = Self::from_vars(std::env::vars());
        if env_file.is_file() {
            let contents =
                std::fs::read_to_string(env_file).context(error::EnvFileReadSnafu {
                    path: env_file.to_path_buf(),
                })?;
            let pairs = parse_env_file(env_file, &contents)?;
            debug!(
                "Loaded {} variable(s) from '{}'",
                pairs.len(),
                env_file.display()
            );
            environment.overlay(pairs);
        } else {
            debug!("No env file at '{}', using the process environment", env_file.display());
        }
        Ok(environment)
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Later pairs win, the same way repeated `export`s would.
    pub fn overlay<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.vars.extend(pairs)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn vars(&self) -> impl Iterator<Item = (String, String)> + '_ {
        self.vars.iter().map(|(k, v)| (k.clone(), v.clone()))
    }
}

/// Parse newline separated `KEY=VALUE` pairs. Blank lines and `#` comments are skipped, a leading
/// `export ` is dropped and one layer of matching quotes is stripped from the value.
pub fn parse_env_file(path: &Path, contents: &str) -> Result<Vec<(String, String)>> {
    let mut pairs = Vec::new();
    for (index, raw) in contents.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line).trim_start();
        let malformed = || error::EnvFileLineSnafu {
            path: path.to_path_buf(),
            line_number: index + 1,
            line: raw.to_string(),
        };
        let (key, value) = line.split_once('=').ok_or_else(|| malformed().build())?;
        let key = key.trim();
        ensure!(
            !key.is_empty() && !key.contains(char::is_whitespace),
            malformed()
        );
        pairs.push((key.to_string(), unquote(value.trim()).to_string()));
    }
    Ok(pairs)
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
