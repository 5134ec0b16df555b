use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow
};
use serde::{
  Deserialize,
  Serialize
};
use tracing::{
  debug,
  info
};

use crate::gateway::ApiPaths;

pub const DEFAULT_LOGIN_PATH: &str =
  "/login/";
pub const DEFAULT_ROOT_PATH: &str = "/";

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
#[serde(default)]
pub struct Config {
  /// Prefix for every API path. Empty means same origin.
  pub api_base:     String,
  pub login_path:   String,
  pub root_path:    String,
  pub timeout_secs: u64,
  /// Where the terminal client keeps its tokens.
  pub session_file: Option<PathBuf>
}

impl Default for Config {
  fn default() -> Self {
    Self {
      api_base:     String::new(),
      login_path:   DEFAULT_LOGIN_PATH
        .to_string(),
      root_path:    DEFAULT_ROOT_PATH
        .to_string(),
      timeout_secs: 30,
      session_file: None
    }
  }
}

impl Config {
  pub fn from_toml_str(
    text: &str
  ) -> anyhow::Result<Self> {
    toml::from_str(text)
      .context("invalid config file")
  }

  #[tracing::instrument]
  pub fn load_file(
    path: &Path
  ) -> anyhow::Result<Self> {
    let text = fs::read_to_string(path)
      .with_context(|| {
        format!(
          "failed to read {}",
          path.display()
        )
      })?;
    let cfg = Self::from_toml_str(&text)
      .with_context(|| {
        format!(
          "failed to parse {}",
          path.display()
        )
      })?;
    info!(path = %path.display(), "loaded config");
    Ok(cfg)
  }

  /// Apply `key=value` overrides on top of whatever was loaded. A leading
  /// `rc.` on the key is ignored.
  #[tracing::instrument(skip(
    self, overrides
  ))]
  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) -> anyhow::Result<()>
  where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    for (k, v) in overrides {
      let key = k
        .strip_prefix("rc.")
        .unwrap_or(&k)
        .trim();
      let value = v.trim();
      debug!(key, value, "applying override");
      match key {
        | "api_base" => {
          self.api_base = value.to_string();
        }
        | "login_path" => {
          self.login_path =
            value.to_string();
        }
        | "root_path" => {
          self.root_path = value.to_string();
        }
        | "timeout_secs" => {
          self.timeout_secs =
            value.parse().with_context(
              || {
                format!(
                  "timeout_secs must be \
                   a whole number, got \
                   '{value}'"
                )
              }
            )?;
        }
        | "session_file" => {
          self.session_file =
            if value.is_empty() {
              None
            } else {
              Some(PathBuf::from(value))
            };
        }
        | other => {
          return Err(anyhow!(
            "unknown config key '{other}'"
          ));
        }
      }
    }
    Ok(())
  }

  pub fn api_paths(&self) -> ApiPaths {
    ApiPaths::new(&self.api_base)
  }
}
