use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum JtError {
  #[error("config error: {0}")]
  Config(String),

  #[error("config file not found: {0}")]
  ConfigNotFound(PathBuf),

  #[error("jira returned {status}: {body}")]
  Api { status: u16, body: String },

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("git error: {0}")]
  Git(String),

  #[error("issue is already in status {0}")]
  AlreadyInStatus(String),

  #[error("there does not appear to be a valid transition to {0}")]
  NoTransition(String),

  #[error("no issue key found in {0:?}")]
  NoIssueKey(String),

  #[error("prompt error: {0}")]
  Prompt(#[from] dialoguer::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("yaml error: {0}")]
  Yaml(#[from] serde_yaml::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, JtError>;
