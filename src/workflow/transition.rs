use tracing::{debug, info};

use crate::error::{JtError, Result};
use crate::jira::issue::{Issue, Transition};
use crate::jira::JiraClient;

#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
  pub key: String,
  pub from: String,
  pub to: String,
}

impl std::fmt::Display for StatusChange {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "Issue {} Status successfully changed from: {} and set to: {}",
      self.key, self.from, self.to
    )
  }
}

/// Rejects a move into the status the issue already has. A desired name
/// contained in the current one (ignoring case) counts as the same status.
pub fn ensure_not_in_status(current: &str, desired: &str) -> Result<()> {
  if current == desired || contains_ignore_case(current, desired) {
    return Err(JtError::AlreadyInStatus(current.to_string()));
  }
  Ok(())
}

/// Picks the transition leading to `desired`.
///
/// Tiers, each scanned in list order with the first hit winning:
/// 1. target name equals `desired`, ignoring case
/// 2. target name with all whitespace removed equals `desired`, ignoring case,
///    so `ToDo` finds `TO DO`
/// 3. target name contains `desired` or is contained in it, ignoring case,
///    so `Done` finds `Deployed / Done`
pub fn select_transition<'a>(desired: &str, transitions: &'a [Transition]) -> Result<&'a Transition> {
  let exact = move || transitions.iter().find(|t| eq_ignore_case(&t.to.name, desired));
  let compact = move || {
    transitions
      .iter()
      .find(|t| eq_ignore_case(&remove_whitespace(&t.to.name), desired))
  };
  let partial = move || {
    transitions.iter().find(|t| {
      !t.to.name.is_empty()
        && (contains_ignore_case(&t.to.name, desired) || contains_ignore_case(desired, &t.to.name))
    })
  };

  exact()
    .or_else(compact)
    .or_else(partial)
    .ok_or_else(|| JtError::NoTransition(desired.to_string()))
}

/// Moves `issue` to the status named `desired` and re-reads it to report the
/// status the tracker actually settled on.
pub async fn move_to_status(client: &JiraClient, issue: &Issue, desired: &str) -> Result<StatusChange> {
  let original = issue.status_name().to_string();
  ensure_not_in_status(&original, desired)?;

  let transitions = client.get_transitions(&issue.key).await?;
  let transition = select_transition(desired, &transitions)?;
  debug!(
    "{}: using transition {} ({}) to reach {}",
    issue.key, transition.id, transition.name, transition.to.name
  );
  client.do_transition(&issue.key, &transition.id).await?;

  let updated = client.get_issue(&issue.key).await?;
  info!("{}: {original} -> {}", issue.key, updated.status_name());
  Ok(StatusChange {
    key: issue.key.clone(),
    from: original,
    to: updated.status_name().to_string(),
  })
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
  a.to_lowercase() == b.to_lowercase()
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
  haystack.to_uppercase().contains(&needle.to_uppercase())
}

fn remove_whitespace(s: &str) -> String {
  s.chars().filter(|c| !c.is_whitespace()).collect()
}
