use tracing::info;

use crate::error::Result;
use crate::jira::issue::{Issue, User};
use crate::jira::JiraClient;

#[derive(Debug, Clone, PartialEq)]
pub enum Assignment {
  AlreadyAssigned,
  Reassigned { key: String, previous: Option<User> },
}

impl std::fmt::Display for Assignment {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Assignment::AlreadyAssigned => write!(f, "Already assigned to you"),
      Assignment::Reassigned {
        key,
        previous: Some(user),
      } => write!(f, "Re-Assigned {key} from {user}"),
      Assignment::Reassigned { key, previous: None } => write!(f, "Assigned {key} to you (was unassigned)"),
    }
  }
}

/// Assigns `issue` to the authenticated user unless they already own it.
pub async fn assign_to_self(client: &JiraClient, issue: &Issue) -> Result<Assignment> {
  let me = client.myself().await?;
  let previous = issue.fields.assignee.clone();

  if previous.as_ref().is_some_and(|a| a.account_id == me.account_id) {
    info!("{} is already assigned to {}", issue.key, me.account_id);
    return Ok(Assignment::AlreadyAssigned);
  }

  client.assign_issue(&issue.key, &me.account_id).await?;
  Ok(Assignment::Reassigned {
    key: issue.key.clone(),
    previous,
  })
}
