use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::rewriter::{find_matches, splice};
use crate::error::Result;
use crate::jira::issue::User;

static MENTION: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(\[~accountid:)([a-zA-Z0-9:-]+)(\])").expect("valid mention pattern")
});

/// Looks up a tracker account by its opaque id.
pub trait AccountResolver {
  async fn resolve_account(&self, account_id: &str) -> Result<User>;
}

/// Replaces every `[~accountid:...]` token with `Display Name (email)`.
///
/// Lookups happen one at a time in the order the tokens appear. Each distinct
/// id is looked up at most once per call. A token whose lookup fails is left
/// exactly as written.
pub async fn resolve_mentions<R: AccountResolver>(resolver: &R, text: &str) -> String {
  let matches = find_matches(&MENTION, text);
  if matches.is_empty() {
    return text.to_string();
  }

  let mut resolved: HashMap<&str, Option<String>> = HashMap::new();
  let mut replacements = Vec::with_capacity(matches.len());

  for m in &matches {
    let account_id = m.groups[2].as_str();
    if !resolved.contains_key(account_id) {
      let display = match resolver.resolve_account(account_id).await {
        Ok(user) => Some(user.to_string()),
        Err(e) => {
          debug!("leaving mention of {account_id} unresolved: {e}");
          None
        }
      };
      resolved.insert(account_id, display);
    }

    let replacement = resolved
      .get(account_id)
      .cloned()
      .flatten()
      .unwrap_or_else(|| m.groups[0].clone());
    replacements.push(replacement);
  }

  splice(text, &matches, replacements)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::JtError;
  use std::sync::Mutex;

  struct FakeDirectory {
    users: HashMap<&'static str, (&'static str, &'static str)>,
    lookups: Mutex<Vec<String>>,
  }

  impl FakeDirectory {
    fn new(users: &[(&'static str, &'static str, &'static str)]) -> Self {
      Self {
        users: users.iter().map(|(id, name, email)| (*id, (*name, *email))).collect(),
        lookups: Mutex::new(Vec::new()),
      }
    }
  }

  impl AccountResolver for FakeDirectory {
    async fn resolve_account(&self, account_id: &str) -> Result<User> {
      self.lookups.lock().unwrap().push(account_id.to_string());
      match self.users.get(account_id) {
        Some((name, email)) => Ok(User {
          account_id: account_id.to_string(),
          display_name: name.to_string(),
          email_address: email.to_string(),
        }),
        None => Err(JtError::Api {
          status: 404,
          body: "not found".into(),
        }),
      }
    }
  }

  #[tokio::test]
  async fn test_resolves_known_account() {
    let dir = FakeDirectory::new(&[("557058:abc-1", "Ada Lovelace", "ada@example.com")]);
    let out = resolve_mentions(&dir, "ping [~accountid:557058:abc-1] please").await;
    assert_eq!(out, "ping Ada Lovelace (ada@example.com) please");
  }

  #[tokio::test]
  async fn test_unresolvable_account_keeps_token() {
    let dir = FakeDirectory::new(&[]);
    let out = resolve_mentions(&dir, "cc [~accountid:XYZ]").await;
    assert_eq!(out, "cc [~accountid:XYZ]");
  }

  #[tokio::test]
  async fn test_lookups_are_ordered_and_deduplicated() {
    let dir = FakeDirectory::new(&[("a", "A", "a@x.io"), ("b", "B", "b@x.io")]);
    let out = resolve_mentions(
      &dir,
      "[~accountid:b] [~accountid:missing] [~accountid:a] [~accountid:b] [~accountid:missing]",
    )
    .await;
    assert_eq!(
      out,
      "B (b@x.io) [~accountid:missing] A (a@x.io) B (b@x.io) [~accountid:missing]"
    );
    assert_eq!(*dir.lookups.lock().unwrap(), vec!["b", "missing", "a"]);
  }

  #[tokio::test]
  async fn test_text_without_mentions_skips_lookups() {
    let dir = FakeDirectory::new(&[]);
    let out = resolve_mentions(&dir, "[~someone] and [link|http://x]").await;
    assert_eq!(out, "[~someone] and [link|http://x]");
    assert!(dir.lookups.lock().unwrap().is_empty());
  }
}
