pub mod mention;
pub mod rewriter;
pub mod rules;

use tracing::trace;

use mention::AccountResolver;

/// Translates Jira wiki markup to Markdown by running every rule in order.
pub fn jira_to_markdown(text: &str) -> String {
  rules::RULES
    .iter()
    .fold(text.to_string(), |acc, rule| {
      trace!("applying rule {}", rule.name);
      rule.apply(&acc)
    })
}

/// Resolves account mentions, then translates the result to Markdown.
pub async fn render<R: AccountResolver>(resolver: &R, text: &str) -> String {
  let resolved = mention::resolve_mentions(resolver, text).await;
  jira_to_markdown(&resolved)
}
