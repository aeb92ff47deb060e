use std::sync::LazyLock;

use regex::Regex;

static ISSUE_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(.*/)?(?P<key>[A-Za-z]+-[0-9]+)").expect("valid issue key pattern")
});

static BRANCH_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z]{1,4}-[1-9][0-9]{0,6}").expect("valid branch key pattern"));

/// Extracts an issue key such as `ABC-123` from user input, which may be a bare
/// key, a browse URL on `host`, or any URL-ish string ending in a key.
pub fn parse_issue_key(input: &str, host: &str) -> Option<String> {
    let mut key = input.trim();
    if key.is_empty() {
        return None;
    }

    let host = host.trim_end_matches('/');
    if !host.is_empty() {
        if let Some(rest) = key.strip_prefix(host) {
            key = rest.strip_prefix("/browse/").unwrap_or(rest);
        }
    }

    ISSUE_KEY
        .captures(key)
        .and_then(|caps| caps.name("key"))
        .map(|m| m.as_str().to_string())
}

/// Returns the last issue key found in a branch name after removing `prefix`.
pub fn key_from_branch(branch: &str, prefix: &str) -> Option<String> {
    let branch = branch.trim();
    let branch = branch.strip_prefix(prefix).unwrap_or(branch);
    BRANCH_KEY
        .find_iter(branch)
        .last()
        .map(|m| m.as_str().to_string())
}
