use regex::{Captures, Regex};

/// Computes the substitution for one match from its capture groups.
/// Index 0 is the whole match.
pub type ComputeFn = fn(&[String]) -> String;

#[derive(Clone, Copy)]
pub enum Replacement {
  /// Template with `$N` / `${N}` backreferences; `$$` is a literal dollar.
  Literal(&'static str),
  Computed(ComputeFn),
}

impl Replacement {
  pub fn apply(&self, groups: &[String]) -> String {
    match self {
      Replacement::Literal(template) => expand(template, groups),
      Replacement::Computed(f) => f(groups),
    }
  }
}

impl std::fmt::Debug for Replacement {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Replacement::Literal(template) => write!(f, "Literal({template:?})"),
      Replacement::Computed(_) => write!(f, "Computed(..)"),
    }
  }
}

#[derive(Debug)]
pub struct Rule {
  pub name: &'static str,
  pub pattern: Regex,
  pub replacement: Replacement,
}

impl Rule {
  pub fn literal(name: &'static str, pattern: &str, template: &'static str) -> Self {
    Self::new(name, pattern, Replacement::Literal(template))
  }

  pub fn computed(name: &'static str, pattern: &str, f: ComputeFn) -> Self {
    Self::new(name, pattern, Replacement::Computed(f))
  }

  fn new(name: &'static str, pattern: &str, replacement: Replacement) -> Self {
    let pattern = Regex::new(pattern)
      .unwrap_or_else(|e| panic!("invalid pattern for rule {name}: {e}"));
    Self {
      name,
      pattern,
      replacement,
    }
  }

  pub fn apply(&self, subject: &str) -> String {
    rewrite(&self.pattern, subject, &self.replacement)
  }
}

/// A located occurrence of a pattern. Groups that did not participate in the
/// match are stored as empty strings.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
  pub start: usize,
  pub end: usize,
  pub groups: Vec<String>,
}

impl Match {
  fn from_captures(caps: &Captures<'_>) -> Self {
    let whole = caps.get(0).expect("group 0 always participates");
    Self {
      start: whole.start(),
      end: whole.end(),
      groups: caps
        .iter()
        .map(|g| g.map(|m| m.as_str().to_string()).unwrap_or_default())
        .collect(),
    }
  }
}

/// Every non-overlapping leftmost match, in subject order.
pub fn find_matches(pattern: &Regex, subject: &str) -> Vec<Match> {
  pattern
    .captures_iter(subject)
    .map(|caps| Match::from_captures(&caps))
    .collect()
}

/// Rebuilds `subject` with each match replaced by the corresponding entry of
/// `replacements`. Text between matches is copied through untouched.
pub fn splice<I>(subject: &str, matches: &[Match], replacements: I) -> String
where
  I: IntoIterator<Item = String>,
{
  let mut out = String::with_capacity(subject.len());
  let mut last = 0;
  for (m, replacement) in matches.iter().zip(replacements) {
    out.push_str(&subject[last..m.start]);
    out.push_str(&replacement);
    last = m.end;
  }
  out.push_str(&subject[last..]);
  out
}

pub fn rewrite(pattern: &Regex, subject: &str, replacement: &Replacement) -> String {
  rewrite_with(pattern, subject, |groups| replacement.apply(groups))
}

pub fn rewrite_with<F>(pattern: &Regex, subject: &str, mut f: F) -> String
where
  F: FnMut(&[String]) -> String,
{
  let matches = find_matches(pattern, subject);
  if matches.is_empty() {
    return subject.to_string();
  }
  let replacements: Vec<String> = matches.iter().map(|m| f(&m.groups)).collect();
  splice(subject, &matches, replacements)
}

/// Expands `$N`, `${N}` and `$$` in a literal template. References to groups
/// that do not exist expand to nothing; a `$` not followed by a reference is
/// kept as is.
pub fn expand(template: &str, groups: &[String]) -> String {
  let mut out = String::with_capacity(template.len());
  let mut rest = template;

  while let Some(pos) = rest.find('$') {
    out.push_str(&rest[..pos]);
    let after = &rest[pos + 1..];

    if let Some(tail) = after.strip_prefix('$') {
      out.push('$');
      rest = tail;
      continue;
    }

    let (digits, tail) = if let Some(braced) = after.strip_prefix('{') {
      match braced.find('}') {
        Some(close) if is_group_number(&braced[..close]) => (&braced[..close], &braced[close + 1..]),
        _ => ("", after),
      }
    } else {
      let len = after.bytes().take_while(u8::is_ascii_digit).count();
      (&after[..len], &after[len..])
    };

    if digits.is_empty() {
      out.push('$');
      rest = after;
      continue;
    }

    if let Some(group) = digits.parse::<usize>().ok().and_then(|i| groups.get(i)) {
      out.push_str(group);
    }
    rest = tail;
  }

  out.push_str(rest);
  out
}

fn is_group_number(s: &str) -> bool {
  !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
