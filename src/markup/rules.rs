//! Ordered rewrite rules from Jira wiki markup to GitHub flavoured Markdown.
//!
//! Each rule sees the output of the one before it. The table is an
//! approximation of the markup grammar: nested lists and emphasis inside
//! other spans are not always translated faithfully.
//!
//! Whitespace classes are spelled out as `[\t\n\f\r ]` rather than `\s`:
//! non-breaking and other Unicode spaces are ordinary text in Jira markup.

use std::sync::LazyLock;

use regex::Regex;

use super::rewriter::{rewrite, Replacement, Rule};

pub static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
  vec![
    Rule::computed("unordered_list", r"(?m)^[ \t]*(\*+)[\t\n\f\r ]+", unordered_item),
    Rule::computed("ordered_list", r"(?m)^[ \t]*(#+)[\t\n\f\r ]+", ordered_item),
    Rule::computed("heading", r"(?m)^h([0-6])\.(.*)$", heading),
    Rule::literal("bold", r"\*([^\t\n\f\r ].*)\*", "**$1**"),
    Rule::literal("italic", r"_([^\t\n\f\r ].*)_", "*$1*"),
    Rule::literal("monospace", r"\{\{([^}]+)\}\}", "`$1`"),
    Rule::literal("citation", r"\?\?((?:.[^?]|[^?].)+)\?\?", "<cite>$1</cite>"),
    Rule::literal("insert", r"\+([^+]*)\+", "<ins>$1</ins>"),
    Rule::literal("superscript", r"\^([^\^]*)\^", "<sup>$1</sup>"),
    Rule::literal("subscript", r"~([^~]*)~", "<sub>$1</sub>"),
    Rule::literal(
      "strikethrough",
      r"([\t\n\f\r ]+)-([^\t\n\f\r ]+.*?[^\t\n\f\r ])-([\t\n\f\r ]+)",
      "$1~~$2~~$3",
    ),
    Rule::literal(
      "code_block",
      r"\{code(:([a-z]+))?([:|]?(title|borderStyle|borderColor|borderWidth|bgColor|titleBGColor)=.+?)*\}",
      "```$2",
    ),
    Rule::literal("code_block_end", r"\{code\}", "```"),
    Rule::literal("noformat", r"\{noformat\}", "```"),
    Rule::literal("unnamed_link", r"(?U)\[([^|]+)\]", "<$1>"),
    Rule::literal("image", r"!(.+)!", "![]($1)"),
    Rule::literal("named_link", r"\[(.+?)\|(.+)\]", "[$2]($1)"),
    Rule::literal("blockquote", r"(?m)^bq\.[\t\n\f\r ]+", "> "),
    Rule::literal("color", r"(?m)\{color:[^}]+\}(.*)\{color\}", "$1"),
    Rule::literal(
      "panel",
      r"(?m)\{panel:title=([^}]*)\}\n?(.*?)\n?\{panel\}",
      "\n| $1 |\n| --- |\n| $2 |",
    ),
    Rule::computed("table_header", r"(?m)^[ \t]*((?:\|\|.*?)+\|\|)[ \t]*$", table_header),
    Rule::literal("table_row_indent", r"(?m)^[ \t]*\|", "|"),
  ]
});

static DOUBLE_BAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\|\|").expect("valid pattern"));
static HEADER_CELL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\|[^|]+").expect("valid pattern"));

fn unordered_item(groups: &[String]) -> String {
  format!("{}* ", "  ".repeat(groups[1].len().saturating_sub(1)))
}

fn ordered_item(groups: &[String]) -> String {
  format!("{}1. ", "  ".repeat(groups[1].len().saturating_sub(1)))
}

fn heading(groups: &[String]) -> String {
  let level: usize = groups[1].parse().unwrap_or(0);
  format!("{}{}", "#".repeat(level), groups[2])
}

// ||a||b|| becomes a single-bar header row followed by a generated separator row
fn table_header(groups: &[String]) -> String {
  let single = rewrite(&DOUBLE_BAR, &groups[1], &Replacement::Literal("|"));
  let separator = rewrite(&HEADER_CELL, &single, &Replacement::Literal("| --- "));
  format!("\n{single}\n{separator}")
}

#[cfg(test)]
mod tests {
  use super::*;

  fn rule(name: &str) -> &'static Rule {
    RULES
      .iter()
      .find(|r| r.name == name)
      .unwrap_or_else(|| panic!("no rule named {name}"))
  }

  #[test]
  fn test_all_rules_compile_in_declared_order() {
    let names: Vec<&str> = RULES.iter().map(|r| r.name).collect();
    assert_eq!(names.len(), 22);
    assert_eq!(names.first(), Some(&"unordered_list"));
    assert_eq!(names.last(), Some(&"table_row_indent"));
    let header = names.iter().position(|n| *n == "table_header").unwrap();
    let indent = names.iter().position(|n| *n == "table_row_indent").unwrap();
    assert!(header < indent);
  }

  #[test]
  fn test_nested_lists() {
    assert_eq!(rule("unordered_list").apply("* one\n** two"), "* one\n  * two");
    assert_eq!(rule("ordered_list").apply("# one\n  ## two"), "1. one\n  1. two");
  }

  #[test]
  fn test_heading_levels() {
    let r = rule("heading");
    assert_eq!(r.apply("h1. Title"), "# Title");
    assert_eq!(r.apply("h3. Deep"), "### Deep");
    assert_eq!(r.apply("h6.x"), "######x");
    assert_eq!(r.apply("h0. Plain"), " Plain");
    assert_eq!(r.apply("h7. Nope"), "h7. Nope");
  }

  #[test]
  fn test_table_header_generates_separator() {
    assert_eq!(
      rule("table_header").apply("||Name||Age||"),
      "\n|Name|Age|\n| --- | --- |"
    );
  }

  #[test]
  fn test_table_row_indent_is_stripped() {
    assert_eq!(rule("table_row_indent").apply("  |a|b|\n\t|c|d|"), "|a|b|\n|c|d|");
  }

  #[test]
  fn test_unicode_spaces_are_not_markup_whitespace() {
    assert_eq!(rule("unordered_list").apply("*\u{a0}x*"), "*\u{a0}x*");
    assert_eq!(rule("bold").apply("*\u{a0}x*"), "**\u{a0}x**");
    assert_eq!(rule("strikethrough").apply("a\u{2003}-x-\u{2003}b"), "a\u{2003}-x-\u{2003}b");
    assert_eq!(rule("blockquote").apply("bq.\u{a0}quote"), "bq.\u{a0}quote");
  }

  #[test]
  fn test_code_block_with_parameters() {
    let r = rule("code_block");
    assert_eq!(r.apply("{code:java}"), "```java");
    assert_eq!(r.apply("{code:title=Foo.java|borderStyle=solid}"), "```");
    assert_eq!(r.apply("{code}"), "```");
  }
}
