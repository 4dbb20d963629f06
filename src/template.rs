use std::{collections::HashSet, sync::OnceLock};

use log::trace;
use regex::Regex;
use serde_json::Value;

use crate::config::Entry;

/// Rendered in place of any field the entry doesn't have.
pub(crate) const SENTINEL: &str = "???";

fn placeholder_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  // match against syntax {{field_name}}
  RE.get_or_init(|| Regex::new(r"\{\{(\w*)\}\}").expect("placeholder regex is valid"))
}

/// Replace every `{{name}}` in `template` with the entry's `name` field, or [`SENTINEL`] if the
/// entry is absent or has no such field. Never fails.
///
/// Placeholders are collected from the template first, then each distinct one is replaced across
/// the whole working string in order of first appearance. A value that itself contains a later
/// placeholder is therefore expanded too.
pub(crate) fn render(template: &str, entry: Option<&Entry>) -> String {
  let mut rendered = template.to_string();
  let mut seen = HashSet::new();
  for caps in placeholder_re().captures_iter(template) {
    let (token, name) = (&caps[0], &caps[1]);
    if !seen.insert(token.to_string()) {
      continue;
    }
    let value = entry.and_then(|e| e.get(name)).and_then(field_text);
    trace!("placeholder {token:?} -> {value:?}");
    rendered = rendered.replace(token, value.as_deref().unwrap_or(SENTINEL));
  }
  rendered
}

/// Strings go in verbatim, other scalars as their json text. `null` counts as missing.
fn field_text(value: &Value) -> Option<String> {
  match value {
    Value::Null => None,
    Value::String(s) => Some(s.clone()),
    other => Some(other.to_string()),
  }
}

#[cfg(test)]
mod tests {
  use quickcheck::TestResult;
  use quickcheck_macros::quickcheck;
  use rstest::rstest;
  use serde_json::json;

  use super::*;

  fn entry(value: Value) -> Entry {
    match value {
      Value::Object(map) => map,
      _ => panic!("entry fixture must be an object"),
    }
  }

  #[rstest]
  #[case("{{title}} ({{id}})", "Pilot (1x01)")]
  #[case("{{title}}: {{missing}}", "Pilot: ???")]
  #[case("{{title}} / {{title}}", "Pilot / Pilot")]
  #[case("{{}}", "???")]
  #[case("{ {title} }", "{ {title} }")]
  #[case("{{{title}}}", "{Pilot}")]
  #[case("s{{season}}e{{aired}}", "s1etrue")]
  #[case("{{nothing}}", "???")]
  fn renders_fields(#[case] template: &str, #[case] expected: &str) {
    let e = entry(json!({"title": "Pilot", "id": "1x01", "season": 1, "aired": true, "nothing": null}));
    assert_eq!(render(template, Some(&e)), expected);
  }

  #[rstest]
  #[case("{{a}} {{b}}", "X X")]
  #[case("{{b}} {{a}}", "X {{b}}")]
  #[case("{{a}}{{a}}", "{{b}}{{b}}")]
  fn values_are_substituted_in_order(#[case] template: &str, #[case] expected: &str) {
    let e = entry(json!({"a": "{{b}}", "b": "X"}));
    assert_eq!(render(template, Some(&e)), expected);
  }

  #[test]
  fn absent_entry_renders_sentinels() {
    assert_eq!(render("{{title}}", None), "???");
    assert_eq!(render("{{title}} ({{id}})", None), "??? (???)");
  }

  #[test]
  fn unicode_word_placeholders() {
    let e = entry(json!({"títle": "Piloto"}));
    assert_eq!(render("{{títle}}", Some(&e)), "Piloto");
  }

  #[quickcheck]
  fn no_placeholders_is_identity(s: String) -> TestResult {
    if s.contains("{{") {
      return TestResult::discard();
    }
    TestResult::from_bool(render(&s, None) == s)
  }

  #[quickcheck]
  fn present_field_renders_verbatim(value: String) -> bool {
    let e = entry(json!({ "field": value.clone() }));
    render("<{{field}}>", Some(&e)) == format!("<{value}>")
  }
}
