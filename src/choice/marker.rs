use once_cell::sync::Lazy;
use regex::Regex;

static MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\\cc\[([^\]]+)\]").expect("valid regex"));

/// Condition attached to a choice through a `\cc[...]` marker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Condition {
    /// Inline expression, shorthand not yet expanded.
    Expression(String),
    /// `\cc[:name]`, looked up in the predicate registry.
    Named(String),
}

impl Condition {
    fn from_payload(payload: &str) -> Self {
        match payload.strip_prefix(':') {
            Some(name) => Condition::Named(name.to_string()),
            None => Condition::Expression(payload.to_string()),
        }
    }
}

/// Split raw choice text into display text and its condition, if any.
///
/// Only the first marker is read; every marker is removed from the text.
/// A marker at the very start may leave an extra escape behind
/// (`\\cc[...]`), which is dropped too.
pub fn extract_condition(raw: &str) -> (String, Option<Condition>) {
    let Some(caps) = MARKER_RE.captures(raw) else {
        return (raw.to_string(), None);
    };
    // Only a marker at the head can leave a stray escape; a leading `\`
    // elsewhere belongs to the entry's own control codes and must stay.
    let at_start = caps.get(0).is_some_and(|m| m.start() <= 1);
    let condition = caps.get(1).map(|m| Condition::from_payload(m.as_str()));

    let mut text = MARKER_RE.replace_all(raw, "").into_owned();
    if at_start && text.starts_with('\\') {
        text.remove(0);
    }
    (text, condition)
}
