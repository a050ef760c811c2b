use std::sync::LazyLock;

use indexmap::IndexMap;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::{Captures, Regex};
use serde_json::Value;

/// Matches `{name}` (simple expansion) and `{+name}` (reserved expansion).
static RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(?<reserved>\+)?(?<name>[^}]+)}").expect("a valid regex"));

/// Everything but unreserved characters is encoded.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Unreserved and reserved characters are kept.
const RESERVED: &AsciiSet = &UNRESERVED
    .remove(b':')
    .remove(b'/')
    .remove(b'?')
    .remove(b'#')
    .remove(b'[')
    .remove(b']')
    .remove(b'@')
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=');

/// Expands a path template with the path variables.
///
/// Unknown variables expand to an empty string, arrays are comma separated
/// and objects expand to their `key,value` pairs.
pub(crate) fn expand_template(template: &str, variables: &IndexMap<String, Value>) -> String {
    RE.replace_all(template, |captures: &Captures<'_>| {
        let set = if captures.name("reserved").is_some() {
            RESERVED
        } else {
            UNRESERVED
        };
        captures
            .name("name")
            .and_then(|name| variables.get(name.as_str().trim()))
            .map(|value| expand_value(value, set))
            .unwrap_or_default()
    })
    .into_owned()
}

fn expand_value(value: &Value, set: &'static AsciiSet) -> String {
    match value {
        Value::Array(values) => values
            .iter()
            .map(|it| expand_scalar(it, set))
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(fields) => fields
            .iter()
            .flat_map(|(key, value)| [encode(key, set), expand_scalar(value, set)])
            .collect::<Vec<_>>()
            .join(","),
        scalar => expand_scalar(scalar, set),
    }
}

fn expand_scalar(value: &Value, set: &'static AsciiSet) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => encode(text, set),
        other => encode(&other.to_string(), set),
    }
}

fn encode(text: &str, set: &'static AsciiSet) -> String {
    utf8_percent_encode(text, set).to_string()
}
