//! Load-time expansion of `%(key)s` references.
//!
//! `configparser` has no interpolation support, so the store runs this pass
//! over a freshly parsed document when asked to. References resolve against
//! the raw values of the same section, recursively up to a fixed depth, and
//! `%%` escapes a literal percent sign. Anything unresolvable, a reference
//! to a missing key, malformed reference text or a chain past the depth
//! limit, is left in the value untouched.

use std::collections::HashMap;

use configparser::ini::Ini;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

lazy_static! {
    /// Reference tail expected right after a `%`: `(name)s`.
    static ref REFERENCE_REGEX: Regex = Regex::new(r"^\(([^)]+)\)s").unwrap();
}

/// Nesting depth at which references stop being followed.
const MAX_REFERENCE_DEPTH: usize = 10;

/// Expand `%(key)s` references in every value of `ini`, section by section.
pub(super) fn interpolate_document(ini: &mut Ini) {
    let Some(snapshot) = ini.get_map() else {
        return;
    };

    let mut updates = Vec::new();
    for (section, entries) in &snapshot {
        let section_values: HashMap<String, String> = entries
            .iter()
            .map(|(key, value)| (key.clone(), value.clone().unwrap_or_default()))
            .collect();
        for (key, raw) in &section_values {
            if !raw.contains('%') {
                continue;
            }
            let expanded = expand(raw, &section_values, 1);
            if expanded != *raw {
                updates.push((section.clone(), key.clone(), expanded));
            }
        }
    }

    if !updates.is_empty() {
        debug!("Interpolated {} value(s)", updates.len());
    }
    for (section, key, value) in updates {
        ini.set(&section, &key, Some(value));
    }
}

/// Expand a single raw value against the values of its section. `depth`
/// counts the chain of references currently being followed.
fn expand(raw: &str, section_values: &HashMap<String, String>, depth: usize) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];

        // `%%` is a literal percent sign.
        if let Some(after) = tail.strip_prefix('%') {
            out.push('%');
            rest = after;
            continue;
        }

        let captures = match REFERENCE_REGEX.captures(tail) {
            Some(captures) => captures,
            None => {
                // Not a reference, keep the percent sign as text.
                out.push('%');
                rest = tail;
                continue;
            }
        };
        if let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) {
            match section_values.get(&name.as_str().to_lowercase()) {
                Some(referent) if depth < MAX_REFERENCE_DEPTH => {
                    out.push_str(&expand(referent, section_values, depth + 1));
                }
                _ => {
                    // Unknown key or chain too deep, keep the reference.
                    out.push('%');
                    out.push_str(&tail[..whole.end()]);
                }
            }
            rest = &tail[whole.end()..];
        } else {
            out.push('%');
            rest = tail;
        }
    }

    out.push_str(rest);
    out
}
