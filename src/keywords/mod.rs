//! Host-invocation boundary.
//!
//! Every store operation is published here under the action name a
//! keyword-driven host invokes it by. The dispatcher validates the argument
//! count, parses boolean arguments, runs the operation against the store
//! handle it is handed and translates every failure into a [`KeywordError`]
//! after logging it. Core errors pass through wrapped, never reworded; this
//! module is the only place they meet the host's failure convention.

use std::collections::HashMap;

use log::error;
use thiserror::Error;

use crate::store::{IniStore, StoreError};

/// Error type for keyword invocations
#[derive(Error, Debug)]
pub enum KeywordError {
    #[error("Unknown keyword \"{0}\"")]
    UnknownKeyword(String),

    #[error("Keyword \"{name}\" expects {expected} argument(s), got {given}")]
    BadArgumentCount {
        name: &'static str,
        expected: String,
        given: usize,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Value a keyword hands back to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum KeywordValue {
    /// Mutating keywords return nothing
    None,
    Str(String),
    Bool(bool),
    List(Vec<String>),
    Map(HashMap<String, String>),
}

impl From<String> for KeywordValue {
    fn from(value: String) -> Self {
        KeywordValue::Str(value)
    }
}

impl From<bool> for KeywordValue {
    fn from(value: bool) -> Self {
        KeywordValue::Bool(value)
    }
}

impl From<Vec<String>> for KeywordValue {
    fn from(values: Vec<String>) -> Self {
        KeywordValue::List(values)
    }
}

impl From<HashMap<String, String>> for KeywordValue {
    fn from(items: HashMap<String, String>) -> Self {
        KeywordValue::Map(items)
    }
}

/// The named actions the host can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    LoadIniFile,
    GetIniValue,
    SetIniValue,
    SaveIniFile,
    RemoveSection,
    RemoveIniKey,
    GetAllKeysAndValues,
    GetValuesList,
    SectionExists,
    KeyExists,
}

impl Keyword {
    /// Every published keyword, in documentation order.
    pub fn all() -> &'static [Keyword] {
        &[
            Keyword::LoadIniFile,
            Keyword::GetIniValue,
            Keyword::SetIniValue,
            Keyword::SaveIniFile,
            Keyword::RemoveSection,
            Keyword::RemoveIniKey,
            Keyword::GetAllKeysAndValues,
            Keyword::GetValuesList,
            Keyword::SectionExists,
            Keyword::KeyExists,
        ]
    }

    /// Canonical keyword name as published to the host.
    pub fn name(&self) -> &'static str {
        match self {
            Keyword::LoadIniFile => "Load INI File",
            Keyword::GetIniValue => "Get INI Value",
            Keyword::SetIniValue => "Set INI Value",
            Keyword::SaveIniFile => "Save INI File",
            Keyword::RemoveSection => "Remove Section",
            Keyword::RemoveIniKey => "Remove INI Key",
            Keyword::GetAllKeysAndValues => "Get All Keys And Values",
            Keyword::GetValuesList => "Get Values List",
            Keyword::SectionExists => "Section Exists",
            Keyword::KeyExists => "Key Exists",
        }
    }

    /// Resolve a host-supplied name. Matching ignores case, spaces and
    /// underscores, the way keyword-driven hosts match action names.
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = normalize(name);
        Keyword::all()
            .iter()
            .copied()
            .find(|keyword| normalize(keyword.name()) == wanted)
    }

    /// Minimum and maximum number of arguments the keyword accepts.
    fn arity(&self) -> (usize, usize) {
        match self {
            Keyword::LoadIniFile => (1, 2),
            Keyword::GetIniValue => (2, 2),
            Keyword::SetIniValue => (3, 3),
            Keyword::SaveIniFile => (0, 1),
            Keyword::RemoveSection => (1, 1),
            Keyword::RemoveIniKey => (2, 2),
            Keyword::GetAllKeysAndValues => (1, 1),
            Keyword::GetValuesList => (2, 2),
            Keyword::SectionExists => (1, 1),
            Keyword::KeyExists => (2, 2),
        }
    }
}

/// Names of every published keyword, for host-side discovery.
pub fn keyword_names() -> Vec<&'static str> {
    Keyword::all()
        .iter()
        .map(|keyword| keyword.name())
        .collect()
}

/// Run one keyword against `store`.
///
/// A failure is logged through the host's log sink and returned; it never
/// aborts anything beyond the single invocation.
pub fn run_keyword(
    store: &mut IniStore,
    name: &str,
    args: &[&str],
) -> Result<KeywordValue, KeywordError> {
    let result = dispatch(store, name, args);
    if let Err(err) = &result {
        error!("Keyword \"{}\" failed: {}", name, err);
    }
    result
}

fn dispatch(store: &mut IniStore, name: &str, args: &[&str]) -> Result<KeywordValue, KeywordError> {
    let keyword =
        Keyword::from_name(name).ok_or_else(|| KeywordError::UnknownKeyword(name.to_string()))?;
    check_arity(keyword, args.len())?;

    match keyword {
        Keyword::LoadIniFile => {
            let interpolate = args.get(1).map_or(false, |flag| parse_bool(flag));
            store.load(args[0], interpolate)?;
            Ok(KeywordValue::None)
        }
        Keyword::GetIniValue => Ok(store.get(args[0], args[1])?.into()),
        Keyword::SetIniValue => {
            store.set(args[0], args[1], args[2])?;
            Ok(KeywordValue::None)
        }
        Keyword::SaveIniFile => {
            store.save(args.first().copied())?;
            Ok(KeywordValue::None)
        }
        Keyword::RemoveSection => {
            store.remove_section(args[0])?;
            Ok(KeywordValue::None)
        }
        Keyword::RemoveIniKey => {
            store.remove_key(args[0], args[1])?;
            Ok(KeywordValue::None)
        }
        Keyword::GetAllKeysAndValues => Ok(store.section_map(args[0])?.into()),
        Keyword::GetValuesList => Ok(store.values_for_key(args[0], args[1])?.into()),
        Keyword::SectionExists => Ok(store.section_exists(args[0])?.into()),
        Keyword::KeyExists => Ok(store.key_exists(args[0], args[1])?.into()),
    }
}

fn check_arity(keyword: Keyword, given: usize) -> Result<(), KeywordError> {
    let (min, max) = keyword.arity();
    if given < min || given > max {
        let expected = if min == max {
            min.to_string()
        } else {
            format!("{} to {}", min, max)
        };
        return Err(KeywordError::BadArgumentCount {
            name: keyword.name(),
            expected,
            given,
        });
    }
    Ok(())
}

/// Name matching form: lowercase with spaces and underscores removed.
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != ' ' && *c != '_')
        .collect::<String>()
        .to_lowercase()
}

/// Parse a host-supplied string as boolean
fn parse_bool(value: &str) -> bool {
    value.to_lowercase() == "true" || value == "1"
}
