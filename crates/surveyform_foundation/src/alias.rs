//! Type alias resolution.
//!
//! Maps author-facing type tokens from both authoring generations onto
//! [`CanonicalType`]. Matching ignores case and treats `_`, `-` and runs of
//! whitespace alike, so `select_one`, `Select One` and `select-one` are the
//! same token. The table is built once and read-only afterwards.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::error::{Error, Result};
use crate::types::CanonicalType;

/// Every accepted spelling (in normalized form) and its canonical type.
pub const ALIASES: &[(&str, CanonicalType)] = &[
    ("text", CanonicalType::Text),
    ("string", CanonicalType::Text),
    ("integer", CanonicalType::Integer),
    ("int", CanonicalType::Integer),
    ("decimal", CanonicalType::Decimal),
    ("date", CanonicalType::Date),
    ("time", CanonicalType::Time),
    ("datetime", CanonicalType::DateTime),
    ("geopoint", CanonicalType::Geopoint),
    ("gps", CanonicalType::Geopoint),
    ("location", CanonicalType::Geopoint),
    ("geotrace", CanonicalType::Geotrace),
    ("geoshape", CanonicalType::Geoshape),
    ("image", CanonicalType::Image),
    ("photo", CanonicalType::Image),
    ("audio", CanonicalType::Audio),
    ("video", CanonicalType::Video),
    ("file", CanonicalType::File),
    ("barcode", CanonicalType::Barcode),
    ("acknowledge", CanonicalType::Acknowledge),
    ("trigger", CanonicalType::Acknowledge),
    ("select one", CanonicalType::SelectOne),
    ("select1", CanonicalType::SelectOne),
    ("select one from", CanonicalType::SelectOne),
    ("add select one prompt using", CanonicalType::SelectOne),
    ("select multiple", CanonicalType::SelectMultiple),
    ("select multiple from", CanonicalType::SelectMultiple),
    ("select all that apply", CanonicalType::SelectMultiple),
    ("select all that apply from", CanonicalType::SelectMultiple),
    ("add select multiple prompt using", CanonicalType::SelectMultiple),
    ("note", CanonicalType::Note),
    ("calculate", CanonicalType::Calculate),
    ("calculation", CanonicalType::Calculate),
    ("hidden", CanonicalType::Hidden),
    ("start", CanonicalType::Start),
    ("end", CanonicalType::End),
    ("today", CanonicalType::Today),
    ("deviceid", CanonicalType::DeviceId),
    ("imei", CanonicalType::DeviceId),
    ("subscriberid", CanonicalType::SubscriberId),
    ("simserial", CanonicalType::SimSerial),
    ("phonenumber", CanonicalType::PhoneNumber),
    ("username", CanonicalType::Username),
    ("group", CanonicalType::Group),
    ("repeat", CanonicalType::Repeat),
];

static ALIAS_TABLE: LazyLock<HashMap<&'static str, CanonicalType>> =
    LazyLock::new(|| ALIASES.iter().copied().collect());

/// Normalizes a type token for table lookup.
#[must_use]
pub fn normalize(token: &str) -> String {
    token
        .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolves a bare type token (no trailing list name) to its canonical type.
///
/// # Errors
/// Returns `UnknownType` if the token is not an accepted spelling. There is no
/// fallback type.
pub fn resolve(token: &str) -> Result<CanonicalType> {
    ALIAS_TABLE
        .get(normalize(token).as_str())
        .copied()
        .ok_or_else(|| Error::unknown_type(token.trim()))
}

/// A parsed value of the survey sheet's `type` column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeToken {
    /// `begin group` or `begin repeat`.
    Begin(CanonicalType),
    /// `end group` or `end repeat`.
    End(CanonicalType),
    /// Any question type, with the list name for select types.
    Question {
        /// The resolved canonical type.
        qtype: CanonicalType,
        /// Trailing list name; `None` if a select type has none.
        list_name: Option<String>,
    },
}

impl TypeToken {
    /// Parses a full `type` cell such as `select_one colors` or `begin repeat`.
    ///
    /// # Errors
    /// Returns `UnknownType` for unknown tokens, for trailing words after a
    /// non-select type, and for more than one trailing word after a select type.
    pub fn parse(token: &str) -> Result<Self> {
        let words: Vec<&str> = token.split_whitespace().collect();
        if words.is_empty() {
            return Err(Error::unknown_type(token));
        }

        if let Some(marker) = parse_marker(&words) {
            return Ok(marker);
        }

        // Longest alias prefix wins; list names keep their original spelling.
        for split in (1..=words.len()).rev() {
            let head = normalize(&words[..split].join(" "));
            let Some(&qtype) = ALIAS_TABLE.get(head.as_str()) else {
                continue;
            };
            let tail = &words[split..];
            return match (qtype.is_select(), tail) {
                (_, []) => Ok(Self::Question {
                    qtype,
                    list_name: None,
                }),
                (true, [list]) => Ok(Self::Question {
                    qtype,
                    list_name: Some((*list).to_string()),
                }),
                _ => Err(Error::unknown_type(token.trim())),
            };
        }

        Err(Error::unknown_type(token.trim()))
    }
}

fn parse_marker(words: &[&str]) -> Option<TypeToken> {
    let normalized = normalize(&words.join(" "));
    let (verb, container) = normalized.split_once(' ')?;
    let container = match container {
        "group" => CanonicalType::Group,
        "repeat" => CanonicalType::Repeat,
        _ => return None,
    };
    match verb {
        "begin" => Some(TypeToken::Begin(container)),
        "end" => Some(TypeToken::End(container)),
        _ => None,
    }
}
