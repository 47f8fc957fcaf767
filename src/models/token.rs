//! Canonical typed token and the codec that produces it from storage rows.
//!
//! Storage hands back loosely typed columns; nothing outside this module and
//! the entity definition is allowed to see a raw row. Every repository read
//! path converts through [`Token::try_from`] so callers only ever deal with
//! the strongly typed form.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::tokens;

/// Errors raised while coercing a raw storage row into a [`Token`].
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Unknown target type: {0}")]
    UnknownTargetType(String),

    #[error("Unknown extended action: {0}")]
    UnknownExtendedAction(String),

    #[error("Negative counter in column {0}")]
    NegativeCounter(&'static str),
}

/// What the token's `target_id` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    None,
    User,
}

impl TargetType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::User => "user",
        }
    }
}

impl Default for TargetType {
    fn default() -> Self {
        Self::None
    }
}

impl std::str::FromStr for TargetType {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" | "" => Ok(Self::None),
            "user" => Ok(Self::User),
            other => Err(CodecError::UnknownTargetType(other.to_string())),
        }
    }
}

/// Side effect performed after a successful activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtendedAction {
    None,
    Redirect,
    Group,
    Cohort,
    Course,
}

impl ExtendedAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Redirect => "redirect",
            Self::Group => "group",
            Self::Cohort => "cohort",
            Self::Course => "course",
        }
    }
}

impl std::str::FromStr for ExtendedAction {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" | "" => Ok(Self::None),
            "redirect" => Ok(Self::Redirect),
            "group" => Ok(Self::Group),
            "cohort" => Ok(Self::Cohort),
            "course" => Ok(Self::Course),
            other => Err(CodecError::UnknownExtendedAction(other.to_string())),
        }
    }
}

/// Canonical token entity.
///
/// All timestamps are unix seconds. `scope` only ever grows, and only
/// through the activation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: i32,
    pub token: String,
    pub enabled: bool,
    pub target_type: TargetType,
    pub target_id: i64,
    pub scope: i64,
    pub limited: i64,
    pub time_created: i64,
    pub time_modified: i64,
    pub time_last_use: Option<i64>,
    pub time_limited: i64,
    pub extended_action: ExtendedAction,
    pub extended_options: String,
}

impl Token {
    /// Whether the usage limit still allows another activation.
    #[must_use]
    pub const fn has_uses_left(&self) -> bool {
        self.limited == 0 || self.scope < self.limited
    }

    /// Whether the token has expired at `now`. Expiry is a duration from
    /// creation, never an absolute timestamp.
    #[must_use]
    pub const fn is_expired(&self, now: i64) -> bool {
        self.time_limited != 0 && self.time_created + self.time_limited <= now
    }
}

impl TryFrom<tokens::Model> for Token {
    type Error = CodecError;

    fn try_from(row: tokens::Model) -> Result<Self, Self::Error> {
        if row.scope < 0 {
            return Err(CodecError::NegativeCounter("scope"));
        }
        if row.limited < 0 {
            return Err(CodecError::NegativeCounter("limited"));
        }
        if row.time_limited < 0 {
            return Err(CodecError::NegativeCounter("time_limited"));
        }

        Ok(Self {
            id: row.id,
            token: row.token,
            enabled: row.enabled != 0,
            target_type: row.target_type.parse()?,
            target_id: row.target_id,
            scope: row.scope,
            limited: row.limited,
            time_created: row.time_created,
            time_modified: row.time_modified,
            time_last_use: row.time_last_use.filter(|t| *t != 0),
            time_limited: row.time_limited,
            extended_action: row.extended_action.parse()?,
            extended_options: row.extended_options,
        })
    }
}

/// Fields accepted when creating a token. Everything optional is defaulted
/// the way the admin editor defaults it: random 12-character secret,
/// disabled, no target, no action, unlimited.
#[derive(Debug, Clone, Default)]
pub struct NewToken {
    pub token: Option<String>,
    pub enabled: bool,
    pub target_type: TargetType,
    pub target_id: Option<i64>,
    pub limited: i64,
    pub time_limited: i64,
    /// Action and its parameter are set as a pair or not at all.
    pub action: Option<(ExtendedAction, String)>,
}

/// Partial administrative update. `None` fields are left untouched.
/// `id`, `time_created` and `scope` are never updatable.
#[derive(Debug, Clone, Default)]
pub struct TokenPatch {
    pub token: Option<String>,
    pub enabled: Option<bool>,
    pub target_type: Option<TargetType>,
    pub target_id: Option<i64>,
    pub limited: Option<i64>,
    pub time_limited: Option<i64>,
    pub action: Option<(ExtendedAction, String)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_row() -> tokens::Model {
        tokens::Model {
            id: 7,
            token: "abc123".to_string(),
            enabled: 1,
            target_type: "user".to_string(),
            target_id: 42,
            scope: 3,
            limited: 5,
            time_created: 1_700_000_000,
            time_modified: 1_700_000_100,
            time_last_use: Some(1_700_000_100),
            time_limited: 0,
            extended_action: "redirect".to_string(),
            extended_options: "https://example.org/welcome".to_string(),
        }
    }

    #[test]
    fn coerces_loose_columns() {
        let token = Token::try_from(raw_row()).unwrap();
        assert!(token.enabled);
        assert_eq!(token.target_type, TargetType::User);
        assert_eq!(token.extended_action, ExtendedAction::Redirect);
        assert_eq!(token.time_last_use, Some(1_700_000_100));
    }

    #[test]
    fn rejects_unknown_discriminants() {
        let mut row = raw_row();
        row.target_type = "course".to_string();
        assert!(matches!(
            Token::try_from(row),
            Err(CodecError::UnknownTargetType(_))
        ));

        let mut row = raw_row();
        row.extended_action = "enrol".to_string();
        assert!(matches!(
            Token::try_from(row),
            Err(CodecError::UnknownExtendedAction(_))
        ));
    }

    #[test]
    fn rejects_negative_counters() {
        let mut row = raw_row();
        row.scope = -1;
        assert!(matches!(
            Token::try_from(row),
            Err(CodecError::NegativeCounter("scope"))
        ));
    }

    #[test]
    fn empty_strings_default_to_none_variants() {
        let mut row = raw_row();
        row.target_type = String::new();
        row.extended_action = String::new();
        let token = Token::try_from(row).unwrap();
        assert_eq!(token.target_type, TargetType::None);
        assert_eq!(token.extended_action, ExtendedAction::None);
    }

    #[test]
    fn usage_and_expiry_predicates() {
        let mut token = Token::try_from(raw_row()).unwrap();
        assert!(token.has_uses_left());
        token.scope = 5;
        assert!(!token.has_uses_left());
        token.limited = 0;
        assert!(token.has_uses_left());

        token.time_limited = 60;
        assert!(!token.is_expired(token.time_created + 59));
        assert!(token.is_expired(token.time_created + 60));
    }
}
