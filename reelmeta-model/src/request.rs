use std::fmt;

use crate::ids::RemoteId;

/// Kind of remote record a lookup targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RecordKind {
    Person,
    /// Seasons are addressed through their parent series id.
    Season,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Person => "person",
            RecordKind::Season => "season",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Partial, caller-owned description of the item being enriched.
///
/// `existing_remote_id` is kept raw because hosts store provider ids as
/// loosely validated values; the resolver decides whether it is usable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LookupRequest {
    pub display_name: String,
    pub existing_remote_id: Option<i64>,
    pub is_automated: bool,
    pub preferred_locale: String,
}

impl LookupRequest {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            ..Self::default()
        }
    }

    pub fn with_remote_id(mut self, id: i64) -> Self {
        self.existing_remote_id = Some(id);
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.preferred_locale = locale.into();
        self
    }

    pub fn automated(mut self, is_automated: bool) -> Self {
        self.is_automated = is_automated;
        self
    }

    /// The existing id, if it is present and positive.
    pub fn known_remote_id(&self) -> Option<RemoteId> {
        self.existing_remote_id.and_then(RemoteId::from_signed)
    }

    /// Preferred locale, or `None` when unset or blank.
    pub fn locale(&self) -> Option<&str> {
        let trimmed = self.preferred_locale.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}
