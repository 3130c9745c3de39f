use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

/// Identifier of a record on the remote metadata source.
///
/// Always positive. Absence is expressed as `Option<RemoteId>`, never as a
/// zero id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RemoteId(NonZeroU64);

impl RemoteId {
    /// Returns `None` for zero.
    pub const fn new(raw: u64) -> Option<Self> {
        match NonZeroU64::new(raw) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    /// Accepts only strictly positive values.
    pub fn from_signed(raw: i64) -> Option<Self> {
        u64::try_from(raw).ok().and_then(Self::new)
    }

    /// Lenient parse of a caller-supplied provider id string. Blank,
    /// non-numeric, zero and negative inputs all yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<i64>().ok().and_then(Self::from_signed)
    }

    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RemoteId {
    type Err = InvalidRemoteId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| InvalidRemoteId(s.to_string()))
    }
}

impl From<RemoteId> for u64 {
    fn from(id: RemoteId) -> Self {
        id.get()
    }
}

/// Raised when a string cannot be turned into a positive remote id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRemoteId(pub String);

impl fmt::Display for InvalidRemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid remote id: {:?}", self.0)
    }
}

impl std::error::Error for InvalidRemoteId {}
