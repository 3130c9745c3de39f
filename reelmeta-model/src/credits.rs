use std::fmt;
use std::str::FromStr;

/// Canonical crew classification used for filtering and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoleCategory {
    Director,
    Writer,
    Producer,
    Composer,
    Cinematographer,
    Editor,
    /// Fallback for job titles the lookup table does not know.
    Crew,
}

impl RoleCategory {
    const ALL: [RoleCategory; 7] = [
        RoleCategory::Director,
        RoleCategory::Writer,
        RoleCategory::Producer,
        RoleCategory::Composer,
        RoleCategory::Cinematographer,
        RoleCategory::Editor,
        RoleCategory::Crew,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleCategory::Director => "Director",
            RoleCategory::Writer => "Writer",
            RoleCategory::Producer => "Producer",
            RoleCategory::Composer => "Composer",
            RoleCategory::Cinematographer => "Cinematographer",
            RoleCategory::Editor => "Editor",
            RoleCategory::Crew => "Crew",
        }
    }
}

impl fmt::Display for RoleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| format!("unknown role category: {s}"))
    }
}

/// Billed cast entry as reported by the remote source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CastMember {
    pub name: String,
    pub character: Option<String>,
    pub order: Option<u32>,
}

/// Crew entry as reported by the remote source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CrewMember {
    pub name: String,
    pub job_title: String,
    pub department: Option<String>,
}

/// Cast entry on a mapped entity.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CastCredit {
    pub name: String,
    pub character: Option<String>,
    pub sort_order: Option<u32>,
}

/// Crew entry on a mapped entity, after classification and filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CrewCredit {
    pub name: String,
    pub job_title: String,
    pub category: RoleCategory,
}
