use std::collections::{BTreeMap, HashMap, HashSet};

use once_cell::sync::Lazy;
use reelmeta_model::{CastCredit, CastMember, CrewCredit, CrewMember, RoleCategory};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_CAST: usize = 15;

const DEFAULT_JOB_TITLES: &[(&str, RoleCategory)] = &[
    ("director", RoleCategory::Director),
    ("series director", RoleCategory::Director),
    ("co-director", RoleCategory::Director),
    ("writer", RoleCategory::Writer),
    ("screenplay", RoleCategory::Writer),
    ("teleplay", RoleCategory::Writer),
    ("story", RoleCategory::Writer),
    ("novel", RoleCategory::Writer),
    ("author", RoleCategory::Writer),
    ("characters", RoleCategory::Writer),
    ("creator", RoleCategory::Writer),
    ("producer", RoleCategory::Producer),
    ("executive producer", RoleCategory::Producer),
    ("co-producer", RoleCategory::Producer),
    ("associate producer", RoleCategory::Producer),
    ("co-executive producer", RoleCategory::Producer),
    ("supervising producer", RoleCategory::Producer),
    ("line producer", RoleCategory::Producer),
    ("consulting producer", RoleCategory::Producer),
    ("original music composer", RoleCategory::Composer),
    ("music", RoleCategory::Composer),
    ("composer", RoleCategory::Composer),
    ("director of photography", RoleCategory::Cinematographer),
    ("cinematography", RoleCategory::Cinematographer),
    ("cinematographer", RoleCategory::Cinematographer),
    ("editor", RoleCategory::Editor),
];

fn default_max_cast() -> usize {
    DEFAULT_MAX_CAST
}

fn default_wanted() -> Vec<String> {
    [RoleCategory::Director, RoleCategory::Writer, RoleCategory::Producer]
        .iter()
        .map(|category| category.as_str().to_string())
        .collect()
}

/// Which credits make it onto a mapped entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreditsPolicy {
    #[serde(default = "default_max_cast")]
    pub max_cast: usize,
    /// Category names or raw job titles to keep, compared case-insensitively.
    #[serde(default = "default_wanted")]
    pub wanted: Vec<String>,
    /// Extra job title mappings, layered over the built-in table.
    pub job_titles: BTreeMap<String, RoleCategory>,
}

impl Default for CreditsPolicy {
    fn default() -> Self {
        Self {
            max_cast: default_max_cast(),
            wanted: default_wanted(),
            job_titles: BTreeMap::new(),
        }
    }
}

static BUILTIN: Lazy<RoleClassifier> =
    Lazy::new(|| RoleClassifier::new(&CreditsPolicy::default()));

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Maps crew job titles to [`RoleCategory`] and applies the credits policy.
///
/// Immutable after construction; share it freely across calls.
#[derive(Debug, Clone)]
pub struct RoleClassifier {
    job_titles: HashMap<String, RoleCategory>,
    wanted: HashSet<String>,
    max_cast: usize,
}

impl RoleClassifier {
    pub fn new(policy: &CreditsPolicy) -> Self {
        let mut job_titles: HashMap<String, RoleCategory> = DEFAULT_JOB_TITLES
            .iter()
            .map(|(title, category)| ((*title).to_string(), *category))
            .collect();
        for (title, category) in &policy.job_titles {
            job_titles.insert(normalize(title), *category);
        }

        Self::with_table(job_titles, &policy.wanted, policy.max_cast)
    }

    /// Build from an explicit table, ignoring the built-in titles.
    pub fn with_table<I, S>(job_titles: I, wanted: &[S], max_cast: usize) -> Self
    where
        I: IntoIterator<Item = (String, RoleCategory)>,
        S: AsRef<str>,
    {
        Self {
            job_titles: job_titles
                .into_iter()
                .map(|(title, category)| (normalize(&title), category))
                .collect(),
            wanted: wanted
                .iter()
                .map(|value| normalize(value.as_ref()))
                .filter(|value| !value.is_empty())
                .collect(),
            max_cast,
        }
    }

    /// Classifier for the default policy.
    pub fn builtin() -> &'static RoleClassifier {
        &BUILTIN
    }

    pub fn max_cast(&self) -> usize {
        self.max_cast
    }

    /// Category for a raw job title. Unknown titles fall back to `Crew`.
    pub fn category_for(&self, job_title: &str) -> RoleCategory {
        self.job_titles
            .get(&normalize(job_title))
            .copied()
            .unwrap_or(RoleCategory::Crew)
    }

    /// `Some(category)` when the crew member passes the allow-list,
    /// `None` when it is excluded.
    pub fn classify(&self, member: &CrewMember) -> Option<RoleCategory> {
        let category = self.category_for(&member.job_title);
        let title_wanted = self.wanted.contains(&normalize(&member.job_title));
        let category_wanted = self.wanted.contains(&normalize(category.as_str()));

        (title_wanted || category_wanted).then_some(category)
    }

    /// Cast in billing order, unbilled entries last, capped at `max_cast`.
    pub fn build_cast(&self, mut cast: Vec<CastMember>) -> Vec<CastCredit> {
        cast.sort_by_key(|member| (member.order.is_none(), member.order));
        cast.into_iter()
            .take(self.max_cast)
            .map(|member| CastCredit {
                name: member.name.trim().to_string(),
                character: member.character,
                sort_order: member.order,
            })
            .collect()
    }

    /// Allow-listed crew in source order.
    pub fn build_crew(&self, crew: Vec<CrewMember>) -> Vec<CrewCredit> {
        crew.into_iter()
            .filter_map(|member| {
                let category = self.classify(&member)?;
                Some(CrewCredit {
                    name: member.name.trim().to_string(),
                    job_title: member.job_title,
                    category,
                })
            })
            .collect()
    }
}
