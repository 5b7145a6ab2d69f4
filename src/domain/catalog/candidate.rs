//! Candidate merchandising directions and the static catalog.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Season;

/// Product category a request or candidate belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Top,
    Pants,
    Outer,
    Set,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Top => "top",
            Category::Pants => "pants",
            Category::Outer => "outer",
            Category::Set => "set",
        };
        write!(f, "{}", s)
    }
}

/// Growth stage of the seller account.
///
/// `Explore` accounts are still testing directions; `Converge` accounts are
/// doubling down on what already works.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStage {
    Explore,
    Converge,
}

impl fmt::Display for AccountStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AccountStage::Explore => "explore",
            AccountStage::Converge => "converge",
        };
        write!(f, "{}", s)
    }
}

/// Risk attribute attached to a candidate in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTag {
    ReturnRisk,
    Homogeneous,
    SeasonMismatch,
}

/// A merchandising direction the engine can recommend.
///
/// Candidates are immutable configuration; the catalog is the only candidate
/// source in the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub label: String,
    pub categories: Vec<Category>,
    pub price_mid: i64,
    pub season: Season,
    pub stage_fit: AccountStage,
    pub risk_tags: Vec<RiskTag>,
}

impl Candidate {
    pub fn new(
        label: impl Into<String>,
        categories: Vec<Category>,
        price_mid: i64,
        season: Season,
        stage_fit: AccountStage,
        risk_tags: Vec<RiskTag>,
    ) -> Self {
        Self {
            label: label.into(),
            categories,
            price_mid,
            season,
            stage_fit,
            risk_tags,
        }
    }

    /// Whether this candidate belongs to the given category.
    pub fn matches_category(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }

    /// Whether this candidate carries the given risk tag.
    pub fn has_risk(&self, tag: RiskTag) -> bool {
        self.risk_tags.contains(&tag)
    }
}

static CATALOG: Lazy<Vec<Candidate>> = Lazy::new(|| {
    use AccountStage::{Converge, Explore};
    use Category::{Outer, Pants, Set, Top};
    use RiskTag::{Homogeneous, ReturnRisk, SeasonMismatch};
    use Season::{Spring, Winter};

    vec![
        Candidate::new("basic short-sleeve tee", vec![Top], 69, Spring, Explore, vec![Homogeneous]),
        Candidate::new("slim knit top", vec![Top], 119, Spring, Converge, vec![ReturnRisk]),
        Candidate::new("wide-leg casual pants", vec![Pants], 129, Spring, Explore, vec![]),
        Candidate::new("straight-cut jeans", vec![Pants], 159, Spring, Converge, vec![Homogeneous]),
        Candidate::new("cropped trench coat", vec![Outer], 199, Spring, Converge, vec![]),
        Candidate::new("lightweight baseball jacket", vec![Outer], 169, Spring, Explore, vec![]),
        Candidate::new("knit two-piece set", vec![Set], 199, Spring, Converge, vec![ReturnRisk]),
        Candidate::new("athleisure set", vec![Set], 159, Spring, Explore, vec![Homogeneous]),
        Candidate::new("slim long-sleeve base layer", vec![Top], 79, Spring, Explore, vec![]),
        Candidate::new("fleece-lined hoodie", vec![Top], 129, Winter, Explore, vec![SeasonMismatch]),
        Candidate::new("light down vest", vec![Outer], 239, Winter, Converge, vec![SeasonMismatch]),
        Candidate::new("high-waist A-line skirt", vec![Pants], 119, Spring, Explore, vec![]),
    ]
});

/// The static candidate catalog shared by all requests.
pub fn catalog() -> &'static [Candidate] {
    &CATALOG
}
