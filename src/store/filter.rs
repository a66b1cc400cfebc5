use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

/// Optional filter inputs for queries over the apps table. Every field
/// defaults to "no constraint"; boolean fields are tri-state, so an
/// explicit `false` composes an equality clause rather than being
/// dropped as "unset".
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_installs: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_installs: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ad_supported: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_app_purchases: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editors_choice: Option<bool>,
}

impl AppFilter {
    /// A filter scoped to a single category name, every other field
    /// unconstrained. The shape used by the trend and average lookups.
    #[must_use]
    pub fn for_category(category: Option<String>) -> Self {
        Self {
            category,
            ..Self::default()
        }
    }

    /// Compile into a predicate, given the outcome of resolving
    /// `category` against the categories table. The caller performs the
    /// lookup; this stays a pure function of its inputs.
    #[must_use]
    pub fn compile(&self, category: CategorySelector) -> AppPredicate {
        let id = match category {
            // A category name that resolves to nothing narrows the
            // result to empty, never to "all rows".
            CategorySelector::Unmatched => return AppPredicate::match_none(),
            CategorySelector::Id(id) => Some(id),
            CategorySelector::Any => None,
        };

        let mut clauses = Vec::new();
        if let Some(id) = id {
            clauses.push(Clause::CategoryIs(id));
        }
        if let Some(v) = self.min_rating {
            clauses.push(Clause::RatingAtLeast(v));
        }
        if let Some(v) = self.max_rating {
            clauses.push(Clause::RatingAtMost(v));
        }
        if let Some(v) = self.min_price {
            clauses.push(Clause::PriceAtLeast(v));
        }
        if let Some(v) = self.max_price {
            clauses.push(Clause::PriceAtMost(v));
        }
        if let Some(v) = self.min_installs {
            clauses.push(Clause::InstallsAtLeast(v));
        }
        if let Some(v) = self.max_installs {
            clauses.push(Clause::InstallsAtMost(v));
        }
        if let Some(ref v) = self.content_rating {
            clauses.push(Clause::ContentRatingIs(v.clone()));
        }
        if let Some(v) = self.free {
            clauses.push(Clause::FreeIs(v));
        }
        if let Some(v) = self.ad_supported {
            clauses.push(Clause::AdSupportedIs(v));
        }
        if let Some(v) = self.in_app_purchases {
            clauses.push(Clause::InAppPurchasesIs(v));
        }
        if let Some(v) = self.editors_choice {
            clauses.push(Clause::EditorsChoiceIs(v));
        }

        AppPredicate {
            clauses,
            matches_nothing: false,
        }
    }
}

/// Outcome of resolving an optional category name to an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategorySelector {
    /// No category filter was requested.
    Any,
    /// The requested name resolved to this category.
    Id(i64),
    /// The requested name matches no category.
    Unmatched,
}

/// One typed condition over an apps column. Each clause owns its bind
/// value and maps to a fixed SQL fragment with a single placeholder, so
/// no filter input is ever interpolated into SQL text.
#[derive(Debug, Clone, PartialEq)]
enum Clause {
    CategoryIs(i64),
    RatingAtLeast(f64),
    RatingAtMost(f64),
    PriceAtLeast(f64),
    PriceAtMost(f64),
    InstallsAtLeast(i64),
    InstallsAtMost(i64),
    ContentRatingIs(String),
    FreeIs(bool),
    AdSupportedIs(bool),
    InAppPurchasesIs(bool),
    EditorsChoiceIs(bool),
}

impl Clause {
    fn sql(&self) -> &'static str {
        match self {
            Clause::CategoryIs(_) => "category_id = ?",
            Clause::RatingAtLeast(_) => "rating >= ?",
            Clause::RatingAtMost(_) => "rating <= ?",
            Clause::PriceAtLeast(_) => "price >= ?",
            Clause::PriceAtMost(_) => "price <= ?",
            Clause::InstallsAtLeast(_) => "installs >= ?",
            Clause::InstallsAtMost(_) => "installs <= ?",
            Clause::ContentRatingIs(_) => "content_rating = ?",
            Clause::FreeIs(_) => "free = ?",
            Clause::AdSupportedIs(_) => "ad_supported = ?",
            Clause::InAppPurchasesIs(_) => "in_app_purchases = ?",
            Clause::EditorsChoiceIs(_) => "editors_choice = ?",
        }
    }

    fn bind(&self) -> Value {
        match self {
            Clause::CategoryIs(v) | Clause::InstallsAtLeast(v) | Clause::InstallsAtMost(v) => {
                Value::Integer(*v)
            }
            Clause::RatingAtLeast(v)
            | Clause::RatingAtMost(v)
            | Clause::PriceAtLeast(v)
            | Clause::PriceAtMost(v) => Value::Real(*v),
            Clause::ContentRatingIs(v) => Value::Text(v.clone()),
            Clause::FreeIs(v)
            | Clause::AdSupportedIs(v)
            | Clause::InAppPurchasesIs(v)
            | Clause::EditorsChoiceIs(v) => Value::Integer(i64::from(*v)),
        }
    }
}

/// A composed predicate over the apps table: the AND of all present
/// clauses, or a predicate matching nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct AppPredicate {
    clauses: Vec<Clause>,
    matches_nothing: bool,
}

impl AppPredicate {
    /// The identity predicate: matches every row.
    #[must_use]
    pub fn match_all() -> Self {
        Self {
            clauses: Vec::new(),
            matches_nothing: false,
        }
    }

    /// A predicate that matches no row, regardless of table contents.
    #[must_use]
    pub fn match_none() -> Self {
        Self {
            clauses: Vec::new(),
            matches_nothing: true,
        }
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        !self.matches_nothing && self.clauses.is_empty()
    }

    /// The conjunction of all clauses without the WHERE keyword, or
    /// `None` for the identity predicate.
    #[must_use]
    pub fn condition_sql(&self) -> Option<String> {
        if self.matches_nothing {
            return Some("0 = 1".to_string());
        }
        if self.clauses.is_empty() {
            return None;
        }
        Some(
            self.clauses
                .iter()
                .map(Clause::sql)
                .collect::<Vec<_>>()
                .join(" AND "),
        )
    }

    /// A leading-space WHERE clause ready to append to a query, empty
    /// for the identity predicate.
    #[must_use]
    pub fn where_sql(&self) -> String {
        match self.condition_sql() {
            Some(cond) => format!(" WHERE {cond}"),
            None => String::new(),
        }
    }

    /// Bind values in clause order, matching the placeholders of
    /// `condition_sql`.
    #[must_use]
    pub fn params(&self) -> Vec<Value> {
        if self.matches_nothing {
            return Vec::new();
        }
        self.clauses.iter().map(Clause::bind).collect()
    }
}
