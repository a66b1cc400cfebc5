mod filter;
mod schema;
mod sqlite;

pub use filter::{AppFilter, AppPredicate, CategorySelector};
pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Numeric apps columns that support extremes and averages. Fixed
/// variants keep caller-supplied field names out of SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    Rating,
    Price,
    Installs,
}

impl NumericField {
    pub(crate) fn column(self) -> &'static str {
        match self {
            NumericField::Rating => "rating",
            NumericField::Price => "price",
            NumericField::Installs => "installs",
        }
    }

    /// Bounds reported when the table holds no rows, so range controls
    /// in a consumer UI still get usable limits.
    #[must_use]
    pub fn empty_bounds(self) -> (f64, f64) {
        match self {
            NumericField::Rating => (0.0, 5.0),
            NumericField::Price => (0.0, 100.0),
            NumericField::Installs => (0.0, 10_000_000.0),
        }
    }
}

/// Enumerable string columns exposed through distinct-value listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringField {
    ContentRating,
    Currency,
}

impl StringField {
    pub(crate) fn column(self) -> &'static str {
        match self {
            StringField::ContentRating => "content_rating",
            StringField::Currency => "currency",
        }
    }
}

/// Date columns that year trends can be computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Released,
    LastUpdated,
}

impl DateField {
    pub(crate) fn column(self) -> &'static str {
        match self {
            DateField::Released => "released",
            DateField::LastUpdated => "last_updated",
        }
    }
}

/// Store defines the database interface.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // Category operations
    fn create_category(&self, name: &str) -> Result<Category>;
    fn get_category(&self, id: i64) -> Result<Option<Category>>;
    fn get_category_by_name(&self, name: &str) -> Result<Option<Category>>;
    fn list_categories(&self) -> Result<Vec<Category>>;
    fn update_category(&self, category: &Category) -> Result<bool>;
    fn delete_category(&self, id: i64) -> Result<bool>;
    fn count_category_apps(&self, id: i64) -> Result<i64>;

    // Developer operations
    fn create_developer(&self, name: &str, email: &str) -> Result<Developer>;
    fn get_developer(&self, id: i64) -> Result<Option<Developer>>;
    fn get_developer_by_email(&self, email: &str) -> Result<Option<Developer>>;
    fn list_developers(&self) -> Result<Vec<Developer>>;
    fn update_developer(&self, developer: &Developer) -> Result<bool>;
    fn delete_developer(&self, id: i64) -> Result<bool>;
    fn count_developer_apps(&self, id: i64) -> Result<i64>;

    // App operations. Create ignores the incoming id and returns the
    // row with its generated identity; update is a full-row replace.
    fn create_app(&self, app: &App) -> Result<App>;
    fn get_app(&self, id: i64) -> Result<Option<App>>;
    fn get_app_by_app_id(&self, app_id: &str) -> Result<Option<App>>;
    fn update_app(&self, app: &App) -> Result<bool>;
    fn delete_app(&self, id: i64) -> Result<bool>;

    // Query operations over the apps table
    fn count_apps(&self, filter: &AppFilter) -> Result<i64>;
    fn list_apps(&self, filter: &AppFilter, limit: i64, offset: i64) -> Result<Vec<App>>;
    fn distinct_strings(&self, field: StringField) -> Result<Vec<String>>;
    fn extremes(&self, field: NumericField) -> Result<(f64, f64)>;
    fn rating_histogram(&self, filter: &AppFilter) -> Result<Vec<RatingBucket>>;
    fn year_trend(&self, filter: &AppFilter, field: DateField) -> Result<Vec<YearCount>>;
    fn average(&self, filter: &AppFilter, field: NumericField) -> Result<Option<f64>>;

    fn close(&self) -> Result<()>;
}
