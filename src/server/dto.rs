use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::store::AppFilter;
use crate::types::App;

/// Query parameters for the paged apps listing: every filter key plus
/// pagination. Kept flat (rather than flattening an AppFilter in) so
/// the urlencoded deserializer sees typed fields directly.
#[derive(Debug, Default, Deserialize)]
pub struct AppQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub min_rating: Option<f64>,
    #[serde(default)]
    pub max_rating: Option<f64>,
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub min_installs: Option<i64>,
    #[serde(default)]
    pub max_installs: Option<i64>,
    #[serde(default)]
    pub content_rating: Option<String>,
    #[serde(default)]
    pub free: Option<bool>,
    #[serde(default)]
    pub ad_supported: Option<bool>,
    #[serde(default)]
    pub in_app_purchases: Option<bool>,
    #[serde(default)]
    pub editors_choice: Option<bool>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

impl AppQuery {
    #[must_use]
    pub fn filter(&self) -> AppFilter {
        AppFilter {
            category: self.category.clone(),
            min_rating: self.min_rating,
            max_rating: self.max_rating,
            min_price: self.min_price,
            max_price: self.max_price,
            min_installs: self.min_installs,
            max_installs: self.max_installs,
            content_rating: self.content_rating.clone(),
            free: self.free,
            ad_supported: self.ad_supported,
            in_app_purchases: self.in_app_purchases,
            editors_choice: self.editors_choice,
        }
    }
}

/// Query parameters for the trend and average endpoints, which scope by
/// category only.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryScope {
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AppPage {
    pub apps: Vec<App>,
    pub total_apps: i64,
    pub total_pages: i64,
    pub current_page: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterBounds {
    pub categories: Vec<String>,
    pub content_ratings: Vec<String>,
    pub min_rating: f64,
    pub max_rating: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub min_installs: i64,
    pub max_installs: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AverageRating {
    pub category: String,
    pub average_rating: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateDeveloperRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDeveloperRequest {
    pub name: String,
    pub email: String,
}

/// Full app payload for create and replace. Identity comes from the
/// path (update) or is generated (create); `scraped_time` is set by the
/// ingestion process and accepted as-is when supplied.
#[derive(Debug, Deserialize)]
pub struct AppRequest {
    pub app_id: String,
    pub app_name: String,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub developer_id: Option<i64>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub rating_count: Option<i64>,
    #[serde(default)]
    pub installs: Option<i64>,
    #[serde(default)]
    pub min_installs: Option<i64>,
    #[serde(default)]
    pub max_installs: Option<i64>,
    #[serde(default)]
    pub free: Option<bool>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub size: Option<f64>,
    #[serde(default)]
    pub min_android: Option<String>,
    #[serde(default)]
    pub released: Option<NaiveDate>,
    #[serde(default)]
    pub last_updated: Option<NaiveDate>,
    #[serde(default)]
    pub content_rating: Option<String>,
    #[serde(default)]
    pub ad_supported: Option<bool>,
    #[serde(default)]
    pub in_app_purchases: Option<bool>,
    #[serde(default)]
    pub editors_choice: Option<bool>,
    #[serde(default, with = "scraped_time_format")]
    pub scraped_time: Option<NaiveDateTime>,
}

impl AppRequest {
    /// The row this payload describes, under the given identity.
    #[must_use]
    pub fn into_app(self, id: i64) -> App {
        App {
            id,
            app_id: self.app_id,
            app_name: self.app_name,
            category_id: self.category_id,
            developer_id: self.developer_id,
            rating: self.rating,
            rating_count: self.rating_count,
            installs: self.installs,
            min_installs: self.min_installs,
            max_installs: self.max_installs,
            free: self.free,
            price: self.price,
            currency: self.currency,
            size: self.size,
            min_android: self.min_android,
            released: self.released,
            last_updated: self.last_updated,
            content_rating: self.content_rating,
            ad_supported: self.ad_supported,
            in_app_purchases: self.in_app_purchases,
            editors_choice: self.editors_choice,
            scraped_time: self.scraped_time,
        }
    }
}

mod scraped_time_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom))
            .transpose()
    }
}
