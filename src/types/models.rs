use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Developer {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// One app-store listing record. Bulk rows arrive through an external
/// ingestion process; `scraped_time` records when a row was ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct App {
    pub id: i64,
    pub app_id: String,
    pub app_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installs: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_installs: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_installs: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_android: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub released: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ad_supported: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_app_purchases: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editors_choice: Option<bool>,
    #[serde(
        with = "opt_timestamp",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub scraped_time: Option<NaiveDateTime>,
}

/// One bar of the rating histogram: a rating value (rounded to one
/// decimal for grouping) and the number of matching rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingBucket {
    pub rating: f64,
    pub count: i64,
}

/// One point of a release/update trend: a calendar year and the number
/// of matching rows in that year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearCount {
    pub year: i32,
    pub count: i64,
}

/// Timestamps serialize as "YYYY-MM-DD HH:MM:SS", the format the
/// ingestion process writes.
mod opt_timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(ts) => serializer.serialize_some(&ts.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom))
            .transpose()
    }
}
