use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::server::dto::{AppPage, AverageRating, FilterBounds};
use crate::store::AppFilter;
use crate::types::{App, Category, Developer, RatingBucket, YearCount};

/// Blocking client for the catalog API, for dashboard processes and
/// scripts. Unwraps the `{data, error}` envelope every endpoint speaks.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub error: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn get<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let url = format!("{}/api/v1{}", self.base_url, path);
        let resp = self.client.get(&url).send()?;
        self.handle_response(resp)
    }

    pub fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> anyhow::Result<T> {
        let url = format!("{}/api/v1{}", self.base_url, path);
        let resp = self.client.get(&url).query(query).send()?;
        self.handle_response(resp)
    }

    pub fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> anyhow::Result<T> {
        let url = format!("{}/api/v1{}", self.base_url, path);
        let resp = self.client.post(&url).json(body).send()?;
        self.handle_response(resp)
    }

    pub fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> anyhow::Result<T> {
        let url = format!("{}/api/v1{}", self.base_url, path);
        let resp = self.client.put(&url).json(body).send()?;
        self.handle_response(resp)
    }

    pub fn delete(&self, path: &str) -> anyhow::Result<()> {
        let url = format!("{}/api/v1{}", self.base_url, path);
        let resp = self.client.delete(&url).send()?;
        if resp.status().is_success() {
            Ok(())
        } else {
            let api_resp: ApiResponse<()> = resp.json()?;
            Err(anyhow::anyhow!(api_resp.error.unwrap_or_else(|| {
                "Server error (no details provided)".into()
            })))
        }
    }

    fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::blocking::Response,
    ) -> anyhow::Result<T> {
        if resp.status().is_success() {
            let api_resp: ApiResponse<T> = resp.json()?;
            api_resp
                .data
                .ok_or_else(|| anyhow::anyhow!("Server returned an empty response"))
        } else {
            let api_resp: ApiResponse<()> = resp.json()?;
            Err(anyhow::anyhow!(api_resp.error.unwrap_or_else(|| {
                "Server error (no details provided)".into()
            })))
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn fetch_filters(&self) -> anyhow::Result<FilterBounds> {
        self.get("/filters")
    }

    pub fn fetch_apps(
        &self,
        filter: &AppFilter,
        page: u32,
        per_page: u32,
    ) -> anyhow::Result<AppPage> {
        let url = format!("{}/api/v1/apps", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(filter)
            .query(&[("page", page), ("per_page", per_page)])
            .send()?;
        self.handle_response(resp)
    }

    pub fn fetch_rating_distribution(
        &self,
        filter: &AppFilter,
    ) -> anyhow::Result<Vec<RatingBucket>> {
        self.get_with_query("/apps/rating_distribution", filter)
    }

    pub fn fetch_release_trend(&self, category: Option<&str>) -> anyhow::Result<Vec<YearCount>> {
        self.get_with_query("/apps/release_trend", &category_query(category))
    }

    pub fn fetch_update_trend(&self, category: Option<&str>) -> anyhow::Result<Vec<YearCount>> {
        self.get_with_query("/apps/update_trend", &category_query(category))
    }

    pub fn fetch_average_rating(&self, category: Option<&str>) -> anyhow::Result<AverageRating> {
        self.get_with_query("/apps/average_rating", &category_query(category))
    }

    pub fn fetch_categories(&self) -> anyhow::Result<Vec<Category>> {
        self.get("/categories")
    }

    pub fn create_category(&self, name: &str) -> anyhow::Result<Category> {
        self.post("/categories", &serde_json::json!({ "name": name }))
    }

    pub fn update_category(&self, id: i64, name: &str) -> anyhow::Result<Category> {
        self.put(
            &format!("/categories/{id}"),
            &serde_json::json!({ "name": name }),
        )
    }

    pub fn delete_category(&self, id: i64) -> anyhow::Result<()> {
        self.delete(&format!("/categories/{id}"))
    }

    pub fn fetch_developers(&self) -> anyhow::Result<Vec<Developer>> {
        self.get("/developers")
    }

    pub fn create_developer(&self, name: &str, email: &str) -> anyhow::Result<Developer> {
        self.post(
            "/developers",
            &serde_json::json!({ "name": name, "email": email }),
        )
    }

    pub fn update_developer(&self, id: i64, name: &str, email: &str) -> anyhow::Result<Developer> {
        self.put(
            &format!("/developers/{id}"),
            &serde_json::json!({ "name": name, "email": email }),
        )
    }

    pub fn delete_developer(&self, id: i64) -> anyhow::Result<()> {
        self.delete(&format!("/developers/{id}"))
    }

    /// The app's `id` field is ignored server-side; the stored row with
    /// its generated identity comes back.
    pub fn create_app(&self, app: &App) -> anyhow::Result<App> {
        self.post("/apps", app)
    }

    pub fn fetch_app(&self, id: i64) -> anyhow::Result<App> {
        self.get(&format!("/apps/{id}"))
    }

    pub fn update_app(&self, id: i64, app: &App) -> anyhow::Result<App> {
        self.put(&format!("/apps/{id}"), app)
    }

    pub fn delete_app(&self, id: i64) -> anyhow::Result<()> {
        self.delete(&format!("/apps/{id}"))
    }
}

fn category_query(category: Option<&str>) -> Vec<(&'static str, String)> {
    match category {
        Some(name) => vec![("category", name.to_string())],
        None => Vec::new(),
    }
}
