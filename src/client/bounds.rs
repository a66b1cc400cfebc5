use super::ApiClient;
use crate::server::dto::FilterBounds;

/// Session-scoped cache of the `/filters` snapshot a dashboard uses to
/// seed its range controls. Held and passed explicitly by the caller;
/// invalidation is an explicit call, after which the next `get`
/// refetches.
#[derive(Default)]
pub struct FilterBoundsCache {
    bounds: Option<FilterBounds>,
}

impl FilterBoundsCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached snapshot, fetching it first if none is held.
    pub fn get(&mut self, client: &ApiClient) -> anyhow::Result<&FilterBounds> {
        match self.bounds {
            Some(ref bounds) => Ok(bounds),
            None => {
                let fetched = client.fetch_filters()?;
                Ok(self.bounds.insert(fetched))
            }
        }
    }

    /// Drop the cached snapshot so the next `get` refetches, e.g. after
    /// a write that changes the category vocabulary.
    pub fn invalidate(&mut self) {
        self.bounds = None;
    }

    #[must_use]
    pub fn is_cached(&self) -> bool {
        self.bounds.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalidate_clears_the_snapshot() {
        let mut cache = FilterBoundsCache::new();
        assert!(!cache.is_cached());

        cache.bounds = Some(FilterBounds {
            categories: vec!["Games".to_string()],
            content_ratings: vec!["Everyone".to_string()],
            min_rating: 0.0,
            max_rating: 5.0,
            min_price: 0.0,
            max_price: 100.0,
            min_installs: 0,
            max_installs: 10_000_000,
        });
        assert!(cache.is_cached());

        cache.invalidate();
        assert!(!cache.is_cached());
    }
}
