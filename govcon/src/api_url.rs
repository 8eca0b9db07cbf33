use std::env;

use crate::domain::QueryFilter;

pub const DEFAULT_API_URL: &str = "http://localhost:5154";
pub const API_URL_ENV: &str = "GOVCON_API_URL";

#[derive(Debug, Clone)]
pub struct ApiUrl(String);

impl AsRef<str> for ApiUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ApiUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl ApiUrl {
    pub fn new(base: impl Into<String>) -> Self {
        Self(base.into().trim_end_matches('/').to_string())
    }

    /// Reads the base URL from `GOVCON_API_URL`, falling back to the local backend.
    pub fn from_env() -> Self {
        Self::new(env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string()))
    }

    /// Append the given path to the URL.
    pub fn append_path(&self, path: &str) -> Self {
        let trimmed_url = self.0.trim_end_matches('/');
        let trimmed_path = path.trim_start_matches('/');
        Self(format!("{}/{}", trimmed_url, trimmed_path))
    }

    pub fn with_filter(&self, filter: &impl QueryFilter) -> Self {
        let pairs = filter.query_pairs();
        if pairs.is_empty() {
            return self.clone();
        }

        let query = pairs
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");

        if self.0.contains('?') {
            Self(format!("{}&{}", self.0, query))
        } else {
            Self(format!("{}?{}", self.0, query))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ResourceFilters, ResourceType};

    #[test]
    fn append_path_normalizes_slashes() {
        let url = ApiUrl::new("http://localhost:5154/").append_path("/api/Contract");
        assert_eq!(url.as_ref(), "http://localhost:5154/api/Contract");
    }

    #[test]
    fn empty_filter_leaves_url_untouched() {
        let url = ApiUrl::new("http://host").append_path("api/Resource");
        let filtered = url.with_filter(&ResourceFilters::default());
        assert_eq!(filtered.as_ref(), "http://host/api/Resource");
    }

    #[test]
    fn filter_values_are_encoded() {
        let filters = ResourceFilters {
            search_term: Some("Jane Doe".to_string()),
            resource_type: Some(ResourceType::Subcontractor),
            is_active: Some(true),
            ..Default::default()
        };
        let url = ApiUrl::new("http://host")
            .append_path("api/Resource")
            .with_filter(&filters);
        assert_eq!(
            url.as_ref(),
            "http://host/api/Resource?search=Jane%20Doe&type=Subcontractor&isActive=true"
        );
    }
}
