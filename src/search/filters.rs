//! Search filters and query composition

/// User-supplied search filters
///
/// Every field is optional. Blank strings are treated as absent and a price
/// bound of zero means "unset", so form inputs can be passed through as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    /// City, region or ZIP code appended to the query
    pub location: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    /// Free-text keywords (trim level, color, ...)
    pub keywords: Option<String>,
    pub min_price: Option<u32>,
    pub max_price: Option<u32>,
    /// SerpAPI key; enables the search-engine connector
    pub api_key: Option<String>,
    /// Result cap; the configured default applies when absent
    pub max_results: Option<usize>,
}

impl SearchFilters {
    /// Filters for a location only
    pub fn for_location(location: impl Into<String>) -> Self {
        Self {
            location: Some(location.into()),
            ..Self::default()
        }
    }

    pub fn location(&self) -> Option<&str> {
        non_blank(&self.location)
    }

    pub fn make(&self) -> Option<&str> {
        non_blank(&self.make)
    }

    pub fn model(&self) -> Option<&str> {
        non_blank(&self.model)
    }

    pub fn keywords(&self) -> Option<&str> {
        non_blank(&self.keywords)
    }

    pub fn api_key(&self) -> Option<&str> {
        non_blank(&self.api_key)
    }

    pub fn min_price(&self) -> Option<u32> {
        self.min_price.filter(|p| *p > 0)
    }

    pub fn max_price(&self) -> Option<u32> {
        self.max_price.filter(|p| *p > 0)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Composes the query string sent to every connector
///
/// Make, model and keywords are space-joined in that order; when none is
/// present the `fallback` term is used instead. The location, if any, is
/// appended last.
///
/// # Example
///
/// ```
/// use car_finder::search::{compose_query, SearchFilters};
///
/// let filters = SearchFilters {
///     make: Some("Toyota".to_string()),
///     model: Some("Camry".to_string()),
///     ..SearchFilters::for_location("Dallas TX")
/// };
/// assert_eq!(compose_query(&filters, "used car"), "Toyota Camry Dallas TX");
/// assert_eq!(compose_query(&SearchFilters::for_location("75201"), "used car"), "used car 75201");
/// ```
pub fn compose_query(filters: &SearchFilters, fallback: &str) -> String {
    let parts: Vec<&str> = [filters.make(), filters.model(), filters.keywords()]
        .into_iter()
        .flatten()
        .collect();

    let base = if parts.is_empty() {
        fallback.to_string()
    } else {
        parts.join(" ")
    };

    match filters.location() {
        Some(location) => format!("{} {}", base, location),
        None => base,
    }
}
