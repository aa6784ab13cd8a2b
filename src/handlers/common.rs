use crate::{config::AppConfig, ApiResponse};
use serde::Deserialize;
use utoipa::IntoParams;

/// Page selection shared by every list endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub limit: u64,
}

impl PageWindow {
    /// Page defaults to 1; the limit falls back to the configured default and
    /// is capped at the configured maximum.
    pub fn resolve(config: &AppConfig, page: Option<u64>, limit: Option<u64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: config.clamp_page_size(limit),
        }
    }

    pub fn respond<T>(self, (items, total): (Vec<T>, u64)) -> ApiResponse<Vec<T>> {
        ApiResponse::paginated(items, total, self.page, self.limit)
    }
}

/// Common query parameters for list endpoints
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Page number, starting at 1
    pub page: Option<u64>,
    /// Items per page
    pub limit: Option<u64>,
    /// Case-insensitive search term
    pub search: Option<String>,
}

impl ListQuery {
    pub fn window(&self, config: &AppConfig) -> PageWindow {
        PageWindow::resolve(config, self.page, self.limit)
    }
}

/// Parses a comma-separated id list such as `1,2,3`, skipping blanks.
pub fn parse_id_list(raw: &str) -> Result<Vec<i32>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i32>()
                .map_err(|_| format!("Invalid id '{}'", part))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AppConfig {
        AppConfig::new(
            "sqlite::memory:".into(),
            "common-test-secret-0123456789-abcdef".into(),
            "127.0.0.1".into(),
            8080,
            "development".into(),
        )
    }

    #[test]
    fn window_defaults_and_clamps() {
        let cfg = config();
        let window = PageWindow::resolve(&cfg, None, None);
        assert_eq!(window.page, 1);
        assert_eq!(window.limit, cfg.api_default_page_size);

        let window = PageWindow::resolve(&cfg, Some(0), Some(10_000));
        assert_eq!(window.page, 1);
        assert_eq!(window.limit, cfg.api_max_page_size);
    }

    #[test]
    fn id_lists_parse_and_reject_garbage() {
        assert_eq!(parse_id_list("1, 2,,3").unwrap(), vec![1, 2, 3]);
        assert!(parse_id_list("").unwrap().is_empty());
        assert_eq!(parse_id_list("1,x").unwrap_err(), "Invalid id 'x'");
    }
}
