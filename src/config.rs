use std::env;

/// Default remote grid endpoint when `HUBCAP_HUB_URL` is not set.
pub const DEFAULT_HUB_URL: &str = "https://hub-cloud.browserstack.com/wd/hub";

/// Ambient read-only settings consumed by the configurator and factory.
/// Loaded once, before any configurator use.
///
/// Environment surface:
/// - `BROWSERSTACK_USERNAME` / `BROWSERSTACK_ACCESS_KEY` — grid credentials
/// - `HUBCAP_RUN_LOCALLY` — truthy value routes descriptor sessions through a
///   local tunnel
/// - `HUBCAP_LOCAL_BROWSER` — browser name forcing a locally-installed driver
///   (empty = no override)
/// - `HUBCAP_HUB_URL` — remote grid endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationProvider {
    pub user_name: String,
    pub access_key: String,
    pub run_test_locally: bool,
    pub use_local_browser: String,
    pub remote_hub_url: String,
}

impl Default for ConfigurationProvider {
    fn default() -> Self {
        Self {
            user_name: String::new(),
            access_key: String::new(),
            run_test_locally: false,
            use_local_browser: String::new(),
            remote_hub_url: DEFAULT_HUB_URL.to_string(),
        }
    }
}

impl ConfigurationProvider {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            user_name: env::var("BROWSERSTACK_USERNAME").unwrap_or_default(),
            access_key: env::var("BROWSERSTACK_ACCESS_KEY").unwrap_or_default(),
            run_test_locally: env::var("HUBCAP_RUN_LOCALLY")
                .map(|value| truthy(&value))
                .unwrap_or(false),
            use_local_browser: env::var("HUBCAP_LOCAL_BROWSER").unwrap_or_default(),
            remote_hub_url: env::var("HUBCAP_HUB_URL")
                .unwrap_or_else(|_| DEFAULT_HUB_URL.to_string()),
        }
    }

    /// The local-browser override, or `None` when unset/blank.
    #[must_use]
    pub fn local_browser_override(&self) -> Option<&str> {
        let name = self.use_local_browser.trim();
        (!name.is_empty()).then_some(name)
    }
}

fn truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
