use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use serde_json::Value;
use thirtyfour::Capabilities as WireCapabilities;
use thirtyfour::prelude::*;

use crate::browser::{BrowserConfiguration, BrowserKind};
use crate::capabilities::Capabilities;
use crate::config::ConfigurationProvider;

/// An active browser session handed back to the caller. Wraps the connected
/// [`WebDriver`] together with the endpoint it was created against.
pub struct BrowserHost {
    driver: WebDriver,
    endpoint: String,
}

impl BrowserHost {
    fn new(driver: WebDriver, endpoint: String) -> Self {
        Self { driver, endpoint }
    }

    #[must_use]
    pub fn driver(&self) -> &WebDriver {
        &self.driver
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn quit(self) -> Result<()> {
        self.driver.quit().await.context("closing browser session")
    }
}

/// Produces browser sessions from assembled capabilities. Treated as a black
/// box by the configurator; any failure propagates unchanged.
#[async_trait]
pub trait BrowserHostFactory {
    type Host: Send;

    /// Plain remote session, no browser pinning.
    async fn create_with_capabilities(&self, capabilities: &Capabilities) -> Result<Self::Host>;

    /// Remote session pinned to a specific browser/OS.
    async fn create_with_browser(
        &self,
        capabilities: &Capabilities,
        configuration: &BrowserConfiguration,
    ) -> Result<Self::Host>;

    /// Remote session routed through a local tunnel, for tests that must
    /// reach a locally-hosted system under test.
    async fn create_private_local_server(
        &self,
        capabilities: &Capabilities,
        configuration: &BrowserConfiguration,
    ) -> Result<Self::Host>;

    /// Fully local driver, bypassing the remote service entirely.
    async fn create_local_web_driver(
        &self,
        browser: BrowserKind,
        configuration: Option<&BrowserConfiguration>,
    ) -> Result<Self::Host>;
}

/// Production factory connecting sessions over the WebDriver protocol.
///
/// Remote variants talk to the configured hub; the local variant talks to the
/// conventional driver endpoint for the requested browser.
#[derive(Debug, Clone)]
pub struct WebDriverHostFactory {
    hub_url: String,
    implicit_wait: Duration,
    headless: bool,
}

impl WebDriverHostFactory {
    #[must_use]
    pub fn new(provider: &ConfigurationProvider) -> Self {
        Self {
            hub_url: provider.remote_hub_url.clone(),
            implicit_wait: Duration::from_secs(3),
            headless: true,
        }
    }

    #[must_use]
    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    #[must_use]
    pub fn with_implicit_wait(mut self, implicit_wait: Duration) -> Self {
        self.implicit_wait = implicit_wait;
        self
    }

    async fn connect(&self, endpoint: &str, caps: WireCapabilities) -> Result<BrowserHost> {
        let driver = WebDriver::new(endpoint, caps)
            .await
            .with_context(|| format!("connecting to WebDriver endpoint {endpoint}"))?;
        driver
            .set_implicit_wait_timeout(self.implicit_wait)
            .await
            .context("setting implicit wait timeout")?;
        Ok(BrowserHost::new(driver, endpoint.to_string()))
    }

    async fn connect_remote(&self, capabilities: &Capabilities) -> Result<BrowserHost> {
        self.connect(&self.hub_url, capabilities.as_map().clone())
            .await
    }

    fn local_driver_capabilities(&self, browser: BrowserKind) -> Result<WireCapabilities> {
        let caps = match browser {
            BrowserKind::Chrome => {
                let mut caps = DesiredCapabilities::chrome();
                if self.headless {
                    caps.set_headless()?;
                }
                caps.into()
            }
            BrowserKind::Firefox => {
                let mut caps = DesiredCapabilities::firefox();
                if self.headless {
                    caps.set_headless()?;
                }
                caps.into()
            }
            BrowserKind::InternetExplorer => DesiredCapabilities::internet_explorer().into(),
            BrowserKind::Safari => DesiredCapabilities::safari().into(),
            BrowserKind::PhantomJs => {
                let mut caps = WireCapabilities::new();
                caps.insert("browserName".to_string(), Value::from("phantomjs"));
                caps
            }
        };
        Ok(caps)
    }
}

/// Conventional endpoint of the standalone driver for each browser.
const fn local_endpoint(browser: BrowserKind) -> &'static str {
    match browser {
        BrowserKind::Chrome => "http://localhost:9515",
        BrowserKind::Firefox => "http://localhost:4444",
        BrowserKind::InternetExplorer => "http://localhost:5555",
        BrowserKind::PhantomJs => "http://localhost:8910",
        BrowserKind::Safari => "http://localhost:4445",
    }
}

/// Payload copy with the tunnel flag forced on, whatever the builder set.
fn with_local_flag(capabilities: &Capabilities) -> WireCapabilities {
    let mut caps = capabilities.as_map().clone();
    caps.insert("browserstack.local".to_string(), Value::from(true));
    caps
}

#[async_trait]
impl BrowserHostFactory for WebDriverHostFactory {
    type Host = BrowserHost;

    async fn create_with_capabilities(&self, capabilities: &Capabilities) -> Result<BrowserHost> {
        debug!("creating remote session at {}", self.hub_url);
        self.connect_remote(capabilities).await
    }

    async fn create_with_browser(
        &self,
        capabilities: &Capabilities,
        configuration: &BrowserConfiguration,
    ) -> Result<BrowserHost> {
        info!(
            "creating remote session pinned to {} at {}",
            configuration.label(),
            self.hub_url
        );
        self.connect_remote(capabilities).await
    }

    async fn create_private_local_server(
        &self,
        capabilities: &Capabilities,
        configuration: &BrowserConfiguration,
    ) -> Result<BrowserHost> {
        info!(
            "creating tunneled remote session pinned to {}; a local tunnel must be running",
            configuration.label()
        );
        self.connect(&self.hub_url, with_local_flag(capabilities))
            .await
    }

    async fn create_local_web_driver(
        &self,
        browser: BrowserKind,
        configuration: Option<&BrowserConfiguration>,
    ) -> Result<BrowserHost> {
        let endpoint = local_endpoint(browser);
        info!("creating local {browser} driver session at {endpoint}");
        if let Some(cfg) = configuration.filter(|cfg| !cfg.is_empty()) {
            debug!("descriptor target was {}", cfg.label());
        }
        let caps = self.local_driver_capabilities(browser)?;
        self.connect(endpoint, caps).await
    }
}
