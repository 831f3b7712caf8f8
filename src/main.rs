use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::time::{SystemTime, UNIX_EPOCH};

use hubcap::{
    BrowserConfiguration, BrowserHostFactory, BrowserKind, Capabilities, ConfigurationProvider,
    DescriptorParser, RemoteBrowserConfigurator, SessionCapabilitiesBuilder, SessionRoute,
    TestSpecification, WebDriverHostFactory,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum HeadlessMode {
    /// Run local drivers in headless mode
    Headless,
    /// Run local drivers with visible windows
    Windowed,
}

impl HeadlessMode {
    const fn is_headless(self) -> bool {
        matches!(self, Self::Headless)
    }
}

#[derive(Debug, Parser)]
#[command(name = "hubcap", version)]
#[command(
    about = "Remote browser session configurator - routes test sessions to a cloud grid, a tunneled grid, or a local driver"
)]
struct Args {
    /// Browser descriptor, e.g. "IE,11,Windows,10"
    descriptor: Option<String>,

    /// Scenario name recorded in the session capabilities
    #[arg(long, default_value = "ad-hoc session")]
    scenario: String,

    /// Build identifier recorded in the session capabilities (defaults to a
    /// timestamp-derived value)
    #[arg(long)]
    run_id: Option<String>,

    /// Grid username (overrides BROWSERSTACK_USERNAME)
    #[arg(long)]
    user: Option<String>,

    /// Grid access key (overrides BROWSERSTACK_ACCESS_KEY)
    #[arg(long)]
    key: Option<String>,

    /// Route descriptor sessions through a local tunnel
    #[arg(long)]
    run_locally: bool,

    /// Force a locally-installed browser driver (chrome, firefox, ie, phantomjs, safari)
    #[arg(long)]
    local_browser: Option<String>,

    /// Remote grid hub URL (overrides HUBCAP_HUB_URL)
    #[arg(long)]
    hub: Option<String>,

    /// Headless mode for local drivers
    #[arg(long, value_enum, default_value_t = HeadlessMode::Headless)]
    headless: HeadlessMode,

    /// Navigate here once the session is up and report the page title
    #[arg(long)]
    probe_url: Option<String>,

    /// Resolve the session route and print the capability payload without
    /// starting a session
    #[arg(long)]
    dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    announce_banner();

    let provider = provider_from(&args);
    let specification = TestSpecification::new(
        &args.scenario,
        args.run_id.clone().unwrap_or_else(default_run_id),
    );
    let descriptor = args.descriptor.as_deref();

    if args.dry_run {
        let mut planner = planner_for(&provider);
        let route = planner.resolve_route(descriptor)?;
        println!("{} {route}", "Route:".bright_cyan().bold());
        if !matches!(route, SessionRoute::LocalDriver { .. }) {
            println!("{} {}", "Hub:".bright_cyan().bold(), provider.remote_hub_url);
        }
        let capabilities = planner
            .create_and_configure(&specification, descriptor)
            .await?;
        println!(
            "{}",
            serde_json::to_string_pretty(capabilities.as_map())
                .context("rendering capability payload")?
        );
        return Ok(());
    }

    let factory = WebDriverHostFactory::new(&provider).with_headless(args.headless.is_headless());
    let mut configurator = RemoteBrowserConfigurator::new(
        factory,
        DescriptorParser,
        SessionCapabilitiesBuilder::default(),
        provider.clone(),
    );
    let host = configurator
        .create_and_configure(&specification, descriptor)
        .await?;
    println!(
        "✅ {} {}",
        "Session established at".green(),
        host.endpoint()
    );

    if let Some(url) = &args.probe_url {
        host.driver()
            .goto(url.as_str())
            .await
            .with_context(|| format!("navigating to {url}"))?;
        let title = host.driver().title().await.context("reading page title")?;
        println!("🌐 {url} -> {}", title.bright_blue());
    }

    host.quit().await?;
    if args.verbose {
        println!("🏁 Session closed");
    }
    Ok(())
}

fn announce_banner() {
    println!("{}", "🧢 hubcap session configurator".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn provider_from(args: &Args) -> ConfigurationProvider {
    let mut provider = ConfigurationProvider::from_env();
    if let Some(user) = &args.user {
        provider.user_name = user.clone();
    }
    if let Some(key) = &args.key {
        provider.access_key = key.clone();
    }
    if args.run_locally {
        provider.run_test_locally = true;
    }
    if let Some(local_browser) = &args.local_browser {
        provider.use_local_browser = local_browser.clone();
    }
    if let Some(hub) = &args.hub {
        provider.remote_hub_url = hub.clone();
    }
    provider
}

fn default_run_id() -> String {
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("run-{seconds}")
}

/// Factory that hands back the payload it would have sent instead of opening
/// a session, so `--dry-run` goes through the configurator's real decision
/// path. The local-driver variant carries no grid payload.
struct PlanFactory;

#[async_trait]
impl BrowserHostFactory for PlanFactory {
    type Host = Capabilities;

    async fn create_with_capabilities(&self, capabilities: &Capabilities) -> Result<Capabilities> {
        Ok(capabilities.clone())
    }

    async fn create_with_browser(
        &self,
        capabilities: &Capabilities,
        _configuration: &BrowserConfiguration,
    ) -> Result<Capabilities> {
        Ok(capabilities.clone())
    }

    async fn create_private_local_server(
        &self,
        capabilities: &Capabilities,
        _configuration: &BrowserConfiguration,
    ) -> Result<Capabilities> {
        Ok(capabilities.clone())
    }

    async fn create_local_web_driver(
        &self,
        _browser: BrowserKind,
        _configuration: Option<&BrowserConfiguration>,
    ) -> Result<Capabilities> {
        Ok(Capabilities::default())
    }
}

fn planner_for(
    provider: &ConfigurationProvider,
) -> RemoteBrowserConfigurator<PlanFactory, DescriptorParser, SessionCapabilitiesBuilder> {
    RemoteBrowserConfigurator::new(
        PlanFactory,
        DescriptorParser,
        SessionCapabilitiesBuilder::default(),
        provider.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use hubcap::InvalidBrowserConfiguration;
    use serde_json::Value;
    use tokio_test::block_on;

    fn base_args() -> Args {
        Args {
            descriptor: None,
            scenario: "ad-hoc session".to_string(),
            run_id: None,
            user: None,
            key: None,
            run_locally: false,
            local_browser: None,
            hub: None,
            headless: HeadlessMode::Headless,
            probe_url: None,
            dry_run: false,
            verbose: false,
        }
    }

    #[test]
    fn provider_overrides_apply() {
        let args = Args {
            user: Some("cliUser".to_string()),
            key: Some("cliKey".to_string()),
            run_locally: true,
            local_browser: Some("chrome".to_string()),
            hub: Some("http://grid.internal/wd/hub".to_string()),
            ..base_args()
        };
        let provider = provider_from(&args);
        assert_eq!(provider.user_name, "cliUser");
        assert_eq!(provider.access_key, "cliKey");
        assert!(provider.run_test_locally);
        assert_eq!(provider.use_local_browser, "chrome");
        assert_eq!(provider.remote_hub_url, "http://grid.internal/wd/hub");
    }

    #[test]
    fn default_run_id_is_timestamp_shaped() {
        let id = default_run_id();
        assert!(id.starts_with("run-"));
        assert!(id["run-".len()..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn headless_mode_maps_to_bool() {
        assert!(HeadlessMode::Headless.is_headless());
        assert!(!HeadlessMode::Windowed.is_headless());
    }

    #[test]
    fn plan_for_pinned_route_carries_browser_fragments() {
        let provider = ConfigurationProvider {
            user_name: "someUserName".to_string(),
            access_key: "someAccessKey".to_string(),
            ..ConfigurationProvider::default()
        };
        let specification = TestSpecification::new("Fancy scenario", "178wq76essf");
        let mut planner = planner_for(&provider);
        let caps = block_on(planner.create_and_configure(&specification, Some("IE,11,Windows,10")))
            .unwrap();
        assert_eq!(caps.get("browser"), Some(&Value::from("IE")));
        assert_eq!(caps.get("os_version"), Some(&Value::from("10")));
        assert_eq!(
            caps.get("browserstack.user"),
            Some(&Value::from("someUserName"))
        );
    }

    #[test]
    fn plan_for_local_route_has_no_grid_payload() {
        let provider = ConfigurationProvider {
            user_name: "someUserName".to_string(),
            access_key: "someAccessKey".to_string(),
            use_local_browser: "chrome".to_string(),
            ..ConfigurationProvider::default()
        };
        let specification = TestSpecification::new("Fancy scenario", "178wq76essf");
        let mut planner = planner_for(&provider);
        let caps = block_on(planner.create_and_configure(&specification, None)).unwrap();
        assert!(caps.as_map().is_empty());
    }

    #[test]
    fn plan_propagates_parse_failures() {
        let provider = ConfigurationProvider::default();
        let specification = TestSpecification::new("Fancy scenario", "178wq76essf");
        let mut planner = planner_for(&provider);
        let err =
            block_on(planner.create_and_configure(&specification, Some("jsdhfjsg"))).unwrap_err();
        assert_eq!(
            err.downcast::<InvalidBrowserConfiguration>().unwrap(),
            InvalidBrowserConfiguration::UnknownBrowser("jsdhfjsg".to_string())
        );
    }
}
