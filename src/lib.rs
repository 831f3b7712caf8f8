//! hubcap — remote browser session configurator.
//!
//! Parses a human-readable browser/OS descriptor, assembles a remote-session
//! capability payload with credentials attached, and routes the request to
//! one of three session hosts: a cloud-hosted remote browser, a remote
//! browser tunneled back to a locally-hosted system under test, or a purely
//! local browser driver. The WebDriver wire protocol itself is delegated to
//! `thirtyfour`.

pub mod browser;
pub mod capabilities;
pub mod config;
pub mod configurator;
pub mod factory;
pub mod parser;
pub mod specification;

// Re-export commonly used types
pub use browser::{BrowserConfiguration, BrowserKind, InvalidBrowserConfiguration, OsKind};
pub use capabilities::{Capabilities, CapabilitiesBuilder, SessionCapabilitiesBuilder};
pub use config::{ConfigurationProvider, DEFAULT_HUB_URL};
pub use configurator::{RemoteBrowserConfigurator, SessionRoute};
pub use factory::{BrowserHost, BrowserHostFactory, WebDriverHostFactory};
pub use parser::{BrowserConfigurationParser, DescriptorParser};
pub use specification::TestSpecification;
