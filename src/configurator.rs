use std::fmt;

use anyhow::Result;
use log::debug;

use crate::browser::{BrowserKind, InvalidBrowserConfiguration};
use crate::capabilities::CapabilitiesBuilder;
use crate::config::ConfigurationProvider;
use crate::factory::BrowserHostFactory;
use crate::parser::BrowserConfigurationParser;
use crate::specification::TestSpecification;

/// Where a session request ends up, resolved from the ambient settings and
/// the presence of a descriptor before any builder mutation happens beyond
/// the test specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRoute<'a> {
    /// Local-browser override is set: use a locally-installed driver and
    /// skip the remote service entirely.
    LocalDriver {
        browser: BrowserKind,
        descriptor: Option<&'a str>,
    },
    /// No descriptor: plain remote session.
    Remote,
    /// Descriptor supplied: remote session pinned to that browser/OS.
    RemotePinned { descriptor: &'a str },
    /// Descriptor supplied and the run targets a locally-hosted system:
    /// remote session through a local tunnel.
    PrivateLocalServer { descriptor: &'a str },
}

impl fmt::Display for SessionRoute<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LocalDriver { browser, .. } => write!(f, "local {browser} driver"),
            Self::Remote => write!(f, "remote session"),
            Self::RemotePinned { descriptor } => write!(f, "remote session for '{descriptor}'"),
            Self::PrivateLocalServer { descriptor } => {
                write!(f, "tunneled remote session for '{descriptor}'")
            }
        }
    }
}

/// Orchestrates parser, capabilities builder and host factory into a single
/// decision: which factory entry point to call with which arguments.
///
/// Generic over its collaborators so tests can substitute recording fakes,
/// mirroring how the harness injects them in production.
pub struct RemoteBrowserConfigurator<F, P, B> {
    factory: F,
    parser: P,
    builder: B,
    provider: ConfigurationProvider,
}

impl<F, P, B> RemoteBrowserConfigurator<F, P, B>
where
    F: BrowserHostFactory,
    P: BrowserConfigurationParser,
    B: CapabilitiesBuilder,
{
    pub fn new(factory: F, parser: P, builder: B, provider: ConfigurationProvider) -> Self {
        Self {
            factory,
            parser,
            builder,
            provider,
        }
    }

    /// The ordered decision table. Evaluated before any parsing of the
    /// descriptor itself: only the local-browser override name is resolved
    /// here, and an unrecognized name fails the whole request.
    pub fn resolve_route<'a>(
        &self,
        descriptor: Option<&'a str>,
    ) -> Result<SessionRoute<'a>, InvalidBrowserConfiguration> {
        let descriptor = descriptor.map(str::trim).filter(|d| !d.is_empty());
        if let Some(name) = self.provider.local_browser_override() {
            return Ok(SessionRoute::LocalDriver {
                browser: name.parse()?,
                descriptor,
            });
        }
        Ok(match descriptor {
            None => SessionRoute::Remote,
            Some(descriptor) if self.provider.run_test_locally => {
                SessionRoute::PrivateLocalServer { descriptor }
            }
            Some(descriptor) => SessionRoute::RemotePinned { descriptor },
        })
    }

    /// Creates a browser host for the given test run.
    ///
    /// Parser and lookup failures propagate unchanged; no factory entry point
    /// is invoked after a failure, and a failing descriptor is parsed before
    /// `with_browser_configuration` or `build` touch the builder.
    pub async fn create_and_configure(
        &mut self,
        specification: &TestSpecification,
        descriptor: Option<&str>,
    ) -> Result<F::Host> {
        self.builder.with_test_specification(specification);
        let route = self.resolve_route(descriptor)?;
        debug!("resolved route: {route}");

        match route {
            SessionRoute::LocalDriver {
                browser,
                descriptor,
            } => {
                // Credentials are never attached on this path; no remote
                // service is contacted.
                let pinned = descriptor.map(|d| self.parser.parse(d)).transpose()?;
                self.builder.with_run_test_locally(false);
                self.factory
                    .create_local_web_driver(browser, pinned.as_ref())
                    .await
            }
            SessionRoute::Remote => {
                self.attach_remote_settings();
                let capabilities = self.builder.build();
                self.factory.create_with_capabilities(&capabilities).await
            }
            SessionRoute::RemotePinned { descriptor } => {
                self.attach_remote_settings();
                let configuration = self.parser.parse(descriptor)?;
                self.builder.with_browser_configuration(&configuration);
                let capabilities = self.builder.build();
                self.factory
                    .create_with_browser(&capabilities, &configuration)
                    .await
            }
            SessionRoute::PrivateLocalServer { descriptor } => {
                self.attach_remote_settings();
                let configuration = self.parser.parse(descriptor)?;
                self.builder.with_browser_configuration(&configuration);
                let capabilities = self.builder.build();
                self.factory
                    .create_private_local_server(&capabilities, &configuration)
                    .await
            }
        }
    }

    fn attach_remote_settings(&mut self) {
        self.builder
            .with_credentials(&self.provider.user_name, &self.provider.access_key)
            .with_run_test_locally(self.provider.run_test_locally);
    }
}
