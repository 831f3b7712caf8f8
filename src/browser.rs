use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Raised when a browser descriptor or local-browser override cannot be
/// resolved against the known browser/OS vocabulary. Never caught internally;
/// it surfaces to the caller unchanged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidBrowserConfiguration {
    #[error("browser descriptor '{0}' is not of the form 'Browser[,Version[,OS,OSVersion]]'")]
    MalformedDescriptor(String),
    #[error("unrecognized browser '{0}'")]
    UnknownBrowser(String),
    #[error("unrecognized operating system '{0}'")]
    UnknownOs(String),
}

/// Browsers a session can be routed to, either on the remote grid or through
/// a locally-installed driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrowserKind {
    Chrome,
    Firefox,
    InternetExplorer,
    PhantomJs,
    Safari,
}

impl BrowserKind {
    /// Name used in the session capability payload.
    #[must_use]
    pub const fn capability_name(self) -> &'static str {
        match self {
            Self::Chrome => "Chrome",
            Self::Firefox => "Firefox",
            Self::InternetExplorer => "IE",
            Self::PhantomJs => "PhantomJS",
            Self::Safari => "Safari",
        }
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.capability_name())
    }
}

impl FromStr for BrowserKind {
    type Err = InvalidBrowserConfiguration;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase().replace([' ', '-', '_'], "");
        match token.as_str() {
            "chrome" | "googlechrome" => Ok(Self::Chrome),
            "firefox" | "ff" => Ok(Self::Firefox),
            "internetexplorer" | "ie" => Ok(Self::InternetExplorer),
            "phantomjs" | "phantom" => Ok(Self::PhantomJs),
            "safari" => Ok(Self::Safari),
            _ => Err(InvalidBrowserConfiguration::UnknownBrowser(
                s.trim().to_string(),
            )),
        }
    }
}

/// Operating systems the remote grid can host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsKind {
    Windows,
    OsX,
}

impl OsKind {
    /// Name used in the session capability payload.
    #[must_use]
    pub const fn capability_name(self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::OsX => "OS X",
        }
    }
}

impl FromStr for OsKind {
    type Err = InvalidBrowserConfiguration;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase().replace([' ', '-', '_'], "");
        match token.as_str() {
            "windows" | "win" => Ok(Self::Windows),
            "osx" | "macos" | "mac" => Ok(Self::OsX),
            _ => Err(InvalidBrowserConfiguration::UnknownOs(s.trim().to_string())),
        }
    }
}

/// Structured browser/OS target produced by parsing a descriptor string.
/// All-empty (`Default`) when no descriptor was supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BrowserConfiguration {
    pub browser: String,
    pub version: String,
    pub os: String,
    pub os_version: String,
}

impl BrowserConfiguration {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.browser.is_empty()
            && self.version.is_empty()
            && self.os.is_empty()
            && self.os_version.is_empty()
    }

    /// Human-readable target, e.g. `IE 11 / Windows 10`.
    #[must_use]
    pub fn label(&self) -> String {
        let mut label = self.browser.clone();
        if !self.version.is_empty() {
            label.push(' ');
            label.push_str(&self.version);
        }
        if !self.os.is_empty() {
            label.push_str(" / ");
            label.push_str(&self.os);
            if !self.os_version.is_empty() {
                label.push(' ');
                label.push_str(&self.os_version);
            }
        }
        label
    }
}
