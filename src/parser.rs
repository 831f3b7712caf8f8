use crate::browser::{BrowserConfiguration, BrowserKind, InvalidBrowserConfiguration, OsKind};

/// Turns a descriptor string into a structured [`BrowserConfiguration`].
/// Implementations must be side-effect free.
pub trait BrowserConfigurationParser {
    fn parse(&self, descriptor: &str)
    -> Result<BrowserConfiguration, InvalidBrowserConfiguration>;
}

/// Parser for comma-delimited descriptors such as `"IE,11,Windows,10"`.
///
/// Accepted shapes: `Browser`, `Browser,Version`, `Browser,Version,OS,OSVersion`.
/// The browser and OS tokens are validated against [`BrowserKind`] and
/// [`OsKind`]; version tokens are carried through verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptorParser;

impl BrowserConfigurationParser for DescriptorParser {
    fn parse(
        &self,
        descriptor: &str,
    ) -> Result<BrowserConfiguration, InvalidBrowserConfiguration> {
        let tokens: Vec<&str> = descriptor.split(',').map(str::trim).collect();
        if tokens.iter().any(|token| token.is_empty()) {
            return Err(InvalidBrowserConfiguration::MalformedDescriptor(
                descriptor.to_string(),
            ));
        }

        match tokens.as_slice() {
            [browser] => {
                let kind: BrowserKind = browser.parse()?;
                Ok(BrowserConfiguration {
                    browser: kind.capability_name().to_string(),
                    ..BrowserConfiguration::default()
                })
            }
            [browser, version] => {
                let kind: BrowserKind = browser.parse()?;
                Ok(BrowserConfiguration {
                    browser: kind.capability_name().to_string(),
                    version: (*version).to_string(),
                    ..BrowserConfiguration::default()
                })
            }
            [browser, version, os, os_version] => {
                let kind: BrowserKind = browser.parse()?;
                let os_kind: OsKind = os.parse()?;
                Ok(BrowserConfiguration {
                    browser: kind.capability_name().to_string(),
                    version: (*version).to_string(),
                    os: os_kind.capability_name().to_string(),
                    os_version: (*os_version).to_string(),
                })
            }
            _ => Err(InvalidBrowserConfiguration::MalformedDescriptor(
                descriptor.to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_descriptor() {
        let cfg = DescriptorParser.parse("IE,11,Windows,10").unwrap();
        assert_eq!(cfg.browser, "IE");
        assert_eq!(cfg.version, "11");
        assert_eq!(cfg.os, "Windows");
        assert_eq!(cfg.os_version, "10");
    }

    #[test]
    fn parses_browser_only_and_browser_version_shapes() {
        let cfg = DescriptorParser.parse("chrome").unwrap();
        assert_eq!(cfg.browser, "Chrome");
        assert!(cfg.version.is_empty());

        let cfg = DescriptorParser.parse("Firefox, 57.0").unwrap();
        assert_eq!(cfg.browser, "Firefox");
        assert_eq!(cfg.version, "57.0");
        assert!(cfg.os.is_empty());
    }

    #[test]
    fn normalizes_browser_and_os_names() {
        let cfg = DescriptorParser.parse("safari,11,osx,Sierra").unwrap();
        assert_eq!(cfg.browser, "Safari");
        assert_eq!(cfg.os, "OS X");
        assert_eq!(cfg.os_version, "Sierra");
    }

    #[test]
    fn rejects_unknown_browser_token() {
        let err = DescriptorParser.parse("jsdhfjsg").unwrap_err();
        assert_eq!(
            err,
            InvalidBrowserConfiguration::UnknownBrowser("jsdhfjsg".to_string())
        );
    }

    #[test]
    fn rejects_unknown_os_token() {
        let err = DescriptorParser.parse("IE,11,Amiga,10").unwrap_err();
        assert_eq!(
            err,
            InvalidBrowserConfiguration::UnknownOs("Amiga".to_string())
        );
    }

    #[test]
    fn rejects_malformed_shapes() {
        for descriptor in ["", "IE,11,Windows", "IE,11,Windows,10,extra", "IE,,Windows,10"] {
            let err = DescriptorParser.parse(descriptor).unwrap_err();
            assert_eq!(
                err,
                InvalidBrowserConfiguration::MalformedDescriptor(descriptor.to_string()),
                "descriptor {descriptor:?}"
            );
        }
    }
}
