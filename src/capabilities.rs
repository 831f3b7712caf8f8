use serde_json::{Map, Value};

use crate::browser::BrowserConfiguration;
use crate::specification::TestSpecification;

/// Immutable capability payload describing the desired session to the hosting
/// service. Produced by a [`CapabilitiesBuilder`], consumed by the factory.
///
/// Keys follow the grid's legacy capability vocabulary: `name`, `build`,
/// `browserstack.user`, `browserstack.key`, `browserstack.local`, `browser`,
/// `browser_version`, `os`, `os_version`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Capabilities(Map<String, Value>);

impl Capabilities {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

/// Fluent accumulator for session capabilities. Each `with_*` call returns the
/// builder again so calls can be chained; `build` snapshots the state at call
/// time, so repeated builds yield independent payloads.
pub trait CapabilitiesBuilder {
    fn with_credentials(&mut self, user_name: &str, access_key: &str) -> &mut Self;
    fn with_test_specification(&mut self, specification: &TestSpecification) -> &mut Self;
    fn with_browser_configuration(&mut self, configuration: &BrowserConfiguration) -> &mut Self;
    fn with_run_test_locally(&mut self, run_locally: bool) -> &mut Self;
    fn build(&self) -> Capabilities;
}

/// Production [`CapabilitiesBuilder`].
#[derive(Debug, Clone, Default)]
pub struct SessionCapabilitiesBuilder {
    credentials: Option<(String, String)>,
    specification: Option<TestSpecification>,
    browser: Option<BrowserConfiguration>,
    run_locally: bool,
}

impl CapabilitiesBuilder for SessionCapabilitiesBuilder {
    fn with_credentials(&mut self, user_name: &str, access_key: &str) -> &mut Self {
        self.credentials = Some((user_name.to_string(), access_key.to_string()));
        self
    }

    fn with_test_specification(&mut self, specification: &TestSpecification) -> &mut Self {
        self.specification = Some(specification.clone());
        self
    }

    fn with_browser_configuration(&mut self, configuration: &BrowserConfiguration) -> &mut Self {
        self.browser = Some(configuration.clone());
        self
    }

    fn with_run_test_locally(&mut self, run_locally: bool) -> &mut Self {
        self.run_locally = run_locally;
        self
    }

    fn build(&self) -> Capabilities {
        let mut caps = Map::new();
        if let Some(specification) = &self.specification {
            caps.insert("name".to_string(), Value::from(specification.scenario_name()));
            caps.insert("build".to_string(), Value::from(specification.identifier()));
        }
        if let Some((user_name, access_key)) = &self.credentials {
            caps.insert(
                "browserstack.user".to_string(),
                Value::from(user_name.as_str()),
            );
            caps.insert(
                "browserstack.key".to_string(),
                Value::from(access_key.as_str()),
            );
        }
        caps.insert("browserstack.local".to_string(), Value::from(self.run_locally));
        if let Some(configuration) = &self.browser {
            let fragments = [
                ("browser", &configuration.browser),
                ("browser_version", &configuration.version),
                ("os", &configuration.os),
                ("os_version", &configuration.os_version),
            ];
            for (key, value) in fragments {
                if !value.is_empty() {
                    caps.insert(key.to_string(), Value::from(value.as_str()));
                }
            }
        }
        Capabilities(caps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_configuration() -> BrowserConfiguration {
        BrowserConfiguration {
            browser: "IE".to_string(),
            version: "11".to_string(),
            os: "Windows".to_string(),
            os_version: "10".to_string(),
        }
    }

    #[test]
    fn builds_full_payload() {
        let specification = TestSpecification::new("Fancy scenario", "178wq76essf");
        let mut builder = SessionCapabilitiesBuilder::default();
        builder
            .with_test_specification(&specification)
            .with_credentials("someUserName", "someAccessKey")
            .with_browser_configuration(&sample_configuration())
            .with_run_test_locally(true);
        let caps = builder.build();

        assert_eq!(caps.get("name"), Some(&Value::from("Fancy scenario")));
        assert_eq!(caps.get("build"), Some(&Value::from("178wq76essf")));
        assert_eq!(
            caps.get("browserstack.user"),
            Some(&Value::from("someUserName"))
        );
        assert_eq!(
            caps.get("browserstack.key"),
            Some(&Value::from("someAccessKey"))
        );
        assert_eq!(caps.get("browserstack.local"), Some(&Value::from(true)));
        assert_eq!(caps.get("browser"), Some(&Value::from("IE")));
        assert_eq!(caps.get("browser_version"), Some(&Value::from("11")));
        assert_eq!(caps.get("os"), Some(&Value::from("Windows")));
        assert_eq!(caps.get("os_version"), Some(&Value::from("10")));
    }

    #[test]
    fn omits_absent_fragments() {
        let caps = SessionCapabilitiesBuilder::default().build();
        assert_eq!(caps.get("browserstack.local"), Some(&Value::from(false)));
        assert_eq!(caps.get("name"), None);
        assert_eq!(caps.get("browserstack.user"), None);
        assert_eq!(caps.get("browser"), None);
    }

    #[test]
    fn skips_empty_browser_fields() {
        let partial = BrowserConfiguration {
            browser: "Chrome".to_string(),
            ..BrowserConfiguration::default()
        };
        let mut builder = SessionCapabilitiesBuilder::default();
        builder.with_browser_configuration(&partial);
        let caps = builder.build();
        assert_eq!(caps.get("browser"), Some(&Value::from("Chrome")));
        assert_eq!(caps.get("browser_version"), None);
        assert_eq!(caps.get("os"), None);
    }

    #[test]
    fn repeated_builds_snapshot_independently() {
        let mut builder = SessionCapabilitiesBuilder::default();
        builder.with_credentials("first", "key");
        let before = builder.build();
        builder.with_credentials("second", "key");
        let after = builder.build();

        assert_eq!(before.get("browserstack.user"), Some(&Value::from("first")));
        assert_eq!(after.get("browserstack.user"), Some(&Value::from("second")));
        assert_ne!(before, after);
    }
}
