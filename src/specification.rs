/// Immutable description of the test run a session is created for: the
/// scenario name shown in the grid dashboard and an identifier grouping the
/// run. Created by the caller before configuration, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSpecification {
    scenario_name: String,
    identifier: String,
}

impl TestSpecification {
    #[must_use]
    pub fn new(scenario_name: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            scenario_name: scenario_name.into(),
            identifier: identifier.into(),
        }
    }

    #[must_use]
    pub fn scenario_name(&self) -> &str {
        &self.scenario_name
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}
