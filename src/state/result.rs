// Test descriptors handed to the reporter by the runner

use serde::{Deserialize, Serialize};

/// Test being reported
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TestInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,

    /// Assertions performed; `None` for test cases that don't expose a count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assertions: Option<u64>,

    /// Output captured while the test ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// The test asserts on its own output, so it is not echoed
    #[serde(default)]
    pub expects_output: bool,
}

impl TestInfo {
    /// Create a test descriptor with just a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_assertions(mut self, assertions: u64) -> Self {
        self.assertions = Some(assertions);
        self
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn expecting_output(mut self) -> Self {
        self.expects_output = true;
        self
    }

    /// Human readable description, `Class::name` when the class is known
    pub fn describe(&self) -> String {
        match &self.class {
            Some(class) if !class.is_empty() => format!("{}::{}", class, self.name),
            _ => self.name.clone(),
        }
    }

    /// Assertion count contributed to the run total
    pub fn assertion_count(&self) -> u64 {
        self.assertions.unwrap_or(1)
    }

    /// Captured output that should be echoed after the token
    pub fn echoed_output(&self) -> Option<&str> {
        if self.expects_output {
            return None;
        }
        self.output.as_deref().filter(|output| !output.is_empty())
    }
}

/// Error, failure or skip reason attached to a test
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Fault {
    pub message: String,

    /// Full rendering, including trace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Fault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Full description, falling back to the message
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.message)
    }
}
