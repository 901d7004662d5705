//! Handling of module dependencies that are not loaded

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What to do about a dependency that is not loaded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyPolicy {
    /// Load it without asking
    Autoload,

    /// Ask the user; fail when nobody can answer
    #[default]
    Prompt,

    /// Refuse to continue
    Fail,
}

impl FromStr for DependencyPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "autoload" | "auto" => Ok(Self::Autoload),
            "prompt" | "ask" => Ok(Self::Prompt),
            "fail" | "never" => Ok(Self::Fail),
            other => Err(format!("unknown dependency policy: {other}")),
        }
    }
}

impl fmt::Display for DependencyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Autoload => "autoload",
            Self::Prompt => "prompt",
            Self::Fail => "fail",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parsing() {
        assert_eq!("autoload".parse::<DependencyPolicy>(), Ok(DependencyPolicy::Autoload));
        assert_eq!("ASK".parse::<DependencyPolicy>(), Ok(DependencyPolicy::Prompt));
        assert_eq!("fail".parse::<DependencyPolicy>(), Ok(DependencyPolicy::Fail));
        assert!("sometimes".parse::<DependencyPolicy>().is_err());
        assert_eq!(DependencyPolicy::Autoload.to_string(), "autoload");
    }

    #[test]
    fn test_policy_serde() {
        let policy: DependencyPolicy = serde_json::from_str("\"fail\"").unwrap();
        assert_eq!(policy, DependencyPolicy::Fail);
        assert_eq!(serde_json::to_string(&DependencyPolicy::default()).unwrap(), "\"prompt\"");
    }
}
