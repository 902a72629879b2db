//! ElementType enum naming the kinds of node in a courseware tree.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// The kinds of element a courseware tree is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElementType {
    Activity,
    Pathway,
    Interactive,
    Component,
    Feedback,
    Scenario,
}

impl ElementType {
    /// Returns all element types.
    pub fn all() -> &'static [ElementType] {
        &[
            ElementType::Activity,
            ElementType::Pathway,
            ElementType::Interactive,
            ElementType::Component,
            ElementType::Feedback,
            ElementType::Scenario,
        ]
    }

    /// Returns the upper-case tag used in event names and on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Activity => "ACTIVITY",
            ElementType::Pathway => "PATHWAY",
            ElementType::Interactive => "INTERACTIVE",
            ElementType::Component => "COMPONENT",
            ElementType::Feedback => "FEEDBACK",
            ElementType::Scenario => "SCENARIO",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                ValidationError::invalid_format("element_type", format!("unknown element type '{s}'"))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_serialized_form() {
        for element_type in ElementType::all() {
            let json = serde_json::to_string(element_type).unwrap();
            assert_eq!(json, format!("\"{}\"", element_type));
        }
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("interactive".parse::<ElementType>().unwrap(), ElementType::Interactive);
        assert_eq!("PATHWAY".parse::<ElementType>().unwrap(), ElementType::Pathway);
    }

    #[test]
    fn rejects_unknown_element_type() {
        assert!("lesson".parse::<ElementType>().is_err());
    }
}
