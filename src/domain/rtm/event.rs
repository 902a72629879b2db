//! Event descriptors and element-type decoration.
//!
//! An [`EventDescriptor`] names one kind of real-time notification. It
//! carries two names:
//!
//! - `canonical_name` - stable, unique per kind, emitted as `rtmEvent`
//! - `legacy_name` - emitted alongside as `action` so older clients keep
//!   working; never emitted instead of the canonical name
//!
//! Element-scoped notifications (theme change on an activity vs. on an
//! interactive) are named by [`effective_name`], a pure function of the
//! base descriptor and the element type:
//!
//! ```text
//! THEME_CHANGE + ACTIVITY    → ACTIVITY_THEME_CHANGE
//! THEME_CHANGE + INTERACTIVE → INTERACTIVE_THEME_CHANGE
//! ```

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ElementType;

/// Identifies a kind of real-time notification.
///
/// Descriptors are plain values: families declare them as `const` items and
/// scoping to an element type returns a new descriptor rather than mutating
/// the base one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDescriptor {
    canonical_name: Cow<'static, str>,
    legacy_name: Cow<'static, str>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    element_type: Option<ElementType>,
}

impl EventDescriptor {
    /// Declares an unscoped descriptor.
    pub const fn new(canonical_name: &'static str, legacy_name: &'static str) -> Self {
        Self {
            canonical_name: Cow::Borrowed(canonical_name),
            legacy_name: Cow::Borrowed(legacy_name),
            element_type: None,
        }
    }

    /// Returns this descriptor scoped to an element type.
    pub fn for_element(&self, element_type: ElementType) -> Self {
        Self {
            canonical_name: self.canonical_name.clone(),
            legacy_name: self.legacy_name.clone(),
            element_type: Some(element_type),
        }
    }

    /// The undecorated canonical name.
    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    pub fn legacy_name(&self) -> &str {
        &self.legacy_name
    }

    pub fn element_type(&self) -> Option<ElementType> {
        self.element_type
    }

    /// The name emitted as `rtmEvent`: decorated when scoped, canonical otherwise.
    pub fn effective_name(&self) -> String {
        match self.element_type {
            Some(element_type) => effective_name(self, element_type),
            None => self.canonical_name.to_string(),
        }
    }

    /// Returns the unscoped descriptor this one was derived from.
    pub fn base(&self) -> Self {
        Self {
            canonical_name: self.canonical_name.clone(),
            legacy_name: self.legacy_name.clone(),
            element_type: None,
        }
    }

    /// Whether a consumer bound to `self` should handle an event described by `other`.
    ///
    /// An unscoped descriptor matches every element scoping of the same kind;
    /// a scoped descriptor matches only that element type.
    pub fn matches(&self, other: &EventDescriptor) -> bool {
        self.canonical_name == other.canonical_name
            && self.legacy_name == other.legacy_name
            && match self.element_type {
                Some(element_type) => other.element_type == Some(element_type),
                None => true,
            }
    }
}

impl fmt::Display for EventDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.effective_name())
    }
}

/// Decorates a base descriptor's canonical name with an element type.
///
/// Always `"{ELEMENT_TYPE}_{canonical_name}"`; any scoping already on `base`
/// is ignored.
pub fn effective_name(base: &EventDescriptor, element_type: ElementType) -> String {
    format!("{}_{}", element_type, base.canonical_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const THEME_CHANGE: EventDescriptor = EventDescriptor::new("THEME_CHANGE", "THEME_CHANGED");

    #[test]
    fn unscoped_effective_name_is_canonical_name() {
        assert_eq!(THEME_CHANGE.effective_name(), "THEME_CHANGE");
        assert_eq!(THEME_CHANGE.legacy_name(), "THEME_CHANGED");
    }

    #[test]
    fn scoped_descriptor_decorates_with_element_type() {
        let scoped = THEME_CHANGE.for_element(ElementType::Activity);
        assert_eq!(scoped.effective_name(), "ACTIVITY_THEME_CHANGE");
        assert_eq!(scoped.canonical_name(), "THEME_CHANGE");
        assert_eq!(scoped.legacy_name(), "THEME_CHANGED");
    }

    #[test]
    fn scoping_does_not_mutate_base() {
        let _ = THEME_CHANGE.for_element(ElementType::Interactive);
        assert_eq!(THEME_CHANGE.element_type(), None);
    }

    #[test]
    fn rescoping_replaces_element_type() {
        let scoped = THEME_CHANGE
            .for_element(ElementType::Activity)
            .for_element(ElementType::Interactive);
        assert_eq!(scoped.effective_name(), "INTERACTIVE_THEME_CHANGE");
    }

    #[test]
    fn unscoped_descriptor_matches_every_scoping() {
        for element_type in ElementType::all() {
            assert!(THEME_CHANGE.matches(&THEME_CHANGE.for_element(*element_type)));
        }
    }

    #[test]
    fn scoped_descriptor_matches_only_its_element_type() {
        let activity = THEME_CHANGE.for_element(ElementType::Activity);
        assert!(activity.matches(&THEME_CHANGE.for_element(ElementType::Activity)));
        assert!(!activity.matches(&THEME_CHANGE.for_element(ElementType::Pathway)));
        assert!(!activity.matches(&THEME_CHANGE));
    }

    #[test]
    fn different_kinds_never_match() {
        let config_change = EventDescriptor::new("CONFIG_CHANGE", "CONFIG_CHANGED");
        assert!(!THEME_CHANGE.matches(&config_change));
    }

    #[test]
    fn base_strips_scoping() {
        let scoped = THEME_CHANGE.for_element(ElementType::Feedback);
        assert_eq!(scoped.base(), THEME_CHANGE);
    }

    #[test]
    fn descriptor_round_trips_through_json() {
        let scoped = THEME_CHANGE.for_element(ElementType::Scenario);
        let json = serde_json::to_value(&scoped).unwrap();
        assert_eq!(json["canonicalName"], "THEME_CHANGE");
        assert_eq!(json["elementType"], "SCENARIO");

        let back: EventDescriptor = serde_json::from_value(json).unwrap();
        assert_eq!(back, scoped);
    }

    fn element_type_strategy() -> impl Strategy<Value = ElementType> {
        prop::sample::select(ElementType::all().to_vec())
    }

    proptest! {
        #[test]
        fn decoration_is_element_type_underscore_canonical(
            canonical in "[A-Z][A-Z_]{0,24}",
            element_type in element_type_strategy(),
        ) {
            let base = EventDescriptor {
                canonical_name: Cow::Owned(canonical.clone()),
                legacy_name: Cow::Borrowed("LEGACY"),
                element_type: None,
            };

            prop_assert_eq!(
                effective_name(&base, element_type),
                format!("{}_{}", element_type, canonical)
            );
            prop_assert_eq!(
                base.for_element(element_type).effective_name(),
                effective_name(&base, element_type)
            );
        }
    }
}
