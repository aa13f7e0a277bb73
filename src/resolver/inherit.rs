//! Attribute inheritance with write protection

use serde::Deserialize;

use crate::node::Attributes;

/// What happens when a child declares a key its parent also has
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InheritancePolicy {
    /// The child's own value is kept
    #[default]
    ChildWins,
    /// The parent's value replaces the child's, unless the child
    /// write-protected the key
    ParentWins,
}

/// The bare key of a write-protected key (`~color` -> `color`)
pub fn protected_key<'k>(key: &'k str, marker: &str) -> Option<&'k str> {
    if marker.is_empty() {
        return None;
    }
    key.strip_prefix(marker).filter(|bare| !bare.is_empty())
}

/// Strip the write-protection marker, if present
pub fn strip_marker<'k>(key: &'k str, marker: &str) -> &'k str {
    protected_key(key, marker).unwrap_or(key)
}

/// Combine a node's own raw attributes with its parent's attributes.
///
/// `own` holds keys as written, markers included. A protected key
/// `~key` stops the parent's `key` from being inherited and is stored as
/// plain `key`; when both `key` and `~key` are declared the protected value
/// is kept. The result never contains a marked key.
pub fn merge_attributes(
    parent: Option<&Attributes>,
    own: &Attributes,
    marker: &str,
    policy: InheritancePolicy,
) -> Attributes {
    let mut merged = Attributes::with_capacity(own.len());

    for (key, value) in own {
        if protected_key(key, marker).is_none() {
            merged.insert(key.clone(), value.clone());
        }
    }
    for (key, value) in own {
        if let Some(bare) = protected_key(key, marker) {
            merged.insert(bare.to_owned(), value.clone());
        }
    }

    let Some(parent) = parent else {
        return merged;
    };

    for (key, value) in parent {
        let blocked = own
            .keys()
            .any(|own_key| protected_key(own_key, marker) == Some(key.as_str()));
        if blocked {
            continue;
        }
        match policy {
            InheritancePolicy::ChildWins => {
                merged.entry(key.clone()).or_insert_with(|| value.clone());
            }
            InheritancePolicy::ParentWins => {
                merged.insert(key.clone(), value.clone());
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_yaml::Value;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::from(*v)))
            .collect()
    }

    #[test]
    fn test_protected_key() {
        assert_eq!(protected_key("~color", "~"), Some("color"));
        assert_eq!(protected_key("color", "~"), None);
        assert_eq!(protected_key("~", "~"), None);
        assert_eq!(protected_key("!!color", "!!"), Some("color"));
        assert_eq!(protected_key("~color", ""), None);
        assert_eq!(strip_marker("~color", "~"), "color");
        assert_eq!(strip_marker("color", "~"), "color");
    }

    #[test]
    fn test_no_parent_consumes_markers() {
        let own = attrs(&[("~color", "blue"), ("size", "2")]);
        let merged = merge_attributes(None, &own, "~", InheritancePolicy::ChildWins);
        assert_eq!(merged, attrs(&[("size", "2"), ("color", "blue")]));
    }

    #[test]
    fn test_inherits_missing_keys() {
        let parent = attrs(&[("color", "red"), ("title", "Home")]);
        let own = attrs(&[("size", "2")]);
        let merged = merge_attributes(Some(&parent), &own, "~", InheritancePolicy::ChildWins);
        assert_eq!(
            merged,
            attrs(&[("size", "2"), ("color", "red"), ("title", "Home")])
        );
    }

    #[test]
    fn test_write_protection_blocks_inheritance() {
        let parent = attrs(&[("color", "red")]);
        let own = attrs(&[("~color", "blue")]);
        for policy in [InheritancePolicy::ChildWins, InheritancePolicy::ParentWins] {
            let merged = merge_attributes(Some(&parent), &own, "~", policy);
            assert_eq!(merged, attrs(&[("color", "blue")]));
        }
    }

    #[test]
    fn test_child_wins_policy() {
        let parent = attrs(&[("color", "red")]);
        let own = attrs(&[("color", "green")]);
        let merged = merge_attributes(Some(&parent), &own, "~", InheritancePolicy::ChildWins);
        assert_eq!(merged, attrs(&[("color", "green")]));
    }

    #[test]
    fn test_parent_wins_policy() {
        let parent = attrs(&[("color", "red")]);
        let own = attrs(&[("color", "green")]);
        let merged = merge_attributes(Some(&parent), &own, "~", InheritancePolicy::ParentWins);
        assert_eq!(merged, attrs(&[("color", "red")]));
    }

    #[test]
    fn test_protected_value_beats_plain_declaration() {
        let own = attrs(&[("~color", "blue"), ("color", "green")]);
        let merged = merge_attributes(None, &own, "~", InheritancePolicy::ChildWins);
        assert_eq!(merged, attrs(&[("color", "blue")]));
    }

    #[test]
    fn test_policy_parses_kebab_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            policy: InheritancePolicy,
        }
        let parsed: Wrapper = toml::from_str("policy = \"parent-wins\"").expect("Should parse");
        assert_eq!(parsed.policy, InheritancePolicy::ParentWins);
    }
}
