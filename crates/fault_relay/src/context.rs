use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Active theme/skin of the host site.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ThemeDescriptor {
    pub name: String,
    pub version: String,
    pub identifier: String,
}

/// Environment metadata attached to every event before delivery.
///
/// The component inventory is pass-through: whatever shape the provider
/// reports is serialized as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HostContext {
    pub site: String,
    pub runtime_version: String,
    pub framework_version: String,
    pub theme: ThemeDescriptor,
    pub components: BTreeMap<String, Value>,
}

/// Source of environment metadata, queried once per event at enrichment
/// time. Each piece is independent; a provider that cannot supply one
/// returns `None` and the agent substitutes a default.
pub trait ContextProvider: Send + Sync {
    fn site_url(&self) -> Option<String>;
    fn runtime_version(&self) -> Option<String>;
    fn framework_version(&self) -> Option<String>;
    fn theme(&self) -> Option<ThemeDescriptor>;
    fn components(&self) -> Option<BTreeMap<String, Value>>;
}

impl HostContext {
    /// Collects every context piece from the provider, defaulting whatever
    /// is unavailable. Enrichment never fails the event.
    pub fn collect(provider: &dyn ContextProvider) -> Self {
        Self {
            site: provider.site_url().unwrap_or_default(),
            runtime_version: provider.runtime_version().unwrap_or_default(),
            framework_version: provider.framework_version().unwrap_or_default(),
            theme: provider.theme().unwrap_or_default(),
            components: provider.components().unwrap_or_default(),
        }
    }
}

/// A fixed context doubles as its own provider. Useful for hosts whose
/// environment is known at boot and for tests.
impl ContextProvider for HostContext {
    fn site_url(&self) -> Option<String> {
        Some(self.site.clone())
    }

    fn runtime_version(&self) -> Option<String> {
        Some(self.runtime_version.clone())
    }

    fn framework_version(&self) -> Option<String> {
        Some(self.framework_version.clone())
    }

    fn theme(&self) -> Option<ThemeDescriptor> {
        Some(self.theme.clone())
    }

    fn components(&self) -> Option<BTreeMap<String, Value>> {
        Some(self.components.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unavailable;

    impl ContextProvider for Unavailable {
        fn site_url(&self) -> Option<String> {
            None
        }

        fn runtime_version(&self) -> Option<String> {
            None
        }

        fn framework_version(&self) -> Option<String> {
            None
        }

        fn theme(&self) -> Option<ThemeDescriptor> {
            None
        }

        fn components(&self) -> Option<BTreeMap<String, Value>> {
            None
        }
    }

    struct PartiallyAvailable;

    impl ContextProvider for PartiallyAvailable {
        fn site_url(&self) -> Option<String> {
            Some("https://example.test".to_string())
        }

        fn runtime_version(&self) -> Option<String> {
            None
        }

        fn framework_version(&self) -> Option<String> {
            Some("6.5.2".to_string())
        }

        fn theme(&self) -> Option<ThemeDescriptor> {
            None
        }

        fn components(&self) -> Option<BTreeMap<String, Value>> {
            None
        }
    }

    #[test]
    fn unavailable_pieces_default_instead_of_failing() {
        let context = HostContext::collect(&Unavailable);
        assert_eq!(context, HostContext::default());
    }

    #[test]
    fn partial_providers_keep_what_they_have() {
        let context = HostContext::collect(&PartiallyAvailable);
        assert_eq!(context.site, "https://example.test");
        assert_eq!(context.runtime_version, "");
        assert_eq!(context.framework_version, "6.5.2");
        assert_eq!(context.theme, ThemeDescriptor::default());
        assert!(context.components.is_empty());
    }

    #[test]
    fn a_fixed_context_round_trips_through_collect() {
        let fixed = HostContext {
            site: "https://example.test".to_string(),
            runtime_version: "8.3.1".to_string(),
            framework_version: "6.5.2".to_string(),
            theme: ThemeDescriptor {
                name: "Aurora".to_string(),
                version: "2.1.0".to_string(),
                identifier: "aurora".to_string(),
            },
            components: BTreeMap::from([(
                "seo-toolkit/seo-toolkit.php".to_string(),
                serde_json::json!({"Name": "SEO Toolkit", "Version": "4.0.1"}),
            )]),
        };
        assert_eq!(HostContext::collect(&fixed), fixed);
    }
}
