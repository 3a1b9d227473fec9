//! Registry of direct provider implementations.
//!
//! An explicit, constructed registry owned by the router rather than a
//! process-wide table, so tests can substitute their own factories.

use std::collections::HashMap;

use super::anthropic::AnthropicProvider;
use super::types::{ProviderSettings, Vendor};
use super::Provider;

/// Factory building one provider instance from settings.
pub type ProviderFactory = Box<dyn Fn(ProviderSettings) -> Box<dyn Provider> + Send + Sync>;

/// Maps vendors to their direct provider factories.
///
/// A vendor absent from the registry has no direct implementation and can
/// only be reached through the gateway.
#[derive(Default)]
pub struct ProviderRegistry {
    factories: HashMap<Vendor, ProviderFactory>,
}

impl ProviderRegistry {
    /// Empty registry. Useful in tests.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in direct implementation.
    ///
    /// New vendors get added here as their providers are implemented.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(Vendor::Anthropic, |settings| {
            Box::new(AnthropicProvider::new(settings))
        });
        registry
    }

    pub fn register<F>(&mut self, vendor: Vendor, factory: F)
    where
        F: Fn(ProviderSettings) -> Box<dyn Provider> + Send + Sync + 'static,
    {
        self.factories.insert(vendor, Box::new(factory));
    }

    /// Whether a direct implementation is registered for `vendor`.
    pub fn contains(&self, vendor: Vendor) -> bool {
        self.factories.contains_key(&vendor)
    }

    /// Vendors with a registered direct implementation.
    pub fn vendors(&self) -> Vec<Vendor> {
        self.factories.keys().copied().collect()
    }

    /// Build a provider for `vendor`, or `None` if unregistered.
    pub fn build(&self, vendor: Vendor, settings: ProviderSettings) -> Option<Box<dyn Provider>> {
        self.factories.get(&vendor).map(|factory| factory(settings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registers_anthropic_only() {
        let registry = ProviderRegistry::standard();
        assert!(registry.contains(Vendor::Anthropic));
        assert!(!registry.contains(Vendor::Openai));
        assert!(!registry.contains(Vendor::Google));
        assert_eq!(registry.vendors(), vec![Vendor::Anthropic]);
    }

    #[test]
    fn test_build_unregistered_vendor_returns_none() {
        let registry = ProviderRegistry::standard();
        let settings = ProviderSettings::new("key");
        assert!(registry.build(Vendor::Groq, settings).is_none());
    }

    #[test]
    fn test_build_returns_matching_provider() {
        let registry = ProviderRegistry::standard();
        let provider = registry
            .build(Vendor::Anthropic, ProviderSettings::new("sk-ant-test"))
            .unwrap();
        assert_eq!(provider.vendor(), Vendor::Anthropic);
        assert!(!provider.is_open());
    }

    #[test]
    fn test_register_custom_factory() {
        let mut registry = ProviderRegistry::new();
        registry.register(Vendor::Anthropic, |settings| {
            Box::new(AnthropicProvider::new(settings))
        });
        assert!(registry.contains(Vendor::Anthropic));
    }
}
