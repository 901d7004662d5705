//! Method registry for exported module methods
//!
//! Methods are addressed by `"<module>::<method>"`, where `<module>` is the
//! module's file name cut at its first `.` (`cpu.so` exports under `cpu::`).

use hardinfo_core::text::strend;
use hardinfo_module_api::{MethodDescriptor, MethodFn};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info};

/// Registry key for `method` exported by the module at `file_name`
pub fn method_key(file_name: &str, method: &str) -> String {
    format!("{}::{}", strend(file_name, '.'), method)
}

fn module_prefix(file_name: &str) -> String {
    format!("{}::", strend(file_name, '.'))
}

/// Process-wide table of callable module methods
#[derive(Default)]
pub struct MethodRegistry {
    methods: HashMap<String, MethodFn>,
}

impl MethodRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the methods of the module at `file_name`
    ///
    /// A key that is already present is replaced. Returns the number of
    /// methods registered.
    pub fn register(&mut self, file_name: &str, methods: Vec<MethodDescriptor>) -> usize {
        let count = methods.len();

        for method in methods {
            let key = method_key(file_name, &method.name);
            debug!(method = %key, "Registering method");
            self.methods.insert(key, method.function);
        }

        count
    }

    /// Call a method without a parameter
    ///
    /// Unknown keys yield `None`, as does a method that returns nothing.
    pub fn call(&self, key: &str) -> Option<String> {
        self.methods.get(key).and_then(|function| function(None))
    }

    /// Call a method with a parameter
    pub fn call_with_param(&self, key: &str, param: &str) -> Option<String> {
        self.methods
            .get(key)
            .and_then(|function| function(Some(param)))
    }

    /// Remove every method registered under the prefix of `file_name`
    ///
    /// Returns the number of removed methods.
    pub fn unregister_module(&mut self, file_name: &str) -> usize {
        let prefix = module_prefix(file_name);
        let before = self.methods.len();

        self.methods.retain(|key, _| !key.starts_with(&prefix));

        let removed = before - self.methods.len();
        if removed > 0 {
            info!(module = %file_name, removed, "Methods unregistered");
        }
        removed
    }

    /// Whether `key` is registered
    pub fn contains(&self, key: &str) -> bool {
        self.methods.contains_key(key)
    }

    /// Registered keys, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.methods.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Number of registered methods
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Remove everything
    pub fn clear(&mut self) {
        self.methods.clear();
    }
}

impl fmt::Debug for MethodRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodRegistry")
            .field("methods", &self.keys())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn describe() -> MethodDescriptor {
        MethodDescriptor::new("getCPUDesc", |param| {
            Some(format!("desc {}", param.unwrap_or("all")))
        })
    }

    #[test]
    fn test_method_key() {
        assert_eq!(method_key("cpu.so", "getCPUDesc"), "cpu::getCPUDesc");
        assert_eq!(method_key("devices.x86.so", "x"), "devices::x");
        assert_eq!(method_key("plain", "x"), "plain::x");
    }

    #[test]
    fn test_register_and_call() {
        let mut registry = MethodRegistry::new();
        assert_eq!(registry.register("cpu.so", vec![describe()]), 1);

        assert!(registry.contains("cpu::getCPUDesc"));
        assert_eq!(registry.call("cpu::getCPUDesc"), Some("desc all".to_string()));
        assert_eq!(
            registry.call_with_param("cpu::getCPUDesc", "core0"),
            Some("desc core0".to_string())
        );
    }

    #[test]
    fn test_unknown_method() {
        let registry = MethodRegistry::new();
        assert_eq!(registry.call("cpu::missing"), None);
        assert_eq!(registry.call_with_param("cpu::missing", "x"), None);
    }

    #[test]
    fn test_method_returning_nothing() {
        let mut registry = MethodRegistry::new();
        registry.register("mem.so", vec![MethodDescriptor::new("empty", |_| None)]);

        assert!(registry.contains("mem::empty"));
        assert_eq!(registry.call("mem::empty"), None);
    }

    #[test]
    fn test_unregister_module_uses_prefix() {
        let mut registry = MethodRegistry::new();
        registry.register("cpu.so", vec![describe()]);
        registry.register("cpufreq.so", vec![MethodDescriptor::new("getFreq", |_| None)]);

        assert_eq!(registry.unregister_module("cpu.so"), 1);
        assert!(!registry.contains("cpu::getCPUDesc"));
        assert!(registry.contains("cpufreq::getFreq"));
        assert_eq!(registry.unregister_module("cpu.so"), 0);
    }

    #[test]
    fn test_keys_sorted() {
        let mut registry = MethodRegistry::new();
        registry.register(
            "mem.so",
            vec![
                MethodDescriptor::new("b", |_| None),
                MethodDescriptor::new("a", |_| None),
            ],
        );
        assert_eq!(registry.keys(), vec!["mem::a", "mem::b"]);
        assert_eq!(registry.len(), 2);

        registry.clear();
        assert!(registry.is_empty());
    }
}
