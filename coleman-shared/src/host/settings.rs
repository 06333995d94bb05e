//! Key/value settings registry shared between a host and its plugins.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use dashmap::DashMap;

use super::ColemanHost;

/// A value stored in the settings registry.
pub type SettingValue = Arc<dyn Any + Send + Sync>;

/// Concurrent settings registry backing [`ColemanHost::set_setting`] and
/// [`ColemanHost::setting`].
#[derive(Default)]
pub struct SettingsRegistry {
    values: DashMap<String, SettingValue>,
}

impl SettingsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn set(&self, key: impl Into<String>, value: SettingValue) {
        let key = key.into();
        if self.values.insert(key.clone(), value).is_some() {
            tracing::debug!(key = %key, "Replaced existing setting");
        } else {
            tracing::debug!(key = %key, "Stored setting");
        }
    }

    pub fn get(&self, key: &str) -> Option<SettingValue> {
        self.values.get(key).map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sorted list of stored keys.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.values.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }
}

impl fmt::Debug for SettingsRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}

/// Named, typed slot in the settings registry.
///
/// Lets producers and consumers of a setting agree on both its key and its
/// type without sharing anything but the slot constant:
///
/// ```
/// use std::sync::Arc;
/// use coleman_shared::{ColemanApp, SettingKey};
///
/// const GREETING: SettingKey<String> = SettingKey::new("greeting");
///
/// let app = ColemanApp::new();
/// GREETING.publish(&app, Arc::new("hello".to_string()));
/// assert_eq!(GREETING.fetch(&app).as_deref().map(String::as_str), Some("hello"));
/// ```
pub struct SettingKey<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> SettingKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T: Any + Send + Sync> SettingKey<T> {
    /// Write `value` into the host's registry under this slot.
    pub fn publish(&self, host: &dyn ColemanHost, value: Arc<T>) {
        host.set_setting(self.name, value);
    }

    /// Read this slot from the host's registry.
    ///
    /// Returns `None` when the slot is empty or holds a value of another type.
    pub fn fetch(&self, host: &dyn ColemanHost) -> Option<Arc<T>> {
        host.setting(self.name)?.downcast::<T>().ok()
    }
}

impl<T> Clone for SettingKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SettingKey<T> {}

impl<T> fmt::Debug for SettingKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SettingKey").field(&self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ColemanApp;

    #[test]
    fn test_set_and_get() {
        let registry = SettingsRegistry::new();
        assert!(registry.is_empty());

        registry.set("answer", Arc::new(42_u32));
        let value = registry.get("answer").unwrap();
        assert_eq!(value.downcast_ref::<u32>(), Some(&42));
        assert!(registry.contains("answer"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_set_replaces_previous_value() {
        let registry = SettingsRegistry::new();
        registry.set("mode", Arc::new("debug".to_string()));
        registry.set("mode", Arc::new("release".to_string()));

        let value = registry.get("mode").unwrap();
        assert_eq!(value.downcast_ref::<String>().unwrap(), "release");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_missing_key() {
        let registry = SettingsRegistry::new();
        assert!(registry.get("nope").is_none());
    }

    #[test]
    fn test_keys_sorted() {
        let registry = SettingsRegistry::new();
        registry.set("b", Arc::new(()));
        registry.set("a", Arc::new(()));
        assert_eq!(registry.keys(), vec!["a", "b"]);
    }

    #[test]
    fn test_typed_slot_round_trip() {
        const SLOT: SettingKey<Vec<u8>> = SettingKey::new("bytes");
        let app = ColemanApp::new();

        assert!(SLOT.fetch(&app).is_none());
        let value = Arc::new(vec![1, 2, 3]);
        SLOT.publish(&app, Arc::clone(&value));

        let fetched = SLOT.fetch(&app).unwrap();
        assert!(Arc::ptr_eq(&fetched, &value));
    }

    #[test]
    fn test_typed_slot_rejects_wrong_type() {
        const AS_STRING: SettingKey<String> = SettingKey::new("shared");
        const AS_NUMBER: SettingKey<u64> = SettingKey::new("shared");
        let app = ColemanApp::new();

        AS_NUMBER.publish(&app, Arc::new(7));
        assert!(AS_STRING.fetch(&app).is_none());
        assert_eq!(AS_NUMBER.fetch(&app).as_deref(), Some(&7));
    }
}
