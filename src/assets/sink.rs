//! Destination for prewarmed assets.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Caller-owned collection that receives finished assets.
///
/// Notifying readers of a new entry is the sink's own business.
pub trait AssetSink<V> {
    /// Insert or replace the asset stored under `key`.
    fn set(&mut self, key: &str, value: V);
}

impl<V, H: BuildHasher> AssetSink<V> for HashMap<String, V, H> {
    fn set(&mut self, key: &str, value: V) {
        let _ = self.insert(key.to_owned(), value);
    }
}

impl<V> AssetSink<V> for BTreeMap<String, V> {
    fn set(&mut self, key: &str, value: V) {
        let _ = self.insert(key.to_owned(), value);
    }
}

#[cfg(test)]
mod tests {
    use rustc_hash::FxHashMap;

    use super::*;

    fn publish<S: AssetSink<u32>>(sink: &mut S) {
        sink.set("a", 1);
        sink.set("a", 2);
        sink.set("b", 3);
    }

    #[test]
    fn maps_overwrite_on_repeat_keys() {
        let mut fx = FxHashMap::default();
        publish(&mut fx);
        assert_eq!(fx.len(), 2);
        assert_eq!(fx["a"], 2);

        let mut ordered = BTreeMap::new();
        publish(&mut ordered);
        assert_eq!(ordered.keys().collect::<Vec<_>>(), ["a", "b"]);
    }
}
