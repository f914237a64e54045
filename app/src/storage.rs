use gm_api::storage::KeyValueStore;

/// Browser `localStorage`. Values are stored raw, not JSON-encoded, so they
/// stay readable by anything else on the origin.
#[cfg(feature = "web")]
#[derive(Clone, Copy, Default)]
pub struct LocalStore;

#[cfg(feature = "web")]
impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        use gloo_storage::{LocalStorage, Storage};
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        use gloo_storage::{LocalStorage, Storage};
        if let Err(e) = LocalStorage::raw().set_item(key, value) {
            tracing::warn!(key, "localStorage write failed: {:?}", e);
        }
    }

    fn remove(&self, key: &str) {
        use gloo_storage::{LocalStorage, Storage};
        if let Err(e) = LocalStorage::raw().remove_item(key) {
            tracing::warn!(key, "localStorage remove failed: {:?}", e);
        }
    }
}

/// Desktop builds keep preferences for the lifetime of the window only.
#[cfg(not(feature = "web"))]
#[derive(Clone, Default)]
pub struct LocalStore(std::rc::Rc<gm_api::storage::MemoryStore>);

#[cfg(not(feature = "web"))]
impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key)
    }

    fn set(&self, key: &str, value: &str) {
        self.0.set(key, value)
    }

    fn remove(&self, key: &str) {
        self.0.remove(key)
    }
}
