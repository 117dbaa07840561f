//! In-memory router for headless use and tests.

use std::collections::HashMap;
use std::sync::Mutex;

use shiftspace_core::sources::Router;

/// A [`Router`] that records navigations instead of driving a real
/// navigation surface.
pub struct MemoryRouter {
    path: Mutex<String>,
    query: Mutex<HashMap<String, String>>,
    history: Mutex<Vec<(String, bool)>>,
}

impl MemoryRouter {
    pub fn new(initial_path: impl Into<String>) -> Self {
        Self {
            path: Mutex::new(initial_path.into()),
            query: Mutex::new(HashMap::new()),
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn set_path(&self, path: impl Into<String>) {
        *self.path.lock().unwrap() = path.into();
    }

    pub fn set_query(&self, key: impl Into<String>, value: impl Into<String>) {
        self.query
            .lock()
            .unwrap()
            .insert(key.into(), value.into());
    }

    /// All navigations issued so far, as `(path, replace)` pairs.
    pub fn navigations(&self) -> Vec<(String, bool)> {
        self.history.lock().unwrap().clone()
    }
}

impl Router for MemoryRouter {
    fn current_path(&self) -> String {
        self.path.lock().unwrap().clone()
    }

    fn current_query(&self) -> HashMap<String, String> {
        self.query.lock().unwrap().clone()
    }

    fn navigate(&self, path: &str, replace: bool) {
        *self.path.lock().unwrap() = path.to_string();
        self.history
            .lock()
            .unwrap()
            .push((path.to_string(), replace));
    }
}
