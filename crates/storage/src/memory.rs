use std::cell::RefCell;

use rutina_domain::Cache;

/// Keeps the value for the lifetime of the page.
#[derive(Debug)]
pub struct MemoryCache<T> {
    value: RefCell<Option<T>>,
}

impl<T> Default for MemoryCache<T> {
    fn default() -> Self {
        Self {
            value: RefCell::new(None),
        }
    }
}

impl<T: Clone> Cache<T> for MemoryCache<T> {
    fn get(&self) -> Option<T> {
        self.value.borrow().clone()
    }

    fn put(&self, value: T) {
        *self.value.borrow_mut() = Some(value);
    }

    fn invalidate(&self) {
        self.value.borrow_mut().take();
    }
}
