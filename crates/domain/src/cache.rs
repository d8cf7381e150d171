/// Storage for a single value that can be dropped at any time.
///
/// A cache miss is never an error, callers fall back to the authoritative source.
pub trait Cache<T> {
    fn get(&self) -> Option<T>;
    fn put(&self, value: T);
    fn invalidate(&self);
}

/// A cache that never holds a value.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl<T> Cache<T> for NoCache {
    fn get(&self) -> Option<T> {
        None
    }

    fn put(&self, _: T) {}

    fn invalidate(&self) {}
}
