//! Object pool for high-frequency entities
//!
//! `acquire` always re-initialises the item, so nothing from a previous
//! life can leak into a new spawn.

/// An item that can be re-initialised in place
pub trait Recycle: Default {
    type Spawn;

    fn recycle(&mut self, spawn: Self::Spawn);
}

#[derive(Debug, Clone)]
pub struct Pool<T> {
    free: Vec<T>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self { free: Vec::new() }
    }
}

impl<T: Recycle> Pool<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a pooled item (or a fresh one) initialised from `spawn`
    pub fn acquire(&mut self, spawn: T::Spawn) -> T {
        let mut item = self.free.pop().unwrap_or_default();
        item.recycle(spawn);
        item
    }

    /// Return an item for later reuse
    pub fn release(&mut self, item: T) {
        self.free.push(item);
    }

    /// Number of idle items
    pub fn len(&self) -> usize {
        self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Counter {
        value: u32,
        uses: u32,
    }

    impl Recycle for Counter {
        type Spawn = u32;

        fn recycle(&mut self, spawn: u32) {
            self.value = spawn;
            self.uses += 1;
        }
    }

    #[test]
    fn test_acquire_fresh_then_reuse() {
        let mut pool: Pool<Counter> = Pool::new();
        let a = pool.acquire(5);
        assert_eq!((a.value, a.uses), (5, 1));

        pool.release(a);
        assert_eq!(pool.len(), 1);

        let b = pool.acquire(9);
        assert_eq!((b.value, b.uses), (9, 2));
        assert!(pool.is_empty());
    }
}
