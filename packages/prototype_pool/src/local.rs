use std::cell::RefCell;
use std::fmt;
use std::num::NonZero;
use std::rc::Rc;

use crate::{InstanceFactory, Orientation, Position, PrototypePool, PrototypePoolBuilder, Result};

/// A single-threaded, cloneable handle to a shared [`PrototypePool`].
///
/// Every clone addresses the same pool, so any part of a program running on the same thread can
/// acquire and release instances without threading a `&mut PrototypePool` through every call.
/// The pool lives as long as at least one handle exists.
///
/// # Single-threaded Design
///
/// This type is designed for single-threaded use and is neither [`Send`] nor [`Sync`].
///
/// # Example
///
/// ```rust
/// use prototype_pool::LocalPrototypePool;
/// use prototype_pool::fake::FakeHost;
/// use prototype_pool::{Orientation, Position};
///
/// let mut host = FakeHost::new();
/// let spark = host.define_prototype("Spark");
///
/// let pool = LocalPrototypePool::new(host);
/// let emitter = pool.clone();
///
/// let instance = emitter
///     .acquire(spark, Position::ORIGIN, Orientation::IDENTITY)
///     .unwrap();
///
/// // Any handle can release it.
/// assert!(pool.release(instance));
/// assert_eq!(emitter.free_len(spark), 2);
/// ```
pub struct LocalPrototypePool<F: InstanceFactory> {
    inner: Rc<RefCell<PrototypePool<F>>>,
}

impl<F: InstanceFactory> From<PrototypePool<F>> for LocalPrototypePool<F> {
    /// Wraps an existing pool, keeping its configuration and contents.
    fn from(pool: PrototypePool<F>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(pool)),
        }
    }
}

impl<F: InstanceFactory> LocalPrototypePool<F> {
    /// Creates a shared pool with default configuration.
    #[must_use]
    pub fn new(factory: F) -> Self {
        Self::from(PrototypePool::new(factory))
    }

    /// Returns a builder for creating a pool with custom configuration.
    ///
    /// Finish with [`build_local()`][PrototypePoolBuilder::build_local] to get a
    /// [`LocalPrototypePool`].
    pub fn builder() -> PrototypePoolBuilder<F> {
        PrototypePool::builder()
    }

    /// See [`PrototypePool::register_prototype()`].
    pub fn register_prototype(&self, prototype: F::Prototype) {
        self.inner.borrow_mut().register_prototype(prototype);
    }

    /// See [`PrototypePool::refill()`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Spawn`][crate::Error::Spawn] if the host fails to create an instance.
    ///
    /// # Panics
    ///
    /// Panics if called re-entrantly from within the factory.
    pub fn refill(&self, prototype: F::Prototype, quantity: usize, position: Position) -> Result<()> {
        self.inner
            .borrow_mut()
            .refill(prototype, quantity, position)
    }

    /// See [`PrototypePool::acquire()`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Spawn`][crate::Error::Spawn] if the pool needs to grow and the host fails
    /// to create an instance.
    ///
    /// # Panics
    ///
    /// Panics if called re-entrantly from within the factory.
    pub fn acquire(
        &self,
        prototype: F::Prototype,
        position: Position,
        orientation: Orientation,
    ) -> Result<F::Instance> {
        self.inner
            .borrow_mut()
            .acquire(prototype, position, orientation)
    }

    /// See [`PrototypePool::release()`].
    pub fn release(&self, instance: F::Instance) -> bool {
        self.inner.borrow_mut().release(instance)
    }

    /// See [`PrototypePool::flush()`].
    pub fn flush(&self, prototype: F::Prototype) {
        self.inner.borrow_mut().flush(prototype);
    }

    /// See [`PrototypePool::flush_all()`].
    pub fn flush_all(&self) {
        self.inner.borrow_mut().flush_all();
    }

    /// See [`PrototypePool::free_len()`].
    #[must_use]
    pub fn free_len(&self, prototype: F::Prototype) -> usize {
        self.inner.borrow().free_len(prototype)
    }

    /// See [`PrototypePool::allocated_len()`].
    #[must_use]
    pub fn allocated_len(&self) -> usize {
        self.inner.borrow().allocated_len()
    }

    /// See [`PrototypePool::is_allocated()`].
    #[must_use]
    pub fn is_allocated(&self, instance: F::Instance) -> bool {
        self.inner.borrow().is_allocated(instance)
    }

    /// See [`PrototypePool::prototype_of()`].
    #[must_use]
    pub fn prototype_of(&self, instance: F::Instance) -> Option<F::Prototype> {
        self.inner.borrow().prototype_of(instance)
    }

    /// See [`PrototypePool::is_registered()`].
    #[must_use]
    pub fn is_registered(&self, prototype: F::Prototype) -> bool {
        self.inner.borrow().is_registered(prototype)
    }

    /// See [`PrototypePool::growth_batch()`].
    #[must_use]
    pub fn growth_batch(&self) -> NonZero<usize> {
        self.inner.borrow().growth_batch()
    }

    /// Runs `f` with shared access to the underlying pool.
    pub fn with_pool<R>(&self, f: impl FnOnce(&PrototypePool<F>) -> R) -> R {
        f(&self.inner.borrow())
    }

    /// Runs `f` with exclusive access to the underlying pool.
    ///
    /// # Panics
    ///
    /// Panics if `f` uses another handle to the same pool.
    pub fn with_pool_mut<R>(&self, f: impl FnOnce(&mut PrototypePool<F>) -> R) -> R {
        f(&mut self.inner.borrow_mut())
    }
}

impl<F: InstanceFactory> Clone for LocalPrototypePool<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<F: InstanceFactory> fmt::Debug for LocalPrototypePool<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(pool) => f.debug_struct("LocalPrototypePool").field("inner", &*pool).finish(),
            Err(_) => f
                .debug_struct("LocalPrototypePool")
                .finish_non_exhaustive(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use static_assertions::assert_not_impl_any;

    use super::*;
    use crate::fake::FakeHost;

    assert_not_impl_any!(LocalPrototypePool<FakeHost>: Send, Sync);

    #[test]
    fn clones_share_one_pool() {
        let mut host = FakeHost::new();
        let cube = host.define_prototype("Cube");

        let pool = LocalPrototypePool::new(host);
        let other = pool.clone();

        pool.refill(cube, 3, Position::ORIGIN).unwrap();
        assert_eq!(other.free_len(cube), 3);

        let instance = other
            .acquire(cube, Position::ORIGIN, Orientation::IDENTITY)
            .unwrap();
        assert!(pool.is_allocated(instance));
        assert_eq!(pool.prototype_of(instance), Some(cube));

        assert!(pool.release(instance));
        assert!(!other.release(instance));
        assert_eq!(other.allocated_len(), 0);

        other.flush(cube);
        assert_eq!(pool.free_len(cube), 0);
        pool.with_pool(|inner| assert_eq!(inner.factory().alive_count(), 0));
    }

    #[test]
    fn register_and_flush_all() {
        let mut host = FakeHost::new();
        let cube = host.define_prototype("Cube");
        let sphere = host.define_prototype("Sphere");

        let pool = LocalPrototypePool::new(host);
        pool.register_prototype(cube);
        pool.refill(sphere, 1, Position::ORIGIN).unwrap();

        assert!(pool.is_registered(cube));
        assert!(pool.is_registered(sphere));

        pool.flush_all();
        assert_eq!(pool.free_len(sphere), 0);
    }

    #[test]
    fn with_pool_mut_reaches_factory() {
        let mut host = FakeHost::new();
        let cube = host.define_prototype("Cube");
        let pool = LocalPrototypePool::new(host);

        pool.refill(cube, 1, Position::ORIGIN).unwrap();
        pool.with_pool_mut(|inner| inner.factory_mut().limit_spawns(0));

        // The free instance is reused; only the growth after it would fail.
        pool.acquire(cube, Position::ORIGIN, Orientation::IDENTITY)
            .unwrap();
        assert!(
            pool.acquire(cube, Position::ORIGIN, Orientation::IDENTITY)
                .is_err()
        );
    }

    #[test]
    fn from_keeps_existing_contents() {
        let mut host = FakeHost::new();
        let cube = host.define_prototype("Cube");
        let mut raw = PrototypePool::new(host);
        raw.refill(cube, 2, Position::ORIGIN).unwrap();

        let pool = LocalPrototypePool::from(raw);

        assert_eq!(pool.free_len(cube), 2);
    }

    #[test]
    fn debug_output_includes_pool() {
        let pool = LocalPrototypePool::new(FakeHost::new());

        let output = format!("{pool:?}");

        assert!(output.contains("LocalPrototypePool"));
        assert!(output.contains("allocated_count"));
    }
}
