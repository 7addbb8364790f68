use std::num::NonZero;

use crate::pool::{DEFAULT_CONTAINER_NAME, DEFAULT_GROWTH_BATCH};
use crate::{DropPolicy, InstanceFactory, LocalPrototypePool, PrototypePool, ReleasePolicy};

/// Builder for creating an instance of [`PrototypePool`].
///
/// The factory is mandatory, whereas other settings are optional.
///
/// # Examples
///
/// ```
/// use new_zealand::nz;
/// use prototype_pool::fake::FakeHost;
/// use prototype_pool::{DropPolicy, PrototypePool, ReleasePolicy};
///
/// let pool = PrototypePool::builder()
///     .factory(FakeHost::new())
///     .growth_batch(nz!(4))
///     .container_name("[enemies]")
///     .release_policy(ReleasePolicy::Deactivate)
///     .drop_policy(DropPolicy::MustNotDropItems)
///     .build();
/// ```
#[derive(Debug)]
#[must_use]
pub struct PrototypePoolBuilder<F> {
    factory: Option<F>,
    growth_batch: NonZero<usize>,
    container_name: String,
    release_policy: ReleasePolicy,
    drop_policy: DropPolicy,
}

impl<F: InstanceFactory> PrototypePoolBuilder<F> {
    #[inline]
    pub(crate) fn new() -> Self {
        Self {
            factory: None,
            growth_batch: DEFAULT_GROWTH_BATCH,
            container_name: DEFAULT_CONTAINER_NAME.to_string(),
            release_policy: ReleasePolicy::default(),
            drop_policy: DropPolicy::default(),
        }
    }

    /// Sets the factory the pool uses to create, modify and destroy host instances.
    #[inline]
    pub fn factory(mut self, factory: F) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Sets how many instances [`acquire()`][PrototypePool::acquire] creates when it finds an
    /// empty free list. The default is 2.
    ///
    /// # Examples
    ///
    /// ```
    /// use new_zealand::nz;
    /// use prototype_pool::PrototypePool;
    /// use prototype_pool::fake::FakeHost;
    ///
    /// let pool = PrototypePool::builder()
    ///     .factory(FakeHost::new())
    ///     .growth_batch(nz!(16))
    ///     .build();
    ///
    /// assert_eq!(pool.growth_batch().get(), 16);
    /// ```
    #[inline]
    pub fn growth_batch(mut self, growth_batch: NonZero<usize>) -> Self {
        self.growth_batch = growth_batch;
        self
    }

    /// Sets the name of the host container that pooled instances are attached to.
    ///
    /// Pools with the same container name share one container in the host.
    #[inline]
    pub fn container_name(mut self, name: impl Into<String>) -> Self {
        self.container_name = name.into();
        self
    }

    /// Sets the [release policy][ReleasePolicy] for the pool.
    #[inline]
    pub fn release_policy(mut self, policy: ReleasePolicy) -> Self {
        self.release_policy = policy;
        self
    }

    /// Sets the [drop policy][DropPolicy] for the pool. This governs how to treat instances that
    /// are still allocated when the pool is dropped.
    #[inline]
    pub fn drop_policy(mut self, policy: DropPolicy) -> Self {
        self.drop_policy = policy;
        self
    }

    /// Builds the pool with the specified configuration.
    ///
    /// # Panics
    ///
    /// Panics if no factory has been set using [`factory()`](Self::factory).
    #[must_use]
    #[inline]
    pub fn build(self) -> PrototypePool<F> {
        let factory = self
            .factory
            .expect("factory must be set using .factory() before calling .build()");

        PrototypePool::new_inner(
            factory,
            self.growth_batch,
            self.container_name,
            self.release_policy,
            self.drop_policy,
        )
    }

    /// Builds the pool and wraps it in a [`LocalPrototypePool`] for shared single-threaded use.
    ///
    /// # Panics
    ///
    /// Panics if no factory has been set using [`factory()`](Self::factory).
    #[must_use]
    #[inline]
    pub fn build_local(self) -> LocalPrototypePool<F> {
        LocalPrototypePool::from(self.build())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use new_zealand::nz;
    use static_assertions::assert_impl_all;

    use super::*;
    use crate::fake::FakeHost;

    assert_impl_all!(PrototypePoolBuilder<FakeHost>: Send, std::fmt::Debug);

    #[test]
    fn builder_new_creates_default_state() {
        let builder = PrototypePoolBuilder::<FakeHost>::new();

        assert!(builder.factory.is_none());
        assert_eq!(builder.growth_batch, DEFAULT_GROWTH_BATCH);
        assert_eq!(builder.container_name, DEFAULT_CONTAINER_NAME);
        assert_eq!(builder.release_policy, ReleasePolicy::Retain);
        assert_eq!(builder.drop_policy, DropPolicy::MayDropItems);
    }

    #[test]
    fn settings_reach_the_pool() {
        let pool = PrototypePoolBuilder::new()
            .factory(FakeHost::new())
            .growth_batch(nz!(5))
            .container_name("[custom]")
            .release_policy(ReleasePolicy::Deactivate)
            .drop_policy(DropPolicy::MustNotDropItems)
            .build();

        assert_eq!(pool.growth_batch().get(), 5);
        assert_eq!(pool.container_name(), "[custom]");
        assert_eq!(pool.release_policy(), ReleasePolicy::Deactivate);
        assert_eq!(pool.drop_policy(), DropPolicy::MustNotDropItems);
    }

    #[test]
    fn later_settings_override_earlier_ones() {
        let pool = PrototypePoolBuilder::new()
            .growth_batch(nz!(5))
            .container_name("[first]")
            .factory(FakeHost::new())
            .growth_batch(nz!(7))
            .container_name("[second]")
            .build();

        assert_eq!(pool.growth_batch().get(), 7);
        assert_eq!(pool.container_name(), "[second]");
    }

    #[test]
    fn build_local_wraps_configured_pool() {
        let pool = PrototypePoolBuilder::new()
            .factory(FakeHost::new())
            .growth_batch(nz!(3))
            .build_local();

        assert_eq!(pool.growth_batch().get(), 3);
    }

    #[test]
    #[should_panic]
    fn build_without_factory_panics() {
        let _pool = PrototypePoolBuilder::<FakeHost>::new().build();
    }
}
