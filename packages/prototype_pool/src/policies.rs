/// Determines what happens when a [`PrototypePool`][crate::PrototypePool] is dropped while
/// instances are still out on loan.
///
/// The pool never destroys instances when it is dropped. Free and allocated instances alike are
/// abandoned to the host, which remains responsible for them.
///
/// # Examples
///
/// ```
/// use prototype_pool::fake::FakeHost;
/// use prototype_pool::{DropPolicy, PrototypePool};
///
/// let pool = PrototypePool::builder()
///     .factory(FakeHost::new())
///     .drop_policy(DropPolicy::MustNotDropItems)
///     .build();
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub enum DropPolicy {
    /// The pool may be dropped regardless of how many instances are allocated. This is the
    /// default.
    #[default]
    MayDropItems,

    /// The pool will panic if any instance is still allocated when the pool is dropped.
    ///
    /// This is useful for catching instances that callers forgot to release.
    MustNotDropItems,
}

/// Determines what [`release()`][crate::PrototypePool::release] does to an instance before
/// putting it back into its free list.
///
/// Either way, the position, orientation and parent of a released instance are left untouched.
/// The next [`acquire()`][crate::PrototypePool::acquire] repositions it.
///
/// # Examples
///
/// ```
/// use prototype_pool::fake::FakeHost;
/// use prototype_pool::{PrototypePool, ReleasePolicy};
///
/// let pool = PrototypePool::builder()
///     .factory(FakeHost::new())
///     .release_policy(ReleasePolicy::Deactivate)
///     .build();
///
/// assert_eq!(pool.release_policy(), ReleasePolicy::Deactivate);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub enum ReleasePolicy {
    /// The instance is returned to its free list exactly as the caller left it. This is the
    /// default.
    #[default]
    Retain,

    /// The instance is deactivated via
    /// [`InstanceFactory::set_active()`][crate::InstanceFactory::set_active] before it is
    /// returned to its free list.
    Deactivate,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        assert_eq!(DropPolicy::default(), DropPolicy::MayDropItems);
        assert_eq!(ReleasePolicy::default(), ReleasePolicy::Retain);
    }
}
