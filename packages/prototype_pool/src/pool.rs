use std::any::type_name;
use std::collections::VecDeque;
use std::fmt;
use std::num::NonZero;
use std::thread;

use foldhash::{HashMap, HashMapExt};
use new_zealand::nz;
use tracing::{debug, trace, warn};

use crate::metrics::{ACQUIRED, DESTROYED, RELEASE_REJECTED, RELEASED, SPAWNED, STALE_DISCARDED};
use crate::{
    DropPolicy, Error, InstanceFactory, Orientation, Position, PrototypePoolBuilder,
    ReleasePolicy, Result,
};

/// How many instances [`PrototypePool::acquire()`] creates when it finds an empty free list.
///
/// Growing by more than one avoids paying the growth bookkeeping on every single acquire when a
/// caller keeps acquiring without releasing.
pub(crate) const DEFAULT_GROWTH_BATCH: NonZero<usize> = nz!(2);

/// Name of the container that pooled instances are attached to, unless configured otherwise.
pub(crate) const DEFAULT_CONTAINER_NAME: &str = "[prototype_pool]";

/// Recycles host instances per prototype instead of destroying and recreating them.
///
/// The pool keeps a FIFO free list of ready-to-use instances for every prototype it has seen and
/// remembers which prototype each handed-out instance came from, so that
/// [`release()`](Self::release) only needs the instance itself.
///
/// Every instance the pool knows about is in exactly one place at a time:
///
/// * **Free** - waiting in its prototype's free list.
/// * **Allocated** - handed out by [`acquire()`](Self::acquire) and not yet released.
///
/// The host owns the actual objects and may destroy them behind the pool's back. Free list
/// entries that are no longer alive are skipped and forgotten when the pool comes across them.
///
/// The pool owns its [`InstanceFactory`] and does all host interaction through it.
///
/// # Example
///
/// ```rust
/// use prototype_pool::fake::FakeHost;
/// use prototype_pool::{Orientation, Position, PrototypePool};
///
/// let mut host = FakeHost::new();
/// let cube = host.define_prototype("Cube");
///
/// let mut pool = PrototypePool::new(host);
///
/// // Pre-warm the pool so the first acquires do not have to create anything.
/// pool.refill(cube, 2, Position::ORIGIN).unwrap();
/// assert_eq!(pool.free_len(cube), 2);
///
/// let instance = pool
///     .acquire(cube, Position::new(1.0, 0.0, 0.0), Orientation::IDENTITY)
///     .unwrap();
/// assert!(pool.is_allocated(instance));
/// assert_eq!(pool.free_len(cube), 1);
///
/// // Put it back for reuse - no prototype needed.
/// assert!(pool.release(instance));
/// assert_eq!(pool.free_len(cube), 2);
///
/// // Destroy everything that is sitting idle.
/// pool.flush(cube);
/// assert_eq!(pool.free_len(cube), 0);
/// ```
///
/// # Thread safety
///
/// The pool is designed for single-threaded use. It is [`Send`] if the factory is but every
/// operation reads and then writes shared bookkeeping, so sharing it between threads requires
/// external synchronization. For shared access from multiple places on one thread, use
/// [`LocalPrototypePool`][crate::LocalPrototypePool].
pub struct PrototypePool<F: InstanceFactory> {
    factory: F,

    /// Instances ready to be handed out, per prototype, oldest first.
    ///
    /// A prototype gets an entry the first time any mutating operation references it and keeps
    /// it for the lifetime of the pool, even when its free list is flushed.
    free: HashMap<F::Prototype, VecDeque<F::Instance>>,

    /// Prototype of every instance that is currently handed out.
    allocations: HashMap<F::Instance, F::Prototype>,

    /// Looked up from the factory the first time an instance needs a parent.
    container: Option<F::Container>,

    container_name: String,
    growth_batch: NonZero<usize>,
    release_policy: ReleasePolicy,
    drop_policy: DropPolicy,
}

impl<F: InstanceFactory> PrototypePool<F> {
    /// Creates a pool with default configuration that uses `factory` to talk to the host.
    ///
    /// # Example
    ///
    /// ```rust
    /// use prototype_pool::PrototypePool;
    /// use prototype_pool::fake::FakeHost;
    ///
    /// let pool = PrototypePool::new(FakeHost::new());
    ///
    /// assert_eq!(pool.allocated_len(), 0);
    /// assert_eq!(pool.growth_batch().get(), 2);
    /// ```
    #[must_use]
    pub fn new(factory: F) -> Self {
        Self::builder().factory(factory).build()
    }

    /// Creates a builder for configuring and constructing a [`PrototypePool`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use new_zealand::nz;
    /// use prototype_pool::PrototypePool;
    /// use prototype_pool::fake::FakeHost;
    ///
    /// let pool = PrototypePool::builder()
    ///     .factory(FakeHost::new())
    ///     .growth_batch(nz!(8))
    ///     .container_name("[bullets]")
    ///     .build();
    ///
    /// assert_eq!(pool.growth_batch().get(), 8);
    /// assert_eq!(pool.container_name(), "[bullets]");
    /// ```
    #[inline]
    pub fn builder() -> PrototypePoolBuilder<F> {
        PrototypePoolBuilder::new()
    }

    #[must_use]
    pub(crate) fn new_inner(
        factory: F,
        growth_batch: NonZero<usize>,
        container_name: String,
        release_policy: ReleasePolicy,
        drop_policy: DropPolicy,
    ) -> Self {
        Self {
            factory,
            free: HashMap::new(),
            allocations: HashMap::new(),
            container: None,
            container_name,
            growth_batch,
            release_policy,
            drop_policy,
        }
    }

    /// Ensures the pool has a (possibly empty) free list for `prototype`.
    ///
    /// Calling this is never required because every mutating operation registers the prototype
    /// it is given. It exists for callers that want [`prototypes()`](Self::prototypes) to list a
    /// prototype before anything has been created for it. Does not interact with the host.
    ///
    /// # Example
    ///
    /// ```rust
    /// use prototype_pool::PrototypePool;
    /// use prototype_pool::fake::FakeHost;
    ///
    /// let mut host = FakeHost::new();
    /// let cube = host.define_prototype("Cube");
    /// let mut pool = PrototypePool::new(host);
    ///
    /// assert!(!pool.is_registered(cube));
    ///
    /// pool.register_prototype(cube);
    /// pool.register_prototype(cube);
    ///
    /// assert!(pool.is_registered(cube));
    /// assert_eq!(pool.free_len(cube), 0);
    /// ```
    pub fn register_prototype(&mut self, prototype: F::Prototype) {
        self.free.entry(prototype).or_default();
    }

    /// Ensures at least `quantity` instances of `prototype` are waiting in its free list.
    ///
    /// Creates exactly as many instances as are missing, places them at `position` with
    /// [`Orientation::IDENTITY`], attaches them to the pool's container, deactivates them and
    /// appends them to the free list in creation order. Does nothing if the free list is already
    /// long enough. Allocated instances do not count towards the quantity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Spawn`] if the host fails to create an instance. Instances created
    /// before the failure remain in the free list.
    ///
    /// # Example
    ///
    /// ```rust
    /// use prototype_pool::fake::FakeHost;
    /// use prototype_pool::{Position, PrototypePool};
    ///
    /// let mut host = FakeHost::new();
    /// let cube = host.define_prototype("Cube");
    /// let mut pool = PrototypePool::new(host);
    ///
    /// pool.refill(cube, 3, Position::ORIGIN).unwrap();
    /// assert_eq!(pool.free_len(cube), 3);
    ///
    /// // Already satisfied - nothing new is created.
    /// pool.refill(cube, 2, Position::ORIGIN).unwrap();
    /// assert_eq!(pool.free_len(cube), 3);
    /// assert_eq!(pool.factory().spawned_count(), 3);
    /// ```
    pub fn refill(
        &mut self,
        prototype: F::Prototype,
        quantity: usize,
        position: Position,
    ) -> Result<()> {
        let free_count = self.free.entry(prototype).or_default().len();
        let needed = quantity.saturating_sub(free_count);

        if needed == 0 {
            return Ok(());
        }

        debug!(?prototype, free_count, needed, "refilling free list");

        for _ in 0..needed {
            let instance = self
                .factory
                .spawn(prototype, position, Orientation::IDENTITY)
                .map_err(|source| Error::Spawn {
                    prototype: format!("{prototype:?}"),
                    source: Box::new(source),
                })?;

            self.attach_to_container(instance);
            self.factory.set_active(instance, false);

            self.free.entry(prototype).or_default().push_back(instance);
            SPAWNED.with(|event| event.observe_once());
        }

        Ok(())
    }

    /// Hands out an instance of `prototype`, placed at `position` with `orientation`.
    ///
    /// The oldest entry of the free list is reused first. If the free list is empty, the pool
    /// first grows it by the configured [growth batch](Self::growth_batch), creating the new
    /// instances at `position`. Entries that the host has destroyed in the meantime are discarded
    /// along the way.
    ///
    /// The returned instance is alive, active, attached to the pool's container and tracked as
    /// allocated until it is passed to [`release()`](Self::release).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Spawn`] if the pool needs to grow and the host fails to create an
    /// instance. An empty pool is never an error by itself.
    ///
    /// # Example
    ///
    /// ```rust
    /// use prototype_pool::fake::FakeHost;
    /// use prototype_pool::{Orientation, Position, PrototypePool};
    ///
    /// let mut host = FakeHost::new();
    /// let cube = host.define_prototype("Cube");
    /// let mut pool = PrototypePool::new(host);
    ///
    /// // The pool was never filled, so it grows on demand.
    /// let instance = pool
    ///     .acquire(cube, Position::new(4.0, 0.0, 0.0), Orientation::IDENTITY)
    ///     .unwrap();
    ///
    /// assert_eq!(pool.prototype_of(instance), Some(cube));
    /// assert_eq!(pool.factory().position(instance), Position::new(4.0, 0.0, 0.0));
    /// ```
    #[cfg_attr(test, mutants::skip)] // Mutating the liveness check can loop forever.
    pub fn acquire(
        &mut self,
        prototype: F::Prototype,
        position: Position,
        orientation: Orientation,
    ) -> Result<F::Instance> {
        loop {
            let Some(instance) = self.free.entry(prototype).or_default().pop_front() else {
                debug!(
                    ?prototype,
                    growth_batch = self.growth_batch.get(),
                    "free list is empty, growing"
                );

                // A successful refill always leaves live entries behind, so the next pop
                // either succeeds or we grow again after the host destroyed them all.
                self.refill(prototype, self.growth_batch.get(), position)?;
                continue;
            };

            if !self.factory.is_alive(instance) {
                trace!(?prototype, ?instance, "discarding stale free list entry");
                STALE_DISCARDED.with(|event| event.observe_once());
                continue;
            }

            self.factory.set_active(instance, true);
            self.attach_to_container(instance);
            self.factory.set_transform(instance, position, orientation);

            self.allocations.insert(instance, prototype);

            trace!(?prototype, ?instance, "acquired instance");
            ACQUIRED.with(|event| event.observe_once());

            return Ok(instance);
        }
    }

    /// Returns an instance obtained from [`acquire()`](Self::acquire) to the tail of its
    /// prototype's free list.
    ///
    /// Returns `true` if the instance was allocated from this pool. Returns `false` without
    /// changing anything if the pool does not know the instance, either because it never came
    /// from this pool or because it has already been released.
    ///
    /// The position, orientation and parent of the instance are left as they are. With
    /// [`ReleasePolicy::Deactivate`] the instance is also deactivated.
    ///
    /// # Example
    ///
    /// ```rust
    /// use prototype_pool::fake::FakeHost;
    /// use prototype_pool::{Orientation, Position, PrototypePool};
    ///
    /// let mut host = FakeHost::new();
    /// let cube = host.define_prototype("Cube");
    /// let mut pool = PrototypePool::new(host);
    ///
    /// let instance = pool
    ///     .acquire(cube, Position::ORIGIN, Orientation::IDENTITY)
    ///     .unwrap();
    ///
    /// assert!(pool.release(instance));
    ///
    /// // Already back in the free list, so the pool does not consider it "out" anymore.
    /// assert!(!pool.release(instance));
    /// ```
    pub fn release(&mut self, instance: F::Instance) -> bool {
        let Some(prototype) = self.allocations.remove(&instance) else {
            trace!(?instance, "ignoring release of unknown instance");
            RELEASE_REJECTED.with(|event| event.observe_once());
            return false;
        };

        match self.release_policy {
            ReleasePolicy::Retain => {}
            ReleasePolicy::Deactivate => self.factory.set_active(instance, false),
        }

        self.free.entry(prototype).or_default().push_back(instance);

        trace!(?prototype, ?instance, "released instance");
        RELEASED.with(|event| event.observe_once());

        true
    }

    /// Destroys every instance waiting in the free list of `prototype` and empties the list.
    ///
    /// Entries the host has already destroyed are dropped without another destroy call.
    /// Allocated instances are not affected: they stay allocated and can still be released
    /// afterwards, which puts them into the now empty free list. Release instances before
    /// flushing if they should be destroyed too.
    ///
    /// Does nothing for a prototype the pool has never seen.
    ///
    /// # Example
    ///
    /// ```rust
    /// use prototype_pool::fake::FakeHost;
    /// use prototype_pool::{Orientation, Position, PrototypePool};
    ///
    /// let mut host = FakeHost::new();
    /// let cube = host.define_prototype("Cube");
    /// let mut pool = PrototypePool::new(host);
    ///
    /// pool.refill(cube, 3, Position::ORIGIN).unwrap();
    /// let out = pool
    ///     .acquire(cube, Position::ORIGIN, Orientation::IDENTITY)
    ///     .unwrap();
    ///
    /// pool.flush(cube);
    ///
    /// assert_eq!(pool.free_len(cube), 0);
    /// assert!(pool.is_allocated(out));
    /// assert_eq!(pool.factory().alive_count(), 1);
    /// ```
    pub fn flush(&mut self, prototype: F::Prototype) {
        let Some(free) = self.free.get_mut(&prototype) else {
            return;
        };

        let entries = free.len();
        let mut destroyed: usize = 0;

        for instance in free.drain(..) {
            if self.factory.is_alive(instance) {
                self.factory.destroy(instance);

                // Cannot wrap: bounded by the free list length.
                destroyed = destroyed.wrapping_add(1);
            }

            if self.allocations.remove(&instance).is_some() {
                warn!(
                    ?prototype,
                    ?instance,
                    "flushed instance was also tracked as allocated"
                );
            }
        }

        if destroyed > 0 {
            DESTROYED.with(|event| event.observe(destroyed));
        }

        debug!(?prototype, entries, destroyed, "flushed free list");
    }

    /// Flushes the free list of every prototype the pool has seen.
    ///
    /// See [`flush()`](Self::flush) for details.
    pub fn flush_all(&mut self) {
        let prototypes = self.free.keys().copied().collect::<Vec<_>>();

        for prototype in prototypes {
            self.flush(prototype);
        }
    }

    /// Number of entries in the free list of `prototype`, including entries the host may have
    /// destroyed without the pool noticing yet.
    #[must_use]
    pub fn free_len(&self, prototype: F::Prototype) -> usize {
        self.free.get(&prototype).map_or(0, VecDeque::len)
    }

    /// The free list of `prototype` in the order [`acquire()`](Self::acquire) would take them.
    pub fn free_instances(&self, prototype: F::Prototype) -> impl Iterator<Item = F::Instance> {
        self.free
            .get(&prototype)
            .into_iter()
            .flat_map(|free| free.iter().copied())
    }

    /// Number of instances currently handed out, across all prototypes.
    #[must_use]
    pub fn allocated_len(&self) -> usize {
        self.allocations.len()
    }

    /// Whether `instance` is currently handed out by this pool.
    #[must_use]
    pub fn is_allocated(&self, instance: F::Instance) -> bool {
        self.allocations.contains_key(&instance)
    }

    /// The prototype an allocated instance was acquired from, or `None` if the instance is not
    /// currently allocated from this pool.
    #[must_use]
    pub fn prototype_of(&self, instance: F::Instance) -> Option<F::Prototype> {
        self.allocations.get(&instance).copied()
    }

    /// Whether the pool has a free list for `prototype`.
    #[must_use]
    pub fn is_registered(&self, prototype: F::Prototype) -> bool {
        self.free.contains_key(&prototype)
    }

    /// Every prototype the pool has a free list for, in no particular order.
    pub fn prototypes(&self) -> impl Iterator<Item = F::Prototype> {
        self.free.keys().copied()
    }

    /// The factory the pool uses to talk to the host.
    #[must_use]
    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Exclusive access to the factory, e.g. to create or destroy objects outside the pool.
    ///
    /// Destroying instances that sit in a free list is fine; the pool skips them later.
    #[must_use]
    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    /// How many instances [`acquire()`](Self::acquire) creates when the free list is empty.
    #[must_use]
    pub fn growth_batch(&self) -> NonZero<usize> {
        self.growth_batch
    }

    /// Name of the container that pooled instances are attached to.
    #[must_use]
    pub fn container_name(&self) -> &str {
        &self.container_name
    }

    /// What [`release()`](Self::release) does to instances before pooling them again.
    #[must_use]
    pub fn release_policy(&self) -> ReleasePolicy {
        self.release_policy
    }

    /// What happens if the pool is dropped while instances are still allocated.
    #[must_use]
    pub fn drop_policy(&self) -> DropPolicy {
        self.drop_policy
    }

    fn attach_to_container(&mut self, instance: F::Instance) {
        let container = self.container.get_or_insert_with(|| {
            debug!(name = %self.container_name, "resolving pool container");
            self.factory.get_or_create_container(&self.container_name)
        });

        self.factory.reparent(instance, container);
    }
}

impl<F: InstanceFactory> fmt::Debug for PrototypePool<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("prototype_count", &self.free.len())
            .field(
                "free_count",
                &self.free.values().map(VecDeque::len).sum::<usize>(),
            )
            .field("allocated_count", &self.allocations.len())
            .field("container_name", &self.container_name)
            .field("growth_batch", &self.growth_batch)
            .field("release_policy", &self.release_policy)
            .field("drop_policy", &self.drop_policy)
            .finish_non_exhaustive()
    }
}

impl<F: InstanceFactory> Drop for PrototypePool<F> {
    fn drop(&mut self) {
        // If we are already panicking, we do not want to panic again because that will
        // simply obscure whatever the original panic was.
        if !thread::panicking() && matches!(self.drop_policy, DropPolicy::MustNotDropItems) {
            let allocated = self.allocations.len();

            assert!(
                allocated == 0,
                "dropped a PrototypePool with {allocated} allocated instances - this is forbidden by DropPolicy::MustNotDropItems"
            );
        }
    }
}
