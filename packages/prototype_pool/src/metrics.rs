//! Metrics for pool activity.
//!
//! Events are per-thread, matching the single-threaded nature of the pool. All of them are plain
//! counters; the magnitude is the number of instances affected.

use nm::Event;

thread_local! {
    /// New instances created by the host on behalf of a pool.
    pub(crate) static SPAWNED: Event = Event::builder()
        .name("prototype_pool_spawned")
        .build();

    /// Instances handed out to callers.
    pub(crate) static ACQUIRED: Event = Event::builder()
        .name("prototype_pool_acquired")
        .build();

    /// Instances returned to their free list.
    pub(crate) static RELEASED: Event = Event::builder()
        .name("prototype_pool_released")
        .build();

    /// Release attempts for instances the pool does not know about.
    pub(crate) static RELEASE_REJECTED: Event = Event::builder()
        .name("prototype_pool_release_rejected")
        .build();

    /// Free list entries that turned out to be destroyed by someone else.
    pub(crate) static STALE_DISCARDED: Event = Event::builder()
        .name("prototype_pool_stale_discarded")
        .build();

    /// Instances destroyed by a flush.
    pub(crate) static DESTROYED: Event = Event::builder()
        .name("prototype_pool_destroyed")
        .build();
}
