#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Recycles host-created instances per prototype instead of destroying and recreating them.
//!
//! This package provides [`PrototypePool`], which hands out instances of a host object type
//! (game entities, widgets, connections - anything expensive to create) keyed by the prototype
//! they are created from. Instances that are no longer needed go back into a per-prototype free
//! list and are handed out again by the next request instead of being destroyed.
//!
//! The pool does not create or destroy anything itself. A host environment provides those
//! capabilities by implementing [`InstanceFactory`].
//!
//! The `test-util` feature enables the `fake` module with an in-memory host for tests.
//!
//! # Features
//!
//! - **Pre-warming**: [`refill()`][PrototypePool::refill] creates instances ahead of time.
//! - **Automatic growth**: [`acquire()`][PrototypePool::acquire] never fails because the pool is
//!   empty, it grows the free list instead.
//! - **FIFO reuse**: the instance that has been idle the longest is handed out first.
//! - **Prototype-free release**: [`release()`][PrototypePool::release] only needs the instance;
//!   the pool remembers where it came from.
//! - **Stale entry tolerance**: instances destroyed by someone else while idle are skipped.
//! - **Shared handles**: [`LocalPrototypePool`] gives cloneable single-threaded access.
//!
//! # Instance lifecycle
//!
//! ```text
//!            refill / growth          acquire
//!  (host) -------------------> Free ----------> Allocated
//!     ^                          ^                  |
//!     |   flush                  |     release      |
//!     +--------------------------+------------------+
//! ```
//!
//! Allocated instances are never touched by [`flush()`][PrototypePool::flush]. Release them
//! first if they should be destroyed too.
//!
//! # Example
//!
//! ```rust
//! use prototype_pool::fake::FakeHost;
//! use prototype_pool::{Orientation, Position, PrototypePool};
//!
//! let mut host = FakeHost::new();
//! let cube = host.define_prototype("Cube");
//!
//! let mut pool = PrototypePool::new(host);
//! pool.refill(cube, 2, Position::ORIGIN).unwrap();
//!
//! let first = pool
//!     .acquire(cube, Position::new(1.0, 0.0, 0.0), Orientation::IDENTITY)
//!     .unwrap();
//! let second = pool
//!     .acquire(cube, Position::new(2.0, 0.0, 0.0), Orientation::IDENTITY)
//!     .unwrap();
//!
//! assert!(pool.release(first));
//! assert!(pool.release(second));
//!
//! // Reused in the order they were released.
//! let again = pool
//!     .acquire(cube, Position::ORIGIN, Orientation::IDENTITY)
//!     .unwrap();
//! assert_eq!(again, first);
//! ```
//!
//! # Thread safety
//!
//! The pool is single-threaded. [`PrototypePool`] can be moved to another thread if its factory
//! can, but concurrent use needs external synchronization.

mod builder;
mod error;
#[cfg(any(test, feature = "test-util"))]
pub mod fake;
mod host;
mod local;
mod metrics;
mod policies;
mod pool;
mod transform;

pub use builder::*;
pub use error::*;
#[cfg(test)]
pub(crate) use host::MockInstanceFactory;
pub use host::InstanceFactory;
pub use local::LocalPrototypePool;
pub use policies::*;
pub use pool::PrototypePool;
pub use transform::*;
