use std::error::Error as StdError;
use std::fmt::Debug;
use std::hash::Hash;

use crate::{Orientation, Position};

/// The capabilities a host environment provides so a [`PrototypePool`][crate::PrototypePool]
/// can create, recycle and destroy its instances.
///
/// Prototypes and instances are opaque handles owned by the host. The pool compares them by
/// handle identity only (via [`Eq`] and [`Hash`]), so two distinct prototype handles are two
/// independent pools even if the host considers the objects behind them identical. Handles must
/// stay unique for as long as the pool may see them: a host must not reuse the handle of a
/// destroyed instance for a new one while a stale copy may still sit in a free list.
///
/// Only [`spawn()`][Self::spawn] may fail. Everything else is best-effort.
///
/// # Example
///
/// ```rust
/// use std::convert::Infallible;
///
/// use prototype_pool::{InstanceFactory, Orientation, Position};
///
/// #[derive(Debug, Default)]
/// struct Counter {
///     spawned: u32,
/// }
///
/// impl InstanceFactory for Counter {
///     type Prototype = &'static str;
///     type Instance = u32;
///     type Container = ();
///     type Error = Infallible;
///
///     fn spawn(
///         &mut self,
///         _prototype: &'static str,
///         _position: Position,
///         _orientation: Orientation,
///     ) -> Result<u32, Infallible> {
///         self.spawned += 1;
///         Ok(self.spawned)
///     }
///
///     fn destroy(&mut self, _instance: u32) {}
///
///     fn is_alive(&self, _instance: u32) -> bool {
///         true
///     }
///
///     fn get_or_create_container(&mut self, _name: &str) {}
///
///     fn reparent(&mut self, _instance: u32, _container: &()) {}
///
///     fn set_transform(&mut self, _instance: u32, _position: Position, _orientation: Orientation) {}
/// }
/// ```
#[cfg_attr(
    test,
    mockall::automock(
        type Prototype = u32;
        type Instance = u64;
        type Container = &'static str;
        type Error = std::io::Error;
    )
)]
pub trait InstanceFactory {
    /// Identifies the kind of object a pool produces.
    type Prototype: Copy + Eq + Hash + Debug;

    /// Identifies one concrete object created from a prototype.
    type Instance: Copy + Eq + Hash + Debug;

    /// The organizational parent that pooled instances are attached to.
    type Container;

    /// Raised when the host cannot create a new instance.
    type Error: StdError + Send + Sync + 'static;

    /// Creates a new live instance from `prototype`, placed at `position` with `orientation`.
    ///
    /// # Errors
    ///
    /// Fails only when the host is out of resources. The pool does not retry.
    fn spawn(
        &mut self,
        prototype: Self::Prototype,
        position: Position,
        orientation: Orientation,
    ) -> Result<Self::Instance, Self::Error>;

    /// Destroys an instance. Must be a no-op for an instance that is already dead.
    fn destroy(&mut self, instance: Self::Instance);

    /// Whether the instance still exists. Free list entries for which this returns `false` are
    /// treated as stale and silently discarded.
    fn is_alive(&self, instance: Self::Instance) -> bool;

    /// Activates or deactivates an instance.
    ///
    /// Hosts without an activation concept can rely on the default, which does nothing.
    fn set_active(&mut self, instance: Self::Instance, active: bool) {
        _ = (instance, active);
    }

    /// Returns the container with the given name, creating it if it does not exist yet.
    ///
    /// Repeated calls with the same name must return the same container.
    fn get_or_create_container(&mut self, name: &str) -> Self::Container;

    /// Attaches an instance under a container.
    fn reparent(&mut self, instance: Self::Instance, container: &Self::Container);

    /// Moves and rotates an instance.
    fn set_transform(
        &mut self,
        instance: Self::Instance,
        position: Position,
        orientation: Orientation,
    );
}
