//! In-memory host implementation for testing.
//!
//! [`FakeHost`] implements [`InstanceFactory`] without any real engine behind it. It records the
//! state of every instance it ever created so tests can inspect what the pool asked the host to
//! do, and it can simulate external destruction and resource exhaustion.
//!
//! # Example
//!
//! ```
//! use prototype_pool::fake::FakeHost;
//! use prototype_pool::{Orientation, Position, PrototypePool};
//!
//! let mut host = FakeHost::new();
//! let bullet = host.define_prototype("Bullet");
//!
//! let mut pool = PrototypePool::new(host);
//! let shot = pool
//!     .acquire(bullet, Position::new(0.0, 1.0, 0.0), Orientation::IDENTITY)
//!     .unwrap();
//!
//! assert!(pool.factory().is_active(shot));
//! assert_eq!(pool.factory().position(shot), Position::new(0.0, 1.0, 0.0));
//! ```
//!
//! # Isolation
//!
//! Every [`FakeHost`] is independent. Handles from one host are meaningless to another and
//! using them there panics.

use thiserror::Error;

use crate::{InstanceFactory, Orientation, Position};

/// Handle to a prototype defined via [`FakeHost::define_prototype()`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct FakePrototype(usize);

/// Handle to an instance spawned by a [`FakeHost`].
///
/// Handles are never reused, not even after the instance is destroyed.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct FakeInstance(usize);

/// Handle to a container created by [`FakeHost`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct FakeContainer(usize);

/// Errors raised by [`FakeHost`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FakeHostError {
    /// The spawn budget set via [`FakeHost::limit_spawns()`] has been used up.
    #[error("fake host spawn budget exhausted")]
    Exhausted,
}

#[derive(Debug)]
struct InstanceState {
    prototype: FakePrototype,
    alive: bool,
    active: bool,
    position: Position,
    orientation: Orientation,
    parent: Option<FakeContainer>,
}

/// An [`InstanceFactory`] that keeps all instance state in memory.
///
/// Instances start active, like freshly instantiated objects in most engines. Destroyed
/// instances stay in the records with their last known state so tests can still inspect them.
#[derive(Debug, Default)]
pub struct FakeHost {
    prototypes: Vec<String>,
    instances: Vec<InstanceState>,
    containers: Vec<String>,
    container_lookups: usize,

    /// Number of spawns still allowed, if limited.
    remaining_spawns: Option<usize>,
}

impl FakeHost {
    /// Creates a host with no prototypes and no instances.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new prototype with the host.
    ///
    /// Every call returns a distinct handle, even for the same name.
    pub fn define_prototype(&mut self, name: impl Into<String>) -> FakePrototype {
        self.prototypes.push(name.into());
        FakePrototype(self.prototypes.len().wrapping_sub(1))
    }

    /// The name a prototype was defined with.
    #[must_use]
    pub fn prototype_name(&self, prototype: FakePrototype) -> &str {
        self.prototypes
            .get(prototype.0)
            .expect("prototype handle does not belong to this host")
    }

    /// Allows only `count` more spawns. Spawns beyond that fail with
    /// [`FakeHostError::Exhausted`].
    pub fn limit_spawns(&mut self, count: usize) {
        self.remaining_spawns = Some(count);
    }

    /// Removes any spawn limit.
    pub fn unlimit_spawns(&mut self) {
        self.remaining_spawns = None;
    }

    /// Total number of instances ever spawned.
    #[must_use]
    pub fn spawned_count(&self) -> usize {
        self.instances.len()
    }

    /// Number of instances that are currently alive.
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.instances.iter().filter(|state| state.alive).count()
    }

    /// The prototype an instance was spawned from.
    #[must_use]
    pub fn prototype_of(&self, instance: FakeInstance) -> FakePrototype {
        self.state(instance).prototype
    }

    /// Whether the instance is currently active.
    #[must_use]
    pub fn is_active(&self, instance: FakeInstance) -> bool {
        self.state(instance).active
    }

    /// The last position the instance was placed at.
    #[must_use]
    pub fn position(&self, instance: FakeInstance) -> Position {
        self.state(instance).position
    }

    /// The last orientation the instance was given.
    #[must_use]
    pub fn orientation(&self, instance: FakeInstance) -> Orientation {
        self.state(instance).orientation
    }

    /// The container the instance is attached to, if any.
    #[must_use]
    pub fn parent(&self, instance: FakeInstance) -> Option<FakeContainer> {
        self.state(instance).parent
    }

    /// Number of distinct containers created so far.
    #[must_use]
    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    /// Number of times anyone asked for a container, whether it existed or not.
    #[must_use]
    pub fn container_lookups(&self) -> usize {
        self.container_lookups
    }

    /// The name of a container.
    #[must_use]
    pub fn container_name(&self, container: FakeContainer) -> &str {
        self.containers
            .get(container.0)
            .expect("container handle does not belong to this host")
    }

    fn state(&self, instance: FakeInstance) -> &InstanceState {
        self.instances
            .get(instance.0)
            .expect("instance handle does not belong to this host")
    }

    fn state_mut(&mut self, instance: FakeInstance) -> &mut InstanceState {
        self.instances
            .get_mut(instance.0)
            .expect("instance handle does not belong to this host")
    }
}

impl InstanceFactory for FakeHost {
    type Prototype = FakePrototype;
    type Instance = FakeInstance;
    type Container = FakeContainer;
    type Error = FakeHostError;

    fn spawn(
        &mut self,
        prototype: FakePrototype,
        position: Position,
        orientation: Orientation,
    ) -> Result<FakeInstance, FakeHostError> {
        assert!(
            prototype.0 < self.prototypes.len(),
            "prototype handle does not belong to this host"
        );

        if let Some(remaining) = self.remaining_spawns.as_mut() {
            if *remaining == 0 {
                return Err(FakeHostError::Exhausted);
            }

            *remaining = remaining.wrapping_sub(1);
        }

        self.instances.push(InstanceState {
            prototype,
            alive: true,
            active: true,
            position,
            orientation,
            parent: None,
        });

        Ok(FakeInstance(self.instances.len().wrapping_sub(1)))
    }

    fn destroy(&mut self, instance: FakeInstance) {
        let state = self.state_mut(instance);
        state.alive = false;
        state.active = false;
    }

    fn is_alive(&self, instance: FakeInstance) -> bool {
        self.state(instance).alive
    }

    fn set_active(&mut self, instance: FakeInstance, active: bool) {
        self.state_mut(instance).active = active;
    }

    fn get_or_create_container(&mut self, name: &str) -> FakeContainer {
        self.container_lookups = self.container_lookups.wrapping_add(1);

        if let Some(index) = self.containers.iter().position(|existing| existing == name) {
            return FakeContainer(index);
        }

        self.containers.push(name.to_string());
        FakeContainer(self.containers.len().wrapping_sub(1))
    }

    fn reparent(&mut self, instance: FakeInstance, container: &FakeContainer) {
        self.state_mut(instance).parent = Some(*container);
    }

    fn set_transform(
        &mut self,
        instance: FakeInstance,
        position: Position,
        orientation: Orientation,
    ) {
        let state = self.state_mut(instance);
        state.position = position;
        state.orientation = orientation;
    }
}
