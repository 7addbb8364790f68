//! Pooling against a host written from scratch, one that has no notion of activation and whose
//! prototype handles are plain strings.

use std::collections::BTreeMap;

use prototype_pool::{InstanceFactory, LocalPrototypePool, Orientation, Position, PrototypePool};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("scene has no free slots")]
struct OutOfSlots;

#[derive(Debug)]
struct Node {
    template: &'static str,
    position: Position,
    parent: Option<u16>,
}

/// A scene that can hold a fixed number of nodes.
#[derive(Debug)]
struct Scene {
    capacity: usize,
    next_id: u32,
    nodes: BTreeMap<u32, Node>,
    groups: Vec<String>,
}

impl Scene {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            next_id: 0,
            nodes: BTreeMap::new(),
            groups: Vec::new(),
        }
    }
}

impl InstanceFactory for Scene {
    type Prototype = &'static str;
    type Instance = u32;
    type Container = u16;
    type Error = OutOfSlots;

    fn spawn(
        &mut self,
        prototype: &'static str,
        position: Position,
        _orientation: Orientation,
    ) -> Result<u32, OutOfSlots> {
        if self.nodes.len() >= self.capacity {
            return Err(OutOfSlots);
        }

        let id = self.next_id;
        self.next_id += 1;
        self.nodes.insert(
            id,
            Node {
                template: prototype,
                position,
                parent: None,
            },
        );

        Ok(id)
    }

    fn destroy(&mut self, instance: u32) {
        self.nodes.remove(&instance);
    }

    fn is_alive(&self, instance: u32) -> bool {
        self.nodes.contains_key(&instance)
    }

    fn get_or_create_container(&mut self, name: &str) -> u16 {
        let index = match self.groups.iter().position(|group| group == name) {
            Some(index) => index,
            None => {
                self.groups.push(name.to_string());
                self.groups.len() - 1
            }
        };

        u16::try_from(index).unwrap()
    }

    fn reparent(&mut self, instance: u32, container: &u16) {
        if let Some(node) = self.nodes.get_mut(&instance) {
            node.parent = Some(*container);
        }
    }

    fn set_transform(&mut self, instance: u32, position: Position, _orientation: Orientation) {
        if let Some(node) = self.nodes.get_mut(&instance) {
            node.position = position;
        }
    }
}

#[test]
fn host_without_activation_works() {
    let mut pool = PrototypePool::new(Scene::with_capacity(8));

    pool.refill("tree", 2, Position::new(0.0, -50.0, 0.0))
        .unwrap();
    let tree = pool
        .acquire("tree", Position::new(3.0, 0.0, 3.0), Orientation::IDENTITY)
        .unwrap();

    let node = &pool.factory().nodes[&tree];
    assert_eq!(node.template, "tree");
    assert_eq!(node.position, Position::new(3.0, 0.0, 3.0));
    assert_eq!(node.parent, Some(0));
    assert_eq!(pool.factory().groups, vec!["[prototype_pool]".to_string()]);
}

#[test]
fn string_prototypes_are_separate_pools() {
    let mut pool = PrototypePool::new(Scene::with_capacity(8));

    let tree = pool
        .acquire("tree", Position::ORIGIN, Orientation::IDENTITY)
        .unwrap();
    let rock = pool
        .acquire("rock", Position::ORIGIN, Orientation::IDENTITY)
        .unwrap();

    assert_eq!(pool.prototype_of(tree), Some("tree"));
    assert_eq!(pool.prototype_of(rock), Some("rock"));

    assert!(pool.release(tree));
    assert_eq!(pool.free_len("tree"), 2);
    assert_eq!(pool.free_len("rock"), 1);
}

#[test]
fn full_scene_surfaces_as_spawn_error() {
    let mut pool = PrototypePool::new(Scene::with_capacity(3));

    let first = pool
        .acquire("tree", Position::ORIGIN, Orientation::IDENTITY)
        .unwrap();
    let second = pool
        .acquire("tree", Position::ORIGIN, Orientation::IDENTITY)
        .unwrap();

    // Growth needs two more slots but only one is left.
    let error = pool
        .acquire("tree", Position::ORIGIN, Orientation::IDENTITY)
        .unwrap_err();
    assert_eq!(
        error.to_string(),
        "failed to spawn an instance of prototype \"tree\""
    );

    // Recycling keeps the scene going without new slots.
    assert!(pool.release(first));
    let reused = pool
        .acquire("tree", Position::ORIGIN, Orientation::IDENTITY)
        .unwrap();
    assert_ne!(reused, second);
    assert!(pool.is_allocated(reused));
}

#[test]
fn shared_pool_between_systems() {
    let pool = LocalPrototypePool::new(Scene::with_capacity(16));

    let spawner = pool.clone();
    let reaper = pool.clone();

    let spawned = (0_u8..4)
        .map(|i| {
            spawner
                .acquire(
                    "bullet",
                    Position::new(f32::from(i), 0.0, 0.0),
                    Orientation::IDENTITY,
                )
                .unwrap()
        })
        .collect::<Vec<_>>();

    for bullet in &spawned {
        assert!(reaper.release(*bullet));
    }

    assert_eq!(pool.allocated_len(), 0);
    assert_eq!(pool.free_len("bullet"), 4);

    pool.flush("bullet");
    pool.with_pool(|inner| assert!(inner.factory().nodes.is_empty()));
}
