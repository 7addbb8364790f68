//! Shows how `PrototypePool` copes with instances destroyed behind its back.
//!
//! Some hosts destroy objects on their own, e.g. when a level unloads. The pool does not need to
//! be told: stale free list entries are skipped the next time they come up.

use prototype_pool::fake::FakeHost;
use prototype_pool::{InstanceFactory, Orientation, Position, PrototypePool};

fn main() {
    let mut host = FakeHost::new();
    let crate_prototype = host.define_prototype("Crate");

    let mut pool = PrototypePool::new(host);
    pool.refill(crate_prototype, 3, Position::ORIGIN)
        .expect("fake host has no spawn limit");

    let free = pool.free_instances(crate_prototype).collect::<Vec<_>>();
    println!("Free list: {free:?}");

    // Something outside the pool destroys the two oldest crates.
    for instance in free.iter().take(2) {
        pool.factory_mut().destroy(*instance);
        println!("Host destroyed {instance:?}");
    }

    let reused = pool
        .acquire(crate_prototype, Position::ORIGIN, Orientation::IDENTITY)
        .expect("fake host has no spawn limit");
    println!("Acquired {reused:?}, the only survivor");

    let grown = pool
        .acquire(crate_prototype, Position::ORIGIN, Orientation::IDENTITY)
        .expect("fake host has no spawn limit");
    println!(
        "Acquired {grown:?} after growing (host spawned {} in total)",
        pool.factory().spawned_count()
    );
}
