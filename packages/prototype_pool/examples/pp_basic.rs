//! Basic usage example for `PrototypePool`.
//!
//! Pre-warms a pool, fires a few bullets, recycles them and finally flushes the pool, printing
//! what the host sees along the way.

use prototype_pool::fake::FakeHost;
use prototype_pool::{Orientation, Position, PrototypePool};

fn main() {
    let mut host = FakeHost::new();
    let bullet = host.define_prototype("Bullet");

    let mut pool = PrototypePool::new(host);

    // Park a few bullets far below the level so the first shots are free.
    pool.refill(bullet, 3, Position::new(0.0, -1000.0, 0.0))
        .expect("fake host has no spawn limit");
    println!("Pre-warmed: {} free", pool.free_len(bullet));

    let mut in_flight = Vec::new();

    for lane in 0_u8..5 {
        let shot = pool
            .acquire(
                bullet,
                Position::new(f32::from(lane), 1.0, 0.0),
                Orientation::IDENTITY,
            )
            .expect("fake host has no spawn limit");

        println!(
            "Fired {shot:?} at {:?} (free: {}, host spawned: {})",
            pool.factory().position(shot),
            pool.free_len(bullet),
            pool.factory().spawned_count()
        );

        in_flight.push(shot);
    }

    for shot in in_flight.drain(..) {
        let recycled = pool.release(shot);
        println!("Recycled {shot:?}: {recycled}");
    }

    println!("Free after recycling: {}", pool.free_len(bullet));

    pool.flush(bullet);
    println!(
        "Flushed: {} free, {} alive in host",
        pool.free_len(bullet),
        pool.factory().alive_count()
    );
}
