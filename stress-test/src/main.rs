/*
 * This file is a part of treed, a concurrent in-memory directory tree engine.
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 *
*/

#![deny(unused_crate_dependencies)]
#![deny(unused_imports)]

//! Hammers a single shared [`Tree`] from many threads with a randomized mix
//! of `create`/`remove`/`list`/`move` calls. This does not measure
//! throughput: it exists to give the hand-over-hand locking and the LCA
//! move protocol a real chance to race against themselves, the way the
//! teacher's own `stress-test` binary races concurrent clients against a
//! live server instead of trusting single-threaded unit tests alone.

mod utils;

use libstress::Workpool;
use log::{info, warn};
use rand::{rngs::StdRng, SeedableRng};
use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use treed::Tree;
use utils::{random_leaf_path, random_seed_dir, Op, SEED_DIRS};

const DEFAULT_OPS_PER_WORKER: usize = 4_000;

fn main() {
    env_logger::Builder::new()
        .parse_filters(&treed::config::log_filter())
        .init();
    warn!("this stress test checks correctness under concurrent load, not throughput");

    let workers = treed::config::stress_workers();
    let ops_per_worker: usize = env::var("TREED_STRESS_OPS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_OPS_PER_WORKER);
    let total_ops = workers * ops_per_worker;
    info!("spawning {workers} workers for {total_ops} total operations");

    let tree = Arc::new(Tree::new());
    for dir in 0..SEED_DIRS {
        tree.create(&format!("/d{dir}/"))
            .expect("seeding a fresh tree cannot fail");
    }

    let completed = Arc::new(AtomicUsize::new(0));
    let started = Instant::now();

    {
        let pool_tree = Arc::clone(&tree);
        let pool_completed = Arc::clone(&completed);
        let pool = Workpool::new(
            workers,
            StdRng::from_entropy,
            move |rng: &mut StdRng, _: ()| {
                run_one(&pool_tree, rng);
                pool_completed.fetch_add(1, Ordering::Relaxed);
            },
            |_: &mut StdRng| {},
            false,
        );
        for _ in 0..total_ops {
            pool.execute(());
        }
        // dropping the pool here blocks until every queued operation has run
    }

    let elapsed = started.elapsed();
    info!(
        "completed {} operations across {} workers in {:.2?}",
        completed.load(Ordering::Relaxed),
        workers,
        elapsed
    );

    // workers only ever touch the seed directories' subtrees, so the root
    // listing must still be exactly what was seeded
    let root_listing = tree.list("/").expect("root always exists");
    let expected: Vec<String> = (0..SEED_DIRS).map(|d| format!("d{d}")).collect();
    let mut got: Vec<&str> = root_listing.split('\n').collect();
    got.sort_unstable();
    assert_eq!(got, expected, "concurrent operations corrupted the root directory");

    info!("SUCCESS. the tree survived concurrent load with its root intact");
}

fn run_one(tree: &Tree, rng: &mut StdRng) {
    match Op::random(rng) {
        Op::Create => {
            let _ = tree.create(&random_leaf_path(rng));
        }
        Op::Remove => {
            let _ = tree.remove(&random_leaf_path(rng));
        }
        Op::List => {
            let _ = tree.list(&random_seed_dir(rng));
        }
        Op::Move => {
            let from = random_leaf_path(rng);
            let to = random_leaf_path(rng);
            let _ = tree.move_path(&from, &to);
        }
    }
}
