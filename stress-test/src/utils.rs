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

//! Random operation generation for the stress harness.

use rand::Rng;

/// Number of top-level directories seeded before the workers start; workers
/// only ever operate inside these, leaving the root listing itself stable.
pub const SEED_DIRS: usize = 32;
/// Upper bound on the leaf names workers churn through within a seed
/// directory.
const LEAF_SPREAD: u32 = 500;

#[derive(Debug, Clone, Copy)]
pub enum Op {
    Create,
    Remove,
    List,
    Move,
}

impl Op {
    pub fn random(rng: &mut impl Rng) -> Self {
        match rng.gen_range(0..4) {
            0 => Op::Create,
            1 => Op::Remove,
            2 => Op::List,
            _ => Op::Move,
        }
    }
}

/// A path of the form `/d{n}/leaf{k}/`, where `n` is one of the seed
/// directories and `k` is randomized within [`LEAF_SPREAD`].
pub fn random_leaf_path(rng: &mut impl Rng) -> String {
    let dir = rng.gen_range(0..SEED_DIRS);
    let leaf = rng.gen_range(0..LEAF_SPREAD);
    format!("/d{dir}/leaf{leaf}/")
}

/// The path of one of the seed directories themselves, e.g. `/d3/`.
pub fn random_seed_dir(rng: &mut impl Rng) -> String {
    format!("/d{}/", rng.gen_range(0..SEED_DIRS))
}
