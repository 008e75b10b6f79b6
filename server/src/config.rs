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

//! Environment-driven configuration for binaries built on this crate.
//!
//! `treed` itself is a library with no configuration of its own; this module
//! exists for the binaries that embed it (`treesh`, `stress-test`) so they
//! share one place to read their knobs from the environment, the way the
//! teacher's `config` module centralizes `ENV_*` lookups instead of letting
//! each binary `std::env::var` ad hoc.

use std::env;
use std::str::FromStr;

const ENV_LOG: &str = "TREED_LOG";
const ENV_STRESS_WORKERS: &str = "TREED_STRESS_WORKERS";

/// Default `env_logger` filter when `TREED_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default worker count for the concurrent stress harness.
pub const DEFAULT_STRESS_WORKERS: usize = 8;

/// Returns the `env_logger` filter string to initialize logging with.
pub fn log_filter() -> String {
    env::var(ENV_LOG).unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_owned())
}

/// Returns the configured worker count for the stress harness, falling back
/// to [`DEFAULT_STRESS_WORKERS`] if unset or unparsable.
pub fn stress_workers() -> usize {
    read_env_or(ENV_STRESS_WORKERS, DEFAULT_STRESS_WORKERS)
}

fn read_env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stress_workers_falls_back_when_unset() {
        env::remove_var(ENV_STRESS_WORKERS);
        assert_eq!(stress_workers(), DEFAULT_STRESS_WORKERS);
    }
}
