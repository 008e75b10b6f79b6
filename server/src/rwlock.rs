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

//! A reader-preference reader-writer lock with explicit turn handoff.
//!
//! `std::sync::RwLock`'s fairness policy is platform-dependent and
//! undocumented; `parking_lot::RwLock` is fair in a different sense (strict
//! FIFO) than what this crate's tree protocol needs. Neither makes the
//! handoff rule explicit, so this module builds the turn machine directly
//! over a [`parking_lot::Mutex`] and two [`parking_lot::Condvar`]s, the same
//! shape the teacher's own `Cvar` helper uses for its single-condvar
//! table-lock-state wait, generalized here to two condvars and fuller
//! reader/writer counter state.
//!
//! Unlocking always flips `change` toward whichever class is actually
//! waiting: readers get priority on unlock from a writer (if any are
//! waiting), otherwise a single writer is woken; writers get priority on
//! unlock from a reader only once the last reader has left. This is what
//! prevents both reader and writer starvation.

use parking_lot::{Condvar, Mutex};
use std::cell::UnsafeCell;
use std::ops::{Deref, DerefMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change {
    None,
    Readers,
    Writers,
}

struct State {
    rcount: u32,
    wcount: u32,
    rwait: u32,
    wwait: u32,
    change: Change,
}

/// A reader-writer lock with reader preference and explicit turn handoff.
///
/// Not reentrant: a thread must never attempt to acquire a lock it already
/// holds, in either mode. The tree protocol built on top of this type
/// guarantees that by construction (hand-over-hand locking never revisits a
/// node).
pub struct RwLock<T> {
    state: Mutex<State>,
    readers: Condvar,
    writers: Condvar,
    data: UnsafeCell<T>,
}

// SAFETY: access to `data` is only ever handed out through a guard obtained
// while holding the appropriate class of lock, exactly as `std::sync::RwLock`
// guarantees.
unsafe impl<T: Send> Send for RwLock<T> {}
unsafe impl<T: Send + Sync> Sync for RwLock<T> {}

impl<T> RwLock<T> {
    pub fn new(data: T) -> Self {
        Self {
            state: Mutex::new(State {
                rcount: 0,
                wcount: 0,
                rwait: 0,
                wwait: 0,
                change: Change::None,
            }),
            readers: Condvar::new(),
            writers: Condvar::new(),
            data: UnsafeCell::new(data),
        }
    }

    /// Blocks until a read lock is acquired.
    pub fn read(&self) -> ReadGuard<'_, T> {
        let mut st = self.state.lock();
        st.rwait += 1;
        while st.wcount + st.wwait > 0 && st.change != Change::Readers {
            self.readers.wait(&mut st);
        }
        st.rwait -= 1;
        st.change = Change::None;
        st.rcount += 1;
        if st.rwait > 0 {
            // cascade-wake: let the next waiting reader in too
            self.readers.notify_one();
        }
        drop(st);
        ReadGuard { lock: self }
    }

    /// Blocks until the write lock is acquired.
    pub fn write(&self) -> WriteGuard<'_, T> {
        let mut st = self.state.lock();
        st.wwait += 1;
        while st.wcount + st.rcount > 0 && st.change != Change::Writers {
            self.writers.wait(&mut st);
        }
        st.wwait -= 1;
        st.change = Change::None;
        st.wcount += 1;
        drop(st);
        WriteGuard { lock: self }
    }

    fn read_unlock(&self) {
        let mut st = self.state.lock();
        st.rcount -= 1;
        if st.rcount == 0 && st.wwait > 0 {
            st.change = Change::Writers;
            drop(st);
            self.writers.notify_one();
        }
    }

    fn write_unlock(&self) {
        let mut st = self.state.lock();
        st.wcount -= 1;
        if st.rwait > 0 {
            st.change = Change::Readers;
            drop(st);
            // wakes one reader, which cascade-wakes the rest on admission
            self.readers.notify_one();
        } else if st.wwait > 0 {
            drop(st);
            self.writers.notify_one();
        }
    }
}

impl<T: Default> Default for RwLock<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// RAII guard for a held read lock. Derefs to `&T`; releases the read lock
/// (and performs the turn handoff) on drop.
pub struct ReadGuard<'a, T> {
    lock: &'a RwLock<T>,
}

impl<'a, T> Deref for ReadGuard<'a, T> {
    type Target = T;
    fn deref(&self) -> &T {
        // SAFETY: holding a read lock excludes any writer.
        unsafe { &*self.lock.data.get() }
    }
}

impl<'a, T> Drop for ReadGuard<'a, T> {
    fn drop(&mut self) {
        self.lock.read_unlock();
    }
}

/// RAII guard for a held write lock. Derefs to `&mut T`; releases the write
/// lock (and performs the turn handoff) on drop.
pub struct WriteGuard<'a, T> {
    lock: &'a RwLock<T>,
}

impl<'a, T> Deref for WriteGuard<'a, T> {
    type Target = T;
    fn deref(&self) -> &T {
        // SAFETY: holding the write lock excludes every reader and writer.
        unsafe { &*self.lock.data.get() }
    }
}

impl<'a, T> DerefMut for WriteGuard<'a, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: holding the write lock excludes every reader and writer.
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<'a, T> Drop for WriteGuard<'a, T> {
    fn drop(&mut self) {
        self.lock.write_unlock();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn single_writer_excludes_readers() {
        let lock = RwLock::new(0);
        let w = lock.write();
        drop(w);
        let r1 = lock.read();
        let r2 = lock.read();
        assert_eq!(*r1, 0);
        assert_eq!(*r2, 0);
    }

    #[test]
    fn write_mutates() {
        let lock = RwLock::new(vec![1, 2, 3]);
        {
            let mut w = lock.write();
            w.push(4);
        }
        assert_eq!(*lock.read(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn concurrent_readers_do_not_block_each_other() {
        let lock = Arc::new(RwLock::new(0usize));
        let concurrent = Arc::new(AtomicUsize::new(0));
        let max_concurrent = Arc::new(AtomicUsize::new(0));
        let mut handles = vec![];
        for _ in 0..8 {
            let lock = Arc::clone(&lock);
            let concurrent = Arc::clone(&concurrent);
            let max_concurrent = Arc::clone(&max_concurrent);
            handles.push(thread::spawn(move || {
                let _g = lock.read();
                let now = concurrent.fetch_add(1, Ordering::SeqCst) + 1;
                max_concurrent.fetch_max(now, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(20));
                concurrent.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert!(max_concurrent.load(Ordering::SeqCst) > 1);
    }

    #[test]
    fn writer_eventually_gets_the_lock_under_reader_pressure() {
        // a writer queued behind a steady trickle of readers must still run;
        // this is the starvation property the turn handoff exists for.
        let lock = Arc::new(RwLock::new(0usize));
        let stop = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let mut readers = vec![];
        for _ in 0..4 {
            let lock = Arc::clone(&lock);
            let stop = Arc::clone(&stop);
            readers.push(thread::spawn(move || {
                while !stop.load(Ordering::SeqCst) {
                    let _g = lock.read();
                    thread::sleep(Duration::from_micros(200));
                }
            }));
        }
        thread::sleep(Duration::from_millis(5));
        let writer = {
            let lock = Arc::clone(&lock);
            thread::spawn(move || {
                let mut g = lock.write();
                *g += 1;
            })
        };
        writer.join().unwrap();
        stop.store(true, Ordering::SeqCst);
        for r in readers {
            r.join().unwrap();
        }
        assert_eq!(*lock.read(), 1);
    }
}
