//! Single-writer snapshot cell
//!
//! Writers are serialized by a mutex; each commit computes a whole new
//! snapshot from the current one and publishes it on a watch channel.
//! Readers never block writers: they clone the latest published value.

use crate::error::Result;
use parking_lot::Mutex;
use tokio::sync::watch;

/// Snapshot carrying a publication counter
pub trait Versioned: Clone + Send + Sync + 'static {
    /// Publication counter, starting at 0
    fn version(&self) -> u64;

    /// Overwrite the counter
    fn set_version(&mut self, version: u64);
}

/// Owner of one published snapshot
#[derive(Debug)]
pub(crate) struct StateCell<S: Versioned> {
    tx: watch::Sender<S>,
    write: Mutex<()>,
}

impl<S: Versioned> StateCell<S> {
    pub(crate) fn new(initial: S) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self {
            tx,
            write: Mutex::new(()),
        }
    }

    /// Clone of the current snapshot
    pub(crate) fn current(&self) -> S {
        self.tx.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }

    /// Derive the next snapshot and publish it
    ///
    /// If `step` fails nothing is published.
    pub(crate) fn commit<F>(&self, step: F) -> Result<S>
    where
        F: FnOnce(&S) -> Result<S>,
    {
        let _guard = self.write.lock();
        let current = self.current();
        let next = step(&current)?;
        Ok(self.publish(&current, next))
    }

    /// Like [`commit`](Self::commit) for steps that cannot fail
    pub(crate) fn apply<F>(&self, step: F) -> S
    where
        F: FnOnce(&S) -> S,
    {
        let _guard = self.write.lock();
        let current = self.current();
        let next = step(&current);
        self.publish(&current, next)
    }

    fn publish(&self, current: &S, mut next: S) -> S {
        next.set_version(current.version() + 1);
        self.tx.send_replace(next.clone());
        next
    }
}
