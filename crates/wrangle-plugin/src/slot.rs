// SPDX-FileCopyrightText: 2026 Wrangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-name resolution state.
//!
//! Each name the registry has been asked for gets one slot. The slot moves
//! through `Unresolved -> Resolving -> {Ready | Failed}` under its own mutex,
//! so a slow constructor only blocks callers asking for the same name.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tracing::debug;
use wrangle_core::{Plugin, WrangleError};

use crate::descriptor::PluginDescriptor;

/// Observable resolution state of one plugin name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginState {
    /// Known but never requested.
    Unresolved,
    /// A caller is running the constructor.
    Resolving,
    /// Constructed; every lookup returns the same instance.
    Ready,
    /// The constructor failed; lookups return the cached error.
    Failed,
}

impl std::fmt::Display for PluginState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PluginState::Unresolved => write!(f, "unresolved"),
            PluginState::Resolving => write!(f, "resolving"),
            PluginState::Ready => write!(f, "ready"),
            PluginState::Failed => write!(f, "failed"),
        }
    }
}

enum Cell {
    Unresolved,
    Resolving,
    Ready(Arc<dyn Plugin>),
    Failed(Arc<WrangleError>),
}

impl Cell {
    fn state(&self) -> PluginState {
        match self {
            Cell::Unresolved => PluginState::Unresolved,
            Cell::Resolving => PluginState::Resolving,
            Cell::Ready(_) => PluginState::Ready,
            Cell::Failed(_) => PluginState::Failed,
        }
    }
}

pub(crate) struct PluginSlot {
    descriptor: PluginDescriptor,
    cell: Mutex<Cell>,
    settled: Condvar,
}

impl PluginSlot {
    pub(crate) fn new(descriptor: PluginDescriptor) -> Self {
        Self {
            descriptor,
            cell: Mutex::new(Cell::Unresolved),
            settled: Condvar::new(),
        }
    }

    pub(crate) fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    pub(crate) fn state(&self) -> PluginState {
        self.lock().state()
    }

    /// Return a `Failed` slot to `Unresolved`. Other states are untouched.
    pub(crate) fn reset_failed(&self) -> bool {
        let mut cell = self.lock();
        if matches!(*cell, Cell::Failed(_)) {
            *cell = Cell::Unresolved;
            true
        } else {
            false
        }
    }

    /// Return the instance, constructing it if this is the first request.
    ///
    /// Callers arriving while another caller constructs wait for it to
    /// settle, at most `timeout` if one is given.
    pub(crate) fn resolve(
        &self,
        timeout: Option<Duration>,
    ) -> Result<Arc<dyn Plugin>, WrangleError> {
        let mut cell = self.wait_settled(self.lock(), timeout)?;
        match &*cell {
            Cell::Ready(plugin) => return Ok(Arc::clone(plugin)),
            Cell::Failed(cause) => return Err(self.construction_error(cause)),
            Cell::Unresolved | Cell::Resolving => {}
        }
        *cell = Cell::Resolving;
        drop(cell);

        let guard = ResolvingGuard {
            slot: self,
            finished: false,
        };
        let started = Instant::now();
        let outcome = self.descriptor.factory().create();
        debug!(
            plugin = %self.descriptor.name(),
            constructor = %self.descriptor.constructor(),
            ok = outcome.is_ok(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "plugin constructor finished"
        );
        guard.finish(outcome)
    }

    fn lock(&self) -> MutexGuard<'_, Cell> {
        self.cell.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait_settled<'a>(
        &self,
        cell: MutexGuard<'a, Cell>,
        timeout: Option<Duration>,
    ) -> Result<MutexGuard<'a, Cell>, WrangleError> {
        let resolving = |cell: &mut Cell| matches!(cell, Cell::Resolving);
        match timeout {
            None => Ok(self
                .settled
                .wait_while(cell, resolving)
                .unwrap_or_else(PoisonError::into_inner)),
            Some(limit) => {
                let (cell, result) = self
                    .settled
                    .wait_timeout_while(cell, limit, resolving)
                    .unwrap_or_else(PoisonError::into_inner);
                if result.timed_out() {
                    return Err(WrangleError::ResolveTimeout {
                        name: self.descriptor.name().to_string(),
                        waited: limit,
                    });
                }
                Ok(cell)
            }
        }
    }

    fn settle(&self, next: Cell) {
        *self.lock() = next;
        self.settled.notify_all();
    }

    fn construction_error(&self, cause: &Arc<WrangleError>) -> WrangleError {
        WrangleError::Construction {
            name: self.descriptor.name().to_string(),
            source: Arc::clone(cause),
        }
    }
}

impl std::fmt::Debug for PluginSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginSlot")
            .field("name", &self.descriptor.name())
            .field("state", &self.state())
            .finish()
    }
}

/// Settles a `Resolving` slot even if the constructor unwinds.
struct ResolvingGuard<'a> {
    slot: &'a PluginSlot,
    finished: bool,
}

impl ResolvingGuard<'_> {
    fn finish(
        mut self,
        outcome: Result<Arc<dyn Plugin>, WrangleError>,
    ) -> Result<Arc<dyn Plugin>, WrangleError> {
        self.finished = true;
        match outcome {
            Ok(plugin) => {
                self.slot.settle(Cell::Ready(Arc::clone(&plugin)));
                Ok(plugin)
            }
            Err(err) => {
                let cause = Arc::new(err);
                self.slot.settle(Cell::Failed(Arc::clone(&cause)));
                Err(self.slot.construction_error(&cause))
            }
        }
    }
}

impl Drop for ResolvingGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            let name = self.slot.descriptor.name();
            self.slot.settle(Cell::Failed(Arc::new(WrangleError::Internal(format!(
                "constructor for plugin `{name}` panicked"
            )))));
        }
    }
}
