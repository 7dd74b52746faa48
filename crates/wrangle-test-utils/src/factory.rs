// SPDX-FileCopyrightText: 2026 Wrangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Instrumented plugin factories.
//!
//! Each factory counts its `create` calls so tests can assert how many
//! constructions the registry performed. Wrap them in `Arc` and keep a clone
//! to read the counter after handing the factory to a descriptor.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

use wrangle_core::{Plugin, PluginFactory, WrangleError};

use crate::mock_plugin::MockPlugin;

/// Builds a fresh copy of a template plugin on every call.
#[derive(Debug)]
pub struct CountingFactory {
    template: MockPlugin,
    calls: AtomicUsize,
}

impl CountingFactory {
    pub fn new(template: MockPlugin) -> Self {
        Self {
            template,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PluginFactory for CountingFactory {
    fn create(&self) -> Result<Arc<dyn Plugin>, WrangleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(self.template.clone()))
    }
}

/// Always fails with a plugin error carrying `message`.
#[derive(Debug)]
pub struct FailingFactory {
    message: String,
    calls: AtomicUsize,
}

impl FailingFactory {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PluginFactory for FailingFactory {
    fn create(&self) -> Result<Arc<dyn Plugin>, WrangleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(WrangleError::plugin(self.message.clone()))
    }
}

/// Panics inside `create`.
#[derive(Debug, Default)]
pub struct PanickingFactory {
    calls: AtomicUsize,
}

impl PanickingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PluginFactory for PanickingFactory {
    fn create(&self) -> Result<Arc<dyn Plugin>, WrangleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        panic!("mock constructor panicked")
    }
}

#[derive(Debug, Default)]
struct Gate {
    open: bool,
    calls: usize,
}

/// Blocks every `create` call until [`open`](Self::open) is called, then
/// builds a copy of the template, or fails if built with
/// [`failing`](Self::failing). Used to hold a plugin in the resolving state
/// while other callers pile up behind it.
#[derive(Debug)]
pub struct GatedFactory {
    template: MockPlugin,
    failure: Option<String>,
    gate: Mutex<Gate>,
    changed: Condvar,
}

impl GatedFactory {
    pub fn new(template: MockPlugin) -> Self {
        Self {
            template,
            failure: None,
            gate: Mutex::new(Gate::default()),
            changed: Condvar::new(),
        }
    }

    /// A gated factory whose constructor fails with `message` once opened.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::new(MockPlugin::new("gated"))
        }
    }

    pub fn open(&self) {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner).open = true;
        self.changed.notify_all();
    }

    pub fn calls(&self) -> usize {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner).calls
    }

    /// Wait until `create` has been entered at least `count` times.
    /// Returns `false` on timeout.
    pub fn wait_for_calls(&self, count: usize, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut gate = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        while gate.calls < count {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            gate = self
                .changed
                .wait_timeout(gate, remaining)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        true
    }
}

impl PluginFactory for GatedFactory {
    fn create(&self) -> Result<Arc<dyn Plugin>, WrangleError> {
        let mut gate = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        gate.calls += 1;
        self.changed.notify_all();
        let _gate = self
            .changed
            .wait_while(gate, |gate| !gate.open)
            .unwrap_or_else(PoisonError::into_inner);
        match &self.failure {
            Some(message) => Err(WrangleError::plugin(message.as_str())),
            None => Ok(Arc::new(self.template.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counting_factory_counts() {
        let factory = CountingFactory::new(MockPlugin::monitor("cpu"));
        let a = factory.create().unwrap();
        let b = factory.create().unwrap();
        assert_eq!(factory.calls(), 2);
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn failing_factory_reports_message() {
        let factory = FailingFactory::new("no driver");
        let err = factory.create().err().unwrap();
        assert_eq!(err.to_string(), "plugin error: no driver");
        assert_eq!(factory.calls(), 1);
    }

    #[test]
    fn gated_factory_blocks_until_open() {
        let factory = GatedFactory::new(MockPlugin::monitor("gpu"));
        std::thread::scope(|s| {
            let handle = s.spawn(|| factory.create());
            assert!(factory.wait_for_calls(1, Duration::from_secs(5)));
            assert!(!handle.is_finished());
            factory.open();
            assert_eq!(handle.join().unwrap().unwrap().name(), "gpu");
        });
    }

    #[test]
    fn failing_gated_factory_fails_after_open() {
        let factory = GatedFactory::failing("driver went away");
        std::thread::scope(|s| {
            let handle = s.spawn(|| factory.create());
            assert!(factory.wait_for_calls(1, Duration::from_secs(5)));
            assert!(!handle.is_finished());
            factory.open();
            let err = handle.join().unwrap().err().unwrap();
            assert_eq!(err.to_string(), "plugin error: driver went away");
        });
    }

    #[test]
    fn wait_for_calls_times_out() {
        let factory = GatedFactory::new(MockPlugin::monitor("gpu"));
        assert!(!factory.wait_for_calls(1, Duration::from_millis(10)));
    }
}
