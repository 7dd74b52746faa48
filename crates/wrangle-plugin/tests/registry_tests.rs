// SPDX-FileCopyrightText: 2026 Wrangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for plugin resolution through the public registry API.
//!
//! Each test builds an isolated registry over a static source, so tests are
//! independent of installed packages and of each other.

use std::sync::Arc;
use std::time::Duration;

use wrangle_core::{Capability, ExecContext, WrangleError};
use wrangle_plugin::{PluginDescriptor, PluginRegistry, PluginState, StaticSource, by_priority};
use wrangle_test_utils::{
    CountingFactory, FailingFactory, GatedFactory, MockPlugin, PanickingFactory,
};

fn descriptor(name: &str, factory: Arc<dyn wrangle_core::PluginFactory>) -> PluginDescriptor {
    PluginDescriptor::new(name, factory)
}

fn monitor(name: &str) -> (PluginDescriptor, Arc<CountingFactory>) {
    let factory = Arc::new(CountingFactory::new(MockPlugin::monitor(name)));
    let desc = descriptor(name, factory.clone())
        .with_capabilities([Capability::ResourceMonitoring]);
    (desc, factory)
}

// ---- Singleton law ----

#[test]
fn test_for_name_twice_returns_identical_instance() {
    let (gpu, factory) = monitor("gpu");
    let registry = PluginRegistry::new(StaticSource::new([gpu]));

    let first = registry.for_name("gpu").unwrap();
    let second = registry.for_name("gpu").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(factory.calls(), 1);
}

#[test]
fn test_concurrent_for_name_constructs_once() {
    const CALLERS: usize = 16;

    let factory = Arc::new(GatedFactory::new(MockPlugin::monitor("gpu")));
    let registry = PluginRegistry::new(StaticSource::new([descriptor("gpu", factory.clone())]));

    let instances = std::thread::scope(|s| {
        let handles: Vec<_> = (0..CALLERS)
            .map(|_| s.spawn(|| registry.for_name("gpu")))
            .collect();

        assert!(factory.wait_for_calls(1, Duration::from_secs(5)));
        // Give the other callers time to queue behind the first.
        std::thread::sleep(Duration::from_millis(50));
        factory.open();

        handles
            .into_iter()
            .map(|h| h.join().unwrap().unwrap())
            .collect::<Vec<_>>()
    });

    assert_eq!(factory.calls(), 1);
    assert_eq!(instances.len(), CALLERS);
    for instance in &instances[1..] {
        assert!(Arc::ptr_eq(&instances[0], instance));
    }
}

#[test]
fn test_slow_constructor_does_not_block_other_names() {
    let gated = Arc::new(GatedFactory::new(MockPlugin::monitor("gpu")));
    let (cpu, cpu_factory) = monitor("cpu");
    let registry = PluginRegistry::new(StaticSource::new([
        descriptor("gpu", gated.clone()),
        cpu,
    ]));

    std::thread::scope(|s| {
        let gpu = s.spawn(|| registry.for_name("gpu"));
        assert!(gated.wait_for_calls(1, Duration::from_secs(5)));
        assert_eq!(registry.state("gpu"), Some(PluginState::Resolving));

        // gpu is still under construction; cpu resolves regardless.
        registry.for_name("cpu").unwrap();
        assert_eq!(cpu_factory.calls(), 1);

        gated.open();
        gpu.join().unwrap().unwrap();
    });
    assert_eq!(registry.state("gpu"), Some(PluginState::Ready));
}

// ---- Unknown names ----

#[test]
fn test_unknown_name_constructs_nothing() {
    let (gpu, factory) = monitor("gpu");
    let registry = PluginRegistry::new(StaticSource::new([gpu]));

    let err = registry.for_name("does-not-exist").unwrap_err();
    assert!(matches!(err, WrangleError::UnknownPlugin { .. }));
    assert_eq!(err.to_string(), "unknown plugin `does-not-exist`");
    assert_eq!(factory.calls(), 0);
}

// ---- Failure caching ----

#[test]
fn test_failed_construction_is_cached() {
    let factory = Arc::new(FailingFactory::new("no CUDA driver found"));
    let registry = PluginRegistry::new(StaticSource::new([descriptor("gpu", factory.clone())]));

    let first = registry.for_name("gpu").unwrap_err();
    let second = registry.for_name("gpu").unwrap_err();

    assert_eq!(factory.calls(), 1);
    assert_eq!(first.to_string(), second.to_string());
    assert_eq!(
        first.to_string(),
        "failed to construct plugin `gpu`: plugin error: no CUDA driver found"
    );
    match (&first, &second) {
        (
            WrangleError::Construction { source: a, .. },
            WrangleError::Construction { source: b, .. },
        ) => assert!(Arc::ptr_eq(a, b)),
        other => panic!("unexpected errors: {other:?}"),
    }
}

#[test]
fn test_concurrent_callers_share_failed_construction() {
    const CALLERS: usize = 8;

    let factory = Arc::new(GatedFactory::failing("no CUDA driver found"));
    let registry = PluginRegistry::new(StaticSource::new([descriptor("gpu", factory.clone())]));

    let results = std::thread::scope(|s| {
        let handles: Vec<_> = (0..CALLERS)
            .map(|_| s.spawn(|| registry.for_name("gpu")))
            .collect();

        assert!(factory.wait_for_calls(1, Duration::from_secs(5)));
        // Give the other callers time to queue behind the first.
        std::thread::sleep(Duration::from_millis(50));
        factory.open();

        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect::<Vec<_>>()
    });

    assert_eq!(factory.calls(), 1);
    assert_eq!(registry.state("gpu"), Some(PluginState::Failed));
    let causes: Vec<Arc<WrangleError>> = results
        .into_iter()
        .map(|result| match result {
            Err(WrangleError::Construction { name, source }) => {
                assert_eq!(name, "gpu");
                source
            }
            other => panic!("unexpected result: {other:?}"),
        })
        .collect();
    assert_eq!(causes.len(), CALLERS);
    for cause in &causes[1..] {
        assert!(Arc::ptr_eq(&causes[0], cause));
    }
    assert_eq!(causes[0].to_string(), "plugin error: no CUDA driver found");
}

#[test]
fn test_panicking_constructor_leaves_name_failed() {
    let factory = Arc::new(PanickingFactory::new());
    let registry = PluginRegistry::new(StaticSource::new([descriptor("gpu", factory.clone())]));

    let joined = std::thread::scope(|s| s.spawn(|| registry.for_name("gpu")).join());
    assert!(joined.is_err());
    assert_eq!(registry.state("gpu"), Some(PluginState::Failed));

    let err = registry.for_name("gpu").unwrap_err();
    assert!(err.to_string().contains("panicked"));
    assert_eq!(factory.calls(), 1);
}

// ---- Resolve timeout ----

#[test]
fn test_waiter_gives_up_after_resolve_timeout() {
    let factory = Arc::new(GatedFactory::new(MockPlugin::monitor("gpu")));
    let registry = PluginRegistry::new(StaticSource::new([descriptor("gpu", factory.clone())]))
        .with_resolve_timeout(Some(Duration::from_millis(25)));

    std::thread::scope(|s| {
        let builder = s.spawn(|| registry.for_name("gpu"));
        assert!(factory.wait_for_calls(1, Duration::from_secs(5)));

        let err = registry.for_name("gpu").unwrap_err();
        assert!(matches!(err, WrangleError::ResolveTimeout { .. }));

        factory.open();
        builder.join().unwrap().unwrap();
    });

    // The constructing caller finished; later callers get the instance.
    registry.for_name("gpu").unwrap();
    assert_eq!(factory.calls(), 1);
}

// ---- Capability filtering ----

#[test]
fn test_find_matching_resource_monitors() {
    let (cpu, cpu_factory) = monitor("cpu");
    let (memory, memory_factory) = monitor("memory");
    let (gpu, gpu_factory) = monitor("gpu");
    let registry = PluginRegistry::new(StaticSource::new([cpu, memory, gpu]));

    let monitors = registry
        .find_matching(|d| d.declares(Capability::ResourceMonitoring))
        .unwrap();
    let names: Vec<&str> = monitors.iter().map(|p| p.name()).collect();
    assert_eq!(names, vec!["cpu", "gpu", "memory"]);
    for factory in [&cpu_factory, &memory_factory, &gpu_factory] {
        assert_eq!(factory.calls(), 1);
    }
}

#[test]
fn test_find_matching_constructs_only_matches() {
    let (cpu, cpu_factory) = monitor("cpu");
    let (gpu, gpu_factory) = monitor("gpu");
    let yaml_factory = Arc::new(CountingFactory::new(MockPlugin::flag_resolver(
        "yaml-flags",
        ["yaml"],
    )));
    let yaml = descriptor("yaml-flags", yaml_factory.clone())
        .with_capabilities([Capability::FlagResolution]);
    let registry = PluginRegistry::new(StaticSource::new([yaml, gpu, cpu]));

    let monitors = registry
        .with_capability(Capability::ResourceMonitoring)
        .unwrap();
    let names: Vec<&str> = monitors.iter().map(|p| p.name()).collect();
    assert_eq!(names, vec!["cpu", "gpu"]);

    assert_eq!(cpu_factory.calls(), 1);
    assert_eq!(gpu_factory.calls(), 1);
    assert_eq!(yaml_factory.calls(), 0);
    assert_eq!(registry.state("yaml-flags"), Some(PluginState::Unresolved));

    // Matches are the registry's singletons.
    let gpu_again = registry.for_name("gpu").unwrap();
    assert!(Arc::ptr_eq(&monitors[1], &gpu_again));
}

#[test]
fn test_instance_predicate_sees_constructed_plugins() {
    let (cpu, _) = monitor("cpu");
    let yaml_factory = Arc::new(CountingFactory::new(MockPlugin::flag_resolver(
        "yaml-flags",
        ["yaml", "yml"],
    )));
    let registry = PluginRegistry::new(StaticSource::new([
        cpu,
        descriptor("yaml-flags", yaml_factory.clone()),
    ]));

    let resolvers = registry
        .find_matching_instances(|p| {
            p.as_flag_resolver()
                .is_some_and(|resolver| resolver.supports("yml"))
        })
        .unwrap();
    assert_eq!(resolvers.len(), 1);
    assert_eq!(resolvers[0].name(), "yaml-flags");
    assert_eq!(yaml_factory.calls(), 1);
}

// ---- Enablement and priority ----

#[test]
fn test_enabled_for_keeps_every_match_and_by_priority_orders_them() {
    let plugins = [
        MockPlugin::new("alpha").enabled("alpha applies").with_priority(50),
        MockPlugin::new("beta").disabled("beta does not apply"),
        MockPlugin::new("gamma").enabled("gamma applies").with_priority(10),
        MockPlugin::new("delta").enabled("delta applies").with_priority(50),
    ];
    let registry = PluginRegistry::new(StaticSource::new(plugins.into_iter().map(|p| {
        let name = wrangle_core::Plugin::name(&p).to_string();
        descriptor(&name, Arc::new(CountingFactory::new(p)))
    })));

    let enabled = registry.enabled_for(&ExecContext::new("train")).unwrap();
    let names: Vec<&str> = enabled.iter().map(|e| e.plugin.name()).collect();
    assert_eq!(names, vec!["alpha", "delta", "gamma"]);
    assert_eq!(enabled[0].reason, "alpha applies");

    let ranked = by_priority(enabled);
    let names: Vec<&str> = ranked.iter().map(|e| e.plugin.name()).collect();
    assert_eq!(names, vec!["gamma", "alpha", "delta"]);
}
