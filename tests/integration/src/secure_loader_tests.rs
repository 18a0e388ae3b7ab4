//! End-to-end secure loader tests
//!
//! Runs the module-definition entry points against the toy PMOD definer
//! and a table-backed policy, the way an embedding runtime would.

use std::sync::atomic::Ordering;
use std::sync::{Arc, Barrier};
use std::thread;

use bytes::Bytes;

use palisade_core::Config;
use palisade_loader::{LoaderError, Permission, SecureLoader};
use palisade_provenance::Provenance;

use crate::test_utils::{module_image, StubDefiner, TableResolver, TestAuthority};

const CONFIG_TOML: &str = r#"
    [loader]
    name = "integration-loader"
    reserved_namespaces = ["boot."]

    [cache]
    initial_capacity = 16
"#;

fn loader_with(resolver: Arc<TableResolver>) -> SecureLoader<StubDefiner> {
    let config: Config = toml::from_str(CONFIG_TOML).unwrap();
    SecureLoader::from_config(&config, StubDefiner::new(), resolver)
}

#[test]
fn test_config_file_shapes_the_loader() {
    let config: Config = toml::from_str(CONFIG_TOML).unwrap();
    assert_eq!(config.loader.name, "integration-loader");
    assert_eq!(config.cache.initial_capacity, 16);
}

#[test]
fn test_end_to_end_policy_binding() {
    let _ = tracing_subscriber::fmt::try_init();

    let resolver = Arc::new(TableResolver::new());
    resolver.grant(
        "https://modules.example.com/app.bin",
        Permission::new("fs.read", "/opt/data"),
    );
    let definer = StubDefiner::new();
    let defined = definer.counter();
    let config: Config = toml::from_str(CONFIG_TOML).unwrap();
    let loader = SecureLoader::from_config(&config, definer, resolver.clone());

    let image = module_image(b"widget");
    let app = Provenance::unsigned("https://modules.example.com/app.bin");
    let vendor = Provenance::unsigned("https://modules.example.com/vendor.bin");

    tracing::info!("defining two modules from the app origin");
    let widget = loader
        .define_module(Some("app.Widget"), &image, 0, image.len(), Some(&app))
        .unwrap();
    let gadget = loader
        .define_module(Some("app.Gadget"), &image, 0, image.len(), Some(&app))
        .unwrap();

    tracing::info!("defining one module from the vendor origin");
    let driver = loader
        .define_module(Some("vendor.Driver"), &image, 0, image.len(), Some(&vendor))
        .unwrap();

    // One domain per origin, shared across modules of the same origin.
    assert!(Arc::ptr_eq(
        widget.domain().unwrap(),
        gadget.domain().unwrap()
    ));
    assert!(!Arc::ptr_eq(
        widget.domain().unwrap(),
        driver.domain().unwrap()
    ));

    // Grants follow the policy table per origin.
    let fs_read = Permission::new("fs.read", "/opt/data");
    assert!(widget.domain().unwrap().grants(&fs_read));
    assert!(!driver.domain().unwrap().grants(&fs_read));

    // The domain remembers which loading context owns it.
    assert_eq!(
        widget.domain().unwrap().context().name(),
        "integration-loader"
    );

    assert_eq!(resolver.calls(), 2);
    assert_eq!(loader.domains().len(), 2);
    assert_eq!(defined.load(Ordering::SeqCst), 3);
}

#[test]
fn test_concurrent_definitions_share_one_domain() {
    const THREADS: usize = 16;

    let resolver = Arc::new(TableResolver::new());
    let loader = Arc::new(loader_with(resolver.clone()));
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let loader = Arc::clone(&loader);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let image = module_image(format!("payload-{i}").as_bytes());
                let provenance = Provenance::unsigned("https://modules.example.com/hot.bin");
                let name = format!("app.Module{i}");
                barrier.wait();
                loader
                    .define_module(Some(&name), &image, 0, image.len(), Some(&provenance))
                    .unwrap()
            })
        })
        .collect();

    let handles: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    for handle in &handles[1..] {
        assert!(Arc::ptr_eq(
            handles[0].domain().unwrap(),
            handle.domain().unwrap()
        ));
    }
    assert_eq!(resolver.calls(), 1);
    assert_eq!(loader.domains().len(), 1);
}

#[test]
fn test_reset_checkpoint_rebuilds_domains() {
    let resolver = Arc::new(TableResolver::new());
    let loader = loader_with(resolver.clone());
    let image = module_image(b"payload");
    let provenance = Provenance::unsigned("https://modules.example.com/app.bin");

    let before = loader
        .define_module(None, &image, 0, image.len(), Some(&provenance))
        .unwrap();

    // Checkpoint: drop cached domains before capturing process state.
    loader.reset_domains();
    assert!(loader.domains().is_empty());

    let after = loader
        .define_module(None, &image, 0, image.len(), Some(&provenance))
        .unwrap();

    assert!(!Arc::ptr_eq(
        before.domain().unwrap(),
        after.domain().unwrap()
    ));
    assert_eq!(resolver.calls(), 2);
}

#[test]
fn test_buffer_and_range_entry_points_share_domains() {
    let authority = TestAuthority::new("integration-ca");
    let cert = authority.issue("1", "vendor");

    let loader = loader_with(Arc::new(TableResolver::new()));
    let provenance = Provenance::new(
        "https://modules.example.com/signed.bin",
        Some(vec![cert]),
    );

    let buffer = Bytes::from(module_image(b"payload"));
    let from_buffer = loader
        .define_module_buffer(Some("app.Widget"), &buffer, Some(&provenance))
        .unwrap();
    let from_range = loader
        .define_module(Some("app.Gadget"), &buffer, 0, buffer.len(), Some(&provenance))
        .unwrap();

    assert!(Arc::ptr_eq(
        from_buffer.domain().unwrap(),
        from_range.domain().unwrap()
    ));
    assert_eq!(loader.domains().len(), 1);
}

#[test]
fn test_trust_policy_violations_leave_the_cache_alone() {
    let authority = TestAuthority::new("integration-ca");
    let loader = loader_with(Arc::new(TableResolver::new()));
    let image = module_image(b"payload");

    // Reserved namespace from the TOML config.
    let err = loader
        .define_module(Some("boot.Init"), &image, 0, image.len(), None)
        .unwrap_err();
    assert!(matches!(err, LoaderError::ReservedNamespace { .. }));

    // Pin app.* to one signer, then present another.
    let signed = Provenance::new(
        "https://modules.example.com/a.bin",
        Some(vec![authority.issue("1", "vendor")]),
    );
    loader
        .define_module(Some("app.Widget"), &image, 0, image.len(), Some(&signed))
        .unwrap();

    let other = Provenance::new(
        "https://modules.example.com/b.bin",
        Some(vec![authority.issue("2", "intruder")]),
    );
    let err = loader
        .define_module(Some("app.Gadget"), &image, 0, image.len(), Some(&other))
        .unwrap_err();
    assert!(matches!(err, LoaderError::SignerMismatch { .. }));

    // Only the accepted origin made it into the cache.
    assert_eq!(loader.domains().len(), 1);
}
