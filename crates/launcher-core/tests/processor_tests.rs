//! End-to-end tests for the feature processor against a stub resolver.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};

use launcher_core::{
    Error, InstallationPlan, LauncherConfig, StartupMode, calculate_artifacts, create_application,
    normalize_start_orders, prepare_launcher,
};
use launcher_io::{ArtifactRef, ArtifactResolver, LocalRepositoryResolver, ResolvedArtifact};
use launcher_model::{
    ArtifactId, Bundle, Configuration, EXTENSION_NAME_REPOINIT, Extension, ExtensionPayload,
    Feature, REPOINIT_FACTORY_PID, SCRIPTS_PROPERTY,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::Value;

/// Resolver mapping every coordinate to a fake cache file, recording
/// nothing on disk.
struct StubResolver;

impl ArtifactResolver for StubResolver {
    fn resolve(&self, reference: &ArtifactRef) -> launcher_io::Result<ResolvedArtifact> {
        match reference {
            ArtifactRef::Coordinate(id) => Ok(ResolvedArtifact {
                file: PathBuf::from("/cache").join(id.to_repository_path()),
                source: id.to_string(),
            }),
            ArtifactRef::Path(path) => Ok(ResolvedArtifact {
                file: path.clone(),
                source: path.display().to_string(),
            }),
        }
    }
}

/// Resolver that fails for one specific artifact id.
struct FailingResolver {
    missing: ArtifactId,
}

impl ArtifactResolver for FailingResolver {
    fn resolve(&self, reference: &ArtifactRef) -> launcher_io::Result<ResolvedArtifact> {
        if let ArtifactRef::Coordinate(id) = reference {
            if *id == self.missing {
                return Err(launcher_io::Error::ArtifactNotFound {
                    reference: id.to_string(),
                });
            }
        }
        StubResolver.resolve(reference)
    }
}

/// Resolver returning a distinct file per call, to observe resolution
/// ordering.
struct CountingResolver {
    calls: AtomicU32,
}

impl CountingResolver {
    fn new() -> Self {
        Self {
            calls: AtomicU32::new(0),
        }
    }
}

impl ArtifactResolver for CountingResolver {
    fn resolve(&self, reference: &ArtifactRef) -> launcher_io::Result<ResolvedArtifact> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ResolvedArtifact {
            file: PathBuf::from(format!("/cache/resolution-{call}")),
            source: reference.to_string(),
        })
    }
}

fn id(artifact: &str) -> ArtifactId {
    ArtifactId::new("org.example", artifact, "1.0.0")
}

fn feature() -> Feature {
    Feature::new(ArtifactId::new("org.example", "app", "1.0.0"))
}

fn install_config() -> LauncherConfig {
    LauncherConfig::new("/tmp/launcher-home")
}

fn artifacts_extension(required: bool, ids: Vec<ArtifactId>) -> Extension {
    Extension::new("content-packages", required, ExtensionPayload::Artifacts(ids))
}

// --- start-order normalization ---

#[rstest]
#[case(None, 1)]
#[case(Some("20"), 20)]
#[case(Some("1"), 1)]
fn unset_start_order_normalizes(#[case] start_level: Option<&str>, #[case] expected: u32) {
    let mut f = feature();
    let mut bundle = Bundle::new(id("core"));
    if let Some(level) = start_level {
        bundle = bundle.with_metadata("start-level", level);
    }
    f.bundles.push(bundle);

    normalize_start_orders(&mut f).unwrap();
    assert_eq!(f.bundles.iter().next().unwrap().start_order, expected);
}

#[test]
fn explicit_start_order_is_untouched() {
    let mut f = feature();
    f.bundles
        .push(Bundle::new(id("core")).with_start_order(7).with_metadata("start-level", "3"));

    normalize_start_orders(&mut f).unwrap();
    assert_eq!(f.bundles.iter().next().unwrap().start_order, 7);
}

#[rstest]
#[case("abc")]
#[case("-1")]
#[case("0")]
fn invalid_start_level_metadata_fails(#[case] level: &str) {
    let mut f = feature();
    f.bundles
        .push(Bundle::new(id("core")).with_metadata("start-level", level));

    let err = normalize_start_orders(&mut f).unwrap_err();
    assert!(matches!(err, Error::InvalidStartLevel { .. }), "got {err:?}");
}

// --- bundle planning ---

#[test]
fn bundles_are_planned_by_ascending_start_order() {
    let mut f = feature();
    f.bundles.push(Bundle::new(id("late")).with_start_order(5));
    f.bundles.push(Bundle::new(id("early")).with_start_order(1));
    f.bundles.push(Bundle::new(id("also-late")).with_start_order(5));

    let mut plan = InstallationPlan::new();
    prepare_launcher(&mut plan, &install_config(), &StubResolver, &f).unwrap();

    let orders: Vec<u32> = plan.bundle_map().keys().copied().collect();
    assert_eq!(orders, vec![1, 5]);
    assert_eq!(
        plan.bundle_map()[&5],
        vec![
            PathBuf::from("/cache").join(id("late").to_repository_path()),
            PathBuf::from("/cache").join(id("also-late").to_repository_path()),
        ]
    );
    assert_eq!(plan.bundle_count(), 3);
}

#[test]
fn bundle_resolution_failure_aborts_preparation() {
    let mut f = feature();
    f.bundles.push(Bundle::new(id("present")).with_start_order(1));
    f.bundles.push(Bundle::new(id("absent")).with_start_order(2));

    let resolver = FailingResolver { missing: id("absent") };
    let mut plan = InstallationPlan::new();
    let err = prepare_launcher(&mut plan, &install_config(), &resolver, &f).unwrap_err();
    assert!(matches!(
        err,
        Error::Io(launcher_io::Error::ArtifactNotFound { .. })
    ));
}

// --- extension dispatch ---

#[test]
fn artifact_extension_installs_under_install_mode() {
    let mut f = feature();
    f.extensions
        .push(artifacts_extension(false, vec![id("pack-a"), id("pack-b")]));

    let mut plan = InstallationPlan::new();
    prepare_launcher(&mut plan, &install_config(), &StubResolver, &f).unwrap();

    assert_eq!(
        plan.installable_artifacts(),
        &[
            PathBuf::from("/cache").join(id("pack-a").to_repository_path()),
            PathBuf::from("/cache").join(id("pack-b").to_repository_path()),
        ]
    );
}

#[test]
fn artifact_extension_violates_modules_only_mode() {
    let mut f = feature();
    f.extensions.push(artifacts_extension(false, vec![id("pack-a")]));

    let config = install_config().with_startup_mode(StartupMode::ModulesOnly);
    let mut plan = InstallationPlan::new();
    let err = prepare_launcher(&mut plan, &config, &StubResolver, &f).unwrap_err();
    assert!(matches!(err, Error::Policy { .. }), "got {err:?}");
}

#[test]
fn policy_failure_stops_later_extensions() {
    let mut f = feature();
    f.extensions.push(artifacts_extension(false, vec![id("pack-a")]));
    f.extensions.push(Extension::new(
        EXTENSION_NAME_REPOINIT,
        false,
        ExtensionPayload::Text("create path /content".to_string()),
    ));

    let config = install_config().with_startup_mode(StartupMode::ModulesOnly);
    let mut plan = InstallationPlan::new();
    let err = prepare_launcher(&mut plan, &config, &StubResolver, &f).unwrap_err();
    assert!(matches!(err, Error::Policy { .. }));
    // The repoinit extension after the failing one was never dispatched
    assert!(plan.configurations().is_empty());
}

#[test]
fn text_repoinit_uses_content_verbatim() {
    let mut f = feature();
    f.extensions.push(Extension::new(
        EXTENSION_NAME_REPOINIT,
        false,
        ExtensionPayload::Text("hello".to_string()),
    ));

    let mut plan = InstallationPlan::new();
    prepare_launcher(&mut plan, &install_config(), &StubResolver, &f).unwrap();

    let cfg = &plan.configurations()[0];
    assert_eq!(cfg.name, "repoinit1");
    assert_eq!(cfg.factory_pid.as_deref(), Some(REPOINIT_FACTORY_PID));
    assert_eq!(cfg.properties[SCRIPTS_PROPERTY], Value::from("hello"));
}

#[rstest]
#[case(vec!["a", "b"], "a\nb")]
#[case(vec![], "")]
#[case(vec!["only"], "only")]
fn structured_repoinit_joins_lines(#[case] lines: Vec<&str>, #[case] expected: &str) {
    let mut f = feature();
    f.extensions.push(Extension::new(
        EXTENSION_NAME_REPOINIT,
        false,
        ExtensionPayload::StructuredText(lines.into_iter().map(String::from).collect()),
    ));

    let mut plan = InstallationPlan::new();
    prepare_launcher(&mut plan, &install_config(), &StubResolver, &f).unwrap();
    assert_eq!(
        plan.configurations()[0].properties[SCRIPTS_PROPERTY],
        Value::from(expected)
    );
}

#[test]
fn repoinit_instances_are_numbered_in_declaration_order() {
    let mut f = feature();
    f.extensions.push(Extension::new(
        EXTENSION_NAME_REPOINIT,
        false,
        ExtensionPayload::Text("first".to_string()),
    ));
    f.extensions.push(Extension::new(
        "ignored-optional",
        false,
        ExtensionPayload::Text("noise".to_string()),
    ));
    f.extensions.push(Extension::new(
        EXTENSION_NAME_REPOINIT,
        false,
        ExtensionPayload::StructuredText(vec!["second".to_string()]),
    ));

    let mut plan = InstallationPlan::new();
    prepare_launcher(&mut plan, &install_config(), &StubResolver, &f).unwrap();

    let names: Vec<&str> = plan
        .configurations()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["repoinit1", "repoinit2"]);
    assert_eq!(
        plan.configurations()[0].properties[SCRIPTS_PROPERTY],
        Value::from("first")
    );
    assert_eq!(
        plan.configurations()[1].properties[SCRIPTS_PROPERTY],
        Value::from("second")
    );
}

#[test]
fn optional_unknown_extension_is_ignored() {
    let mut f = feature();
    f.extensions.push(Extension::new(
        "analytics",
        false,
        ExtensionPayload::Text("whatever".to_string()),
    ));

    let mut plan = InstallationPlan::new();
    prepare_launcher(&mut plan, &install_config(), &StubResolver, &f).unwrap();
    assert!(plan.configurations().is_empty());
    assert!(plan.installable_artifacts().is_empty());
}

#[test]
fn required_unknown_extension_fails() {
    let mut f = feature();
    f.extensions.push(Extension::new(
        "analytics",
        true,
        ExtensionPayload::Text("whatever".to_string()),
    ));

    let mut plan = InstallationPlan::new();
    let err = prepare_launcher(&mut plan, &install_config(), &StubResolver, &f).unwrap_err();
    match err {
        Error::UnknownExtension { name } => assert_eq!(name, "analytics"),
        other => panic!("expected UnknownExtension, got {other:?}"),
    }
}

// --- configuration and property merging ---

#[test]
fn declared_configurations_are_folded_in() {
    let mut f = feature();
    f.configurations
        .push(Configuration::singleton("org.example.Service").with_property("enabled", true));
    f.configurations
        .push(Configuration::factory("org.example.Factory", "one").with_property("rank", 1));

    let mut plan = InstallationPlan::new();
    prepare_launcher(&mut plan, &install_config(), &StubResolver, &f).unwrap();

    assert_eq!(plan.configurations().len(), 2);
    let singleton = &plan.configurations()[0];
    assert_eq!(singleton.name, "org.example.Service");
    assert_eq!(singleton.factory_pid, None);
    let factory = &plan.configurations()[1];
    assert_eq!(factory.name, "one");
    assert_eq!(factory.factory_pid.as_deref(), Some("org.example.Factory"));
}

#[test]
fn framework_property_merge_is_first_wins() {
    let mut f = feature();
    f.framework_properties
        .insert("foo".to_string(), Value::from("2"));
    f.framework_properties
        .insert("bar".to_string(), Value::from("3"));

    let mut plan = InstallationPlan::new();
    // Simulates a property already set by an earlier feature merge
    plan.set_framework_property("foo", Value::from("1"));

    prepare_launcher(&mut plan, &install_config(), &StubResolver, &f).unwrap();

    assert_eq!(plan.framework_properties()["foo"], Value::from("1"));
    assert_eq!(plan.framework_properties()["bar"], Value::from("3"));
}

// --- artifact mapping ---

#[test]
fn artifact_map_covers_bundles_and_artifact_extensions_exactly() {
    let mut f = feature();
    f.bundles.push(Bundle::new(id("core")).with_start_order(1));
    f.bundles.push(Bundle::new(id("extra")).with_start_order(2));
    f.extensions.push(artifacts_extension(false, vec![id("pack-a")]));
    f.extensions.push(Extension::new(
        EXTENSION_NAME_REPOINIT,
        false,
        ExtensionPayload::Text("not an artifact".to_string()),
    ));

    let map = calculate_artifacts(&StubResolver, &f).unwrap();

    let mut keys: Vec<String> = map.keys().map(ToString::to_string).collect();
    keys.sort();
    assert_eq!(
        keys,
        vec![
            "org.example:core:1.0.0",
            "org.example:extra:1.0.0",
            "org.example:pack-a:1.0.0",
        ]
    );
    assert_eq!(
        map[&id("core")],
        PathBuf::from("/cache").join(id("core").to_repository_path())
    );
}

#[test]
fn artifact_map_ignores_startup_mode_restrictions() {
    // calculate_artifacts takes no startup mode at all; artifact-list
    // extensions are resolved unconditionally for cache warm-up
    let mut f = feature();
    f.extensions.push(artifacts_extension(false, vec![id("pack-a")]));

    let map = calculate_artifacts(&StubResolver, &f).unwrap();
    assert!(map.contains_key(&id("pack-a")));
}

#[test]
fn artifact_map_keeps_latest_resolution_for_duplicates() {
    let mut f = feature();
    f.bundles.push(Bundle::new(id("shared")).with_start_order(1));
    f.extensions.push(artifacts_extension(false, vec![id("shared")]));

    let resolver = CountingResolver::new();
    let map = calculate_artifacts(&resolver, &f).unwrap();

    assert_eq!(map.len(), 1);
    // Bundle resolution was call 0, the extension entry call 1; the later
    // one wins
    assert_eq!(map[&id("shared")], PathBuf::from("/cache/resolution-1"));
}

#[test]
fn artifact_map_resolution_failure_aborts() {
    let mut f = feature();
    f.bundles.push(Bundle::new(id("absent")).with_start_order(1));

    let resolver = FailingResolver { missing: id("absent") };
    let err = calculate_artifacts(&resolver, &f).unwrap_err();
    assert!(matches!(
        err,
        Error::Io(launcher_io::Error::ArtifactNotFound { .. })
    ));
}

// --- application loading and caching ---

const DESCRIPTOR: &str = r#"{
    "id": "org.example:app:1.0.0",
    "bundles": [
        {"id": "org.example:core:1.0.0", "start-level": 15}
    ],
    "framework-properties": {
        "storage": "${home}/framework"
    },
    "variables": {
        "home": "/default-home"
    }
}"#;

#[test]
fn explicit_location_is_loaded_resolved_and_cached() {
    let home = tempfile::TempDir::new().unwrap();
    let descriptor = home.path().join("feature.json");
    std::fs::write(&descriptor, DESCRIPTOR).unwrap();

    let config = LauncherConfig::new(home.path())
        .with_application_file(descriptor.display().to_string())
        .with_variable("home", "/opt/launcher");

    let resolver = LocalRepositoryResolver::default();
    let app = create_application(&config, &resolver).unwrap();

    // Variables resolved with overrides winning, start orders normalized
    assert_eq!(
        app.framework_properties["storage"],
        Value::from("/opt/launcher/framework")
    );
    assert_eq!(app.bundles.iter().next().unwrap().start_order, 15);

    // The resolved feature was persisted to the cache path
    let cached = std::fs::read_to_string(config.application_cache_path()).unwrap();
    assert!(cached.contains("/opt/launcher/framework"));
}

#[test]
fn without_explicit_location_the_cache_is_loaded() {
    let home = tempfile::TempDir::new().unwrap();

    // First run with an explicit location populates the cache
    let descriptor = home.path().join("feature.json");
    std::fs::write(&descriptor, DESCRIPTOR).unwrap();
    let first = LauncherConfig::new(home.path())
        .with_application_file(descriptor.display().to_string());
    let resolver = LocalRepositoryResolver::default();
    create_application(&first, &resolver).unwrap();

    // Second run without one reads the cache
    let second = LauncherConfig::new(home.path());
    let app = create_application(&second, &resolver).unwrap();
    assert_eq!(app.id, ArtifactId::new("org.example", "app", "1.0.0"));
}

#[test]
fn cache_write_failure_is_a_persistence_error() {
    let home = tempfile::TempDir::new().unwrap();
    // Occupy the cache parent path with a regular file so the descriptor
    // cannot be persisted
    std::fs::write(home.path().join("resources"), b"not a directory").unwrap();

    let descriptor = home.path().join("feature.json");
    std::fs::write(&descriptor, DESCRIPTOR).unwrap();
    let config = LauncherConfig::new(home.path())
        .with_application_file(descriptor.display().to_string());
    let resolver = LocalRepositoryResolver::default();

    let err = create_application(&config, &resolver).unwrap_err();
    assert!(matches!(err, Error::Persistence { .. }), "got {err:?}");
}

#[test]
fn missing_cache_without_explicit_location_fails() {
    let home = tempfile::TempDir::new().unwrap();
    let config = LauncherConfig::new(home.path());
    let resolver = LocalRepositoryResolver::default();

    let err = create_application(&config, &resolver).unwrap_err();
    assert!(matches!(
        err,
        Error::Io(launcher_io::Error::ArtifactNotFound { .. })
    ));
}

#[test]
fn malformed_descriptor_is_a_parse_error() {
    let home = tempfile::TempDir::new().unwrap();
    let descriptor = home.path().join("feature.json");
    std::fs::write(&descriptor, "{broken").unwrap();

    let config = LauncherConfig::new(home.path())
        .with_application_file(descriptor.display().to_string());
    let resolver = LocalRepositoryResolver::default();

    let err = create_application(&config, &resolver).unwrap_err();
    assert!(matches!(err, Error::Io(launcher_io::Error::Parse { .. })));
}

#[test]
fn unresolved_variable_fails_loading() {
    let home = tempfile::TempDir::new().unwrap();
    let descriptor = home.path().join("feature.json");
    std::fs::write(
        &descriptor,
        r#"{"id": "org.example:app:1.0.0", "framework-properties": {"p": "${nowhere}"}}"#,
    )
    .unwrap();

    let config = LauncherConfig::new(home.path())
        .with_application_file(descriptor.display().to_string());
    let resolver = LocalRepositoryResolver::default();

    let err = create_application(&config, &resolver).unwrap_err();
    assert!(matches!(
        err,
        Error::Io(launcher_io::Error::UnresolvedVariable { .. })
    ));
}
