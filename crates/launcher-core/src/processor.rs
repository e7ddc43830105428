//! The feature processor: loading, normalizing, and turning a feature
//! into an installation plan.
//!
//! All functions here are stateless; configuration, resolver, and feature
//! are explicit parameters, and every step short-circuits on the first
//! error. A failed pass leaves no usable plan behind; callers discard
//! whatever was partially built.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use launcher_io::{ArtifactRef, ArtifactResolver, parse_feature, resolve_variables, serialize_feature, write_atomic};
use launcher_model::{
    ArtifactId, EXTENSION_NAME_REPOINIT, ExtensionPayload, Feature, REPOINIT_FACTORY_PID,
    SCRIPTS_PROPERTY, START_LEVEL_KEY, START_ORDER_UNSET,
};
use serde_json::{Map, Value};

use crate::config::{LauncherConfig, StartupMode};
use crate::error::{Error, Result};
use crate::plan::InstallationPlan;

/// Load the application feature and prepare it for planning.
///
/// With an explicit application location the descriptor is loaded from
/// there and the resolved result is persisted to the cache path under the
/// launcher home, so later runs can start without the original location.
/// Without one, the cached descriptor is loaded directly. Either way the
/// bundles' start orders are normalized before the feature is returned.
///
/// A persistence failure is reported as [`Error::Persistence`]; the
/// caller is expected to treat it as fatal for the process.
pub fn create_application(
    config: &LauncherConfig,
    resolver: &dyn ArtifactResolver,
) -> Result<Feature> {
    let mut feature = match config.application_file.as_deref() {
        Some(location) => {
            let feature = load_feature(location, resolver, config)?;
            let cache_path = config.application_cache_path();
            persist_feature(&feature, &cache_path)?;
            tracing::info!(
                application = %feature.id,
                cache = %cache_path.display(),
                "cached application descriptor"
            );
            feature
        }
        None => {
            let cache_path = config.application_cache_path();
            load_feature(&cache_path.display().to_string(), resolver, config)?
        }
    };

    normalize_start_orders(&mut feature)?;
    Ok(feature)
}

/// Resolve a descriptor location, parse it, and substitute variables.
fn load_feature(
    location: &str,
    resolver: &dyn ArtifactResolver,
    config: &LauncherConfig,
) -> Result<Feature> {
    let resolved = resolver.resolve_location(location)?;
    let content = std::fs::read_to_string(&resolved.file)
        .map_err(|e| launcher_io::Error::io(&resolved.file, e))?;
    let mut feature = parse_feature(&content, &resolved.source)?;
    resolve_variables(&mut feature, &config.variables)?;
    Ok(feature)
}

fn persist_feature(feature: &Feature, cache_path: &Path) -> Result<()> {
    let persist = |source: launcher_io::Error| Error::Persistence {
        path: cache_path.to_path_buf(),
        source,
    };
    let content = serialize_feature(feature).map_err(persist)?;
    write_atomic(cache_path, content.as_bytes()).map_err(persist)
}

/// Assign a start order to every bundle still carrying the unset
/// sentinel: the `start-level` metadata value when present, otherwise 1.
/// Bundles with an explicit nonzero order are left alone.
pub fn normalize_start_orders(feature: &mut Feature) -> Result<()> {
    for bundle in feature.bundles.iter_mut() {
        if bundle.start_order != START_ORDER_UNSET {
            continue;
        }
        bundle.start_order = match bundle.metadata.get(START_LEVEL_KEY) {
            Some(value) => parse_start_level(&bundle.id, value)?,
            None => 1,
        };
    }
    Ok(())
}

fn parse_start_level(bundle: &ArtifactId, value: &str) -> Result<u32> {
    let invalid = |reason: &str| Error::InvalidStartLevel {
        bundle: bundle.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };
    let level: u32 = value.parse().map_err(|_| invalid("not an integer"))?;
    if level == START_ORDER_UNSET {
        return Err(invalid("start level must be at least 1"));
    }
    Ok(level)
}

/// Fold the feature into the installation plan.
///
/// Bundles are resolved by ascending start order, extensions dispatched
/// in declaration order, then declared configurations and framework
/// properties are merged (first writer wins for properties). The first
/// failure aborts the pass; the plan must then be discarded.
pub fn prepare_launcher(
    plan: &mut InstallationPlan,
    config: &LauncherConfig,
    resolver: &dyn ArtifactResolver,
    feature: &Feature,
) -> Result<()> {
    for (start_order, bundles) in feature.bundles.by_start_order() {
        for bundle in bundles {
            let resolved = resolver.resolve(&ArtifactRef::Coordinate(bundle.id.clone()))?;
            plan.add_bundle(start_order, resolved.file);
        }
    }

    // 1-based occurrence index for synthetic repoinit configurations,
    // scoped to this pass
    let mut repoinit_occurrence = 1u32;

    for extension in &feature.extensions {
        match &extension.payload {
            ExtensionPayload::Artifacts(artifacts) => {
                if config.startup_mode == StartupMode::ModulesOnly {
                    return Err(Error::Policy {
                        extension: extension.name.clone(),
                    });
                }
                for id in artifacts {
                    let resolved = resolver.resolve(&ArtifactRef::Coordinate(id.clone()))?;
                    plan.add_installable_artifact(resolved.file);
                }
            }
            ExtensionPayload::Text(text) if extension.name == EXTENSION_NAME_REPOINIT => {
                add_repoinit_configuration(plan, &mut repoinit_occurrence, text.clone());
            }
            ExtensionPayload::StructuredText(lines)
                if extension.name == EXTENSION_NAME_REPOINIT =>
            {
                add_repoinit_configuration(plan, &mut repoinit_occurrence, lines.join("\n"));
            }
            ExtensionPayload::Text(_) | ExtensionPayload::StructuredText(_) => {
                if extension.required {
                    return Err(Error::UnknownExtension {
                        name: extension.name.clone(),
                    });
                }
                tracing::debug!(name = %extension.name, "ignoring optional unknown extension");
            }
        }
    }

    for configuration in &feature.configurations {
        match &configuration.kind {
            launcher_model::ConfigurationKind::Factory { factory_pid, name } => {
                plan.add_configuration(
                    name.clone(),
                    Some(factory_pid.clone()),
                    configuration.properties.clone(),
                );
            }
            launcher_model::ConfigurationKind::Singleton { pid } => {
                plan.add_configuration(pid.clone(), None, configuration.properties.clone());
            }
        }
    }

    for (name, value) in &feature.framework_properties {
        if !plan.set_framework_property(name.clone(), value.clone()) {
            tracing::debug!(property = %name, "framework property already set, keeping existing value");
        }
    }

    Ok(())
}

fn add_repoinit_configuration(plan: &mut InstallationPlan, occurrence: &mut u32, scripts: String) {
    let name = format!("{}{}", EXTENSION_NAME_REPOINIT, occurrence);
    *occurrence += 1;

    let mut properties = Map::new();
    properties.insert(SCRIPTS_PROPERTY.to_string(), Value::String(scripts));
    plan.add_configuration(name, Some(REPOINIT_FACTORY_PID.to_string()), properties);
}

/// Resolve every referenced artifact to its local file, for cache
/// warm-up.
///
/// Covers bundles and artifact-list extension entries. Unlike
/// [`prepare_launcher`] this never applies startup-mode policy, and it
/// does not touch any plan. A repeated artifact id keeps the latest
/// resolution.
pub fn calculate_artifacts(
    resolver: &dyn ArtifactResolver,
    feature: &Feature,
) -> Result<HashMap<ArtifactId, PathBuf>> {
    let mut result = HashMap::new();

    for bundles in feature.bundles.by_start_order().values() {
        for bundle in bundles {
            let resolved = resolver.resolve(&ArtifactRef::Coordinate(bundle.id.clone()))?;
            result.insert(bundle.id.clone(), resolved.file);
        }
    }

    for extension in &feature.extensions {
        if let ExtensionPayload::Artifacts(artifacts) = &extension.payload {
            for id in artifacts {
                let resolved = resolver.resolve(&ArtifactRef::Coordinate(id.clone()))?;
                result.insert(id.clone(), resolved.file);
            }
        }
    }

    Ok(result)
}
