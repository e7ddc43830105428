//! `${name}` placeholder substitution over a loaded feature.
//!
//! Placeholders may appear in framework property values and configuration
//! property strings. Lookup order: caller-supplied overrides first, then
//! the feature's own `variables` section. A placeholder with no value in
//! either is an error; substitution has no partial-success mode.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use launcher_model::Feature;
use regex::Regex;
use serde_json::Value;

use crate::error::{Error, Result};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern compiles"));

/// Substitute all placeholders in the feature, in place.
pub fn resolve_variables(
    feature: &mut Feature,
    overrides: &BTreeMap<String, String>,
) -> Result<()> {
    let defaults = feature.variables.clone();
    let lookup = VariableLookup {
        overrides,
        defaults: &defaults,
    };

    for (name, value) in feature.framework_properties.iter_mut() {
        substitute_value(value, &lookup, &format!("framework property {name:?}"))?;
    }

    for configuration in &mut feature.configurations {
        let key = configuration.key();
        for (name, value) in configuration.properties.iter_mut() {
            substitute_value(
                value,
                &lookup,
                &format!("configuration {key} property {name:?}"),
            )?;
        }
    }

    Ok(())
}

struct VariableLookup<'a> {
    overrides: &'a BTreeMap<String, String>,
    defaults: &'a serde_json::Map<String, Value>,
}

impl VariableLookup<'_> {
    fn get(&self, name: &str) -> Option<String> {
        if let Some(value) = self.overrides.get(name) {
            return Some(value.clone());
        }
        self.defaults.get(name).map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

fn substitute_value(value: &mut Value, lookup: &VariableLookup<'_>, context: &str) -> Result<()> {
    if let Value::String(text) = value {
        *text = substitute(text, lookup, context)?;
    }
    Ok(())
}

fn substitute(input: &str, lookup: &VariableLookup<'_>, context: &str) -> Result<String> {
    let mut output = String::with_capacity(input.len());
    let mut last_end = 0;

    for captures in PLACEHOLDER.captures_iter(input) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        let name = &captures[1];
        let replacement = lookup.get(name).ok_or_else(|| Error::UnresolvedVariable {
            name: name.to_string(),
            context: context.to_string(),
        })?;
        output.push_str(&input[last_end..whole.start()]);
        output.push_str(&replacement);
        last_end = whole.end();
    }
    output.push_str(&input[last_end..]);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use launcher_model::{ArtifactId, Configuration};
    use pretty_assertions::assert_eq;

    fn feature_with_property(value: &str) -> Feature {
        let mut feature = Feature::new(ArtifactId::new("org.example", "app", "1.0.0"));
        feature
            .framework_properties
            .insert("storage".to_string(), Value::String(value.to_string()));
        feature
    }

    #[test]
    fn substitutes_from_feature_variables() {
        let mut feature = feature_with_property("${home}/framework");
        feature
            .variables
            .insert("home".to_string(), Value::String("/opt/launcher".to_string()));

        resolve_variables(&mut feature, &BTreeMap::new()).unwrap();
        assert_eq!(
            feature.framework_properties["storage"],
            Value::String("/opt/launcher/framework".to_string())
        );
    }

    #[test]
    fn overrides_take_precedence_over_defaults() {
        let mut feature = feature_with_property("${home}");
        feature
            .variables
            .insert("home".to_string(), Value::String("/default".to_string()));

        let overrides = BTreeMap::from([("home".to_string(), "/override".to_string())]);
        resolve_variables(&mut feature, &overrides).unwrap();
        assert_eq!(
            feature.framework_properties["storage"],
            Value::String("/override".to_string())
        );
    }

    #[test]
    fn multiple_placeholders_in_one_value() {
        let mut feature = feature_with_property("${a}-${b}");
        let overrides = BTreeMap::from([
            ("a".to_string(), "left".to_string()),
            ("b".to_string(), "right".to_string()),
        ]);
        resolve_variables(&mut feature, &overrides).unwrap();
        assert_eq!(
            feature.framework_properties["storage"],
            Value::String("left-right".to_string())
        );
    }

    #[test]
    fn unresolved_placeholder_fails() {
        let mut feature = feature_with_property("${missing}");
        let err = resolve_variables(&mut feature, &BTreeMap::new()).unwrap_err();
        match err {
            Error::UnresolvedVariable { name, .. } => assert_eq!(name, "missing"),
            other => panic!("expected UnresolvedVariable, got {other:?}"),
        }
    }

    #[test]
    fn substitutes_configuration_properties() {
        let mut feature = Feature::new(ArtifactId::new("org.example", "app", "1.0.0"));
        feature.configurations.push(
            Configuration::singleton("org.example.Service")
                .with_property("path", "${home}/data"),
        );
        feature
            .variables
            .insert("home".to_string(), Value::String("/opt".to_string()));

        resolve_variables(&mut feature, &BTreeMap::new()).unwrap();
        assert_eq!(
            feature.configurations[0].properties["path"],
            Value::String("/opt/data".to_string())
        );
    }

    #[test]
    fn non_string_values_pass_through() {
        let mut feature = Feature::new(ArtifactId::new("org.example", "app", "1.0.0"));
        feature
            .framework_properties
            .insert("count".to_string(), Value::from(3));
        resolve_variables(&mut feature, &BTreeMap::new()).unwrap();
        assert_eq!(feature.framework_properties["count"], Value::from(3));
    }
}
