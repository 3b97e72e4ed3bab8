use std::path::PathBuf;

use super::*;
use crate::config::ValidatorSettings;
use crate::scanner::EntryKind;

fn entry(dir: &str, name: &str, kind: EntryKind) -> Entry {
    Entry::new(PathBuf::from(dir).join(name), kind)
}

#[test]
fn builtin_registry_has_all_validators_in_order() {
    let registry = ValidatorRegistry::builtin().unwrap();
    let keys: Vec<_> = registry.definitions().iter().map(|d| d.key).collect();
    assert_eq!(keys, ValidatorRegistry::KEYS);
}

#[test]
fn enabled_respects_config_switches() {
    let registry = ValidatorRegistry::builtin().unwrap();
    let mut config = Config::default();
    config.validators.insert(
        "sample".to_string(),
        ValidatorSettings {
            enabled: Some(false),
            patterns: None,
        },
    );

    let enabled = registry.enabled(&config);
    assert_eq!(enabled.len(), 1);
    assert_eq!(enabled[0].key, "forbidden_extra");
}

#[test]
fn all_validators_enabled_by_default() {
    let registry = ValidatorRegistry::builtin().unwrap();
    assert_eq!(registry.enabled(&Config::default()).len(), 2);
}

#[test]
fn unknown_validator_key_is_a_config_error() {
    let mut config = Config::default();
    config
        .validators
        .insert("nfo".to_string(), ValidatorSettings::default());

    let err = ValidatorRegistry::from_config(&config).unwrap_err();
    assert!(err.to_string().contains("Unknown validator 'nfo'"));
}

#[test]
fn pattern_overrides_replace_builtin_patterns() {
    let mut config = Config::default();
    config.validators.insert(
        "forbidden_extra".to_string(),
        ValidatorSettings {
            enabled: None,
            patterns: Some(vec!["*.par2".to_string()]),
        },
    );
    let registry = ValidatorRegistry::from_config(&config).unwrap();
    let forbidden = &registry.definitions()[1];

    let entries = vec![
        entry("/r", "extra.zip", EntryKind::File),
        entry("/r", "release.par2", EntryKind::File),
    ];
    let errors = forbidden.check(&PathBuf::from("/r"), &entries);

    assert_eq!(errors.len(), 1);
    assert!(errors[0].path.ends_with("release.par2"));
}

#[test]
fn enum_dispatch_is_deterministic() {
    let registry = ValidatorRegistry::builtin().unwrap();
    let entries = vec![
        entry("/r", "Sample", EntryKind::Directory),
        entry("/r", "extra.zip", EntryKind::File),
    ];
    let dir = PathBuf::from("/r");

    let run = || -> Vec<_> {
        registry
            .definitions()
            .iter()
            .flat_map(|d| d.check(&dir, &entries))
            .collect()
    };

    assert_eq!(run(), run());
    assert_eq!(run().len(), 2);
}
