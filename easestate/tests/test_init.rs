use easestate::{init, Config, Descriptor, VERSION};
use serde_json::json;

#[test]
fn test_init_without_config() {
    let descriptor = init(None);

    assert!(descriptor.ready);
    assert_eq!(descriptor.version, "1.5.14");
    assert_eq!(descriptor.version, VERSION);
    assert!(descriptor.config.is_empty());
}

#[test]
fn test_init_echoes_config() {
    let mut config = Config::new();
    config.insert("x".to_string(), json!(1));

    let descriptor = init(Some(config.clone()));

    assert_eq!(
        descriptor,
        Descriptor {
            ready: true,
            version: "1.5.14".to_string(),
            config,
        }
    );
}

#[test]
fn test_init_passes_nested_values_through() {
    let config = json!({"theme": {"dark": true}, "retries": [1, 2, 3]});
    let Some(config) = config.as_object().cloned() else {
        panic!("expected an object");
    };

    let descriptor = init(Some(config.clone()));

    assert_eq!(descriptor.config, config);
}

#[test]
fn test_descriptor_serializes_flat() {
    let mut config = Config::new();
    config.insert("x".to_string(), json!(1));

    let encoded = serde_json::to_value(init(Some(config))).unwrap();

    assert_eq!(
        encoded,
        json!({"ready": true, "version": "1.5.14", "config": {"x": 1}})
    );
    assert_eq!(
        serde_json::to_value(init(None)).unwrap(),
        json!({"ready": true, "version": "1.5.14", "config": {}})
    );
}
