use ferrite_idx::{IdxLabelSet, LoadConfig};

#[test]
fn test_defaults() {
    let config = LoadConfig::default();
    assert_eq!(config.min_file_size, 100);
    assert!(config.check_dtype);
    assert!(config.allow_trailing_bytes);
    assert_eq!(LoadConfig::lenient().min_file_size, 0);
}

#[test]
fn test_json_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("load.json");
    let path = path.to_str().unwrap();

    let config = LoadConfig { min_file_size: 16, check_dtype: false, allow_trailing_bytes: false };
    config.save_json(path).unwrap();
    assert_eq!(LoadConfig::load_json(path).unwrap(), config);
}

#[test]
fn test_missing_file_is_an_error() {
    assert!(LoadConfig::load_json("/no/such/load.json").is_err());
}

#[test]
fn test_disabled_dtype_check_accepts_other_types() {
    let mut bytes = vec![0x00, 0x00, 0x0D, 0x01, 0x00, 0x00, 0x00, 0x02];
    bytes.extend_from_slice(&[4, 2]);
    let strict = IdxLabelSet::from_bytes(bytes.clone(), &LoadConfig::lenient());
    assert!(!strict.is_usable());

    let relaxed = LoadConfig { check_dtype: false, ..LoadConfig::lenient() };
    let labels = IdxLabelSet::from_bytes(bytes, &relaxed);
    assert_eq!(labels.magic(), 0x0000_0D01);
    assert_eq!(labels.labels(), &[4, 2]);
}
