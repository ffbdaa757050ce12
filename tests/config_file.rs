use fakeloc::{GeneratorConfig, Strategy};

#[test]
fn partial_config_file_fills_defaults() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("generator.json");
    std::fs::write(&path, r#"{"strategy":"empirical_iid","segments":4,"max_days":7}"#).unwrap();

    let cfg = GeneratorConfig::from_json_file(&path).expect("load config");
    assert_eq!(cfg.strategy, Strategy::EmpiricalIid);
    assert_eq!(cfg.segments, 4);
    assert_eq!(cfg.max_days, Some(7));
    assert_eq!(cfg.steps_per_day, 48);
    assert_eq!(cfg.risk_levels, 5);
    assert_eq!(cfg.block_len, 1);
    assert_eq!(cfg.seed, 0);
    assert!(!cfg.force_regenerate);
    assert_eq!(cfg.max_timesteps(), Some(7 * 48));
}

#[test]
fn config_file_failing_check_is_rejected() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("generator.json");
    std::fs::write(&path, r#"{"block_len":0}"#).unwrap();

    let err = GeneratorConfig::from_json_file(&path).unwrap_err();
    assert!(format!("{err:#}").contains("block_len"), "got {err:#}");
}

#[test]
fn unknown_strategy_names_the_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("generator.json");
    std::fs::write(&path, r#"{"strategy":"teleport"}"#).unwrap();

    let err = GeneratorConfig::from_json_file(&path).unwrap_err();
    assert!(format!("{err:#}").contains("generator.json"), "got {err:#}");
}

#[test]
fn missing_config_file_is_an_error() {
    let tmp = tempfile::tempdir().expect("tempdir");
    assert!(GeneratorConfig::from_json_file(tmp.path().join("absent.json")).is_err());
}
