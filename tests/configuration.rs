use clanhall::Config;

#[test]
fn test_load_falls_back_to_defaults() {
    let config = Config::load(Some("does/not/exist.toml".to_string())).expect("defaults load");

    assert!(config.database.max_connections >= 1);
    assert_eq!(config.awards.daily_check_in, 10);
    assert!(config.validate().is_ok());
}
