//! Shared integration-test server bootstrap helpers.

use axum_test::TestServer;
use picopaste_server::{create_app, AppState, Config, Database};
use std::path::Path;
use tempfile::TempDir;

pub(crate) fn test_config_for_db_path(db_path: &Path) -> Config {
    Config {
        port: 0,
        db_path: db_path.to_str().expect("db path").to_string(),
        ..Config::default()
    }
}

pub(crate) fn test_server_for_config(config: Config) -> TestServer {
    let db = Database::open(&config.db_path).expect("open db");
    let state = AppState::new(config, db);
    TestServer::new(create_app(state)).expect("server")
}

pub(crate) fn setup_test_server_with(
    configure: impl FnOnce(&mut Config),
) -> (TestServer, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let mut config = test_config_for_db_path(&temp_dir.path().join("db"));
    configure(&mut config);
    (test_server_for_config(config), temp_dir)
}

pub(crate) fn setup_test_server() -> (TestServer, TempDir) {
    setup_test_server_with(|_| {})
}
