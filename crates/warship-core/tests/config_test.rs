use warship_core::{Error, WarshipConfig};
use tempfile::TempDir;

#[test]
fn load_returns_defaults_when_no_config_file() {
    let tmp = TempDir::new().unwrap();
    let config = WarshipConfig::load(tmp.path()).unwrap();

    assert_eq!(config.runtime.image_repository, "ghcr.io/itechpros/tomcat");
    assert_eq!(config.runtime.home, "/usr/share/tomcat");
    assert_eq!(
        config.runtime.startup_hook,
        "/usr/share/tomcat/tomcat_start.sh"
    );
    assert_eq!(config.publish.registry, "ghcr.io");
}

#[test]
fn load_parses_full_config() {
    let tmp = TempDir::new().unwrap();
    let toml = r#"
[runtime]
image_repository = "registry.example.com/base/tomcat"
home = "/opt/tomcat"
startup_hook = "/opt/tomcat/bin/prestart.sh"

[publish]
registry = "registry.example.com"
"#;
    std::fs::write(tmp.path().join("warship.toml"), toml).unwrap();

    let config = WarshipConfig::load(tmp.path()).unwrap();

    assert_eq!(
        config.runtime.image_repository,
        "registry.example.com/base/tomcat"
    );
    assert_eq!(config.runtime.home, "/opt/tomcat");
    assert_eq!(config.runtime.startup_hook, "/opt/tomcat/bin/prestart.sh");
    assert_eq!(config.publish.registry, "registry.example.com");
}

#[test]
fn load_fills_missing_keys_with_defaults() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("warship.toml"),
        "[runtime]\nhome = \"/srv/tomcat\"\n",
    )
    .unwrap();

    let config = WarshipConfig::load(tmp.path()).unwrap();

    assert_eq!(config.runtime.home, "/srv/tomcat");
    assert_eq!(config.runtime.image_repository, "ghcr.io/itechpros/tomcat");
    assert_eq!(config.publish.registry, "ghcr.io");
}

#[test]
fn load_rejects_invalid_toml() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("warship.toml"), "[runtime\nhome = ").unwrap();

    let result = WarshipConfig::load(tmp.path());
    assert!(matches!(result, Err(Error::ConfigParse { .. })));
}

#[test]
fn load_file_requires_existing_file() {
    let tmp = TempDir::new().unwrap();
    let result = WarshipConfig::load_file(&tmp.path().join("missing.toml"));
    assert!(matches!(result, Err(Error::ConfigLoad { .. })));
}

#[test]
fn webapps_dir_ignores_trailing_slash() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("warship.toml"),
        "[runtime]\nhome = \"/opt/tomcat/\"\n",
    )
    .unwrap();

    let config = WarshipConfig::load(tmp.path()).unwrap();
    assert_eq!(config.runtime.webapps_dir(), "/opt/tomcat/webapps/");
    assert_eq!(
        config.runtime.home_path("conf/server.xml"),
        "/opt/tomcat/conf/server.xml"
    );
}
