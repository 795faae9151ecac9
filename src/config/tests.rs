use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn defaults_are_full_volume_and_five_ticks_per_second() {
    let s = Settings::default();
    assert_eq!(s.playback.volume, 100);
    assert_eq!(s.engine.tick_interval_ms, 200);
    assert_eq!(s.engine.tick_interval(), Duration::from_millis(200));
    assert!(s.validate().is_ok());
}

#[test]
fn resolve_config_path_prefers_attacca_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("ATTACCA_CONFIG_PATH", "/tmp/attacca-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/attacca-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("attacca")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("attacca")
            .join("config.toml")
    );
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
volume = 35

[engine]
tick_interval_ms = 50
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ATTACCA_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("ATTACCA__PLAYBACK__VOLUME");
    let _g3 = EnvGuard::remove("ATTACCA__ENGINE__TICK_INTERVAL_MS");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.volume, 35);
    assert_eq!(s.engine.tick_interval_ms, 50);
    assert_eq!(s.engine.tick_interval(), Duration::from_millis(50));
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
volume = 80
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ATTACCA_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("ATTACCA__PLAYBACK__VOLUME", "15");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.volume, 15);
}

#[test]
fn from_toml_str_fills_missing_sections_with_defaults() {
    let s = Settings::from_toml_str(
        r#"
[playback]
volume = 60
"#,
    )
    .unwrap();
    assert_eq!(s.playback.volume, 60);
    assert_eq!(s.engine.tick_interval_ms, 200);

    let empty = Settings::from_toml_str("").unwrap();
    assert_eq!(empty.playback.volume, 100);
}

#[test]
fn validate_rejects_zero_tick_interval() {
    let s = Settings::from_toml_str(
        r#"
[engine]
tick_interval_ms = 0
"#,
    )
    .unwrap();
    let err = s.validate().unwrap_err();
    assert!(err.contains("tick_interval_ms"));
}
