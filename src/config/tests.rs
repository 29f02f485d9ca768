//! Configuration Tests

#[cfg(test)]
mod tests {
    use crate::config::{Cli, ConfigError, Settings};
    use crate::coordinator::types::ShutdownPolicy;
    use clap::Parser;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_defaults_match_built_in_values() {
        let settings = Settings::default();

        assert_eq!(settings.index_updater.executable, PathBuf::from("/bin/createrepo"));
        assert_eq!(settings.index_updater.cmdline, "--update");
        assert_eq!(settings.index_updater.debounce_secs, 30);
        assert_eq!(settings.index_updater.max_delay_secs, None);
        assert_eq!(settings.coordinator().max_delay, None);
        assert_eq!(settings.index_updater.shutdown_policy, ShutdownPolicy::Abandon);
        assert_eq!(settings.repo.top_dir, PathBuf::from("/srv/repo/storage"));
        assert_eq!(settings.bind_addr(), "127.0.0.1:5000");
        assert_eq!(settings.server.prefix_url, "upload");
        assert_eq!(settings.server.upload_header, "X-Package-Name");
        assert_eq!(settings.log_level().unwrap(), tracing::Level::INFO);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let yaml = r#"
index_updater:
  debounce_secs: 5
  shutdown_policy: drain
repo:
  top_dir: /data/repo
log:
  level: debug
"#;
        let settings = Settings::from_yaml(yaml).unwrap();

        assert_eq!(settings.index_updater.debounce_secs, 5);
        assert_eq!(settings.index_updater.shutdown_policy, ShutdownPolicy::Drain);
        assert_eq!(settings.index_updater.executable, PathBuf::from("/bin/createrepo"));
        assert_eq!(settings.server.port, 5000);
        assert_eq!(settings.log_level().unwrap(), tracing::Level::DEBUG);

        let coordinator = settings.coordinator();
        assert_eq!(coordinator.quiet_period, Duration::from_secs(5));
        assert_eq!(coordinator.repo_root, PathBuf::from("/data/repo"));
        assert_eq!(settings.ingest().top_dir, PathBuf::from("/data/repo"));
    }

    #[test]
    fn test_max_delay_caps_bursts_when_set() {
        let yaml = "index_updater:\n  debounce_secs: 30\n  max_delay_secs: 300\n";
        let settings = Settings::from_yaml(yaml).unwrap();

        assert!(settings.validate().is_ok());
        assert_eq!(settings.coordinator().max_delay, Some(Duration::from_secs(300)));

        let mut zero = settings.clone();
        zero.index_updater.max_delay_secs = Some(0);
        assert!(matches!(zero.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_empty_yaml_is_defaults() {
        assert_eq!(Settings::from_yaml("").unwrap(), Settings::default());
    }

    #[test]
    fn test_unknown_policy_is_a_parse_error() {
        let yaml = "index_updater:\n  shutdown_policy: sometimes\n";
        assert!(Settings::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_validation_rejects_zero_debounce_and_bad_level() {
        let mut settings = Settings::default();
        settings.index_updater.debounce_secs = 0;
        assert!(matches!(settings.validate(), Err(ConfigError::Invalid(_))));

        let mut settings = Settings::default();
        settings.log.level = "chatty".to_string();
        assert!(matches!(settings.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_from_file_with_cli_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repo_helper.yml");
        std::fs::write(&path, "server:\n  port: 8080\nlog:\n  level: WARN\n").unwrap();

        let cli = Cli::parse_from([
            "repo-helper",
            "--conf",
            path.to_str().unwrap(),
            "--log-level",
            "trace",
        ]);
        let settings = Settings::load(&cli).unwrap();

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.log_level().unwrap(), tracing::Level::TRACE);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let cli = Cli::parse_from(["repo-helper", "-c", "/nonexistent/repo_helper.yml"]);
        assert!(matches!(Settings::load(&cli), Err(ConfigError::Read { .. })));
    }
}
