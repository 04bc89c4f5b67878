//! Tests for configuration loading, defaults and init.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use tempfile::{NamedTempFile, tempdir};

use crate::config::defaults;
use crate::config::write_default_config;
use crate::resource::AuditThresholds;

use super::*;

mod defaults_applied {
    use super::*;

    #[test]
    fn no_sources_gives_defaults() {
        let config = ValidatedConfig::from_raw(&cli(&[]), None).unwrap();

        assert_eq!(config.latency, defaults::latency());
        assert_eq!(config.cycles, defaults::CYCLES);
        assert_eq!(config.devices, defaults::DEVICES);
        assert_eq!(config.thresholds, AuditThresholds::default());
        assert!(config.diagnostics);
        assert!(config.interfaces.is_empty());
        assert!(!config.verbose);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&toml(""))).unwrap();

        assert_eq!(config.latency, Duration::from_millis(defaults::LATENCY_MS));
        assert!(config.interfaces.is_empty());
    }
}

mod zero_values {
    use super::*;

    #[test]
    fn zero_latency_is_rejected() {
        let result = ValidatedConfig::from_raw(&cli(&["--latency-ms", "0"]), None);

        assert!(matches!(
            result,
            Err(ConfigError::InvalidDuration {
                field: "latency_ms",
                ..
            })
        ));
    }

    #[test]
    fn zero_cycles_is_rejected() {
        let toml = toml("[simulation]\ncycles = 0");
        let result = ValidatedConfig::from_raw(&cli(&[]), Some(&toml));

        assert!(matches!(
            result,
            Err(ConfigError::InvalidCount { field: "cycles", .. })
        ));
    }

    #[test]
    fn zero_devices_is_rejected() {
        let result = ValidatedConfig::from_raw(&cli(&["--devices", "0"]), None);

        assert!(matches!(
            result,
            Err(ConfigError::InvalidCount {
                field: "devices",
                ..
            })
        ));
    }
}

mod file_loading {
    use super::*;

    #[test]
    fn load_reads_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [simulation]
            latency_ms = 75

            [[interface]]
            type = "gnss"
            "#
        )
        .unwrap();

        let path = file.path().to_str().unwrap();
        let config = ValidatedConfig::load(&cli(&["--config", path])).unwrap();

        assert_eq!(config.latency, Duration::from_millis(75));
        assert_eq!(config.interfaces.len(), 1);
    }

    #[test]
    fn load_without_config_file_uses_cli_only() {
        let config = ValidatedConfig::load(&cli(&["--cycles", "2"])).unwrap();
        assert_eq!(config.cycles, 2);
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let result = ValidatedConfig::load(&cli(&["--config", path.to_str().unwrap()]));

        assert!(matches!(result, Err(ConfigError::FileRead { .. })));
    }

    #[test]
    fn invalid_toml_is_reported() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[simulation\nlatency_ms = 1").unwrap();

        let result = ValidatedConfig::load(&cli(&["-c", file.path().to_str().unwrap()]));

        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }
}

mod init {
    use super::*;

    #[test]
    fn writes_template_that_loads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("radionet.toml");

        write_default_config(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("[[interface]]"));

        let config = ValidatedConfig::load(&cli(&["-c", path.to_str().unwrap()])).unwrap();
        assert_eq!(config.interfaces.len(), 2);
    }

    #[test]
    fn unwritable_path_is_reported() {
        let result = write_default_config(Path::new("/nonexistent-dir/radionet.toml"));

        assert!(matches!(result, Err(ConfigError::FileWrite { .. })));
    }
}

mod display {
    use super::*;

    #[test]
    fn display_lists_interfaces_and_settings() {
        let toml = toml(
            r#"
            [[interface]]
            type = "wifi"
            ssid = "home"
        "#,
        );
        let config = ValidatedConfig::from_raw(&cli(&["--latency-ms", "20"]), Some(&toml)).unwrap();

        let text = config.to_string();
        assert!(text.contains("Wi-Fi"));
        assert!(text.contains("20ms"));
    }
}
