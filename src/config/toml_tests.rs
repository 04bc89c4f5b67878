//! Tests for TOML configuration parsing.

use super::toml::{TomlConfig, default_config_template};
use crate::network::{ConfigVersion, NetworkConfig, NetworkType, WifiAuth};

mod parsing {
    use super::*;

    #[test]
    fn parse_empty_config() {
        let config = TomlConfig::parse("").unwrap();

        assert!(config.interfaces.is_empty());
        assert!(config.simulation.latency_ms.is_none());
        assert!(config.audit.min_free_heap_bytes.is_none());
    }

    #[test]
    fn parse_audit_section() {
        let toml = r"
            [audit]
            min_free_heap_bytes = 8192
            min_free_stack_bytes = 2048
            diagnostics = false
        ";

        let config = TomlConfig::parse(toml).unwrap();

        assert_eq!(config.audit.min_free_heap_bytes, Some(8192));
        assert_eq!(config.audit.min_free_stack_bytes, Some(2048));
        assert_eq!(config.audit.diagnostics, Some(false));
    }

    #[test]
    fn parse_simulation_section() {
        let toml = r"
            [simulation]
            latency_ms = 120
            cycles = 4
            devices = 2
        ";

        let config = TomlConfig::parse(toml).unwrap();

        assert_eq!(config.simulation.latency_ms, Some(120));
        assert_eq!(config.simulation.cycles, Some(4));
        assert_eq!(config.simulation.devices, Some(2));
    }

    #[test]
    fn parse_interfaces_in_order() {
        let toml = r#"
            [[interface]]
            type = "wifi"
            ssid = "home"
            authentication = "wpa-psk"
            passphrase = "secret"

            [[interface]]
            type = "cell"
            version = 2
            apn = "internet"
            mcc_mnc = "26201"
        "#;

        let config = TomlConfig::parse(toml).unwrap();

        assert_eq!(config.interfaces.len(), 2);
        let NetworkConfig::Wifi(wifi) = &config.interfaces[0] else {
            panic!("expected a Wi-Fi entry first");
        };
        assert_eq!(wifi.version, ConfigVersion::BASE);
        assert_eq!(wifi.authentication, WifiAuth::WpaPsk);

        let NetworkConfig::Cell(cell) = &config.interfaces[1] else {
            panic!("expected a cellular entry second");
        };
        assert_eq!(cell.version, ConfigVersion::new(2));
        assert_eq!(cell.mcc_mnc.as_deref(), Some("26201"));
    }

    #[test]
    fn parse_gnss_pins() {
        let toml = r#"
            [[interface]]
            type = "gnss"
            module = "m10"
            pin_power = 12
        "#;

        let config = TomlConfig::parse(toml).unwrap();

        let NetworkConfig::Gnss(gnss) = &config.interfaces[0] else {
            panic!("expected a GNSS entry");
        };
        assert_eq!(gnss.pin_power, Some(12));
        assert_eq!(gnss.pin_data_ready, None);
    }
}

mod errors {
    use super::*;

    #[test]
    fn unknown_section_is_rejected() {
        let result = TomlConfig::parse("[webhook]\nurl = \"x\"");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_audit_field_is_rejected() {
        let result = TomlConfig::parse("[audit]\nmin_heap = 1");
        assert!(result.is_err());
    }

    #[test]
    fn interface_without_type_is_rejected() {
        let result = TomlConfig::parse("[[interface]]\nssid = \"home\"");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_interface_type_is_rejected() {
        let result = TomlConfig::parse("[[interface]]\ntype = \"lora\"");
        assert!(result.is_err());
    }

    #[test]
    fn wrong_value_type_is_rejected() {
        let result = TomlConfig::parse("[simulation]\nlatency_ms = \"fast\"");
        assert!(result.is_err());
    }
}

mod template {
    use super::*;

    #[test]
    fn template_parses() {
        let config = TomlConfig::parse(&default_config_template()).unwrap();

        assert_eq!(config.simulation.latency_ms, Some(50));
        let types: Vec<_> = config
            .interfaces
            .iter()
            .map(NetworkConfig::network_type)
            .collect();
        assert_eq!(types, vec![NetworkType::Wifi, NetworkType::Gnss]);
    }

    #[test]
    fn template_documents_every_type() {
        let template = default_config_template();

        for ty in ["ble", "cell", "wifi", "gnss"] {
            assert!(
                template.contains(&format!("type = \"{ty}\"")),
                "template should mention {ty}"
            );
        }
    }
}
