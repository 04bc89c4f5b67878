//! Tests for CLI argument parsing.

use std::path::PathBuf;

use super::cli::{Cli, Command};

mod parsing {
    use super::*;

    #[test]
    fn parse_no_args() {
        let cli = Cli::parse_from_iter(["radionet"]);

        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
        assert!(cli.latency_ms.is_none());
        assert!(!cli.verbose);
        assert!(!cli.quiet_audit);
        assert!(!cli.json);
    }

    #[test]
    fn parse_simulation_options() {
        let cli = Cli::parse_from_iter([
            "radionet",
            "--latency-ms",
            "250",
            "--cycles",
            "3",
            "--devices",
            "2",
        ]);

        assert_eq!(cli.latency_ms, Some(250));
        assert_eq!(cli.cycles, Some(3));
        assert_eq!(cli.devices, Some(2));
    }

    #[test]
    fn parse_audit_options() {
        let cli = Cli::parse_from_iter([
            "radionet",
            "--min-free-heap",
            "8192",
            "--min-free-stack",
            "512",
            "--quiet-audit",
        ]);

        assert_eq!(cli.min_free_heap, Some(8192));
        assert_eq!(cli.min_free_stack, Some(512));
        assert!(cli.quiet_audit);
    }

    #[test]
    fn parse_config_short_and_long() {
        let short = Cli::parse_from_iter(["radionet", "-c", "a.toml"]);
        let long = Cli::parse_from_iter(["radionet", "--config", "a.toml"]);

        assert_eq!(short.config, Some(PathBuf::from("a.toml")));
        assert_eq!(long.config, short.config);
    }

    #[test]
    fn parse_json_flag() {
        let cli = Cli::parse_from_iter(["radionet", "simulate", "--json"]);
        assert!(cli.json);
    }

    #[test]
    fn parse_verbose_short() {
        let cli = Cli::parse_from_iter(["radionet", "-v"]);
        assert!(cli.verbose);
    }
}

mod subcommands {
    use super::*;

    #[test]
    fn init_uses_default_output() {
        let cli = Cli::parse_from_iter(["radionet", "init"]);

        assert!(cli.is_init());
        assert_eq!(
            cli.command,
            Some(Command::Init {
                output: PathBuf::from("radionet.toml")
            })
        );
    }

    #[test]
    fn init_with_custom_output() {
        let cli = Cli::parse_from_iter(["radionet", "init", "--output", "custom.toml"]);

        assert_eq!(
            cli.command,
            Some(Command::Init {
                output: PathBuf::from("custom.toml")
            })
        );
    }

    #[test]
    fn check_command() {
        let cli = Cli::parse_from_iter(["radionet", "check", "-c", "radionet.toml"]);

        assert!(cli.is_check());
        assert!(!cli.is_init());
        assert_eq!(cli.config, Some(PathBuf::from("radionet.toml")));
    }

    #[test]
    fn global_options_after_subcommand() {
        let cli = Cli::parse_from_iter(["radionet", "simulate", "--latency-ms", "10", "-v"]);

        assert_eq!(cli.command, Some(Command::Simulate));
        assert_eq!(cli.latency_ms, Some(10));
        assert!(cli.verbose);
    }
}

mod errors {
    use clap::Parser;

    use super::*;

    #[test]
    fn rejects_non_numeric_latency() {
        let result = Cli::try_parse_from(["radionet", "--latency-ms", "fast"]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_unknown_subcommand() {
        let result = Cli::try_parse_from(["radionet", "monitor"]);
        assert!(result.is_err());
    }
}
