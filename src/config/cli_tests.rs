//! Tests for CLI argument parsing.

use std::path::PathBuf;

use super::cli::{Cli, Command, EofArg, FormatArg};
use crate::relay::{EofPolicy, OutputFormat};

mod parsing {
    use super::*;

    #[test]
    fn parse_no_args() {
        let cli = Cli::parse_from_iter(["pacer"]);

        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
        assert!(cli.format.is_none());
        assert!(cli.cancel_line.is_none());
        assert!(cli.on_eof.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn parse_debounce_subcommand() {
        let cli = Cli::parse_from_iter(["pacer", "debounce", "--wait-ms", "250", "--immediate"]);

        match cli.command {
            Some(Command::Debounce { wait_ms, immediate }) => {
                assert_eq!(wait_ms, Some(250));
                assert!(immediate);
            }
            other => panic!("Expected debounce command, got {other:?}"),
        }
    }

    #[test]
    fn parse_throttle_subcommand() {
        let cli = Cli::parse_from_iter([
            "pacer",
            "throttle",
            "--wait-ms",
            "100",
            "--no-leading",
        ]);

        match cli.command {
            Some(Command::Throttle {
                wait_ms,
                no_leading,
                no_trailing,
            }) => {
                assert_eq!(wait_ms, Some(100));
                assert!(no_leading);
                assert!(!no_trailing);
            }
            other => panic!("Expected throttle command, got {other:?}"),
        }
    }

    #[test]
    fn wait_is_optional_in_subcommand() {
        let cli = Cli::parse_from_iter(["pacer", "throttle"]);

        assert!(matches!(
            cli.command,
            Some(Command::Throttle { wait_ms: None, .. })
        ));
    }

    #[test]
    fn parse_global_options_before_subcommand() {
        let cli = Cli::parse_from_iter([
            "pacer",
            "--format",
            "json",
            "--cancel-line",
            "STOP",
            "--on-eof",
            "cancel",
            "-v",
            "debounce",
        ]);

        assert_eq!(cli.format, Some(FormatArg::Json));
        assert_eq!(cli.cancel_line.as_deref(), Some("STOP"));
        assert_eq!(cli.on_eof, Some(EofArg::Cancel));
        assert!(cli.verbose);
    }

    #[test]
    fn parse_global_options_after_subcommand() {
        let cli = Cli::parse_from_iter([
            "pacer",
            "throttle",
            "--wait-ms",
            "10",
            "--config",
            "pacer.toml",
            "--format",
            "text",
        ]);

        assert_eq!(cli.config, Some(PathBuf::from("pacer.toml")));
        assert_eq!(cli.format, Some(FormatArg::Text));
    }

    #[test]
    fn short_flags() {
        let cli = Cli::parse_from_iter(["pacer", "-c", "custom.toml", "-v"]);

        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(cli.verbose);
    }

    #[test]
    fn unknown_format_is_rejected() {
        let result = Cli::try_parse_from_iter(["pacer", "--format", "xml"]);
        assert!(result.is_err());
    }

    #[test]
    fn non_numeric_wait_is_rejected() {
        let result = Cli::try_parse_from_iter(["pacer", "debounce", "--wait-ms", "soon"]);
        assert!(result.is_err());
    }

    #[test]
    fn immediate_is_debounce_only() {
        let result = Cli::try_parse_from_iter(["pacer", "throttle", "--immediate"]);
        assert!(result.is_err());
    }
}

mod init_command {
    use super::*;

    #[test]
    fn init_uses_default_output() {
        let cli = Cli::parse_from_iter(["pacer", "init"]);

        assert!(cli.is_init());
        match cli.command {
            Some(Command::Init { output }) => assert_eq!(output, PathBuf::from("pacer.toml")),
            other => panic!("Expected init command, got {other:?}"),
        }
    }

    #[test]
    fn init_with_custom_output() {
        let cli = Cli::parse_from_iter(["pacer", "init", "-o", "conf/custom.toml"]);

        match cli.command {
            Some(Command::Init { output }) => {
                assert_eq!(output, PathBuf::from("conf/custom.toml"));
            }
            other => panic!("Expected init command, got {other:?}"),
        }
    }

    #[test]
    fn limiter_subcommands_are_not_init() {
        assert!(!Cli::parse_from_iter(["pacer", "debounce"]).is_init());
        assert!(!Cli::parse_from_iter(["pacer"]).is_init());
    }
}

mod conversions {
    use super::*;

    #[test]
    fn format_arg_into_output_format() {
        assert_eq!(OutputFormat::from(FormatArg::Text), OutputFormat::Text);
        assert_eq!(OutputFormat::from(FormatArg::Json), OutputFormat::Json);
    }

    #[test]
    fn eof_arg_into_policy() {
        assert_eq!(EofPolicy::from(EofArg::Drain), EofPolicy::Drain);
        assert_eq!(EofPolicy::from(EofArg::Cancel), EofPolicy::Cancel);
    }
}
