//! Tests for CLI vs TOML precedence rules.

use std::path::PathBuf;
use std::time::Duration;

use super::*;

mod cli_precedence {
    use super::*;

    #[test]
    fn cli_signature_overrides_toml() {
        let toml = toml(
            r#"
            [yourls]
            signature = "from-toml"
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli_with_required(&[]), Some(&toml)).unwrap();

        assert_eq!(config.yourls.signature, "sig");
    }

    #[test]
    fn cli_listen_overrides_toml() {
        let toml = toml(
            r#"
            [server]
            listen = "127.0.0.1:7000"
        "#,
        );

        let config = ValidatedConfig::from_raw(
            &cli_with_required(&["--listen", "127.0.0.1:9000"]),
            Some(&toml),
        )
        .unwrap();

        assert_eq!(config.server.listen.port(), 9000);
    }

    #[test]
    fn cli_timeout_overrides_toml() {
        let toml = toml(
            r#"
            [http]
            timeout = 30
        "#,
        );

        let config =
            ValidatedConfig::from_raw(&cli_with_required(&["--timeout", "5"]), Some(&toml))
                .unwrap();

        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn cli_log_file_overrides_toml() {
        let toml = toml(
            r#"
            [log]
            file = "toml.log"
        "#,
        );

        let config = ValidatedConfig::from_raw(
            &cli_with_required(&["--log-file", "cli.log"]),
            Some(&toml),
        )
        .unwrap();

        assert_eq!(config.log_file, Some(PathBuf::from("cli.log")));
    }
}

mod toml_fallback {
    use super::*;

    #[test]
    fn required_values_from_toml_only() {
        let toml = toml(
            r#"
            [yourls]
            api = "https://s.example.com/yourls-api.php"
            signature = "sig"

            [notion]
            token = "secret_x"
            database_id = "01234567-89ab-cdef-0123-456789abcdef"
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&toml)).unwrap();

        assert_eq!(config.yourls.signature, "sig");
        assert_eq!(
            config.notion.database_id(),
            "0123456789abcdef0123456789abcdef"
        );
    }

    #[test]
    fn server_values_from_toml() {
        let toml = toml(
            r#"
            [server]
            listen = "127.0.0.1:7000"
            webhook_path = "/hooks/notion"
            inbound_token = "t0ken"

            [http]
            timeout = 30
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli_with_required(&[]), Some(&toml)).unwrap();

        assert_eq!(config.server.listen.port(), 7000);
        assert_eq!(config.server.webhook_path, "/hooks/notion");
        assert_eq!(config.server.inbound_token.as_deref(), Some("t0ken"));
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn empty_inbound_token_disables_check() {
        let toml = toml(
            r#"
            [server]
            inbound_token = ""
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli_with_required(&[]), Some(&toml)).unwrap();

        assert!(config.server.inbound_token.is_none());
    }

    #[test]
    fn blank_inbound_token_disables_check() {
        let toml = toml(
            r#"
            [server]
            inbound_token = "   "
        "#,
        );

        let config = ValidatedConfig::from_raw(&cli_with_required(&[]), Some(&toml)).unwrap();

        assert!(config.server.inbound_token.is_none());
    }

    #[test]
    fn inbound_token_is_trimmed() {
        let config =
            ValidatedConfig::from_raw(&cli_with_required(&["--inbound-token", " t0ken\n"]), None)
                .unwrap();

        assert_eq!(config.server.inbound_token.as_deref(), Some("t0ken"));
    }

    #[test]
    fn verbose_from_either_source() {
        let toml = toml(
            r#"
            [log]
            verbose = true
        "#,
        );

        let from_toml = ValidatedConfig::from_raw(&cli_with_required(&[]), Some(&toml)).unwrap();
        let from_cli = ValidatedConfig::from_raw(&cli_with_required(&["-v"]), None).unwrap();

        assert!(from_toml.verbose);
        assert!(from_cli.verbose);
    }
}
