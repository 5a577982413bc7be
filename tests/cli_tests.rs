use breakbridge::cli::Args;
use clap::CommandFactory;

/// CLI interface tests
#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_cli_help() {
        let help = Args::command().render_long_help().to_string();

        assert!(help.contains("Usage:"));
        for flag in [
            "--host",
            "--port",
            "--device",
            "--baud",
            "--break-delay",
            "--break-length",
            "--config",
            "--verbose",
        ] {
            assert!(help.contains(flag), "help is missing {}", flag);
        }
    }

    #[test]
    fn test_cli_version() {
        let version = Args::command().render_version();
        assert!(version.contains(env!("CARGO_PKG_VERSION")));
    }
}
