pub mod logging;
pub mod server;
pub mod vault;

use clap::{
    ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

use self::vault::{
    ARG_VAULT_ROLE_ID, ARG_VAULT_SECRET_ID, ARG_VAULT_TOKEN, ARG_VAULT_URL,
    ARG_VAULT_WRAPPED_TOKEN,
};

/// Validate that Vault auth material is complete when a Vault URL is configured.
///
/// # Errors
/// Returns an error string if `vault-url` is set without a token or a full `AppRole` pair.
pub fn validate(matches: &clap::ArgMatches) -> Result<(), String> {
    if !matches.contains_id(ARG_VAULT_URL) || matches.contains_id(ARG_VAULT_TOKEN) {
        return Ok(());
    }

    if !matches.contains_id(ARG_VAULT_ROLE_ID) {
        return Err(format!(
            "Missing required argument: --{ARG_VAULT_TOKEN} or --{ARG_VAULT_ROLE_ID} (required with --{ARG_VAULT_URL})"
        ));
    }
    if !matches.contains_id(ARG_VAULT_SECRET_ID) && !matches.contains_id(ARG_VAULT_WRAPPED_TOKEN)
    {
        return Err(format!(
            "Missing required argument: --{ARG_VAULT_SECRET_ID} or --{ARG_VAULT_WRAPPED_TOKEN} (required with --{ARG_VAULT_ROLE_ID})"
        ));
    }
    Ok(())
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("bank-portal")
        .about("Session-authenticated customer portal")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles);

    let command = server::with_args(command);
    let command = vault::with_args(command);
    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENV_VARS: [&str; 12] = [
        "BANK_PORTAL_PORT",
        "BANK_PORTAL_ENV",
        "BANK_PORTAL_STATIC_DIR",
        "BANK_PORTAL_SESSION_TTL",
        "BANK_PORTAL_LOG_LEVEL",
        "BANK_PORTAL_VAULT_URL",
        "BANK_PORTAL_VAULT_TOKEN",
        "BANK_PORTAL_VAULT_ROLE_ID",
        "BANK_PORTAL_VAULT_SECRET_ID",
        "BANK_PORTAL_VAULT_WRAPPED_TOKEN",
        "BANK_PORTAL_VAULT_KV_MOUNT",
        "BANK_PORTAL_VAULT_KV_PATH",
    ];

    // Every variable the command reads is unset unless listed in `overrides`.
    fn with_env<F, R>(overrides: &[(&str, &str)], f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let vars: Vec<(&str, Option<&str>)> = ENV_VARS
            .iter()
            .map(|&key| {
                let value = overrides
                    .iter()
                    .find(|(name, _)| *name == key)
                    .map(|(_, value)| *value);
                (key, value)
            })
            .collect();
        temp_env::with_vars(vars, f)
    }

    fn with_clean_env<F, R>(f: F) -> R
    where
        F: FnOnce() -> R,
    {
        with_env(&[], f)
    }

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "bank-portal");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some("Session-authenticated customer portal".to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_defaults() {
        with_clean_env(|| {
            let matches = new().get_matches_from(vec!["bank-portal"]);
            assert_eq!(matches.get_one::<u16>(server::ARG_PORT).copied(), Some(8080));
            assert_eq!(
                matches.get_one::<String>(server::ARG_ENVIRONMENT).cloned(),
                Some("development".to_string())
            );
            assert_eq!(
                matches.get_one::<u64>(server::ARG_SESSION_TTL).copied(),
                Some(1800)
            );
            assert!(matches.get_one::<String>(ARG_VAULT_URL).is_none());
            assert!(validate(&matches).is_ok());
        });
    }

    #[test]
    fn test_check_env() {
        with_env(
            &[
                ("BANK_PORTAL_PORT", "443"),
                ("BANK_PORTAL_ENV", "production"),
                ("BANK_PORTAL_VAULT_URL", "https://vault.tld:8200"),
                ("BANK_PORTAL_VAULT_TOKEN", "s.token"),
                ("BANK_PORTAL_LOG_LEVEL", "info"),
            ],
            || {
                let matches = new().get_matches_from(vec!["bank-portal"]);
                assert_eq!(matches.get_one::<u16>(server::ARG_PORT).copied(), Some(443));
                assert_eq!(server::environment(&matches), server::Environment::Production);
                assert_eq!(
                    matches.get_one::<String>(ARG_VAULT_URL).cloned(),
                    Some("https://vault.tld:8200".to_string())
                );
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(2)
                );
                assert!(validate(&matches).is_ok());
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            with_env(&[("BANK_PORTAL_LOG_LEVEL", level)], || {
                let matches = new().get_matches_from(vec!["bank-portal"]);
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        for index in 0..5 {
            with_clean_env(|| {
                let mut args = vec!["bank-portal".to_string()];
                if index > 0 {
                    args.push(format!("-{}", "v".repeat(index)));
                }

                let matches = new().get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn test_unknown_environment_rejected() {
        with_clean_env(|| {
            let result = new().try_get_matches_from(vec!["bank-portal", "-e", "staging"]);
            assert_eq!(
                result.map_err(|e| e.kind()).err(),
                Some(clap::error::ErrorKind::InvalidValue)
            );
        });
    }

    #[test]
    fn test_zero_session_ttl_rejected() {
        with_clean_env(|| {
            let result = new().try_get_matches_from(vec!["bank-portal", "--session-ttl", "0"]);
            assert!(result.is_err());
        });
    }

    #[test]
    fn test_session_ttl_upper_bound() {
        with_clean_env(|| {
            let max = server::MAX_SESSION_TTL_SECONDS.to_string();
            let matches = new().try_get_matches_from(vec!["bank-portal", "--session-ttl", &max]);
            assert_eq!(
                matches
                    .ok()
                    .and_then(|m| m.get_one::<u64>(server::ARG_SESSION_TTL).copied()),
                Some(server::MAX_SESSION_TTL_SECONDS)
            );

            let over = (server::MAX_SESSION_TTL_SECONDS + 1).to_string();
            assert!(
                new()
                    .try_get_matches_from(vec!["bank-portal", "--session-ttl", &over])
                    .is_err()
            );
            assert!(
                new()
                    .try_get_matches_from(vec![
                        "bank-portal",
                        "--session-ttl",
                        "18446744073709551615"
                    ])
                    .is_err()
            );
        });
    }

    #[test]
    fn test_validate_missing_role() -> Result<(), Box<dyn std::error::Error>> {
        with_clean_env(|| {
            let matches = new().try_get_matches_from(vec![
                "bank-portal",
                "--vault-url",
                "http://vault:8200",
            ])?;
            assert!(validate(&matches).is_err(), "Should fail missing role-id");
            Ok(())
        })
    }

    #[test]
    fn test_validate_missing_secret() -> Result<(), Box<dyn std::error::Error>> {
        with_clean_env(|| {
            let matches = new().try_get_matches_from(vec![
                "bank-portal",
                "--vault-url",
                "https://vault:8200",
                "--vault-role-id",
                "role",
            ])?;
            assert!(
                validate(&matches).is_err(),
                "Should fail missing secret-id/wrapped-token"
            );
            Ok(())
        })
    }

    #[test]
    fn test_validate_approle_valid() -> Result<(), Box<dyn std::error::Error>> {
        with_clean_env(|| {
            let matches = new().try_get_matches_from(vec![
                "bank-portal",
                "--vault-url",
                "http://vault:8200",
                "--vault-role-id",
                "role",
                "--vault-wrapped-token",
                "wrapped",
            ])?;
            assert!(validate(&matches).is_ok());
            Ok(())
        })
    }

    #[test]
    fn test_validate_token_valid() -> Result<(), Box<dyn std::error::Error>> {
        with_clean_env(|| {
            let matches = new().try_get_matches_from(vec![
                "bank-portal",
                "--vault-url",
                "http://vault:8200",
                "--vault-token",
                "s.token",
            ])?;
            assert!(validate(&matches).is_ok());
            Ok(())
        })
    }

    #[test]
    fn test_secret_and_wrapped_conflict() {
        with_clean_env(|| {
            let result = new().try_get_matches_from(vec![
                "bank-portal",
                "--vault-secret-id",
                "secret",
                "--vault-wrapped-token",
                "wrapped",
            ]);
            assert_eq!(
                result.map_err(|e| e.kind()).err(),
                Some(clap::error::ErrorKind::ArgumentConflict)
            );
        });
    }
}
