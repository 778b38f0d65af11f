use clap::{Arg, ArgMatches, Command};

pub const ARG_VAULT_URL: &str = "vault-url";
pub const ARG_VAULT_TOKEN: &str = "vault-token";
pub const ARG_VAULT_ROLE_ID: &str = "vault-role-id";
pub const ARG_VAULT_SECRET_ID: &str = "vault-secret-id";
pub const ARG_VAULT_WRAPPED_TOKEN: &str = "vault-wrapped-token";
pub const ARG_VAULT_KV_MOUNT: &str = "vault-kv-mount";
pub const ARG_VAULT_KV_PATH: &str = "vault-kv-path";

/// Vault settings; `url` being `None` means credentials come from the built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub url: Option<String>,
    pub token: Option<String>,
    pub role_id: Option<String>,
    pub secret_id: Option<String>,
    pub wrapped_token: Option<String>,
    pub kv_mount: String,
    pub kv_path: String,
}

impl Options {
    #[must_use]
    pub fn parse(matches: &ArgMatches) -> Self {
        let get = |id: &str| {
            matches
                .get_one::<String>(id)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            url: get(ARG_VAULT_URL),
            token: get(ARG_VAULT_TOKEN),
            role_id: get(ARG_VAULT_ROLE_ID),
            secret_id: get(ARG_VAULT_SECRET_ID),
            wrapped_token: get(ARG_VAULT_WRAPPED_TOKEN),
            kv_mount: get(ARG_VAULT_KV_MOUNT).unwrap_or_else(|| "secret".to_string()),
            kv_path: get(ARG_VAULT_KV_PATH).unwrap_or_else(|| "bank-portal".to_string()),
        }
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_VAULT_URL)
                .long("vault-url")
                .help("Vault base URL (http(s)://host:port); when unset the default credentials are used")
                .env("BANK_PORTAL_VAULT_URL"),
        )
        .arg(
            Arg::new(ARG_VAULT_TOKEN)
                .long("vault-token")
                .help("Vault client token, skips the AppRole login")
                .env("BANK_PORTAL_VAULT_TOKEN")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_VAULT_ROLE_ID)
                .long("vault-role-id")
                .help("Vault AppRole role id")
                .env("BANK_PORTAL_VAULT_ROLE_ID"),
        )
        .arg(
            Arg::new(ARG_VAULT_SECRET_ID)
                .long("vault-secret-id")
                .help("Vault AppRole secret id")
                .env("BANK_PORTAL_VAULT_SECRET_ID")
                .hide_env_values(true)
                .conflicts_with(ARG_VAULT_WRAPPED_TOKEN),
        )
        .arg(
            Arg::new(ARG_VAULT_WRAPPED_TOKEN)
                .long("vault-wrapped-token")
                .help("Vault wrapped AppRole secret id")
                .env("BANK_PORTAL_VAULT_WRAPPED_TOKEN")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_VAULT_KV_MOUNT)
                .long("vault-kv-mount")
                .help("Vault KV-v2 mount holding the customer credentials")
                .env("BANK_PORTAL_VAULT_KV_MOUNT")
                .default_value("secret"),
        )
        .arg(
            Arg::new(ARG_VAULT_KV_PATH)
                .long("vault-kv-path")
                .help("Vault KV-v2 secret path holding the customer credentials")
                .env("BANK_PORTAL_VAULT_KV_PATH")
                .default_value("bank-portal"),
        )
}
