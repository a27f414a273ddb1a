//! Logical settings managed by the bootstrapper and their environment
//! fallbacks.

use std::collections::HashMap;

/// Connection string synthesized for the "Local" database choice.
pub const LOCAL_DB_URL: &str =
    "mongodb://127.0.0.1:27017/talawa-api?retryWrites=true&w=majority";

/// One of the six configuration values `talawa-init` manages.
///
/// Each setting maps 1:1 to a section of the configuration file and a single
/// key inside that section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Setting {
    AccessSecret,
    RefreshSecret,
    DatabaseUrl,
    VerificationKey,
    MailUsername,
    MailPassword,
}

impl Setting {
    /// All managed settings, in reconciliation order.
    pub const ALL: [Setting; 6] = [
        Setting::AccessSecret,
        Setting::RefreshSecret,
        Setting::DatabaseUrl,
        Setting::VerificationKey,
        Setting::MailUsername,
        Setting::MailPassword,
    ];

    /// Section name in the configuration file.
    pub fn section(self) -> &'static str {
        match self {
            Setting::AccessSecret => "AccessTokenSecret",
            Setting::RefreshSecret => "RefreshTokenSecret",
            Setting::DatabaseUrl => "DBConnectionString",
            Setting::VerificationKey => "reCAPTCHASecretKey",
            Setting::MailUsername => "MailUsername",
            Setting::MailPassword => "MailPassword",
        }
    }

    /// Key name inside the setting's section, also the environment variable
    /// consulted for defaults.
    pub fn key(self) -> &'static str {
        match self {
            Setting::AccessSecret => "ACCESS_TOKEN_SECRET",
            Setting::RefreshSecret => "REFRESH_TOKEN_SECRET",
            Setting::DatabaseUrl => "MONGO_DB_URL",
            Setting::VerificationKey => "RECAPTCHA_SECRET_KEY",
            Setting::MailUsername => "MAIL_USERNAME",
            Setting::MailPassword => "MAIL_PASSWORD",
        }
    }

    /// Human-readable label used in prompts and messages.
    pub fn label(self) -> &'static str {
        match self {
            Setting::AccessSecret => "access token secret",
            Setting::RefreshSecret => "refresh token secret",
            Setting::DatabaseUrl => "MongoDB URL",
            Setting::VerificationKey => "reCAPTCHA secret key",
            Setting::MailUsername => "mail username",
            Setting::MailPassword => "mail password",
        }
    }
}

/// Where a committed value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    /// Reused from the environment or a prior run.
    Existing,
    /// Freshly generated or synthesized by the tool.
    Generated,
    /// Typed in by the operator.
    UserProvided,
}

/// Environment-sourced defaults for the managed settings, captured once at
/// startup so the reconciliation flow never reads the process environment
/// directly.
#[derive(Debug, Clone, Default)]
pub struct EnvDefaults {
    values: HashMap<Setting, String>,
}

impl EnvDefaults {
    /// Read the six managed keys from the process environment. Empty values
    /// count as unset.
    pub fn from_process_env() -> Self {
        Self::from_pairs(Setting::ALL.iter().filter_map(|setting| {
            std::env::var(setting.key())
                .ok()
                .filter(|value| !value.trim().is_empty())
                .map(|value| (*setting, value))
        }))
    }

    /// Build defaults from explicit pairs.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Setting, String)>,
    {
        Self {
            values: pairs.into_iter().collect(),
        }
    }

    pub fn get(&self, setting: Setting) -> Option<&str> {
        self.values.get(&setting).map(String::as_str)
    }
}
