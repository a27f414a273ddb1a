//! Per-setting reconciliation flows.
//!
//! Each flow looks up an existing value (environment first, then the stored
//! file), lets the operator reuse or replace it, and commits the outcome to
//! the store before moving on. Decline paths commit too, so a run that fails
//! later never loses the answers already given.

use std::fmt;

use tracing::info;

use crate::{
    error::SetupError,
    probe::DatabaseProbe,
    prompt::Prompt,
    secret::generate_secret,
    settings::{EnvDefaults, LOCAL_DB_URL, Setting, ValueSource},
    store::ConfigStore,
    validation::{is_valid_email, is_valid_recaptcha_key},
};

/// Shown when a chosen database URL turns out to be unreachable.
pub const DB_UNREACHABLE_HINT: &str =
    "Try starting up MongoDB on your local machine";

/// Drives the reuse/replace decision for each managed setting.
pub struct Reconciler<'a, P, D> {
    store: &'a mut ConfigStore,
    env: &'a EnvDefaults,
    prompt: &'a mut P,
    probe: &'a D,
}

impl<P, D> fmt::Debug for Reconciler<'_, P, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reconciler")
            .field("store", &self.store.path())
            .finish_non_exhaustive()
    }
}

impl<'a, P: Prompt, D: DatabaseProbe> Reconciler<'a, P, D> {
    pub fn new(
        store: &'a mut ConfigStore,
        env: &'a EnvDefaults,
        prompt: &'a mut P,
        probe: &'a D,
    ) -> Self {
        Self {
            store,
            env,
            prompt,
            probe,
        }
    }

    /// Existing value for a setting: the environment wins over the stored
    /// file.
    fn existing(&self, setting: Setting) -> Option<String> {
        self.env
            .get(setting)
            .or_else(|| self.store.get(setting))
            .map(str::to_string)
    }

    /// Reconcile a generated token secret. With no existing value a fresh
    /// secret is generated without asking; with one, the operator chooses
    /// between rotating (the default) and keeping it.
    pub fn reconcile_secret(
        &mut self,
        setting: Setting,
    ) -> Result<ValueSource, SetupError> {
        let source = match self.existing(setting) {
            Some(existing) => {
                println!("Your current {} is: {existing}", setting.label());
                let rotate = self.prompt.confirm(
                    &format!("Would you like to generate a new {}?", setting.label()),
                    true,
                )?;
                if rotate {
                    self.store.set(setting, &generate_secret())?;
                    ValueSource::Generated
                } else {
                    self.store.set(setting, &existing)?;
                    ValueSource::Existing
                }
            }
            None => {
                self.store.set(setting, &generate_secret())?;
                ValueSource::Generated
            }
        };
        info!(key = setting.key(), source = ?source, "reconciled");
        Ok(source)
    }

    /// Reconcile the database connection URL.
    ///
    /// Keeping an existing URL skips the reachability probe: it was working
    /// when it was recorded, and probing it again would block offline
    /// re-runs. A newly chosen URL is probed exactly once; an unreachable
    /// database fails the run rather than looping back to the menu.
    pub async fn reconcile_database(&mut self) -> Result<ValueSource, SetupError> {
        if let Some(existing) = self.existing(Setting::DatabaseUrl) {
            println!("Your current MongoDB URL is: {existing}");
            let keep = self
                .prompt
                .confirm("Would you like to keep using this MongoDB URL?", true)?;
            if keep {
                self.store.set(Setting::DatabaseUrl, &existing)?;
                info!(key = Setting::DatabaseUrl.key(), "reconciled, reusing URL");
                return Ok(ValueSource::Existing);
            }
        }

        let (url, source) = self.choose_database_url()?;
        self.probe
            .probe(&url)
            .await
            .map_err(|source| SetupError::Connectivity {
                source,
                hint: DB_UNREACHABLE_HINT,
            })?;
        println!("Connection to MongoDB successful! 🎉");

        self.store.set(Setting::DatabaseUrl, &url)?;
        info!(key = Setting::DatabaseUrl.key(), source = ?source, "reconciled");
        Ok(source)
    }

    fn choose_database_url(&mut self) -> Result<(String, ValueSource), SetupError> {
        println!("Where is your MongoDB instance running?");
        println!("  0. Local instance ({LOCAL_DB_URL})");
        println!("  1. Cloud instance (you provide the connection URL)");
        let choice = self.prompt.input("Enter choice [0]")?;

        match choice.trim() {
            "" | "0" => Ok((LOCAL_DB_URL.to_string(), ValueSource::Generated)),
            "1" => {
                let url = self.prompt.input("Enter your MongoDB connection URL")?;
                Ok((url, ValueSource::UserProvided))
            }
            other => Err(SetupError::InvalidChoice {
                input: other.to_string(),
            }),
        }
    }

    /// Reconcile the reCAPTCHA secret key.
    pub fn reconcile_verification_key(&mut self) -> Result<ValueSource, SetupError> {
        let setting = Setting::VerificationKey;

        if let Some(existing) = self.existing(setting) {
            println!("Your current reCAPTCHA secret key is: {existing}");
            let keep = self
                .prompt
                .confirm("Would you like to keep using this key?", true)?;
            if keep {
                self.store.set(setting, &existing)?;
                info!(key = setting.key(), "reconciled, reusing key");
                return Ok(ValueSource::Existing);
            }
        }

        println!("Please visit https://www.google.com/recaptcha/admin/create to set up reCAPTCHA.");
        println!("Select reCAPTCHA v2 with the \"I'm not a robot\" checkbox, and add localhost to the domains.");
        let key = self.prompt_with_single_retry(
            "Enter your reCAPTCHA secret key",
            is_valid_recaptcha_key,
            "That does not look like a reCAPTCHA secret key (40 characters of letters, digits, - or _).",
        )?;
        self.store.set(setting, &key)?;
        info!(key = setting.key(), "reconciled");
        Ok(ValueSource::UserProvided)
    }

    /// Reconcile the mail credentials as a pair: reusing the username also
    /// reuses the stored password when there is one, so the operator is only
    /// asked for the password when it is actually missing.
    pub fn reconcile_mail(&mut self) -> Result<ValueSource, SetupError> {
        if let Some(username) = self.existing(Setting::MailUsername) {
            println!("Your current mail username is: {username}");
            let keep = self
                .prompt
                .confirm("Would you like to keep using these mail credentials?", true)?;
            if keep {
                self.store.set(Setting::MailUsername, &username)?;
                match self.existing(Setting::MailPassword) {
                    Some(password) => {
                        self.store.set(Setting::MailPassword, &password)?;
                    }
                    None => {
                        let password =
                            self.prompt.password("Enter your mail password")?;
                        self.store.set(Setting::MailPassword, &password)?;
                    }
                }
                info!(
                    key = Setting::MailUsername.key(),
                    "reconciled, reusing credentials"
                );
                return Ok(ValueSource::Existing);
            }
        }

        println!("Mail delivery needs a Gmail account with two-factor authentication enabled.");
        println!("Generate an app password at https://myaccount.google.com/apppasswords and use it below.");
        let username = self.prompt_with_single_retry(
            "Enter your mail username (email address)",
            is_valid_email,
            "That does not look like an email address.",
        )?;
        let password = self.prompt.password("Enter your mail password")?;

        self.store.set(Setting::MailUsername, &username)?;
        self.store.set(Setting::MailPassword, &password)?;
        info!(key = Setting::MailUsername.key(), "reconciled");
        Ok(ValueSource::UserProvided)
    }

    /// Ask once, and on an invalid answer complain and ask exactly once more.
    /// The second answer is accepted as given: the operator has been warned,
    /// and an endless validation loop would make scripted runs hang.
    fn prompt_with_single_retry(
        &mut self,
        prompt: &str,
        is_valid: fn(&str) -> bool,
        complaint: &str,
    ) -> Result<String, SetupError> {
        let first = self.prompt.input(prompt)?;
        if is_valid(&first) {
            return Ok(first);
        }
        println!("{complaint}");
        Ok(self.prompt.input(prompt)?)
    }
}
