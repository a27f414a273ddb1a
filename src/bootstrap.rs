//! End-to-end bootstrap run: template reconciliation, then each setting in
//! order.

use std::path::PathBuf;

use tracing::info;

use crate::{
    error::SetupError,
    probe::DatabaseProbe,
    prompt::Prompt,
    reconcile::Reconciler,
    settings::{EnvDefaults, Setting},
    store::ConfigStore,
};

/// File locations for a bootstrap run.
#[derive(Debug, Clone)]
pub struct BootstrapOptions {
    pub env_path: PathBuf,
    pub template_path: PathBuf,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self {
            env_path: PathBuf::from(".env"),
            template_path: PathBuf::from(".env.template"),
        }
    }
}

/// Run the full flow: apply the template, then reconcile the token secrets,
/// the database URL, the reCAPTCHA key, and the mail credentials, in that
/// order. Every completed step is already on disk when a later one fails.
pub async fn run_bootstrap(
    options: &BootstrapOptions,
    env: &EnvDefaults,
    prompt: &mut impl Prompt,
    probe: &impl DatabaseProbe,
) -> Result<(), SetupError> {
    let mut store = ConfigStore::open(&options.env_path, &options.template_path)?;
    store.ensure_template_applied()?;

    let mut reconciler = Reconciler::new(&mut store, env, prompt, probe);
    reconciler.reconcile_secret(Setting::AccessSecret)?;
    reconciler.reconcile_secret(Setting::RefreshSecret)?;
    reconciler.reconcile_database().await?;
    reconciler.reconcile_verification_key()?;
    reconciler.reconcile_mail()?;

    info!(path = %options.env_path.display(), "configuration complete");
    Ok(())
}
