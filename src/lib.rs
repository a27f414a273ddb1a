//! First-run configuration bootstrapper for the Talawa API server.
//!
//! The tool reconciles a section-delimited configuration file against its
//! template, then walks the operator through six settings: two generated
//! token secrets, the MongoDB connection URL (verified with a single TCP
//! reachability probe), the reCAPTCHA secret key, and the mail credentials.
//! Existing values, whether from the process environment or a previous run,
//! can be reused instead of re-entered.
//!
//! Flow logic is written against two seams, [`prompt::Prompt`] and
//! [`probe::DatabaseProbe`], so the whole run can be driven from scripted
//! answers and stub probes in tests.

pub mod bootstrap;
pub mod error;
pub mod probe;
pub mod prompt;
pub mod reconcile;
pub mod secret;
pub mod settings;
pub mod store;
pub mod validation;

pub use bootstrap::{BootstrapOptions, run_bootstrap};
pub use error::{ProbeError, PromptError, SetupError, StoreError};
pub use probe::{DatabaseProbe, TcpProbe};
pub use prompt::{Prompt, ScriptedPrompt, TermPrompt};
pub use settings::{EnvDefaults, LOCAL_DB_URL, Setting, ValueSource};
pub use store::ConfigStore;
