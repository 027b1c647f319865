//! Session registries: aliases, environment, jobs, and script parsing.

pub mod alias;
pub mod env;
pub mod jobs;
pub mod script;

pub use alias::AliasManager;
pub use env::EnvManager;
pub use jobs::{Job, JobManager, JobStatus};
pub use script::{substitute_positional, unquote, ScriptFunction, ScriptRunner, ScriptStep};
