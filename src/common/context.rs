use std::env;
use std::sync::Arc;

use clap::Parser;

use super::{Arguments, Config};
use crate::prelude::*;
use crate::render::Mode;
use crate::store::{self, FileStore};

/// Type alias for an atomically-refcounted instance of [`InnerContext`].
pub type Context = Arc<InnerContext>;

/// Inner representation of global program context.
#[derive(Debug)]
pub struct InnerContext {
    pub args: Arguments,
    pub config: Config,
}

impl InnerContext {
    pub fn init() -> Result<Context> {
        let args = Arguments::parse();
        let dir = env::current_dir()?;
        let config = Config::locate(args.config.as_deref(), &dir)?;

        let ctx = InnerContext { args, config };

        Ok(Arc::new(ctx))
    }

    /// Opens the preference store for `origin`.
    pub fn store(&self, origin: &str) -> Result<FileStore> {
        FileStore::from_config(&self.config, origin)
    }

    /// Resolves the render mode for this run: an explicit override wins, otherwise the stored
    /// preference for `origin`. The result is fixed for the rest of the run.
    pub fn resolve_mode(&self, origin: &str, overridden: Option<Mode>) -> Result<Mode> {
        if let Some(mode) = overridden {
            debug!("Mode overridden to {mode} for this run.");
            return Ok(mode);
        }

        let store = self.store(origin)?;
        Ok(store::read_mode(&store))
    }
}
