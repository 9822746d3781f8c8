//! Lifecycle host - init/destroy hooks in dependency order
//!
//! Hooks initialize in registration order and are destroyed in reverse.
//! A failing `on_init` aborts startup after tearing down whatever was
//! already initialized.

use std::future::Future;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, error, info};

/// A component with startup and shutdown callbacks
#[async_trait]
pub trait LifecycleHook: Send {
    /// Name used in lifecycle logs
    fn name(&self) -> &str;

    /// Called after construction, before serving traffic
    async fn on_init(&mut self) -> Result<()>;

    /// Called during graceful shutdown, before process exit
    async fn on_destroy(&mut self) -> Result<()>;
}

#[derive(Default)]
pub struct LifecycleHost {
    hooks: Vec<Box<dyn LifecycleHook>>,
    /// Number of hooks (from the front) whose `on_init` succeeded
    initialized: usize,
}

impl LifecycleHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, hook: impl LifecycleHook + 'static) -> &mut Self {
        self.hooks.push(Box::new(hook));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run every `on_init` in registration order.
    ///
    /// On the first failure, already-initialized hooks are destroyed in
    /// reverse order (their failures only logged) and the error is returned.
    pub async fn init_all(&mut self) -> Result<()> {
        for idx in self.initialized..self.hooks.len() {
            let hook = &mut self.hooks[idx];
            debug!(hook = hook.name(), "Initializing");
            if let Err(err) = hook.on_init().await {
                error!(hook = hook.name(), error = %err, "Initialization failed, aborting startup");
                self.rollback().await;
                return Err(err);
            }
            self.initialized = idx + 1;
        }
        info!(hooks = self.initialized, "Startup complete");
        Ok(())
    }

    /// Run `on_destroy` on every initialized hook in reverse order.
    ///
    /// Keeps going past failures and returns the first one.
    pub async fn shutdown_all(&mut self) -> Result<()> {
        let mut first_err = None;
        while self.initialized > 0 {
            self.initialized -= 1;
            let hook = &mut self.hooks[self.initialized];
            debug!(hook = hook.name(), "Destroying");
            if let Err(err) = hook.on_destroy().await {
                error!(hook = hook.name(), error = %err, "Shutdown hook failed");
                first_err.get_or_insert(err);
            }
        }
        info!("Shutdown complete");
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Initialize, wait for `shutdown`, then tear down
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        self.init_all().await?;
        shutdown.await;
        self.shutdown_all().await
    }

    async fn rollback(&mut self) {
        while self.initialized > 0 {
            self.initialized -= 1;
            let hook = &mut self.hooks[self.initialized];
            if let Err(err) = hook.on_destroy().await {
                error!(hook = hook.name(), error = %err, "Rollback failed");
            }
        }
    }
}
