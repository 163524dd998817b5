//! Lifecycle of the embedded JVM.
//!
//! A process hosts at most one live [`Runtime`]. Adapters borrow it, so
//! [`Runtime::shutdown`], which takes `self`, cannot run while any game or
//! state is still alive.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use jni::{InitArgsBuilder, JNIVersion, JavaVM};

use crate::config::RuntimeConfig;
use crate::error::{LudiiError, Result};

use super::context::CallContext;
use super::marshal;
use super::registry::{ClassRegistry, ForeignClass, Op};

static LIVE: AtomicBool = AtomicBool::new(false);

/// The embedded runtime plus its resolved foreign surface.
pub struct Runtime {
    vm: JavaVM,
    registry: ClassRegistry,
    config: RuntimeConfig,
    torn_down: bool,
}

impl Runtime {
    /// Start the JVM with the configured archive on its class path.
    ///
    /// The foreign surface is resolved before this returns; a mismatched
    /// archive tears the VM down again and reports what was missing.
    pub fn start(config: &RuntimeConfig) -> Result<Self> {
        if LIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(LudiiError::AlreadyInitialized);
        }
        let vm = match Self::launch(config) {
            Ok(vm) => vm,
            Err(e) => {
                LIVE.store(false, Ordering::Release);
                return Err(e);
            }
        };

        let mut runtime = Self {
            vm,
            registry: ClassRegistry::new(),
            config: config.clone(),
            torn_down: false,
        };

        if let Err(e) = runtime.resolve_surface() {
            // Teardown releases the slot; its errors are secondary here.
            let _ = runtime.teardown();
            return Err(e);
        }

        tracing::info!(
            archive = %config.archive_path.display(),
            jvm_options = config.jvm_options.len(),
            "runtime started"
        );
        Ok(runtime)
    }

    /// Start with only an archive path and no extra JVM options.
    pub fn start_with_archive(archive_path: impl AsRef<Path>) -> Result<Self> {
        Self::start(&RuntimeConfig::new(archive_path.as_ref()))
    }

    fn launch(config: &RuntimeConfig) -> Result<JavaVM> {
        if !config.archive_path.is_file() {
            return Err(LudiiError::Initialization(format!(
                "archive {} does not exist",
                config.archive_path.display()
            )));
        }

        let class_path = config.class_path_option();
        let mut builder = InitArgsBuilder::new()
            .version(JNIVersion::V8)
            .option(class_path.as_str());
        for option in &config.jvm_options {
            builder = builder.option(option.as_str());
        }
        let args = builder
            .build()
            .map_err(|e| LudiiError::Initialization(format!("invalid JVM arguments: {e}")))?;
        JavaVM::new(args).map_err(|e| LudiiError::Initialization(format!("JVM failed to start: {e}")))
    }

    fn resolve_surface(&self) -> Result<()> {
        let mut cx = self.call_context()?;
        cx.with_frame(|env| self.registry.resolve_all(env))
    }

    /// Whether a runtime is live in this process.
    #[must_use]
    pub fn is_live() -> bool {
        LIVE.load(Ordering::Acquire)
    }

    /// Attach the calling thread for the duration of the returned context.
    pub fn call_context(&self) -> Result<CallContext<'_>> {
        let guard = self
            .vm
            .attach_current_thread()
            .map_err(|e| LudiiError::Initialization(format!("failed to attach thread: {e}")))?;
        Ok(CallContext::new(self, guard))
    }

    /// Keep the calling thread attached until it exits.
    ///
    /// Worker threads making many short calls avoid an attach/detach cycle
    /// per call this way; later contexts on the thread become no-ops.
    pub fn pin_current_thread(&self) -> Result<()> {
        self.vm
            .attach_current_thread_permanently()
            .map_err(|e| LudiiError::Initialization(format!("failed to attach thread: {e}")))?;
        Ok(())
    }

    /// The engine's self-reported version.
    pub fn engine_version(&self) -> Result<String> {
        let mut cx = self.call_context()?;
        cx.with_frame(|env| {
            let class = self.registry.resolve(env, ForeignClass::Game)?;
            let version = marshal::call_static_object(env, class, Op::EngineVersion, &[])?;
            marshal::read_string(env, version)
        })
    }

    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    /// Destroy the JVM and release the process-wide slot.
    pub fn shutdown(mut self) -> Result<()> {
        self.teardown()
    }

    fn teardown(&mut self) -> Result<()> {
        if self.torn_down {
            return Ok(());
        }
        self.torn_down = true;
        // Global references must go before the VM does.
        self.registry.clear();
        // SAFETY: every adapter borrows `self`, so none is alive here, and
        // the registry's global references were just released.
        let destroyed = unsafe { self.vm.destroy() };
        LIVE.store(false, Ordering::Release);
        match destroyed {
            Ok(()) => {
                tracing::info!("runtime shut down");
                Ok(())
            }
            Err(e) => Err(LudiiError::Initialization(format!("JVM failed to shut down: {e}"))),
        }
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        if let Err(e) = self.teardown() {
            tracing::warn!(error = %e, "runtime teardown on drop failed");
        }
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("archive", &self.config.archive_path)
            .field("game_resolved", &self.registry.is_resolved(ForeignClass::Game))
            .field("state_resolved", &self.registry.is_resolved(ForeignClass::State))
            .finish()
    }
}
