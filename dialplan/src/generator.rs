use crate::assembler::assemble;
use crate::config::Config;
use crate::error::GenerationError;
use crate::model::{GeneratedArtifact, ModuleNode, Switchboard};
use crate::reload::{AsteriskReloader, Reloader};
use crate::store::ModuleStore;
use crate::writer::ConfigWriter;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Regenerates switchboard dialplans in the background.
///
/// Cloning is cheap and every clone shares the same per-switchboard run
/// locks, so two requests for one switchboard never write concurrently.
#[derive(Clone)]
pub struct DialplanGenerator {
    inner: Arc<Inner>,
}

struct Inner {
    store: Arc<dyn ModuleStore>,
    writer: ConfigWriter,
    reloader: Arc<dyn Reloader>,
    fetch_concurrency: usize,
    runs: std::sync::Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl DialplanGenerator {
    pub fn new(
        store: Arc<dyn ModuleStore>,
        writer: ConfigWriter,
        reloader: Arc<dyn Reloader>,
        fetch_concurrency: usize,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                writer,
                reloader,
                fetch_concurrency,
                runs: std::sync::Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn from_config(store: Arc<dyn ModuleStore>, config: &Config) -> Self {
        let reloader = AsteriskReloader::new(
            config.reload_command.clone(),
            config.reload_timeout(),
        );
        Self::new(
            store,
            ConfigWriter::new(config.output_dir()),
            Arc::new(reloader),
            config.fetch_concurrency,
        )
    }

    /// Queues a run for modules the caller already loaded and returns
    /// straight away. The outcome only shows up in the log.
    pub fn start_generation(
        &self,
        switchboard: Switchboard,
        modules: Vec<ModuleNode>,
    ) -> JoinHandle<()> {
        let generator = self.clone();
        tokio::spawn(async move {
            let id = switchboard.id;
            let result = generator.generate(switchboard, modules).await;
            log_outcome(id, &result);
        })
    }

    /// Like `start_generation`, but loads the switchboard and its modules
    /// from the store first.
    pub fn reload_switchboard(&self, switchboard_id: i64) -> JoinHandle<()> {
        let generator = self.clone();
        tokio::spawn(async move {
            let result = generator.load_and_generate(switchboard_id).await;
            log_outcome(switchboard_id, &result);
        })
    }

    pub async fn load_and_generate(
        &self,
        switchboard_id: i64,
    ) -> Result<GeneratedArtifact, GenerationError> {
        let store = &self.inner.store;
        let switchboard = store
            .find_switchboard(switchboard_id)
            .await
            .map_err(GenerationError::Load)?
            .ok_or(GenerationError::SwitchboardNotFound(switchboard_id))?;
        let modules = store
            .load_modules(switchboard_id)
            .await
            .map_err(GenerationError::Load)?;
        self.generate(switchboard, modules).await
    }

    /// Runs the whole pipeline: validate, compile, write, reload.
    ///
    /// Runs for the same switchboard wait for each other. A reload failure
    /// is logged by the reloader and does not fail the run.
    pub async fn generate(
        &self,
        switchboard: Switchboard,
        modules: Vec<ModuleNode>,
    ) -> Result<GeneratedArtifact, GenerationError> {
        let slot = RunSlot::acquire(&self.inner, switchboard.id);
        let _guard = slot.lock.lock().await;
        self.run(&switchboard, &modules).await
    }

    async fn run(
        &self,
        switchboard: &Switchboard,
        modules: &[ModuleNode],
    ) -> Result<GeneratedArtifact, GenerationError> {
        let inner = &self.inner;
        info!(
            switchboard = switchboard.id,
            modules = modules.len(),
            "generating dialplan"
        );
        let text = assemble(
            inner.store.as_ref(),
            switchboard,
            modules,
            inner.fetch_concurrency,
        )
        .await?;
        let artifact = inner.writer.write(switchboard.id, text).await?;
        info!(
            switchboard = switchboard.id,
            path = %artifact.path.display(),
            "dialplan written"
        );
        inner.reloader.reload().await;
        Ok(artifact)
    }

    #[cfg(test)]
    fn pending_runs(&self) -> usize {
        self.inner
            .runs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// A claim on the run lock of one switchboard.
///
/// The map entry goes away with the last claim, including claims whose run
/// was cancelled while waiting or running.
struct RunSlot {
    inner: Arc<Inner>,
    id: i64,
    lock: Arc<Mutex<()>>,
}

impl RunSlot {
    fn acquire(inner: &Arc<Inner>, id: i64) -> Self {
        let lock = inner
            .runs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(id)
            .or_default()
            .clone();
        Self {
            inner: inner.clone(),
            id,
            lock,
        }
    }
}

impl Drop for RunSlot {
    fn drop(&mut self) {
        let mut runs = self
            .inner
            .runs
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // one count for the map, one for this slot
        let last = runs
            .get(&self.id)
            .map_or(false, |l| Arc::ptr_eq(l, &self.lock) && Arc::strong_count(l) == 2);
        if last {
            runs.remove(&self.id);
        }
    }
}

fn log_outcome(switchboard_id: i64, result: &Result<GeneratedArtifact, GenerationError>) {
    match result {
        Ok(_) => {}
        Err(GenerationError::Abort(reason)) => {
            warn!(switchboard = switchboard_id, "dialplan generation aborted: {reason}")
        }
        Err(e) => error!(switchboard = switchboard_id, "dialplan generation failed: {e}"),
    }
}
