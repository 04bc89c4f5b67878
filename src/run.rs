//! Simulation flow for the `simulate` command.
//!
//! Builds a manager over simulated backends, drives every configured
//! interface through up/down cycles on a set of simulated devices, tears
//! everything down and audits the resource ledger.

use std::future::Future;
use std::process::ExitCode;
use std::sync::Arc;

use thiserror::Error;
use tokio::signal;
use tokio::task::{JoinError, JoinSet};

use radionet::config::{InterfacePlan, ValidatedConfig};
use radionet::network::{
    BackendRegistry, DeviceHandle, DeviceTable, NetworkConfig, NetworkError, NetworkManager,
    NetworkType, SimulatedBackend,
};
use radionet::resource::defaults::MANAGER_OS_OBJECTS;
use radionet::resource::{AuditReport, MemoryModel, ResourceLedger, SharedCounter};

use crate::app::exit_code;

type Manager = NetworkManager<Arc<DeviceTable>>;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for simulation failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// A network operation was rejected.
    #[error("Network operation failed: {0}")]
    Network(#[from] NetworkError),

    /// A cycle task panicked or was cancelled.
    #[error("Cycle task failed: {0}")]
    Task(#[from] JoinError),
}

/// Outcome of a completed simulation.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    /// Audit taken right after the manager was created.
    pub before: AuditReport,
    /// Audit taken after deinit.
    pub after: AuditReport,
    /// Number of cycles that ran to completion.
    pub cycles_completed: u32,
    /// True if a shutdown signal cut the run short.
    pub interrupted: bool,
}

impl SimulationReport {
    /// Returns true if the final audit found nothing outstanding.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.after.clean
    }

    /// Maps the final audit to the process exit code.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        if self.is_clean() {
            exit_code::SUCCESS
        } else {
            exit_code::runtime_error()
        }
    }
}

/// Runs the simulation until it completes or a shutdown signal arrives.
///
/// # Errors
///
/// See [`execute_until`].
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: &ValidatedConfig) -> Result<SimulationReport, RunError> {
    execute_until(config, shutdown_signal()).await
}

/// Runs the simulation, stopping early once `shutdown` completes.
///
/// This function:
/// 1. Registers one simulated backend per configured interface type
/// 2. Initializes the manager and opens the simulated devices
/// 3. Runs the up/down cycles, all pairs of a cycle concurrently
/// 4. Detaches and closes every device, then deinitializes the manager
/// 5. Audits the ledger
///
/// Heap and stack headroom are sampled through [`MemoryModel`] after init and
/// whenever an interface comes up, so the audit thresholds apply to the run.
///
/// Teardown runs even when a cycle fails.
///
/// # Errors
///
/// Returns an error if the manager cannot be initialized or a cycle fails.
/// On a cycle failure the teardown still runs before the error is returned.
pub async fn execute_until<F>(
    config: &ValidatedConfig,
    shutdown: F,
) -> Result<SimulationReport, RunError>
where
    F: Future<Output = ()>,
{
    let ledger = Arc::new(ResourceLedger::with_thresholds(config.thresholds));
    let counter: SharedCounter = ledger.clone();
    let devices = Arc::new(DeviceTable::new());

    let registry = build_registry(config, &counter)?;
    let manager = Arc::new(NetworkManager::new(
        Arc::clone(&devices),
        registry,
        Arc::clone(&counter),
    ));
    let before = ledger.audit(MANAGER_OS_OBJECTS, false);

    manager.init().await?;
    MemoryModel::default().sample(&ledger);

    let handles: Vec<DeviceHandle> = (0..config.devices).map(|_| devices.open()).collect();
    tracing::info!(
        "Opened {} device(s), running {} cycle(s)",
        handles.len(),
        config.cycles
    );

    tokio::pin!(shutdown);

    let mut tasks = JoinSet::new();
    let mut cycles_completed = 0;
    let mut interrupted = false;
    let mut failure = None;

    for cycle in 1..=config.cycles {
        spawn_cycle(
            &mut tasks,
            &manager,
            &ledger,
            &handles,
            &config.interfaces,
            cycle == 1,
        );

        tokio::select! {
            biased;

            () = &mut shutdown => {
                tracing::info!("Shutdown signal received, cleaning up...");
                interrupted = true;
            }

            result = join_cycle(&mut tasks) => {
                if let Err(e) = result {
                    tracing::error!("Cycle {cycle} failed: {e}");
                    failure = Some(e);
                } else {
                    tracing::debug!("Cycle {cycle} complete");
                    cycles_completed = cycle;
                }
            }
        }

        if interrupted || failure.is_some() {
            tasks.shutdown().await;
            break;
        }
    }

    teardown(&manager, &devices, &handles).await;

    let after = ledger.audit(MANAGER_OS_OBJECTS, config.diagnostics);
    if let Some(e) = failure {
        return Err(e);
    }

    Ok(SimulationReport {
        before,
        after,
        cycles_completed,
        interrupted,
    })
}

/// Registers a simulated backend for every configured interface type.
fn build_registry(
    config: &ValidatedConfig,
    counter: &SharedCounter,
) -> Result<BackendRegistry, NetworkError> {
    config
        .network_types()
        .try_fold(BackendRegistry::new(), |registry, ty| {
            let backend =
                SimulatedBackend::new(ty, Arc::clone(counter)).with_latency(config.latency);
            registry.with_backend(Arc::new(backend))
        })
}

/// Spawns one up/down task per (device, interface) pair.
///
/// The first cycle hands over the configuration; later cycles rely on the
/// copy the manager retained.
fn spawn_cycle(
    tasks: &mut JoinSet<Result<(), NetworkError>>,
    manager: &Arc<Manager>,
    ledger: &Arc<ResourceLedger>,
    handles: &[DeviceHandle],
    plans: &[InterfacePlan],
    first: bool,
) {
    for &handle in handles {
        for plan in plans {
            let manager = Arc::clone(manager);
            let ledger = Arc::clone(ledger);
            let config = first.then(|| plan.config.clone());
            tasks.spawn(cycle_pair(manager, ledger, handle, config, plan.network_type()));
        }
    }
}

async fn cycle_pair(
    manager: Arc<Manager>,
    ledger: Arc<ResourceLedger>,
    handle: DeviceHandle,
    config: Option<NetworkConfig>,
    ty: NetworkType,
) -> Result<(), NetworkError> {
    manager.up(handle, ty, config).await?;
    MemoryModel::default().sample(&ledger);
    tracing::debug!("{handle}/{ty} is {}", manager.state(handle, ty));
    manager.down(handle, ty).await
}

/// Waits for every task of the cycle; returns the first failure.
async fn join_cycle(tasks: &mut JoinSet<Result<(), NetworkError>>) -> Result<(), RunError> {
    let mut first_error = None;
    while let Some(joined) = tasks.join_next().await {
        let outcome = joined.map_err(RunError::from).and_then(|r| r.map_err(RunError::from));
        if let Err(e) = outcome {
            first_error.get_or_insert(e);
        }
    }
    first_error.map_or(Ok(()), Err)
}

/// Detaches and closes every device, then deinitializes the manager.
///
/// Failures are logged; the backends' deinit drops anything left behind.
async fn teardown(manager: &Manager, devices: &DeviceTable, handles: &[DeviceHandle]) {
    for &handle in handles {
        if let Err(e) = manager.detach_device(handle).await {
            tracing::warn!("Failed to detach {handle}: {e}");
        }
        devices.close(handle);
    }
    manager.deinit().await;
}

/// Returns a future that completes when a shutdown signal is received.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
