use thiserror::Error;

/// Configuration-class failures raised by [`crate::catalog::CatalogBuilder::synchronize`].
/// These are fatal: the caller should abort and discard any partial output,
/// never attempt to answer queries against a catalog that failed to build.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("bus {bus:?} references unknown stop {stop:?}")]
    UnknownStopInWaybill { bus: String, stop: String },
}
