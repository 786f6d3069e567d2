use thiserror::Error;

//Errors that can escape the snapshot/projection pipeline.
//Per-process and per-metric failures never show up here; those are recovered
//locally with the documented fallback values.
#[derive(Debug, Error)]
pub enum Error {
    //Configuration errors are raised before any collection work starts.
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("unknown sort key '{0}'")]
    UnknownSortKey(String),

    //The whole process table could not be enumerated (not a single-process failure).
    #[error("failed to read the process table: {0}")]
    ProcessTable(#[from] procfs::ProcError),

    #[error("failed to write to the render target: {0}")]
    Render(#[from] std::io::Error),
}
