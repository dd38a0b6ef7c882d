//! Error types for the raster filter.
//!
//! Only conditions that abort the job live here. Exhaustion of the raster
//! stream and job cancellation are not errors: both degrade to an orderly
//! shutdown that leaves the printer fed, cut and reset.

use std::collections::TryReserveError;
use std::io;
use thiserror::Error;

/// Main error type for filter operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The filter was invoked with the wrong number of arguments.
    #[error("Usage: {0} job-id user title copies options [file]")]
    Usage(String),

    /// The raster file named on the command line could not be opened.
    #[error("Unable to open raster file: {0}")]
    OpenInput(io::Error),

    /// Writing to the output sink failed.
    ///
    /// Transport failures are fatal to the job; no retry is attempted.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// A scanline buffer could not be allocated.
    ///
    /// Fatal: the job aborts immediately, without attempting to close a
    /// partially written band.
    #[error("Unable to allocate a scanline buffer: {0}")]
    Allocation(#[from] TryReserveError),

    /// The input is not a raster stream this filter understands.
    #[error("Unsupported raster stream: {0}")]
    UnsupportedRaster(String),
}
