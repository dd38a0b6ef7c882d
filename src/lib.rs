//! Raster filter for the Tysso PRP-085IIIT thermal receipt printer.
//!
//! This crate turns a decoded raster page stream into the ESC/POS command
//! bytes that reproduce each page on the printer, advance and cut the
//! paper, and fire the configured cash drawer and beeper triggers. Image
//! data travels as bounded raster bands; all-zero scanlines that fall on a
//! band boundary are elided to keep sparse receipts small.
//!
//! # Example
//!
//! ```rust,no_run
//! use rastertoprp085::{CancelToken, Job, JobOptions, OptionList, RasterReader};
//! use std::io::{self, BufReader};
//!
//! let options = JobOptions::resolve(&OptionList::parse("CashDrawer=CashDrawer1AfterPrint"));
//! let stdout = io::stdout();
//! let mut job = Job::new(stdout.lock(), options, CancelToken::new());
//! let mut pages = RasterReader::new(BufReader::new(io::stdin()));
//! let printed = job.run(&mut pages)?;
//! # Ok::<(), rastertoprp085::Error>(())
//! ```

pub mod command;

mod encoder;
mod error;
mod job;
mod options;
mod raster;

pub use crate::{
    encoder::{is_blank, BandEncoder},
    error::Error,
    job::{CancelToken, Job},
    options::{BeeperMode, ChoiceSource, DrawerMode, JobOptions, OptionList, TriggerPhase, TriggerSet},
    raster::{PageHeader, PageSource, RasterReader},
};

/// Tallest raster band the printer accepts, in scanlines.
pub const BAND_MAX_LINES: u8 = 24;

/// Widest raster band the printer accepts, in bytes (576 dots / 8).
///
/// Scanlines wider than this are truncated on the right edge; the dropped
/// bytes are never transmitted.
pub const BAND_MAX_BYTES: u8 = 72;

/// Largest feed amount a single feed command can carry. Longer feeds are
/// split into multiple commands.
pub const FEED_MAX_UNITS: u8 = 200;
