//! Job lifecycle: drives pages from a source through the band encoder.
//!
//! One job is a strictly sequential pipeline: setup triggers, then for each
//! page a device reset and the page's scanlines, then a single shutdown
//! sequence that feeds past the printed area, optionally cuts, resets, and
//! fires the after-print triggers. One scanline is read, encoded and
//! written before the next is requested.

use std::cmp;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};

use crate::command;
use crate::encoder::BandEncoder;
use crate::error::Error;
use crate::options::{JobOptions, TriggerPhase};
use crate::raster::{PageHeader, PageSource};
use crate::FEED_MAX_UNITS;

/// Cooperative cancellation flag, shared with a signal-delivery collaborator.
///
/// Setting the flag interrupts nothing by itself. The page loop polls it
/// once per page and once per scanline and winds the job down through the
/// normal shutdown path, so the printer is left fed, cut and reset.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        CancelToken::default()
    }

    /// Request cancellation.
    ///
    /// Safe to call from a signal handler: it stores a flag and performs
    /// no I/O.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_canceled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// One print job: the output sink, the resolved options and a cancel flag.
pub struct Job<W> {
    sink: W,
    options: JobOptions,
    cancel: CancelToken,
}

impl<W: Write> Job<W> {
    pub fn new(sink: W, options: JobOptions, cancel: CancelToken) -> Self {
        Job {
            sink,
            options,
            cancel,
        }
    }

    /// Run the whole job and return the number of pages produced.
    ///
    /// The shutdown sequence runs exactly once, after the last page or on
    /// cancellation, using the last page header that was read. A job that
    /// never read a header feeds nothing and cuts nothing, but still
    /// resets the device and fires the after-print triggers.
    pub fn run<S: PageSource>(&mut self, source: &mut S) -> Result<u32, Error> {
        self.fire_triggers(TriggerPhase::BeforePrint)?;

        let mut pages: u32 = 0;
        let mut last_header: Option<PageHeader> = None;

        while let Some(header) = source.next_page()? {
            last_header = Some(header.clone());
            if self.cancel.is_canceled() {
                break;
            }
            pages += 1;

            // Page accounting line for the scheduler, not a log message.
            eprintln!("PAGE: {} {}", pages, header.copies);

            self.start_page(&header)?;
            self.encode_page(source, &header, pages)?;

            // Logical end of page: push everything out, canceled or not.
            self.sink.flush()?;

            if self.cancel.is_canceled() {
                break;
            }
        }

        self.shutdown(last_header.as_ref())?;
        Ok(pages)
    }

    fn start_page(&mut self, header: &PageHeader) -> Result<(), Error> {
        self.sink.write_all(&command::init())?;
        if header.wants_eject() {
            debug!("page margins request an eject");
        }
        Ok(())
    }

    /// Encode every scanline of one page.
    ///
    /// The scanline buffer is allocated once per page and reused row by
    /// row; a failed allocation aborts the job. A source that dies before
    /// delivering the whole page ends the page early, leaving any open
    /// band unterminated on the wire.
    fn encode_page<S: PageSource>(
        &mut self,
        source: &mut S,
        header: &PageHeader,
        page: u32,
    ) -> Result<(), Error> {
        let mut line: Vec<u8> = Vec::new();
        line.try_reserve_exact(header.bytes_per_line as usize)?;
        line.resize(header.bytes_per_line as usize, 0);

        let mut encoder = BandEncoder::new();
        for y in 0..header.height {
            if self.cancel.is_canceled() {
                info!("job canceled, ejecting page {}", page);
                break;
            }
            if y % 128 == 0 {
                info!(
                    "Printing page {}, {}% complete...",
                    page,
                    100 * u64::from(y) / u64::from(header.height)
                );
            }
            match source.read_line(&mut line) {
                Ok(true) => {}
                Ok(false) => {
                    debug!("raster source exhausted at row {} of page {}", y, page);
                    break;
                }
                // A failing source ends the page the same way a finished
                // one does; the next header read settles the job's fate.
                Err(err) => {
                    warn!("reading row {} of page {} failed: {}", y, page, err);
                    break;
                }
            }
            encoder.encode_line(&mut self.sink, header, y, &line)?;
        }

        if encoder.is_open() {
            warn!("page {} ended with an unterminated raster band", page);
        }
        Ok(())
    }

    /// Feed past the printed area, cut if asked to, reset, and fire the
    /// after-print triggers.
    fn shutdown(&mut self, header: Option<&PageHeader>) -> Result<(), Error> {
        if let Some(header) = header {
            let mut feed = header.height / 8;
            while feed > 0 {
                let step = cmp::min(feed, u32::from(FEED_MAX_UNITS));
                self.sink.write_all(&command::feed(step as u8))?;
                feed -= step;
            }
            if header.cut_media {
                self.sink.write_all(&command::cut())?;
            }
        }

        self.sink.write_all(&command::init())?;
        self.fire_triggers(TriggerPhase::AfterPrint)?;
        self.sink.flush()?;
        Ok(())
    }

    fn fire_triggers(&mut self, phase: TriggerPhase) -> Result<(), Error> {
        for opcode in self.options.triggers(phase) {
            self.sink.write_all(opcode)?;
        }
        Ok(())
    }
}
