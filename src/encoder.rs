//! Scanline-to-band encoding, the core of the filter.
//!
//! Scanlines stream into bounded raster bands: at most 24 lines of at most
//! 72 bytes, framed by an open header carrying the geometry and a close
//! sequence. An all-zero scanline that falls on a band boundary is elided
//! entirely; one inside an open band is transmitted like any other, since
//! the band already owes the printer a fixed number of lines.

use std::cmp;
use std::io::{self, Write};

use crate::command;
use crate::raster::PageHeader;
use crate::{BAND_MAX_BYTES, BAND_MAX_LINES};

/// True when every byte of the scanline is zero.
pub fn is_blank(line: &[u8]) -> bool {
    line.iter().all(|&byte| byte == 0)
}

/// Streams the scanlines of one page into raster bands.
///
/// The only state is a countdown of lines still owed to the open band;
/// zero means no band is open. The band geometry is latched when the band
/// opens: `min(24, lines left on the page)` tall and
/// `min(72, bytes_per_line)` wide. Scanline bytes past the band width are
/// dropped, a lossy but deliberate fit to the printer's fixed head width.
#[derive(Debug)]
pub struct BandEncoder {
    remaining: u8,
    width: u8,
}

impl BandEncoder {
    /// A fresh encoder; each page gets its own.
    pub fn new() -> Self {
        BandEncoder {
            remaining: 0,
            width: 0,
        }
    }

    /// True while a band is open and owed further scanlines.
    pub fn is_open(&self) -> bool {
        self.remaining > 0
    }

    /// Encode the scanline at row `y`, with `y < page.height`.
    ///
    /// Writing the line a band was opened for counts against the band's
    /// height; the close sequence goes out right after the last owed line.
    pub fn encode_line<W: Write>(
        &mut self,
        sink: &mut W,
        page: &PageHeader,
        y: u32,
        line: &[u8],
    ) -> io::Result<()> {
        if self.remaining == 0 {
            if is_blank(line) {
                return Ok(());
            }
            let height = cmp::min(u32::from(BAND_MAX_LINES), page.height - y) as u8;
            let width = cmp::min(u32::from(BAND_MAX_BYTES), page.bytes_per_line) as u8;
            sink.write_all(&command::band_open(width, height))?;
            self.remaining = height;
            self.width = width;
        }

        sink.write_all(&line[..usize::from(self.width)])?;
        self.remaining -= 1;

        if self.remaining == 0 {
            sink.write_all(&command::band_close())?;
        }
        Ok(())
    }
}
