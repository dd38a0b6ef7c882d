//! Filter entry point.
//!
//! Invoked by the scheduler as
//! `rastertoprp085 job-id user title copies options [file]`, with the
//! raster page stream on stdin or in `[file]` and the device byte stream
//! on stdout. Status lines go to stderr. Exit status is 0 when at least
//! one page was produced, 1 otherwise.

use std::env;
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::process;
use std::sync::OnceLock;

use log::{error, info};

use rastertoprp085::{CancelToken, Error, Job, JobOptions, OptionList, RasterReader};

static CANCEL: OnceLock<CancelToken> = OnceLock::new();

extern "C" fn cancel_job(_signal: libc::c_int) {
    // Only flag the cancellation; the page loop does the unwinding.
    if let Some(token) = CANCEL.get() {
        token.cancel();
    }
}

/// Let a termination request cancel the job between scanlines.
fn register_sigterm(token: CancelToken) {
    let _ = CANCEL.set(token);
    let handler: extern "C" fn(libc::c_int) = cancel_job;
    unsafe {
        let mut action: libc::sigaction = std::mem::zeroed();
        action.sa_sigaction = handler as libc::sighandler_t;
        libc::sigemptyset(&mut action.sa_mask);
        libc::sigaction(libc::SIGTERM, &action, std::ptr::null_mut());
    }
}

fn run() -> Result<u32, Error> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 6 || args.len() > 7 {
        let program = args
            .get(0)
            .cloned()
            .unwrap_or_else(|| "rastertoprp085".to_string());
        return Err(Error::Usage(program));
    }

    let input: Box<dyn Read> = match args.get(6) {
        Some(path) => Box::new(File::open(path).map_err(Error::OpenInput)?),
        None => Box::new(io::stdin()),
    };

    let cancel = CancelToken::new();
    register_sigterm(cancel.clone());

    let options = JobOptions::resolve(&OptionList::parse(&args[5]));

    let stdout = io::stdout();
    let mut job = Job::new(stdout.lock(), options, cancel);
    job.run(&mut RasterReader::new(BufReader::new(input)))
}

fn main() {
    // Advisory side-channel lines on stderr, "LEVEL: message".
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
        .init();

    match run() {
        Ok(pages) if pages > 0 => info!("Ready to print."),
        Ok(_) => {
            error!("No pages found!");
            process::exit(1);
        }
        Err(err) => {
            error!("{}", err);
            process::exit(1);
        }
    }
}
