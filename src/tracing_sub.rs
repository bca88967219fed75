use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock};

use tracing::Level;

static LOG_FILE: OnceLock<Arc<Mutex<File>>> = OnceLock::new();

/// Route log output to `path`, appending. Only the first call takes effect.
pub fn set_log_file(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let _ = LOG_FILE.set(Arc::new(Mutex::new(file)));
    Ok(())
}

fn log_file() -> Option<Arc<Mutex<File>>> {
    LOG_FILE.get().cloned()
}

pub struct DelegatingWriter {
    inner: DelegatingInner,
}

enum DelegatingInner {
    File(Arc<Mutex<File>>),
    Sink(io::Sink),
}

impl DelegatingWriter {
    fn new(file: Option<Arc<Mutex<File>>>) -> Self {
        match file {
            Some(file) => DelegatingWriter {
                inner: DelegatingInner::File(file),
            },
            // stderr would paint over the alternate screen
            None => DelegatingWriter {
                inner: DelegatingInner::Sink(io::sink()),
            },
        }
    }
}

impl Write for DelegatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.inner {
            DelegatingInner::File(f) => match f.lock() {
                Ok(mut file) => file.write(buf),
                Err(_) => Ok(buf.len()),
            },
            DelegatingInner::Sink(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.inner {
            DelegatingInner::File(f) => match f.lock() {
                Ok(mut file) => file.flush(),
                Err(_) => Ok(()),
            },
            DelegatingInner::Sink(s) => s.flush(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SubscriberMakeWriter;

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SubscriberMakeWriter {
    type Writer = DelegatingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        DelegatingWriter::new(log_file())
    }
}

/// Initialize the tracing subscriber. Output goes to the file set with
/// [`set_log_file`], and is dropped otherwise. Safe to call multiple times;
/// subsequent calls are no-ops for the global subscriber.
pub fn init_default() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_writer(SubscriberMakeWriter)
        .with_target(false)
        .with_thread_names(false)
        .with_ansi(false)
        .try_init();
}
