use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

const MAX_LOG_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// Install the global subscriber: stdout always, plus a size-capped file when
/// `log_file` is given.
pub fn init_logging(log_level: Level, log_file: Option<&str>) {
    let level_filter = LevelFilter::from_level(log_level);
    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_filter(level_filter);

    let file_layer = log_file.map(|path| {
        let file = CappedLogFile::new(PathBuf::from(path), MAX_LOG_FILE_BYTES);
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(move || file.clone())
            .with_filter(level_filter)
    });

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .init();
}

/// Append-only log file that, once it reaches `max_len`, is cut down to its
/// most recent half before the next write.
#[derive(Clone)]
pub struct CappedLogFile {
    path: PathBuf,
    max_len: u64,
    lock: Arc<Mutex<()>>,
}

impl CappedLogFile {
    pub fn new(path: PathBuf, max_len: u64) -> Self {
        Self {
            path,
            max_len,
            lock: Arc::new(Mutex::new(())),
        }
    }

    fn keep_tail(&self) -> io::Result<()> {
        let size = match std::fs::metadata(&self.path) {
            Ok(meta) => meta.len(),
            Err(_) => return Ok(()),
        };
        if size < self.max_len {
            return Ok(());
        }

        // Read from one byte before the cut so the kept part starts on a line
        // boundary: everything up to and including the first newline is dropped.
        let start = (size - self.max_len / 2).saturating_sub(1);
        let mut tail = Vec::new();
        let mut reader = File::open(&self.path)?;
        reader.seek(SeekFrom::Start(start))?;
        reader.read_to_end(&mut tail)?;
        match tail.iter().position(|&b| b == b'\n') {
            Some(pos) => {
                tail.drain(..=pos);
            }
            None => tail.clear(),
        }

        let mut writer = File::create(&self.path)?;
        writer.write_all(&tail)
    }
}

impl Write for CappedLogFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        self.keep_tail()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_below_cap() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.log");
        let mut file = CappedLogFile::new(path.clone(), 1024);

        file.write_all(b"first\n").unwrap();
        file.write_all(b"second\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn truncates_to_recent_whole_lines_at_cap() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.log");
        // Ten-byte lines shifted by a five-byte prefix, so the cut at byte 50
        // lands in the middle of a line.
        let lines: String = (0..10).map(|i| format!("line-{:04}\n", i)).collect();
        std::fs::write(&path, format!("pre: {}", &lines[..95])).unwrap();

        let mut file = CappedLogFile::new(path.clone(), 100);
        file.write_all(b"next\n").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, lines[50..95].to_string() + "next\n");
    }

    #[test]
    fn cut_on_line_boundary_keeps_that_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.log");
        let lines: String = (0..10).map(|i| format!("line-{:04}\n", i)).collect();
        std::fs::write(&path, &lines).unwrap();

        let mut file = CappedLogFile::new(path.clone(), 100);
        file.write_all(b"next\n").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, lines[50..].to_string() + "next\n");
    }
}
