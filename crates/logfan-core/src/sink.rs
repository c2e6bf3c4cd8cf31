// Copyright (C) 2026  Logfan Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//! Log sinks.
//!
//! A sink pairs a destination with an encoder and a minimum severity. Each
//! record is encoded to one line and written with a single `write_all`, so
//! records from concurrent callers never interleave at byte level: stdout
//! writes hold the process stdout lock, file and boxed writers sit behind a
//! mutex.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use crate::encoder::{Encoder, Record};
use logfan_metrics::Severity;

enum SinkTarget {
    Stdout,
    File(Mutex<File>),
    Writer(Mutex<Box<dyn Write + Send>>),
}

/// A configured log destination: target, encoding, and severity threshold.
pub struct Sink {
    target: SinkTarget,
    encoder: Encoder,
    threshold: Severity,
}

impl Sink {
    /// Sink bound to process standard output
    pub fn stdout(encoder: Encoder, threshold: Severity) -> Self {
        Sink {
            target: SinkTarget::Stdout,
            encoder,
            threshold,
        }
    }

    /// Sink appending to `path`, created with owner-only permissions if absent.
    pub fn file(path: &Path, encoder: Encoder, threshold: Severity) -> io::Result<Self> {
        let mut options = OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let file = options.open(path)?;
        Ok(Sink {
            target: SinkTarget::File(Mutex::new(file)),
            encoder,
            threshold,
        })
    }

    /// Sink writing to an arbitrary boxed writer.
    ///
    /// Used by embedders that capture output, and by tests.
    pub fn writer(writer: Box<dyn Write + Send>, encoder: Encoder, threshold: Severity) -> Self {
        Sink {
            target: SinkTarget::Writer(Mutex::new(writer)),
            encoder,
            threshold,
        }
    }

    /// Encode and write one record; records below the threshold are dropped.
    pub fn write_record(&self, record: &Record<'_>) -> io::Result<()> {
        if record.severity < self.threshold {
            return Ok(());
        }
        let mut line = self.encoder.encode(record);
        line.push('\n');
        match &self.target {
            SinkTarget::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(line.as_bytes())
            }
            SinkTarget::File(file) => {
                let mut file = file.lock().unwrap_or_else(PoisonError::into_inner);
                file.write_all(line.as_bytes())
            }
            SinkTarget::Writer(writer) => {
                let mut writer = writer.lock().unwrap_or_else(PoisonError::into_inner);
                writer.write_all(line.as_bytes())
            }
        }
    }

    /// Flush buffered output on the destination.
    pub fn flush(&self) -> io::Result<()> {
        match &self.target {
            SinkTarget::Stdout => io::stdout().lock().flush(),
            SinkTarget::File(file) => file
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .flush(),
            SinkTarget::Writer(writer) => writer
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .flush(),
        }
    }
}

impl std::fmt::Debug for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let target = match &self.target {
            SinkTarget::Stdout => "stdout",
            SinkTarget::File(_) => "file",
            SinkTarget::Writer(_) => "writer",
        };
        f.debug_struct("Sink")
            .field("target", &target)
            .field("encoder", &self.encoder)
            .field("threshold", &self.threshold)
            .finish()
    }
}
