use std::io::{self, Read};

use crate::domain::traits::ProgressSink;

/// `Read` adaptor that reports every chunk it hands out as a progress delta.
pub struct ProgressReader<'a, R> {
    source: R,
    progress: &'a dyn ProgressSink,
}

impl<'a, R: Read> ProgressReader<'a, R> {
    pub fn new(source: R, progress: &'a dyn ProgressSink) -> Self {
        Self { source, progress }
    }
}

impl<R: Read> Read for ProgressReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let bytes = self.source.read(buf)?;
        if bytes > 0 {
            self.progress.report(None, bytes as u64);
        }
        Ok(bytes)
    }
}
