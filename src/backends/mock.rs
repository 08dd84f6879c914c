//! In-memory [`ReportSource`] for tests and demos.
//!
//! Clones share the same queues, so a test keeps one handle to feed reports and
//! inspect writes while the backend owns another.

use crate::device::ReportSource;
use crate::error::{InputError, InputResult};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug)]
pub struct MockReportSource {
    read_queue: Arc<Mutex<VecDeque<Vec<u8>>>>,
    write_history: Arc<Mutex<Vec<Vec<u8>>>>,
    connected: Arc<Mutex<bool>>,
}

impl Default for MockReportSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockReportSource {
    pub fn new() -> Self {
        Self {
            read_queue: Arc::new(Mutex::new(VecDeque::new())),
            write_history: Arc::new(Mutex::new(Vec::new())),
            connected: Arc::new(Mutex::new(true)),
        }
    }

    /// Queue one input report, `[report_id][data...]`.
    pub fn queue_read(&self, report: Vec<u8>) {
        let mut queue = self.read_queue.lock().unwrap_or_else(|e| e.into_inner());
        queue.push_back(report);
    }

    pub fn pending_reads(&self) -> usize {
        self.read_queue.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Every output report written so far, oldest first.
    pub fn write_history(&self) -> Vec<Vec<u8>> {
        self.write_history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn disconnect(&self) {
        *self.connected.lock().unwrap_or_else(|e| e.into_inner()) = false;
    }

    pub fn reconnect(&self) {
        *self.connected.lock().unwrap_or_else(|e| e.into_inner()) = true;
    }

    fn is_connected(&self) -> bool {
        *self.connected.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ReportSource for MockReportSource {
    fn read_report(&mut self, buf: &mut [u8]) -> InputResult<usize> {
        if !self.is_connected() {
            return Err(InputError::Disconnected);
        }
        let mut queue = self.read_queue.lock().unwrap_or_else(|e| e.into_inner());
        let Some(report) = queue.pop_front() else {
            return Ok(0);
        };
        let n = report.len().min(buf.len());
        buf[..n].copy_from_slice(&report[..n]);
        Ok(n)
    }

    fn write_report(&mut self, report: &[u8]) -> InputResult<usize> {
        if !self.is_connected() {
            return Err(InputError::Disconnected);
        }
        let mut history = self.write_history.lock().unwrap_or_else(|e| e.into_inner());
        history.push(report.to_vec());
        Ok(report.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_queues_and_disconnect() {
        let feed = MockReportSource::new();
        let mut source = feed.clone();
        feed.queue_read(vec![1, 0xAA, 0xBB]);

        let mut buf = [0u8; 2];
        assert_eq!(source.read_report(&mut buf).unwrap(), 2);
        assert_eq!(buf, [1, 0xAA]);
        assert_eq!(source.read_report(&mut buf).unwrap(), 0);

        source.write_report(&[2, 0x05]).unwrap();
        assert_eq!(feed.write_history(), vec![vec![2, 0x05]]);

        feed.disconnect();
        assert!(matches!(source.read_report(&mut buf), Err(InputError::Disconnected)));
        assert!(source.write_report(&[2]).is_err());
    }
}
