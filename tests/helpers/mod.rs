//! Shared fixtures for integration tests.

#![allow(dead_code)]

use parking_lot::{Condvar, Mutex};
use spindle::FileProvider;
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Install a test-writer tracing subscriber once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// In-memory provider over a fixed byte array.
pub struct MemoryProvider {
    data: Vec<u8>,
    pos: u64,
    reads: Arc<AtomicU64>,
}

impl MemoryProvider {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            pos: 0,
            reads: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Counter of read calls, shared so it stays observable after the
    /// provider moves into a registry.
    pub fn reads(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.reads)
    }
}

impl FileProvider for MemoryProvider {
    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    fn seek(&mut self, offset: u64) -> io::Result<()> {
        self.pos = offset;
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let start = (self.pos as usize).min(self.data.len());
        let count = buf.len().min(self.data.len() - start);
        buf[..count].copy_from_slice(&self.data[start..start + count]);
        self.pos += count as u64;
        Ok(count)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.data.len() as u64
    }
}

/// Rendezvous between a [`GatedProvider`] and the test body.
pub struct Gate {
    state: Mutex<GateState>,
    cv: Condvar,
}

#[derive(Default)]
struct GateState {
    entered: bool,
    released: bool,
}

impl Gate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(GateState::default()),
            cv: Condvar::new(),
        })
    }

    /// Block until the provider has entered `read`.
    pub fn wait_entered(&self) {
        let mut state = self.state.lock();
        self.cv.wait_while(&mut state, |s| !s.entered);
    }

    /// Let the blocked read proceed.
    pub fn release(&self) {
        let mut state = self.state.lock();
        state.released = true;
        self.cv.notify_all();
    }

    fn enter_and_wait(&self) {
        let mut state = self.state.lock();
        state.entered = true;
        self.cv.notify_all();
        self.cv.wait_while(&mut state, |s| !s.released);
    }
}

/// Provider whose first read blocks until its gate is released; pins the
/// worker inside an in-flight request.
pub struct GatedProvider {
    inner: MemoryProvider,
    gate: Arc<Gate>,
}

impl GatedProvider {
    pub fn new(data: Vec<u8>, gate: Arc<Gate>) -> Self {
        Self {
            inner: MemoryProvider::new(data),
            gate,
        }
    }
}

impl FileProvider for GatedProvider {
    fn len(&self) -> u64 {
        self.inner.len()
    }

    fn seek(&mut self, offset: u64) -> io::Result<()> {
        self.inner.seek(offset)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.gate.enter_and_wait();
        self.inner.read(buf)
    }

    fn at_end(&self) -> bool {
        self.inner.at_end()
    }
}

/// Provider whose reads always fail.
pub struct FailingProvider;

impl FileProvider for FailingProvider {
    fn len(&self) -> u64 {
        1024
    }

    fn seek(&mut self, _offset: u64) -> io::Result<()> {
        Ok(())
    }

    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "backing store failed"))
    }

    fn at_end(&self) -> bool {
        false
    }
}
