// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Background stdin reader.
//
// A dedicated thread polls stdin and forwards byte chunks over a channel,
// so the event loop can block on `recv_timeout` and still get its ticks
// (clock refresh, message expiry, transition end). The thread checks a
// stop flag between polls; shutdown latency is one poll timeout.

#[cfg(unix)]
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

const READ_BUF_SIZE: usize = 4096;

/// Milliseconds between stop-flag checks.
const POLL_TIMEOUT_MS: i32 = 50;

/// Handle to the reader thread. Stops the thread when dropped.
pub struct StdinReader {
    handle: Option<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
}

impl StdinReader {
    /// Spawn the reader thread and return the chunk receiver.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS refuses to spawn the thread.
    pub fn spawn() -> std::io::Result<(Self, Receiver<Vec<u8>>)> {
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("stdin-reader".into())
            .spawn(move || read_loop(&tx, &flag))?;

        Ok((
            Self {
                handle: Some(handle),
                stop,
            },
            rx,
        ))
    }

    /// Signal the thread and join it. Idempotent.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("stdin reader thread panicked");
            }
        }
    }
}

impl Drop for StdinReader {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(unix)]
fn read_loop(tx: &Sender<Vec<u8>>, stop: &AtomicBool) {
    let fd = libc::STDIN_FILENO;
    let mut buf = [0u8; READ_BUF_SIZE];

    while !stop.load(Ordering::Relaxed) {
        let mut pfd = libc::pollfd {
            fd,
            events: libc::POLLIN,
            revents: 0,
        };
        let ready = unsafe { libc::poll(&raw mut pfd, 1, POLL_TIMEOUT_MS) };
        if ready < 0 && io::Error::last_os_error().kind() != io::ErrorKind::Interrupted {
            break;
        }
        if ready <= 0 {
            continue;
        }

        let n = unsafe { libc::read(fd, buf.as_mut_ptr().cast(), buf.len()) };
        if n <= 0 {
            break;
        }
        #[allow(clippy::cast_sign_loss)]
        let chunk = buf[..n as usize].to_vec();
        if tx.send(chunk).is_err() {
            break;
        }
    }
}

#[cfg(not(unix))]
fn read_loop(tx: &Sender<Vec<u8>>, stop: &AtomicBool) {
    use std::io::Read;

    let mut buf = [0u8; READ_BUF_SIZE];
    while !stop.load(Ordering::Relaxed) {
        match std::io::stdin().lock().read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                if tx.send(buf[..n].to_vec()).is_err() {
                    break;
                }
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
