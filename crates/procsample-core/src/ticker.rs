//! Drives a profiler on a fixed period, publishing samples onto a data
//! channel and errors onto a sibling error channel.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::warn;

use crate::profiler::{Parse, Profiler};
use crate::Error;

/// A running ticker. Dropping or calling [`Ticker::stop`] releases its
/// thread and closes both channels.
///
/// Both channels are unbuffered (`sync_channel(0)`): a sample is not
/// published until the consumer receives it, so a slow consumer applies
/// backpressure by delaying the next tick rather than queuing samples.
pub struct Ticker<O> {
    data: Receiver<O>,
    errors: Receiver<Error>,
    stop: SyncSender<()>,
    handle: Option<JoinHandle<()>>,
}

/// Starts a ticker that calls `profiler.sample()` every `period` until
/// stopped. The first sample is taken after one full period, not
/// immediately.
pub fn spawn<P>(period: Duration, mut profiler: Profiler<P>) -> Ticker<P::Output>
where
    P: Parse + Send + 'static,
    P::Output: Send + 'static,
{
    let (data_tx, data_rx) = mpsc::sync_channel(0);
    let (err_tx, err_rx) = mpsc::sync_channel(0);
    let (stop_tx, stop_rx) = mpsc::sync_channel(0);

    let handle = thread::spawn(move || loop {
        match stop_rx.recv_timeout(period) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
            Err(RecvTimeoutError::Timeout) => match profiler.sample() {
                Ok(record) => {
                    if data_tx.send(record).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    warn!("tick failed: {e}");
                    if err_tx.send(e).is_err() {
                        return;
                    }
                }
            },
        }
    });

    Ticker { data: data_rx, errors: err_rx, stop: stop_tx, handle: Some(handle) }
}

impl<O> Ticker<O> {
    /// The data channel: one successful sample per period, in order.
    pub fn data(&self) -> &Receiver<O> {
        &self.data
    }

    /// The error channel: a non-fatal parse/read failure for a given tick.
    /// The ticker continues after publishing one.
    pub fn errors(&self) -> &Receiver<Error> {
        &self.errors
    }

    /// Signals the ticker to stop, waits for its thread to exit, and closes
    /// both channels. In-flight samples run to completion first. Safe to
    /// call more than once.
    pub fn stop(&mut self) {
        let _ = self.stop.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl<O> Drop for Ticker<O> {
    fn drop(&mut self) {
        let _ = self.stop.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
