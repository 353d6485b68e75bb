use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::debug;
use mcp3208::Channel;

use crate::driver::{Connector, Driver};
use crate::error::{Error, Result};

/// Shared flag that ends a running [`Sampler`] after its current sample.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Repeatedly converts one channel and hands each sample to a sink.
///
/// Without a count or interval it samples back to back until stopped.
#[derive(Debug, Clone)]
pub struct Sampler {
    channel: Channel,
    count: Option<u64>,
    interval: Option<Duration>,
    stop: StopHandle,
}

impl Sampler {
    /// Creates a sampler for the channel with 1-based index `channel`.
    pub fn new(channel: u8) -> Result<Self> {
        let channel = Channel::from_index(channel).ok_or(Error::InvalidChannel(channel))?;

        Ok(Self {
            channel,
            count: None,
            interval: None,
            stop: StopHandle::new(),
        })
    }

    /// Stop after `count` samples.
    pub fn with_count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    /// Wait `interval` between samples.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Handle that stops this sampler from another thread or a signal handler.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// 1-based index of the sampled channel.
    pub fn channel(&self) -> u8 {
        self.channel.index()
    }

    /// Samples until the count is reached, the stop handle fires, or a read or the sink fails.
    /// Returns the number of samples delivered to `sink`.
    pub fn run<C, F, E>(&self, driver: &mut Driver<C>, mut sink: F) -> std::result::Result<u64, E>
    where
        C: Connector,
        F: FnMut(u16) -> std::result::Result<(), E>,
        E: From<Error>,
    {
        let mut taken = 0;

        while !self.finished(taken) {
            if taken > 0 {
                if let Some(interval) = self.interval {
                    thread::sleep(interval);

                    if self.stop.is_stopped() {
                        break;
                    }
                }
            }

            let sample = driver.read(self.channel)?;
            sink(sample)?;
            taken += 1;
        }

        debug!("sampled channel {} {taken} times", self.channel.index());

        Ok(taken)
    }

    fn finished(&self, taken: u64) -> bool {
        self.stop.is_stopped() || self.count.is_some_and(|count| taken >= count)
    }
}
