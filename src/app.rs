use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use log::debug;

use crate::error::Error;
use crate::monitor::{Snapshot, SnapshotCollector};
use crate::render::RenderSink;
use crate::table::{self, ProjectionSpec};

/// Supplies snapshots to the refresh loop. The live implementation walks
/// /proc; tests substitute canned data.
pub trait SnapshotSource {
    fn snapshot(&mut self) -> Result<Snapshot, Error>;
}

impl SnapshotSource for SnapshotCollector {
    fn snapshot(&mut self) -> Result<Snapshot, Error> {
        self.collect()
    }
}

/// Drives collect -> project -> render cycles.
///
/// A single pass renders one table and returns. In continuous mode the loop
/// waits on the cancellation channel with a timeout instead of sleeping
/// unconditionally, so an interrupt lands within one interval; the screen is
/// cleared right before each re-render, never during the wait, which keeps
/// the last table on screen after cancellation.
pub struct RefreshLoop {
    interval: Duration,
    continuous: bool,
}

impl RefreshLoop {
    pub fn new(interval: Duration, continuous: bool) -> Self {
        RefreshLoop {
            interval,
            continuous,
        }
    }

    pub fn run<S, R>(
        &self,
        source: &mut S,
        spec: &ProjectionSpec,
        sink: &mut R,
        cancel: Receiver<()>,
    ) -> Result<(), Error>
    where
        S: SnapshotSource,
        R: RenderSink,
    {
        let snapshot = source.snapshot()?;
        sink.present(&table::project(&snapshot, spec))?;

        if !self.continuous {
            return Ok(());
        }

        loop {
            //Interruptible wait: a cancellation signal (or a dropped sender)
            //ends the loop without starting another collection
            match cancel.recv_timeout(self.interval) {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    debug!("cancellation received, leaving the refresh loop");
                    return Ok(());
                }
                Err(RecvTimeoutError::Timeout) => {}
            }

            let snapshot = source.snapshot()?;
            let projected = table::project(&snapshot, spec);
            sink.clear()?;
            sink.present(&projected)?;
        }
    }
}
