use std::sync::{Mutex, MutexGuard};

use rbw_types::{BlockRecord, SectorKey, BLOCK_WIDTH};
use tracing::{debug, info, warn};

use crate::batch::{BatchReport, BlockOutcome};
use crate::driver::CardDriver;
use crate::error::{CardError, CardResult};

/// Where a reader session stands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connected { reader: String },
}

#[derive(Debug)]
struct Session<D> {
    driver: D,
    state: SessionState,
}

/// A reader session over a [`CardDriver`].
///
/// The driver sits behind a mutex, so a `CardReader` can be shared between
/// callers while each driver call (and each whole write batch) runs alone.
/// There is at most one open session per reader; dropping the reader
/// closes it.
#[derive(Debug)]
pub struct CardReader<D: CardDriver> {
    session: Mutex<Session<D>>,
}

impl<D: CardDriver> CardReader<D> {
    pub fn new(driver: D) -> Self {
        Self {
            session: Mutex::new(Session {
                driver,
                state: SessionState::Disconnected,
            }),
        }
    }

    fn lock(&self) -> CardResult<MutexGuard<'_, Session<D>>> {
        self.session.lock().map_err(|_| CardError::Poisoned)
    }

    pub fn state(&self) -> CardResult<SessionState> {
        Ok(self.lock()?.state.clone())
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.state(), Ok(SessionState::Connected { .. }))
    }

    /// Names of the readers the driver can see.
    pub fn list_readers(&self) -> CardResult<Vec<String>> {
        let mut session = self.lock()?;
        session.driver.list_readers().map_err(CardError::ListReaders)
    }

    /// Open a session with `reader`.
    ///
    /// An open session is closed first. On failure the driver is cleaned up
    /// and the reader stays disconnected.
    pub fn connect(&self, reader: &str) -> CardResult<()> {
        let mut session = self.lock()?;
        if let SessionState::Connected { reader: current } = &session.state {
            debug!(reader = %current, "closing open session before reconnect");
            session.driver.cleanup();
            session.state = SessionState::Disconnected;
        }

        match session.driver.connect(reader) {
            Ok(()) => {
                info!(reader, "reader connected");
                session.state = SessionState::Connected {
                    reader: reader.to_string(),
                };
                Ok(())
            }
            Err(source) => {
                warn!(reader, error = %source, "reader connect failed");
                session.driver.cleanup();
                Err(CardError::Connect {
                    reader: reader.to_string(),
                    source,
                })
            }
        }
    }

    /// Close the session. Does nothing if none is open; never fails.
    pub fn disconnect(&self) {
        let mut session = match self.session.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        close(&mut session);
    }

    /// Authenticate `block` with `key` and write `payload` to it.
    pub fn write_block(&self, key: &SectorKey, block: u32, payload: &[u8]) -> CardResult<()> {
        let mut session = self.lock()?;
        write_one(&mut session, key, block, payload)
    }

    /// Authenticate `block` with `key` and read its raw contents.
    pub fn read_block(&self, key: &SectorKey, block: u32) -> CardResult<Vec<u8>> {
        let mut session = self.lock()?;
        require_connected(&session)?;
        let data = session
            .driver
            .read_block(key, block)
            .map_err(|source| CardError::Read { block, source })?;
        debug!(block, len = data.len(), "block read");
        Ok(data)
    }

    /// Write `records` in order, stopping at the first failure.
    ///
    /// Fails up front with [`CardError::NotConnected`] if no session is open.
    /// Otherwise every record gets an outcome in the report: written, the
    /// one that failed, and skipped for the rest. Nothing is retried and
    /// blocks already written are left as they are.
    pub fn write_records(
        &self,
        key: &SectorKey,
        records: &[BlockRecord],
    ) -> CardResult<BatchReport> {
        let mut session = self.lock()?;
        require_connected(&session)?;

        let mut report = BatchReport::new();
        for record in records {
            if report.failure.is_some() {
                report.outcomes.push(BlockOutcome::skipped(record.index));
                continue;
            }
            match write_one(&mut session, key, record.index, &record.payload) {
                Ok(()) => report.outcomes.push(BlockOutcome::written(record.index)),
                Err(err) => {
                    warn!(block = record.index, error = %err, "batch stopped");
                    report.outcomes.push(BlockOutcome::failed(record.index, &err));
                    report.failure = Some(err);
                }
            }
        }
        info!(
            planned = report.planned(),
            written = report.written().len(),
            complete = report.is_complete(),
            "write batch finished"
        );
        Ok(report)
    }

    /// Run `f` against the driver, e.g. to inspect a simulated card.
    pub fn with_driver<R>(&self, f: impl FnOnce(&D) -> R) -> CardResult<R> {
        let session = self.lock()?;
        Ok(f(&session.driver))
    }
}

impl<D: CardDriver> Drop for CardReader<D> {
    fn drop(&mut self) {
        let session = match self.session.get_mut() {
            Ok(session) => session,
            Err(poisoned) => poisoned.into_inner(),
        };
        close(session);
    }
}

fn require_connected<D>(session: &Session<D>) -> CardResult<()> {
    match session.state {
        SessionState::Connected { .. } => Ok(()),
        SessionState::Disconnected => Err(CardError::NotConnected),
    }
}

fn write_one<D: CardDriver>(
    session: &mut Session<D>,
    key: &SectorKey,
    block: u32,
    payload: &[u8],
) -> CardResult<()> {
    require_connected(session)?;
    if payload.len() > BLOCK_WIDTH {
        return Err(CardError::PayloadTooLong {
            block,
            len: payload.len(),
            max: BLOCK_WIDTH,
        });
    }
    session
        .driver
        .write_block(key, block, payload)
        .map_err(|source| CardError::Write { block, source })?;
    debug!(block, len = payload.len(), "block written");
    Ok(())
}

fn close<D: CardDriver>(session: &mut Session<D>) {
    if let SessionState::Connected { reader } = &session.state {
        info!(reader = %reader, "reader disconnected");
        session.driver.cleanup();
        session.state = SessionState::Disconnected;
    }
}
