//! PC/SC card driver.
//!
//! Each block operation loads the key into the reader's volatile slot,
//! authenticates the block as key A, then reads or updates it. See
//! [`crate::apdu`] for the command layouts.

use std::ffi::CString;

use pcsc::{Card, Context, Disposition, Protocols, Scope, ShareMode, MAX_BUFFER_SIZE};
use rbw_types::SectorKey;
use tracing::debug;

use crate::apdu;
use crate::driver::{pad_block, CardDriver};
use crate::error::DriverError;

/// A [`CardDriver`] over the system PC/SC service.
#[derive(Default)]
pub struct PcscDriver {
    context: Option<Context>,
    card: Option<Card>,
}

impl PcscDriver {
    pub fn new() -> Self {
        Self::default()
    }

    fn context(&mut self) -> Result<&Context, DriverError> {
        if self.context.is_none() {
            let ctx = Context::establish(Scope::User).map_err(|e| {
                DriverError::new(format!("Cannot establish context ({e})"))
            })?;
            self.context = Some(ctx);
        }
        self.context
            .as_ref()
            .ok_or_else(|| DriverError::new("Cannot establish context"))
    }

    fn transmit(&self, step: &str, command: &[u8]) -> Result<Vec<u8>, DriverError> {
        let card = self
            .card
            .as_ref()
            .ok_or_else(|| DriverError::new("Not connected to card"))?;
        let mut buf = [0u8; MAX_BUFFER_SIZE];
        let response = card
            .transmit(command, &mut buf)
            .map_err(|e| DriverError::new(format!("{step}: SCardTransmit failed ({e})")))?;
        apdu::check_response(step, response).map(<[u8]>::to_vec)
    }

    fn authenticate(&self, key: &SectorKey, block: u8) -> Result<(), DriverError> {
        self.transmit("load key", &apdu::load_key(key))?;
        self.transmit("authenticate", &apdu::authenticate(block))?;
        Ok(())
    }

    fn disconnect_card(&mut self) {
        if let Some(card) = self.card.take() {
            if let Err((_, e)) = card.disconnect(Disposition::LeaveCard) {
                debug!(error = %e, "card disconnect failed");
            }
        }
    }
}

impl CardDriver for PcscDriver {
    fn connect(&mut self, reader: &str) -> Result<(), DriverError> {
        self.disconnect_card();
        let name = CString::new(reader)
            .map_err(|_| DriverError::new("reader name contains a NUL byte"))?;
        let card = self
            .context()?
            .connect(&name, ShareMode::Shared, Protocols::ANY)
            .map_err(|e| DriverError::new(format!("SCardConnect failed ({e})")))?;
        self.card = Some(card);
        Ok(())
    }

    fn write_block(
        &mut self,
        key: &SectorKey,
        block: u32,
        payload: &[u8],
    ) -> Result<(), DriverError> {
        let address = apdu::block_address(block)?;
        self.authenticate(key, address)?;
        let data = pad_block(payload);
        self.transmit("write", &apdu::update_binary(address, &data))?;
        Ok(())
    }

    fn read_block(&mut self, key: &SectorKey, block: u32) -> Result<Vec<u8>, DriverError> {
        let address = apdu::block_address(block)?;
        self.authenticate(key, address)?;
        self.transmit("read", &apdu::read_binary(address))
    }

    fn cleanup(&mut self) {
        self.disconnect_card();
        if let Some(ctx) = self.context.take() {
            if let Err((_, e)) = ctx.release() {
                debug!(error = %e, "context release failed");
            }
        }
    }

    fn list_readers(&mut self) -> Result<Vec<String>, DriverError> {
        let ctx = self.context()?;
        let len = ctx
            .list_readers_len()
            .map_err(|e| DriverError::new(format!("No readers found ({e})")))?;
        let mut buf = vec![0u8; len];
        let names = ctx
            .list_readers(&mut buf)
            .map_err(|e| DriverError::new(format!("No readers found ({e})")))?
            .map(|name| name.to_string_lossy().into_owned())
            .collect();
        Ok(names)
    }
}
