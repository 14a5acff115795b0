//! Configuration snapshot in the last sector of the on-board flash.

use defmt::{error, warn};
use embassy_rp::Peri;
use embassy_rp::flash::{Blocking, ERASE_SIZE, Flash};
use embassy_rp::peripherals::FLASH;
use gauge_common::StorageError;
use gauge_common::config::SnapshotMedium;
use gauge_pico2::flash_frame::{FRAME_CAPACITY, read_frame, write_frame};

/// Pico 2 on-board QSPI flash.
pub const FLASH_SIZE: usize = 4 * 1024 * 1024;

/// Offset of the sector holding the snapshot.
pub const STORE_OFFSET: u32 = (FLASH_SIZE - ERASE_SIZE) as u32;

const _: () = assert!(FRAME_CAPACITY <= ERASE_SIZE);

pub struct FlashMedium<'d> {
    flash: Flash<'d, FLASH, Blocking, FLASH_SIZE>,
    frame: [u8; FRAME_CAPACITY],
}

impl<'d> FlashMedium<'d> {
    pub fn new(flash: Peri<'d, FLASH>) -> Self {
        Self { flash: Flash::new_blocking(flash), frame: [0xFF; FRAME_CAPACITY] }
    }
}

impl SnapshotMedium for FlashMedium<'_> {
    fn read(
        &mut self,
        buf: &mut [u8],
    ) -> Result<usize, StorageError> {
        if let Err(err) = self.flash.blocking_read(STORE_OFFSET, &mut self.frame) {
            error!("Flash read failed: {}", err);
            return Err(StorageError::Medium);
        }
        let Some(payload) = read_frame(&self.frame) else {
            return Ok(0);
        };
        let Some(dest) = buf.get_mut(..payload.len()) else {
            warn!("Stored snapshot larger than the read buffer");
            return Err(StorageError::Corrupted);
        };
        dest.copy_from_slice(payload);
        Ok(payload.len())
    }

    fn write(
        &mut self,
        bytes: &[u8],
    ) -> Result<(), StorageError> {
        write_frame(bytes, &mut self.frame).ok_or(StorageError::Encode)?;

        self.flash
            .blocking_erase(STORE_OFFSET, STORE_OFFSET + ERASE_SIZE as u32)
            .map_err(|err| {
                error!("Flash erase failed: {}", err);
                StorageError::Medium
            })?;
        self.flash.blocking_write(STORE_OFFSET, &self.frame).map_err(|err| {
            error!("Flash write failed: {}", err);
            StorageError::Medium
        })
    }
}
