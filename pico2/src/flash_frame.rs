//! Framing of the configuration snapshot in its flash sector.
//!
//! Layout: payload length as little-endian `u16`, its bitwise complement,
//! then the payload. Erased flash (all `0xFF`) fails the complement check and
//! reads as blank.

use gauge_common::config::SNAPSHOT_CAPACITY;

pub const HEADER_LEN: usize = 4;

/// Flash program page size on the RP2350.
pub const PAGE_SIZE: usize = 256;

/// Bytes written per save, padded to whole pages.
pub const FRAME_CAPACITY: usize = (HEADER_LEN + SNAPSHOT_CAPACITY).next_multiple_of(PAGE_SIZE);

const _: () = assert!(SNAPSHOT_CAPACITY <= u16::MAX as usize);

/// Wrap `payload` into `out`, padding with `0xFF`. Returns `None` when it
/// does not fit.
pub fn write_frame(
    payload: &[u8],
    out: &mut [u8; FRAME_CAPACITY],
) -> Option<()> {
    if payload.len() > SNAPSHOT_CAPACITY {
        return None;
    }
    let len = payload.len() as u16;
    out.fill(0xFF);
    out[..2].copy_from_slice(&len.to_le_bytes());
    out[2..HEADER_LEN].copy_from_slice(&(!len).to_le_bytes());
    out[HEADER_LEN..HEADER_LEN + payload.len()].copy_from_slice(payload);
    Some(())
}

/// The payload stored in `frame`, or `None` for erased or damaged headers.
pub fn read_frame(frame: &[u8]) -> Option<&[u8]> {
    let header = frame.get(..HEADER_LEN)?;
    let len = u16::from_le_bytes([header[0], header[1]]);
    let check = u16::from_le_bytes([header[2], header[3]]);
    if check != !len || len as usize > SNAPSHOT_CAPACITY {
        return None;
    }
    frame.get(HEADER_LEN..HEADER_LEN + len as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_is_page_aligned() {
        assert_eq!(FRAME_CAPACITY % PAGE_SIZE, 0);
        assert!(FRAME_CAPACITY >= HEADER_LEN + SNAPSHOT_CAPACITY);
    }

    #[test]
    fn test_payload_round_trip() {
        let mut frame = [0u8; FRAME_CAPACITY];
        write_frame(b"gauge", &mut frame).unwrap();
        assert_eq!(read_frame(&frame), Some(&b"gauge"[..]));
        assert_eq!(frame[HEADER_LEN + 5], 0xFF);
    }

    #[test]
    fn test_erased_flash_is_blank() {
        assert_eq!(read_frame(&[0xFF; FRAME_CAPACITY]), None);
    }

    #[test]
    fn test_zeroed_flash_is_blank() {
        assert_eq!(read_frame(&[0x00; FRAME_CAPACITY]), None);
    }

    #[test]
    fn test_oversized_payload_rejected() {
        let mut frame = [0u8; FRAME_CAPACITY];
        assert!(write_frame(&[1u8; SNAPSHOT_CAPACITY + 1], &mut frame).is_none());
    }

    #[test]
    fn test_short_input_rejected() {
        assert_eq!(read_frame(&[0x01, 0x00]), None);
    }
}
