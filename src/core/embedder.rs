//! Writing side of the scheme: turns a message into slot values and stamps
//! them into frames. The extractor never calls this; it exists so synthetic
//! streams can be produced for tests and tooling.

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine as _;

use crate::config::{BYTES_PER_PIXEL, CODE_MODULUS, WATERMARK_LENGTH};
use crate::core::alphabet::code_of;
use crate::core::error::{ExtractError, Result};
use crate::core::sampler::Grid;
use crate::core::watermark::Watermark;

/// Encode a message into a complete watermark, padding unused slots with 0.
pub fn message_to_watermark(message: &[u8]) -> Result<Watermark> {
    let text = STANDARD_NO_PAD.encode(message);
    if text.len() > WATERMARK_LENGTH {
        return Err(ExtractError::MessageTooLong {
            symbols: text.len(),
            capacity: WATERMARK_LENGTH,
        });
    }

    let mut values = [0u8; WATERMARK_LENGTH];
    for (v, c) in values.iter_mut().zip(text.chars()) {
        // STANDARD_NO_PAD only emits alphabet symbols
        *v = code_of(c).unwrap_or(0);
    }
    Ok(Watermark::from_values(values))
}

/// Nudge a pixel so its channel sum is congruent to `value` mod 64, changing it as little as possible.
pub fn tamper_pixel(px: [u8; 3], value: u8) -> [u8; 3] {
    let modulus = CODE_MODULUS as i32;
    let target = (value as i32) % modulus;
    let sum: i32 = px.iter().map(|&c| c as i32).sum();

    let mut shifts: Vec<i32> = (-(modulus - 1)..modulus)
        .filter(|x| sum + x >= 0 && (sum + x) % modulus == target)
        .collect();
    if shifts.contains(&0) {
        return px;
    }
    shifts.sort_by_key(|x| x.abs());

    shifts
        .into_iter()
        .find_map(|shift| spread_shift(px, shift))
        .unwrap_or(px)
}

// Split a shift across channels; a channel that would leave 0..=255 is kept
// as is and the shift is redistributed over the rest.
fn spread_shift(px: [u8; 3], shift: i32) -> Option<[u8; 3]> {
    let mut locked = [false; 3];
    let mut div = 3;

    'retry: loop {
        let quotient = shift / div;
        let mut remainder = shift % div;
        let mut out = px;

        for k in 0..3 {
            if locked[k] {
                continue;
            }
            let v = px[k] as i32 + quotient + remainder;
            remainder = 0;
            if !(0..=255).contains(&v) {
                locked[k] = true;
                div -= 1;
                if div == 0 {
                    return None;
                }
                continue 'retry;
            }
            out[k] = v as u8;
        }
        return Some(out);
    }
}

/// Write one slot into a frame: `position` into the position grid, `value` into the payload grid.
pub fn stamp_frame(frame: &mut [u8], grid: &Grid, position: u8, value: u8) {
    for cell in grid.cells() {
        stamp_pixel(frame, cell.position, position);
        stamp_pixel(frame, cell.payload, value);
    }
}

fn stamp_pixel(frame: &mut [u8], offset: usize, value: u8) {
    if let Some(px) = frame.get_mut(offset..offset + BYTES_PER_PIXEL) {
        let out = tamper_pixel([px[0], px[1], px[2]], value);
        px.copy_from_slice(&out);
    }
}
