use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;

use crate::core::alphabet::{symbol, FILL_SYMBOL};
use crate::core::error::{ExtractError, Result};
use crate::core::watermark::Watermark;

// The embedder strips '=' before writing, and a stripped fill run can leave
// partial trailing bits behind.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Base64 text carried by a complete watermark, fill symbols removed.
pub fn watermark_text(watermark: &Watermark) -> Result<String> {
    let values = watermark.values().ok_or(ExtractError::Incomplete {
        filled: watermark.filled(),
        total: watermark.capacity(),
    })?;
    let text: String = values.iter().map(|&v| symbol(v)).collect();
    Ok(text.trim_end_matches(FILL_SYMBOL).to_string())
}

/// Decode a complete watermark into the embedded message bytes.
pub fn decode_message(watermark: &Watermark) -> Result<Vec<u8>> {
    let text = watermark_text(watermark)?;
    Ok(LENIENT.decode(text.as_bytes())?)
}
