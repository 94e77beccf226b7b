/// Standard base64 alphabet, indexed by 6-bit code.
pub const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Symbol the embedder uses to fill unused slots.
pub const FILL_SYMBOL: char = 'A';

/// Character for a 6-bit code. Only the low 6 bits are used.
pub fn symbol(code: u8) -> char {
    ALPHABET[(code & 0x3f) as usize] as char
}

/// 6-bit code for a base64 character, if it belongs to the alphabet.
pub fn code_of(symbol: char) -> Option<u8> {
    ALPHABET
        .iter()
        .position(|&b| b as char == symbol)
        .map(|i| i as u8)
}
