//! Minimal ABI helpers for metadata probes
//!
//! The prober only ever calls zero-argument view functions plus
//! supportsInterface(bytes4), and only needs to decode four return
//! shapes (string, uint, address, bool). Hand-rolled hex handling is
//! enough - no typed contract bindings required.

use alloy_primitives::{Address, U256};

/// Build calldata for a zero-argument function call
pub fn encode_call(selector: &str) -> String {
    format!("0x{}", selector)
}

/// Build calldata for supportsInterface(bytes4)
pub fn encode_supports_interface(interface_id: &str) -> String {
    // bytes4 argument is left-aligned in its 32-byte word
    format!(
        "0x{}{}{}",
        crate::utils::constants::SELECTOR_SUPPORTS_INTERFACE,
        interface_id,
        "0".repeat(56)
    )
}

/// Strip the 0x prefix and reject non-hex payloads
fn clean_hex(data: &str) -> Option<&str> {
    let hex_str = data.strip_prefix("0x").unwrap_or(data);
    if hex_str.is_empty() || !hex_str.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(hex_str)
}

/// Decode an ABI-encoded string return value.
///
/// Handles both the standard dynamic encoding (offset + length + bytes)
/// and the legacy bytes32 encoding some old tokens (e.g. MKR) use.
pub fn decode_string(data: &str) -> Option<String> {
    let hex_str = clean_hex(data)?;
    let bytes = hex::decode(hex_str).ok()?;

    if bytes.is_empty() {
        return None;
    }

    // Legacy bytes32: a single word holding the raw string, null padded
    if bytes.len() == 32 {
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(32);
        let s = String::from_utf8(bytes[..end].to_vec()).ok()?;
        return if s.is_empty() { None } else { Some(s) };
    }

    // Standard dynamic encoding: [offset][length][bytes...]
    // Offset and length words come straight off the wire, so all index
    // arithmetic must be overflow-checked.
    if bytes.len() < 64 {
        return None;
    }
    let offset: usize = U256::from_be_slice(&bytes[..32]).try_into().ok()?;
    let data_start = offset.checked_add(32)?;
    if data_start > bytes.len() {
        return None;
    }
    let len: usize = U256::from_be_slice(&bytes[offset..data_start]).try_into().ok()?;
    let data_end = data_start.checked_add(len)?;
    if data_end > bytes.len() {
        return None;
    }
    let s = String::from_utf8(bytes[data_start..data_end].to_vec()).ok()?;
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Decode a uint256 return value
pub fn decode_uint(data: &str) -> Option<U256> {
    let hex_str = clean_hex(data)?;
    let bytes = hex::decode(hex_str).ok()?;
    if bytes.is_empty() || bytes.len() > 32 {
        return None;
    }
    Some(U256::from_be_slice(&bytes))
}

/// Decode an address return value (right-aligned in a 32-byte word)
pub fn decode_address(data: &str) -> Option<Address> {
    let hex_str = clean_hex(data)?;
    let bytes = hex::decode(hex_str).ok()?;
    if bytes.len() != 32 {
        return None;
    }
    // Upper 12 bytes must be zero for a sane address word
    if bytes[..12].iter().any(|&b| b != 0) {
        return None;
    }
    let addr = Address::from_slice(&bytes[12..]);
    if addr == Address::ZERO {
        None
    } else {
        Some(addr)
    }
}

/// Decode a bool return value
pub fn decode_bool(data: &str) -> Option<bool> {
    decode_uint(data).map(|v| !v.is_zero())
}

/// Extract an address from a raw storage word (proxy slots)
pub fn storage_word_to_address(word: &str) -> Option<Address> {
    decode_address(word)
}
