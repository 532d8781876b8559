//! Cursor-based pagination for the candidate listing.

use serde::Deserialize;

use crate::RpcError;

/// Default page size when `count` is not specified.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Maximum allowed page size.
pub const MAX_PAGE_SIZE: u32 = 500;

/// Query parameters accepted by list endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationParams {
    /// Opaque cursor from a previous response.
    pub cursor: Option<String>,
    /// Number of items per page (default 50, max 500).
    pub count: Option<u32>,
}

impl PaginationParams {
    /// Effective page size, clamped to [1, MAX_PAGE_SIZE].
    pub fn effective_count(&self) -> u32 {
        self.count
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Offset the cursor points at; `0` without a cursor. A cursor this
    /// server did not issue is a bad request.
    pub fn offset(&self) -> Result<u64, RpcError> {
        match self.cursor.as_deref() {
            None | Some("") => Ok(0),
            Some(c) => decode_cursor(c)
                .ok_or_else(|| RpcError::BadRequest(format!("invalid cursor: {c}"))),
        }
    }
}

/// Encode an offset as an opaque cursor (base64 of its decimal form).
pub fn encode_cursor(offset: u64) -> String {
    base64_encode(offset.to_string().as_bytes())
}

pub fn decode_cursor(cursor: &str) -> Option<u64> {
    let bytes = base64_decode(cursor)?;
    std::str::from_utf8(&bytes).ok()?.parse().ok()
}

/// Cursor for the page after one that started at `offset` and returned
/// `returned` items. `None` once a short page signals the end.
pub fn next_cursor(offset: u64, returned: usize, page_size: u32) -> Option<String> {
    if returned < page_size as usize {
        None
    } else {
        Some(encode_cursor(offset + returned as u64))
    }
}

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

fn base64_encode(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len().div_ceil(3) * 4);
    for chunk in data.chunks(3) {
        let b = [
            chunk[0],
            chunk.get(1).copied().unwrap_or(0),
            chunk.get(2).copied().unwrap_or(0),
        ];
        let triple = u32::from_be_bytes([0, b[0], b[1], b[2]]);
        for i in 0..4 {
            if i <= chunk.len() {
                out.push(ALPHABET[((triple >> (18 - 6 * i)) & 0x3F) as usize] as char);
            } else {
                out.push('=');
            }
        }
    }
    out
}

fn base64_decode(input: &str) -> Option<Vec<u8>> {
    let digits: Vec<u32> = input
        .trim_end_matches('=')
        .bytes()
        .map(|c| ALPHABET.iter().position(|&a| a == c).map(|p| p as u32))
        .collect::<Option<_>>()?;
    let mut out = Vec::with_capacity(digits.len() * 3 / 4);
    for chunk in digits.chunks(4) {
        if chunk.len() < 2 {
            return None;
        }
        let accum = chunk
            .iter()
            .enumerate()
            .fold(0u32, |acc, (i, d)| acc | (d << (18 - 6 * i)));
        let bytes = accum.to_be_bytes();
        out.extend_from_slice(&bytes[1..chunk.len()]);
    }
    Some(out)
}
