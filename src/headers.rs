//! On-demand parsing of raw header blocks
//!
//! Header blocks stay raw on the [`Exchange`]; they are small and queried
//! rarely, so parsing happens per call instead of being cached.

use crate::exchange::Exchange;
use crate::{Result, TabtraceError};

/// Which header block of an exchange to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderSide {
    /// Request headers
    Request,
    /// Response headers
    Response,
}

/// Look up a header by name in the given block of an exchange.
///
/// The raw block is split on newlines; blank lines and HTTP/2 pseudo-headers
/// (lines starting with `:`) are skipped, each remaining line is split on the
/// first colon, and the lookup is case-insensitive. If the header repeats,
/// the first occurrence wins.
///
/// # Errors
///
/// Returns [`TabtraceError::HeaderNotFound`] if no such header exists.
pub fn header_value(exchange: &Exchange, side: HeaderSide, name: &str) -> Result<String> {
    let block = match side {
        HeaderSide::Request => &exchange.request_headers,
        HeaderSide::Response => &exchange.response_headers,
    };

    parse_header_block(block)
        .into_iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value)
        .ok_or_else(|| TabtraceError::HeaderNotFound(name.to_string()))
}

/// Return the request header block with pseudo-header and blank lines
/// stripped and each line trimmed, newline-joined.
///
/// Callers use this to persist a clean header set into external storage.
#[must_use]
pub fn clean_request_headers(exchange: &Exchange) -> String {
    exchange
        .request_headers
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(':'))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse a raw newline-delimited `Key: Value` block into name/value pairs.
///
/// Preserves block order and duplicate names; filtering and lookup policy
/// live in the callers.
fn parse_header_block(block: &str) -> Vec<(String, String)> {
    block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(':'))
        .filter_map(|line| {
            line.split_once(':')
                .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}
