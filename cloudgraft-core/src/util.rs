//! Small naming utilities.

use sha1::{Digest, Sha1};
use std::fmt::Write;

/// First eight lowercase hex characters of the SHA-1 of `input`.
///
/// Used to suffix derived logical names so that two resources wired from
/// the same parent stay distinct and deterministic across runs.
pub fn sha1hash(input: &str) -> String {
    let digest = Sha1::digest(input.as_bytes());
    let mut out = String::with_capacity(8);
    for byte in digest.iter().take(4) {
        let _ = write!(out, "{byte:02x}");
    }
    out
}
