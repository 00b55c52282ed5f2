use std::fmt::Write as _;

use chrono::Utc;
use rand::RngCore;

/// Generate a 24-character lowercase hex document id: a 4-byte unix timestamp
/// prefix (so ids sort roughly by creation time) followed by 8 random bytes.
pub fn generate() -> String {
    let mut bytes = [0u8; 12];
    let ts = (Utc::now().timestamp() as u32).to_be_bytes();
    bytes[..4].copy_from_slice(&ts);
    rand::thread_rng().fill_bytes(&mut bytes[4..]);

    let mut id = String::with_capacity(24);
    for byte in bytes {
        // Writing to a String cannot fail.
        let _ = write!(id, "{:02x}", byte);
    }
    id
}
