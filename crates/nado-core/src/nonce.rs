//! Order nonce generation.
//!
//! Nonces carry the latest time (ms) at which the engine should accept the
//! order in their upper bits, and a small random salt in the low 20 bits.

use chrono::Utc;
use rand::Rng;

/// How long after creation an order may still be received.
pub const DEFAULT_RECV_WINDOW_MS: u64 = 90_000;

const RECV_TIME_SHIFT: u32 = 20;

/// Generate an order nonce.
///
/// `recv_time_ms` defaults to now plus [`DEFAULT_RECV_WINDOW_MS`].
pub fn gen_order_nonce(recv_time_ms: Option<u64>) -> u64 {
    let recv_time_ms = recv_time_ms.unwrap_or_else(|| {
        Utc::now().timestamp_millis().max(0) as u64 + DEFAULT_RECV_WINDOW_MS
    });
    let salt: u64 = rand::rng().random_range(0..=999);
    (recv_time_ms << RECV_TIME_SHIFT) + salt
}

/// Recover the receive deadline (ms) from a nonce.
pub fn order_nonce_recv_time(nonce: u64) -> u64 {
    nonce >> RECV_TIME_SHIFT
}
