// ABOUTME: Shared utility functions
// ABOUTME: Document id generation and placeholder references

use chrono::Utc;
use rand::Rng;

/// Prefix of customer ids synthesized when a deal is created without one
pub const PLACEHOLDER_CUSTOMER_PREFIX: &str = "temp-customer-";

const DOCUMENT_ID_LEN: usize = 20;

/// Generate an opaque document id (20 alphanumeric characters)
pub fn generate_document_id() -> String {
    const CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    (0..DOCUMENT_ID_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Customer id for a deal whose customer is not yet synced
pub fn placeholder_customer_id() -> String {
    format!(
        "{}{}",
        PLACEHOLDER_CUSTOMER_PREFIX,
        Utc::now().timestamp_millis()
    )
}
