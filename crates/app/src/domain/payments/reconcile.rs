//! Transaction status mapping and webhook signatures.

use sha2::{Digest, Sha512};

use crate::domain::orders::records::{OrderStatus, OrderUuid};

/// Attempts made when the gateway keeps refusing the transaction id.
pub const MAX_TOKEN_ATTEMPTS: usize = 3;

/// Order status implied by a gateway transaction, or `None` to leave the
/// order as it is. A missing fraud status counts as `accept`.
#[must_use]
pub fn reconcile(transaction_status: &str, fraud_status: Option<&str>) -> Option<OrderStatus> {
    match transaction_status {
        "capture" => (fraud_status.unwrap_or("accept") == "accept").then_some(OrderStatus::Paid),
        "settlement" => Some(OrderStatus::Paid),
        "cancel" | "deny" | "expire" => Some(OrderStatus::Cancelled),
        "pending" => Some(OrderStatus::Pending),
        _ => None,
    }
}

/// Lowercase hex SHA-512 over the concatenated notification fields.
#[must_use]
pub fn signature(order_id: &str, status_code: &str, gross_amount: &str, server_key: &str) -> String {
    let digest = Sha512::new()
        .chain_update(order_id)
        .chain_update(status_code)
        .chain_update(gross_amount)
        .chain_update(server_key)
        .finalize();

    format!("{digest:x}")
}

/// Compare a received signature with the expected one without exiting on
/// the first differing byte.
#[must_use]
pub fn signature_matches(expected: &str, received: &str) -> bool {
    if expected.len() != received.len() {
        return false;
    }

    let mut diff: u8 = 0;
    for (x, y) in expected.bytes().zip(received.bytes()) {
        diff |= x ^ y;
    }

    diff == 0
}

/// Transaction id used after the gateway refuses the order's own id.
#[must_use]
pub fn alternate_order_id(order: OrderUuid, unix_seconds: i64) -> String {
    format!("{order}-{unix_seconds}")
}
