//! Human-readable notification lines.

use ll_02_realtime::{Channel, Notification};

/// One line describing `notification` received on `channel`.
pub fn describe(channel: &Channel, notification: &Notification) -> String {
    let body = match notification {
        Notification::Transaction(tx) => {
            let mut line = format!("tx {}", tx.hash);
            if let Some(kind) = tx.transaction_type {
                line.push_str(&format!(" type=0x{:04X}", kind));
            }
            if let Some(height) = tx.height {
                line.push_str(&format!(" height={}", height));
            }
            line
        }
        Notification::TransactionRemoved(hash) => format!("removed {}", hash),
        Notification::Status(status) => format!("status {} {}", status.hash, status.status),
        Notification::Block(block) => {
            let mut line = format!("block height={}", block.height);
            if let Some(count) = block.num_transactions {
                line.push_str(&format!(" txs={}", count));
            }
            line
        }
        Notification::Cosignature(cosig) => {
            format!("cosignature parent={} signer={}", cosig.parent_hash, cosig.signer)
        }
    };
    format!("[{}] {}", channel.topic(), body)
}
