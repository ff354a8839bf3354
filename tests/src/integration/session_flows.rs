//! # Session Flows
//!
//! Real WebSocket sessions against [`MockNode`](crate::support::MockNode):
//!
//! 1. **Handshake**: uid negotiation, silent and misbehaving nodes
//! 2. **Routing**: multicast, per-address isolation, bounded queues
//! 3. **Unsubscribe**: control messages only when a channel empties
//! 4. **Termination**: node close and caller close reach every reader once

#[cfg(test)]
mod tests {
    use crate::support::fixtures::{ADDRESS, OTHER_ADDRESS, UID};
    use crate::support::{Greeting, MockNode};
    use ll_01_address::{decode, Address};
    use ll_02_realtime::{
        ConnectionSession, Notification, RealtimeConfig, RealtimeError, RecvError, Subscription,
    };
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const WAIT: Duration = Duration::from_secs(5);

    fn hash(n: u64) -> String {
        format!("{:064X}", n)
    }

    fn address() -> Address {
        decode(ADDRESS).unwrap()
    }

    fn other_address() -> Address {
        decode(OTHER_ADDRESS).unwrap()
    }

    async fn open(node: &MockNode) -> ConnectionSession {
        ConnectionSession::open(&RealtimeConfig::with_endpoint(node.url()))
            .await
            .expect("session should open")
    }

    async fn next(subscription: &Subscription) -> Notification {
        timeout(WAIT, subscription.recv())
            .await
            .expect("timed out waiting for notification")
            .expect("subscription ended unexpectedly")
    }

    async fn eventually(mut condition: impl FnMut() -> bool) {
        let deadline = tokio::time::Instant::now() + WAIT;
        while !condition() {
            assert!(tokio::time::Instant::now() < deadline, "condition not met in time");
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    fn block_height(notification: &Notification) -> u64 {
        match notification {
            Notification::Block(block) => block.height,
            other => panic!("expected block, got {:?}", other),
        }
    }

    // =============================================================================
    // HANDSHAKE
    // =============================================================================

    #[tokio::test]
    async fn test_handshake_negotiates_uid() {
        let node = MockNode::start().await;
        let session = open(&node).await;

        assert_eq!(session.uid(), UID);
        assert_eq!(session.endpoint(), node.url());
        assert!(!session.is_terminated());
        assert_eq!(node.connections(), 1);

        session.close().await;
    }

    #[tokio::test]
    async fn test_silent_node_times_out() {
        let node = MockNode::start_with(Greeting::Silent).await;
        let config = RealtimeConfig {
            handshake_timeout: Duration::from_millis(200),
            ..RealtimeConfig::with_endpoint(node.url())
        };

        let result = ConnectionSession::open(&config).await;
        assert!(matches!(result, Err(RealtimeError::Handshake(_))));
    }

    #[tokio::test]
    async fn test_garbage_greeting_rejected() {
        let node = MockNode::start_with(Greeting::Raw("hello there".into())).await;
        let result = ConnectionSession::open(&RealtimeConfig::with_endpoint(node.url())).await;
        assert!(matches!(result, Err(RealtimeError::Handshake(_))));
    }

    #[tokio::test]
    async fn test_notification_before_uid_rejected() {
        let greeting = json!({ "topic": "block", "data": { "height": 1 } }).to_string();
        let node = MockNode::start_with(Greeting::Raw(greeting)).await;
        let result = ConnectionSession::open(&RealtimeConfig::with_endpoint(node.url())).await;
        assert!(matches!(result, Err(RealtimeError::Handshake(_))));
    }

    #[tokio::test]
    async fn test_unreachable_node() {
        let result = ConnectionSession::open(&RealtimeConfig::with_endpoint("ws://127.0.0.1:9/ws")).await;
        assert!(matches!(result, Err(RealtimeError::Connection(_))));
    }

    #[tokio::test]
    async fn test_invalid_endpoint_rejected_before_connecting() {
        let result = ConnectionSession::open(&RealtimeConfig::with_endpoint("http://127.0.0.1:3000")).await;
        assert!(matches!(result, Err(RealtimeError::Config(_))));
    }

    // =============================================================================
    // ROUTING
    // =============================================================================

    #[tokio::test]
    async fn test_subscribe_sends_control_and_receives() {
        let node = MockNode::start().await;
        let session = open(&node).await;

        let blocks = session.block().await.unwrap();
        let controls = node.wait_for_controls(1).await;
        assert_eq!(controls[0], json!({ "uid": UID, "subscribe": "block" }));

        node.publish("block", json!({ "height": 17, "numTransactions": 2 }));
        assert_eq!(block_height(&next(&blocks).await), 17);

        session.close().await;
    }

    #[tokio::test]
    async fn test_multicast_to_every_subscriber_on_channel() {
        let node = MockNode::start().await;
        let session = open(&node).await;

        let first = session.confirmed_added(&address()).await.unwrap();
        let second = session.confirmed_added(&address()).await.unwrap();
        assert_ne!(first.id(), second.id());
        assert_eq!(session.subscription_count(), 2);
        assert_eq!(session.registry().subscribers(first.channel()), 2);

        node.publish(
            &format!("confirmedAdded/{}", ADDRESS),
            json!({ "hash": hash(1), "height": 10 }),
        );

        for subscription in [&first, &second] {
            let notification = next(subscription).await;
            assert_eq!(notification.transaction_hash().unwrap().to_hex(), hash(1));
        }

        session.close().await;
    }

    #[tokio::test]
    async fn test_addresses_are_isolated() {
        let node = MockNode::start().await;
        let session = open(&node).await;

        let mine = session.confirmed_added(&address()).await.unwrap();
        let theirs = session.confirmed_added(&other_address()).await.unwrap();

        node.publish(&format!("confirmedAdded/{}", ADDRESS), json!({ "hash": hash(1) }));
        node.publish(&format!("confirmedAdded/{}", OTHER_ADDRESS), json!({ "hash": hash(2) }));

        assert_eq!(next(&mine).await.transaction_hash().unwrap().to_hex(), hash(1));
        // FIFO: had the first frame leaked here it would be read first.
        assert_eq!(next(&theirs).await.transaction_hash().unwrap().to_hex(), hash(2));

        session.close().await;
    }

    #[tokio::test]
    async fn test_status_rejection_delivered_without_ending_session() {
        let node = MockNode::start().await;
        let session = open(&node).await;
        let statuses = session.status(&address()).await.unwrap();

        node.publish(
            &format!("status/{}", ADDRESS),
            json!({ "hash": hash(9), "status": "Failure_Core_Insufficient_Balance" }),
        );

        match next(&statuses).await {
            Notification::Status(status) => {
                assert_eq!(status.status, "Failure_Core_Insufficient_Balance");
            }
            other => panic!("expected status, got {:?}", other),
        }
        assert!(!session.is_terminated());

        session.close().await;
    }

    #[tokio::test]
    async fn test_undecodable_frames_are_skipped() {
        let node = MockNode::start().await;
        let session = open(&node).await;
        let blocks = session.block().await.unwrap();

        node.send_raw("definitely not json");
        node.publish("harvest", json!({}));
        node.publish("block", json!({ "height": "tall" }));
        node.publish("block", json!({ "height": 3 }));

        assert_eq!(block_height(&next(&blocks).await), 3);
        let metrics = session.metrics();
        assert_eq!(metrics.decode_errors, 3);
        assert_eq!(metrics.frames_routed, 1);
        assert!(!session.is_terminated());

        session.close().await;
    }

    #[tokio::test]
    async fn test_unmatched_notifications_are_counted() {
        let node = MockNode::start().await;
        let session = open(&node).await;
        let blocks = session.block().await.unwrap();

        node.publish(&format!("unconfirmedAdded/{}", ADDRESS), json!({ "hash": hash(1) }));
        node.publish("block", json!({ "height": 1 }));

        next(&blocks).await;
        assert_eq!(session.metrics().frames_unmatched, 1);

        session.close().await;
    }

    #[tokio::test]
    async fn test_full_queue_drops_oldest() {
        let node = MockNode::start().await;
        let config = RealtimeConfig {
            queue_capacity: 2,
            ..RealtimeConfig::with_endpoint(node.url())
        };
        let session = ConnectionSession::open(&config).await.unwrap();
        let blocks = session.block().await.unwrap();

        for height in 1..=5 {
            node.publish("block", json!({ "height": height }));
        }
        eventually(|| session.metrics().frames_received >= 5).await;

        assert_eq!(blocks.pending(), 2);
        assert_eq!(blocks.overflow_count(), 3);
        assert_eq!(session.metrics().overflow_drops, 3);
        assert_eq!(block_height(&blocks.try_recv().unwrap().unwrap()), 4);
        assert_eq!(block_height(&blocks.try_recv().unwrap().unwrap()), 5);
        assert_eq!(blocks.try_recv(), Ok(None));

        session.close().await;
    }

    // =============================================================================
    // UNSUBSCRIBE
    // =============================================================================

    #[tokio::test]
    async fn test_unsubscribe_control_only_when_channel_empties() {
        let node = MockNode::start().await;
        let session = open(&node).await;

        let first = session.block().await.unwrap();
        let second = session.block().await.unwrap();

        session.unsubscribe(&first).await.unwrap();
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());

        second.unsubscribe().await.unwrap();

        let controls = node.wait_for_controls(3).await;
        assert_eq!(
            controls,
            vec![
                json!({ "uid": UID, "subscribe": "block" }),
                json!({ "uid": UID, "subscribe": "block" }),
                json!({ "uid": UID, "unsubscribe": "block" }),
            ]
        );
        assert_eq!(session.subscription_count(), 0);

        session.close().await;
    }

    #[tokio::test]
    async fn test_unsubscribe_is_idempotent() {
        let node = MockNode::start().await;
        let session = open(&node).await;
        let blocks = session.block().await.unwrap();

        blocks.unsubscribe().await.unwrap();
        blocks.unsubscribe().await.unwrap();
        session.unsubscribe(&blocks).await.unwrap();

        let controls = node.wait_for_controls(2).await;
        assert_eq!(controls.len(), 2);
        assert_eq!(session.metrics().control_messages_sent, 2);

        session.close().await;
    }

    #[tokio::test]
    async fn test_queued_items_drain_after_unsubscribe() {
        let node = MockNode::start().await;
        let session = open(&node).await;
        let blocks = session.block().await.unwrap();

        node.publish("block", json!({ "height": 8 }));
        eventually(|| blocks.pending() == 1).await;

        blocks.unsubscribe().await.unwrap();
        assert_eq!(block_height(&next(&blocks).await), 8);
        assert_eq!(blocks.recv().await, Err(RecvError::Unsubscribed));

        session.close().await;
    }

    #[tokio::test]
    async fn test_consumer_can_unsubscribe_itself() {
        let node = MockNode::start().await;
        let session = open(&node).await;
        let blocks = session.block().await.unwrap();

        node.publish("block", json!({ "height": 1 }));
        node.publish("block", json!({ "height": 2 }));
        eventually(|| blocks.pending() == 2).await;

        let consumer = tokio::spawn(async move {
            let mut heights = Vec::new();
            loop {
                match blocks.recv().await {
                    Ok(notification) => {
                        heights.push(block_height(&notification));
                        blocks.unsubscribe().await?;
                    }
                    Err(end) => return Ok::<_, RealtimeError>((heights, end)),
                }
            }
        });

        let (heights, end) = timeout(WAIT, consumer)
            .await
            .expect("consumer stuck after unsubscribing itself")
            .unwrap()
            .unwrap();
        assert_eq!(heights, vec![1, 2]);
        assert_eq!(end, RecvError::Unsubscribed);

        let controls = node.wait_for_controls(2).await;
        assert_eq!(controls[1], json!({ "uid": UID, "unsubscribe": "block" }));

        session.close().await;
    }

    // =============================================================================
    // TERMINATION
    // =============================================================================

    #[tokio::test]
    async fn test_node_close_terminates_every_subscription() {
        let node = MockNode::start().await;
        let session = open(&node).await;
        let blocks = session.block().await.unwrap();
        let confirmed = session.confirmed_added(&address()).await.unwrap();

        node.close_connections();

        for subscription in [&blocks, &confirmed] {
            let result = timeout(WAIT, subscription.recv()).await.unwrap();
            assert!(matches!(result, Err(RecvError::SessionTerminated { .. })));
            assert_eq!(subscription.recv().await, Err(RecvError::Closed));
            assert!(subscription.is_cancelled());
        }

        assert!(session.is_terminated());
        assert!(session.termination_reason().is_some());
        assert!(matches!(
            session.block().await,
            Err(RealtimeError::SessionTerminated { .. })
        ));
    }

    #[tokio::test]
    async fn test_close_signals_each_subscription_exactly_once() {
        let node = MockNode::start().await;
        let session = open(&node).await;
        let blocks = Arc::new(session.block().await.unwrap());

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let blocks = blocks.clone();
                tokio::spawn(async move { blocks.recv().await })
            })
            .collect();
        tokio::time::sleep(Duration::from_millis(20)).await;

        session.close().await;
        session.close().await;

        let mut terminated = 0;
        for reader in readers {
            match timeout(WAIT, reader).await.unwrap().unwrap() {
                Err(RecvError::SessionTerminated { reason }) => {
                    assert_eq!(reason, "session closed");
                    terminated += 1;
                }
                Err(RecvError::Closed) => {}
                other => panic!("unexpected read result: {:?}", other),
            }
        }
        assert_eq!(terminated, 1);
        assert_eq!(session.termination_reason().as_deref(), Some("session closed"));
    }

    #[tokio::test]
    async fn test_dropping_session_ends_subscriptions() {
        let node = MockNode::start().await;
        let session = open(&node).await;
        let blocks = session.block().await.unwrap();

        drop(session);

        assert!(matches!(
            blocks.recv().await,
            Err(RecvError::SessionTerminated { .. })
        ));
        // The session is gone; unsubscribing is still safe.
        blocks.unsubscribe().await.unwrap();
    }
}
