//! Subcommand implementations.

use crate::config::ClientConfig;
use crate::output::describe;
use anyhow::{bail, Context, Result};
use ll_01_address::{normalize_public_key, Address, AddressCodec};
use ll_02_realtime::{Channel, ConnectionSession, Notification, RecvError, Subscription};
use ll_03_announce::{Announcer, HttpAnnouncer};
use shared_types::{NetworkType, SignedTransaction, TransactionHash};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Events forwarded from subscription readers to the command loop.
#[derive(Debug)]
enum WatchEvent {
    Notification(Channel, Notification),
    Ended(Channel, RecvError),
}

/// Forward every notification of `subscription` into `tx` until it ends.
fn forward(subscription: Subscription, tx: mpsc::Sender<WatchEvent>) {
    tokio::spawn(async move {
        let channel = *subscription.channel();
        loop {
            match subscription.recv().await {
                Ok(notification) => {
                    if tx.send(WatchEvent::Notification(channel, notification)).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.send(WatchEvent::Ended(channel, e)).await;
                    break;
                }
            }
        }
    });
}

pub fn address(public_key: &str, network: NetworkType) -> Result<()> {
    let address = AddressCodec::new(network)
        .encode(public_key)
        .context("Failed to derive address")?;
    println!("{}", address);
    println!("{}", address.pretty());
    Ok(())
}

pub fn validate(text: &str) -> Result<()> {
    let address: Address = text.parse().context("Invalid address")?;
    println!("valid {} address {}", address.network(), address);
    Ok(())
}

fn resolve_address(
    config: &ClientConfig,
    public_key: Option<&str>,
    address: Option<&str>,
) -> Result<Address> {
    match (public_key, address) {
        (Some(key), _) => AddressCodec::new(config.network)
            .encode(key)
            .context("Failed to derive address"),
        (None, Some(text)) => text.parse().context("Invalid address"),
        (None, None) => bail!("either --public-key or --address is required"),
    }
}

pub async fn watch(
    config: &ClientConfig,
    public_key: Option<&str>,
    address: Option<&str>,
    block: bool,
) -> Result<()> {
    let address = resolve_address(config, public_key, address)?;

    let session = ConnectionSession::open(&config.realtime)
        .await
        .with_context(|| format!("Failed to open session to {}", config.realtime.endpoint))?;
    info!(uid = %session.uid(), address = %address, "Watching");

    let (tx, mut rx) = mpsc::channel(256);
    forward(session.unconfirmed_added(&address).await?, tx.clone());
    forward(session.confirmed_added(&address).await?, tx.clone());
    forward(session.status(&address).await?, tx.clone());
    if block {
        forward(session.block().await?, tx.clone());
    }
    drop(tx);

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(WatchEvent::Notification(channel, notification)) => {
                    println!("{}", describe(&channel, &notification));
                }
                Some(WatchEvent::Ended(channel, e)) => {
                    warn!(channel = %channel, error = %e, "Subscription ended");
                    if matches!(e, RecvError::SessionTerminated { .. }) {
                        break;
                    }
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    let metrics = session.metrics();
    session.close().await;
    info!(
        received = metrics.frames_received,
        routed = metrics.frames_routed,
        decode_errors = metrics.decode_errors,
        overflow_drops = metrics.overflow_drops,
        "Session closed"
    );
    Ok(())
}

pub struct AnnounceArgs<'a> {
    pub payload: &'a str,
    pub hash: &'a str,
    pub signer: &'a str,
    pub timeout: Duration,
}

pub async fn announce(config: &ClientConfig, args: AnnounceArgs<'_>) -> Result<()> {
    let payload = hex::decode(args.payload.trim()).context("Payload is not hex")?;
    let hash: TransactionHash = args.hash.parse().context("Invalid transaction hash")?;
    let signer = normalize_public_key(args.signer).context("Invalid signer public key")?;
    let signer_address = AddressCodec::new(config.network).encode_bytes(&signer);

    let tx = SignedTransaction::new(payload, hash, signer, config.network);

    // Subscribe before announcing so the outcome cannot be missed.
    let session = ConnectionSession::open(&config.realtime)
        .await
        .with_context(|| format!("Failed to open session to {}", config.realtime.endpoint))?;
    let confirmed = session.confirmed_added(&signer_address).await?;
    let status = session.status(&signer_address).await?;

    let (events_tx, mut events) = mpsc::channel(64);
    forward(confirmed, events_tx.clone());
    forward(status, events_tx);

    let announcer = HttpAnnouncer::new(&config.announce)?;
    let receipt = announcer.announce(&tx).await.context("Announce failed")?;
    println!("announced {} ({}): {}", receipt.hash, receipt.status_code, receipt.message);

    let outcome = tokio::time::timeout(args.timeout, async {
        while let Some(event) = events.recv().await {
            match event {
                WatchEvent::Notification(channel, notification)
                    if notification.transaction_hash() == Some(&hash) =>
                {
                    return Ok(describe(&channel, &notification));
                }
                WatchEvent::Notification(..) => {}
                WatchEvent::Ended(channel, e) => {
                    if matches!(e, RecvError::SessionTerminated { .. }) {
                        return Err(anyhow::anyhow!("{} ended: {}", channel, e));
                    }
                }
            }
        }
        Err(anyhow::anyhow!("all subscriptions ended"))
    })
    .await;

    session.close().await;

    match outcome {
        Ok(Ok(line)) => {
            println!("{}", line);
            Ok(())
        }
        Ok(Err(e)) => Err(e),
        Err(_) => bail!("no outcome for {} within {:?}", hash, args.timeout),
    }
}
