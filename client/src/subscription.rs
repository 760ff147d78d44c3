///////////////////////////////////////////////////////////////////////////////
//
//  Copyright 2018-2026 Robonomics Network <research@robonomics.network>
//
//  Licensed under the Apache License, Version 2.0 (the "License");
//  you may not use this file except in compliance with the License.
//  You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
//
///////////////////////////////////////////////////////////////////////////////
//! New head notifications.
//!
//! The transport subscription is drained by a forwarding task that hands
//! headers over a channel holding at most one pending header. Cancelling the
//! [`Subscription`] (directly, through a [`CancelHandle`] or by dropping it)
//! stops the forwarder, which then releases the subscription on the node.
//!
//! # Examples
//!
//! ```no_run
//! use libtxkit::subscription::{ChainHeadSubscription, HeadTransport};
//! use std::sync::Arc;
//!
//! # async fn run(transport: Arc<dyn HeadTransport>) -> Result<(), libtxkit::Error> {
//! let mut heads = ChainHeadSubscription::subscribe(transport).await?;
//! let stop = heads.cancel_handle();
//!
//! let header = heads.next().await?;
//! println!("#{} {:?}", header.number, header.hash());
//! stop.cancel();
//! # Ok(())
//! # }
//! ```

use crate::error::SubscriptionError;
use async_trait::async_trait;
use futures::stream::{self, BoxStream, Stream, StreamExt};
use log::{debug, trace, warn};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use txkit_primitives::{BlockNumber, Hash, Header};

/// Transport-level head subscription.
pub struct TransportSubscription {
    /// Subscription id assigned by the node.
    pub id: String,
    /// Headers in arrival order.
    pub headers: BoxStream<'static, Result<Header, SubscriptionError>>,
}

/// Connection able to stream new block headers.
#[async_trait]
pub trait HeadTransport: Send + Sync {
    /// Start a `chain_subscribeNewHeads` style subscription.
    async fn subscribe_new_heads(&self) -> Result<TransportSubscription, SubscriptionError>;

    /// Release subscription `id` on the node.
    async fn unsubscribe(&self, id: &str) -> Result<(), SubscriptionError>;
}

/// Entry point for head subscriptions.
pub struct ChainHeadSubscription;

impl ChainHeadSubscription {
    /// Subscribe to new heads and spawn the forwarding task.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn subscribe(transport: Arc<dyn HeadTransport>) -> Result<Subscription, SubscriptionError> {
        let TransportSubscription { id, headers } = transport.subscribe_new_heads().await?;
        debug!("Subscribed to new heads, subscription {id}");

        let (tx, rx) = mpsc::channel(1);
        let (token, cancelled) = watch::channel(false);
        tokio::spawn(forward(transport, id.clone(), headers, tx, cancelled));

        Ok(Subscription {
            id,
            headers: rx,
            cancel: CancelHandle {
                token: Arc::new(token),
            },
        })
    }
}

/// Stops a [`Subscription`] from any task.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    token: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    /// Request cancellation; further calls do nothing.
    pub fn cancel(&self) {
        if !self.token.send_replace(true) {
            debug!("Head subscription cancelled");
        }
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        *self.token.borrow()
    }
}

/// Live head subscription.
pub struct Subscription {
    id: String,
    headers: mpsc::Receiver<Result<Header, SubscriptionError>>,
    cancel: CancelHandle,
}

impl Subscription {
    /// Subscription id assigned by the node.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Wait for the next header.
    ///
    /// Returns [`SubscriptionError::Cancelled`] once cancelled, including
    /// when the cancellation happens while waiting, and
    /// [`SubscriptionError::TransportClosed`] after the node ends the stream.
    pub async fn next(&mut self) -> Result<Header, SubscriptionError> {
        let mut cancelled = self.cancel.token.subscribe();
        tokio::select! {
            biased;
            _ = until_cancelled(&mut cancelled) => Err(SubscriptionError::Cancelled),
            item = self.headers.recv() => match item {
                Some(item) => item,
                None if self.cancel.is_cancelled() => Err(SubscriptionError::Cancelled),
                None => Err(SubscriptionError::TransportClosed),
            },
        }
    }

    /// Cancel the subscription; idempotent.
    pub fn cancel(&self) {
        self.cancel.cancel()
    }

    /// Handle cancelling this subscription from another task.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Headers as a stream ending on cancellation or transport close.
    pub fn into_stream(self) -> impl Stream<Item = Result<Header, SubscriptionError>> {
        stream::unfold(self, |mut subscription| async move {
            match subscription.next().await {
                Err(SubscriptionError::Cancelled) | Err(SubscriptionError::TransportClosed) => None,
                item => Some((item, subscription)),
            }
        })
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Height of the last delivered header and every hash delivered at it.
///
/// Sibling forks at the tip height are all delivered once; anything below
/// the tip is a reorg straggler.
#[derive(Default)]
struct Tip {
    height: Option<BlockNumber>,
    seen: Vec<Hash>,
}

impl Tip {
    /// Whether `header` advances the tip; records it if so.
    fn advance(&mut self, header: &Header) -> bool {
        let hash = header.hash();
        match self.height {
            Some(height) if header.number < height => return false,
            Some(height) if header.number == height => {
                if self.seen.contains(&hash) {
                    return false;
                }
            }
            _ => {
                self.height = Some(header.number);
                self.seen.clear();
            }
        }
        self.seen.push(hash);
        true
    }
}

/// Resolves once the token is set or every handle is gone.
async fn until_cancelled(token: &mut watch::Receiver<bool>) {
    let _ = token.wait_for(|cancelled| *cancelled).await;
}

async fn forward(
    transport: Arc<dyn HeadTransport>,
    id: String,
    mut headers: BoxStream<'static, Result<Header, SubscriptionError>>,
    tx: mpsc::Sender<Result<Header, SubscriptionError>>,
    mut stop: watch::Receiver<bool>,
) {
    let mut tip = Tip::default();
    let release = loop {
        let item = tokio::select! {
            _ = until_cancelled(&mut stop) => break true,
            item = headers.next() => item,
        };
        let item = match item {
            Some(Ok(header)) => {
                if !tip.advance(&header) {
                    trace!("Skipping stale head #{}", header.number);
                    continue;
                }
                Ok(header)
            }
            Some(Err(e)) => {
                warn!("Head subscription {id} failed: {e}");
                Err(e)
            }
            None => {
                debug!("Head subscription {id} closed by transport");
                break false;
            }
        };
        let failed = item.is_err();
        tokio::select! {
            _ = until_cancelled(&mut stop) => break true,
            sent = tx.send(item) => if sent.is_err() {
                break true;
            },
        }
        if failed {
            break true;
        }
    };

    drop(headers);
    if release {
        match transport.unsubscribe(&id).await {
            Ok(()) => debug!("Released head subscription {id}"),
            Err(e) => warn!("Failed to release head subscription {id}: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::mpsc::{unbounded, UnboundedSender};
    use std::sync::Mutex;
    use std::time::Duration;
    use txkit_primitives::Digest;

    const TIMEOUT: Duration = Duration::from_secs(2);

    struct FakeTransport {
        headers: Mutex<Option<BoxStream<'static, Result<Header, SubscriptionError>>>>,
        released: Mutex<Vec<String>>,
    }

    impl FakeTransport {
        fn new() -> (Arc<Self>, UnboundedSender<Result<Header, SubscriptionError>>) {
            let (tx, rx) = unbounded();
            let transport = Arc::new(Self {
                headers: Mutex::new(Some(rx.boxed())),
                released: Mutex::new(Vec::new()),
            });
            (transport, tx)
        }

        fn released(&self) -> Vec<String> {
            self.released.lock().unwrap().clone()
        }

        async fn wait_released(&self) {
            tokio::time::timeout(TIMEOUT, async {
                while self.released().is_empty() {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                }
            })
            .await
            .expect("subscription released");
        }
    }

    #[async_trait]
    impl HeadTransport for FakeTransport {
        async fn subscribe_new_heads(&self) -> Result<TransportSubscription, SubscriptionError> {
            let headers = self
                .headers
                .lock()
                .unwrap()
                .take()
                .ok_or_else(|| SubscriptionError::Transport("already subscribed".into()))?;
            Ok(TransportSubscription {
                id: "sub-1".into(),
                headers,
            })
        }

        async fn unsubscribe(&self, id: &str) -> Result<(), SubscriptionError> {
            self.released.lock().unwrap().push(id.to_string());
            Ok(())
        }
    }

    fn header(number: BlockNumber, fork: u8) -> Header {
        Header {
            parent_hash: Hash::repeat_byte(fork),
            number,
            state_root: Hash::zero(),
            extrinsics_root: Hash::zero(),
            digest: Digest::default(),
        }
    }

    #[tokio::test]
    async fn test_delivers_in_order_without_repeats() {
        let (transport, tx) = FakeTransport::new();
        let mut subscription = ChainHeadSubscription::subscribe(transport.clone()).await.unwrap();
        assert_eq!(subscription.id(), "sub-1");

        for item in [header(1, 0), header(2, 0), header(2, 0), header(1, 9), header(2, 7), header(3, 0)] {
            tx.unbounded_send(Ok(item)).unwrap();
        }

        let mut numbers = Vec::new();
        for _ in 0..4 {
            let header = subscription.next().await.unwrap();
            numbers.push((header.number, header.parent_hash.0[0]));
        }
        assert_eq!(numbers, vec![(1, 0), (2, 0), (2, 7), (3, 0)]);
    }

    #[tokio::test]
    async fn test_forks_at_tip_height_are_delivered_once() {
        let (transport, tx) = FakeTransport::new();
        let mut subscription = ChainHeadSubscription::subscribe(transport.clone()).await.unwrap();

        for item in [header(2, 1), header(2, 2), header(2, 1), header(2, 2), header(3, 0)] {
            tx.unbounded_send(Ok(item)).unwrap();
        }

        let mut delivered = Vec::new();
        for _ in 0..3 {
            let header = subscription.next().await.unwrap();
            delivered.push((header.number, header.parent_hash.0[0]));
        }
        assert_eq!(delivered, vec![(2, 1), (2, 2), (3, 0)]);
    }

    #[test]
    fn test_tip_forgets_hashes_below_new_height() {
        let mut tip = Tip::default();
        assert!(tip.advance(&header(4, 1)));
        assert!(tip.advance(&header(4, 2)));
        assert!(!tip.advance(&header(4, 1)));
        assert!(tip.advance(&header(5, 1)));
        assert_eq!(tip.seen.len(), 1);
        assert!(!tip.advance(&header(4, 3)));
    }

    #[tokio::test]
    async fn test_transport_close() {
        let (transport, tx) = FakeTransport::new();
        let mut subscription = ChainHeadSubscription::subscribe(transport.clone()).await.unwrap();
        tx.unbounded_send(Ok(header(5, 0))).unwrap();
        drop(tx);

        assert_eq!(subscription.next().await.unwrap().number, 5);
        assert_eq!(subscription.next().await, Err(SubscriptionError::TransportClosed));
        assert!(transport.released().is_empty());
    }

    #[tokio::test]
    async fn test_transport_error_is_surfaced() {
        let (transport, tx) = FakeTransport::new();
        let mut subscription = ChainHeadSubscription::subscribe(transport.clone()).await.unwrap();
        tx.unbounded_send(Err(SubscriptionError::Transport("socket reset".into())))
            .unwrap();

        assert_eq!(
            subscription.next().await,
            Err(SubscriptionError::Transport("socket reset".into()))
        );
        assert_eq!(subscription.next().await, Err(SubscriptionError::TransportClosed));
        transport.wait_released().await;
    }

    #[tokio::test]
    async fn test_cancel_wakes_blocked_next() {
        let (transport, _tx) = FakeTransport::new();
        let mut subscription = ChainHeadSubscription::subscribe(transport.clone()).await.unwrap();
        let handle = subscription.cancel_handle();

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            handle.cancel();
            handle.cancel();
        });

        let result = tokio::time::timeout(TIMEOUT, subscription.next()).await.unwrap();
        assert_eq!(result, Err(SubscriptionError::Cancelled));
        canceller.await.unwrap();

        assert_eq!(subscription.next().await, Err(SubscriptionError::Cancelled));
        transport.wait_released().await;
        assert_eq!(transport.released(), vec!["sub-1".to_string()]);
    }

    #[tokio::test]
    async fn test_drop_releases() {
        let (transport, tx) = FakeTransport::new();
        let subscription = ChainHeadSubscription::subscribe(transport.clone()).await.unwrap();
        let handle = subscription.cancel_handle();
        drop(subscription);
        assert!(handle.is_cancelled());

        transport.wait_released().await;
        assert!(tx.unbounded_send(Ok(header(1, 0))).is_err());
    }

    #[tokio::test]
    async fn test_into_stream() {
        let (transport, tx) = FakeTransport::new();
        let subscription = ChainHeadSubscription::subscribe(transport).await.unwrap();
        for number in 1..=3 {
            tx.unbounded_send(Ok(header(number, 0))).unwrap();
        }
        drop(tx);

        let numbers: Vec<_> = subscription
            .into_stream()
            .map(|header| header.unwrap().number)
            .collect()
            .await;
        assert_eq!(numbers, vec![1, 2, 3]);
    }
}
