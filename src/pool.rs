//! Pre-connected socket pool.
//!
//! RealFlight rejects socket reuse across SOAP requests: every transaction
//! needs a fresh TCP connection. Connecting inline would put connection
//! setup latency on the exchange path, so the pool keeps a small queue of
//! already-connected sockets topped up by a background task. Consumers pop
//! one socket per transaction and never return it.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use crate::{LinkError, Result};

/// Timeout for a single connect attempt.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(1);

/// Fallback wake interval for the maintainer when no acquire signal arrives.
const MAINTAIN_INTERVAL: Duration = Duration::from_millis(50);

/// State shared between the pool handle and its maintainer task.
struct Shared {
    endpoint: String,
    target: usize,
    /// Ready sockets in FIFO order. The maintainer is the only writer that
    /// pushes; consumers only pop. Never held across an await point.
    queue: Mutex<VecDeque<TcpStream>>,
    /// Signaled by `acquire` when the queue depth drops.
    replenish: Notify,
    cancel: CancellationToken,
}

impl Shared {
    fn depth(&self) -> usize {
        self.queue.lock().expect("pool lock poisoned").len()
    }
}

/// Pool of pre-established connections to one RealFlight endpoint.
///
/// The maintainer task runs until the pool is shut down or dropped. It
/// sleeps while the queue is full and wakes when a consumer pops a socket,
/// with a short bounded interval as a fallback.
pub struct ConnectionPool {
    shared: Arc<Shared>,
}

impl ConnectionPool {
    /// Create a pool targeting `target` ready connections to `endpoint`
    /// and start the background maintainer.
    ///
    /// Must be called within a Tokio runtime.
    pub fn new(endpoint: impl Into<String>, target: usize) -> Self {
        let shared = Arc::new(Shared {
            endpoint: endpoint.into(),
            target,
            queue: Mutex::new(VecDeque::with_capacity(target)),
            replenish: Notify::new(),
            cancel: CancellationToken::new(),
        });

        info!(endpoint = %shared.endpoint, target, "Starting connection pool");
        tokio::spawn(maintain_task(Arc::clone(&shared)));

        Self { shared }
    }

    /// Take one ready socket, or connect inline if the queue is empty.
    ///
    /// The returned socket is owned exclusively by the caller, valid for
    /// exactly one transaction, and must be dropped (closed) afterward.
    pub async fn acquire(&self) -> Result<TcpStream> {
        let pooled = self.shared.queue.lock().expect("pool lock poisoned").pop_front();

        match pooled {
            Some(socket) => {
                trace!("Acquired pooled socket");
                self.shared.replenish.notify_one();
                Ok(socket)
            }
            None => {
                debug!(endpoint = %self.shared.endpoint, "Pool empty, connecting inline");
                connect(&self.shared.endpoint).await
            }
        }
    }

    /// Current number of ready sockets in the queue.
    pub fn depth(&self) -> usize {
        self.shared.depth()
    }

    /// Stop the maintainer and close every queued socket.
    ///
    /// Sockets already checked out stay with their holders.
    pub fn shutdown(&self) {
        self.shared.cancel.cancel();
        self.shared.queue.lock().expect("pool lock poisoned").clear();
        info!(endpoint = %self.shared.endpoint, "Connection pool shut down");
    }
}

impl Drop for ConnectionPool {
    fn drop(&mut self) {
        self.shared.cancel.cancel();
    }
}

/// One connect attempt with a bounded timeout.
async fn connect(endpoint: &str) -> Result<TcpStream> {
    match tokio::time::timeout(CONNECT_TIMEOUT, TcpStream::connect(endpoint)).await {
        Ok(Ok(socket)) => {
            socket.set_nodelay(true).map_err(|e| LinkError::connection_io(endpoint, e))?;
            Ok(socket)
        }
        Ok(Err(e)) => Err(LinkError::connection_io(endpoint, e)),
        Err(_) => Err(LinkError::connection_failed(
            endpoint,
            format!("connect timed out after {CONNECT_TIMEOUT:?}"),
        )),
    }
}

/// Maintainer loop: top the queue up to target, then sleep until signaled.
async fn maintain_task(shared: Arc<Shared>) {
    debug!(endpoint = %shared.endpoint, target = shared.target, "Pool maintainer started");

    loop {
        if shared.cancel.is_cancelled() {
            break;
        }

        if shared.depth() < shared.target {
            let attempt = tokio::select! {
                _ = shared.cancel.cancelled() => break,
                result = connect(&shared.endpoint) => result,
            };

            match attempt {
                Ok(socket) => {
                    let mut queue = shared.queue.lock().expect("pool lock poisoned");
                    // Re-check under the lock so depth never exceeds target
                    if queue.len() < shared.target {
                        queue.push_back(socket);
                        trace!(depth = queue.len(), "Pooled new connection");
                    }
                }
                Err(e) => {
                    // Host not up yet is the normal case before the sim starts
                    debug!(error = %e, "Pool connect attempt failed");
                    tokio::select! {
                        _ = shared.cancel.cancelled() => break,
                        _ = tokio::time::sleep(MAINTAIN_INTERVAL) => {}
                    }
                }
            }
        } else {
            tokio::select! {
                _ = shared.cancel.cancelled() => break,
                _ = shared.replenish.notified() => {}
                _ = tokio::time::sleep(MAINTAIN_INTERVAL) => {}
            }
        }
    }

    // Dropping the queued streams closes them
    shared.queue.lock().expect("pool lock poisoned").clear();
    debug!(endpoint = %shared.endpoint, "Pool maintainer stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    /// Accept-and-hold server: keeps accepted sockets open so the pool
    /// sees them as live connections.
    async fn spawn_accept_server() -> std::net::SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
        let addr = listener.local_addr().expect("listener addr");
        tokio::spawn(async move {
            loop {
                let Ok((socket, _)) = listener.accept().await else { break };
                tokio::spawn(async move {
                    let _held = socket;
                    tokio::time::sleep(Duration::from_secs(60)).await;
                });
            }
        });
        addr
    }

    #[tokio::test]
    async fn maintainer_prefills_to_target() {
        let addr = spawn_accept_server().await;
        let pool = ConnectionPool::new(addr.to_string(), 3);

        // Give the maintainer a moment to fill the queue
        for _ in 0..50 {
            if pool.depth() == 3 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(pool.depth(), 3, "pool should pre-fill to target");

        pool.shutdown();
    }

    #[tokio::test]
    async fn depth_never_exceeds_target() {
        let addr = spawn_accept_server().await;
        let pool = ConnectionPool::new(addr.to_string(), 2);

        for _ in 0..30 {
            assert!(pool.depth() <= 2, "queue depth must never exceed target");
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        pool.shutdown();
    }

    #[tokio::test]
    async fn acquire_pops_ready_socket() {
        let addr = spawn_accept_server().await;
        let pool = ConnectionPool::new(addr.to_string(), 3);

        for _ in 0..50 {
            if pool.depth() == 3 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        let before = pool.depth();
        let socket = pool.acquire().await.expect("acquire from pre-filled pool");
        assert!(pool.depth() < before, "acquire should pop from the queue");
        drop(socket);

        // The maintainer replenishes the popped slot
        for _ in 0..50 {
            if pool.depth() == 3 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(pool.depth(), 3);

        pool.shutdown();
    }

    #[tokio::test]
    async fn zero_target_pool_connects_inline() {
        let addr = spawn_accept_server().await;
        let pool = ConnectionPool::new(addr.to_string(), 0);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(pool.depth(), 0);

        let socket = pool.acquire().await.expect("inline connect");
        drop(socket);
        assert_eq!(pool.depth(), 0);

        pool.shutdown();
    }

    #[tokio::test]
    async fn acquire_fails_against_unreachable_endpoint() {
        // Bind then immediately drop to get a port with no listener
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let pool = ConnectionPool::new(addr.to_string(), 0);
        let result = pool.acquire().await;
        assert!(matches!(result, Err(LinkError::Connection { .. })));

        pool.shutdown();
    }

    #[tokio::test]
    async fn shutdown_drains_queue() {
        let addr = spawn_accept_server().await;
        let pool = ConnectionPool::new(addr.to_string(), 2);

        for _ in 0..50 {
            if pool.depth() == 2 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        pool.shutdown();
        assert_eq!(pool.depth(), 0, "shutdown should close all queued sockets");
    }
}
