//! Session state machine driving handshake and exchange transactions.

use tracing::{debug, info, warn};

use crate::pool::ConnectionPool;
use crate::types::{ChannelVector, ControlInput, VehicleState};
use crate::{LinkConfig, Result, protocol, telemetry};

/// Action establishing the remote controller interface.
const INJECT_ACTION: &str = "InjectUAVControllerInterface";

/// Action exchanging channel values for telemetry.
const EXCHANGE_ACTION: &str = "ExchangeData";

/// Fixed handshake payload. RealFlight accepts this opaque body as-is;
/// preserved verbatim since no protocol documentation pins its content.
const INJECT_PAYLOAD: &str = "<a>1</a><b>2</b>";

/// One control/telemetry session against a RealFlight host.
///
/// The first successful [`update`](Self::update) performs the one-time
/// `InjectUAVControllerInterface` handshake; every update after that runs
/// one `ExchangeData` transaction and refreshes the vehicle state from the
/// reply. Each transaction consumes one pooled socket.
///
/// Transaction failures abort only the current update and leave the state
/// record untouched; calling `update` again is the retry mechanism. The
/// handshake state never reverts once confirmed.
pub struct SessionLink {
    config: LinkConfig,
    pool: ConnectionPool,
    state: VehicleState,
    controller_injected: bool,
}

impl SessionLink {
    /// Create a session over an explicitly constructed pool.
    ///
    /// The pool should target the same endpoint as `config`; constructing
    /// both from one config is what [`crate::FlightAxis::connect_with`] does.
    pub fn new(config: LinkConfig, pool: ConnectionPool) -> Self {
        Self { config, pool, state: VehicleState::default(), controller_injected: false }
    }

    /// Drive one update: handshake if not yet confirmed, then exchange.
    ///
    /// On success the telemetry state is refreshed from the reply. On any
    /// transaction error, state is unchanged and the error is returned;
    /// every such error is retryable on the next call.
    pub async fn update(&mut self, input: &ControlInput) -> Result<()> {
        if !self.controller_injected {
            if let Err(e) = self.transact(INJECT_ACTION, INJECT_PAYLOAD).await {
                warn!(error = %e, "Controller injection failed, will retry on next update");
                return Err(e);
            }
            self.controller_injected = true;
            info!("Controller interface injected");
        }

        self.exchange(input).await
    }

    /// Last-extracted vehicle telemetry.
    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    /// Whether the controller handshake has been confirmed.
    pub fn is_ready(&self) -> bool {
        self.controller_injected
    }

    /// Shut down the underlying connection pool.
    pub fn shutdown(&self) {
        self.pool.shutdown();
    }

    async fn exchange(&mut self, input: &ControlInput) -> Result<()> {
        let payload = ChannelVector::from(input).control_payload();
        let reply = self.transact(EXCHANGE_ACTION, &payload).await?;
        telemetry::extract(&reply, &mut self.state);
        Ok(())
    }

    /// One complete send-then-receive cycle on a freshly acquired socket.
    ///
    /// The socket is dropped (closed) when this returns, success or not;
    /// RealFlight requires a new connection per request.
    async fn transact(&self, action: &str, payload: &str) -> Result<Vec<u8>> {
        let mut socket = self.pool.acquire().await?;
        debug!(action, "Starting transaction");

        protocol::send(&mut socket, action, payload).await?;
        protocol::receive(&mut socket, self.config.request_timeout()).await
    }
}
