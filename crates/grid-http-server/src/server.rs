//! Grid service lifecycle
//!
//! Binds the listener, serves the API on a background accept loop and
//! performs a bounded graceful shutdown once cancelled.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::{TokioIo, TokioTimer};
use hyper_util::server::graceful::GracefulShutdown;
use parking_lot::Mutex;
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use grid_adapter::{NoopAdapter, SharedAdapter};

use crate::{GridError, GridHttpHandler, Result};

/// Default address of the server: loopback only.
pub const DEFAULT_ADDRESS: &str = "127.0.0.1:1111";

/// Upper bound on draining in-flight requests during shutdown
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

const MIN_HEADER_BUFFER: usize = 8192;
const MAX_ACCEPT_BACKOFF: Duration = Duration::from_secs(1);

/// Hook run once the listener is bound
type OnListen = Box<dyn FnOnce() + Send + 'static>;

/// Configuration for the Grid server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (`host:port`; an empty port picks an ephemeral one)
    pub address: String,
    /// Log every request at info level instead of debug
    pub verbose: bool,
    /// Externally provided version, served at `/v1/version`
    pub version: String,
    /// Time allowed for in-flight requests to finish on shutdown
    pub shutdown_timeout: Duration,
    /// Time allowed for a client to send request headers
    pub header_read_timeout: Duration,
    /// Maximum buffered request head size
    pub max_header_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            verbose: false,
            version: String::new(),
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            header_read_timeout: Duration::from_secs(5),
            max_header_bytes: 1 << 20, // 1MB
        }
    }
}

/// Builder for the Grid server
pub struct GridServerBuilder {
    config: ServerConfig,
    adapter: Option<SharedAdapter>,
    on_listen: Option<OnListen>,
}

impl GridServerBuilder {
    /// Create a new builder with default configuration and the no-op adapter
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
            adapter: None,
            on_listen: None,
        }
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the listen address
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.config.address = address.into();
        self
    }

    /// Enable or disable verbose request logging
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    /// Set the version reported at `/v1/version`
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.config.version = version.into();
        self
    }

    /// Bind the serverless backend adapter
    pub fn adapter(mut self, adapter: SharedAdapter) -> Self {
        self.adapter = Some(adapter);
        self
    }

    /// Run `f` exactly once, right after the listener is bound
    pub fn on_listen<F>(mut self, f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.on_listen = Some(Box::new(f));
        self
    }

    /// Set the graceful shutdown bound
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.config.shutdown_timeout = timeout;
        self
    }

    /// Set the request header read timeout
    pub fn header_read_timeout(mut self, timeout: Duration) -> Self {
        self.config.header_read_timeout = timeout;
        self
    }

    /// Set the maximum request head size (at least 8KiB is always allowed)
    pub fn max_header_bytes(mut self, size: usize) -> Self {
        self.config.max_header_bytes = size;
        self
    }

    /// Build the Grid server
    pub fn build(self) -> GridServer {
        let adapter = self
            .adapter
            .unwrap_or_else(|| std::sync::Arc::new(NoopAdapter::new()));
        let handler = GridHttpHandler::new(self.config.version.clone(), adapter);

        GridServer {
            config: self.config,
            handler,
            on_listen: Mutex::new(self.on_listen),
            started: AtomicBool::new(false),
            local_addr: OnceLock::new(),
        }
    }
}

impl Default for GridServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Grid service: one listener, one adapter, one `serve` call.
pub struct GridServer {
    config: ServerConfig,
    handler: GridHttpHandler,
    on_listen: Mutex<Option<OnListen>>,
    started: AtomicBool,
    local_addr: OnceLock<SocketAddr>,
}

impl GridServer {
    /// Create a new builder
    pub fn builder() -> GridServerBuilder {
        GridServerBuilder::new()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The bound address, or `None` if not yet listening
    pub fn addr(&self) -> Option<SocketAddr> {
        self.local_addr.get().copied()
    }

    /// Serve until the HTTP layer fails or `cancel` fires, then shut down.
    ///
    /// A server can only be started once; later calls fail with
    /// [`GridError::AlreadyStarted`] without touching the network.
    pub async fn serve(&self, cancel: CancellationToken) -> Result<()> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(GridError::AlreadyStarted);
        }

        // Listen
        let address = resolve_address(&self.config.address).await?;
        let listener = TcpListener::bind(address)
            .await
            .map_err(|source| GridError::Bind {
                address: self.config.address.clone(),
                source,
            })?;
        let local_addr = listener.local_addr()?;
        let _ = self.local_addr.set(local_addr);
        let on_listen = self.on_listen.lock().take();
        if let Some(on_listen) = on_listen {
            on_listen();
        }
        info!("Grid listening on {}", local_addr);

        // Serve
        let stop = CancellationToken::new();
        let connections = ConnectionFactory {
            handler: self.handler.clone(),
            verbose: self.config.verbose,
            header_read_timeout: self.config.header_read_timeout,
            max_header_bytes: self.config.max_header_bytes.max(MIN_HEADER_BUFFER),
        };
        let mut accept = tokio::spawn(accept_loop(listener, connections, stop.clone()));

        // Wait for a fatal serve error or cancellation
        let finished = tokio::select! {
            finished = &mut accept => finished,
            _ = cancel.cancelled() => {
                info!("Shutdown requested");
                stop.cancel();
                accept.await
            }
        };

        // Shutdown
        let (exit, shutdown) = match finished {
            Ok(AcceptOutcome { exit, graceful }) => {
                let shutdown = drain(graceful, self.config.shutdown_timeout).await;
                (exit, shutdown)
            }
            Err(join_err) => (ServeExit::Failed(GridError::Join(join_err.to_string())), Ok(())),
        };
        let outcome = resolve_outcome(exit, shutdown);
        if outcome.is_ok() {
            info!("Grid shutdown completed");
        }
        outcome
    }
}

/// How the accept loop ended
#[derive(Debug)]
pub(crate) enum ServeExit {
    /// Stopped on request; the expected way to finish
    Closed,
    /// The HTTP layer failed
    Failed(GridError),
}

struct AcceptOutcome {
    exit: ServeExit,
    graceful: GracefulShutdown,
}

/// Decide what `serve` reports.
///
/// A serve failure wins over a shutdown failure (which is only logged);
/// otherwise the shutdown result stands.
pub(crate) fn resolve_outcome(exit: ServeExit, shutdown: Result<()>) -> Result<()> {
    match (exit, shutdown) {
        (ServeExit::Failed(err), Ok(())) => Err(err),
        (ServeExit::Failed(err), Err(shutdown_err)) => {
            error!("Error shutting down: {}", shutdown_err);
            Err(err)
        }
        (ServeExit::Closed, shutdown) => shutdown,
    }
}

/// Wait for watched connections to finish, bounded by `timeout`
async fn drain(graceful: GracefulShutdown, timeout: Duration) -> Result<()> {
    match tokio::time::timeout(timeout, graceful.shutdown()).await {
        Ok(()) => Ok(()),
        Err(_) => Err(GridError::ShutdownTimeout(timeout)),
    }
}

/// Resolve a listen address.
///
/// Follows the `host:port` convention where an empty host means every
/// interface and an empty port means an ephemeral one.
pub(crate) async fn resolve_address(address: &str) -> Result<SocketAddr> {
    let invalid = |reason: String| GridError::InvalidAddress {
        address: address.to_string(),
        reason,
    };

    let mut candidate = address.trim().to_string();
    if candidate.starts_with(':') {
        candidate.insert_str(0, "0.0.0.0");
    }
    if candidate.ends_with(':') {
        candidate.push('0');
    }

    let mut resolved = tokio::net::lookup_host(candidate.as_str())
        .await
        .map_err(|err| invalid(err.to_string()))?;
    resolved
        .next()
        .ok_or_else(|| invalid("no addresses resolved".to_string()))
}

/// Serves accepted connections on their own tasks
#[derive(Clone)]
struct ConnectionFactory {
    handler: GridHttpHandler,
    verbose: bool,
    header_read_timeout: Duration,
    max_header_bytes: usize,
}

impl ConnectionFactory {
    fn spawn(&self, stream: TcpStream, peer_addr: SocketAddr, graceful: &GracefulShutdown) {
        let handler = self.handler.clone();
        let verbose = self.verbose;
        let service = service_fn(move |req: Request<Incoming>| {
            let handler = handler.clone();
            async move {
                let method = req.method().clone();
                let path = req.uri().path().to_string();
                let response = handler.handle(req).await;
                let status = response.status().as_u16();
                if verbose {
                    info!("{} {} {} ({})", method, path, status, peer_addr);
                } else {
                    debug!("{} {} {} ({})", method, path, status, peer_addr);
                }
                Ok::<_, Infallible>(response)
            }
        });

        let mut builder = http1::Builder::new();
        builder
            .timer(TokioTimer::new())
            .header_read_timeout(self.header_read_timeout)
            .max_buf_size(self.max_header_bytes);
        let conn = graceful.watch(builder.serve_connection(TokioIo::new(stream), service));

        tokio::spawn(async move {
            if let Err(err) = conn.await {
                // Filter out common client disconnection errors that aren't actual problems
                let err_str = err.to_string();
                if err.is_incomplete_message() || err_str.contains("connection closed") {
                    debug!("Client {} disconnected: {}", peer_addr, err);
                } else {
                    error!("Error serving connection from {}: {}", peer_addr, err);
                }
            }
        });
    }
}

async fn accept_loop(
    listener: TcpListener,
    connections: ConnectionFactory,
    stop: CancellationToken,
) -> AcceptOutcome {
    let graceful = GracefulShutdown::new();
    let mut backoff = Duration::ZERO;

    let exit = loop {
        let accepted = tokio::select! {
            _ = stop.cancelled() => break ServeExit::Closed,
            accepted = listener.accept() => accepted,
        };

        match accepted {
            Ok((stream, peer_addr)) => {
                backoff = Duration::ZERO;
                debug!("New connection from {}", peer_addr);
                connections.spawn(stream, peer_addr, &graceful);
            }
            Err(err) if is_transient_accept_error(&err) => {
                backoff = next_backoff(backoff);
                warn!("Accept error: {}; retrying in {:?}", err, backoff);
                tokio::select! {
                    _ = stop.cancelled() => break ServeExit::Closed,
                    _ = tokio::time::sleep(backoff) => {}
                }
            }
            Err(err) => break ServeExit::Failed(GridError::Serve(err)),
        }
    };

    // The listener is dropped here, so no new connections are taken.
    AcceptOutcome { exit, graceful }
}

fn is_transient_accept_error(err: &std::io::Error) -> bool {
    use std::io::ErrorKind::*;
    matches!(
        err.kind(),
        ConnectionAborted | ConnectionReset | ConnectionRefused | Interrupted | WouldBlock
    ) || err.raw_os_error().is_some_and(|code| code == 23 || code == 24) // ENFILE, EMFILE
}

fn next_backoff(current: Duration) -> Duration {
    if current.is_zero() {
        Duration::from_millis(5)
    } else {
        (current * 2).min(MAX_ACCEPT_BACKOFF)
    }
}
