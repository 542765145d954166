//! Ship command - stdin lines through arenas, the shipper and a receiver
//!
//! Each stdin line becomes one row of a single STRING column under the
//! identity described by the flags. Rows are packed into arenas, shipped on
//! the configured timer through the loopback transport, decoded by the
//! receiver and printed on stdout.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use logship_config::Config;
use logship_pipeline::{ArenaManager, PipelineError};
use logship_protocol::{ColumnTag, StreamIdentity};
use logship_receiver::Receiver;
use logship_shipper::Shipper;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::{info, warn};

use crate::loopback::{LoopbackTransport, StdoutListener, encode_row};

/// Pause between shipping attempts while backpressure is on
const BACKPRESSURE_PAUSE: Duration = Duration::from_millis(50);

/// Ship command arguments
#[derive(Args, Debug)]
pub struct ShipArgs {
    /// Log type of the stream (selects the route)
    #[arg(long, default_value = "stdin")]
    pub log_type: String,

    /// File prefix pattern recorded in the stream header
    #[arg(long, default_value = "")]
    pub file_prefix: String,

    /// Client hostname recorded in the stream header
    #[arg(long, env = "HOSTNAME", default_value = "localhost")]
    pub hostname: String,

    /// Column name for the line text
    #[arg(long, default_value = "line")]
    pub column: String,

    /// Stream property as key=value (repeatable)
    #[arg(long = "property", value_parser = parse_property)]
    pub properties: Vec<(String, String)>,
}

impl Default for ShipArgs {
    fn default() -> Self {
        Self {
            log_type: "stdin".into(),
            file_prefix: String::new(),
            hostname: std::env::var("HOSTNAME").unwrap_or_else(|_| "localhost".into()),
            column: "line".into(),
            properties: Vec::new(),
        }
    }
}

impl ShipArgs {
    fn identity(&self) -> Result<StreamIdentity> {
        let builder = StreamIdentity::builder(self.log_type.as_str())
            .file_prefix_pattern(self.file_prefix.as_str())
            .client_hostname(self.hostname.as_str())
            .typed_column(self.column.as_str(), &[ColumnTag::String]);

        let builder = self
            .properties
            .iter()
            .fold(builder, |builder, (key, value)| {
                builder.property(key.as_str(), value.as_str())
            });

        builder.build().context("invalid stream identity")
    }
}

fn parse_property(s: &str) -> std::result::Result<(String, String), String> {
    s.split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{s}'"))
}

/// Run the ship command
pub async fn run(config: Config, args: ShipArgs) -> Result<()> {
    let identity = args.identity()?;
    let manager = Arc::new(ArenaManager::new(config.routing_table()?));
    let transport = Arc::new(LoopbackTransport::new(Receiver::new(Arc::new(StdoutListener))));
    let shipper = Shipper::start(Arc::clone(&manager), transport.clone(), &config.shipper);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        identity = %identity,
        hostname = identity.client_hostname(),
        "logship shipping stdin"
    );

    let shutdown = wait_for_shutdown();
    tokio::pin!(shutdown);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut skipped = 0u64;

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("interrupted, shutting down");
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    info!("end of input");
                    break;
                };
                wait_for_capacity(&shipper).await;
                if !write_line(&manager, &identity, &line)? {
                    skipped += 1;
                }
            }
        }
    }

    shipper.close().await?;

    let pipeline = manager.metrics();
    let pool = manager.pool_metrics();
    let shipped = shipper.metrics();
    let received = transport.receiver().metrics();
    info!(
        rows = pipeline.rows_written,
        skipped,
        rollovers = pipeline.rollovers,
        pool_hits = pool.hits,
        pooled = manager.pooled(),
        arenas_sent = shipped.arenas_sent,
        bytes_sent = shipped.bytes_sent,
        frames_rejected = shipped.frames_rejected,
        frames_received = received.frames_received,
        receive_errors = received.errors(),
        "logship stopped"
    );
    Ok(())
}

/// Append one line; `Ok(false)` if the line was skipped
///
/// Configuration errors (no route, header too large) abort the run.
fn write_line(manager: &ArenaManager, identity: &StreamIdentity, line: &str) -> Result<bool> {
    let row = match encode_row(line) {
        Ok(row) => row,
        Err(e) => {
            warn!(error = %e, "skipping line");
            return Ok(false);
        }
    };

    match manager.put(identity, &row) {
        Ok(()) => Ok(true),
        Err(e @ PipelineError::RowTooLarge { .. }) => {
            warn!(error = %e, "skipping line");
            Ok(false)
        }
        Err(e) => Err(e).context("cannot buffer rows for this stream"),
    }
}

/// Hold off producing while the shipper reports backpressure
async fn wait_for_capacity(shipper: &Shipper) {
    loop {
        let availability = shipper.availability();
        if availability.is_operational() || availability.causes().shutdown {
            return;
        }

        warn!(
            %availability,
            ready = shipper.manager().ready_depth(),
            open = shipper.manager().current_count(),
            "backpressure, pausing input"
        );
        if let Err(e) = shipper.send_now(false).await {
            warn!(error = %e, "send failed while draining");
        }
        tokio::time::sleep(BACKPRESSURE_PAUSE).await;
    }
}

/// Wait for SIGINT or SIGTERM
async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
