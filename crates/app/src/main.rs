//! Inkpass - headless controller deriving passwords from drawing gestures
//!
//! Reads UI messages (captures, resets, config changes) as JSON lines on
//! stdin and writes password updates as JSON lines on stdout. Logs go to
//! stderr.

use std::sync::Arc;

use gesture::PasswordSession;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::{error, info};

mod config;
mod controller;
mod logging;
mod transport;

use config::InkpassConfig;
use controller::Controller;

#[tokio::main]
async fn main() {
    // Parse configuration from environment
    let config = InkpassConfig::default();
    logging::init(config.debug);

    info!(
        "Starting Inkpass with {:?} derivation, length {}, color {}",
        config.derive_mode, config.derivation.password_length, config.derivation.active_color
    );

    if let Err(err) = run(config).await {
        error!("Inkpass stopped: {}", err);
        std::process::exit(1);
    }
}

async fn run(config: InkpassConfig) -> std::io::Result<()> {
    let session = PasswordSession::new(config.derivation);
    // Surface a bad env config up front instead of on the first capture
    if let Err(err) = session.config().validate() {
        return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, err));
    }

    let (outbox, outgoing) = mpsc::unbounded_channel();
    let writer = tokio::spawn(transport::write_messages(tokio::io::stdout(), outgoing));

    let (controller, worker) = Controller::spawn(Arc::new(session), config.derive_mode, outbox);
    let handled = transport::read_messages(BufReader::new(tokio::io::stdin()), &controller).await?;
    info!("Input closed after {} messages", handled);

    // Dropping the controller closes the request slot and the outbox
    drop(controller);
    if let Some(worker) = worker {
        if let Err(err) = worker.await {
            error!("Derive worker failed: {}", err);
        }
    }
    writer
        .await
        .map_err(std::io::Error::other)?
}
