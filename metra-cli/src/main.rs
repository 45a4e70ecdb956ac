//! Metra CLI
//!
//! Reads one JSON request per line on stdin, writes one JSON response per
//! line on stdout. Logs go to stderr.
//!
//! Methods:
//! - ping, kinds
//! - units {type}
//! - convert {type, value, from, to}: also appended to history
//! - rates {type}: currency or crypto rate table
//! - favorites/list, favorites/add {type, fromUnit, toUnit},
//!   favorites/remove {index}, favorites/clear
//! - history/list, history/clear

mod handler;

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use handler::{App, Request, Response};
use metra::{Metra, MetraConfig};
use metra_store::FileStore;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let config = MetraConfig::from_env();
    let metra = match Metra::new(&config) {
        Ok(m) => m,
        Err(e) => {
            error!(error = %e, "failed to start engine");
            return ExitCode::FAILURE;
        }
    };

    let store = Arc::new(FileStore::new(config.data_path.clone()));
    let app = App::new(metra, store, config.history_limit);

    info!(
        version = VERSION,
        data_path = %config.data_path.display(),
        offline = config.offline,
        "metra ready, waiting for requests"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                info!("stdin closed");
                break;
            }
            Err(e) => {
                error!(error = %e, "error reading input");
                return ExitCode::FAILURE;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Request>(line) {
            Ok(request) => {
                debug!(method = %request.method, "processing");
                let response = app.handle(&request).await;
                // Requests without an id get no reply
                if request.id.is_none() {
                    continue;
                }
                response
            }
            Err(e) => {
                error!(error = %e, "unparseable request");
                Response::parse_error(format!("Parse error: {}", e))
            }
        };

        let mut out = match serde_json::to_string(&response) {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "failed to encode response");
                continue;
            }
        };
        out.push('\n');

        if let Err(e) = stdout.write_all(out.as_bytes()).await {
            error!(error = %e, "error writing response");
            return ExitCode::FAILURE;
        }
        if let Err(e) = stdout.flush().await {
            error!(error = %e, "error flushing stdout");
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
