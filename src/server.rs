//! Newline-delimited JSON transport over TCP.
//!
//! Each request line is `{"method": ..., "params": {...}}` and gets exactly
//! one reply line, either `{"result": ...}` or
//! `{"error": {"code": ..., "message": ...}}`. Requests on one connection are
//! answered in order; connections are served concurrently.

use core::future::Future;
use std::io;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

use crate::api::{GetSuggestionsRequest, ValidateAlgorithmSettingsRequest};
use crate::cancel::CancelToken;
use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::service::SuggestionService;

#[derive(Deserialize)]
struct Envelope {
    method: String,
    #[serde(default)]
    params: serde_json::Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum Reply {
    Result(serde_json::Value),
    Error(ErrorBody),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl From<Result<serde_json::Value>> for Reply {
    fn from(result: Result<serde_json::Value>) -> Self {
        match result {
            Ok(value) => Self::Result(value),
            Err(err) => Self::Error(ErrorBody {
                code: err.code(),
                message: err.to_string(),
            }),
        }
    }
}

/// Bind `config.bind_addr()` and serve until Ctrl-C.
///
/// # Errors
///
/// Returns an I/O error if the listener cannot be bound or accepting fails.
pub async fn run(config: ServerConfig) -> io::Result<()> {
    let listener = TcpListener::bind(config.bind_addr()).await?;
    trace_info!(addr = %listener.local_addr()?, "suggestion server listening");
    serve(listener, config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

/// Serve connections from `listener` until `shutdown` completes.
///
/// # Errors
///
/// Returns an I/O error if accepting a connection fails.
pub async fn serve(
    listener: TcpListener,
    config: ServerConfig,
    shutdown: impl Future<Output = ()>,
) -> io::Result<()> {
    let config = Arc::new(config);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            () = &mut shutdown => {
                trace_info!("shutting down");
                return Ok(());
            }
            accepted = listener.accept() => {
                let (socket, peer) = accepted?;
                trace_debug!(%peer, "accepted connection");
                let config = Arc::clone(&config);
                tokio::spawn(async move {
                    let (reader, writer) = socket.into_split();
                    if let Err(err) = handle_connection(reader, writer, &config).await {
                        trace_error!(%peer, error = %err, "connection failed");
                    }
                });
            }
        }
    }
}

/// Answer every request line read from `reader`.
async fn handle_connection<R, W>(reader: R, mut writer: W, config: &ServerConfig) -> io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let limit = config.max_request_bytes;
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();

    loop {
        line.clear();
        let n = (&mut reader)
            .take(limit as u64 + 1)
            .read_until(b'\n', &mut line)
            .await?;
        if n == 0 {
            return Ok(());
        }

        let oversized = line.len() > limit;
        let reply = if oversized {
            Reply::from(Err(Error::InvalidRequest(format!(
                "request exceeds {limit} bytes"
            ))))
        } else if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        } else {
            dispatch(&line, config).await
        };

        let mut out = serde_json::to_vec(&reply).map_err(io::Error::other)?;
        out.push(b'\n');
        writer.write_all(&out).await?;
        writer.flush().await?;

        // The rest of an oversized line cannot be resynchronized
        if oversized {
            return Ok(());
        }
    }
}

async fn dispatch(line: &[u8], config: &ServerConfig) -> Reply {
    let envelope: Envelope = match serde_json::from_slice(line) {
        Ok(envelope) => envelope,
        Err(err) => return Reply::from(Err(Error::InvalidRequest(err.to_string()))),
    };

    let result = match envelope.method.as_str() {
        "GetSuggestions" => get_suggestions(envelope.params, config).await,
        "ValidateAlgorithmSettings" => parse_params::<ValidateAlgorithmSettingsRequest>(
            envelope.params,
        )
        .and_then(|request| {
            to_value(&SuggestionService::new().validate_algorithm_settings(&request))
        }),
        other => Err(Error::InvalidRequest(format!("unknown method '{other}'"))),
    };
    Reply::from(result)
}

async fn get_suggestions(
    params: serde_json::Value,
    config: &ServerConfig,
) -> Result<serde_json::Value> {
    let request: GetSuggestionsRequest = parse_params(params)?;
    let timeout = config.request_timeout();
    let token = CancelToken::with_timeout(timeout);
    let worker_token = token.clone();

    let task = tokio::task::spawn_blocking(move || {
        SuggestionService::new().get_suggestions(&request, &worker_token)
    });

    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(reply)) => to_value(&reply?),
        Ok(Err(_join)) => Err(Error::Internal("suggestion worker panicked")),
        Err(_elapsed) => {
            token.cancel();
            Err(Error::Cancelled)
        }
    }
}

fn parse_params<T: serde::de::DeserializeOwned>(params: serde_json::Value) -> Result<T> {
    let params = if params.is_null() {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        params
    };
    serde_json::from_value(params).map_err(|e| Error::InvalidRequest(e.to_string()))
}

fn to_value<T: Serialize>(value: &T) -> Result<serde_json::Value> {
    serde_json::to_value(value).map_err(|_| Error::Internal("failed to encode reply"))
}
