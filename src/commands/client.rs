use std::io;
use std::path::Path;

use log::debug;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::validate::{self, ValidateError};
use crate::wire::{self, Role};
use crate::{BUFFER_SIZE, LOCAL_HOST};

/// Everything that can go wrong on the client side, split by exit code:
/// local validation failures exit 1, network failures and rejections exit 2.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    File(#[from] ValidateError),
    #[error("key is too short to encrypt message ({key_len} < {text_len})")]
    KeyTooShort { key_len: usize, text_len: usize },
    #[error("could not connect on port {port}: {source}")]
    Connect {
        port: u16,
        #[source]
        source: io::Error,
    },
    #[error("connection rejected on port {port}")]
    Rejected { port: u16 },
    #[error("error talking to server on port {port}: {message}")]
    Transport { port: u16, message: String },
}

impl ClientError {
    /// Process exit code this failure maps to.
    pub fn exit_code(&self) -> i32 {
        match self {
            ClientError::File(_) | ClientError::KeyTooShort { .. } => 1,
            ClientError::Connect { .. }
            | ClientError::Rejected { .. }
            | ClientError::Transport { .. } => 2,
        }
    }
}

/// Run one client request against the daemon on `port` and return the
/// transformed text.
///
/// # Process Flow
/// 1. Validate both files locally; fail before any socket opens
/// 2. Check the key is at least as long as the text
/// 3. Connect to the local daemon, send one tagged transmission
/// 4. Await one full response: the transformed text, or the rejection marker
///    if the daemon serves the opposite role
pub async fn run(
    role: Role,
    text_path: &Path,
    key_path: &Path,
    port: u16,
) -> Result<String, ClientError> {
    let text = validate::validate(text_path)?;
    let key = validate::validate(key_path)?;

    if key.len() < text.len() {
        return Err(ClientError::KeyTooShort {
            key_len: key.len(),
            text_len: text.len(),
        });
    }

    let frame = wire::encode(role, &text, &key);
    debug!("sending {} byte transmission to port {}", frame.len(), port);

    let mut stream = TcpStream::connect((LOCAL_HOST, port))
        .await
        .map_err(|source| ClientError::Connect { port, source })?;

    stream
        .write_all(&frame)
        .await
        .map_err(|e| transport(port, "write", e))?;
    stream.flush().await.map_err(|e| transport(port, "flush", e))?;

    let response = read_response(&mut stream, text.len(), port).await?;
    debug!("received {} byte response", response.len());

    if response.as_slice() == [wire::REJECTION_MARKER] {
        return Err(ClientError::Rejected { port });
    }
    if response.len() != text.len() {
        return Err(ClientError::Transport {
            port,
            message: format!(
                "expected {} bytes, server sent {}",
                text.len(),
                response.len()
            ),
        });
    }

    // The daemon answers in the same 27-character ASCII alphabet it was sent.
    Ok(String::from_utf8_lossy(&response).into_owned())
}

/// Reads until the daemon closes the connection or the expected number of
/// bytes has arrived, whichever comes first.
async fn read_response(
    stream: &mut TcpStream,
    expected: usize,
    port: u16,
) -> Result<Vec<u8>, ClientError> {
    let mut response = Vec::new();
    let mut buffer = [0u8; BUFFER_SIZE];

    loop {
        let bytes_read = stream
            .read(&mut buffer)
            .await
            .map_err(|e| transport(port, "read", e))?;
        if bytes_read == 0 {
            return Ok(response);
        }
        response.extend_from_slice(&buffer[..bytes_read]);
        if response.len() >= expected && response != [wire::REJECTION_MARKER] {
            return Ok(response);
        }
    }
}

fn transport(port: u16, action: &str, source: io::Error) -> ClientError {
    ClientError::Transport {
        port,
        message: format!("{} failed: {}", action, source),
    }
}
