//! Per-connection handler for the daemons.
//!
//! Each accepted connection gets exactly one of these, running in its own
//! task with exclusive ownership of the stream. It services a single
//! request/response exchange and closes: accumulate until the end sentinel,
//! authenticate the client's role, transform, write back, drain, close.

use std::error::Error;

use log::debug;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::cipher;
use crate::wire::{self, Role, Transmission};
use crate::{BUFFER_SIZE, MAX_TRANSMISSION};

/// Services one client connection end to end.
///
/// Errors abort only this handler; the daemon's accept loop keeps running.
pub async fn handle(mut stream: TcpStream, role: Role) -> Result<(), Box<dyn Error + Send + Sync>> {
    let transmission = match receive_transmission(&mut stream).await? {
        Ok(transmission) => transmission,
        Err(frame_error) => {
            debug!("undecodable transmission: {}", frame_error);
            return reject(stream).await;
        }
    };

    // Mutual role exclusion: an encrypt daemon only serves encrypt clients,
    // a decrypt daemon only decrypt clients.
    if transmission.role != Some(role) {
        debug!("role handshake failed: got tag {:?}", transmission.role);
        return reject(stream).await;
    }

    let response = match role {
        Role::Encrypt => cipher::encrypt(&transmission.text, &transmission.key),
        Role::Decrypt => cipher::decrypt(&transmission.text, &transmission.key),
    };

    debug!("writing {} byte response", response.len());
    stream.write_all(&response).await?;
    drain_and_close(stream).await
}

/// Reads from the socket until a full transmission has accumulated.
///
/// The outer error is transport failure; the inner result distinguishes a
/// well-formed transmission from one that contained the end sentinel but
/// could not be split, which the caller answers with a rejection.
async fn receive_transmission(
    stream: &mut TcpStream,
) -> Result<Result<Transmission, wire::FrameError>, Box<dyn Error + Send + Sync>> {
    let mut accumulated = Vec::new();
    let mut buffer = [0u8; BUFFER_SIZE];

    loop {
        let bytes_read = stream.read(&mut buffer).await?;
        if bytes_read == 0 {
            return Err("client closed connection before end of transmission".into());
        }
        accumulated.extend_from_slice(&buffer[..bytes_read]);
        debug!("accumulated {} bytes", accumulated.len());

        match wire::decode(&accumulated) {
            Ok(Some(transmission)) => return Ok(Ok(transmission)),
            Ok(None) => {
                if accumulated.len() > MAX_TRANSMISSION {
                    return Err("transmission exceeded maximum size".into());
                }
            }
            Err(frame_error) => return Ok(Err(frame_error)),
        }
    }
}

/// Answers a failed handshake with the rejection marker and closes.
async fn reject(mut stream: TcpStream) -> Result<(), Box<dyn Error + Send + Sync>> {
    stream.write_all(&[wire::REJECTION_MARKER]).await?;
    drain_and_close(stream).await?;
    Err("client handshake unsuccessful".into())
}

/// Flushes and shuts down the write side before dropping the stream, so the
/// peer sees every byte of the response rather than a truncated close.
async fn drain_and_close(mut stream: TcpStream) -> Result<(), Box<dyn Error + Send + Sync>> {
    stream.flush().await?;
    stream.shutdown().await?;
    Ok(())
}
