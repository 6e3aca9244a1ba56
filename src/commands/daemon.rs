use std::error::Error;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use log::{debug, info};
use tokio::net::TcpListener;
use tokio::sync::Semaphore;

use crate::connection;
use crate::wire::Role;
use crate::MAX_HANDLERS;

/// Run an encrypt or decrypt daemon until the process is killed.
///
/// # Overview
/// The daemon is the side of the protocol that actually performs the
/// one-time-pad transform. It:
/// 1. Binds the operator-chosen port on all interfaces
/// 2. Accepts client connections in a single loop
/// 3. Hands each connection to an isolated handler task that owns it
/// 4. Rejects clients of the opposite role during the handshake
///
/// # Concurrency
/// Up to [`MAX_HANDLERS`] handlers run at the same time. A permit is taken
/// before each accept, so when all handlers are busy further clients queue in
/// the listen backlog instead of being dropped. Handler tasks never share
/// state; a slow or stalled client blocks only its own handler.
///
/// # Errors
/// Returns an error only if bind fails at startup. A failed accept is logged
/// and the loop continues; handler failures are logged by the handler task.
pub async fn run(role: Role, port: u16) -> Result<(), Box<dyn Error + Send + Sync>> {
    let daemon = Daemon::bind(role, port).await?;
    println!("Server listening on {}", daemon.local_addr()?);
    daemon.serve().await
}

/// A bound listener plus the role it serves.
///
/// Binding and serving are separate so tests can bind port 0 and discover
/// the assigned port before the accept loop starts.
pub struct Daemon {
    role: Role,
    listener: TcpListener,
    permits: Arc<Semaphore>,
}

impl Daemon {
    /// Binds `0.0.0.0:port`. Failure here aborts daemon startup.
    pub async fn bind(role: Role, port: u16) -> io::Result<Self> {
        let bind_addr = format!("0.0.0.0:{}", port);
        debug!("attempting to bind to {}", bind_addr);
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("{:?} daemon bound to {}", role, listener.local_addr()?);

        Ok(Daemon {
            role,
            listener,
            permits: Arc::new(Semaphore::new(MAX_HANDLERS)),
        })
    }

    /// The address the listener actually bound.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections forever, spawning one handler task per client.
    pub async fn serve(self) -> Result<(), Box<dyn Error + Send + Sync>> {
        loop {
            // Admission control: hold a permit for the lifetime of the
            // handler. With all permits taken, accept waits and new clients
            // queue in the listen backlog.
            let permit = self.permits.clone().acquire_owned().await?;

            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    info!("client connected: {}", addr);
                    let role = self.role;
                    tokio::spawn(async move {
                        if let Err(e) = connection::handle(stream, role).await {
                            eprintln!("SERVER: error handling {}: {}", addr, e);
                        }
                        drop(permit);
                    });
                }
                Err(e) => {
                    eprintln!("SERVER: error on accept: {}", e);
                }
            }
        }
    }
}
