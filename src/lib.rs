pub mod cipher;
pub mod commands;
pub mod connection;
pub mod validate;
pub mod wire;

/// Size of each read from a socket while accumulating a transmission.
pub const BUFFER_SIZE: usize = 1024;
/// Maximum size of a single transmission, tag and sentinels included.
pub const MAX_TRANSMISSION: usize = 262_144;
/// Number of connection handlers allowed to run at the same time.
pub const MAX_HANDLERS: usize = 5;

/// Clients only ever talk to daemons on the same machine.
pub const LOCAL_HOST: &str = "127.0.0.1";
