//! # Commands Module
//!
//! This module contains the command handlers for padwire:
//!
//! ## `keygen`
//! Writes a random key of the requested length to stdout.
//!
//! ## `daemon`
//! Runs an encrypt or decrypt daemon on a port:
//! - Binds and listens, accepting connections forever
//! - Dispatches each connection to its own handler task
//! - Caps concurrently running handlers, queuing the rest in the backlog
//!
//! ## `client`
//! Runs an encrypt or decrypt client against a local daemon:
//! - Validates the text and key files before touching the network
//! - Sends one tagged transmission and awaits one response
//! - Reports a rejection when it reached a daemon of the opposite role

pub mod client;
pub mod daemon;
pub mod keygen;
