use std::io::{self, BufWriter, Write};

use rand::Rng;
use thiserror::Error;

use crate::cipher::{self, ALPHABET_LEN};

/// Largest key a single invocation will generate.
pub const MAX_KEY_LENGTH: u64 = 2_000_000_000;

/// The length argument was not an integer in `[1, MAX_KEY_LENGTH]`.
#[derive(Debug, Error)]
#[error("key length must be an integer between 1 and {MAX_KEY_LENGTH}, got {argument:?}")]
pub struct BadLength {
    pub argument: String,
}

/// Parses and range-checks the key length argument.
pub fn parse_length(argument: &str) -> Result<u64, BadLength> {
    match argument.parse::<u64>() {
        Ok(length) if (1..=MAX_KEY_LENGTH).contains(&length) => Ok(length),
        _ => Err(BadLength {
            argument: argument.to_string(),
        }),
    }
}

/// Generate a key of `length` random symbols plus a trailing newline on
/// stdout. Randomness does not need to be cryptographic.
pub fn run(argument: &str) -> Result<(), Box<dyn std::error::Error>> {
    let length = parse_length(argument)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_key(&mut out, length)?;
    out.flush()?;
    Ok(())
}

/// Streams `length` random symbols and a newline into `out`.
///
/// Writes one symbol at a time so a maximum-length key never has to be held
/// in memory; callers wrap `out` in a [`BufWriter`].
pub fn write_key<W: Write>(out: &mut W, length: u64) -> io::Result<()> {
    let mut rng = rand::rng();

    for _ in 0..length {
        let symbol: u8 = rng.random_range(0..ALPHABET_LEN);
        out.write_all(&[cipher::from_symbol(symbol)])?;
    }
    out.write_all(b"\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_length_accepts_range() {
        assert_eq!(parse_length("1").unwrap(), 1);
        assert_eq!(parse_length("256").unwrap(), 256);
        assert_eq!(parse_length("2000000000").unwrap(), 2_000_000_000);
    }

    #[test]
    fn parse_length_rejects_bad_arguments() {
        for bad in ["0", "-5", "2000000001", "ten", "", "12.5"] {
            assert!(parse_length(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn key_has_requested_length_plus_newline() {
        let mut out = Vec::new();
        write_key(&mut out, 256).unwrap();
        assert_eq!(out.len(), 257);
        assert_eq!(out.last(), Some(&b'\n'));
    }

    #[test]
    fn key_stays_in_alphabet() {
        let mut out = Vec::new();
        write_key(&mut out, 2000).unwrap();
        assert!(out[..2000].iter().all(|&b| cipher::is_symbol(b)));
    }

    #[test]
    fn long_keys_eventually_use_every_symbol() {
        let mut out = Vec::new();
        write_key(&mut out, 10_000).unwrap();
        let key = &out[..10_000];
        for symbol in 0..ALPHABET_LEN {
            let byte = cipher::from_symbol(symbol);
            assert!(key.contains(&byte), "symbol {:?} never generated", byte as char);
        }
    }
}
