//! Client-side validation of text and key files.
//!
//! Files are checked before any socket opens, so a conforming client never
//! puts an out-of-alphabet byte on the wire and the daemons can trust what
//! they receive.

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

use crate::cipher;

/// Why a text or key file was refused. Every variant names the file so the
/// operator knows which of the two inputs is at fault.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("{file} does not exist")]
    Missing { file: String },
    #[error("could not open {file}: {source}")]
    Unreadable {
        file: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid character in {file} at byte {position}")]
    IllegalCharacter { file: String, position: usize },
}

/// Reads `path`, strips the trailing newline, and confirms every remaining
/// byte is in the 27-character alphabet. Returns the cleaned contents.
pub fn validate(path: &Path) -> Result<Vec<u8>, ValidateError> {
    let file = path.display().to_string();

    let mut contents = fs::read(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ValidateError::Missing { file: file.clone() }
        } else {
            ValidateError::Unreadable {
                file: file.clone(),
                source,
            }
        }
    })?;

    // Key and text files conventionally end in a single newline; it is not
    // part of the message.
    if contents.last() == Some(&b'\n') {
        contents.pop();
    }

    for (position, &byte) in contents.iter().enumerate() {
        if !cipher::is_symbol(byte) {
            return Err(ValidateError::IllegalCharacter { file, position });
        }
    }

    Ok(contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn fixture(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file
    }

    #[test]
    fn accepts_alphabet_and_strips_newline() {
        let file = fixture(b"HELLO WORLD\n");
        assert_eq!(validate(file.path()).unwrap(), b"HELLO WORLD");
    }

    #[test]
    fn accepts_file_without_trailing_newline() {
        let file = fixture(b"ABC XYZ");
        assert_eq!(validate(file.path()).unwrap(), b"ABC XYZ");
    }

    #[test]
    fn rejects_lowercase() {
        let file = fixture(b"HELLO world\n");
        match validate(file.path()) {
            Err(ValidateError::IllegalCharacter { position, .. }) => {
                assert_eq!(position, 6);
            }
            other => panic!("expected IllegalCharacter, got {:?}", other),
        }
    }

    #[test]
    fn rejects_punctuation() {
        let file = fixture(b"HELLO, WORLD\n");
        assert!(matches!(
            validate(file.path()),
            Err(ValidateError::IllegalCharacter { position: 5, .. })
        ));
    }

    #[test]
    fn error_names_the_file() {
        let file = fixture(b"BAD!\n");
        let err = validate(file.path()).unwrap_err();
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn missing_file() {
        let result = validate(Path::new("no_such_key_file"));
        assert!(matches!(result, Err(ValidateError::Missing { .. })));
    }

    #[test]
    fn interior_newline_is_illegal() {
        let file = fixture(b"AB\nCD\n");
        assert!(matches!(
            validate(file.path()),
            Err(ValidateError::IllegalCharacter { position: 2, .. })
        ));
    }
}
