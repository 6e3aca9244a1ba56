/// The cipher's alphabet: the 26 uppercase letters plus SPACE, treated as
/// the integers 0..=26 with SPACE mapped to 26.
pub const ALPHABET_LEN: u8 = 27;

/// Symbol value assigned to the SPACE character.
pub const SPACE_SYMBOL: u8 = 26;

/// Returns true if `byte` belongs to the 27-character alphabet.
pub fn is_symbol(byte: u8) -> bool {
    byte.is_ascii_uppercase() || byte == b' '
}

/// Maps an alphabet byte to its symbol value (A..Z -> 0..25, SPACE -> 26).
///
/// Input outside the alphabet is rejected upstream by the file validator,
/// so this only needs to be total over the 27 accepted bytes.
fn to_symbol(byte: u8) -> u8 {
    if byte == b' ' {
        SPACE_SYMBOL
    } else {
        byte - b'A'
    }
}

/// Maps a symbol value back to its alphabet byte.
pub fn from_symbol(symbol: u8) -> u8 {
    if symbol == SPACE_SYMBOL {
        b' '
    } else {
        b'A' + symbol
    }
}

/// Encrypt one symbol pair: `(a + b) mod 27`.
fn encrypt_symbol(a: u8, b: u8) -> u8 {
    (a + b) % ALPHABET_LEN
}

/// Decrypt one symbol pair: `(a - b + 27) mod 27`.
fn decrypt_symbol(a: u8, b: u8) -> u8 {
    (a + ALPHABET_LEN - b) % ALPHABET_LEN
}

/// Encrypt `text` against `key`, symbol by symbol, over the alphabet bytes.
///
/// The key must be at least as long as the text; the client enforces this
/// before anything reaches the network. No key byte is ever reused.
pub fn encrypt(text: &[u8], key: &[u8]) -> Vec<u8> {
    text.iter()
        .zip(key.iter())
        .map(|(&t, &k)| from_symbol(encrypt_symbol(to_symbol(t), to_symbol(k))))
        .collect()
}

/// Decrypt `cipher` against `key`, the exact inverse of [`encrypt`].
pub fn decrypt(cipher: &[u8], key: &[u8]) -> Vec<u8> {
    cipher
        .iter()
        .zip(key.iter())
        .map(|(&c, &k)| from_symbol(decrypt_symbol(to_symbol(c), to_symbol(k))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_mapping_is_invertible() {
        for symbol in 0..ALPHABET_LEN {
            let byte = from_symbol(symbol);
            assert!(is_symbol(byte));
            assert_eq!(to_symbol(byte), symbol);
        }
    }

    #[test]
    fn inverse_law_over_all_symbol_pairs() {
        for a in 0..ALPHABET_LEN {
            for b in 0..ALPHABET_LEN {
                let encrypted = encrypt_symbol(a, b);
                assert!(encrypted < ALPHABET_LEN);
                let decrypted = decrypt_symbol(encrypted, b);
                assert!(decrypted < ALPHABET_LEN);
                assert_eq!(decrypted, a, "a={} b={}", a, b);
            }
        }
    }

    #[test]
    fn known_vector_hello_world() {
        let text = b"HELLO WORLD";
        let key = b"XMCKL QRZYV";

        let cipher = encrypt(text, key);
        assert_eq!(&cipher, b"DQNVZZLEPIY");
        assert_eq!(decrypt(&cipher, key), text);
    }

    #[test]
    fn round_trip_with_longer_key() {
        let text = b"THE QUICK BROWN FOX";
        let key = b"LONGER KEY THAN THE TEXT ITSELF";

        let cipher = encrypt(text, key);
        assert_eq!(cipher.len(), text.len());
        assert!(cipher.iter().all(|&b| is_symbol(b)));
        assert_eq!(decrypt(&cipher, key), text);
    }

    #[test]
    fn space_wraps_through_the_alphabet() {
        // SPACE (26) + B (1) wraps to A (0)
        assert_eq!(encrypt(b" ", b"B"), b"A");
        assert_eq!(decrypt(b"A", b"B"), b" ");
    }
}
