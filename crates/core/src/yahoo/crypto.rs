/// Plain repeating key XOR. Applying it twice with the same key gives back the input
///
/// An empty key produces an empty output.
pub fn crypt(key: &[u8], buf: &[u8]) -> Vec<u8> {
    key.iter()
        .cycle()
        .zip(buf)
        .map(|(key, byte)| byte ^ key)
        .collect()
}

/// Decode a message payload the way the Yahoo! Messenger client does
///
/// Bytes with the high bit set cannot be decoded and are dropped, but they still consume a
/// position of the key.
pub fn decode_payload(key: &[u8], buf: &[u8]) -> String {
    key.iter()
        .cycle()
        .zip(buf)
        .filter(|(_, byte)| **byte < 0x80)
        .map(|(key, byte)| char::from(byte ^ key))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crypt_roundtrip() {
        let plain = b"Are we still on for lunch tomorrow?";
        let key = b"alice_1979";

        let encrypted = crypt(key, &plain[..]);
        assert_ne!(&encrypted[..], &plain[..]);
        let decrypted = crypt(key, &encrypted[..]);
        assert_eq!(&decrypted[..], &plain[..]);
    }

    #[test]
    fn test_crypt_zeros_reveal_key() {
        let zeros: [u8; 7] = [0; 7];
        assert_eq!(crypt(b"abc", &zeros[..]), b"abcabca".to_vec());
    }

    #[test]
    fn test_decode_inverts_crypt() {
        let plain = "see you at 8 :)";
        let key = b"bob";

        let encrypted = crypt(key, plain.as_bytes());
        assert_eq!(decode_payload(key, &encrypted), plain);
    }

    #[test]
    fn test_decode_skips_high_bytes_but_advances_key() {
        let key = b"ab";
        let payload = [b'h' ^ b'a', 0xff, b'i' ^ b'a', b'!' ^ b'b'];
        assert_eq!(decode_payload(key, &payload), "hi!");
    }

    #[test]
    fn test_empty_key() {
        assert!(crypt(b"", b"data").is_empty());
        assert_eq!(decode_payload(b"", b"data"), "");
    }
}
