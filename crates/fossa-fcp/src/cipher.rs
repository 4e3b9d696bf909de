//! Encrypted section handling.
//!
//! Private commands carry their optional data inside an encrypted section:
//!
//! | Field     | Size (bytes)   | Description                                   |
//! |-----------|----------------|-----------------------------------------------|
//! | length    | 1              | `opt_data_len + password_len`                 |
//! | password  | password_len   | Station password, checked on decode           |
//! | opt_data  | opt_data_len   | Command payload                               |
//! | padding   | 1 ..= 16       | Random bytes up to the next 16-byte boundary  |
//!
//! The block cipher itself is pluggable through [`SectionCipher`]. The
//! ground station firmware ships with the cipher disabled, which is what
//! [`PassthroughCipher`] reproduces.

use rand::Rng;

/// Cipher block size the encrypted section is aligned to.
pub const BLOCK_SIZE: usize = 16;

/// Block cipher applied in place to a whole encrypted section.
///
/// Implementations receive a buffer whose length is a multiple of
/// [`BLOCK_SIZE`].
pub trait SectionCipher {
    /// Encrypt `section` in place.
    fn encrypt(&self, key: &[u8], section: &mut [u8]);

    /// Decrypt `section` in place.
    fn decrypt(&self, key: &[u8], section: &mut [u8]);
}

/// Identity cipher.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughCipher;

impl SectionCipher for PassthroughCipher {
    fn encrypt(&self, _key: &[u8], _section: &mut [u8]) {}

    fn decrypt(&self, _key: &[u8], _section: &mut [u8]) {}
}

/// Shared key and password that select the encrypted path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credentials<'a> {
    /// Cipher key.
    pub key: &'a [u8],
    /// Station password, embedded in clear text inside the section.
    pub password: &'a str,
}

impl<'a> Credentials<'a> {
    /// Bundle a key and a password.
    pub fn new(key: &'a [u8], password: &'a str) -> Self {
        Credentials { key, password }
    }

    /// Password bytes as written on the wire.
    pub fn password_bytes(&self) -> &'a [u8] {
        self.password.as_bytes()
    }
}

/// Number of padding bytes appended to a section of `unpadded_len` bytes.
///
/// Always between 1 and [`BLOCK_SIZE`]: an already aligned section still
/// receives a full block of padding.
pub fn padding_len(unpadded_len: usize) -> usize {
    BLOCK_SIZE - (unpadded_len % BLOCK_SIZE)
}

/// Build the plaintext section `[len][password][opt_data][padding]`.
///
/// The length byte wraps like the single byte it is stored in. Padding bytes
/// are drawn from `rng` and never checked on decode.
pub fn build_section<R: Rng>(password: &[u8], opt_data: &[u8], rng: &mut R) -> Vec<u8> {
    let unpadded_len = 1 + password.len() + opt_data.len();
    let padding = padding_len(unpadded_len);

    let mut section = Vec::with_capacity(unpadded_len + padding);
    section.push((opt_data.len() + password.len()) as u8);
    section.extend_from_slice(password);
    section.extend_from_slice(opt_data);

    let mut pad = vec![0u8; padding];
    rng.fill(pad.as_mut_slice());
    section.extend_from_slice(&pad);

    section
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Toy cipher that flips every bit, enough to prove the seam is used.
    struct InvertCipher;

    impl SectionCipher for InvertCipher {
        fn encrypt(&self, _key: &[u8], section: &mut [u8]) {
            section.iter_mut().for_each(|b| *b = !*b);
        }

        fn decrypt(&self, key: &[u8], section: &mut [u8]) {
            self.encrypt(key, section);
        }
    }

    #[test]
    fn test_padding_len() {
        assert_eq!(padding_len(1), 15);
        assert_eq!(padding_len(15), 1);
        assert_eq!(padding_len(16), 16);
        assert_eq!(padding_len(17), 15);
    }

    #[test]
    fn test_padding_always_aligns() {
        for password_len in 0..40 {
            for opt_len in 0..=255usize {
                let unpadded = 1 + password_len + opt_len;
                let total = unpadded + padding_len(unpadded);
                assert!(total > 0);
                assert_eq!(total % BLOCK_SIZE, 0);
            }
        }
    }

    #[test]
    fn test_build_section_layout() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let section = build_section(b"secret", &[1, 2, 3], &mut rng);

        assert_eq!(section.len(), 16);
        assert_eq!(section[0], 9);
        assert_eq!(&section[1..7], b"secret");
        assert_eq!(&section[7..10], &[1, 2, 3]);
    }

    #[test]
    fn test_passthrough_is_identity() {
        let mut section = vec![0xA5; 32];
        PassthroughCipher.encrypt(b"key", &mut section);
        PassthroughCipher.decrypt(b"key", &mut section);
        assert_eq!(section, vec![0xA5; 32]);
    }

    #[test]
    fn test_custom_cipher_roundtrip() {
        let mut section = vec![1, 2, 3, 4];
        InvertCipher.encrypt(&[], &mut section);
        assert_eq!(section, vec![0xFE, 0xFD, 0xFC, 0xFB]);
        InvertCipher.decrypt(&[], &mut section);
        assert_eq!(section, vec![1, 2, 3, 4]);
    }
}
