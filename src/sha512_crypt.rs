//! SHA-512 based hash.
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>. This file may not be copied,
// modified, or distributed except according to the terms of this
// license.
//!
//! This algorithm was developed as an alternative to bcrypt
//! with NIST-approved hashing functions. It is similar to
//! MD5-crypt, but has a variable number of rounds and a larger
//! salt.
//!
//! # Example
//!
//! ```
//! use shacrypt::sha512_crypt;
//!
//! let h =
//!     "$6$G/gkPn17kHYo0gTF$xhDFU0QYExdMH2ghOWKrrVtu1BuTpNMSJ\
//!      URCXk43.EYekmK8iwV6RNqftUUC8mqDel1J7m3JEbUkbu4YyqSyv/";
//! assert_eq!(sha512_crypt::hash_with(h, "test").unwrap(), h);
//! ```
//!
//! # Parameters
//!
//! * __Password length__: unlimited.
//!
//! * __Salt length__: 0 to 16 characters. Default is 16.
//!
//! * __Rounds__: 1000 to 999999999. Default is 5000. If a number
//!   outside of the range is chosen, it is coerced to the nearest
//!   limit.
//!
//! # Hash Format
//!
//! The format of the hash is
//! __`$6$rounds=`__*`{rounds}`*__$__*`{salt}`*__$__*`{checksum}`*, where:
//!
//! * *`{rounds}`* is the number of rounds, encoded as a decimal number
//!   without leading zeroes.
//!
//! * *`{salt}`* is the salt string.
//!
//! * *`{checksum}`* is a 86-character Base64 encoding of the checksum.
//!
//! The format __`$6$`__*`{salt}`*__$__*`{checksum}`* can be used if
//! the default number of rounds is chosen. A `rounds` field is always
//! written out when the caller supplies one, even if it equals the
//! default.

use std::str;

use sha2::Sha512;

use crate::enc_dec::crypt_hash64_encode;
use crate::error::Error;
use crate::sha2_crypt::{parse_sha2_hash, sha2_crypt, sha2_hash_with};
use crate::{consteq, random, HashSetup, IntoHashSetup, Result};

pub use crate::sha2_crypt::DEFAULT_ROUNDS;
pub use crate::sha2_crypt::MAX_ROUNDS;
pub use crate::sha2_crypt::MAX_SALT_LEN;
pub use crate::sha2_crypt::MIN_ROUNDS;

const SHA512_MAGIC: &str = "$6$";
// Digest indices in the order consumed by the encoder: the first output
// group packs bytes 42, 21, 0 of the final digest into one little-endian
// word, and so on; byte 63 rides alone in the two trailing characters.
const SHA512_TRANSPOSE: &[u8] = b"\x2a\x15\x00\x01\x2b\x16\x17\x02\x2c\x2d\x18\x03\x04\x2e\x19\x1a\
                                  \x05\x2f\x30\x1b\x06\x07\x31\x1c\x1d\x08\x32\x33\x1e\x09\x0a\x34\
                                  \x1f\x20\x0b\x35\x36\x21\x0c\x0d\x37\x22\x23\x0e\x38\x39\x24\x0f\
                                  \x10\x3a\x25\x26\x11\x3b\x3c\x27\x12\x13\x3d\x28\x29\x14\x3e\x3f";

fn do_sha512_crypt(pass: &[u8], salt: &str, rounds: Option<u32>) -> Result<String> {
    sha2_crypt(pass, salt, rounds, Sha512::default, SHA512_TRANSPOSE, SHA512_MAGIC)
}

/// Hash a password with a randomly generated salt and the default
/// number of rounds.
pub fn hash<B: AsRef<[u8]>>(pass: B) -> Result<String> {
    let saltstr = random::gen_salt_str(MAX_SALT_LEN);
    do_sha512_crypt(pass.as_ref(), &saltstr, None)
}

fn parse_sha512_hash(hash: &str) -> Result<HashSetup> {
    parse_sha2_hash(hash, SHA512_MAGIC)
}

/// Hash a password with user-provided parameters.
///
/// If the `param` argument is a `&str`, it must be in the final hash
/// format. The number of rounds and the salt are parsed out of that value.
/// If the salt is too long, it is truncated to maximum length. An
/// out-of-range rounds value will be coerced into the allowed range, and
/// recorded in the resulting hash string.
pub fn hash_with<'a, IHS, B>(param: IHS, pass: B) -> Result<String>
where
    IHS: IntoHashSetup<'a>,
    B: AsRef<[u8]>,
{
    sha2_hash_with(IHS::into_hash_setup(param, parse_sha512_hash)?, pass.as_ref(), do_sha512_crypt)
}

/// Hash a password, deriving the salt string from raw bytes.
///
/// The salt bytes are run through the base64 encoder to produce the salt
/// string, which is then used as in [`hash_with`]; 12 bytes of input
/// yield a full-length 16-character salt, and a longer encoding is
/// truncated. This is the natural entry point when the salt comes from
/// an entropy source rather than an existing hash string.
pub fn hash_with_salt_bytes<B: AsRef<[u8]>>(pass: B, salt: &[u8], rounds: Option<u32>) -> Result<String> {
    let saltstr = crypt_hash64_encode(salt);
    sha2_hash_with(
        HashSetup {
            salt: Some(&saltstr),
            rounds,
        },
        pass.as_ref(),
        do_sha512_crypt,
    )
}

/// Hash a password with a salt used verbatim.
///
/// At most the first 16 bytes of the salt are significant. The salt is
/// conventionally drawn from the base64 alphabet, but any bytes which can
/// be carried in a hash string are accepted; bytes which can't (invalid
/// UTF-8) produce an `EncodingError`.
pub fn hash_with_raw_salt<B: AsRef<[u8]>>(pass: B, salt: &[u8], rounds: Option<u32>) -> Result<String> {
    let salt = &salt[..salt.len().min(MAX_SALT_LEN)];
    let salt = str::from_utf8(salt).map_err(|_| Error::EncodingError)?;
    sha2_hash_with(
        HashSetup {
            salt: Some(salt),
            rounds,
        },
        pass.as_ref(),
        do_sha512_crypt,
    )
}

/// Verify that the hash corresponds to a password.
pub fn verify<B: AsRef<[u8]>>(pass: B, hash: &str) -> bool {
    consteq(hash, hash_with(hash, pass))
}
