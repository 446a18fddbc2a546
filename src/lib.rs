//! SHA-512 `crypt`(3) password hashing.
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>. This file may not be copied,
// modified, or distributed except according to the terms of this
// license.
//!
//! This crate implements the SHA-512 variant of the Unix modular
//! hashing scheme, also known as SHA-crypt or `$6$`. The hashes it
//! produces and verifies are interchangeable with those of __crypt__(3)
//! on any platform which supports the scheme, glibc included.
//!
//! # Getting Started
//!
//! Add the following to the `[dependencies]` section of your `Cargo.toml`:
//!
//! ```toml
//! shacrypt = "0.1"
//! ```
//!
//! # Examples
//!
//! To verify a password against an existing hash:
//!
//! ```
//! use shacrypt::sha512_crypt;
//!
//! let h = "$6$G/gkPn17kHYo0gTF$xhDFU0QYExdMH2ghOWKrrVtu1BuTpNMSJ\
//!          URCXk43.EYekmK8iwV6RNqftUUC8mqDel1J7m3JEbUkbu4YyqSyv/";
//! assert_eq!(sha512_crypt::verify("test", h), true);
//! ```
//!
//! To hash a password with a random salt and the default number of
//! rounds:
//!
//! ```
//! use shacrypt::sha512_crypt;
//!
//! let h = sha512_crypt::hash("password").unwrap();
//! ```
//!
//! The hashing parameters can be customized by passing a [`HashSetup`]
//! struct, or a complete hash string whose salt and rounds fields will
//! be reused, to [`hash_with`](sha512_crypt::hash_with). See the
//! [`sha512_crypt`] module documentation for the parameter ranges and
//! the remaining entry points.

#![warn(missing_docs)]

mod enc_dec;
pub mod error;
mod sha2_crypt;
pub mod sha512_crypt;

/// Type alias for the Result type.
pub type Result<T> = std::result::Result<T, error::Error>;

/// Setup struct for hashing customization.
///
/// If the salt is set to `None`, a random salt will be generated. A
/// `rounds` value of `None` selects the default number of rounds; an
/// explicit value is coerced into the allowed range and recorded in the
/// output string even when it equals the default.
pub struct HashSetup<'a> {
    /// Custom salt.
    pub salt: Option<&'a str>,
    /// Number of rounds.
    pub rounds: Option<u32>,
}

/// A trait for converting a type into a `HashSetup` struct.
pub trait IntoHashSetup<'a> {
    /// The conversion function.
    fn into_hash_setup(self, f: fn(&'a str) -> Result<HashSetup<'a>>) -> Result<HashSetup<'a>>;
}

impl<'a> IntoHashSetup<'a> for &'a str {
    fn into_hash_setup(self, f: fn(&'a str) -> Result<HashSetup<'a>>) -> Result<HashSetup<'a>> {
        f(self)
    }
}

impl<'a> IntoHashSetup<'a> for HashSetup<'a> {
    fn into_hash_setup(self, _f: fn(&'a str) -> Result<HashSetup<'a>>) -> Result<HashSetup<'a>> {
        Ok(self)
    }
}

fn consteq(hash: &str, calchash: Result<String>) -> bool {
    if calchash.is_err() {
        return false;
    }
    let hstr = calchash.unwrap();
    if hash.len() != hstr.len() {
        return false;
    }
    0 == hash.bytes().zip(hstr.bytes()).fold(0, |xs, (h1, h2)| xs | h1 ^ h2)
}

mod random {
    use crate::enc_dec::crypt_hash64_encode;
    use rand::distributions::Standard;
    use rand::rngs::OsRng;
    use rand::Rng;

    pub fn gen_salt_str(chars: usize) -> String {
        let bytes = ((chars + 3) / 4) * 3;
        let rv = OsRng.sample_iter(&Standard).take(bytes).collect::<Vec<u8>>();
        let mut sstr = crypt_hash64_encode(&rv);
        while sstr.len() > chars {
            sstr.pop();
        }
        sstr
    }
}

mod parse {
    use std::str;

    /// A trait for traversing a hash string.
    ///
    /// Hash strings consist of a concatenation of `$`-delimited
    /// substrings. This trait enables extracting references to those
    /// substrings with the necessary semantics.
    pub trait HashIterator {
        /// The substring that is returned by methods.
        type Elem;

        /// Extract a fixed-size substring.
        ///
        /// There must be <i>at least</i> `n` ASCII characters remaining in the
        /// string. If there are less, `None` is returned. If called with a non-zero
        /// `n`, this method drains the string: if there are exactly `n` characters
        /// remaining, subsequent calls will return `None`.
        ///
        /// Calling `take` with `n` set to zero returns an empty string if the main
        /// string is not drained.
        fn take(&mut self, n: usize) -> Option<Self::Elem>;

        /// Extract a substring delimited by a byte.
        ///
        /// Return a substring from the current position to the next occurrence of the
        /// ASCII delimiter `ac` or the end of the string. If the delimiter is found,
        /// advance the position one byte after it. Drains the string.
        fn take_until(&mut self, ac: u8) -> Option<Self::Elem>;

        /// Returns `true` if the string is not drained.
        fn at_end(&mut self) -> bool;
    }

    pub struct HashSlice<'a> {
        bp: &'a [u8],
        len: usize,
        pos: usize,
    }

    impl<'a> HashSlice<'a> {
        pub fn new(hash: &'a str) -> HashSlice<'a> {
            HashSlice {
                bp: hash.as_bytes(),
                len: hash.len(),
                pos: 0,
            }
        }
    }

    impl<'a> HashIterator for HashSlice<'a> {
        type Elem = &'a str;

        fn take(&mut self, n: usize) -> Option<Self::Elem> {
            if self.pos > self.len {
                return None;
            }
            let sp = self.pos;
            if sp + n > self.len {
                self.pos = self.len + 1;
                None
            } else {
                let endp = self.pos + n;
                self.pos = endp + if endp == self.len { 1 } else { 0 };
                if let Ok(s) = str::from_utf8(&self.bp[sp..endp]) {
                    Some(s)
                } else {
                    None
                }
            }
        }

        fn take_until(&mut self, ac: u8) -> Option<Self::Elem> {
            if self.pos > self.len {
                return None;
            }
            let mut sp = self.pos;
            while sp < self.len {
                if self.bp[sp] == ac {
                    break;
                }
                sp += 1;
            }
            let oldp = self.pos;
            self.pos = sp + 1;
            if let Ok(s) = str::from_utf8(&self.bp[oldp..sp]) {
                Some(s)
            } else {
                None
            }
        }

        fn at_end(&mut self) -> bool {
            self.take(0).unwrap_or("X") == "X"
        }
    }

}
