// Generic SHA-2 crypt routines.
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>. This file may not be copied,
// modified, or distributed except according to the terms of this
// license.
//
// The SHA-crypt procedure is identical for the SHA-256 and SHA-512
// schemes up to the digest size, the output permutation and the magic
// prefix, so everything here is parametric in the digest type. The
// per-step comments refer to the numbering of the reference document.

use std::cmp::min;
use std::num::IntErrorKind;

use sha2::digest::{Digest, FixedOutputReset};
use zeroize::Zeroize;

use crate::enc_dec::crypt_hash64_encode;
use crate::error::Error;
use crate::parse::{self, HashIterator};
use crate::{HashSetup, Result};

/// Minimum rounds.
pub const MIN_ROUNDS: u32 = 1000;
/// Maximum rounds.
pub const MAX_ROUNDS: u32 = 999_999_999;
/// Default number of rounds.
pub const DEFAULT_ROUNDS: u32 = 5000;
/// Maximum (and default) salt length.
pub const MAX_SALT_LEN: usize = 16;

pub fn sha2_crypt<D: Digest + FixedOutputReset>(
    pass: &[u8],
    salt: &str,
    rounds: Option<u32>,
    new_digest: fn() -> D,
    trn_table: &[u8],
    magic: &str,
) -> Result<String> {
    let mut dgst = new_digest();
    let dsize = <D as Digest>::output_size();
    assert_eq!(trn_table.len(), dsize, "permutation table doesn't cover the digest");
    let sbytes = salt.as_bytes();
    let plen = pass.len();

    // digest B (steps 4-8)
    Digest::update(&mut dgst, pass);
    Digest::update(&mut dgst, sbytes);
    Digest::update(&mut dgst, pass);
    let mut hash_b = dgst.finalize_reset();

    // digest A (steps 1-12): key and salt, B replayed for each key-sized
    // block, then B or the key per bit of the key length
    Digest::update(&mut dgst, pass);
    Digest::update(&mut dgst, sbytes);
    let mut p = plen;
    while p > 0 {
        Digest::update(&mut dgst, &hash_b[..min(p, dsize)]);
        if p < dsize {
            break;
        }
        p -= dsize;
    }
    p = plen;
    while p > 0 {
        match p & 1 {
            0 => Digest::update(&mut dgst, pass),
            _ => Digest::update(&mut dgst, &hash_b[..dsize]),
        }
        p >>= 1;
    }
    let mut hash_a = dgst.finalize_reset();

    // digest DP and sequence P (steps 13-16)
    for _ in 0..plen {
        Digest::update(&mut dgst, pass);
    }
    hash_b = dgst.finalize_reset();
    let mut seq_p = Vec::<u8>::with_capacity(plen);
    p = plen;
    while p > 0 {
        seq_p.extend(&hash_b[..min(p, dsize)]);
        if p < dsize {
            break;
        }
        p -= dsize;
    }

    // digest DS and sequence S (steps 17-20)
    for _ in 0..MAX_SALT_LEN + (hash_a[0] as usize) {
        Digest::update(&mut dgst, sbytes);
    }
    hash_b = dgst.finalize_reset();
    let mut seq_s = Vec::<u8>::with_capacity(MAX_SALT_LEN);
    seq_s.extend(&hash_b[..sbytes.len()]);

    // iterative mixing (step 21)
    for r in 0..rounds.unwrap_or(DEFAULT_ROUNDS) {
        if r % 2 == 1 {
            Digest::update(&mut dgst, &seq_p[..]);
        } else {
            Digest::update(&mut dgst, &hash_a[..dsize]);
        }
        if r % 3 > 0 {
            Digest::update(&mut dgst, &seq_s[..]);
        }
        if r % 7 > 0 {
            Digest::update(&mut dgst, &seq_p[..]);
        }
        if r % 2 == 1 {
            Digest::update(&mut dgst, &hash_a[..dsize]);
        } else {
            Digest::update(&mut dgst, &seq_p[..]);
        }
        hash_a = dgst.finalize_reset();
    }

    let mut trn = vec![0u8; dsize];
    for (i, &ti) in trn_table.iter().enumerate() {
        trn[i] = hash_a[ti as usize];
    }
    let checksum = crypt_hash64_encode(&trn);

    trn.zeroize();
    hash_a.as_mut_slice().zeroize();
    hash_b.as_mut_slice().zeroize();
    seq_p.zeroize();
    seq_s.zeroize();

    Ok(match rounds {
        Some(rounds) => format!("{}rounds={}${}${}", magic, rounds, salt, checksum),
        None => format!("{}{}${}", magic, salt, checksum),
    })
}

const MAGIC_LEN: usize = 3;

fn parse_rounds(rounds_str: &str) -> Result<u32> {
    match rounds_str.parse::<u64>() {
        Ok(rounds) => Ok(min(rounds, u64::from(MAX_ROUNDS)) as u32),
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow) => Ok(MAX_ROUNDS),
        Err(_) => Err(Error::InvalidRounds),
    }
}

pub fn parse_sha2_hash<'a>(hash: &'a str, magic: &str) -> Result<HashSetup<'a>> {
    let mut hs = parse::HashSlice::new(hash);
    if hs.take(MAGIC_LEN).unwrap_or("X") != magic {
        return Err(Error::InvalidHashString);
    }
    // a salt string consisting of the magic alone denotes an empty salt
    let maybe_rounds = hs.take_until(b'$').unwrap_or("");
    let rounds = if let Some(rounds_str) = maybe_rounds.strip_prefix("rounds=") {
        Some(parse_rounds(rounds_str)?)
    } else {
        None
    };
    let salt = if rounds.is_none() {
        maybe_rounds
    } else if let Some(salt) = hs.take_until(b'$') {
        salt
    } else {
        return Err(Error::InvalidHashString);
    };
    Ok(HashSetup {
        salt: Some(salt),
        rounds,
    })
}

pub fn sha2_hash_with(
    param: HashSetup,
    pass: &[u8],
    hf: fn(&[u8], &str, Option<u32>) -> Result<String>,
) -> Result<String> {
    let rounds = param.rounds.map(|r| r.clamp(MIN_ROUNDS, MAX_ROUNDS));
    if let Some(salt) = param.salt {
        let salt = if salt.len() <= MAX_SALT_LEN {
            salt
        } else if let Some(truncated_salt) = parse::HashSlice::new(salt).take(MAX_SALT_LEN) {
            truncated_salt
        } else {
            return Err(Error::InvalidHashString);
        };
        hf(pass, salt, rounds)
    } else {
        let salt = crate::random::gen_salt_str(MAX_SALT_LEN);
        hf(pass, &salt, rounds)
    }
}

#[cfg(test)]
mod tests {
    use super::parse_sha2_hash;
    use crate::error::Error;

    #[test]
    fn parse_full() {
        let hs = parse_sha2_hash("$6$rounds=11531$G/gkPn17kHYo0gTF$ignored", "$6$").unwrap();
        assert_eq!(hs.salt, Some("G/gkPn17kHYo0gTF"));
        assert_eq!(hs.rounds, Some(11531));
    }

    #[test]
    fn parse_implicit_rounds() {
        let hs = parse_sha2_hash("$6$saltstring", "$6$").unwrap();
        assert_eq!(hs.salt, Some("saltstring"));
        assert_eq!(hs.rounds, None);
    }

    #[test]
    fn parse_zero_rounds() {
        // accepted here; coerced to the minimum before hashing
        let hs = parse_sha2_hash("$6$rounds=0$salt", "$6$").unwrap();
        assert_eq!(hs.rounds, Some(0));
    }

    #[test]
    fn parse_overlong_rounds() {
        let hs = parse_sha2_hash("$6$rounds=1000000000000$salt", "$6$").unwrap();
        assert_eq!(hs.rounds, Some(super::MAX_ROUNDS));
        let hs = parse_sha2_hash("$6$rounds=99999999999999999999999$salt", "$6$").unwrap();
        assert_eq!(hs.rounds, Some(super::MAX_ROUNDS));
    }

    #[test]
    fn parse_bad_magic() {
        assert!(matches!(
            parse_sha2_hash("$5$rounds=1000$salt", "$6$"),
            Err(Error::InvalidHashString)
        ));
        assert!(matches!(parse_sha2_hash("$6", "$6$"), Err(Error::InvalidHashString)));
    }

    #[test]
    fn parse_unterminated_rounds() {
        assert!(matches!(
            parse_sha2_hash("$6$rounds=1000", "$6$"),
            Err(Error::InvalidHashString)
        ));
    }

    #[test]
    fn parse_malformed_rounds() {
        assert!(matches!(
            parse_sha2_hash("$6$rounds=123x$salt", "$6$"),
            Err(Error::InvalidRounds)
        ));
        assert!(matches!(
            parse_sha2_hash("$6$rounds=$salt", "$6$"),
            Err(Error::InvalidRounds)
        ));
    }

    #[test]
    fn parse_empty_salt() {
        let hs = parse_sha2_hash("$6$", "$6$").unwrap();
        assert_eq!(hs.salt, Some(""));
        let hs = parse_sha2_hash("$6$rounds=1000$", "$6$").unwrap();
        assert_eq!(hs.salt, Some(""));
        assert_eq!(hs.rounds, Some(1000));
    }
}
