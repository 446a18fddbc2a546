// Encoding routines.
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>. This file may not be copied,
// modified, or distributed except according to the terms of this
// license.

use std::char;

const CRYPT_HASH64: &[u8] = b"./0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Encode a byte string into the crypt base64 alphabet.
///
/// Each group of three input bytes is packed little-endian into a 24-bit
/// word, and the word is emitted as four characters, lowest sextet first.
/// A 2-byte tail yields three characters, a 1-byte tail two. This is the
/// encoding used by the SHA-crypt family of hashes; it is not
/// RFC 4648-compatible.
///
/// The first byte of each group lands in the low sextets, so it governs
/// the first output character of the group. The digest permutation tables
/// are written in this consumption order: where the scheme description
/// lists a triple high-byte-first, the table lists the same indices
/// reversed.
pub fn crypt_hash64_encode(bs: &[u8]) -> String {
    let ngroups = (bs.len() + 2) / 3;
    let mut out = String::with_capacity(ngroups * 4);
    for g in 0..ngroups {
        let mut g_idx = g * 3;
        let mut enc = 0u32;
        for _ in 0..3 {
            let b = (if g_idx < bs.len() { bs[g_idx] } else { 0 }) as u32;
            enc >>= 8;
            enc |= b << 16;
            g_idx += 1;
        }
        for _ in 0..4 {
            out.push(char::from_u32(CRYPT_HASH64[(enc & 0x3F) as usize] as u32).unwrap());
            enc >>= 6;
        }
    }
    match bs.len() % 3 {
        1 => {
            out.pop();
            out.pop();
        }
        2 => {
            out.pop();
        }
        _ => (),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::crypt_hash64_encode;

    #[test]
    fn output_lengths() {
        assert_eq!(crypt_hash64_encode(b""), "");
        for len in 1..=9 {
            let encoded = crypt_hash64_encode(&vec![0u8; len]);
            assert_eq!(encoded.len(), (len * 8 + 5) / 6);
        }
    }

    #[test]
    fn full_groups() {
        assert_eq!(crypt_hash64_encode(&[0, 0, 0]), "....");
        assert_eq!(crypt_hash64_encode(&[0xff, 0xff, 0xff]), "zzzz");
        // w = 0x030201; sextets 1, 8, 48, 0 from the low end
        assert_eq!(crypt_hash64_encode(&[1, 2, 3]), "/6k.");
    }

    #[test]
    fn tails() {
        // one leftover byte: sextets b & 63 and b >> 6
        assert_eq!(crypt_hash64_encode(&[0x41]), "//");
        // two leftover bytes: a 16-bit word, three sextets
        assert_eq!(crypt_hash64_encode(&[0x41, 0x42]), "/72");
    }
}
