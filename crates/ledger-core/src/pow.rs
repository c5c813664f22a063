use crate::Hash;

/// Number of leading `'0'` characters in the lowercase hex form of `hash`.
pub fn count_leading_zero_nibbles(hash: &Hash) -> u32 {
    let mut total = 0u32;
    for b in hash {
        if *b == 0 {
            total += 2;
        } else {
            if *b < 0x10 {
                total += 1;
            }
            break;
        }
    }
    total
}

/// A hash is acceptable under difficulty `d` iff its hex form starts with at
/// least `d` zeros.
pub fn meets_difficulty(hash: &Hash, difficulty: u32) -> bool {
    count_leading_zero_nibbles(hash) >= difficulty
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex_zeros(hash: &Hash) -> u32 {
        hex::encode(hash).chars().take_while(|c| *c == '0').count() as u32
    }

    #[test]
    fn leading_zero_nibble_examples() {
        let mut h = [0u8; 32];
        assert_eq!(count_leading_zero_nibbles(&h), 64);
        h[0] = 0x0F;
        assert_eq!(count_leading_zero_nibbles(&h), 1);
        h[0] = 0xF0;
        assert_eq!(count_leading_zero_nibbles(&h), 0);
        h = [0u8; 32];
        h[1] = 0x80;
        assert_eq!(count_leading_zero_nibbles(&h), 2);
        h[1] = 0x08;
        assert_eq!(count_leading_zero_nibbles(&h), 3);
    }

    #[test]
    fn agrees_with_hex_rendering() {
        for first in 0..=255u8 {
            for second in [0u8, 0x01, 0x10, 0xff] {
                let mut h = [0xaau8; 32];
                h[0] = first;
                h[1] = second;
                assert_eq!(count_leading_zero_nibbles(&h), hex_zeros(&h));
            }
        }
    }

    #[test]
    fn difficulty_thresholds() {
        let mut h = [0xffu8; 32];
        h[0] = 0x0a;
        assert!(meets_difficulty(&h, 0));
        assert!(meets_difficulty(&h, 1));
        assert!(!meets_difficulty(&h, 2));

        h[0] = 0xa0;
        assert!(meets_difficulty(&h, 0));
        for d in 1..8 {
            assert!(!meets_difficulty(&h, d));
        }

        assert!(meets_difficulty(&[0u8; 32], 64));
        assert!(!meets_difficulty(&[0u8; 32], 65));
    }
}
