//! Generation-1 internal index numbering.
//!
//! Generation 1 assigns every species an arbitrary internal byte unrelated to
//! the National dex number; Generations 2-3 store National numbers natively.
//! The forward table below is the single source of truth; the inverse is
//! derived from it at first use so the two can never drift apart.

use once_cell::sync::Lazy;

/// Internal index (1-based) to National dex number. A zero entry is an
/// unassigned slot (MissingNo.); lookups there fail closed.
#[rustfmt::skip]
const INTERNAL_TO_NATIONAL: [u16; 190] = [
    112, 115,  32,  35,  21, 100,  34,  80,   2, 103, 108, 102,  88,  94,  29,  31,
    104, 111, 131,  59, 151, 130,  90,  72,  92, 123, 120,   9, 127, 114,   0,   0,
     58,  95,  22,  16,  79,  64,  75, 113,  67, 122, 106, 107,  24,  47,  54,  96,
     76,   0, 126,   0, 125,  82, 109,   0,  56,  86,  50, 128,   0,   0,   0,  83,
     48, 149,   0,   0,   0,  84,  60, 124, 146, 144, 145, 132,  52,  98,   0,   0,
      0,  37,  38,  25,  26,   0,   0, 147, 148, 140, 141, 116, 117,   0,   0,  27,
     28, 138, 139,  39,  40, 133, 136, 135, 134,  66,  41,  23,  46,  61,  62,  13,
     14,  15,   0,  85,  57,  51,  49,  87,   0,   0,  10,  11,  12,  68,   0,  55,
     97,  42, 150, 143, 129,   0,   0,  89,   0,  99,  91,   0, 101,  36, 110,  53,
    105,   0,  93,  63,  65,  17,  18, 121,   1,   3,  73,   0, 118, 119,   0,   0,
      0,   0,  77,  78,  19,  20,  33,  30,  74, 137, 142,   0,  81,   0,   0,   4,
      7,   5,   8,   6,   0,   0,   0,   0,  43,  44,  45,  69,  70,  71,
];

/// Highest National dex number in Generation 1.
const GEN1_SPECIES_COUNT: usize = 151;

static NATIONAL_TO_INTERNAL: Lazy<[u8; GEN1_SPECIES_COUNT + 1]> = Lazy::new(|| {
    let mut inverse = [0_u8; GEN1_SPECIES_COUNT + 1];
    for (i, &national) in INTERNAL_TO_NATIONAL.iter().enumerate() {
        if national != 0 {
            debug_assert_eq!(inverse[national as usize], 0, "duplicate national id");
            inverse[national as usize] = u8::try_from(i + 1).expect("table fits in a byte");
        }
    }
    inverse
});

/// Translates a Generation-1 internal species byte to its National dex
/// number. `None` for unassigned slots, including zero.
#[must_use]
pub fn internal_to_national(internal: u8) -> Option<u16> {
    let index = (internal as usize).checked_sub(1)?;
    match INTERNAL_TO_NATIONAL.get(index) {
        Some(&0) | None => None,
        Some(&national) => Some(national),
    }
}

/// The exact inverse of [`internal_to_national`]. `None` outside the 151
/// Generation-1 species.
#[must_use]
pub fn national_to_internal(national: u16) -> Option<u8> {
    if national == 0 || national as usize > GEN1_SPECIES_COUNT {
        return None;
    }
    match NATIONAL_TO_INTERNAL[national as usize] {
        0 => None,
        internal => Some(internal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn round_trips_over_the_full_domain() {
        let mut defined = 0;
        for internal in 0..=u8::MAX {
            if let Some(national) = internal_to_national(internal) {
                assert_eq!(national_to_internal(national), Some(internal));
                defined += 1;
            }
        }
        assert_eq!(defined, 151);

        for national in 1..=151 {
            let internal = national_to_internal(national).expect("total over gen-1 dex");
            assert_eq!(internal_to_national(internal), Some(national));
        }
    }

    #[test]
    fn known_anchor_values() {
        assert_eq!(internal_to_national(0x01), Some(112)); // Rhydon
        assert_eq!(internal_to_national(0x15), Some(151)); // Mew
        assert_eq!(internal_to_national(0x54), Some(25)); // Pikachu
        assert_eq!(internal_to_national(0x99), Some(1)); // Bulbasaur
        assert_eq!(internal_to_national(0xB4), Some(6)); // Charizard
    }

    #[test]
    fn fails_closed_outside_the_domain() {
        assert_eq!(internal_to_national(0x00), None);
        assert_eq!(internal_to_national(0x1F), None); // MissingNo. slot
        assert_eq!(internal_to_national(0xBF), None); // past the table
        assert_eq!(internal_to_national(0xFF), None);

        assert_eq!(national_to_internal(0), None);
        assert_eq!(national_to_internal(152), None); // Chikorita is gen 2
        assert_eq!(national_to_internal(386), None);
    }
}
