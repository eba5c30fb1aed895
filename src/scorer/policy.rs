//! Built-in scoring policies and the name registry that selects them.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::crypto::{Address, ADDRESS_NIBBLES};

/// Outcome of comparing an incoming address against the current best.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// At least as good as the current best (ties included)
    Better,
    /// Strictly worse
    NotBetter,
}

impl Verdict {
    /// Collapses a three-way comparison; `Equal` counts as better so the
    /// newest of two equally scored addresses wins.
    #[inline]
    pub fn from_ordering(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => Verdict::NotBetter,
            Ordering::Equal | Ordering::Greater => Verdict::Better,
        }
    }

    #[inline]
    pub fn is_better(self) -> bool {
        matches!(self, Verdict::Better)
    }
}

/// A ranking criterion over addresses.
///
/// `compare(a, b)` returns `Greater` when `a` ranks above `b`.
pub trait Scorer: Send + Sync {
    fn compare(&self, a: &Address, b: &Address) -> Ordering;

    #[inline]
    fn judge(&self, candidate: &Address, best: &Address) -> Verdict {
        Verdict::from_ordering(self.compare(candidate, best))
    }
}

/// Lowest address value wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct Least;

impl Scorer for Least {
    #[inline]
    fn compare(&self, a: &Address, b: &Address) -> Ordering {
        b.as_bytes().cmp(a.as_bytes())
    }
}

/// Most bytes in the printable ASCII range wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct AsciiDensity;

impl Scorer for AsciiDensity {
    #[inline]
    fn compare(&self, a: &Address, b: &Address) -> Ordering {
        ascii_density(a).cmp(&ascii_density(b))
    }
}

/// Longest ascending nibble prefix wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ascending {
    /// Require each nibble to be exactly one above its predecessor
    pub strict: bool,
}

impl Scorer for Ascending {
    #[inline]
    fn compare(&self, a: &Address, b: &Address) -> Ordering {
        ascending_run(a, self.strict).cmp(&ascending_run(b, self.strict))
    }
}

/// Counts the address bytes in `32..=127`.
#[inline]
pub fn ascii_density(address: &Address) -> u32 {
    address
        .as_bytes()
        .iter()
        .filter(|&&b| (32..=127).contains(&b))
        .count() as u32
}

/// Length of the ascending run at the start of the address's nibbles.
///
/// Both variants start from an implicit predecessor of 0. Non-strict: each
/// nibble must be `>=` the previous one. Strict: the first nibble must be 0
/// or 1 and each following nibble exactly one above the previous. A scan
/// that never breaks scores the full 40.
pub fn ascending_run(address: &Address, strict: bool) -> u32 {
    let mut count = 0;
    let mut last = 0u8;
    for (i, nibble) in address.nibbles().enumerate() {
        let extends = if strict {
            if i == 0 {
                nibble <= last + 1
            } else {
                nibble == last + 1
            }
        } else {
            nibble >= last
        };
        if !extends {
            return count;
        }
        last = nibble;
        count += 1;
    }
    ADDRESS_NIBBLES as u32
}

/// Names of the available scorers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScorerKind {
    Least,
    Ascii,
    Ascending,
    StrictAscending,
}

impl ScorerKind {
    pub const ALL: [ScorerKind; 4] = [
        ScorerKind::Least,
        ScorerKind::Ascii,
        ScorerKind::Ascending,
        ScorerKind::StrictAscending,
    ];

    /// Instantiates the policy behind this name.
    pub fn scorer(self) -> Box<dyn Scorer> {
        match self {
            ScorerKind::Least => Box::new(Least),
            ScorerKind::Ascii => Box::new(AsciiDensity),
            ScorerKind::Ascending => Box::new(Ascending { strict: false }),
            ScorerKind::StrictAscending => Box::new(Ascending { strict: true }),
        }
    }

    /// Human-readable score of `address` under this policy, for logs.
    pub fn describe(self, address: &Address) -> String {
        match self {
            ScorerKind::Least => address.to_hex(),
            ScorerKind::Ascii => format!("{}/20", ascii_density(address)),
            ScorerKind::Ascending => format!("{}/40", ascending_run(address, false)),
            ScorerKind::StrictAscending => format!("{}/40", ascending_run(address, true)),
        }
    }
}

impl FromStr for ScorerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "least" => Ok(ScorerKind::Least),
            "ascii" | "asciiscorer" | "ascii-density" => Ok(ScorerKind::Ascii),
            "ascending" => Ok(ScorerKind::Ascending),
            "strict-ascending" | "strictascending" => Ok(ScorerKind::StrictAscending),
            _ => Err(format!("Unknown scorer: {}", s)),
        }
    }
}

impl fmt::Display for ScorerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            ScorerKind::Least => "least",
            ScorerKind::Ascii => "ascii",
            ScorerKind::Ascending => "ascending",
            ScorerKind::StrictAscending => "strict-ascending",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_address(hex_str: &str) -> Address {
        hex_str.parse().unwrap()
    }

    fn ascii_example() -> Address {
        let mut bytes = [0xffu8; 20];
        bytes[..3].copy_from_slice(&[0x30, 0x31, 0x32]);
        Address::from_bytes(bytes)
    }

    #[test]
    fn test_least_reflexive_and_antisymmetric() {
        let low = make_address("0000000000000000000000000000000000000001");
        let high = make_address("00000000000000000000000000000000000000ff");
        assert_eq!(Least.compare(&low, &low), Ordering::Equal);
        assert_eq!(Least.compare(&low, &high), Ordering::Greater);
        assert_eq!(Least.compare(&high, &low), Ordering::Less);
    }

    #[test]
    fn test_least_big_endian() {
        let a = make_address("0100000000000000000000000000000000000000");
        let b = make_address("00ffffffffffffffffffffffffffffffffffffff");
        assert!(Least.judge(&b, &a).is_better());
        assert!(!Least.judge(&a, &b).is_better());
    }

    #[test]
    fn test_ascii_density_example() {
        assert_eq!(ascii_density(&ascii_example()), 3);
    }

    #[test]
    fn test_ascii_density_bounds() {
        assert_eq!(ascii_density(&Address::from_bytes([0u8; 20])), 0);
        assert_eq!(ascii_density(&Address::from_bytes([32u8; 20])), 20);
        assert_eq!(ascii_density(&Address::from_bytes([127u8; 20])), 20);
        assert_eq!(ascii_density(&Address::from_bytes([128u8; 20])), 0);
        assert_eq!(ascii_density(&Address::from_bytes([31u8; 20])), 0);
    }

    #[test]
    fn test_ascending_stops_at_drop() {
        // nibbles 3, 0, ... : the second nibble breaks the run
        assert_eq!(ascending_run(&ascii_example(), false), 1);
        // strict must open with 0 or 1
        assert_eq!(ascending_run(&ascii_example(), true), 0);
    }

    #[test]
    fn test_ascending_full_run_hits_ceiling() {
        let monotone = make_address("00112233445566778899aabbccddeeffffffffff");
        assert_eq!(ascending_run(&monotone, false), 40);
        assert_eq!(ascending_run(&Address::from_bytes([0u8; 20]), false), 40);
        assert_eq!(ascending_run(&Address::from_bytes([0xffu8; 20]), false), 40);
    }

    #[test]
    fn test_strict_ascending_requires_unit_steps() {
        let counting = make_address("0123456789abcdef000000000000000000000000");
        assert_eq!(ascending_run(&counting, true), 16);
        assert_eq!(ascending_run(&counting, false), 16);

        let repeated = make_address("0012345000000000000000000000000000000000");
        assert_eq!(ascending_run(&repeated, true), 1);
        assert_eq!(ascending_run(&repeated, false), 7);

        let late_start = make_address("789a000000000000000000000000000000000000");
        assert_eq!(ascending_run(&late_start, true), 0);
        assert_eq!(ascending_run(&late_start, false), 4);

        let high = make_address("f000000000000000000000000000000000000000");
        assert_eq!(ascending_run(&high, true), 0);

        let from_one = make_address("1234000000000000000000000000000000000000");
        assert_eq!(ascending_run(&from_one, true), 4);
    }

    #[test]
    fn test_strict_never_exceeds_non_strict() {
        let samples = [
            "00112233445566778899aabbccddeeffffffffff",
            "0123456789abcdef000000000000000000000000",
            "fedcba9876543210fedcba9876543210fedcba98",
            "1111111111111111111111111111111111111111",
            "5aaeb6053f3e94c9b9a09f33669435e7ef1beaed",
        ];
        for hex_str in samples {
            let address = make_address(hex_str);
            let strict = ascending_run(&address, true);
            let loose = ascending_run(&address, false);
            assert!(strict <= loose, "{}: {} > {}", hex_str, strict, loose);
            assert!(loose <= 40);
        }
    }

    #[test]
    fn test_ties_are_better() {
        let a = make_address("3030303030303030303030303030303030303030");
        let b = make_address("3131313131313131313131313131313131313131");
        assert!(AsciiDensity.judge(&a, &b).is_better());
        assert!(AsciiDensity.judge(&b, &a).is_better());
    }

    #[test]
    fn test_scorer_kind_names() {
        assert_eq!("asciiScorer".parse::<ScorerKind>(), Ok(ScorerKind::Ascii));
        assert_eq!(
            "strictAscending".parse::<ScorerKind>(),
            Ok(ScorerKind::StrictAscending)
        );
        assert!("fastest".parse::<ScorerKind>().is_err());
        for kind in ScorerKind::ALL {
            assert_eq!(kind.to_string().parse::<ScorerKind>(), Ok(kind));
        }
    }
}
