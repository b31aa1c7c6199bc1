//! Scalar field of BN254. p = 0x30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000001
//!
//! This implementation uses Montgomery form for efficient modular arithmetic.
//! The field element is represented as [u64; 4] in little-endian order.

use core::fmt::{self, Debug, Display, Formatter};
use core::hash::{Hash, Hasher};
use core::iter::Sum;
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use core::str::FromStr;

use num_bigint::{BigInt, BigUint, Sign};
use rand::distr::{Distribution, StandardUniform};
use rand::Rng;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::ParseFieldError;

/// Size of the canonical big-endian encoding in bytes.
pub const FR_BYTES: usize = 32;

/// Number of decimal digits of the modulus, the upper bound for a canonical decimal.
pub const FR_DECIMAL_DIGITS: usize = 77;

/// BN254 scalar field element.
/// Represented in Montgomery form with [u64; 4]
#[derive(Copy, Clone, Default, Eq, PartialEq)]
pub struct Fr {
    /// Montgomery form: value * R mod p, where R = 2^256
    limbs: [u64; 4],
}

// Field modulus: p = 21888242871839275222246405745257275088548364400416034343698204186575808495617
const MODULUS: [u64; 4] = [
    0x43e1f593f0000001,
    0x2833e84879b97091,
    0xb85045b68181585d,
    0x30644e72e131a029,
];

// R = 2^256 mod p (Montgomery parameter)
const R: [u64; 4] = [
    0xac96341c4ffffffb,
    0x36fc76959f60cd29,
    0x666ea36f7879462e,
    0x0e0a77c19a07df2f,
];

// R^2 = 2^512 mod p (for Montgomery conversion)
const R2: [u64; 4] = [
    0x1bb8e645ae216da7,
    0x53fe3ab1e35c59e3,
    0x8c49833d53bb8085,
    0x0216d0b17f4e44a5,
];

// -p^{-1} mod 2^64 (Montgomery parameter mu)
const MU: u64 = 0xc2e1f593efffffff;

// p < 2^254, so sampled limbs are masked to 254 bits before rejection.
const TOP_LIMB_MASK: u64 = 0x3fff_ffff_ffff_ffff;

impl Fr {
    /// Zero element (in Montgomery form)
    pub const ZERO: Self = Fr {
        limbs: [0, 0, 0, 0],
    };

    /// One element (in Montgomery form: R mod p)
    pub const ONE: Self = Fr { limbs: R };

    /// Create a new field element from a u64 value
    #[inline]
    pub fn from_canonical_u64(val: u64) -> Self {
        // Convert to Montgomery form: val * R^2 * R^{-1} = val * R
        let result = Fr {
            limbs: [val, 0, 0, 0],
        };
        montgomery_mul(result, Fr { limbs: R2 })
    }

    /// Create a field element from canonical little-endian limbs.
    ///
    /// Returns `None` if the limbs encode a value `>= p`.
    pub fn from_canonical_limbs(limbs: [u64; 4]) -> Option<Self> {
        if is_canonical(limbs) {
            Some(Self::from_limbs_unchecked(limbs))
        } else {
            None
        }
    }

    /// Convert from Montgomery form to canonical little-endian limbs
    #[inline]
    pub fn to_canonical_limbs(&self) -> [u64; 4] {
        // Multiply by 1 to get out of Montgomery form
        let one = Fr {
            limbs: [1, 0, 0, 0],
        };
        montgomery_mul(*self, one).limbs
    }

    #[inline]
    fn from_limbs_unchecked(limbs: [u64; 4]) -> Self {
        montgomery_mul(Fr { limbs }, Fr { limbs: R2 })
    }

    /// The field modulus `p`.
    pub fn order() -> BigUint {
        limbs_to_biguint(MODULUS)
    }

    /// Reduce an arbitrary-precision unsigned integer into the field.
    pub fn from_biguint(value: &BigUint) -> Self {
        let reduced = value % Self::order();
        let mut limbs = [0u64; 4];
        for (limb, digit) in limbs.iter_mut().zip(reduced.to_u64_digits()) {
            *limb = digit;
        }
        Self::from_limbs_unchecked(limbs)
    }

    /// Reduce an arbitrary-precision signed integer into the field.
    ///
    /// Negative values map to `p - (|value| mod p)`.
    pub fn from_bigint(value: &BigInt) -> Self {
        let magnitude = Self::from_biguint(value.magnitude());
        match value.sign() {
            Sign::Minus => -magnitude,
            Sign::NoSign | Sign::Plus => magnitude,
        }
    }

    /// The canonical representative in `[0, p)`.
    pub fn as_canonical_biguint(&self) -> BigUint {
        limbs_to_biguint(self.to_canonical_limbs())
    }

    /// Fixed-width big-endian encoding of the canonical representative.
    pub fn to_bytes_be(&self) -> [u8; FR_BYTES] {
        let canonical = self.to_canonical_limbs();
        let mut bytes = [0u8; FR_BYTES];
        for (chunk, limb) in bytes.chunks_exact_mut(8).zip(canonical.iter().rev()) {
            chunk.copy_from_slice(&limb.to_be_bytes());
        }
        bytes
    }

    /// Decode a fixed-width big-endian encoding, rejecting values `>= p`.
    pub fn from_bytes_be(bytes: &[u8; FR_BYTES]) -> Option<Self> {
        let mut limbs = [0u64; 4];
        for (limb, chunk) in limbs.iter_mut().rev().zip(bytes.chunks_exact(8)) {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            *limb = u64::from_be_bytes(word);
        }
        Self::from_canonical_limbs(limbs)
    }

    /// Check if this field element is zero
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.limbs == [0, 0, 0, 0]
    }

    #[inline]
    pub fn square(&self) -> Self {
        *self * *self
    }

    /// Raise to a small exponent.
    pub fn exp_u64(&self, exp: u64) -> Self {
        self.pow_vartime([exp, 0, 0, 0])
    }

    /// Multiplicative inverse, `None` for zero.
    pub fn try_inverse(&self) -> Option<Self> {
        if self.is_zero() {
            None
        } else {
            // Fermat's little theorem: a^{-1} = a^{p-2}
            let exp = sub_mod(MODULUS, [2, 0, 0, 0]);
            Some(self.pow_vartime(exp))
        }
    }

    /// Variable-time exponentiation
    fn pow_vartime(&self, exp: [u64; 4]) -> Self {
        let mut result = Self::ONE;
        let mut base = *self;

        // Process bits from least significant to most significant
        for &limb in exp.iter() {
            let mut remaining = limb;
            for _ in 0..64 {
                if remaining & 1 == 1 {
                    result *= base;
                }
                base = base * base;
                remaining >>= 1;
            }
        }

        result
    }
}

fn limbs_to_biguint(limbs: [u64; 4]) -> BigUint {
    let mut bytes = Vec::with_capacity(FR_BYTES);
    for &limb in &limbs {
        bytes.extend_from_slice(&limb.to_le_bytes());
    }
    BigUint::from_bytes_le(&bytes)
}

/// Helper: Add two 256-bit numbers mod p
#[inline]
const fn add_mod(a: [u64; 4], b: [u64; 4]) -> [u64; 4] {
    let (r0, carry) = a[0].overflowing_add(b[0]);
    let (r1, carry) = carrying_add(a[1], b[1], carry);
    let (r2, carry) = carrying_add(a[2], b[2], carry);
    let (r3, carry) = carrying_add(a[3], b[3], carry);

    // Subtract modulus if we overflowed or result >= p
    let (s0, borrow) = r0.overflowing_sub(MODULUS[0]);
    let (s1, borrow) = borrowing_sub(r1, MODULUS[1], borrow);
    let (s2, borrow) = borrowing_sub(r2, MODULUS[2], borrow);
    let (s3, borrow) = borrowing_sub(r3, MODULUS[3], borrow);

    if carry || !borrow {
        [s0, s1, s2, s3]
    } else {
        [r0, r1, r2, r3]
    }
}

/// Helper: Subtract two 256-bit numbers mod p
#[inline]
const fn sub_mod(a: [u64; 4], b: [u64; 4]) -> [u64; 4] {
    let (r0, borrow) = a[0].overflowing_sub(b[0]);
    let (r1, borrow) = borrowing_sub(a[1], b[1], borrow);
    let (r2, borrow) = borrowing_sub(a[2], b[2], borrow);
    let (r3, borrow) = borrowing_sub(a[3], b[3], borrow);

    // Add modulus if we underflowed
    if borrow {
        let (r0, carry) = r0.overflowing_add(MODULUS[0]);
        let (r1, carry) = carrying_add(r1, MODULUS[1], carry);
        let (r2, carry) = carrying_add(r2, MODULUS[2], carry);
        let (r3, _) = carrying_add(r3, MODULUS[3], carry);
        [r0, r1, r2, r3]
    } else {
        [r0, r1, r2, r3]
    }
}

/// Helper: Negate a 256-bit number mod p
#[inline]
const fn neg_mod(a: [u64; 4]) -> [u64; 4] {
    if a[0] == 0 && a[1] == 0 && a[2] == 0 && a[3] == 0 {
        return [0, 0, 0, 0];
    }
    sub_mod(MODULUS, a)
}

#[inline]
const fn is_canonical(limbs: [u64; 4]) -> bool {
    let (_, borrow) = limbs[0].overflowing_sub(MODULUS[0]);
    let (_, borrow) = borrowing_sub(limbs[1], MODULUS[1], borrow);
    let (_, borrow) = borrowing_sub(limbs[2], MODULUS[2], borrow);
    let (_, borrow) = borrowing_sub(limbs[3], MODULUS[3], borrow);
    borrow
}

/// Helper: Carrying addition
#[inline]
const fn carrying_add(a: u64, b: u64, carry: bool) -> (u64, bool) {
    let (sum, overflow1) = a.overflowing_add(b);
    let (sum, overflow2) = sum.overflowing_add(carry as u64);
    (sum, overflow1 || overflow2)
}

/// Helper: Borrowing subtraction
#[inline]
const fn borrowing_sub(a: u64, b: u64, borrow: bool) -> (u64, bool) {
    let (diff, overflow1) = a.overflowing_sub(b);
    let (diff, overflow2) = diff.overflowing_sub(borrow as u64);
    (diff, overflow1 || overflow2)
}

/// Montgomery multiplication: (a * b * R^{-1}) mod p
#[inline]
fn montgomery_mul(a: Fr, b: Fr) -> Fr {
    // Schoolbook product into 512 bits
    let mut t = [0u64; 8];

    for i in 0..4 {
        let mut carry = 0u128;
        for j in 0..4 {
            let product = (a.limbs[i] as u128) * (b.limbs[j] as u128) + (t[i + j] as u128) + carry;
            t[i + j] = product as u64;
            carry = product >> 64;
        }
        t[i + 4] = carry as u64;
    }

    // Montgomery reduction
    for i in 0..4 {
        let k = t[i].wrapping_mul(MU);
        let mut carry = 0u128;

        for j in 0..4 {
            let product = (k as u128) * (MODULUS[j] as u128) + (t[i + j] as u128) + carry;
            t[i + j] = product as u64;
            carry = product >> 64;
        }

        for j in 4..8 - i {
            let sum = (t[i + j] as u128) + carry;
            t[i + j] = sum as u64;
            carry = sum >> 64;
        }
    }

    // High half is < 2p; conditionally subtract p
    let result = [t[4], t[5], t[6], t[7]];

    if is_canonical(result) {
        Fr { limbs: result }
    } else {
        Fr {
            limbs: sub_mod(result, MODULUS),
        }
    }
}

impl Distribution<Fr> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Fr {
        loop {
            let mut limbs: [u64; 4] = rng.random();
            limbs[3] &= TOP_LIMB_MASK;

            if is_canonical(limbs) {
                return Fr::from_limbs_unchecked(limbs);
            }
        }
    }
}

impl From<u64> for Fr {
    fn from(int: u64) -> Self {
        Self::from_canonical_u64(int)
    }
}

impl From<i64> for Fr {
    fn from(int: i64) -> Self {
        let magnitude = Self::from_canonical_u64(int.unsigned_abs());
        if int < 0 {
            -magnitude
        } else {
            magnitude
        }
    }
}

impl From<&BigUint> for Fr {
    fn from(value: &BigUint) -> Self {
        Self::from_biguint(value)
    }
}

impl From<&BigInt> for Fr {
    fn from(value: &BigInt) -> Self {
        Self::from_bigint(value)
    }
}

// Arithmetic operations
impl Add for Fr {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Fr {
            limbs: add_mod(self.limbs, rhs.limbs),
        }
    }
}

impl AddAssign for Fr {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Fr {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Fr {
            limbs: sub_mod(self.limbs, rhs.limbs),
        }
    }
}

impl SubAssign for Fr {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Fr {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Fr {
            limbs: neg_mod(self.limbs),
        }
    }
}

impl Mul for Fr {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        montgomery_mul(self, rhs)
    }
}

impl MulAssign for Fr {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Sum for Fr {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + x)
    }
}

// Display is the canonical decimal; it is also the textual wire format.
impl Display for Fr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_canonical_biguint())
    }
}

impl Debug for Fr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Fr({})", self)
    }
}

impl Hash for Fr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.limbs.hash(state);
    }
}

impl FromStr for Fr {
    type Err = ParseFieldError;

    /// Parse a canonical decimal: ASCII digits only, no sign, no leading zeros,
    /// and strictly below the modulus.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseFieldError::Empty);
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) || (s.len() > 1 && s.starts_with('0')) {
            return Err(ParseFieldError::NonCanonical);
        }
        if s.len() > FR_DECIMAL_DIGITS {
            return Err(ParseFieldError::OutOfRange);
        }

        let value = BigUint::parse_bytes(s.as_bytes(), 10).ok_or(ParseFieldError::NonCanonical)?;
        if value >= Self::order() {
            return Err(ParseFieldError::OutOfRange);
        }
        Ok(Self::from_biguint(&value))
    }
}

impl Serialize for Fr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Fr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const P_DECIMAL: &str =
        "21888242871839275222246405745257275088548364400416034343698204186575808495617";

    fn arb_fr() -> impl Strategy<Value = Fr> {
        any::<[u64; 4]>().prop_map(|limbs| Fr::from_biguint(&limbs_to_biguint(limbs)))
    }

    #[test]
    fn test_zero_one() {
        assert_eq!(Fr::ZERO + Fr::ZERO, Fr::ZERO);
        assert_eq!(Fr::ONE * Fr::ONE, Fr::ONE);
        assert_eq!(Fr::ZERO * Fr::ONE, Fr::ZERO);
        assert_eq!(Fr::ONE + Fr::ZERO, Fr::ONE);
    }

    #[test]
    fn test_addition() {
        let a = Fr::from_canonical_u64(5);
        let b = Fr::from_canonical_u64(7);
        assert_eq!(a + b, Fr::from_canonical_u64(12));
    }

    #[test]
    fn test_subtraction() {
        let a = Fr::from_canonical_u64(10);
        let b = Fr::from_canonical_u64(3);
        assert_eq!(a - b, Fr::from_canonical_u64(7));
        assert_eq!(b - a, -Fr::from_canonical_u64(7));
    }

    #[test]
    fn test_multiplication() {
        let a = Fr::from_canonical_u64(6);
        let b = Fr::from_canonical_u64(7);
        assert_eq!(a * b, Fr::from_canonical_u64(42));
        assert_eq!(Fr::from(7u64).square().to_string(), "49");
    }

    #[test]
    fn test_negation() {
        let a = Fr::from_canonical_u64(5);
        assert_eq!(a + (-a), Fr::ZERO);
        assert_eq!(-Fr::ZERO, Fr::ZERO);
    }

    #[test]
    fn test_inverse() {
        let a = Fr::from_canonical_u64(5);
        let a_inv = a.try_inverse().expect("nonzero");
        assert_eq!(a * a_inv, Fr::ONE);
        assert_eq!(Fr::ZERO.try_inverse(), None);
    }

    #[test]
    fn test_modulus_constant() {
        assert_eq!(Fr::order().to_string(), P_DECIMAL);
        assert_eq!(Fr::order().bits(), 254);
        assert_eq!(P_DECIMAL.len(), FR_DECIMAL_DIGITS);
    }

    #[test]
    fn test_wraparound() {
        let p_minus_one = Fr::from_biguint(&(Fr::order() - 1u32));
        assert_eq!(p_minus_one, -Fr::ONE);
        assert_eq!(p_minus_one + Fr::ONE, Fr::ZERO);
        assert_eq!(Fr::from_biguint(&Fr::order()), Fr::ZERO);
        assert_eq!(Fr::from_biguint(&(Fr::order() + 7u32)), Fr::from(7u64));
        assert_eq!([p_minus_one, Fr::ONE, Fr::from(5u64)].into_iter().sum::<Fr>(), Fr::from(5u64));
    }

    #[test]
    fn test_signed_reduction() {
        assert_eq!(Fr::from(-3i64) + Fr::from(3i64), Fr::ZERO);
        assert_eq!(Fr::from(i64::MIN), -Fr::from(1u64 << 63));
        assert_eq!(Fr::from_bigint(&BigInt::from(-7)), -Fr::from(7u64));
        assert_eq!(Fr::from(-1i64).to_string(), (Fr::order() - 1u32).to_string());
    }

    #[test]
    fn test_matches_biguint_arithmetic() {
        let mut rng = StdRng::seed_from_u64(42);
        let p = Fr::order();
        for _ in 0..64 {
            let a: Fr = rng.random();
            let b: Fr = rng.random();
            let (x, y) = (a.as_canonical_biguint(), b.as_canonical_biguint());
            assert_eq!((a * b).as_canonical_biguint(), (&x * &y) % &p);
            assert_eq!((a + b).as_canonical_biguint(), (&x + &y) % &p);
            assert_eq!((a - b).as_canonical_biguint(), (&x + &p - &y) % &p);
        }
    }

    #[test]
    fn test_decimal_parsing_is_canonical() {
        assert_eq!("49".parse::<Fr>(), Ok(Fr::from(49u64)));
        assert_eq!("0".parse::<Fr>(), Ok(Fr::ZERO));
        assert_eq!("".parse::<Fr>(), Err(ParseFieldError::Empty));
        assert_eq!("049".parse::<Fr>(), Err(ParseFieldError::NonCanonical));
        assert_eq!("+49".parse::<Fr>(), Err(ParseFieldError::NonCanonical));
        assert_eq!(" 49".parse::<Fr>(), Err(ParseFieldError::NonCanonical));
        assert_eq!("4_9".parse::<Fr>(), Err(ParseFieldError::NonCanonical));
        assert_eq!(P_DECIMAL.parse::<Fr>(), Err(ParseFieldError::OutOfRange));
        let too_long = "9".repeat(FR_DECIMAL_DIGITS + 1);
        assert_eq!(too_long.parse::<Fr>(), Err(ParseFieldError::OutOfRange));
    }

    #[test]
    fn test_bytes_be() {
        let bytes = Fr::from(0x0102u64).to_bytes_be();
        assert_eq!(&bytes[..30], &[0u8; 30]);
        assert_eq!(&bytes[30..], &[0x01, 0x02]);
        assert_eq!(Fr::from_bytes_be(&[0xff; FR_BYTES]), None);
    }

    #[test]
    fn test_serde_as_decimal() {
        let json = serde_json::to_string(&Fr::from(49u64)).expect("serialize");
        assert_eq!(json, "\"49\"");
        let back: Fr = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, Fr::from(49u64));
        assert!(serde_json::from_str::<Fr>("\"0049\"").is_err());
    }

    proptest! {
        #[test]
        fn prop_bytes_and_decimal_are_inverse(a in arb_fr()) {
            prop_assert_eq!(Fr::from_bytes_be(&a.to_bytes_be()), Some(a));
            prop_assert_eq!(a.to_string().parse::<Fr>(), Ok(a));
        }

        #[test]
        fn prop_distributive(a in arb_fr(), b in arb_fr(), c in arb_fr()) {
            prop_assert_eq!(a * (b + c), a * b + a * c);
        }

        #[test]
        fn prop_inverse(a in arb_fr()) {
            prop_assume!(!a.is_zero());
            let inv = a.try_inverse().expect("nonzero");
            prop_assert_eq!(a * inv, Fr::ONE);
        }
    }
}
