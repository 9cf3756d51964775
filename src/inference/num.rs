use std::cmp::Ordering;

use ordered_float::OrderedFloat;

use crate::classify::IntegerCriterion;
use crate::value::{Value, float_to_json, int_to_json};

/// A numeric sample, split by the integer criterion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Num {
    Int(i128),
    Float(f64),
}

impl Num {
    pub fn of(v: &Value, criterion: IntegerCriterion) -> Option<Self> {
        match v {
            Value::Integer(i) => Some(Num::Int(*i)),
            Value::Float(f) => Some(match criterion.integral(*f) {
                Some(i) => Num::Int(i),
                None => Num::Float(*f),
            }),
            _ => None,
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Num::Int(i) => i as f64,
            Num::Float(f) => f,
        }
    }

    pub fn cmp_total(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Num::Int(a), Num::Int(b)) => a.cmp(b),
            _ => OrderedFloat(self.as_f64()).cmp(&OrderedFloat(other.as_f64())),
        }
    }

    pub fn to_json(self) -> serde_json::Value {
        match self {
            Num::Int(i) => int_to_json(i),
            Num::Float(f) => float_to_json(f),
        }
    }
}

/// Running GCD over decimal magnitudes: `mantissa × 10^-scale`.
///
/// Kept canonical (no trailing decimal zeros) so that any grouping of the
/// same samples lands on the same value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Gcd {
    #[default]
    Empty,
    Value { mantissa: u128, scale: u32 },
    /// A magnitude did not fit the decimal representation.
    Poisoned,
}

impl Gcd {
    pub fn observe(&mut self, n: Num) {
        let next = match decimal_of(n) {
            Some((mantissa, scale)) => Gcd::Value { mantissa, scale },
            None => Gcd::Poisoned,
        };
        *self = Gcd::join(*self, next);
    }

    pub fn join(a: Self, b: Self) -> Self {
        match (a, b) {
            (Gcd::Poisoned, _) | (_, Gcd::Poisoned) => Gcd::Poisoned,
            (Gcd::Empty, x) | (x, Gcd::Empty) => x,
            (Gcd::Value { mantissa: ma, scale: sa }, Gcd::Value { mantissa: mb, scale: sb }) => {
                let scale = sa.max(sb);
                let lifted = rescale(ma, scale - sa).zip(rescale(mb, scale - sb));
                match lifted {
                    Some((x, y)) => canonical(gcd(x, y), scale),
                    None => Gcd::Poisoned,
                }
            }
        }
    }

    /// A GCD worth stating: positive and not the trivial integer 1.
    pub fn meaningful(&self) -> Option<(u128, u32)> {
        match *self {
            Gcd::Value { mantissa, scale } if mantissa > 0 && !(mantissa == 1 && scale == 0) => {
                Some((mantissa, scale))
            }
            _ => None,
        }
    }
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

fn rescale(m: u128, by: u32) -> Option<u128> {
    10u128.checked_pow(by).and_then(|p| m.checked_mul(p))
}

fn canonical(mut mantissa: u128, mut scale: u32) -> Gcd {
    if mantissa == 0 {
        return Gcd::Value { mantissa: 0, scale: 0 };
    }
    while scale > 0 && mantissa % 10 == 0 {
        mantissa /= 10;
        scale -= 1;
    }
    Gcd::Value { mantissa, scale }
}

/// Shortest decimal spelling of `|n|` as (digits, fractional places).
fn decimal_of(n: Num) -> Option<(u128, u32)> {
    match n {
        Num::Int(i) => Some((i.unsigned_abs(), 0)),
        Num::Float(f) if f.is_finite() => {
            // `Display` for f64 is the shortest round-trip form, never exponential.
            let text = format!("{}", f.abs());
            let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), ""));
            let frac = frac.trim_end_matches('0');
            let digits = format!("{whole}{frac}");
            let mantissa = digits.parse::<u128>().ok()?;
            match canonical(mantissa, frac.len() as u32) {
                Gcd::Value { mantissa, scale } => Some((mantissa, scale)),
                _ => None,
            }
        }
        Num::Float(_) => None,
    }
}

/// `mantissa × 10^-scale` as a JSON number.
pub fn decimal_to_json(mantissa: u128, scale: u32) -> serde_json::Value {
    if scale == 0 {
        return match i128::try_from(mantissa) {
            Ok(i) => int_to_json(i),
            Err(_) => float_to_json(mantissa as f64),
        };
    }
    let f = format!("{mantissa}e-{scale}").parse::<f64>().unwrap_or(f64::NAN);
    float_to_json(f)
}

#[derive(Clone, Debug)]
pub struct NumC {
    pub min: Num,
    pub max: Num,
    /// Every sample here was an `integer` under the active criterion.
    pub all_int: bool,
    pub gcd: Gcd,
}

impl NumC {
    pub fn new(n: Num) -> Self {
        let mut gcd = Gcd::Empty;
        gcd.observe(n);
        Self { min: n, max: n, all_int: matches!(n, Num::Int(_)), gcd }
    }

    pub fn observe(&mut self, n: Num) {
        if n.cmp_total(&self.min) == Ordering::Less {
            self.min = n;
        }
        if n.cmp_total(&self.max) == Ordering::Greater {
            self.max = n;
        }
        self.all_int &= matches!(n, Num::Int(_));
        self.gcd.observe(n);
    }

    pub(super) fn join(a: &Self, b: &Self) -> Self {
        Self {
            min: if b.min.cmp_total(&a.min) == Ordering::Less { b.min } else { a.min },
            max: if b.max.cmp_total(&a.max) == Ordering::Greater { b.max } else { a.max },
            all_int: a.all_int && b.all_int,
            gcd: Gcd::join(a.gcd, b.gcd),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fold(ns: &[Num]) -> Gcd {
        let mut g = Gcd::Empty;
        for n in ns {
            g.observe(*n);
        }
        g
    }

    #[test]
    fn integer_gcd() {
        let g = fold(&[Num::Int(4), Num::Int(8), Num::Int(12)]);
        assert_eq!(g.meaningful(), Some((4, 0)));
        let g = fold(&[Num::Int(3), Num::Int(5)]);
        assert_eq!(g, Gcd::Value { mantissa: 1, scale: 0 });
        assert_eq!(g.meaningful(), None);
    }

    #[test]
    fn zero_is_the_identity_but_all_zero_says_nothing() {
        assert_eq!(fold(&[Num::Int(0), Num::Int(6), Num::Int(-9)]).meaningful(), Some((3, 0)));
        assert_eq!(fold(&[Num::Int(0), Num::Int(0)]).meaningful(), None);
    }

    #[test]
    fn fractions_scale_to_a_common_decimal() {
        let g = fold(&[Num::Float(0.25), Num::Float(0.5), Num::Float(1.75)]);
        assert_eq!(g.meaningful(), Some((25, 2)));
        assert_eq!(decimal_to_json(25, 2), serde_json::json!(0.25));

        let g = fold(&[Num::Float(1.5), Num::Int(3)]);
        assert_eq!(g.meaningful(), Some((15, 1)));
    }

    #[test]
    fn trailing_zeros_are_dropped_after_merging() {
        // 0.2 and 0.5 share 0.1
        let g = fold(&[Num::Float(0.2), Num::Float(0.5)]);
        assert_eq!(g, Gcd::Value { mantissa: 1, scale: 1 });
        // 2.5 and 5 share 2.5
        let g = fold(&[Num::Float(2.5), Num::Int(5)]);
        assert_eq!(g, Gcd::Value { mantissa: 25, scale: 1 });
    }

    #[test]
    fn join_matches_sequential_fold() {
        let xs = [Num::Float(0.3), Num::Int(6), Num::Float(1.2), Num::Int(9)];
        let whole = fold(&xs);
        let split = Gcd::join(fold(&xs[..2]), fold(&xs[2..]));
        assert_eq!(whole, split);
    }

    #[test]
    fn overflow_poisons_for_good() {
        let g = fold(&[Num::Float(1e-30), Num::Int(i128::MAX)]);
        assert_eq!(g, Gcd::Poisoned);
        assert_eq!(Gcd::join(g, fold(&[Num::Int(2)])), Gcd::Poisoned);
    }

    #[test]
    fn range_tracks_mixed_numbers() {
        let mut c = NumC::new(Num::Int(3));
        c.observe(Num::Float(-1.5));
        c.observe(Num::Int(10));
        assert_eq!(c.min, Num::Float(-1.5));
        assert_eq!(c.max, Num::Int(10));
        assert!(!c.all_int);
    }
}
