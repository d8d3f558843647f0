//! Small shared utilities.
use conv::ValueInto;

/// Shorthand for casting numbers.  Panics if out of range.
pub fn cast<T: ValueInto<U>, U>(x: T) -> U {
    x.value_into().expect("integer conversion failure")
}

/// Absolute and relative tolerance pair for floating-point comparisons.
#[derive(Clone, Copy, Debug)]
pub struct Toler {
    pub relerr: f64,
    pub abserr: f64,
}

/// `{ relerr: 1e-11, abserr: 1e-11 }`
impl Default for Toler {
    fn default() -> Self {
        Self { relerr: 1e-11, abserr: 1e-11 }
    }
}

impl Toler {
    pub fn is_eq(&self, left: f64, right: f64) -> bool {
        (left - right).abs()
            <= self.abserr
            + self.relerr * f64::max(left.abs(), right.abs())
    }
}

/// Parse a boolean keyword as it appears in textual configuration:
/// `{true, t, yes, y, 1}` or `{false, f, no, n, 0}`, case-insensitively.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toler() {
        let toler = Toler { relerr: 1e-3, abserr: 1e-6 };
        assert!(toler.is_eq(1.0, 1.0005));
        assert!(!toler.is_eq(1.0, 1.01));
        assert!(toler.is_eq(0.0, 1e-7));
    }

    #[test]
    fn bool_keywords() {
        assert_eq!(parse_bool("Yes"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
