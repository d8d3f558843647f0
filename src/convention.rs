//! Sign, normalization, and counting conventions of a spin Hamiltonian.
//!
//! The literature expresses the same physical model with different sign
//! factors in front of each sum, with spins either as full vectors
//! `S_i` or as unit vectors `ŝ_i`, and with every bond counted once or
//! twice.  A `Convention` pins all of these choices down explicitly:
//!
//! ```text
//! E = c1  ∑[α] p1[α]·S_α
//!   + c21 ∑[α] S_α·p21[α]·S_α
//!   + c22 ∑[α β ν] S_α·p22[α β ν]·S_β
//!   + (three- and four-spin sums scaled by c31 … c44)
//! ```
//!
//! Every field is either defined or undefined; reading an undefined
//! field is an error rather than a silently-assumed default.
use std::fmt;

quick_error! {
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum ConventionError {
        Undefined(name: &'static str) {
            display("undefined property '{}'", name)
        }
        UnknownPredefined(name: String) {
            display("unknown predefined convention '{}'", name)
        }
    }
}

/// Field-by-field overrides for [`Convention::new`] and
/// [`Convention::get_modified`].  `None` leaves the corresponding field
/// untouched (and in particular does not make it undefined).
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub name: Option<String>,
    pub spin_normalized: Option<bool>,
    pub multiple_counting: Option<bool>,
    pub c1: Option<f64>,
    pub c21: Option<f64>,
    pub c22: Option<f64>,
    pub c31: Option<f64>,
    pub c32: Option<f64>,
    pub c33: Option<f64>,
    pub c41: Option<f64>,
    pub c421: Option<f64>,
    pub c422: Option<f64>,
    pub c43: Option<f64>,
    pub c44: Option<f64>,
}

/// Immutable record of the conventions above.  The `name` label is the
/// only mutable attribute; everything else is frozen at construction.
#[derive(Clone, Debug)]
pub struct Convention {
    name: String,
    spin_normalized: Option<bool>,
    multiple_counting: Option<bool>,
    c1: Option<f64>,
    c21: Option<f64>,
    c22: Option<f64>,
    c31: Option<f64>,
    c32: Option<f64>,
    c33: Option<f64>,
    c41: Option<f64>,
    c421: Option<f64>,
    c422: Option<f64>,
    c43: Option<f64>,
    c44: Option<f64>,
}

/// Field-wise over the eleven convention fields; a defined field never
/// equals an undefined one.  The `name` label does not participate.
impl PartialEq for Convention {
    fn eq(&self, other: &Self) -> bool {
        self.spin_normalized == other.spin_normalized
            && self.multiple_counting == other.multiple_counting
            && self.c1 == other.c1
            && self.c21 == other.c21
            && self.c22 == other.c22
            && self.c31 == other.c31
            && self.c32 == other.c32
            && self.c33 == other.c33
            && self.c41 == other.c41
            && self.c421 == other.c421
            && self.c422 == other.c422
            && self.c43 == other.c43
            && self.c44 == other.c44
    }
}

impl Convention {
    /// Convention with every field undefined, named `"custom"`.
    pub fn empty() -> Self {
        Self {
            name: "custom".to_owned(),
            spin_normalized: None,
            multiple_counting: None,
            c1: None,
            c21: None,
            c22: None,
            c31: None,
            c32: None,
            c33: None,
            c41: None,
            c421: None,
            c422: None,
            c43: None,
            c44: None,
        }
    }

    /// Convention with the given subset of fields defined.
    pub fn new(overrides: Overrides) -> Self {
        Self::empty().get_modified(overrides)
    }

    /// A copy with the given fields replaced; fields not overridden are
    /// copied verbatim, including their undefinedness.
    pub fn get_modified(&self, o: Overrides) -> Self {
        Self {
            name: match o.name {
                Some(name) => name.to_lowercase(),
                None => self.name.clone(),
            },
            spin_normalized: o.spin_normalized.or(self.spin_normalized),
            multiple_counting: o.multiple_counting.or(self.multiple_counting),
            c1: o.c1.or(self.c1),
            c21: o.c21.or(self.c21),
            c22: o.c22.or(self.c22),
            c31: o.c31.or(self.c31),
            c32: o.c32.or(self.c32),
            c33: o.c33.or(self.c33),
            c41: o.c41.or(self.c41),
            c421: o.c421.or(self.c421),
            c422: o.c422.or(self.c422),
            c43: o.c43.or(self.c43),
            c44: o.c44.or(self.c44),
        }
    }

    /// Fully-defined convention of a known external code.
    /// Lookup is case-insensitive.
    ///
    /// - `tb2j`:    E = −∑∑ ŝJŝ, bonds counted twice.
    /// - `vampire`: E = −½∑∑ ŝJŝ, bonds counted twice.
    /// - `spinw`:   E = +∑∑ SJS, bonds counted twice.
    pub fn get_predefined(name: &str) -> Result<Self, ConventionError> {
        let key = name.to_lowercase();
        let overrides = match key.as_str() {
            "tb2j" => Overrides {
                spin_normalized: Some(true),
                multiple_counting: Some(true),
                c1: Some(-1.0),
                c21: Some(-1.0),
                c22: Some(-1.0),
                .. Default::default()
            },
            "vampire" => Overrides {
                spin_normalized: Some(true),
                multiple_counting: Some(true),
                c1: Some(-1.0),
                c21: Some(-1.0),
                c22: Some(-0.5),
                .. Default::default()
            },
            "spinw" => Overrides {
                spin_normalized: Some(false),
                multiple_counting: Some(true),
                c1: Some(1.0),
                c21: Some(1.0),
                c22: Some(1.0),
                .. Default::default()
            },
            _ => return Err(ConventionError::UnknownPredefined(
                name.to_owned(),
            )),
        };
        let mut convention = Self::new(overrides);
        convention.name = key;
        Ok(convention)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The only permitted mutation; the label is lower-cased.
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_lowercase();
    }

    pub fn spin_normalized(&self) -> Result<bool, ConventionError> {
        self.spin_normalized
            .ok_or(ConventionError::Undefined("spin_normalized"))
    }

    pub fn multiple_counting(&self) -> Result<bool, ConventionError> {
        self.multiple_counting
            .ok_or(ConventionError::Undefined("multiple_counting"))
    }

    pub fn c1(&self) -> Result<f64, ConventionError> {
        self.c1.ok_or(ConventionError::Undefined("c1"))
    }

    pub fn c21(&self) -> Result<f64, ConventionError> {
        self.c21.ok_or(ConventionError::Undefined("c21"))
    }

    pub fn c22(&self) -> Result<f64, ConventionError> {
        self.c22.ok_or(ConventionError::Undefined("c22"))
    }

    pub fn c31(&self) -> Result<f64, ConventionError> {
        self.c31.ok_or(ConventionError::Undefined("c31"))
    }

    pub fn c32(&self) -> Result<f64, ConventionError> {
        self.c32.ok_or(ConventionError::Undefined("c32"))
    }

    pub fn c33(&self) -> Result<f64, ConventionError> {
        self.c33.ok_or(ConventionError::Undefined("c33"))
    }

    pub fn c41(&self) -> Result<f64, ConventionError> {
        self.c41.ok_or(ConventionError::Undefined("c41"))
    }

    pub fn c421(&self) -> Result<f64, ConventionError> {
        self.c421.ok_or(ConventionError::Undefined("c421"))
    }

    pub fn c422(&self) -> Result<f64, ConventionError> {
        self.c422.ok_or(ConventionError::Undefined("c422"))
    }

    pub fn c43(&self) -> Result<f64, ConventionError> {
        self.c43.ok_or(ConventionError::Undefined("c43"))
    }

    pub fn c44(&self) -> Result<f64, ConventionError> {
        self.c44.ok_or(ConventionError::Undefined("c44"))
    }

    /// Multi-line human-readable dump; undefined fields are shown as
    /// such rather than omitted.
    pub fn summary(&self) -> String {
        fn show_bool(x: Option<bool>) -> String {
            match x {
                Some(x) => x.to_string(),
                None => "undefined".to_owned(),
            }
        }
        fn show_f64(x: Option<f64>) -> String {
            match x {
                Some(x) => x.to_string(),
                None => "undefined".to_owned(),
            }
        }
        let mut s = String::new();
        s += &format!("convention '{}':\n", self.name);
        s += &format!("  spin_normalized:   {}\n",
                      show_bool(self.spin_normalized));
        s += &format!("  multiple_counting: {}\n",
                      show_bool(self.multiple_counting));
        for &(name, value) in &[
            ("c1", self.c1), ("c21", self.c21), ("c22", self.c22),
            ("c31", self.c31), ("c32", self.c32), ("c33", self.c33),
            ("c41", self.c41), ("c421", self.c421), ("c422", self.c422),
            ("c43", self.c43), ("c44", self.c44),
        ] {
            s += &format!("  {:4} {}\n", format!("{}:", name),
                          show_f64(value));
        }
        s
    }
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_read_fails() {
        let convention = Convention::empty();
        assert_eq!(convention.c22(),
                   Err(ConventionError::Undefined("c22")));
        assert_eq!(convention.multiple_counting(),
                   Err(ConventionError::Undefined("multiple_counting")));
    }

    #[test]
    fn get_modified_is_isolated() {
        let convention = Convention::new(Overrides {
            c1: Some(3.0),
            .. Default::default()
        });
        let modified = convention.get_modified(Overrides {
            c1: Some(2.0),
            .. Default::default()
        });
        assert_eq!(modified.c1(), Ok(2.0));
        assert_eq!(convention.c1(), Ok(3.0));
        assert!(modified.c21().is_err());
        assert!(modified.c31().is_err());
        assert!(modified.c421().is_err());
        assert!(modified.c44().is_err());
    }

    #[test]
    fn defined_zero_is_not_undefined() {
        let zero = Convention::new(Overrides {
            c22: Some(0.0),
            .. Default::default()
        });
        assert_ne!(zero, Convention::empty());
        assert_eq!(zero, zero.clone());
    }

    #[test]
    fn name_is_ignored_by_equality() {
        let mut a = Convention::get_predefined("TB2J").unwrap();
        assert_eq!(a.name(), "tb2j");
        a.set_name("Renamed");
        assert_eq!(a.name(), "renamed");
        assert_eq!(a, Convention::get_predefined("tb2j").unwrap());
    }

    #[test]
    fn predefined_conventions() {
        let tb2j = Convention::get_predefined("tb2j").unwrap();
        assert_eq!(tb2j.c22(), Ok(-1.0));
        assert_eq!(tb2j.spin_normalized(), Ok(true));
        assert!(tb2j.c31().is_err());
        let vampire = Convention::get_predefined("vampire").unwrap();
        assert_eq!(vampire.c22(), Ok(-0.5));
        let spinw = Convention::get_predefined("SpinW").unwrap();
        assert_eq!(spinw.spin_normalized(), Ok(false));
        assert!(Convention::get_predefined("heisenberg").is_err());
    }

    #[test]
    fn summary_mentions_undefined_fields() {
        let summary = Convention::get_predefined("tb2j").unwrap().summary();
        assert!(summary.contains("tb2j"));
        assert!(summary.contains("undefined"));
        assert!(summary.contains("c22: -1"));
    }
}
