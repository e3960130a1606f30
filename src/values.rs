//! # Scalar / sequence duality
//!
//! Every transform of the crate accepts either a **single value** or an **ordered sequence**
//! of values for each of its angle or time parameters. This module provides the tagged
//! union used for those parameters ([`Values`]) and the shape checks performed once at
//! the entry of every public operation.
//!
//! ## Flow
//!
//! ```text
//! inputs: Values ──► validate_coupled / validate_broadcast / require_scalar
//!                         │
//!                         ▼
//!                   Multiplicity ──► build / build2 / build3 (per-element kernel)
//!                         │
//!                         ▼
//!                  outputs: Values (same arity as the inputs)
//! ```
//!
//! A mismatch between coupled sequences is always a [`SkyframeError`], never a silent
//! truncation. A scalar output is returned for scalar inputs, a sequence output of the
//! validated length otherwise.

use itertools::Itertools;

use crate::skyframe_errors::SkyframeError;

/// A single floating-point value or an ordered sequence of them.
///
/// The unit is never carried by the type: it is documented by the parameter receiving
/// the [`Values`] (radians for plain functions, degrees for the `_deg` wrappers).
#[derive(Debug, Clone, PartialEq)]
pub enum Values {
    Scalar(f64),
    Sequence(Vec<f64>),
}

/// Shape decision taken by the validation helpers for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Multiplicity {
    Scalar,
    Sequence(usize),
}

impl Multiplicity {
    /// Number of elements the per-element kernel must be run for.
    pub fn len(self) -> usize {
        match self {
            Multiplicity::Scalar => 1,
            Multiplicity::Sequence(n) => n,
        }
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Run a per-element kernel and collect a single output with this multiplicity.
    pub fn build(self, mut f: impl FnMut(usize) -> f64) -> Values {
        match self {
            Multiplicity::Scalar => Values::Scalar(f(0)),
            Multiplicity::Sequence(n) => Values::Sequence((0..n).map(f).collect()),
        }
    }

    /// Run a per-element kernel producing two outputs.
    pub fn build2(self, mut f: impl FnMut(usize) -> (f64, f64)) -> (Values, Values) {
        match self {
            Multiplicity::Scalar => {
                let (a, b) = f(0);
                (Values::Scalar(a), Values::Scalar(b))
            }
            Multiplicity::Sequence(n) => {
                let (a, b): (Vec<f64>, Vec<f64>) = (0..n).map(f).unzip();
                (Values::Sequence(a), Values::Sequence(b))
            }
        }
    }

    /// Run a per-element kernel producing three outputs.
    pub fn build3(self, mut f: impl FnMut(usize) -> (f64, f64, f64)) -> (Values, Values, Values) {
        match self {
            Multiplicity::Scalar => {
                let (a, b, c) = f(0);
                (Values::Scalar(a), Values::Scalar(b), Values::Scalar(c))
            }
            Multiplicity::Sequence(n) => {
                let (a, b, c): (Vec<f64>, Vec<f64>, Vec<f64>) = (0..n).map(f).multiunzip();
                (
                    Values::Sequence(a),
                    Values::Sequence(b),
                    Values::Sequence(c),
                )
            }
        }
    }
}

impl Values {
    pub fn multiplicity(&self) -> Multiplicity {
        match self {
            Values::Scalar(_) => Multiplicity::Scalar,
            Values::Sequence(v) => Multiplicity::Sequence(v.len()),
        }
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Values::Sequence(_))
    }

    pub fn len(&self) -> usize {
        self.multiplicity().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element `i`, broadcasting a scalar to every index.
    ///
    /// Callers index only after shape validation, so `i` is always in range for sequences.
    pub fn at(&self, i: usize) -> f64 {
        match self {
            Values::Scalar(x) => *x,
            Values::Sequence(v) => v[i],
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Values::Scalar(x) => Some(*x),
            Values::Sequence(_) => None,
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        match self {
            Values::Scalar(x) => std::slice::from_ref(x),
            Values::Sequence(v) => v,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.as_slice().iter()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.as_slice().to_vec()
    }

    /// Apply `f` element-wise, keeping the arity.
    pub fn map(&self, mut f: impl FnMut(f64) -> f64) -> Values {
        match self {
            Values::Scalar(x) => Values::Scalar(f(*x)),
            Values::Sequence(v) => Values::Sequence(v.iter().map(|&x| f(x)).collect()),
        }
    }

    pub fn to_radians(&self) -> Values {
        self.map(f64::to_radians)
    }

    pub fn to_degrees(&self) -> Values {
        self.map(f64::to_degrees)
    }
}

impl From<f64> for Values {
    fn from(x: f64) -> Self {
        Values::Scalar(x)
    }
}

impl From<Vec<f64>> for Values {
    fn from(v: Vec<f64>) -> Self {
        Values::Sequence(v)
    }
}

impl From<&[f64]> for Values {
    fn from(v: &[f64]) -> Self {
        Values::Sequence(v.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for Values {
    fn from(v: [f64; N]) -> Self {
        Values::Sequence(v.to_vec())
    }
}

impl From<&Values> for Values {
    fn from(v: &Values) -> Self {
        v.clone()
    }
}

/// Validate parameters that must share the same arity (all scalars, or all sequences of
/// the same length).
///
/// Arguments
/// -----------------
/// * `method`: name of the calling operation, reported in errors.
/// * `params`: `(name, values)` pairs, in the order they should be reported.
///
/// Return
/// ----------
/// * The common [`Multiplicity`] of the parameters.
///
/// Errors
/// ----------
/// * [`SkyframeError::ArityMismatch`] if a sequence is coupled with a scalar.
/// * [`SkyframeError::LengthMismatch`] if two sequences have different lengths.
pub fn validate_coupled(
    method: &'static str,
    params: &[(&'static str, &Values)],
) -> Result<Multiplicity, SkyframeError> {
    let Some((&(first_name, first), rest)) = params.split_first() else {
        return Ok(Multiplicity::Scalar);
    };

    for &(name, values) in rest {
        match (first.multiplicity(), values.multiplicity()) {
            (Multiplicity::Scalar, Multiplicity::Scalar) => {}
            (Multiplicity::Sequence(n), Multiplicity::Sequence(m)) if n == m => {}
            (Multiplicity::Sequence(n), Multiplicity::Sequence(m)) => {
                return Err(SkyframeError::LengthMismatch {
                    method,
                    first: first_name,
                    first_len: n,
                    second: name,
                    second_len: m,
                })
            }
            (Multiplicity::Sequence(_), Multiplicity::Scalar) => {
                return Err(SkyframeError::ArityMismatch {
                    method,
                    sequence: first_name,
                    scalar: name,
                })
            }
            (Multiplicity::Scalar, Multiplicity::Sequence(_)) => {
                return Err(SkyframeError::ArityMismatch {
                    method,
                    sequence: name,
                    scalar: first_name,
                })
            }
        }
    }

    Ok(first.multiplicity())
}

/// Validate a parameter that may broadcast onto an already validated primary set.
///
/// A scalar is always accepted and broadcast to every element. A sequence is accepted only
/// if the primary set is itself a sequence of the same length.
pub fn validate_broadcast(
    method: &'static str,
    primary: (&'static str, Multiplicity),
    param: (&'static str, &Values),
) -> Result<(), SkyframeError> {
    let (primary_name, multiplicity) = primary;
    let (name, values) = param;

    match (multiplicity, values.multiplicity()) {
        (_, Multiplicity::Scalar) => Ok(()),
        (Multiplicity::Sequence(n), Multiplicity::Sequence(m)) if n == m => Ok(()),
        (Multiplicity::Sequence(n), Multiplicity::Sequence(m)) => {
            Err(SkyframeError::LengthMismatch {
                method,
                first: name,
                first_len: m,
                second: primary_name,
                second_len: n,
            })
        }
        (Multiplicity::Scalar, Multiplicity::Sequence(_)) => Err(SkyframeError::ArityMismatch {
            method,
            sequence: name,
            scalar: primary_name,
        }),
    }
}

/// Extract the single value of a parameter that does not accept sequences.
pub fn require_scalar(
    method: &'static str,
    name: &'static str,
    values: &Values,
) -> Result<f64, SkyframeError> {
    values
        .as_scalar()
        .ok_or(SkyframeError::ScalarRequired {
            method,
            param: name,
        })
}

#[cfg(test)]
mod test_values {
    use super::*;

    #[test]
    fn test_scalar_multiplicity() {
        let ra = Values::from(1.0);
        let dec = Values::from(0.5);
        let m = validate_coupled("test", &[("ra", &ra), ("dec", &dec)]).unwrap();
        assert_eq!(m, Multiplicity::Scalar);
        assert_eq!(m.build(|i| ra.at(i) + dec.at(i)), Values::Scalar(1.5));
    }

    #[test]
    fn test_sequence_multiplicity() {
        let ra = Values::from(vec![1.0, 2.0, 3.0]);
        let dec = Values::from([0.1, 0.2, 0.3]);
        let m = validate_coupled("test", &[("ra", &ra), ("dec", &dec)]).unwrap();
        assert_eq!(m, Multiplicity::Sequence(3));

        let (a, b) = m.build2(|i| (ra.at(i), dec.at(i)));
        assert_eq!(a, ra);
        assert_eq!(b, dec);
    }

    #[test]
    fn test_length_mismatch() {
        let ra = Values::from(vec![1.0, 2.0, 3.0]);
        let dec = Values::from(vec![0.1, 0.2]);
        let err = validate_coupled("equatorial_to_horizon", &[("ra", &ra), ("dec", &dec)])
            .unwrap_err();
        assert_eq!(
            err,
            SkyframeError::LengthMismatch {
                method: "equatorial_to_horizon",
                first: "ra",
                first_len: 3,
                second: "dec",
                second_len: 2,
            }
        );
    }

    #[test]
    fn test_arity_mismatch_names_both_parameters() {
        let ra = Values::from(1.0);
        let dec = Values::from(vec![0.1, 0.2]);
        let err = validate_coupled("m", &[("ra", &ra), ("dec", &dec)]).unwrap_err();
        assert_eq!(
            err,
            SkyframeError::ArityMismatch {
                method: "m",
                sequence: "dec",
                scalar: "ra",
            }
        );
    }

    #[test]
    fn test_broadcast() {
        let mjd = Values::from(59000.0);
        assert!(validate_broadcast("m", ("ra", Multiplicity::Sequence(4)), ("mjd", &mjd)).is_ok());

        let mjd = Values::from(vec![59000.0, 59001.0]);
        assert!(validate_broadcast("m", ("ra", Multiplicity::Sequence(2)), ("mjd", &mjd)).is_ok());
        assert_eq!(
            validate_broadcast("m", ("ra", Multiplicity::Scalar), ("mjd", &mjd)).unwrap_err(),
            SkyframeError::ArityMismatch {
                method: "m",
                sequence: "mjd",
                scalar: "ra",
            }
        );
        assert!(matches!(
            validate_broadcast("m", ("ra", Multiplicity::Sequence(3)), ("mjd", &mjd)),
            Err(SkyframeError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_require_scalar() {
        assert_eq!(require_scalar("m", "longitude", &Values::from(0.3)), Ok(0.3));
        assert_eq!(
            require_scalar("m", "longitude", &Values::from(vec![0.3])),
            Err(SkyframeError::ScalarRequired {
                method: "m",
                param: "longitude",
            })
        );
    }

    #[test]
    fn test_build3_and_empty() {
        let m = Multiplicity::Sequence(0);
        let (a, b, c) = m.build3(|_| (1.0, 2.0, 3.0));
        assert!(a.is_empty() && b.is_empty() && c.is_empty());
        assert!(a.is_sequence());
    }
}
