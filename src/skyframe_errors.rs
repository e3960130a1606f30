use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkyframeError {
    #[error("in {method}: {first} has {first_len} elements but {second} has {second_len}")]
    LengthMismatch {
        method: &'static str,
        first: &'static str,
        first_len: usize,
        second: &'static str,
        second_len: usize,
    },

    #[error("in {method}: passed a sequence of {sequence} but only one {scalar}")]
    ArityMismatch {
        method: &'static str,
        sequence: &'static str,
        scalar: &'static str,
    },

    #[error("in {method}: {param} must be a single value, not a sequence")]
    ScalarRequired {
        method: &'static str,
        param: &'static str,
    },

    #[error("cannot call {method} without {field} in the observing geometry")]
    MissingMetadata {
        method: &'static str,
        field: &'static str,
    },

    #[error("a ModifiedJulianDate needs either TAI or UTC, none was given")]
    UnspecifiedTimeScale,

    #[error("a ModifiedJulianDate takes exactly one of TAI or UTC, both were given")]
    AmbiguousTimeScale,

    #[error("Malformed lookup table: {0}")]
    MalformedTable(String),

    #[error("{0} is not a unit vector")]
    NotUnitVector(&'static str),

    #[error("Gnomonic projection failed with status {0}")]
    ProjectionFailed(i32),

    #[error("Unable to read lookup table: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid calendar date {0}")]
    InvalidDate(String),
}

impl PartialEq for SkyframeError {
    fn eq(&self, other: &Self) -> bool {
        use SkyframeError::*;
        match (self, other) {
            (
                LengthMismatch {
                    method: m1,
                    first: f1,
                    first_len: fl1,
                    second: s1,
                    second_len: sl1,
                },
                LengthMismatch {
                    method: m2,
                    first: f2,
                    first_len: fl2,
                    second: s2,
                    second_len: sl2,
                },
            ) => m1 == m2 && f1 == f2 && fl1 == fl2 && s1 == s2 && sl1 == sl2,
            (
                ArityMismatch {
                    method: m1,
                    sequence: q1,
                    scalar: s1,
                },
                ArityMismatch {
                    method: m2,
                    sequence: q2,
                    scalar: s2,
                },
            ) => m1 == m2 && q1 == q2 && s1 == s2,
            (
                ScalarRequired {
                    method: m1,
                    param: p1,
                },
                ScalarRequired {
                    method: m2,
                    param: p2,
                },
            ) => m1 == m2 && p1 == p2,
            (
                MissingMetadata {
                    method: m1,
                    field: f1,
                },
                MissingMetadata {
                    method: m2,
                    field: f2,
                },
            ) => m1 == m2 && f1 == f2,
            (MalformedTable(a), MalformedTable(b)) => a == b,
            (NotUnitVector(a), NotUnitVector(b)) => a == b,
            (ProjectionFailed(a), ProjectionFailed(b)) => a == b,
            (InvalidDate(a), InvalidDate(b)) => a == b,

            // Not comparable: equal when the variant matches
            (CsvError(_), CsvError(_)) => true,
            (IoError(_), IoError(_)) => true,

            (UnspecifiedTimeScale, UnspecifiedTimeScale) => true,
            (AmbiguousTimeScale, AmbiguousTimeScale) => true,

            _ => false,
        }
    }
}
