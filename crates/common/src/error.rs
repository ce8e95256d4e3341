use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Error {
    /// An infinity or NaN was given where only finite values have an exact binary expansion.
    NonFiniteValue(f64),

    /// A bounded working precision must keep at least one significant bit.
    InvalidPrecision(u32),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::NonFiniteValue(v) => {
                write!(f, "Value {} has no finite binary expansion.", v)
            }

            Error::InvalidPrecision(bits) => write!(
                f,
                "Precision of {} bits is invalid; at least one bit is required.",
                bits
            ),
        }
    }
}

impl std::error::Error for Error {}
