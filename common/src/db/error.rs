use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetError {
    #[error("Net '{0}' has no pins")]
    NoPins(String),

    #[error("Net '{name}' has non-positive width {width}")]
    NonPositiveWidth { name: String, width: Decimal },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GapError {
    #[error("Net '{net}' is not assignable: stack height {height} + width {width} exceeds {limit}")]
    NotAssignable {
        net: String,
        height: Decimal,
        width: Decimal,
        limit: Decimal,
    },

    #[error("Coordinate {0} is not on the gap grid")]
    UnknownCoordinate(Decimal),
}
