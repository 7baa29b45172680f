use chanroute_common::db::error::GapError;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("Net '{net}' of width {width} does not fit a gap of width {capacity}")]
    NetExceedsCapacity {
        net: String,
        width: Decimal,
        capacity: Decimal,
    },

    #[error("Gap width must be positive, got {0}")]
    InvalidCapacity(Decimal),

    #[error(transparent)]
    Gap(#[from] GapError),
}
