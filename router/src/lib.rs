pub mod algo;
pub mod error;
pub mod report;

pub use algo::ordering::NetOrdering;
pub use error::RouteError;

use chanroute_common::db::gap::Gap;
use chanroute_common::db::netlist::NetList;
use chanroute_common::util::config::ChannelConfig;
use rayon::prelude::*;

pub fn route(
    netlist: &NetList,
    config: &ChannelConfig,
    ordering: NetOrdering,
) -> Result<Vec<Gap>, RouteError> {
    algo::left_edge::pack(netlist, config, ordering)
}

/// Runs every ordering independently; results keep the order of `orderings`.
pub fn route_all(
    netlist: &NetList,
    config: &ChannelConfig,
    orderings: &[NetOrdering],
) -> Result<Vec<(NetOrdering, Vec<Gap>)>, RouteError> {
    orderings
        .par_iter()
        .map(|&o| route(netlist, config, o).map(|gaps| (o, gaps)))
        .collect()
}
