use chanroute_common::db::indices::NetId;
use chanroute_common::db::netlist::NetList;
use std::fmt;

/// Order in which the packing driver visits the unassigned pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NetOrdering {
    /// Ascending left edge, ties kept in input order.
    LeftEdge,
    /// Ascending net name.
    Proposal,
}

impl NetOrdering {
    pub const ALL: [NetOrdering; 2] = [NetOrdering::LeftEdge, NetOrdering::Proposal];

    /// Stable sort of `ids` by this ordering.
    pub fn sort(&self, netlist: &NetList, ids: &mut [NetId]) {
        match self {
            NetOrdering::LeftEdge => ids.sort_by_key(|&id| netlist[id].minx()),
            NetOrdering::Proposal => ids.sort_by(|&a, &b| netlist[a].cmp(&netlist[b])),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NetOrdering::LeftEdge => "Left Edge",
            NetOrdering::Proposal => "Proposal",
        }
    }
}

impl fmt::Display for NetOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chanroute_common::db::net::{Net, Pin};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn span(name: &str, minx: Decimal, maxx: Decimal) -> Net {
        Net::new(
            name,
            vec![Pin::new(minx, dec!(0)), Pin::new(maxx, dec!(0))],
            dec!(1),
        )
        .unwrap()
    }

    fn names(nl: &NetList, ids: &[NetId]) -> Vec<String> {
        ids.iter().map(|&id| nl[id].name().to_string()).collect()
    }

    #[test]
    fn left_edge_is_stable_on_ties() {
        let nl: NetList = [
            span("c", dec!(2), dec!(3)),
            span("b", dec!(0), dec!(4)),
            span("a", dec!(0), dec!(1)),
        ]
        .into_iter()
        .collect();
        let mut ids: Vec<NetId> = nl.ids().collect();
        NetOrdering::LeftEdge.sort(&nl, &mut ids);
        assert_eq!(names(&nl, &ids), ["b", "a", "c"]);
    }

    #[test]
    fn proposal_sorts_by_name() {
        let nl: NetList = [
            span("10", dec!(0), dec!(1)),
            span("2", dec!(0), dec!(1)),
            span("1", dec!(5), dec!(6)),
        ]
        .into_iter()
        .collect();
        let mut ids: Vec<NetId> = nl.ids().collect();
        NetOrdering::Proposal.sort(&nl, &mut ids);
        assert_eq!(names(&nl, &ids), ["1", "10", "2"]);
    }
}
