use crate::algo::ordering::NetOrdering;
use chanroute_common::db::gap::Gap;
use chanroute_common::db::netlist::NetList;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Best result any packing could reach.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LowerBound {
    /// Unlimited capacity: one gap, at least as tall as the peak density.
    Height(Decimal),
    /// Bounded capacity: gaps needed to hold the peak density.
    Gaps(usize),
}

pub fn lower_bound(density: Decimal, gap_width: Option<Decimal>) -> LowerBound {
    match gap_width {
        None => LowerBound::Height(density),
        Some(w) if w > Decimal::ZERO => {
            LowerBound::Gaps((density / w).ceil().to_usize().unwrap_or(usize::MAX))
        }
        Some(_) => LowerBound::Gaps(usize::MAX),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StrategyResult {
    pub ordering: NetOrdering,
    pub gaps: usize,
    /// Stack height of the first gap.
    pub used_height: Decimal,
}

impl StrategyResult {
    pub fn new(ordering: NetOrdering, gaps: &[Gap]) -> Self {
        Self {
            ordering,
            gaps: gaps.len(),
            used_height: gaps.first().map_or(Decimal::ZERO, |g| g.used_height()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Report {
    pub nets: usize,
    pub density: Decimal,
    pub lower_bound: LowerBound,
    pub results: Vec<StrategyResult>,
}

impl Report {
    pub fn new(netlist: &NetList, gap_width: Option<Decimal>) -> Self {
        let density = netlist.max_density();
        Self {
            nets: netlist.len(),
            density,
            lower_bound: lower_bound(density, gap_width),
            results: Vec::new(),
        }
    }

    pub fn add(&mut self, ordering: NetOrdering, gaps: &[Gap]) {
        self.results.push(StrategyResult::new(ordering, gaps));
    }

    pub fn log(&self) {
        log::info!("Input");
        log::info!("  - #nets        : {}", self.nets);
        log::info!("  - Density      : {}", self.density);
        log::info!("Lower Bound");
        match self.lower_bound {
            LowerBound::Height(h) => {
                log::info!("  - #gaps used   : 1");
                log::info!("  - Height       : {}", h);
            }
            LowerBound::Gaps(n) => log::info!("  - #gaps used   : {}", n),
        }
        log::info!("{}", "=".repeat(30));
        for r in &self.results {
            match self.lower_bound {
                LowerBound::Height(_) => log::info!("{}: {:>3}", r.ordering, r.used_height),
                LowerBound::Gaps(_) => log::info!("{}: {:>3}", r.ordering, r.gaps),
            }
        }
    }
}
