use super::ordering::NetOrdering;
use crate::error::RouteError;
use chanroute_common::db::gap::Gap;
use chanroute_common::db::indices::{GapId, NetId};
use chanroute_common::db::netlist::NetList;
use chanroute_common::util::config::ChannelConfig;
use rust_decimal::Decimal;

/// Classic left-edge packing: nets visited by ascending left edge.
pub fn left_edge(netlist: &NetList, config: &ChannelConfig) -> Result<Vec<Gap>, RouteError> {
    pack(netlist, config, NetOrdering::LeftEdge)
}

/// Packs every net of `netlist` into a stack of gaps.
///
/// The pool is sorted once by `ordering`. Each new gap is built over the nets
/// still in the pool, then swept repeatedly: a pass walks the pool and assigns
/// every net that starts strictly right of the last one placed in that pass
/// and still fits. Placed nets leave the pool after the pass. A pass that
/// places nothing closes the gap.
pub fn pack(
    netlist: &NetList,
    config: &ChannelConfig,
    ordering: NetOrdering,
) -> Result<Vec<Gap>, RouteError> {
    if let Some(width) = config.gap_width
        && width <= Decimal::ZERO
    {
        return Err(RouteError::InvalidCapacity(width));
    }

    let mut pool: Vec<NetId> = netlist.ids().collect();
    ordering.sort(netlist, &mut pool);

    let mut gaps = Vec::new();
    while !pool.is_empty() {
        let id = GapId::new(gaps.len());
        let mut gap = Gap::new(pool.iter().map(|&n| netlist[n].as_ref()), config.gap_width)
            .with_id(id)
            .with_base_height(base_height(id, config));

        let mut passes = 0usize;
        loop {
            let placed = sweep_pass(netlist, &pool, &mut gap)?;
            if placed.iter().all(|&p| !p) {
                break;
            }
            passes += 1;

            pool = unplaced(&pool, &placed);
            if pool.is_empty() {
                break;
            }
        }

        if gap.is_empty() {
            // Nothing fits an empty gap, so no later gap would take it either.
            let net = &netlist[pool[0]];
            return Err(RouteError::NetExceedsCapacity {
                net: net.name().to_string(),
                width: net.width(),
                capacity: config.gap_width.unwrap_or(Decimal::ZERO),
            });
        }

        log::debug!(
            "{}: gap {} took {} nets in {} passes, height {}",
            ordering,
            id.index(),
            gap.len(),
            passes,
            gap.used_height()
        );
        gaps.push(gap);
    }

    log::info!(
        "{}: packed {} nets into {} gaps",
        ordering,
        netlist.len(),
        gaps.len()
    );
    Ok(gaps)
}

/// One left-to-right walk over `pool`; the result marks which entries were placed.
fn sweep_pass(netlist: &NetList, pool: &[NetId], gap: &mut Gap) -> Result<Vec<bool>, RouteError> {
    let mut scan: Option<Decimal> = None;
    let mut placed = vec![false; pool.len()];

    for (slot, &id) in pool.iter().enumerate() {
        let net = &netlist[id];
        if scan.is_some_and(|x| net.minx() <= x) || !gap.is_assignable(net) {
            continue;
        }
        gap.assign(net)?;
        scan = Some(net.maxx());
        placed[slot] = true;
    }
    Ok(placed)
}

/// Entries of `pool` not marked in `placed`, in pool order.
fn unplaced(pool: &[NetId], placed: &[bool]) -> Vec<NetId> {
    pool.iter()
        .zip(placed)
        .filter(|&(_, &p)| !p)
        .map(|(&id, _)| id)
        .collect()
}

/// Bottom of gap `id` in the stacked layout: one interval below every gap.
pub fn base_height(id: GapId, config: &ChannelConfig) -> Decimal {
    match config.gap_width {
        None => Decimal::ZERO,
        Some(width) => {
            let i = Decimal::from(id.index());
            (i + Decimal::ONE) * config.gap_interval + i * width
        }
    }
}
