use crate::db::gap::{Assignment, Gap};
use crate::db::netlist::NetList;
use crate::geom::rtree::SpatialIndex;
use rayon::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Verifies a packing: every net placed exactly once, and every gap within
/// its capacity with no two slots overlapping.
pub fn run_assignment_check(netlist: &NetList, gaps: &[Gap]) -> Result<(), String> {
    log::info!(
        "Starting Track Verification ({} nets, {} gaps)...",
        netlist.len(),
        gaps.len()
    );

    let mut msgs = Vec::new();

    match check_partition(netlist, gaps) {
        Ok(()) => log::info!("\x1b[32mPASS\x1b[0m: Every net is assigned exactly once."),
        Err(e) => {
            log::error!("\x1b[31mFAIL\x1b[0m: Net coverage");
            log::error!("{}", e);
            msgs.push(e);
        }
    }

    let gap_errors: Vec<String> = gaps
        .par_iter()
        .enumerate()
        .filter_map(|(i, gap)| check_gap(gap).err().map(|e| format!("Gap {}: {}", i, e)))
        .collect();

    if gap_errors.is_empty() {
        log::info!("\x1b[32mPASS\x1b[0m: All gaps respect capacity and stacking.");
    } else {
        for e in &gap_errors {
            log::error!("\x1b[31mFAIL\x1b[0m: {}", e);
        }
        msgs.extend(gap_errors);
    }

    if msgs.is_empty() {
        Ok(())
    } else {
        Err(msgs.join("; "))
    }
}

fn check_partition(netlist: &NetList, gaps: &[Gap]) -> Result<(), String> {
    let mut placed: HashMap<&str, usize> = HashMap::new();
    for gap in gaps {
        for name in gap.net2assignment().keys() {
            *placed.entry(name.as_str()).or_insert(0) += 1;
        }
    }

    let mut problems = Vec::new();
    for net in netlist {
        match placed.remove(net.name()) {
            None => problems.push(format!("'{}' unassigned", net.name())),
            Some(1) => {}
            Some(n) => problems.push(format!("'{}' assigned {} times", net.name(), n)),
        }
    }
    let mut unknown: Vec<&str> = placed.into_keys().collect();
    unknown.sort();
    for name in unknown {
        problems.push(format!("'{}' is not in the net list", name));
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems.join(", "))
    }
}

fn check_gap(gap: &Gap) -> Result<(), String> {
    if let Some(limit) = gap.width()
        && gap.used_height() > limit
    {
        return Err(format!(
            "height {} exceeds capacity {}",
            gap.used_height(),
            limit
        ));
    }

    for (x, column) in gap.assignments() {
        let mut top = Decimal::ZERO;
        for a in column {
            if a.min_height() < top {
                return Err(format!("'{}' sinks into the stack at x={}", a.net().name(), x));
            }
            top = a.max_height();
        }
    }

    let slots: Vec<&Assignment> = gap.net2assignment().values().collect();
    let mut index = SpatialIndex::new();
    for (i, a) in slots.iter().enumerate() {
        index.insert(a.rect(), i);
    }
    for (i, a) in slots.iter().enumerate() {
        if let Some(&j) = index
            .query_overlapping(a.rect())
            .iter()
            .find(|&&j| j > i)
        {
            return Err(format!("'{}' overlaps '{}'", a, slots[j]));
        }
    }
    Ok(())
}
