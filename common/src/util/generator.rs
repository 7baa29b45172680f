use crate::db::net::{Net, Pin};
use crate::db::netlist::NetList;
use crate::db::parser::nets;
use crate::util::config::GeneratorConfig;
use anyhow::{Result, anyhow};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use std::path::Path;

/// Random two-pin nets on the unit interval, widths drawn from the scenario.
pub fn generate_netlist(config: &GeneratorConfig) -> Result<NetList> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let distribution = config.scenario.width_distribution();
    let weights = WeightedIndex::new(distribution.iter().map(|&(_, p)| p))
        .map_err(|e| anyhow!("Invalid width distribution: {}", e))?;

    log::info!(
        "Generating {} nets (scenario: {}, seed: {})",
        config.nets,
        config.scenario,
        config.seed
    );

    let mut netlist = NetList::with_capacity(config.nets);
    for i in 0..config.nets {
        let x0 = to_decimal(rng.gen_range(0.0..1.0))?;
        let x1 = to_decimal(rng.gen_range(0.0..1.0))?;
        let width = Decimal::from(distribution[weights.sample(&mut rng)].0);

        let net = Net::new(
            i.to_string(),
            vec![Pin::new(x0, Decimal::ZERO), Pin::new(x1, Decimal::ZERO)],
            width,
        )?;
        netlist.push(net);
    }
    Ok(netlist)
}

pub fn generate_random_nets(filename: impl AsRef<Path>, config: &GeneratorConfig) -> Result<()> {
    let netlist = generate_netlist(config)?;
    nets::write(&netlist, filename)
}

fn to_decimal(v: f64) -> Result<Decimal> {
    Decimal::from_f64(v).ok_or_else(|| anyhow!("Coordinate {} is not representable", v))
}
