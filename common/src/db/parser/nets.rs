use crate::db::net::{Net, Pin};
use crate::db::netlist::NetList;
use anyhow::{Context, Result, anyhow, bail};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

// NETS <n> ;
// - <name> WIDTH <w> ( <x> <y> ) ( <x> <y> ) ... ;
// END NETS

pub fn parse(filename: impl AsRef<Path>) -> Result<NetList> {
    let path = filename.as_ref();
    let file = File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    parse_reader(BufReader::new(file))
}

pub fn parse_reader<R: BufRead>(reader: R) -> Result<NetList> {
    let mut netlist = NetList::new();
    let mut in_nets = false;
    let mut declared: Option<usize> = None;
    let mut seen: HashSet<String> = HashSet::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = line_no + 1;
        let line = line.split('#').next().unwrap_or("");
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        match parts[0] {
            "NETS" => {
                let count = parts
                    .get(1)
                    .ok_or_else(|| anyhow!("line {}: NETS without a count", line_no))?;
                declared = Some(
                    count
                        .parse()
                        .with_context(|| format!("line {}: bad net count '{}'", line_no, count))?,
                );
                in_nets = true;
            }
            "END" => {
                if parts.get(1) == Some(&"NETS") {
                    in_nets = false;
                }
            }
            "-" if in_nets => {
                let net = parse_net(&parts).with_context(|| format!("line {}", line_no))?;
                if !seen.insert(net.name().to_string()) {
                    bail!("line {}: duplicate net '{}'", line_no, net.name());
                }
                netlist.push(net);
            }
            other => bail!("line {}: unexpected token '{}'", line_no, other),
        }
    }

    if let Some(n) = declared
        && n != netlist.len()
    {
        log::warn!(
            "Nets file declares {} nets but {} were read",
            n,
            netlist.len()
        );
    }
    Ok(netlist)
}

fn parse_net(parts: &[&str]) -> Result<Net> {
    let name = parts.get(1).ok_or_else(|| anyhow!("net without a name"))?;
    let mut width: Option<Decimal> = None;
    let mut pins = Vec::new();

    let mut i = 2;
    while i < parts.len() {
        match parts[i] {
            "WIDTH" => {
                let w = parts
                    .get(i + 1)
                    .ok_or_else(|| anyhow!("net '{}': WIDTH without a value", name))?;
                width = Some(w.parse()?);
                i += 2;
            }
            "(" => {
                let (Some(x), Some(y), Some(&")")) =
                    (parts.get(i + 1), parts.get(i + 2), parts.get(i + 3))
                else {
                    bail!("net '{}': malformed pin at token {}", name, i);
                };
                pins.push(Pin::new(x.parse()?, y.parse()?));
                i += 4;
            }
            ";" => break,
            other => bail!("net '{}': unexpected token '{}'", name, other),
        }
    }

    let width = width.ok_or_else(|| anyhow!("net '{}': missing WIDTH", name))?;
    Ok(Net::new(*name, pins, width)?)
}

pub fn write(netlist: &NetList, filename: impl AsRef<Path>) -> Result<()> {
    let file = File::create(filename.as_ref())?;
    let mut out = BufWriter::new(file);
    write_to(netlist, &mut out)?;
    out.flush()?;
    Ok(())
}

pub fn write_to<W: Write>(netlist: &NetList, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "NETS {} ;", netlist.len())?;
    for net in netlist {
        write!(out, "- {} WIDTH {}", net.name(), net.width())?;
        for p in net.pins() {
            write!(out, " ( {} {} )", p.x, p.y)?;
        }
        writeln!(out, " ;")?;
    }
    writeln!(out, "END NETS")?;
    Ok(())
}
