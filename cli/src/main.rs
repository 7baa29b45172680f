use chanroute_common::db::netlist::NetList;
use chanroute_common::db::parser::nets;
use chanroute_common::util::config::{Config, Scenario};
use chanroute_common::util::profiler::ScopedTimer;
use chanroute_common::util::{check, generator, logger, visualization};
use chanroute_router::NetOrdering;
use chanroute_router::report::Report;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    config: PathBuf,

    /// Track height; omit for a single unlimited track.
    #[arg(short = 'w', long)]
    gap_width: Option<Decimal>,

    /// Spacing between stacked tracks.
    #[arg(short = 'i', long)]
    gap_interval: Option<Decimal>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    Route,
    Flow,
    Generate {
        #[arg(long)]
        nets: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        scenario: Option<Scenario>,
        #[arg(long)]
        output: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let args = Args::parse();

    let mut config = load_config(&args.config)?;
    if let Some(w) = args.gap_width {
        config.channel.gap_width = Some(w);
    }
    if let Some(i) = args.gap_interval {
        config.channel.gap_interval = i;
    }

    let command = args.command.unwrap_or(Commands::Flow);

    match command {
        Commands::Generate {
            nets,
            seed,
            scenario,
            output,
        } => {
            let mut gen_config = config.generator.clone();
            if let Some(n) = nets {
                gen_config.nets = n;
            }
            if let Some(s) = seed {
                gen_config.seed = s;
            }
            if let Some(s) = scenario {
                gen_config.scenario = s;
            }
            let output = output.unwrap_or_else(|| config.input.nets_file.clone());

            prepare_output_dir(&output)?;
            generator::generate_random_nets(&output, &gen_config)?;
            log::info!("Generated: {}", output);
        }
        Commands::Route => {
            validate_input_paths(&config)?;
            log::info!("Parsing nets: {}", config.input.nets_file);
            let netlist = nets::parse(&config.input.nets_file).map_err(|e| {
                anyhow::anyhow!(
                    "Invalid nets syntax in '{}': {:#}",
                    config.input.nets_file,
                    e
                )
            })?;

            if let Err(e) = run_routing(&config, &netlist) {
                log::error!("{:#}", e);
                std::process::exit(1);
            }
        }
        Commands::Flow => {
            let netlist = generator::generate_netlist(&config.generator)?;

            if let Err(e) = run_routing(&config, &netlist) {
                log::error!("{:#}", e);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<Config> {
    if path.exists() {
        log::info!("Loading configuration from {:?}", path);
        let config_str = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;
        toml::from_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))
    } else {
        log::warn!(
            "Configuration file {:?} not found. Using internal defaults.",
            path
        );
        Ok(Config::default())
    }
}

fn validate_input_paths(config: &Config) -> anyhow::Result<()> {
    if !Path::new(&config.input.nets_file).exists() {
        return Err(anyhow::anyhow!(
            "Input nets file missing: {}. Did you run 'generate'?",
            config.input.nets_file
        ));
    }
    Ok(())
}

fn prepare_output_dir(path_str: &str) -> anyhow::Result<()> {
    if let Some(parent) = Path::new(path_str).parent()
        && !parent.exists()
        && !parent.as_os_str().is_empty()
    {
        log::info!("Creating output directory: {:?}", parent);
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn run_routing(config: &Config, netlist: &NetList) -> anyhow::Result<()> {
    if netlist.is_empty() {
        return Err(anyhow::anyhow!("Net list is empty! Nothing to assign."));
    }

    let channel = &config.channel;
    match channel.gap_width {
        Some(w) => log::info!(
            "Starting Track Assignment ({} nets, gap width {}, interval {})...",
            netlist.len(),
            w,
            channel.gap_interval
        ),
        None => log::info!(
            "Starting Track Assignment ({} nets, single unlimited gap)...",
            netlist.len()
        ),
    }

    let results = {
        let _t = ScopedTimer::new("Track Assignment");
        chanroute_router::route_all(netlist, channel, &NetOrdering::ALL)
            .map_err(|e| anyhow::anyhow!(e))?
    };

    let mut report = Report::new(netlist, channel.gap_width);
    for (ordering, gaps) in &results {
        check::run_assignment_check(netlist, gaps).map_err(|e| {
            anyhow::anyhow!("Verification Failed ({}): {}", ordering, e)
        })?;
        report.add(*ordering, gaps);
    }
    report.log();

    let [(_, left_edge), (_, proposal)] = results.as_slice() else {
        return Err(anyhow::anyhow!("Expected one result per ordering"));
    };

    let out = &config.output;
    prepare_output_dir(&out.plot_file)?;
    log::info!("Generating track visualization: {}", out.plot_file);
    match (channel.gap_width, left_edge.first(), proposal.first()) {
        (None, Some(le), Some(pr)) => {
            visualization::draw_single_gap(le, pr, &out.plot_file, out.plot_width, out.plot_height)
        }
        _ => visualization::draw_multiple_gaps(
            left_edge,
            proposal,
            &out.plot_file,
            out.plot_width,
            out.plot_height,
        ),
    }

    Ok(())
}
