use rust_decimal::Decimal;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            channel: ChannelConfig::default(),
            input: InputConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Width distribution used by the synthetic net generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    /// Mostly single-width nets.
    Single,
    /// A larger share of wide nets.
    Thick,
}

impl Scenario {
    /// `(width, probability)` pairs.
    pub fn width_distribution(&self) -> &'static [(u32, f64)] {
        match self {
            Scenario::Single => &[(1, 0.8), (2, 0.1), (3, 0.08), (4, 0.02)],
            Scenario::Thick => &[(1, 0.5), (2, 0.3), (3, 0.15), (4, 0.05)],
        }
    }
}

impl FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "single" | "1" => Ok(Scenario::Single),
            "thick" | "2" => Ok(Scenario::Thick),
            _ => Err(format!("Invalid scenario '{}' (expected single or thick)", s)),
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scenario::Single => f.write_str("single"),
            Scenario::Thick => f.write_str("thick"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneratorConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_nets")]
    pub nets: usize,
    #[serde(default = "default_scenario")]
    pub scenario: Scenario,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            nets: default_nets(),
            scenario: default_scenario(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChannelConfig {
    /// Track height. Absent means a single track of unlimited height.
    #[serde(default)]
    pub gap_width: Option<Decimal>,
    /// Vertical spacing between stacked tracks.
    #[serde(default = "default_gap_interval")]
    pub gap_interval: Decimal,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            gap_width: None,
            gap_interval: default_gap_interval(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_nets_file")]
    pub nets_file: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            nets_file: default_nets_file(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_plot_file")]
    pub plot_file: String,
    #[serde(default = "default_plot_width")]
    pub plot_width: u32,
    #[serde(default = "default_plot_height")]
    pub plot_height: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            plot_file: default_plot_file(),
            plot_width: default_plot_width(),
            plot_height: default_plot_height(),
        }
    }
}

fn default_seed() -> u64 {
    0
}

fn default_nets() -> usize {
    100
}

fn default_scenario() -> Scenario {
    Scenario::Single
}

fn default_gap_interval() -> Decimal {
    Decimal::TEN
}

fn default_nets_file() -> String {
    "inputs/random.nets".to_string()
}

fn default_plot_file() -> String {
    "output/tracks.png".to_string()
}

fn default_plot_width() -> u32 {
    800
}

fn default_plot_height() -> u32 {
    1000
}
