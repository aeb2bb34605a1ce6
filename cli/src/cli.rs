use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};
use std::path::PathBuf;

/// TAZ review CLI
#[derive(Parser, Debug)]
#[command(name = "tazview", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a shapefile (or the first one in a folder) to GeoJSON
    Convert(ConvertArgs),

    /// Normalize GeoJSON layers and store them in a layer directory
    Import(ImportArgs),

    /// Search an old zone and report what lies within the radius
    Search(SearchArgs),
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input .shp file, or a folder containing one
    #[arg(value_hint = ValueHint::AnyPath)]
    pub input: PathBuf,

    /// Output GeoJSON file
    #[arg(value_hint = ValueHint::FilePath)]
    pub output: PathBuf,

    /// Overwrite if the file exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Old TAZ GeoJSON
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub old: Option<PathBuf>,

    /// New TAZ GeoJSON
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub new: Option<PathBuf>,

    /// Census block GeoJSON
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub blocks: Option<PathBuf>,

    /// Layer directory (created if missing)
    #[arg(value_hint = ValueHint::DirPath)]
    pub store: PathBuf,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
pub enum UnitArg { Miles, Km }

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Layer directory written by `import`
    #[arg(value_hint = ValueHint::DirPath)]
    pub store: PathBuf,

    /// Old TAZ id to search
    pub taz_id: String,

    /// Radius in the display unit (clamped to 0.5..=5)
    #[arg(short, long)]
    pub radius: Option<String>,

    /// Display unit of the radius
    #[arg(short, long, value_enum)]
    pub unit: Option<UnitArg>,

    /// New TAZ ids to select (fills the new zone table and links their blocks)
    #[arg(long = "select-zone", value_name = "TAZ_ID", num_args = 1..)]
    pub select_zones: Vec<String>,

    /// Block GEOID20s to select (fills the block table)
    #[arg(long = "select-block", value_name = "GEOID20", num_args = 1..)]
    pub select_blocks: Vec<String>,

    /// Settings JSON file
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Report file (stdout if omitted)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}
