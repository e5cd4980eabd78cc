use anyhow::Result;
use clap::{Parser, Subcommand};
use helpq::command::{HelpArgs, HelpCommand};
use helpq::host::snapshot::{HostSnapshot, OverrideTable};
use helpq::host::{Host, StdoutSink};
use helpq::index::CellIndex;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "helpq")]
#[command(about = "Run the help console command offline against a host snapshot")]
struct Cli {
    /// Directory holding snapshot.json and the container files it references
    #[arg(short, long, default_value = ".")]
    data: PathBuf,

    /// Editor-id override table (JSON map of form id to editor id)
    #[arg(long)]
    edid_overrides: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the help command as the console would
    Query {
        /// Free-text match string
        matchstring: Option<String>,

        /// Catalog filter: 0-all 1-functions 2-settings 3-globals 4-other forms
        filter: Option<u32>,

        /// 4-character form type restriction (used with filter 4)
        formtype: Option<String>,
    },
    /// Build the cell index and dump its entries
    Cells {
        /// Restrict to editor ids containing this string
        matchstring: Option<String>,
    },
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let cli = Cli::parse();
    let host = HostSnapshot::load(&cli.data)?;

    match cli.command {
        Commands::Query {
            matchstring,
            filter,
            formtype,
        } => {
            let mut command = match cli.edid_overrides {
                Some(path) => {
                    HelpCommand::with_editor_ids(Box::new(OverrideTable::from_file(&path)?))
                }
                None => HelpCommand::new(),
            };
            let args = HelpArgs {
                match_string: matchstring.unwrap_or_default(),
                filter: filter.unwrap_or(0),
                form_type: formtype.unwrap_or_default(),
            };
            let mut sink = StdoutSink::new();
            command.execute(&host, &mut sink, &args);
        }
        Commands::Cells { matchstring } => {
            let mut index = CellIndex::new();
            index.ensure_built(host.full_files(), host.small_files());

            let needle = matchstring.unwrap_or_default();
            for (edid, file_name) in index.matches(&needle) {
                println!("{} {}", file_name, edid);
            }
        }
    }

    Ok(())
}
