//! Command implementations for the PNM CLI.
//!
//! Provides subcommands to reshape the government CSV exports, create a
//! database, load the reshaped files into it and print the aggregate
//! reports.

use std::path::PathBuf;

use clap::Subcommand;

pub mod load;
pub mod report;

#[derive(Subcommand)]
pub enum Command {
    /// Reshape the government CSV exports into loadable CSV files
    Import {
        /// Directory holding the three source exports
        #[arg(short = 'd', long, default_value = "data")]
        data_dir: PathBuf,

        /// Directory the reshaped CSV files are written to
        #[arg(short = 'o', long, default_value = "data/import")]
        out_dir: PathBuf,
    },

    /// Create a database file with the full schema (safe to re-run)
    Init {
        /// Path to the SQLite database file
        #[arg(short = 'b', long)]
        database: PathBuf,
    },

    /// Load the reshaped CSV files into the reference tables
    Load {
        /// Path to the SQLite database file
        #[arg(short = 'b', long)]
        database: PathBuf,

        /// Directory written by `import`
        #[arg(short = 'i', long, default_value = "data/import")]
        import_dir: PathBuf,
    },

    /// Print the aggregate reports
    Report {
        /// Path to the SQLite database file
        #[arg(short = 'b', long)]
        database: PathBuf,

        /// Park codes whose visitors are counted (comma separated)
        #[arg(short = 'c', long, value_delimiter = ',')]
        codes: Vec<String>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Import { data_dir, out_dir } => {
            let summary = pnm_import::run_import(&data_dir, &out_dir)?;
            log::info!(
                "Import complete: {} provinces, {} species groups, {} visitor stats in {}",
                summary.provinces,
                summary.species_groups,
                summary.visitor_stats,
                out_dir.display()
            );
            Ok(())
        }
        Command::Init { database } => load::run_init(&database),
        Command::Load {
            database,
            import_dir,
        } => load::run_load(&database, &import_dir).map(|_| ()),
        Command::Report {
            database,
            codes,
            json,
        } => report::run_report(&database, &codes, json),
    }
}
