use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;

use odata_reverse::fetch::{AuthMode, ConsolePrompt};
use odata_reverse::model::{DataModel, ProjectionStyle};
use odata_reverse::{reverse_metadata, ReverseOptions, ReverseOutcome};

#[derive(Parser)]
#[command(name = "odata-reverse")]
#[command(about = "Reverse-engineer an OData $metadata document into a relational data model")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a $metadata document and build a data model from it
    Reverse {
        /// URI of the $metadata document
        #[arg(long)]
        uri: String,

        /// Name of the produced model
        #[arg(long, default_value = "OData model")]
        name: String,

        /// Authentication mode: none or basic
        #[arg(long, default_value = "none")]
        auth: AuthMode,

        /// Entity set representation: view or replica
        #[arg(long, default_value = "view")]
        projection: ProjectionStyle,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    match cli.command {
        Commands::Reverse {
            uri,
            name,
            auth,
            projection,
        } => {
            let options = ReverseOptions {
                metadata_uri: uri,
                model_name: name.clone(),
                auth_mode: auth,
                projection,
            };
            let mut model = DataModel::new(&name);

            match reverse_metadata(&options, &mut model, &ConsolePrompt)? {
                ReverseOutcome::Cancelled => {
                    println!("Cancelled, no model was built.");
                }
                ReverseOutcome::Completed(report) => {
                    println!("Model '{}' built from {}:", model.name, options.metadata_uri);
                    println!("  {} namespace(s)", model.namespaces.len());
                    println!("  {} domain(s)", model.domains.len());
                    println!("  {} table(s)", model.tables.len());
                    println!("  {} view(s)", model.views.len());
                    println!(
                        "  {} table reference(s), {} view reference(s)",
                        model.references.len(),
                        model.view_references.len()
                    );
                    println!("  {} element(s) added, {} updated", report.added, report.updated);
                }
            }
        }
    }

    Ok(())
}
