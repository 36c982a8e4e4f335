use clap::{Parser, Subcommand};
use colored::Colorize;
use holster::commands;

#[derive(Parser)]
#[command(name = "holster")]
#[command(about = "Generate Android ViewHolder/ViewModel boilerplate from layout XML", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the injectable view IDs in a layout file (or every layout under a directory)
    List {
        /// Path to a layout .xml file or a res/layout directory
        target: String,
    },
    /// Write a selection session file for a layout
    Init {
        /// Path to the layout .xml file
        layout: String,
        /// Session file to write (default: holster.toml)
        #[arg(long)]
        session: Option<String>,
        /// Overwrite an existing session file
        #[arg(long)]
        force: bool,
    },
    /// Generate the ViewHolder/ViewModel pair for a layout
    /// Prints to stdout, or splices into a Java class file with --into
    Generate {
        /// Path to the layout .xml file
        layout: String,
        /// Selection session file (default: holster.toml if present)
        #[arg(long)]
        session: Option<String>,
        /// Java file to splice the generated classes into
        #[arg(long)]
        into: Option<String>,
        /// Override the holder base name (e.g. LoginActivity)
        #[arg(long)]
        name: Option<String>,
    },
    /// Regenerate automatically when the layout or session changes
    Watch {
        /// Path to the layout .xml file
        layout: String,
        /// Java file to splice the generated classes into
        #[arg(long)]
        into: String,
        /// Selection session file (default: holster.toml if present)
        #[arg(long)]
        session: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::List { target } => commands::list::execute(&target),
        Commands::Init {
            layout,
            session,
            force,
        } => commands::init::execute(&layout, session.as_deref(), force),
        Commands::Generate {
            layout,
            session,
            into,
            name,
        } => commands::generate::execute(
            &layout,
            session.as_deref(),
            into.as_deref(),
            name.as_deref(),
        ),
        Commands::Watch {
            layout,
            into,
            session,
        } => commands::watch::execute(&layout, &into, session.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
