//! relang CLI: check and apply translations between language versions.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};

use commands::parse_number;

#[derive(Parser)]
#[command(name = "relang", version, about = "Language-version register translation")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a language descriptor file
    Validate {
        /// Descriptor TOML file
        file: PathBuf,
    },
    /// Check whether an automatic translator exists for two versions
    Check {
        /// Old language descriptor
        old: PathBuf,
        /// New language descriptor
        new: PathBuf,
        /// Output format (text, json)
        #[arg(long)]
        format: Option<String>,
    },
    /// Map an old register span to its new register
    Register {
        /// Old language descriptor
        old: PathBuf,
        /// New language descriptor
        new: PathBuf,
        /// Address space of the old register
        #[arg(long, default_value = "register")]
        space: String,
        /// Byte offset (decimal or 0x-prefixed hex)
        #[arg(long, value_parser = parse_number)]
        offset: u64,
        /// Length in bytes
        #[arg(long, value_parser = parse_number)]
        length: u64,
        /// Output format (text, json)
        #[arg(long)]
        format: Option<String>,
    },
    /// Translate a partial register value
    Translate {
        /// Old language descriptor
        old: PathBuf,
        /// New language descriptor
        new: PathBuf,
        /// Old register name
        #[arg(long)]
        register: String,
        /// Known-bit mask, hex, most significant byte first
        #[arg(long)]
        mask: String,
        /// Bit values, hex, most significant byte first
        #[arg(long)]
        value: String,
        /// Report the value on the new base register
        #[arg(long)]
        base: bool,
        /// Output format (text, json)
        #[arg(long)]
        format: Option<String>,
    },
    /// Map an old compiler-spec id into the new version
    CompilerSpec {
        /// Old language descriptor
        old: PathBuf,
        /// New language descriptor
        new: PathBuf,
        /// Compiler-spec id from the old version
        id: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Validate { file } => commands::validate::run(&file),

        Commands::Check { old, new, format } => {
            commands::check::run(&old, &new, format.as_deref())
        }

        Commands::Register {
            old,
            new,
            space,
            offset,
            length,
            format,
        } => commands::register::run(&old, &new, &space, offset, length, format.as_deref()),

        Commands::Translate {
            old,
            new,
            register,
            mask,
            value,
            base,
            format,
        } => commands::translate::run(
            &old,
            &new,
            &register,
            &mask,
            &value,
            base,
            format.as_deref(),
        ),

        Commands::CompilerSpec { old, new, id } => commands::compiler_spec::run(&old, &new, &id),
    }
}
