mod clear;
mod entries;
mod probe;
mod resolve;
mod resource;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "codepath",
    version,
    about = "Archive search path resolver for code units, resources and native libraries",
    long_about = "Codepath resolves qualified names against an ordered list of archives, \
                  deriving and caching an optimized unit per archive under an output \
                  directory. Lookups follow configured order: the first archive containing \
                  a name wins."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a code unit by qualified name
    Resolve {
        /// Qualified unit name, e.g. com.acme.Widget
        name: String,
        /// Delimiter-separated list of archives, highest priority first
        #[arg(long, value_name = "LIST")]
        path: String,
        /// Directory receiving derived artifacts
        #[arg(long, value_name = "DIR")]
        out: PathBuf,
        /// Extra native-library directories, appended after the default path
        #[arg(long, value_name = "LIST")]
        lib_path: Option<String>,
        /// Emit the binding as JSON
        #[arg(long)]
        json: bool,
    },
    /// Locate a resource inside the configured archives
    Resource {
        /// Slash-separated member name, e.g. data/x.txt
        name: String,
        #[arg(long, value_name = "LIST")]
        path: String,
        #[arg(long, value_name = "DIR")]
        out: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Probe the native library search path for a bare library name
    Lib {
        /// Platform-neutral library name, e.g. demo for libdemo.so
        name: String,
        #[arg(long, value_name = "LIST")]
        lib_path: Option<String>,
    },
    /// List every search path entry and its derived artifact
    Entries {
        #[arg(long, value_name = "LIST")]
        path: String,
        #[arg(long, value_name = "DIR")]
        out: PathBuf,
    },
    /// Delete derived artifacts from an output directory
    Clear {
        #[arg(long, value_name = "DIR")]
        out: PathBuf,
    },
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let _guard = codepath_core::logging::init_logging("cli", true);

    match cli.command {
        Commands::Resolve {
            name,
            path,
            out,
            lib_path,
            json,
        } => resolve::run(&name, &path, &out, lib_path.as_deref(), json),
        Commands::Resource {
            name,
            path,
            out,
            json,
        } => resource::run(&name, &path, &out, json),
        Commands::Lib { name, lib_path } => probe::run(&name, lib_path.as_deref()),
        Commands::Entries { path, out } => entries::run(&path, &out),
        Commands::Clear { out } => clear::run(&out),
    }
}
