//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use keel::{CompilerChoice, CompilerFamily};

/// Keel - find, classify and select C/C++ compiler toolchains
#[derive(Parser)]
#[command(name = "keel")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect installed compilers and resolve toolchains
    Toolchain(ToolchainArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct ToolchainArgs {
    #[command(subcommand)]
    pub command: ToolchainCommands,
}

#[derive(Subcommand)]
pub enum ToolchainCommands {
    /// Resolve and show a toolchain descriptor
    Show(ShowArgs),

    /// List every installed compiler version
    List(ListArgs),

    /// Fail unless a compiler is installed at a version
    Check(CheckArgs),

    /// Show the host's default compiler
    Default,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Host label used in the toolchain name
    #[arg(long)]
    pub host: Option<String>,

    /// Target OS (defaults to the host OS)
    #[arg(long)]
    pub target: Option<String>,

    /// Target architecture (defaults to the host architecture)
    #[arg(long)]
    pub arch: Option<String>,

    /// Compiler family: gcc, clang, appleclang, msvc or default
    #[arg(long)]
    pub compiler: Option<CompilerChoice>,

    /// Compiler version (defaults to the newest installed)
    #[arg(long)]
    pub compiler_version: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Compiler family: gcc, clang, appleclang or msvc
    pub compiler: CompilerFamily,

    /// Compiler version, or "default" for any
    #[arg(default_value = "default")]
    pub version: String,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
