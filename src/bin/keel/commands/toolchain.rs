//! `keel toolchain` command

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::cli::{CheckArgs, ListArgs, ShowArgs, ToolchainArgs, ToolchainCommands};
use keel::util::config::load_project_config;
use keel::{Resolver, Toolchain, ToolchainError, ToolchainSpec};

pub fn execute(args: ToolchainArgs) -> Result<()> {
    let resolver = resolver()?;

    match args.command {
        ToolchainCommands::Show(show_args) => show(&resolver, show_args),
        ToolchainCommands::List(list_args) => list(&resolver, list_args),
        ToolchainCommands::Check(check_args) => check(&resolver, check_args),
        ToolchainCommands::Default => default(&resolver),
    }
}

fn resolver() -> Result<Resolver> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;
    let config = load_project_config(&cwd);
    if config.has_overrides() {
        tracing::debug!("Using toolchain config overrides: {:?}", config);
    }

    Resolver::from_config(&config).context("invalid toolchain config")
}

fn show(resolver: &Resolver, args: ShowArgs) -> Result<()> {
    let mut spec = ToolchainSpec::new();
    spec.host = args.host;
    spec.target = args.target;
    spec.arch = args.arch;
    spec.compiler = args.compiler;
    spec.compiler_version = args.compiler_version;

    let toolchain = Toolchain::new(resolver, spec);

    println!("Toolchain: {}", toolchain);
    println!();
    println!("  Host:     {}", toolchain.host());
    println!("  Target:   {}", toolchain.target());
    println!("  Arch:     {}", toolchain.arch());
    println!("  Platform: {}", toolchain.platform());
    println!(
        "  Compiler: {} {}",
        toolchain.compiler(),
        toolchain.compiler_version()
    );
    println!(
        "  Cross:    {}",
        if toolchain.cross_compile() { "yes" } else { "no" }
    );

    if !toolchain.cross_compile() {
        println!();
        println!("  CC:       {}", display_path(toolchain.compiler_path(resolver)));
        println!(
            "  CXX:      {}",
            display_path(toolchain.cxx_compiler_path(resolver))
        );
    }

    Ok(())
}

fn display_path(path: Option<PathBuf>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "not found".to_string())
}

fn list(resolver: &Resolver, args: ListArgs) -> Result<()> {
    let compilers = resolver.all_compilers();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&compilers)?);
        return Ok(());
    }

    if compilers.is_empty() {
        println!("No compilers found on {}", resolver.host());
        return Ok(());
    }

    println!("Installed compilers on {}:", resolver.host());
    for id in &compilers {
        let release = resolver
            .catalog()
            .info(id.family, &id.version)
            .and_then(|info| info.release.as_deref());
        match release {
            Some(release) => println!("  {} {} ({})", id.family, id.version, release),
            None => println!("  {} {}", id.family, id.version),
        }
    }

    Ok(())
}

fn check(resolver: &Resolver, args: CheckArgs) -> Result<()> {
    if !resolver.is_compiler_installed(args.compiler, &args.version) {
        return Err(ToolchainError::NotInstalled {
            compiler: args.compiler.to_string(),
            version: args.version,
        }
        .into());
    }

    println!("{} {} is installed", args.compiler, args.version);
    Ok(())
}

fn default(resolver: &Resolver) -> Result<()> {
    let id = resolver.require_default_compiler()?;
    println!("{} {}", id.family, id.version);
    Ok(())
}
