// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Faceplate CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use faceplate::cli::{export, ExportFormat, Reporter};
use faceplate::{build, FaceplateParams};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "faceplate")]
#[command(about = "Parametric heating-control faceplate generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the faceplate and print its summary
    Build {
        /// Parameter file (TOML)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format; inferred from the output extension when omitted
        #[arg(short, long, value_enum)]
        format: Option<ExportFormat>,

        /// Leave out the reference plates and modules
        #[arg(long)]
        no_reference: bool,

        /// Fail instead of falling back to sharp corners
        #[arg(long)]
        strict_fillets: bool,

        /// Print the build report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print or save the default parameters as TOML
    Params {
        /// Output file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "faceplate=debug" } else { "faceplate=warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli.command) {
        Reporter::report_error(&format!("{:#}", err));
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Build {
            config,
            output,
            format,
            no_reference,
            strict_fillets,
            json,
        } => {
            let mut params = FaceplateParams::load(config.as_deref())?;
            if no_reference {
                params.build.include_reference = false;
            }
            if strict_fillets {
                params.build.strict_fillets = true;
            }
            build_command(&params, output, format, json)
        }
        Commands::Params { output } => {
            let params = FaceplateParams::default();
            match output {
                Some(path) => {
                    params.save(&path)?;
                    Reporter::success(&format!("Parameters written to {}", path.display()));
                }
                None => print!("{}", params.to_toml()?),
            }
            Ok(())
        }
        Commands::Version => {
            println!("Faceplate v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn build_command(
    params: &FaceplateParams,
    output: Option<PathBuf>,
    format: Option<ExportFormat>,
    json: bool,
) -> Result<()> {
    let faceplate = build(params)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&faceplate.report)
                .context("Failed to serialize build report")?
        );
    } else {
        Reporter::report_build(&faceplate);
        for name in &faceplate.report.fillet_fallbacks {
            Reporter::report_warning(&format!("{name} was built with sharp corners"));
        }
    }

    if let Some(path) = output {
        let format = match format.or_else(|| ExportFormat::from_path(&path)) {
            Some(format) => format,
            None => {
                Reporter::report_warning(&format!(
                    "Unknown extension on {}, writing STL",
                    path.display()
                ));
                ExportFormat::Stl
            }
        };
        export(&faceplate, &path, format)?;
        if !json {
            Reporter::success(&format!("Exported to {}", path.display()));
        }
    }

    Ok(())
}
