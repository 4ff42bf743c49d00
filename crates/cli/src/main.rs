use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use dataconfig::template::{template_text, TEMPLATE_FILE_NAME};
use dataconfig_core::constants::{CHECK_FILES_ENV, DATA_CONFIG_PATH_ENV, MAX_DOCUMENT_BYTES_ENV};
use dataconfig_core::{
    check_text, load_data_config, loader::read_document, participant_list,
    repeated_measures_list, summarise, CoreConfig, GroupSubjectList, RepeatedMeasures,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dataconfig")]
#[command(about = "Inspect and validate neuroimaging data-configuration files")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the data-configuration template
    Template {
        /// Write the template into this directory instead of printing it
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Check a data configuration against the template layout
    Check {
        /// Data configuration (defaults to DATACONFIG_PATH)
        file: Option<PathBuf>,
        /// Report local scan files that do not exist
        #[arg(long)]
        check_files: bool,
        /// Print findings as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Summarise sites, subjects, sessions and scans
    Summary {
        /// Data configuration (defaults to DATACONFIG_PATH)
        file: Option<PathBuf>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Re-emit a data configuration in normalised form
    Render {
        /// Data configuration (defaults to DATACONFIG_PATH)
        file: Option<PathBuf>,
    },
    /// Generate a group-analysis participant list
    GroupList {
        /// Data configuration (defaults to DATACONFIG_PATH)
        file: Option<PathBuf>,
        /// Generate a repeated-measures list
        #[arg(long, value_enum)]
        repeated_measures: Option<RepeatedMeasuresArg>,
    },
    /// Keep only the participants of a group list that have derivative outputs
    FilterGroupList {
        /// Group-analysis participant list
        list: PathBuf,
        /// File with one derivative path per line
        #[arg(long)]
        paths: PathBuf,
        /// The list is in the repeated-measures format
        #[arg(long)]
        repeated_measures: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RepeatedMeasuresArg {
    Sessions,
    Scans,
    SessionsAndScans,
}

impl From<RepeatedMeasuresArg> for RepeatedMeasures {
    fn from(value: RepeatedMeasuresArg) -> Self {
        match value {
            RepeatedMeasuresArg::Sessions => RepeatedMeasures::Sessions,
            RepeatedMeasuresArg::Scans => RepeatedMeasures::Scans,
            RepeatedMeasuresArg::SessionsAndScans => RepeatedMeasures::SessionsAndScans,
        }
    }
}

/// Entry point for the `dataconfig` command.
///
/// # Environment Variables
/// - `DATACONFIG_PATH`: data configuration used when no file is given
/// - `DATACONFIG_CHECK_FILES`: check that local scan files exist (`1`/`true`/`yes`/`on`)
/// - `DATACONFIG_MAX_BYTES`: largest document accepted (default 16 MiB)
/// - `RUST_LOG`: log filter, logs go to stderr
fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("dataconfig=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let core = CoreConfig::from_env_values(
        std::env::var(DATA_CONFIG_PATH_ENV).ok(),
        std::env::var(CHECK_FILES_ENV).ok(),
        std::env::var(MAX_DOCUMENT_BYTES_ENV).ok(),
    )
    .context("invalid environment configuration")?;

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Template { output_dir }) => match output_dir {
            Some(dir) => {
                let path = dir.join(TEMPLATE_FILE_NAME);
                std::fs::write(&path, template_text())
                    .with_context(|| format!("failed to write {}", path.display()))?;
                tracing::info!(path = %path.display(), "wrote data configuration template");
                println!("Wrote template to {}", path.display());
            }
            None => print!("{}", template_text()),
        },
        Some(Commands::Check {
            file,
            check_files,
            json,
        }) => {
            let core = if check_files {
                CoreConfig::new(
                    core.data_config_path().map(Path::to_path_buf),
                    true,
                    core.max_document_bytes(),
                )?
            } else {
                core
            };
            let path = core.resolve_document_path(file)?;
            let text = read_document(&path, &core)?;
            let report = check_text(&path, &text, &core)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{report}");
            }
            if report.has_errors() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Some(Commands::Summary { file, json }) => {
            let path = core.resolve_document_path(file)?;
            let loaded = load_data_config(&path, &core)?;
            let summary = summarise(&loaded.config);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{summary}");
            }
        }
        Some(Commands::Render { file }) => {
            let path = core.resolve_document_path(file)?;
            let loaded = load_data_config(&path, &core)?;
            print!("{}", loaded.config.render()?);
        }
        Some(Commands::GroupList {
            file,
            repeated_measures,
        }) => {
            let path = core.resolve_document_path(file)?;
            let loaded = load_data_config(&path, &core)?;
            let lines = match repeated_measures {
                Some(mode) => repeated_measures_list(&loaded.config, mode.into()),
                None => participant_list(&loaded.config),
            };
            for line in lines {
                println!("{line}");
            }
        }
        Some(Commands::FilterGroupList {
            list,
            paths,
            repeated_measures,
        }) => {
            let list_text = read_document(&list, &core)?;
            let group_list = GroupSubjectList::parse(&list_text, repeated_measures)
                .with_context(|| format!("invalid group list {}", list.display()))?;

            let paths_text = read_document(&paths, &core)?;
            let derivative_paths: Vec<&str> = paths_text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .collect();

            let retained = group_list.retain_present(&derivative_paths)?;
            tracing::info!(
                list = %list.display(),
                kept = retained.list.len(),
                missing = retained.missing.len(),
                "filtered group list"
            );
            for subject in &retained.missing {
                eprintln!("missing outputs: {subject}");
            }
            print!("{}", retained.list.render());
        }
        None => {
            println!("Use 'dataconfig --help' for commands");
        }
    }

    Ok(ExitCode::SUCCESS)
}
