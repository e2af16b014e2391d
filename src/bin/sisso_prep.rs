//! sisso-prep CLI entry point.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sisso_prep::{
    config::DEFAULT_CONFIG_FILE, load_feature_dimensions, read_input_file, write_inputs,
    DataDialect, KeywordOverrides, LoaderConfig, ModelType, NormalCompletionValidator,
    SissoDataset, SissoIn, Validator,
};

#[derive(Parser)]
#[command(name = "sisso-prep")]
#[command(about = "Prepare SISSO inputs and check SISSO runs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write train.dat and SISSO.in for a dataset
    Input {
        /// Dataset file
        data: PathBuf,

        /// Dataset layout (dat, csv)
        #[arg(long, default_value = "dat")]
        dialect: DataDialect,

        /// Field delimiter for csv files
        #[arg(long, default_value = ",")]
        delimiter: char,

        /// Sample identifier column
        #[arg(long)]
        sample_column: Option<String>,

        /// Target property column
        #[arg(long)]
        target_column: Option<String>,

        /// Column holding 1-based task indices (csv only)
        #[arg(long)]
        task_column: Option<String>,

        /// Sizes of consecutive task blocks
        #[arg(long, value_delimiter = ',')]
        task_sizes: Option<Vec<usize>>,

        /// Kind of model (regression, classification)
        #[arg(long, default_value = "regression")]
        model_type: ModelType,

        /// Feature dimension mapping (.toml or .json)
        #[arg(long)]
        dimensions: Option<PathBuf>,

        /// Keyword overrides (.toml or .json), defaults to sisso.toml when present
        #[arg(short, long)]
        keywords: Option<PathBuf>,

        /// Raise too-small search sizes instead of failing
        #[arg(long)]
        auto_fix: bool,

        /// Directory receiving train.dat and SISSO.in
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Print SISSO.in instead of writing files
        #[arg(long)]
        dry_run: bool,
    },

    /// Check whether a SISSO run completed normally (exit code 1 if not)
    Check {
        /// Run directory
        #[arg(long = "dir", default_value = ".")]
        directory: PathBuf,

        /// Primary output file name
        #[arg(long, default_value = sisso_prep::DEFAULT_OUTPUT_FILE)]
        output: String,

        /// Stdout file name
        #[arg(long, default_value = sisso_prep::DEFAULT_STDOUT_FILE)]
        stdout: String,

        /// Stderr file name
        #[arg(long, default_value = sisso_prep::DEFAULT_STDERR_FILE)]
        stderr: String,
    },

    /// List the keywords of an existing SISSO.in
    Show {
        /// SISSO.in file
        #[arg(default_value = sisso_prep::SISSO_INPUT_FILE)]
        input: PathBuf,
    },
}

fn main() {
    sisso_prep::init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Input {
            data,
            dialect,
            delimiter,
            sample_column,
            target_column,
            task_column,
            task_sizes,
            model_type,
            dimensions,
            keywords,
            auto_fix,
            output_dir,
            dry_run,
        } => {
            let loader = LoaderConfig {
                dialect,
                delimiter,
                sample_column,
                target_column,
                task_column,
                task_sizes,
                model_type,
            };
            input_command(
                &data,
                &loader,
                dimensions.as_deref(),
                keywords.as_deref(),
                auto_fix,
                &output_dir,
                dry_run,
            )
        }
        Commands::Check {
            directory,
            output,
            stdout,
            stderr,
        } => check_command(&directory, &output, &stdout, &stderr),
        Commands::Show { input } => show_command(&input),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("error: {:#}", e);
            std::process::exit(2);
        }
    }
}

fn input_command(
    data: &Path,
    loader: &LoaderConfig,
    dimensions: Option<&Path>,
    keywords: Option<&Path>,
    auto_fix: bool,
    output_dir: &Path,
    dry_run: bool,
) -> Result<bool> {
    let dimensions = dimensions
        .map(load_feature_dimensions)
        .transpose()
        .context("loading feature dimensions")?;
    let dataset = SissoDataset::from_file(data, loader, dimensions.as_ref())
        .with_context(|| format!("loading {}", data.display()))?;

    let keywords = match keywords {
        Some(path) => Some(path.to_path_buf()),
        None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|path| path.is_file()),
    };
    let overrides = match &keywords {
        Some(path) => KeywordOverrides::load_from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => KeywordOverrides::default(),
    };

    let mut builder = SissoIn::builder_from_dataset(&dataset).apply_overrides(&overrides);
    if auto_fix {
        builder = builder.auto_fix(true);
    }
    let sisso_in = builder.build().context("building SISSO.in")?;

    if dry_run {
        print!("{}", sisso_in);
        return Ok(true);
    }
    let (data_path, input_path) = write_inputs(output_dir, &dataset, &sisso_in)?;
    println!("{}", data_path.display());
    println!("{}", input_path.display());
    Ok(true)
}

fn check_command(directory: &Path, output: &str, stdout: &str, stderr: &str) -> Result<bool> {
    let validator = NormalCompletionValidator::new(
        directory.join(output),
        directory.join(stdout),
        directory.join(stderr),
    );
    let status = validator.assess();
    println!("{}: {}", directory.display(), status);
    Ok(!validator.check())
}

fn show_command(input: &Path) -> Result<bool> {
    let keywords =
        read_input_file(input).with_context(|| format!("reading {}", input.display()))?;
    for (key, value) in keywords {
        println!("{:<16} {}", key, value);
    }
    Ok(true)
}
