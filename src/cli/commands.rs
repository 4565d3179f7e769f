//! Command dispatch

use crate::analyzer::DependencyAnalyzer;
use crate::build::{self, environment_status, BuildRequest, Bundler, LuastaticBundler};
use crate::cli::args::{Args, CliCommand};
use crate::config;
use crate::error::{LuapackError, Result, ResultExt};
use crate::models::Settings;
use crate::output::{create_formatter, create_writer};
use ansi_term::Colour::{Green, Red};
use std::path::{Path, PathBuf};

/// Execute the parsed command line
pub fn run(args: Args) -> Result<()> {
    let overrides = args.to_partial_settings();
    let settings = config::load_config(overrides, args.config.as_deref())?;

    match args.command {
        CliCommand::Analyze { script, .. } => run_analyze(&script, &settings),
        CliCommand::Build {
            script,
            require,
            exclude,
            manual,
            binary,
            ..
        } => run_build(&script, require, exclude, manual, binary, &settings),
        CliCommand::Engines => run_engines(&settings),
        CliCommand::Init => run_init(),
    }
}

/// Reject paths that cannot possibly be an entry script
fn validate_script(script: &Path) -> Result<()> {
    if !script.exists() {
        return Err(LuapackError::missing_file(script));
    }
    if script.is_dir() {
        return Err(LuapackError::InvalidPath {
            path: script.to_path_buf(),
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        });
    }
    Ok(())
}

fn run_analyze(script: &Path, settings: &Settings) -> Result<()> {
    validate_script(script)?;

    if !settings.quiet {
        println!("Analyzing {}", script.display());
    }

    let report = DependencyAnalyzer::new(settings.max_dependencies).analyze(script)?;

    let formatter = create_formatter(
        settings.output_format,
        settings.use_colors,
        settings.verbose,
        settings.quiet,
    );
    let formatted = formatter
        .format(&report)
        .with_context(|| format!("Failed to format report as {}", settings.output_format))?;
    create_writer(settings.output_file.as_ref()).write(&formatted)?;

    if let Some(path) = &settings.output_file {
        if !settings.quiet {
            println!("Report written to {}", path.display());
        }
    }

    Ok(())
}

fn run_build(
    script: &Path,
    require: Vec<PathBuf>,
    exclude: Vec<PathBuf>,
    manual: bool,
    binary: Option<PathBuf>,
    settings: &Settings,
) -> Result<()> {
    validate_script(script)?;

    let mut request = BuildRequest::new(script);
    request.include = require;
    request.exclude = exclude;
    request.skip_analysis = manual;
    request.max_dependencies = settings.max_dependencies;
    request.output = binary;

    let plan = build::plan(&request)?;

    if !settings.quiet {
        println!(
            "Bundling {} with {} scripts and {} native libraries",
            plan.entry.display(),
            plan.scripts.len(),
            plan.libraries.len()
        );
        if settings.verbose {
            for script in &plan.scripts {
                println!("  script  {}", script.display());
            }
            for library in &plan.libraries {
                println!("  native  {}", library.display());
            }
        }
    }

    let bundler = LuastaticBundler::new();
    let produced = bundler.bundle(&plan)?;

    if !settings.quiet {
        println!("Built {}", produced.display());
    }

    Ok(())
}

fn run_engines(settings: &Settings) -> Result<()> {
    let status = environment_status();

    let describe = |found: bool| {
        if !settings.use_colors {
            return if found { "found" } else { "missing" }.to_string();
        }
        if found {
            Green.paint("found").to_string()
        } else {
            Red.paint("missing").to_string()
        }
    };

    println!("luastatic:  {}", describe(status.luastatic));
    println!("C compiler: {}", describe(status.c_compiler));

    if status.ready() {
        println!("\nEnvironment is ready to build.");
    } else {
        println!("\nInstall the missing tool(s) before running 'luapack build'.");
    }

    Ok(())
}

fn run_init() -> Result<()> {
    let path = PathBuf::from(config::parser::CONFIG_FILE_NAME);

    if path.exists() {
        println!("Configuration file already exists at: {}", path.display());
        println!("To overwrite it, delete the file first and run this command again.");
        return Ok(());
    }

    config::create_default_config(&path)?;

    println!("Created default configuration file at: {}", path.display());
    println!("\nEdit it to change the dependency limit, output format, or verbosity defaults.");

    Ok(())
}
