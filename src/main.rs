//! strata - style cascade and stylesheet generator

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{Level, info};

use strata::{
    CssSyntaxValidator, GenerateOptions, Property, Snapshot, SnapshotData, StyleMap, ToCss,
    Value, evaluate_unit_value, generate, parse_value, resolve_with_origin,
};

#[derive(Parser)]
#[command(name = "strata")]
#[command(version, about = "Breakpoint-aware style cascade", long_about = None)]
#[command(after_help = "EXAMPLES:
    strata generate site.json -o site.css       Write the stylesheet
    strata resolve site.json --instance box --property width --breakpoint tablet
    strata parse width '10px'                   Show how input is parsed
    strata eval '16px * 2'                      Evaluate arithmetic")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// More log output (repeat for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress log output
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a stylesheet from a snapshot
    Generate {
        /// Snapshot JSON file
        snapshot: PathBuf,

        /// One class per distinct declaration
        #[arg(long)]
        atomic: bool,

        /// Prefix for generated class names
        #[arg(long, value_name = "PREFIX")]
        class_prefix: Option<String>,

        /// Generator options as JSON (flags override it)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Write CSS here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Write the instance → classes map as JSON
        #[arg(long, value_name = "FILE")]
        class_map: Option<PathBuf>,
    },

    /// Resolve the effective value of one property
    Resolve {
        /// Snapshot JSON file
        snapshot: PathBuf,

        #[arg(long)]
        instance: String,

        #[arg(long)]
        property: String,

        #[arg(long)]
        breakpoint: String,

        /// Pseudo-state such as :hover
        #[arg(long)]
        state: Option<String>,
    },

    /// Parse a typed value
    Parse {
        property: String,

        input: String,

        /// Current style of the instance as a JSON map (for unit inheritance)
        #[arg(long, value_name = "FILE")]
        current: Option<PathBuf>,

        /// Reject values that are not well-formed CSS
        #[arg(long)]
        validate: bool,
    },

    /// Evaluate arithmetic such as `10px + 5`
    Eval { expression: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Command::Generate {
            snapshot,
            atomic,
            class_prefix,
            config,
            output,
            class_map,
        } => run_generate(
            &snapshot,
            atomic,
            class_prefix,
            config.as_deref(),
            output.as_deref(),
            class_map.as_deref(),
        ),
        Command::Resolve {
            snapshot,
            instance,
            property,
            breakpoint,
            state,
        } => run_resolve(&snapshot, &instance, &property, &breakpoint, state.as_deref()),
        Command::Parse {
            property,
            input,
            current,
            validate,
        } => run_parse(&property, &input, current.as_deref(), validate),
        Command::Eval { expression } => run_eval(&expression),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::WARN,
        (false, 1) => Level::INFO,
        (false, 2) => Level::DEBUG,
        (false, _) => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_snapshot(path: &Path) -> strata::Result<Snapshot> {
    let file = File::open(path)?;
    let data = SnapshotData::from_reader(BufReader::new(file))?;
    let snapshot = Snapshot::from_data(data)?;
    info!(
        path = %path.display(),
        breakpoints = snapshot.breakpoints().len(),
        decls = snapshot.decl_count(),
        "loaded snapshot"
    );
    Ok(snapshot)
}

fn run_generate(
    snapshot: &Path,
    atomic: bool,
    class_prefix: Option<String>,
    config: Option<&Path>,
    output: Option<&Path>,
    class_map: Option<&Path>,
) -> strata::Result<()> {
    let mut options = match config {
        Some(path) => serde_json::from_reader(BufReader::new(File::open(path)?))?,
        None => GenerateOptions::default(),
    };
    if atomic {
        options.atomic = true;
    }
    if let Some(prefix) = class_prefix {
        options.class_prefix = prefix;
    }

    let snapshot = load_snapshot(snapshot)?;
    let css = generate(&snapshot, &options)?;

    match output {
        Some(path) => {
            fs::write(path, &css.css_text)?;
            info!(path = %path.display(), bytes = css.css_text.len(), "wrote stylesheet");
        }
        None => print!("{}", css.css_text),
    }
    if let Some(path) = class_map {
        fs::write(path, serde_json::to_string_pretty(&css.class_map)?)?;
        info!(path = %path.display(), instances = css.class_map.len(), "wrote class map");
    }
    Ok(())
}

fn run_resolve(
    snapshot: &Path,
    instance: &str,
    property: &str,
    breakpoint: &str,
    state: Option<&str>,
) -> strata::Result<()> {
    let snapshot = load_snapshot(snapshot)?;
    let breakpoint = breakpoint.into();
    if snapshot.breakpoint(&breakpoint).is_none() {
        return Err(strata::Error::UnknownBreakpoint(breakpoint));
    }

    let property = Property::from(property);
    match resolve_with_origin(&snapshot, &instance.into(), &property, &breakpoint, state) {
        Some(resolved) => {
            println!("{}: {}", property.css_name(), resolved.value.to_css_string());
            println!("  source: {}", resolved.style_source_id);
            println!("  breakpoint: {}", resolved.breakpoint_id);
            if resolved.stated {
                println!("  state: {}", state.unwrap_or_default());
            }
        }
        None => println!("{}: (not set)", property.css_name()),
    }
    Ok(())
}

fn run_parse(
    property: &str,
    input: &str,
    current: Option<&Path>,
    validate: bool,
) -> strata::Result<()> {
    let current: StyleMap = match current {
        Some(path) => serde_json::from_reader(BufReader::new(File::open(path)?))?,
        None => StyleMap::new(),
    };
    let property = Property::from(property);
    let validator = CssSyntaxValidator;
    let value = parse_value(
        &property,
        input,
        &current,
        validate.then_some(&validator as &dyn strata::ValueValidator),
    );

    println!("{}", serde_json::to_string_pretty(&value)?);
    if !matches!(value, Value::Invalid { .. }) {
        println!("{}: {}", property.css_name(), value.to_css_string());
    }
    Ok(())
}

fn run_eval(expression: &str) -> strata::Result<()> {
    let result = evaluate_unit_value(expression);
    match result.math_result {
        Some(number) => {
            let value = match result.matched_unit {
                Some(unit) => Value::unit(number, unit),
                None => Value::number(number),
            };
            println!("{}", value.to_css_string());
            Ok(())
        }
        None => Err(strata::Error::InvalidValue {
            property: "expression".to_string(),
            raw: expression.to_string(),
        }),
    }
}
