use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use xid::{OutputFormat, Xid, XidFields, XidGen, write_fields, write_generated};

/// Value of `--decode`/`--validate` that means "read lines from stdin".
const STDIN_SENTINEL: &str = "-";

/// Generate, decode and validate XIDs.
#[derive(Parser, Debug, Clone)]
#[command(name = "xid", version, about = "Generate, decode and validate XIDs")]
struct CliArgs {
    /// Number of XIDs to generate.
    #[arg(short = 'n', long = "count", env = "XID_COUNT", default_value_t = 1)]
    count: usize,

    /// Output format for generated XIDs: text (alias: hex) or binary.
    #[arg(long, env = "XID_FORMAT", default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Separator written between generated XIDs in text format.
    #[arg(short, long, default_value = "\n")]
    separator: String,

    /// Verbose output: expanded fields when generating, failures on the
    /// output sink when validating.
    #[arg(short, long)]
    verbose: bool,

    /// Decode an XID, or `-` to decode one per line from stdin.
    #[arg(long, value_name = "XID|-", conflicts_with = "validate")]
    decode: Option<String>,

    /// Validate an XID, or `-` to validate one per line from stdin.
    #[arg(long, value_name = "XID|-")]
    validate: Option<String>,

    /// Print decoded fields as JSON, one object per line.
    #[arg(long, requires = "decode")]
    json: bool,

    /// Write output to a file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Run `f` on `value`, or on every non-blank trimmed line of `input` when
/// `value` is the stdin sentinel. Stops at the first error or `false`.
fn for_each_input<R, F>(value: &str, input: R, mut f: F) -> Result<bool>
where
    R: BufRead,
    F: FnMut(&str) -> Result<bool>,
{
    if value != STDIN_SENTINEL {
        return f(value);
    }

    for line in input.lines() {
        let line = line.context("Read stdin error")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if !f(line)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn run_decode<R: BufRead>(out: &mut dyn Write, value: &str, input: R, json: bool) -> Result<bool> {
    let ok = for_each_input(value, input, |text| {
        let id = Xid::decode(text).context("Decode error")?;
        if json {
            let payload = serde_json::to_string(&XidFields::from(&id))?;
            writeln!(out, "{payload}")?;
        } else {
            write_fields(&mut *out, &id)?;
        }
        Ok(true)
    })?;
    out.flush()?;
    Ok(ok)
}

fn run_validate<R: BufRead>(
    out: &mut dyn Write,
    err: &mut dyn Write,
    value: &str,
    input: R,
    verbose: bool,
) -> Result<bool> {
    let ok = for_each_input(value, input, |text| match xid::validate(text) {
        Ok(()) => Ok(true),
        Err(e) => {
            tracing::debug!(error = %e, "validation failed");
            let sink: &mut dyn Write = if verbose { &mut *out } else { &mut *err };
            writeln!(sink, "Invalid {text:?}")?;
            Ok(false)
        }
    })?;
    out.flush()?;
    Ok(ok)
}

fn run_generate(out: &mut dyn Write, args: &CliArgs) -> Result<bool> {
    let generator = XidGen::global();
    tracing::debug!(count = args.count, format = %args.format, "generating xids");
    let ids = (0..args.count).map(|_| generator.next_xid());
    write_generated(out, ids, args.format, &args.separator, args.verbose)?;
    Ok(true)
}

fn run<R: BufRead>(args: &CliArgs, input: R, out: &mut dyn Write, err: &mut dyn Write) -> Result<bool> {
    if let Some(value) = &args.decode {
        run_decode(out, value, input, args.json)
    } else if let Some(value) = &args.validate {
        run_validate(out, err, value, input, args.verbose)
    } else {
        run_generate(out, args)
    }
}

fn open_output(path: Option<&PathBuf>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Open file error: {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}

fn main() {
    let args = CliArgs::parse();
    init_tracing();

    let res = open_output(args.output.as_ref()).and_then(|mut out| {
        let stdin = io::stdin().lock();
        let mut stderr = io::stderr().lock();
        run(&args, stdin, out.as_mut(), &mut stderr)
    });

    match res {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            eprintln!("{err:#}");
            process::exit(1);
        }
    }
}
