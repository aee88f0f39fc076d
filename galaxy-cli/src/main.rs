use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{ArgAction, Args, Parser, ValueEnum, value_parser};
use galaxy_core::{
    CompileOptions, Diagnostics, OverflowPolicy, Token, Visited, analyze_lexed, print_program,
    read_source, release, tokenize_with,
};
use tracing::level_filters::LevelFilter;
use tracing::{debug, trace};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Layer, Registry};

/// Command line for the Galaxy front end.
#[derive(Parser, Debug)]
#[command(version, about = "Lex and parse a Galaxy source file", long_about = None)]
struct Cli {
    #[command(flatten)]
    logging: LoggingArgs,

    /// Source file to compile
    #[arg(value_name = "SOURCE", value_hint = clap::ValueHint::FilePath)]
    source: PathBuf,

    #[arg(long, help = "Print every token before parsing")]
    dump_tokens: bool,

    #[arg(long, help = "Print the syntax tree")]
    dump_ast: bool,

    #[arg(
        long,
        value_enum,
        value_name = "POLICY",
        default_value_t = Overflow::Split,
        help = "What to do with identifiers and strings longer than their buffer"
    )]
    overflow: Overflow,
}

/// `-v[v]` / `-q[q]` logging verbosity.
#[derive(Debug, Clone, Copy, Args)]
struct LoggingArgs {
    #[arg(short = 'v', value_parser = value_parser!(u8).range(0..=2), action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,
    #[arg(short = 'q', value_parser = value_parser!(u8).range(0..=2), action = ArgAction::Count, conflicts_with = "verbose")]
    quiet: u8,
}

impl LoggingArgs {
    fn log_level_filter(&self) -> LevelFilter {
        match self.verbose as i8 - self.quiet as i8 {
            i8::MIN..=-2 => LevelFilter::OFF,
            -1 => LevelFilter::ERROR,
            0 => LevelFilter::WARN,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Overflow {
    /// Cut at the limit and lex the rest as a new token
    Split,
    /// Consume the whole literal, keep only what fits
    Truncate,
}

impl From<Overflow> for OverflowPolicy {
    fn from(value: Overflow) -> Self {
        match value {
            Overflow::Split => OverflowPolicy::Split,
            Overflow::Truncate => OverflowPolicy::Truncate,
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                err.exit();
            }
            // Usage errors exit with 1, like every other failure.
            if let Err(io_err) = err.print() {
                eprintln!("{err}(could not print usage: {io_err})");
            }
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_logging(cli.logging.log_level_filter()) {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }
    trace!("starting galaxy-cli with args: {cli:?}");

    match execute(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(level_filter: LevelFilter) -> Result<()> {
    let registry = Registry::default().with(
        tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
            .with_filter(level_filter),
    );
    tracing::subscriber::set_global_default(registry)
        .context("failed to install the log subscriber")?;
    Ok(())
}

fn execute(cli: &Cli) -> Result<ExitCode> {
    let path = cli.source.display().to_string();
    let file = File::open(&cli.source).with_context(|| format!("error opening file '{path}'"))?;
    let source = read_source(file).with_context(|| format!("error reading file '{path}'"))?;
    let options = CompileOptions {
        overflow: cli.overflow.into(),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let lexed = tokenize_with(&source, &path, &options.lex_options());
    if cli.dump_tokens {
        for token in &lexed.tokens {
            write_token(&mut out, token)?;
        }
    }

    let output = analyze_lexed(lexed);
    debug!(tokens = output.token_count, "analyzed {path}");

    if cli.dump_ast {
        print_program(&output.program, 0, &mut Visited::new(), &mut out)
            .context("failed to write the syntax tree")?;
    }
    out.flush()?;

    let code = report(&output.diagnostics)?;
    let released = release(output.program, &mut Visited::new());
    trace!(released, "released syntax tree");
    Ok(code)
}

fn write_token(out: &mut impl Write, token: &Token<'_>) -> io::Result<()> {
    let position = format!("{}:{}", token.span.line, token.span.column_start);
    writeln!(
        out,
        "{position:<8} {:<16} {:?}",
        token.kind.to_string(),
        token.lexeme
    )
}

/// Print every diagnostic and a summary to stderr.
fn report(diagnostics: &Diagnostics) -> Result<ExitCode> {
    if diagnostics.is_empty() {
        return Ok(ExitCode::SUCCESS);
    }

    let stderr = io::stderr();
    let mut err = stderr.lock();
    for diagnostic in diagnostics {
        writeln!(err, "{diagnostic}")?;
    }
    let errors = diagnostics.error_count();
    let warnings = diagnostics.len() - errors;
    writeln!(err, "{errors} error(s), {warnings} warning(s)")?;
    Ok(ExitCode::FAILURE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_arguments() {
        let cli = Cli::try_parse_from(["galaxy-cli", "main.gx", "--overflow", "truncate", "-vv"])
            .expect("could not parse test args");
        assert_eq!(cli.source, PathBuf::from("main.gx"));
        assert_eq!(cli.overflow, Overflow::Truncate);
        assert_eq!(cli.logging.log_level_filter(), LevelFilter::TRACE);
        assert!(!cli.dump_ast);
    }

    #[test]
    fn maps_verbosity_to_levels() {
        let level = |args: &[&str]| {
            let mut argv = vec!["galaxy-cli", "main.gx"];
            argv.extend_from_slice(args);
            Cli::try_parse_from(argv)
                .expect("could not parse test args")
                .logging
                .log_level_filter()
        };
        assert_eq!(level(&["-qq"]), LevelFilter::OFF);
        assert_eq!(level(&["-q"]), LevelFilter::ERROR);
        assert_eq!(level(&[]), LevelFilter::WARN);
        assert_eq!(level(&["-v"]), LevelFilter::DEBUG);
    }

    #[test]
    fn conflicting_verbosity_is_a_usage_error() {
        let err = Cli::try_parse_from(["galaxy-cli", "main.gx", "-v", "-q"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn missing_source_is_a_usage_error() {
        let err = Cli::try_parse_from(["galaxy-cli"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }
}
