// ==============================================================================
// CLI for the IPC Stub Compiler
// ==============================================================================
//
//   ipcstub [--target ilp32|lp64] [--emit header|json] -o OUT IDL
//
// Reads one IDL file (or stdin for `-`), writes the generated header (or the
// JSON model dump) to OUT (or stdout for `-`). Diagnostics go to stderr in the
// compact `ipcstub: error: ...` form. Exit status is 0 on success, 1 on any
// failure; nothing is written when compilation fails.

use std::fs;
use std::io::{self, Read as _, Write as _};
use std::process::ExitCode;

use ipcstub::{Ipcstub, StubOutput, StubReportHandler, Target};
use miette::{Context, IntoDiagnostic};

const USAGE: &str = "\
Usage: ipcstub [OPTIONS] -o <OUT> <IDL>

Compile a message IDL file into a C header of IPC stubs.

Arguments:
  <IDL>                  input IDL file (`-` reads stdin)

Options:
  -o, --output <OUT>     output path (`-` writes stdout)
      --target <MODEL>   data model for size checks: ilp32 (default) or lp64
      --emit <FORMAT>    what to write: header (default) or json
  -h, --help             print this help
  -V, --version          print the version
";

// ==============================================================================
// Argument Parsing
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Emit {
    #[default]
    Header,
    Json,
}

impl std::str::FromStr for Emit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "header" => Ok(Emit::Header),
            "json" => Ok(Emit::Json),
            other => Err(format!(
                "unknown output format `{other}` (expected `header` or `json`)"
            )),
        }
    }
}

#[derive(Debug)]
struct Args {
    input: String,
    output: String,
    target: Target,
    emit: Emit,
}

#[derive(Debug)]
enum Command {
    Compile(Args),
    Help,
    Version,
}

fn parse_args() -> Result<Command, lexopt::Error> {
    use lexopt::prelude::*;

    let mut input = None;
    let mut output = None;
    let mut target = Target::default();
    let mut emit = Emit::default();

    let mut parser = lexopt::Parser::from_env();
    while let Some(arg) = parser.next()? {
        match arg {
            Short('o') | Long("output") => output = Some(parser.value()?.string()?),
            Long("target") => target = parser.value()?.parse()?,
            Long("emit") => emit = parser.value()?.parse()?,
            Short('h') | Long("help") => return Ok(Command::Help),
            Short('V') | Long("version") => return Ok(Command::Version),
            Value(value) if input.is_none() => input = Some(value.string()?),
            _ => return Err(arg.unexpected()),
        }
    }

    let input = input.ok_or("missing input file")?;
    let output = output.ok_or("missing required option '-o <OUT>'")?;
    Ok(Command::Compile(Args {
        input,
        output,
        target,
        emit,
    }))
}

// ==============================================================================
// Entry Point
// ==============================================================================

fn main() -> ExitCode {
    if let Err(e) = miette::set_hook(Box::new(|_| Box::new(StubReportHandler::new("ipcstub")))) {
        eprintln!("ipcstub: error: install report handler: {e}");
        return ExitCode::FAILURE;
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(report) => {
            eprintln!("{report:?}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> miette::Result<()> {
    let args = match parse_args() {
        Ok(Command::Compile(args)) => args,
        Ok(Command::Help) => {
            print!("{USAGE}");
            return Ok(());
        }
        Ok(Command::Version) => {
            println!("ipcstub {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Err(e) => {
            return Err(miette::miette!(
                help = "run `ipcstub --help` for usage",
                "{}",
                e
            ));
        }
    };

    let mut compiler = Ipcstub::new();
    compiler.target(args.target);
    let result = if args.input == "-" {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .into_diagnostic()
            .wrap_err("read IDL from stdin")?;
        compiler.compile_str_named(&source, "<stdin>")
    } else {
        compiler.compile(&args.input)
    };

    let output = match result {
        Ok(output) => output,
        Err(report) => {
            print_warnings(compiler.drain_warnings());
            return Err(report);
        }
    };
    print_warnings(output.warnings.iter());

    let content = render(&output, args.emit)?;
    write_output(&args.output, &content)
}

fn print_warnings<W: std::fmt::Debug>(warnings: impl IntoIterator<Item = W>) {
    for warning in warnings {
        eprintln!("{warning:?}");
    }
}

fn render(output: &StubOutput, emit: Emit) -> miette::Result<String> {
    match emit {
        Emit::Header => Ok(output.header.clone()),
        Emit::Json => {
            let mut json = serde_json::to_string_pretty(&output.to_json())
                .into_diagnostic()
                .wrap_err("serialize JSON")?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Write the whole artifact to a file or stdout.
fn write_output(output: &str, content: &str) -> miette::Result<()> {
    if output == "-" {
        // A reader that exits early (`ipcstub ... -o - | head`) is not an error.
        let mut stdout = io::stdout().lock();
        match stdout.write_all(content.as_bytes()).and_then(|()| stdout.flush()) {
            Err(e) if e.kind() != io::ErrorKind::BrokenPipe => Err(e)
                .into_diagnostic()
                .wrap_err("write to stdout"),
            _ => Ok(()),
        }
    } else {
        fs::write(output, content)
            .into_diagnostic()
            .wrap_err_with(|| format!("write {output}"))
    }
}
