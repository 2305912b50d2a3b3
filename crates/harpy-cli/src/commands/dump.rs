use std::io;
use std::path::{Path, PathBuf};

use harpy_bytecode::{DecodeError, DecodeOptions, LoadError, Program, Section, dump};
use harpy_core::Colors;

use crate::cli::OutputFormat;

pub struct DumpArgs {
    pub input: PathBuf,
    pub format: OutputFormat,
    pub strict: bool,
    pub color: bool,
}

/// Why a dump could not be produced.
#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    #[error("cannot read `{}`: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("{}: malformed {section}: {source}", path.display())]
    Decode {
        path: PathBuf,
        section: Section,
        source: DecodeError,
    },

    #[error("cannot serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

impl DumpError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Read { .. } | Self::Json(_) => 1,
            Self::Decode { .. } => 3,
        }
    }
}

pub fn run(args: DumpArgs) {
    let colors = Colors::new(args.color);

    let program = match load(&args.input, args.strict) {
        Ok(program) => program,
        Err(e) => fail(&e, colors),
    };

    for finding in &program.findings {
        eprintln!("{}warning{}: {finding}", colors.yellow, colors.reset);
    }

    match render(&program, args.format, colors) {
        Ok(report) => print!("{report}"),
        Err(e) => fail(&e, colors),
    }
}

fn fail(err: &DumpError, colors: Colors) -> ! {
    eprintln!("{}error{}: {err}", colors.red, colors.reset);
    std::process::exit(err.exit_code());
}

pub fn load(path: &Path, strict: bool) -> Result<Program, DumpError> {
    let options = DecodeOptions { strict };
    Program::from_path(path, options).map_err(|e| match e {
        LoadError::Io(source) => DumpError::Read {
            path: path.to_path_buf(),
            source,
        },
        LoadError::Decode(source) => DumpError::Decode {
            path: path.to_path_buf(),
            section: source.section(),
            source,
        },
    })
}

/// Render the report. JSON output is never colored.
pub fn render(program: &Program, format: OutputFormat, colors: Colors) -> Result<String, DumpError> {
    match format {
        OutputFormat::Text => Ok(dump(program, colors)),
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(program)?;
            out.push('\n');
            Ok(out)
        }
    }
}
