//! Command builder for the CLI.

use clap::Command;

use super::args::*;

/// Build the `harpy-dump` command.
pub fn build_cli() -> Command {
    Command::new("harpy-dump")
        .about("Decode a compiled Harpy bytecode image and print its contents")
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(
            r#"EXAMPLES:
  harpy-dump program.hbc                  # text report
  harpy-dump program.hbc --format json    # machine-readable
  harpy-dump program.hbc --strict         # fail on suspicious headers"#,
        )
        .arg(input_path_arg())
        .arg(color_arg())
        .arg(format_arg())
        .arg(strict_arg())
}
