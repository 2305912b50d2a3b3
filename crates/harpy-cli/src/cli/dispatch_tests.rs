//! Tests for CLI argument parsing and params extraction.

use std::path::PathBuf;

use clap::error::ErrorKind;

use super::*;

#[test]
fn input_is_extracted() {
    let m = build_cli()
        .try_get_matches_from(["harpy-dump", "program.hbc"])
        .unwrap();
    let params = DumpParams::from_matches(&m);

    assert_eq!(params.input, PathBuf::from("program.hbc"));
    assert_eq!(params.format, OutputFormat::Text);
    assert_eq!(params.color, ColorChoice::Auto);
    assert!(!params.strict);
}

#[test]
fn missing_input_is_usage_error() {
    let err = build_cli()
        .try_get_matches_from(["harpy-dump"])
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    assert_eq!(err.exit_code(), 2);
    assert!(err.to_string().contains("<INPUT>"));
}

#[test]
fn extra_positional_is_rejected() {
    let result = build_cli().try_get_matches_from(["harpy-dump", "a.hbc", "b.hbc"]);
    assert_eq!(result.unwrap_err().kind(), ErrorKind::UnknownArgument);
}

#[test]
fn all_flags() {
    let m = build_cli()
        .try_get_matches_from([
            "harpy-dump",
            "program.hbc",
            "--color",
            "never",
            "--format",
            "json",
            "--strict",
        ])
        .unwrap();
    let params = DumpParams::from_matches(&m);

    assert_eq!(params.format, OutputFormat::Json);
    assert_eq!(params.color, ColorChoice::Never);
    assert!(params.strict);
}

#[test]
fn color_always() {
    let m = build_cli()
        .try_get_matches_from(["harpy-dump", "--color", "always", "program.hbc"])
        .unwrap();
    assert_eq!(DumpParams::from_matches(&m).color, ColorChoice::Always);
}

#[test]
fn invalid_color_is_rejected() {
    let result = build_cli().try_get_matches_from(["harpy-dump", "x.hbc", "--color", "sometimes"]);
    assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidValue);
}

#[test]
fn invalid_format_is_rejected() {
    let result = build_cli().try_get_matches_from(["harpy-dump", "x.hbc", "--format", "yaml"]);
    assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidValue);
}

#[test]
fn explicit_color_choice_ignores_terminal() {
    assert!(ColorChoice::Always.should_colorize());
    assert!(!ColorChoice::Never.should_colorize());
}

#[test]
fn params_convert_to_args() {
    let m = build_cli()
        .try_get_matches_from(["harpy-dump", "p.hbc", "--color", "always", "--strict"])
        .unwrap();
    let args: crate::commands::dump::DumpArgs = DumpParams::from_matches(&m).into();

    assert_eq!(args.input, PathBuf::from("p.hbc"));
    assert!(args.color);
    assert!(args.strict);
    assert_eq!(args.format, OutputFormat::Text);
}

#[test]
fn cli_is_well_formed() {
    build_cli().debug_assert();
}
