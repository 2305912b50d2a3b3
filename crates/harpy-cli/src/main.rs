mod cli;
mod commands;

use cli::{DumpParams, build_cli};

fn main() {
    let matches = build_cli().get_matches();
    let params = DumpParams::from_matches(&matches);
    commands::dump::run(params.into());
}
