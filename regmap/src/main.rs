use std::process::ExitCode;

use colored::Colorize as _;
use dvbs2_regmap::maps;

fn main() -> ExitCode {
    env_logger::init();

    let mut errors = 0;

    for model in maps::all() {
        println!(
            "=== {} revision {} ===",
            model.ident.bold(),
            model.revision
        );
        errors += dvbs2_regmap::model::validate(&model);
    }

    if errors != 0 {
        eprintln!("{}: {errors} errors in built-in maps", "error".red().bold());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
