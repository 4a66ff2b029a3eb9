use std::{env::args, path::PathBuf, time::Instant};

use log::error;
use pretty_env_logger::formatted_builder;
use satire_check::{
    driver::{self, batch_status, check_directory, check_pair, ensure_correct, verdict_path_for},
    prelude::*,
    report::{Chain, Report},
};

fn usage_string() -> String {
    format!(
        "Usage: {} <command> [--strict]

command:
    check <file.cnf> [<file.sat>] - check a solver answer against its instance
    batch <directory>             - check every .cnf file against its sibling .sat file

--strict: reject answers that assign a variable both true and false",
        args().next().unwrap_or_else(|| "satire-check".to_owned())
    )
}

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("Unknown command '{}'\n\n{}", name, usage_string()))]
    UnknownCommand { name: String },
    #[snafu(display("Required argument does not exist\n\n{}", usage_string()))]
    MissingArgument,
    #[snafu(display("Check failed"))]
    CheckFailed { source: driver::Error },
}

fn check_command(operands: &[String], strict: bool) -> Result<(), Error> {
    let instance_path = PathBuf::from(operands.get(0).context(MissingArgument)?);
    let verdict_path = match operands.get(1) {
        Some(path) => PathBuf::from(path),
        None => verdict_path_for(&instance_path),
    };

    let checked = check_pair(&instance_path, &verdict_path, strict).context(CheckFailed)?;
    println!("{}", checked);

    ensure_correct(&verdict_path, &checked).context(CheckFailed)?;

    Ok(())
}

fn batch_command(operands: &[String], strict: bool) -> Result<(), Error> {
    let dir = PathBuf::from(operands.get(0).context(MissingArgument)?);

    let start_time = Instant::now();
    let entries = check_directory(&dir, strict).context(CheckFailed)?;

    for entry in &entries {
        println!("{}", entry.instance.display());
        match &entry.result {
            Ok(checked) => println!("{}", checked),
            Err(e) => error!("{}", Chain(e)),
        }
    }

    println!("--- {} seconds ---", start_time.elapsed().as_secs_f64());

    batch_status(&entries).context(CheckFailed)?;

    Ok(())
}

fn dispatch_command(args: Vec<String>) -> Result<(), Error> {
    let strict = args.iter().any(|arg| arg == "--strict");
    let args = args
        .into_iter()
        .filter(|arg| arg != "--strict")
        .collect::<Vec<_>>();

    match args.get(0).map(|s| s.as_str()) {
        Some("check") => check_command(&args[1..], strict)?,
        Some("batch") => batch_command(&args[1..], strict)?,
        Some(name) => UnknownCommand {
            name: name.to_owned(),
        }
        .fail()?,
        None => {
            println!("{}", usage_string());
        }
    }

    Ok(())
}

fn init_logger() {
    let mut builder = formatted_builder();

    if let Ok(s) = ::std::env::var("RUST_LOG") {
        builder.parse_filters(&s);
    } else {
        if cfg!(debug_assertions) {
            builder.parse_filters("satire_check=debug");
        } else {
            builder.parse_filters("satire_check=warn");
        }
    }

    builder.try_init().expect("Failed to initialize the logger");
}

fn main() -> Result<(), Report> {
    init_logger();

    let mut args = args();

    // drop arg[0]
    args.next();

    dispatch_command(args.collect())?;

    Ok(())
}
