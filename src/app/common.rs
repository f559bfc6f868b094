use anyhow::{Context, Result};
use clap::Arg;
use log::{info, warn};
use std::{
    fs::{self, File},
    io::BufReader,
    path::PathBuf,
};
use wabasolver::{
    io::{InstanceReader, WabaReader},
    waba::WabaFramework,
};

pub(crate) const ARG_INPUT: &str = "INPUT";

pub(crate) fn input_args() -> Arg<'static, 'static> {
    Arg::with_name(ARG_INPUT)
        .short("f")
        .empty_values(false)
        .multiple(false)
        .help("the input file that contains the framework")
        .required(true)
}

/// Reads a framework file, logging the warnings raised by the reader.
pub(crate) fn read_file_path(file_path: &str) -> Result<WabaFramework<String>> {
    let canonicalized = canonicalize_file_path(file_path)?;
    info!("reading input file {:?}", canonicalized);
    let mut reader = WabaReader::default();
    reader.add_warning_handler(Box::new(|line, msg| warn!("at line {}: {}", line, msg)));
    let file = File::open(&canonicalized)
        .with_context(|| format!(r#"while opening file "{}""#, file_path))?;
    let framework = reader
        .read(&mut BufReader::new(file))
        .with_context(|| format!(r#"while reading file "{}""#, file_path))?;
    info!(
        "the framework has {} atom(s), {} assumption(s) and {} rule(s)",
        framework.language().len(),
        framework.n_assumptions(),
        framework.n_rules(),
    );
    Ok(framework)
}

/// Canonicalize a path given by the user.
pub(crate) fn canonicalize_file_path(file_path: &str) -> Result<PathBuf> {
    fs::canonicalize(PathBuf::from(file_path))
        .with_context(|| format!(r#"while opening file "{}""#, file_path))
}
