use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error("Expected first argument to be '-E'")]
    MissingMode,
    #[error("Expected first argument to be '-E', got '{0}'")]
    UnexpectedMode(String),
    #[error("Missing pattern after '-E'")]
    MissingPattern,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub pattern: String,
}

/// Parses `<program> -E <pattern>`. `args` includes the program name;
/// anything after the pattern is ignored.
pub fn parse_args(args: Vec<String>) -> Result<Config, CliError> {
    let mut args = args.into_iter().skip(1);

    match args.next() {
        Some(flag) if flag == "-E" => {}
        Some(other) => return Err(CliError::UnexpectedMode(other)),
        None => return Err(CliError::MissingMode),
    }

    let pattern = args.next().ok_or(CliError::MissingPattern)?;

    Ok(Config { pattern })
}
