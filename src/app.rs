use std::io::{self, Read};

use anyhow::{Context, Result};
use bytes::{BufMut, Bytes, BytesMut};

use grep_backtrack::Regex;

use crate::cli::Config;

/// Matches the first line of standard input against the configured pattern.
pub fn run(cfg: Config) -> Result<bool> {
    let regex = Regex::new(&cfg.pattern);
    search(&regex, io::stdin().lock())
}

fn search(regex: &Regex, reader: impl Read) -> Result<bool> {
    let input = read_input(reader).context("failed to read input")?;
    let line = first_line(&input)?;
    Ok(regex.is_match(line))
}

fn read_input(mut reader: impl Read) -> io::Result<Bytes> {
    let mut writer = BytesMut::new().writer();
    io::copy(&mut reader, &mut writer)?;
    Ok(writer.into_inner().freeze())
}

// The line ends at the first '\n'; a preceding '\r' is dropped too.
fn first_line(input: &[u8]) -> Result<&str> {
    let line = match input.iter().position(|&b| b == b'\n') {
        Some(end) => &input[..end],
        None => input,
    };
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    std::str::from_utf8(line).context("input line is not valid UTF-8")
}
