use clap::ValueEnum;
use partdft::Spectrum;
use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Csv,
}

/// Parse samples separated by whitespace, commas or newlines. `#` starts a
/// comment that runs to the end of the line.
pub fn parse_signal(text: &str) -> Result<Vec<f64>, io::Error> {
    let mut samples = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.split('#').next().unwrap_or_default();
        for token in line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
        {
            let value: f64 = token.parse().map_err(|_| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("line {}: {:?} is not a number", lineno + 1, token),
                )
            })?;
            if !value.is_finite() {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("line {}: {:?} is not finite", lineno + 1, token),
                ));
            }
            samples.push(value);
        }
    }
    Ok(samples)
}

/// Read a signal from `path`, or from stdin when `path` is absent or `-`.
pub fn read_signal(path: Option<&Path>) -> Result<Vec<f64>, Box<dyn Error>> {
    let text = match path {
        Some(p) if p != Path::new("-") => fs::read_to_string(p)?,
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    Ok(parse_signal(&text)?)
}

pub fn write_spectrum<W: Write>(
    out: &mut W,
    spectrum: &Spectrum<f64>,
    format: OutputFormat,
) -> io::Result<()> {
    let sep = match format {
        OutputFormat::Text => " ",
        OutputFormat::Csv => ",",
    };
    writeln!(out, "k{sep}re{sep}im")?;
    for (k, c) in spectrum.iter().enumerate() {
        writeln!(out, "{k}{sep}{}{sep}{}", c.re, c.im)?;
    }
    Ok(())
}
