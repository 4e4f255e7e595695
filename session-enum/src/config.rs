//========================================================================
// CONFIG AND CLI PARSING
//========================================================================

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use crate::level::SessionLevel;

pub const DEFAULT_HOST: &str = "localhost";

#[derive(Parser, Debug)]
#[command(name = "session-enum")]
#[command(about = "Enumerate SMB sessions on Windows hosts via NetSessionEnum")]
pub struct Args {
    /// Target hostname or file containing hostnames (one per line). Repeatable; defaults to localhost
    #[arg(short, long = "target", value_name = "HOST_OR_FILE")]
    pub targets: Vec<String>,

    /// Information level: 0, 1, 2, 10 or 502
    #[arg(short, long, default_value_t = SessionLevel::Level10)]
    pub level: SessionLevel,

    /// Output NDJSON file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Number of hosts to query at once
    #[arg(short = 'j', long, default_value_t = 1)]
    pub threads: usize,

    /// Enable debug output
    #[arg(short, long)]
    pub debug: bool,
}

impl Args {
    /// Expand `--target` values into the host list, in order.
    pub fn hosts(&self) -> Result<Vec<String>> {
        if self.targets.is_empty() {
            return Ok(vec![DEFAULT_HOST.to_string()]);
        }
        let mut hosts = Vec::new();
        for target in &self.targets {
            hosts.extend(load_hosts(target)?);
        }
        Ok(hosts)
    }
}

/// Load hosts from a file or return a single host if the input is not a file path.
pub fn load_hosts(target_or_file: &str) -> Result<Vec<String>> {
    let path = Path::new(target_or_file);
    if !path.is_file() {
        return Ok(vec![target_or_file.trim().to_string()]);
    }

    let file = File::open(path).with_context(|| format!("Could not open hosts file: {}", target_or_file))?;
    let mut hosts = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.with_context(|| format!("Failed to read hosts file: {}", target_or_file))?;
        let host = line.trim();
        if !host.is_empty() {
            hosts.push(host.to_string());
        }
    }
    Ok(hosts)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["session-enum"]).unwrap();
        assert_eq!(args.level, SessionLevel::Level10);
        assert_eq!(args.threads, 1);
        assert!(args.output.is_none());
        assert_eq!(args.hosts().unwrap(), vec!["localhost".to_string()]);
    }

    #[test]
    fn test_level_is_validated() {
        let args = Args::try_parse_from(["session-enum", "--level", "502"]).unwrap();
        assert_eq!(args.level, SessionLevel::Level502);
        assert!(Args::try_parse_from(["session-enum", "--level", "3"]).is_err());
    }

    #[test]
    fn test_hosts_from_file_and_literal() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "FS01\n\n  DC01  \n").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let args = Args::try_parse_from(["session-enum", "-t", "WKS9", "--target", &path]).unwrap();
        assert_eq!(args.hosts().unwrap(), vec!["WKS9", "FS01", "DC01"]);
    }
}
