//! Flag parsing shared by the subcommands.

use std::collections::HashMap;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

/// Flags that take no value.
const SWITCHES: &[&str] = &["--json", "--operations"];

/// Positional arguments and `--flag value` pairs, in the order given.
#[derive(Debug, Default)]
pub struct Args {
    pub positional: Vec<String>,
    flags: HashMap<String, String>,
}

impl Args {
    pub fn parse(raw: &[String]) -> Result<Self> {
        let mut args = Args::default();
        let mut i = 0;
        while i < raw.len() {
            let arg = &raw[i];
            if SWITCHES.contains(&arg.as_str()) {
                args.flags.insert(arg.clone(), String::new());
            } else if arg.starts_with("--") {
                i += 1;
                let value = raw
                    .get(i)
                    .with_context(|| format!("{arg} requires a value"))?;
                args.flags.insert(arg.clone(), value.clone());
            } else {
                args.positional.push(arg.clone());
            }
            i += 1;
        }
        Ok(args)
    }

    pub fn switch(&self, name: &str) -> bool {
        self.flags.contains_key(name)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.flags.get(name).map(String::as_str)
    }

    pub fn required(&self, name: &str) -> Result<&str> {
        self.value(name)
            .with_context(|| format!("missing required option {name}"))
    }

    /// Parse an optional flag value.
    pub fn parsed<T>(&self, name: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        self.value(name)
            .map(|v| v.parse::<T>().with_context(|| format!("invalid {name}")))
            .transpose()
    }

    /// The single positional argument a command expects.
    pub fn one_positional(&self, what: &str) -> Result<&str> {
        match self.positional.as_slice() {
            [one] => Ok(one.as_str()),
            [] => bail!("missing {what}"),
            _ => bail!("expected exactly one {what}"),
        }
    }
}
