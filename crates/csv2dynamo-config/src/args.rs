// Job-argument parsing
//
// The trigger platform passes arguments as `--key value` pairs (the
// managed-ETL convention); `--key=value` is accepted too. Unknown keys are
// kept - the platform adds bookkeeping arguments of its own - and looked
// up by exact name.

use anyhow::{bail, Result};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct JobArgs {
    values: HashMap<String, String>,
}

impl JobArgs {
    /// Parse from process arguments, skipping the binary name.
    pub fn from_env_args() -> Result<Self> {
        Self::parse(std::env::args().skip(1))
    }

    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut values = HashMap::new();
        let mut iter = args.into_iter();

        while let Some(token) = iter.next() {
            let Some(stripped) = token.strip_prefix("--") else {
                bail!("unexpected argument {:?}; expected --key value pairs", token);
            };

            if let Some((key, value)) = stripped.split_once('=') {
                values.insert(key.to_string(), value.to_string());
            } else {
                match iter.next() {
                    Some(value) => {
                        values.insert(stripped.to_string(), value);
                    }
                    None => bail!("argument --{} is missing a value", stripped),
                }
            }
        }

        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
