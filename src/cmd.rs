use std::collections::HashMap;
use std::str::FromStr;

/// Command-line arguments split into bare symbols and `key=value` options.
#[derive(Debug, Default)]
pub struct ArgVals {
    pub simple_vals: Vec<String>,
    pub mapped_vals: HashMap<String, String>,
}

impl ArgVals {
    pub fn from_env() -> Self {
        Self::from_args(std::env::args().skip(1))
    }

    pub fn from_args<I: IntoIterator<Item = S>, S: Into<String>>(args: I) -> Self {
        let mut result = Self::default();
        for arg in args.into_iter().map(Into::<String>::into) {
            match arg.split_once('=') {
                Some((key, value)) if !key.is_empty() && !value.contains('=') => {
                    result.mapped_vals.insert(key.to_string(), value.to_string());
                }
                _ => result.simple_vals.push(arg),
            }
        }
        result
    }

    pub fn len(&self) -> usize {
        self.simple_vals.len() + self.mapped_vals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get_symbol(&self, i: usize) -> Option<&str> {
        self.simple_vals.get(i).map(|s| s.as_str())
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.simple_vals.iter().any(|s| s == flag)
    }

    /// The option `key` parsed as `T`; `Ok(None)` when it was not given.
    pub fn get_value<T: FromStr>(&self, key: &str) -> anyhow::Result<Option<T>>
    where
        T::Err: Into<anyhow::Error>,
    {
        self.mapped_vals
            .get(key)
            .map(|v| {
                v.parse::<T>().map_err(|e| {
                    Into::<anyhow::Error>::into(e).context(format!("Error in {key}={v}"))
                })
            })
            .transpose()
    }
}
