use std::{fmt::Write, path::Path, str::FromStr};

use anyhow::{Context, bail};
use indoc::indoc;
use serde::Deserialize;
use serde_dynamic_string::DynamicString;
use toml::Value;

use crate::Config;

pub(crate) fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
    let path = path.as_ref();

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file {}", path.display()))?;

    let mut raw_config: Value = toml::from_str(&content)?;
    expand_dynamic_strings(&mut Vec::new(), &mut raw_config)?;

    let config = Config::deserialize(raw_config)?;
    validate(&config)?;

    if !config.llm.enabled() {
        log::warn!("LLM endpoints are disabled, the server will only answer health checks");
    }

    Ok(config)
}

pub(crate) fn validate(config: &Config) -> anyhow::Result<()> {
    if config.llm.model.trim().is_empty() {
        bail!(indoc! {r#"
            The model label must not be empty. It is reported to clients in every response.

            Example configuration:

              [llm]
              model = "gemini-3-flash"
        "#});
    }

    if !config.llm.path.starts_with('/') {
        bail!("The LLM path must start with '/', got '{}'", config.llm.path);
    }

    if !config.server.health.path.starts_with('/') {
        bail!("The health path must start with '/', got '{}'", config.server.health.path);
    }

    Ok(())
}

/// Expands `{{ env.VAR }}` templates in every string of the configuration.
fn expand_dynamic_strings<'a>(path: &mut Vec<Result<&'a str, usize>>, value: &'a mut Value) -> anyhow::Result<()> {
    match value {
        Value::String(s) => match DynamicString::<String>::from_str(s) {
            Ok(out) => *s = out.into_inner(),
            Err(err) => {
                let mut p = String::new();

                for segment in path {
                    match segment {
                        Ok(s) => {
                            p.push_str(s);
                            p.push('.');
                        }
                        Err(i) => write!(p, "[{i}]")?,
                    }
                }

                if p.ends_with('.') {
                    p.pop();
                }

                bail!("Failed to expand dynamic string at path '{p}': {err}");
            }
        },
        Value::Array(values) => {
            for (i, value) in values.iter_mut().enumerate() {
                path.push(Err(i));
                expand_dynamic_strings(path, value)?;
                path.pop();
            }
        }
        Value::Table(map) => {
            for (key, value) in map {
                path.push(Ok(key.as_str()));
                expand_dynamic_strings(path, value)?;
                path.pop();
            }
        }
        Value::Integer(_) | Value::Float(_) | Value::Boolean(_) | Value::Datetime(_) => (),
    }

    Ok(())
}
