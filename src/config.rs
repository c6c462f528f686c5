use crate::features::OutputFormat;
use crate::ir::FontNames;
use crate::job::{JobOptions, ProductInfo};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub job: JobOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            job: JobOptions {
                user: default_user(),
                ..JobOptions::default()
            },
        }
    }
}

fn default_user() -> String {
    ["USER", "USERNAME", "LOGNAME"]
        .iter()
        .find_map(|key| std::env::var(key).ok().filter(|v| !v.is_empty()))
        .unwrap_or_else(|| "unknown".to_string())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    format: Option<String>,
    fontnames: Option<String>,
    stylesheet: Option<String>,
    product_name: Option<String>,
    product_version: Option<String>,
    product_build: Option<String>,
    user: Option<String>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = json5::from_str(&contents)
        .map_err(|err| anyhow::anyhow!("invalid config {}: {err}", path.display()))?;
    apply_config_file(&mut config, parsed)?;
    Ok(config)
}

fn apply_config_file(config: &mut Config, parsed: ConfigFile) -> anyhow::Result<()> {
    if let Some(name) = parsed.format.as_deref() {
        config.job.format = OutputFormat::from_name(name)
            .ok_or_else(|| anyhow::anyhow!("unknown output format: {name}"))?;
    }
    if let Some(token) = parsed.fontnames.as_deref() {
        config.job.font_names = FontNames::from_token(token)
            .ok_or_else(|| anyhow::anyhow!("unknown fontnames scheme: {token}"))?;
    }
    if let Some(v) = parsed.stylesheet {
        config.job.stylesheet = Some(v).filter(|s| !s.is_empty());
    }
    let ProductInfo {
        name,
        version,
        build,
    } = &mut config.job.product;
    if let Some(v) = parsed.product_name {
        *name = v;
    }
    if let Some(v) = parsed.product_version {
        *version = v;
    }
    if let Some(v) = parsed.product_build {
        *build = v;
    }
    if let Some(v) = parsed.user {
        config.job.user = v;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_gives_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.job.format, OutputFormat::Svg);
        assert_eq!(config.job.font_names, FontNames::Svg);
        assert!(config.job.stylesheet.is_none());
        assert!(!config.job.user.is_empty());
    }

    #[test]
    fn file_values_override_defaults() {
        let parsed: ConfigFile = json5::from_str(
            r#"{
                // json5 allows comments
                format: "svgz",
                fontnames: "ps",
                stylesheet: "style.css",
                productName: "dot",
                productVersion: "2.0",
                user: "alice",
            }"#,
        )
        .unwrap();
        let mut config = Config::default();
        apply_config_file(&mut config, parsed).unwrap();
        assert_eq!(config.job.format, OutputFormat::Svgz);
        assert_eq!(config.job.font_names, FontNames::Ps);
        assert_eq!(config.job.stylesheet.as_deref(), Some("style.css"));
        assert_eq!(config.job.product.name, "dot");
        assert_eq!(config.job.product.version, "2.0");
        assert_eq!(config.job.product.build, ProductInfo::default().build);
        assert_eq!(config.job.user, "alice");
    }

    #[test]
    fn unknown_format_is_rejected() {
        let parsed = ConfigFile {
            format: Some("png".to_string()),
            ..ConfigFile::default()
        };
        let mut config = Config::default();
        assert!(apply_config_file(&mut config, parsed).is_err());
    }

    #[test]
    fn config_file_on_disk() {
        let path = std::env::temp_dir().join(format!("gsvg-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"stylesheet": "", "user": "bob"}"#).unwrap();
        let config = load_config(Some(&path)).unwrap();
        let _ = std::fs::remove_file(&path);
        assert!(config.job.stylesheet.is_none());
        assert_eq!(config.job.user, "bob");
    }
}
