use crate::config::{Config, load_config};
use crate::features::OutputFormat;
use crate::ir::FontNames;
use crate::render::{Event, render_events, write_output};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "gsvg", version, about = "Render graph drawing events to SVG/SVGZ")]
pub struct Args {
    /// Event script (.json/.json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format (overrides the config file)
    #[arg(short = 'e', long = "outputFormat", value_enum)]
    pub output_format: Option<FormatArg>,

    /// Config JSON/JSON5 file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Stylesheet referenced from the document prologue
    #[arg(long = "stylesheet")]
    pub stylesheet: Option<String>,

    /// Font naming scheme for aliased fonts
    #[arg(long = "fontnames", value_enum)]
    pub fontnames: Option<FontNamesArg>,

    /// User named in the generator comment
    #[arg(long = "user")]
    pub user: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum FormatArg {
    Svg,
    Svgz,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Svg => OutputFormat::Svg,
            FormatArg::Svgz => OutputFormat::Svgz,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum FontNamesArg {
    Ps,
    Svg,
    Native,
}

impl From<FontNamesArg> for FontNames {
    fn from(arg: FontNamesArg) -> Self {
        match arg {
            FontNamesArg::Ps => FontNames::Ps,
            FontNamesArg::Svg => FontNames::Svg,
            FontNamesArg::Native => FontNames::Native,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Script {
    Events(Vec<Event>),
    Wrapped { events: Vec<Event> },
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    apply_args(&mut config, &args);

    let input = read_input(args.input.as_deref())?;
    let events = parse_script(&input)?;
    if events.is_empty() {
        return Err(anyhow::anyhow!("No events found in input"));
    }

    let format = config.job.format;
    let bytes = render_events(&events, config.job)?;
    let output = args.output.as_deref().map(|path| with_extension(path, format));
    write_output(&bytes, output.as_deref())
}

fn apply_args(config: &mut Config, args: &Args) {
    if let Some(format) = args.output_format {
        config.job.format = format.into();
    }
    if let Some(scheme) = args.fontnames {
        config.job.font_names = scheme.into();
    }
    if let Some(sheet) = &args.stylesheet {
        config.job.stylesheet = Some(sheet.clone()).filter(|s| !s.is_empty());
    }
    if let Some(user) = &args.user {
        config.job.user = user.clone();
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

pub fn parse_script(input: &str) -> Result<Vec<Event>> {
    let script: Script =
        json5::from_str(input).map_err(|err| anyhow::anyhow!("invalid event script: {err}"))?;
    Ok(match script {
        Script::Events(events) => events,
        Script::Wrapped { events } => events,
    })
}

/// Adds the format's extension when the output path has none.
fn with_extension(path: &Path, format: OutputFormat) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(format.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_and_wrapped_scripts() {
        let bare = parse_script(r#"[{"event": "begin_job"}, {"event": "end_job"}]"#).unwrap();
        assert_eq!(bare, vec![Event::BeginJob, Event::EndJob]);

        let wrapped = parse_script(
            r#"{
                // comments are fine
                events: [
                    {event: "begin_job"},
                    {event: "comment", text: "x"},
                ],
            }"#,
        )
        .unwrap();
        assert_eq!(wrapped.len(), 2);
        assert_eq!(wrapped[1], Event::Comment { text: "x".to_string() });
    }

    #[test]
    fn rejects_unknown_events() {
        assert!(parse_script(r#"[{"event": "begin_universe"}]"#).is_err());
    }

    #[test]
    fn args_override_config() {
        let args = Args::parse_from([
            "gsvg",
            "-e",
            "svgz",
            "--fontnames",
            "ps",
            "--stylesheet",
            "a.css",
            "--user",
            "carol",
        ]);
        let mut config = Config::default();
        apply_args(&mut config, &args);
        assert_eq!(config.job.format, OutputFormat::Svgz);
        assert_eq!(config.job.font_names, FontNames::Ps);
        assert_eq!(config.job.stylesheet.as_deref(), Some("a.css"));
        assert_eq!(config.job.user, "carol");
    }

    #[test]
    fn output_extension_follows_format() {
        assert_eq!(
            with_extension(Path::new("out"), OutputFormat::Svgz),
            PathBuf::from("out.svgz")
        );
        assert_eq!(
            with_extension(Path::new("out.xml"), OutputFormat::Svg),
            PathBuf::from("out.xml")
        );
    }
}
