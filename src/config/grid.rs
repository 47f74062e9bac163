use crate::GridParams;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// What the demo prints to stdout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Both,
}

impl OutputFormat {
    pub fn includes_text(self) -> bool {
        matches!(self, OutputFormat::Text | OutputFormat::Both)
    }

    pub fn includes_json(self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Both)
    }

    fn parse(value: &str) -> Result<Self, String> {
        match value {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "both" => Ok(OutputFormat::Both),
            other => Err(format!("Unknown output format '{other}' (expected text|json|both)")),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub json_out: Option<PathBuf>,
    pub debug_dir: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeConfig {
    pub input_path: PathBuf,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub grid_params: GridParams,
}

impl RuntimeConfig {
    pub fn for_input(input_path: PathBuf) -> Self {
        Self {
            input_path,
            output: OutputConfig::default(),
            grid_params: GridParams::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: RuntimeConfig = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    Ok(config)
}

pub fn usage(program: &str) -> String {
    format!(
        "Usage:\n  {program} --config <config.json>\n  {program} <image> [--format text|json|both] [--json <out.json>] [--debug-dir <dir>] [--padding <n>] [--window]"
    )
}

/// Parse the process arguments (see [`parse_args`]).
pub fn parse_cli(program: &str) -> Result<RuntimeConfig, String> {
    parse_args(program, env::args().skip(1))
}

/// Build a [`RuntimeConfig`] from command-line arguments.
///
/// `--config` loads a JSON file; flags given alongside it override the
/// loaded values. Otherwise the first positional argument is the image path.
pub fn parse_args<I>(program: &str, args: I) -> Result<RuntimeConfig, String>
where
    I: IntoIterator<Item = String>,
{
    let mut config_path: Option<PathBuf> = None;
    let mut input: Option<PathBuf> = None;
    let mut format: Option<OutputFormat> = None;
    let mut json_out: Option<PathBuf> = None;
    let mut debug_dir: Option<PathBuf> = None;
    let mut padding: Option<usize> = None;
    let mut window = false;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .ok_or_else(|| format!("Missing value for {flag}\n{}", usage(program)))
        };
        match arg.as_str() {
            "--config" => config_path = Some(PathBuf::from(value("--config")?)),
            "--format" => format = Some(OutputFormat::parse(&value("--format")?)?),
            "--json" => json_out = Some(PathBuf::from(value("--json")?)),
            "--debug-dir" => debug_dir = Some(PathBuf::from(value("--debug-dir")?)),
            "--padding" => {
                let raw = value("--padding")?;
                padding = Some(
                    raw.parse::<usize>()
                        .map_err(|e| format!("Invalid --padding '{raw}': {e}"))?,
                );
            }
            "--window" => window = true,
            "-h" | "--help" => return Err(usage(program)),
            flag if flag.starts_with("--") => {
                return Err(format!("Unknown option {flag}\n{}", usage(program)))
            }
            _ if input.is_none() => input = Some(PathBuf::from(&arg)),
            _ => return Err(format!("Unexpected argument {arg}\n{}", usage(program))),
        }
    }

    let mut config = match (config_path, input) {
        (Some(path), None) => load_config(&path)?,
        (None, Some(input)) => RuntimeConfig::for_input(input),
        (Some(_), Some(_)) => {
            return Err(format!(
                "Pass either --config or an image path, not both\n{}",
                usage(program)
            ))
        }
        (None, None) => return Err(usage(program)),
    };

    if let Some(format) = format {
        config.output.format = format;
    }
    if json_out.is_some() {
        config.output.json_out = json_out;
    }
    if debug_dir.is_some() {
        config.output.debug_dir = debug_dir;
    }
    if let Some(padding) = padding {
        config.grid_params.spectrum.padding = padding;
    }
    if window {
        config.grid_params.spectrum.windowing = true;
    }
    Ok(config)
}
