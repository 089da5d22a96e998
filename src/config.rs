use clap::ValueEnum;
use serde::Deserialize;

/// How the `id` sub‑command prints each identifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `2D12B85D-4776FA31`
    #[default]
    Dashed,
    /// `2d12b85d4776fa31`
    Compact,
    /// Both of the above, one per line.
    Both,
    /// One JSON object per volume.
    Json,
}

/// Options of the `id` sub‑command.
#[derive(Clone, Debug, Deserialize)]
pub struct Identify {
    /// Disc roots, each holding a `VIDEO_TS` folder.
    pub paths: Vec<String>,
    #[serde(default)]
    pub format: Option<OutputFormat>,
}

impl Identify {
    /// The format to print with, `Dashed` unless one was chosen.
    #[must_use] pub fn format(&self) -> OutputFormat { self.format.unwrap_or_default() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_defaults_to_dashed() {
        let cfg: Identify = serde_json::from_str(r#"{"paths": ["/mnt/dvd"]}"#).expect("parse");
        assert_eq!(cfg.format, None);
        assert_eq!(cfg.format(), OutputFormat::Dashed);
        assert_eq!(cfg.paths, ["/mnt/dvd"]);
    }

    #[test]
    fn format_names_are_lowercase() {
        let cfg: Identify =
            serde_json::from_str(r#"{"paths": [], "format": "compact"}"#).expect("parse");
        assert_eq!(cfg.format(), OutputFormat::Compact);
    }
}
