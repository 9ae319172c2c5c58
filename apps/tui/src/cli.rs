use std::path::PathBuf;

use clap::{CommandFactory, Parser};

#[derive(Debug, Default, Parser)]
#[command(name = "rider-dash", version, about = "Rider analytics dashboard")]
pub struct CliArgs {
    /// Backend base URL (overrides RIDER_DASH_API_URL)
    #[arg(long = "api-url", value_name = "URL")]
    pub api_url: Option<String>,

    /// Print one tab and exit
    #[arg(long)]
    pub headless: bool,

    /// Print the headless report as JSON
    #[arg(long)]
    pub json: bool,

    /// Tab to open, by slug or label (e.g. `demand`, `3pl`, `jobs`)
    #[arg(long, value_name = "NAME")]
    pub tab: Option<String>,

    /// City to select once the tab has loaded
    #[arg(long, value_name = "NAME")]
    pub city: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Log file used while the terminal UI is running
    #[arg(long, value_name = "PATH")]
    pub log: Option<PathBuf>,
}

impl CliArgs {
    pub fn help_text() -> String {
        let mut command = Self::command();
        let mut buffer = Vec::new();
        command.write_help(&mut buffer).ok();
        String::from_utf8_lossy(&buffer).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_headless_flags() {
        let args = CliArgs::parse_from([
            "rider-dash",
            "--headless",
            "--json",
            "--tab",
            "ride",
            "--city",
            "Pune",
            "--api-url",
            "http://api.local/",
        ]);
        assert!(args.headless);
        assert!(args.json);
        assert_eq!(args.tab.as_deref(), Some("ride"));
        assert_eq!(args.city.as_deref(), Some("Pune"));
        assert_eq!(args.api_url.as_deref(), Some("http://api.local/"));
        assert!(args.log.is_none());
    }

    #[test]
    fn help_mentions_every_flag() {
        let help = CliArgs::help_text();
        for flag in ["--api-url", "--headless", "--json", "--tab", "--city", "--debug", "--log"] {
            assert!(help.contains(flag), "{flag} missing from help");
        }
    }
}
