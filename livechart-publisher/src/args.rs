use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the chart publisher.
#[derive(Parser, Debug)]
#[command(name = "livechart-publisher")]
#[command(about = "Publish host CPU, RAM and outbound traffic as live chart points")]
#[command(version)]
pub struct PublisherArgs {
    /// Path to configuration file (JSON5 format). Defaults are used when omitted.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(short, long)]
    pub log_level: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let args = PublisherArgs::parse_from([
            "livechart-publisher",
            "--config",
            "publisher.json5",
            "-l",
            "debug",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("publisher.json5")));
        assert_eq!(args.log_level.as_deref(), Some("debug"));

        let args = PublisherArgs::parse_from(["livechart-publisher"]);
        assert!(args.config.is_none());
    }
}
