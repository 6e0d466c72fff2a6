//! Command-line argument surface.

use std::path::PathBuf;

use clap::Parser;

/// Download a measurement CSV export for one HPC job from an XBAT
/// monitoring service.
#[derive(Parser, Debug)]
#[command(name = "xbat-export", version, about)]
pub struct Args {
    /// XBAT job identifier to export
    pub job_id: String,

    /// Metric group to filter (all groups when omitted)
    #[arg(long)]
    pub group: Option<String>,

    /// Metric name within the group (requires --group)
    #[arg(long)]
    pub metric: Option<String>,

    /// Aggregation level: job, node or core
    #[arg(long, default_value = "job")]
    pub level: String,

    /// Node identifier (required when --level node)
    #[arg(long)]
    pub node: Option<String>,

    /// Base URL of the XBAT instance
    #[arg(long, env = "XBAT_API_BASE", default_value = "https://demo.xbat.dev")]
    pub api_base: String,

    /// Username for the password-grant OAuth flow
    #[arg(long, env = "XBAT_USERNAME", default_value = "demo")]
    pub username: String,

    /// Corresponding password
    #[arg(long, env = "XBAT_PASSWORD", default_value = "demo", hide_env_values = true)]
    pub password: String,

    /// OAuth client ID
    #[arg(long, env = "XBAT_CLIENT_ID", default_value = "demo")]
    pub client_id: String,

    /// Path of the cached-access-token file
    #[arg(long, default_value = ".env.xbat")]
    pub token_file: PathBuf,

    /// Directory the CSV is written into
    #[arg(long, short = 'o', default_value = ".")]
    pub output_dir: PathBuf,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,

    /// Only log errors
    #[arg(long, short)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn defaults_match_the_demo_instance() {
        let args = Args::parse_from(["xbat-export", "249755"]);
        assert_eq!(args.job_id, "249755");
        assert_eq!(args.level, "job");
        assert_eq!(args.api_base, "https://demo.xbat.dev");
        assert_eq!(args.username, "demo");
        assert_eq!(args.token_file, PathBuf::from(".env.xbat"));
        assert_eq!(args.output_dir, PathBuf::from("."));
    }
}
