//! Command-line surface
//!
//! Every option also reads an `RDS_SNAPSHOTS_*` environment variable, so
//! the values handed to [`Config::load`](crate::config::Config::load) already
//! carry CLI > env precedence.

use clap::Parser;
use std::path::PathBuf;

use crate::config::Overrides;
use crate::tracing_setup::LogFormat;

#[derive(Debug, Parser)]
#[command(name = "rds-snapshots")]
#[command(
    about = "Snapshot an RDS instance, note it in S3, and prune expired snapshots",
    long_about = None,
    version
)]
pub struct Cli {
    /// Path to config file [default: /etc/rds-snapshots/config.toml if present]
    #[arg(short, long, env = "RDS_SNAPSHOTS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Database instance to snapshot and prune
    #[arg(long, env = "RDS_SNAPSHOTS_INSTANCE_ID")]
    pub instance_id: Option<String>,

    /// Bucket receiving metadata notes
    #[arg(long, env = "RDS_SNAPSHOTS_BUCKET")]
    pub bucket: Option<String>,

    /// Prefix of generated snapshot identifiers
    #[arg(long, env = "RDS_SNAPSHOTS_PREFIX")]
    pub prefix: Option<String>,

    /// Delete snapshots older than this many whole days
    #[arg(long, env = "RDS_SNAPSHOTS_RETENTION_DAYS")]
    pub retention_days: Option<u32>,

    /// Backend URL: aws://[region][?endpoint=URL] or memory://
    #[arg(long, env = "RDS_SNAPSHOTS_SERVICE_URL")]
    pub service_url: Option<String>,

    /// Use the bare timestamp identifier, without a random suffix
    #[arg(long, env = "RDS_SNAPSHOTS_NO_UNIQUE_SUFFIX")]
    pub no_unique_suffix: bool,

    /// Prefix prepended to metadata object keys
    #[arg(long, env = "RDS_SNAPSHOTS_KEY_PREFIX")]
    pub key_prefix: Option<String>,

    /// List and evaluate only; create, write and delete nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Exit with status 1 if any stage fails
    #[arg(long, env = "RDS_SNAPSHOTS_STRICT")]
    pub strict: bool,

    /// Log output format
    #[arg(long, env = "RDS_SNAPSHOTS_LOG_FORMAT", value_enum, default_value_t)]
    pub log_format: LogFormat,
}

impl Cli {
    /// Values that take precedence over the config file
    pub fn overrides(&self) -> Overrides {
        Overrides {
            instance_id: self.instance_id.clone(),
            bucket_name: self.bucket.clone(),
            snapshot_prefix: self.prefix.clone(),
            retention_days: self.retention_days,
            service_url: self.service_url.clone(),
            unique_suffix: self.no_unique_suffix.then_some(false),
            key_prefix: self.key_prefix.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serial_test::serial;

    /// Restores an environment variable when dropped, even if the test panics
    struct EnvGuard {
        key: String,
        original: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let original = std::env::var(key).ok();
            std::env::set_var(key, value);
            Self {
                key: key.to_string(),
                original,
            }
        }

        fn remove(key: &str) -> Self {
            let original = std::env::var(key).ok();
            std::env::remove_var(key);
            Self {
                key: key.to_string(),
                original,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.original {
                Some(v) => std::env::set_var(&self.key, v),
                None => std::env::remove_var(&self.key),
            }
        }
    }

    #[test]
    #[serial]
    fn test_cli_parse_flags() {
        let _instance = EnvGuard::remove("RDS_SNAPSHOTS_INSTANCE_ID");
        let cli = Cli::try_parse_from([
            "rds-snapshots",
            "--instance-id",
            "prod-db",
            "--bucket",
            "notes",
            "--retention-days",
            "14",
            "--service-url",
            "memory://",
            "--no-unique-suffix",
            "--dry-run",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert!(cli.dry_run);
        assert_eq!(cli.log_format, LogFormat::Json);

        let overrides = cli.overrides();
        assert_eq!(overrides.instance_id.as_deref(), Some("prod-db"));
        assert_eq!(overrides.bucket_name.as_deref(), Some("notes"));
        assert_eq!(overrides.retention_days, Some(14));
        assert_eq!(overrides.service_url.as_deref(), Some("memory://"));
        assert_eq!(overrides.unique_suffix, Some(false));
    }

    #[test]
    #[serial]
    fn test_cli_defaults() {
        let _guards = [
            EnvGuard::remove("RDS_SNAPSHOTS_CONFIG"),
            EnvGuard::remove("RDS_SNAPSHOTS_INSTANCE_ID"),
            EnvGuard::remove("RDS_SNAPSHOTS_BUCKET"),
            EnvGuard::remove("RDS_SNAPSHOTS_STRICT"),
            EnvGuard::remove("RDS_SNAPSHOTS_LOG_FORMAT"),
            EnvGuard::remove("RDS_SNAPSHOTS_NO_UNIQUE_SUFFIX"),
            EnvGuard::remove("RDS_SNAPSHOTS_KEY_PREFIX"),
        ];
        let cli = Cli::try_parse_from(["rds-snapshots"]).unwrap();

        assert!(cli.config.is_none());
        assert!(!cli.dry_run);
        assert!(!cli.strict);
        assert_eq!(cli.log_format, LogFormat::Text);

        let overrides = cli.overrides();
        assert!(overrides.instance_id.is_none());
        assert!(overrides.unique_suffix.is_none());
        assert!(overrides.key_prefix.is_none());
    }

    #[test]
    #[serial]
    fn test_env_fills_missing_flags() {
        let _instance = EnvGuard::set("RDS_SNAPSHOTS_INSTANCE_ID", "env-db");
        let _days = EnvGuard::set("RDS_SNAPSHOTS_RETENTION_DAYS", "30");

        let cli = Cli::try_parse_from(["rds-snapshots"]).unwrap();
        assert_eq!(cli.instance_id.as_deref(), Some("env-db"));
        assert_eq!(cli.retention_days, Some(30));
    }

    #[test]
    #[serial]
    fn test_flag_beats_env() {
        let _instance = EnvGuard::set("RDS_SNAPSHOTS_INSTANCE_ID", "env-db");

        let cli = Cli::try_parse_from(["rds-snapshots", "--instance-id", "flag-db"]).unwrap();
        assert_eq!(cli.instance_id.as_deref(), Some("flag-db"));
    }

    #[test]
    #[serial]
    fn test_negative_retention_rejected() {
        let _days = EnvGuard::remove("RDS_SNAPSHOTS_RETENTION_DAYS");
        let result = Cli::try_parse_from(["rds-snapshots", "--retention-days", "-1"]);
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_env_sets_key_prefix_and_suffix() {
        let _prefix = EnvGuard::set("RDS_SNAPSHOTS_KEY_PREFIX", "env/");
        let _suffix = EnvGuard::set("RDS_SNAPSHOTS_NO_UNIQUE_SUFFIX", "true");

        let overrides = Cli::try_parse_from(["rds-snapshots"]).unwrap().overrides();
        assert_eq!(overrides.key_prefix.as_deref(), Some("env/"));
        assert_eq!(overrides.unique_suffix, Some(false));
    }

    #[test]
    #[serial]
    fn test_key_prefix_reaches_config() {
        const FILE: &str = "[metadata]\nkey_prefix = \"file/\"\n";
        let _prefix = EnvGuard::set("RDS_SNAPSHOTS_KEY_PREFIX", "env/");

        let cli =
            Cli::try_parse_from(["rds-snapshots", "--instance-id", "prod-db", "--bucket", "notes"])
                .unwrap();
        let config = Config::from_toml(FILE, &cli.overrides()).unwrap();
        assert_eq!(config.metadata_key_prefix, "env/");

        let cli = Cli::try_parse_from([
            "rds-snapshots",
            "--instance-id",
            "prod-db",
            "--bucket",
            "notes",
            "--key-prefix",
            "flag/",
        ])
        .unwrap();
        let config = Config::from_toml(FILE, &cli.overrides()).unwrap();
        assert_eq!(config.metadata_key_prefix, "flag/");
    }
}
