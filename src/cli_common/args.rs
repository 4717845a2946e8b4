//! Общие аргументы командной строки

use clap::Args;
use std::path::PathBuf;

use super::output::OutputFormat;

/// Общие аргументы для всех команд
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json, yaml)
    #[arg(short = 'f', long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Pretty print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,
}

/// Аргументы, определяющие источник фрагментов
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Directory with one sub-directory of fragments per package
    #[arg(long, global = true)]
    pub fragments: Option<PathBuf>,

    /// Settings file (TOML, YAML or JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Package to inspect (defaults to defaultPackage, then the first package)
    #[arg(short, long, global = true)]
    pub package: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        common: CommonArgs,
        #[command(flatten)]
        source: SourceArgs,
    }

    #[test]
    fn test_parse_common_and_source_args() {
        let cli = TestCli::try_parse_from([
            "fusion-lens",
            "--format",
            "yaml",
            "--fragments",
            "./fragments",
            "-p",
            "Vendor.Site",
        ])
        .unwrap();
        assert_eq!(cli.common.format, OutputFormat::Yaml);
        assert!(!cli.common.verbose);
        assert_eq!(cli.source.package.as_deref(), Some("Vendor.Site"));
        assert_eq!(cli.source.fragments, Some(PathBuf::from("./fragments")));
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(TestCli::try_parse_from(["fusion-lens", "--format", "sarif"]).is_err());
    }
}
