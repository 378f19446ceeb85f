// Desktop/tooling crate — unwrap/expect/panic acceptable in non-embedded code.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod list;
mod select;
mod show;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use hal_select::Define;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "HAL selection tasks for the build", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Point src/hal at the variant named by the first HAL=<name> define
    SelectHal {
        /// Preprocessor definition, repeatable (-D HAL=STM32 -D DEBUG)
        #[arg(short = 'D', long = "define", value_name = "NAME[=VALUE]")]
        defines: Vec<Define>,
        /// Compiler flag string to take -D definitions from, after any -D given above
        #[arg(long, value_name = "FLAGS", allow_hyphen_values = true)]
        cflags: Option<String>,
        /// Project directory containing src/
        #[arg(long, default_value = ".")]
        base_dir: PathBuf,
        /// Do not fail when src/hal does not exist yet
        #[arg(long)]
        allow_missing: bool,
    },
    /// List the HAL variants present under src/
    ListHals {
        /// Project directory containing src/
        #[arg(long, default_value = ".")]
        base_dir: PathBuf,
    },
    /// Show where src/hal currently points
    ShowHal {
        /// Project directory containing src/
        #[arg(long, default_value = ".")]
        base_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::SelectHal {
            defines,
            cflags,
            base_dir,
            allow_missing,
        } => select::run(defines, cflags.as_deref(), &base_dir, allow_missing),
        Commands::ListHals { base_dir } => list::run(&base_dir),
        Commands::ShowHal { base_dir } => show::run(&base_dir),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn select_hal_parses_repeated_defines() {
        let cli = Cli::try_parse_from([
            "xtask",
            "select-hal",
            "-D",
            "HAL=STM32",
            "--define",
            "DEBUG",
            "--cflags",
            "-DHAL=posix -O2",
            "--allow-missing",
        ])
        .unwrap();
        match cli.command {
            Commands::SelectHal {
                defines,
                cflags,
                base_dir,
                allow_missing,
            } => {
                assert_eq!(defines, vec![Define::pair("HAL", "STM32"), Define::bare("DEBUG")]);
                assert_eq!(cflags.as_deref(), Some("-DHAL=posix -O2"));
                assert_eq!(base_dir, PathBuf::from("."));
                assert!(allow_missing);
            }
            _ => panic!("expected select-hal"),
        }
    }

    #[test]
    fn select_hal_rejects_nameless_define() {
        assert!(Cli::try_parse_from(["xtask", "select-hal", "-D", "=x"]).is_err());
    }
}
