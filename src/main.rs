//! modrinth-dl command line entrypoint.
//!
//! - `modrinth-dl <job-list>` runs every job in a YAML job list
//! - `modrinth-dl <id-source> <destination> <minecraft-version> <loader>` runs one job
//!
//! Diagnostics go to stdout as `ERR:` lines, logs go to stderr. The process
//! exits with status 0 whether or not packages failed.

use clap::Parser;
use clap::error::ErrorKind;
use std::io::Write;
use std::path::{Path, PathBuf};

use modrinth_dl::report::{DIAGNOSTIC_PREFIX, id_list_diagnostic, job_list_diagnostic};
use modrinth_dl::{
    Config, DownloadJob, Error, JobRunner, Loader, StabilityTier, read_package_ids,
};

const USAGE: &str = "expects exactly 1 argument (job list) or exactly 4 arguments \
                     (id source file, download destination, minecraft version, mod loader)";

/// Download the latest compatible Modrinth release of every listed project.
#[derive(Parser)]
#[command(name = "modrinth-dl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// <JOB_LIST> or <ID_SOURCE> <DESTINATION> <MINECRAFT_VERSION> <LOADER>
    #[arg(value_name = "ARGS")]
    args: Vec<String>,

    /// Registry API root
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Least stable release to accept: any, alpha, beta or release
    #[arg(long, value_name = "TIER")]
    min_tier: Option<StabilityTier>,

    /// Packages resolved or fetched at the same time
    #[arg(long, value_name = "N", default_value_t = 1)]
    concurrency: usize,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::default();
        if let Some(base_url) = &self.base_url {
            config.registry.base_url = base_url.clone();
        }
        if let Some(tier) = self.min_tier {
            config.download.minimum_tier = tier;
        }
        config.download.max_concurrent_downloads = self.concurrency;
        config
    }
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return;
        }
        Err(e) => {
            println!("{}", parse_error_diagnostic(&e));
            return;
        }
    };

    // Logs to stderr so stdout only carries diagnostics
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .init();

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = run(&cli, &mut stdout).await {
        let _ = writeln!(stdout, "{DIAGNOSTIC_PREFIX} {e}");
    }
}

async fn run<W: Write>(cli: &Cli, out: &mut W) -> modrinth_dl::Result<()> {
    match cli.args.as_slice() {
        [job_list] => {
            let runner = JobRunner::new(&cli.config())?;
            run_job_list(&runner, Path::new(job_list), out).await
        }
        [source, destination, platform_version, loader] => {
            let loader: Loader = match loader.parse() {
                Ok(loader) => loader,
                Err(e) => {
                    writeln!(out, "{DIAGNOSTIC_PREFIX} {e}")?;
                    return Ok(());
                }
            };
            let job = DownloadJob {
                source: PathBuf::from(source),
                destination: PathBuf::from(destination),
                platform_version: platform_version.clone(),
                loader,
                minimum_tier: cli.min_tier,
            };
            let runner = JobRunner::new(&cli.config())?;
            let packages = match read_package_ids(&job.source).await {
                Ok(packages) => packages,
                Err(e) => {
                    writeln!(out, "{}", id_list_diagnostic(&job.source, &e))?;
                    return Ok(());
                }
            };
            runner.run_packages(&job, &packages, out).await?;
            Ok(())
        }
        _ => {
            writeln!(out, "{DIAGNOSTIC_PREFIX} this program {USAGE}.")?;
            Ok(())
        }
    }
}

/// Bad option values become an `ERR:` line on stdout like every other failure
fn parse_error_diagnostic(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    let message = first.strip_prefix("error: ").unwrap_or(first);
    format!("{DIAGNOSTIC_PREFIX} {message}")
}

async fn run_job_list<W: Write>(
    runner: &JobRunner,
    path: &Path,
    out: &mut W,
) -> modrinth_dl::Result<()> {
    writeln!(out, "Initiating download jobs...")?;
    match runner.run_job_file(path, out).await {
        Ok(_) => {}
        Err(e @ Error::ConfigParse { .. }) => writeln!(out, "{}", job_list_diagnostic(path, &e))?,
        Err(e) => return Err(e),
    }
    writeln!(out, "Done.")?;
    Ok(())
}
