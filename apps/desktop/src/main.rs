use std::{
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
};

mod output;

use anyhow::{bail, Context, Result};
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use client_core::{
    load_settings,
    report::{render_report, report_file_name, save_report},
    AnalyzerApi, AnalyzerClient, ResumeUpload,
};
use shared::{
    domain::JobId,
    protocol::{JobTarget, PDF_MIME_TYPE},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "resume-analyzer", about = "Score a resume against job postings")]
struct Args {
    /// Analysis service base URL, including the `/api` prefix.
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the job positions the service knows about.
    Jobs {
        #[arg(long)]
        json: bool,
    },
    /// Upload a PDF resume and print the match analysis.
    Analyze {
        #[arg(long)]
        resume: PathBuf,
        #[arg(long, required_unless_present = "custom_description")]
        job: Option<i64>,
        /// Free-text job description; takes precedence over `--job`.
        #[arg(long)]
        custom_description: Option<String>,
        /// Also write the text report into this directory.
        #[arg(long)]
        report_dir: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Show past analyses.
    History {
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let settings = load_settings();
    let client = AnalyzerClient::from_settings(&settings, args.api_url.as_deref())
        .context("invalid analysis service URL")?;
    tracing::debug!(api = client.base_url(), "using analysis service");
    let api: Arc<dyn AnalyzerApi> = Arc::new(client);

    let mut stdout = std::io::stdout().lock();
    match args.command {
        Command::Jobs { json } => run_jobs(api.as_ref(), json, &mut stdout).await,
        Command::Analyze {
            resume,
            job,
            custom_description,
            report_dir,
            json,
        } => {
            run_analyze(
                api.as_ref(),
                AnalyzeOptions {
                    resume,
                    job: job.map(JobId),
                    custom_description,
                    report_dir,
                    json,
                },
                &mut stdout,
            )
            .await
        }
        Command::History { json } => run_history(api.as_ref(), json, &mut stdout).await,
    }
}

struct AnalyzeOptions {
    resume: PathBuf,
    job: Option<JobId>,
    custom_description: Option<String>,
    report_dir: Option<PathBuf>,
    json: bool,
}

async fn run_jobs(api: &dyn AnalyzerApi, json: bool, out: &mut impl Write) -> Result<()> {
    let jobs = api.list_jobs().await.context("Failed to load jobs")?;
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&jobs)?)?;
        return Ok(());
    }
    for line in output::job_lines(&jobs) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

async fn run_analyze(
    api: &dyn AnalyzerApi,
    options: AnalyzeOptions,
    out: &mut impl Write,
) -> Result<()> {
    ensure_pdf(&options.resume)?;
    let Some(target) = JobTarget::from_parts(options.job, options.custom_description.as_deref())
    else {
        bail!("Please select a job position (--job <id>) or pass --custom-description");
    };

    let upload = ResumeUpload::from_path(&options.resume)
        .await
        .context("Failed to read resume")?;
    let result = api
        .analyze_resume(target, upload)
        .await
        .context("Failed to analyze resume")?;

    if options.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
    } else {
        write!(out, "{}", output::analysis_summary(&result))?;
    }

    if let Some(dir) = options.report_dir {
        let contents = render_report(&result, Local::now().naive_local());
        let path = save_report(&dir, &report_file_name(Utc::now()), &contents)
            .await
            .context("Failed to save report")?;
        // Keep stdout parseable when --json is set.
        if options.json {
            eprintln!("Report saved to {}", path.display());
        } else {
            writeln!(out, "Report saved to {}", path.display())?;
        }
    }
    Ok(())
}

async fn run_history(api: &dyn AnalyzerApi, json: bool, out: &mut impl Write) -> Result<()> {
    let history = api.fetch_history().await.context("Failed to load history")?;
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&history)?)?;
        return Ok(());
    }
    for line in output::history_lines(&history) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn ensure_pdf(path: &Path) -> Result<()> {
    let is_pdf = mime_guess::from_path(path)
        .first()
        .is_some_and(|mime| mime.essence_str() == PDF_MIME_TYPE);
    if !is_pdf {
        bail!("Please select a PDF file: {} is not a PDF", path.display());
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
