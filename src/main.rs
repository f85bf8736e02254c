//! rirekisho CLI - renders a résumé YAML or JSON file to a two-page PDF.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rirekisho::{
    DateStyle, FixedClock, FormGeometry, PipelineError, ResumeGenerator, load_resume_file,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "rirekisho")]
#[command(version)]
#[command(about = "Render a Japanese résumé (履歴書) as a two-page A4 PDF", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the PDF from a résumé file
    Generate {
        /// Résumé data (.yaml/.yml as YAML, anything else as JSON)
        #[arg(short, long, value_name = "FILE", default_value = "data/resume.yaml")]
        input: PathBuf,

        /// Portrait image (PNG, JPEG or GIF); a placeholder box is drawn when it is missing
        #[arg(short = 'm', long = "image", value_name = "FILE", default_value = "data/photo.png")]
        image: PathBuf,

        /// Output PDF
        #[arg(short, long, value_name = "FILE", default_value = "resume.pdf")]
        output: PathBuf,

        /// Render date used for 現在, the "as of" line and the age (YYYY-MM-DD)
        #[arg(long, value_name = "DATE", value_parser = parse_date)]
        as_of: Option<NaiveDate>,

        /// Write years in Japanese eras (令和, 平成, ...)
        #[arg(long)]
        era: bool,

        /// Add a 計 N 件 row under the last entry of each table
        #[arg(long)]
        summary_rows: bool,
    },
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD: {}", e))
}

#[tokio::main]
async fn main() -> ExitCode {
    let env = env_logger::Env::default().default_filter_or("rirekisho=info");
    env_logger::Builder::from_env(env).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Generate {
            input,
            image,
            output,
            as_of,
            era,
            summary_rows,
        } => {
            let options = Options {
                as_of,
                era,
                summary_rows,
            };
            generate(input, image, output, options).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

struct Options {
    as_of: Option<NaiveDate>,
    era: bool,
    summary_rows: bool,
}

async fn generate(
    input: PathBuf,
    image: PathBuf,
    output: PathBuf,
    options: Options,
) -> Result<(), PipelineError> {
    log::info!("Loading résumé from {}", input.display());
    let record = load_resume_file(&input)?;

    let form = FormGeometry::default().with_summary_rows(options.summary_rows);
    let mut builder = ResumeGenerator::builder()
        .with_form(form)
        .with_photo(image);
    if let Some(date) = options.as_of {
        builder = builder.with_clock(FixedClock(date));
    }
    if options.era {
        builder = builder.with_date_style(DateStyle::JapaneseEra);
    }
    let generator = builder.build()?;

    let report = generator.generate_to_file_async(&record, &output).await?;
    for fallback in &report.fallbacks {
        println!("  note: {}", fallback);
    }
    for clip in &report.clipped {
        println!(
            "  note: {:?} lost {} row(s)/line(s) at the page bottom",
            clip.section, clip.lost
        );
    }
    for section in &report.dropped {
        println!("  note: {:?} did not fit on its page", section);
    }
    println!(
        "Successfully generated {} ({} pages)",
        output.display(),
        report.pages
    );
    Ok(())
}
