// Aadhaar card field extraction from the command line

use aadhaar_extract::{ExtractionError, ExtractionOutcome, ExtractorConfig, RawText, TextExtractor};
use clap::Parser;
use log::info;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "aadhaar-extract", version, about = "Extract name, DOB, gender and Aadhaar number from a card photo")]
struct Args {
    /// Card image, or a text file when --text is given
    input: PathBuf,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Learned NER model produced by train_ner
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Directory holding tesseract traineddata files
    #[arg(long)]
    tessdata: Option<PathBuf>,

    /// Treat the input as already-recognized text
    #[arg(long)]
    text: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(args: &Args) -> Result<ExtractorConfig, ExtractionError> {
    let mut config = match &args.config {
        Some(path) => ExtractorConfig::from_file(path)?,
        None => ExtractorConfig::default(),
    };
    if let Some(model) = &args.model {
        config.ner.model_path = Some(model.clone());
    }
    if let Some(tessdata) = &args.tessdata {
        config.ocr.tessdata_dir = Some(tessdata.clone());
    }
    Ok(config)
}

fn log_name_stages(extractor: &TextExtractor) {
    let stages: Vec<String> = extractor.name_stages().iter().map(|stage| stage.to_string()).collect();
    info!("Name stages: {}", stages.join(" -> "));
}

fn extract_from_text(path: &Path, config: &ExtractorConfig) -> Result<ExtractionOutcome, ExtractionError> {
    let extractor = TextExtractor::new(config.ner.clone())?;
    log_name_stages(&extractor);
    let text = std::fs::read_to_string(path)?;
    Ok(ExtractionOutcome::Extracted(extractor.extract(&RawText::new(&text))))
}

#[cfg(feature = "tesseract")]
fn extract_from_image(path: &Path, config: &ExtractorConfig) -> Result<ExtractionOutcome, ExtractionError> {
    let extractor = aadhaar_extract::AadhaarExtractor::from_config(config)?;
    log_name_stages(extractor.text_extractor());
    Ok(extractor.extract(path))
}

#[cfg(not(feature = "tesseract"))]
fn extract_from_image(_path: &Path, _config: &ExtractorConfig) -> Result<ExtractionOutcome, ExtractionError> {
    Err(ExtractionError::OcrError(
        "built without the tesseract feature; use --text".to_string(),
    ))
}

fn print_outcome(outcome: &ExtractionOutcome, json: bool) {
    if json {
        match serde_json::to_string_pretty(outcome) {
            Ok(rendered) => println!("{}", rendered),
            Err(e) => eprintln!("Failed to render JSON: {}", e),
        }
        return;
    }

    if !outcome.is_failed() {
        println!("Extracted Aadhaar Details:");
    }
    for (key, value) in outcome.entries() {
        println!("{}: {}", key, value);
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    // Setup errors (bad config, unloadable model) surface through the same Error record
    let outcome = load_config(&args)
        .and_then(|config| {
            info!("Processing {}", args.input.display());
            if args.text {
                extract_from_text(&args.input, &config)
            } else {
                extract_from_image(&args.input, &config)
            }
        })
        .unwrap_or_else(|e| ExtractionOutcome::Failed { reason: e.to_string() });

    print_outcome(&outcome, args.json);

    if outcome.is_failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
