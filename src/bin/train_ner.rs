use aadhaar_extract::ml::{read_conll, NerTrainer};
use aadhaar_extract::ExtractionError;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "train_ner", about = "Train the learned NER model from BIO-tagged text")]
struct Args {
    /// `token TAG` lines, blank line between sentences
    corpus: PathBuf,

    /// Where to write the JSON model
    output: PathBuf,

    #[arg(long, default_value_t = 10)]
    epochs: usize,
}

fn main() -> Result<(), ExtractionError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    println!("NER Model Training");
    println!("------------------");

    let sentences = read_conll(&args.corpus)?;
    println!("Loaded {} sentences from {}", sentences.len(), args.corpus.display());

    let model = NerTrainer::new(args.epochs).train(&sentences)?;
    model.save(&args.output)?;

    println!(
        "Wrote {} ({} labels, {} features)",
        args.output.display(),
        model.labels.len(),
        model.weights.len()
    );
    Ok(())
}
