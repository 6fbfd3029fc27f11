//! Standalone local/offline entrypoint: reads `{"ocr_texts": [...]}` from
//! stdin, runs the full parse → classify pipeline, and prints the resulting
//! envelope to stdout. Useful for scripting and for exercising the engine
//! without the HTTP surface.

use std::io::Read;

use leafline_core::config::Settings;
use leafline_mcp::parser;

#[derive(serde::Deserialize)]
struct StdinInput {
    ocr_texts: Vec<String>,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let mut raw = String::new();
    if std::io::stdin().read_to_string(&mut raw).is_err() {
        eprintln!("{{\"error\": \"failed to read stdin\"}}");
        std::process::exit(1);
    }

    let input: StdinInput = match serde_json::from_str(&raw) {
        Ok(input) => input,
        Err(err) => {
            eprintln!("{{\"error\": \"invalid input: {err}\"}}");
            std::process::exit(1);
        }
    };

    if input.ocr_texts.is_empty() || input.ocr_texts.len() > 5 {
        eprintln!(
            "{{\"error\": \"expected 1-5 ocr_texts, received {}\"}}",
            input.ocr_texts.len()
        );
        std::process::exit(1);
    }

    if input.ocr_texts.iter().all(|text| text.trim().is_empty()) {
        eprintln!("{{\"error\": \"OCR produced no usable text\"}}");
        std::process::exit(1);
    }

    let settings = Settings::from_env();
    let engine = leafline_mcp::Engine::new(&settings);

    let items = parser::parse(&input.ocr_texts);
    let outcome = engine.coordinator.analyze(&items).await;

    println!("{}", serde_json::to_string_pretty(&outcome).unwrap());
}
