use clap::Args;
use serde_json::json;

use crate::util::{api_request, exit_error, read_json_from_file};

#[derive(Args)]
pub struct AnalyzeArgs {
    /// OCR text block (repeatable, 1-5 total). Mutually exclusive with --file.
    #[arg(long = "text", short = 't')]
    pub texts: Vec<String>,

    /// Read a JSON file of the form {"ocr_texts": [...]} (use '-' for stdin).
    #[arg(long, short = 'f', conflicts_with = "texts")]
    pub file: Option<String>,

    /// Skip pretty-printing (raw JSON for piping)
    #[arg(long)]
    pub raw: bool,
}

pub async fn run(api_url: &str, args: AnalyzeArgs) -> i32 {
    let body = if let Some(ref f) = args.file {
        match read_json_from_file(f) {
            Ok(v) => v,
            Err(e) => exit_error(&e, Some("Provide a valid JSON file or use '-' for stdin")),
        }
    } else if !args.texts.is_empty() {
        json!({ "ocr_texts": args.texts })
    } else {
        exit_error(
            "No input provided",
            Some("Pass one or more --text blocks, or --file path/to/ocr.json"),
        )
    };

    api_request(
        api_url,
        reqwest::Method::POST,
        "/v1/menu/analyze",
        Some(body),
        &[],
        &[],
        args.raw,
        false,
    )
    .await
}
