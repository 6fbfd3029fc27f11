use clap::Args;
use serde_json::json;

use crate::util::{api_request, exit_error, read_json_from_file};

#[derive(Args)]
pub struct ReviewArgs {
    /// request_id returned by a prior `analyze` call's NeedsReview response.
    pub request_id: String,

    /// A correction as name=true or name=false (repeatable).
    #[arg(long = "correction", short = 'c')]
    pub corrections: Vec<String>,

    /// Read corrections from a JSON file of the form {"corrections": [...]}.
    #[arg(long, short = 'f', conflicts_with = "corrections")]
    pub file: Option<String>,

    /// Skip pretty-printing (raw JSON for piping)
    #[arg(long)]
    pub raw: bool,
}

pub async fn run(api_url: &str, args: ReviewArgs) -> i32 {
    let body = if let Some(ref f) = args.file {
        match read_json_from_file(f) {
            Ok(v) => v,
            Err(e) => exit_error(&e, Some("Provide a valid JSON file or use '-' for stdin")),
        }
    } else if !args.corrections.is_empty() {
        let mut corrections = Vec::new();
        for c in &args.corrections {
            match c.split_once('=') {
                Some((name, value)) => {
                    let is_vegetarian = match value {
                        "true" | "yes" => true,
                        "false" | "no" => false,
                        other => exit_error(
                            &format!("Invalid correction value: '{other}'"),
                            Some("Use name=true or name=false"),
                        ),
                    };
                    corrections.push(json!({ "name": name, "is_vegetarian": is_vegetarian }));
                }
                None => exit_error(
                    &format!("Invalid correction: '{c}'"),
                    Some("Format: name=true|false, e.g. --correction 'Mushroom Risotto=true'"),
                ),
            }
        }
        json!({ "corrections": corrections })
    } else {
        exit_error(
            "No corrections provided",
            Some("Pass one or more --correction entries, or --file path/to/corrections.json"),
        )
    };

    api_request(
        api_url,
        reqwest::Method::POST,
        &format!("/v1/review/{}", args.request_id),
        Some(body),
        &[],
        &[],
        args.raw,
        false,
    )
    .await
}
