use clap::Args;

use crate::util::{api_request, exit_error, read_json_from_file};

#[derive(Args)]
pub struct ApiArgs {
    /// HTTP method (GET, POST, PUT, DELETE, PATCH)
    pub method: String,

    /// API path (e.g. /v1/menu/analyze)
    pub path: String,

    /// Request body as JSON string
    #[arg(long, short = 'd')]
    pub data: Option<String>,

    /// Read request body from file (use '-' for stdin)
    #[arg(long, short = 'f', conflicts_with = "data")]
    pub data_file: Option<String>,

    /// Query parameters (repeatable: key=value)
    #[arg(long, short = 'q')]
    pub query: Vec<String>,

    /// Extra headers (repeatable: Key:Value)
    #[arg(long, short = 'H')]
    pub header: Vec<String>,

    /// Skip pretty-printing (raw JSON for piping)
    #[arg(long)]
    pub raw: bool,

    /// Include HTTP status and headers in response wrapper
    #[arg(long, short = 'i')]
    pub include: bool,
}

pub async fn run(api_url: &str, args: ApiArgs) -> i32 {
    let method = match args.method.to_uppercase().as_str() {
        "GET" => reqwest::Method::GET,
        "POST" => reqwest::Method::POST,
        "PUT" => reqwest::Method::PUT,
        "DELETE" => reqwest::Method::DELETE,
        "PATCH" => reqwest::Method::PATCH,
        "HEAD" => reqwest::Method::HEAD,
        "OPTIONS" => reqwest::Method::OPTIONS,
        other => exit_error(
            &format!("Unknown HTTP method: {other}"),
            Some("Supported methods: GET, POST, PUT, DELETE, PATCH, HEAD, OPTIONS"),
        ),
    };

    let mut query = Vec::new();
    for q in &args.query {
        match q.split_once('=') {
            Some((k, v)) => query.push((k.to_string(), v.to_string())),
            None => exit_error(
                &format!("Invalid query parameter: '{q}'"),
                Some("Format: key=value"),
            ),
        }
    }

    let mut headers = Vec::new();
    for h in &args.header {
        match h.split_once(':') {
            Some((k, v)) => headers.push((k.trim().to_string(), v.trim().to_string())),
            None => exit_error(
                &format!("Invalid header: '{h}'"),
                Some("Format: Key:Value, e.g. --header Content-Type:application/json"),
            ),
        }
    }

    let body = if let Some(ref d) = args.data {
        match serde_json::from_str(d) {
            Ok(v) => Some(v),
            Err(e) => exit_error(
                &format!("Invalid JSON in --data: {e}"),
                Some("Provide valid JSON string"),
            ),
        }
    } else if let Some(ref f) = args.data_file {
        match read_json_from_file(f) {
            Ok(v) => Some(v),
            Err(e) => exit_error(&e, Some("Provide a valid JSON file or use '-' for stdin")),
        }
    } else {
        None
    };

    api_request(
        api_url,
        method,
        &args.path,
        body,
        &query,
        &headers,
        args.raw,
        args.include,
    )
    .await
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_query_parsing() {
        let input = "top_k=5";
        let (k, v) = input.split_once('=').unwrap();
        assert_eq!(k, "top_k");
        assert_eq!(v, "5");
    }

    #[test]
    fn test_header_parsing() {
        let input = "Content-Type: application/json";
        let (k, v) = input.split_once(':').unwrap();
        assert_eq!(k.trim(), "Content-Type");
        assert_eq!(v.trim(), "application/json");
    }

    #[test]
    fn test_method_parsing() {
        for m in &[
            "get", "GET", "Get", "post", "POST", "delete", "DELETE", "put", "patch",
        ] {
            let parsed = match m.to_uppercase().as_str() {
                "GET" => Some(reqwest::Method::GET),
                "POST" => Some(reqwest::Method::POST),
                "PUT" => Some(reqwest::Method::PUT),
                "DELETE" => Some(reqwest::Method::DELETE),
                "PATCH" => Some(reqwest::Method::PATCH),
                _ => None,
            };
            assert!(parsed.is_some(), "Failed to parse method: {m}");
        }
    }
}
