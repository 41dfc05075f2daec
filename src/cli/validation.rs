use crate::cli::args::CliArgs;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(batch_size) = args.batch_size {
        if batch_size == 0 {
            return Err("invalid batch-size, expected positive integer".to_string());
        }
    }
    if let Some(max_id) = args.max_id {
        if max_id == 0 {
            return Err("invalid max-id, expected positive integer".to_string());
        }
    }
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid timeout, expected positive integer".to_string());
        }
    }
    if let Some(threshold) = args.scroll_threshold {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err("invalid scroll-threshold, expected non-negative number".to_string());
        }
    }
    if let Some(raw) = args.api_url.as_deref() {
        reqwest::Url::parse(raw).map_err(|e| format!("invalid --api-url '{raw}': {e}"))?;
    }
    if let Some(raw) = args.output_format.as_deref() {
        if crate::output::OutputFormat::parse(raw).is_none() {
            return Err(format!(
                "invalid --output-format '{raw}', expected text, json or html"
            ));
        }
    }
    if let Some(language) = args.language.as_deref() {
        if language.trim().is_empty() {
            return Err("invalid language, expected a language tag".to_string());
        }
    }
    Ok(())
}
