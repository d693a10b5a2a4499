pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Decode the command payload from `--input` or piped stdin, in that order.
///
/// Decoding goes straight from the text into `T`: trial balances keep their
/// document order and repeated account names reach validation.
pub fn read_payload<T: DeserializeOwned>(
    path: Option<&str>,
    what: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        file::read_json(path)
    } else if let Some(text) = stdin::read_stdin()? {
        let value = serde_json::from_str(&text)
            .map_err(|e| format!("Failed to parse stdin as JSON: {}", e))?;
        Ok(value)
    } else {
        Err(format!("--input <file.json> or stdin required for {what}").into())
    }
}
