use crate::error::SourceError;

/// Downloads a remote source in full.
///
/// Non-success HTTP statuses are treated as failures rather than handed to the
/// CSV reader as an error page.
pub fn fetch_bytes(url: &str) -> Result<Vec<u8>, SourceError> {
    let resp = reqwest::blocking::get(url)?.error_for_status()?;
    Ok(resp.bytes()?.to_vec())
}
