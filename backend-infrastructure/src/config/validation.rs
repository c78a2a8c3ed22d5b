use anyhow::{anyhow, Result};

pub fn validate_webhook_url(value: &str) -> Result<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("webhook url is empty"));
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(anyhow!("webhook url must start with http:// or https://"));
    }
    Ok(())
}
