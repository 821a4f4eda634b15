use open;
use tokio::task::spawn_blocking;
use crate::error::LinkOpenError;

pub fn check_link(url: &str) -> Result<(), LinkOpenError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(LinkOpenError::NotHttp);
    }
    Ok(())
}

pub async fn open_link(url: &str) -> Result<(), LinkOpenError> {
    check_link(url)?;
    let link = url.to_string();

    spawn_blocking(move || {
        open::that(&link)
    }).await.expect("Failed to join open_link task")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_http_links() {
        assert!(check_link("https://github.com/RacZo/EEGStarter").is_ok());
        assert!(check_link("http://example.com").is_ok());
        assert!(matches!(check_link("file:///etc/passwd"), Err(LinkOpenError::NotHttp)));
        assert!(matches!(check_link("javascript:alert(1)"), Err(LinkOpenError::NotHttp)));
    }

    #[tokio::test]
    async fn test_open_rejects_before_spawning() {
        assert!(matches!(open_link("ftp://example.com").await, Err(LinkOpenError::NotHttp)));
    }
}
