use anyhow::Result;
use log::debug;
use std::path::Path;

use crate::api::Toonify;
use crate::http::Transport;
use crate::validate::ImageFile;

use super::{SaveTarget, unix_millis};

/// Default file name for a saved cartoon.
pub fn default_file_name(millis: u128) -> String {
    format!("cartoonified-{}.png", millis)
}

/// Uploads the image at `image_path` and prints the result URL.
#[tracing::instrument(skip(client))]
pub async fn cartoonify<T: Transport>(
    client: &Toonify<T>,
    image_path: &Path,
    save: &SaveTarget,
) -> Result<()> {
    let image = ImageFile::from_path(image_path).await?;

    println!("Processing {} with DeepAI...", image.name);
    let cartoon = client.cartoonify(&image).await?;
    debug!("Cartoon result: {:?}", cartoon);

    println!("{}", cartoon.output_url);

    if let Some(path) = save.resolve(|| default_file_name(unix_millis())) {
        let bytes = client.download(&cartoon.output_url, &path).await?;
        println!("Saved {} ({} bytes)", path.display(), bytes);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::http::{ApiError, MockTransport};
    use crate::service::Service;

    fn configured() -> Config {
        Config {
            cartoonify_key: Some("deepai-real-key-123".to_string()),
            ..Config::default()
        }
    }

    #[test]
    fn test_default_file_name() {
        assert_eq!(default_file_name(1700000000000), "cartoonified-1700000000000.png");
    }

    #[tokio::test]
    async fn test_cartoonify_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let image_path = dir.path().join("photo.jpg");
        std::fs::write(&image_path, b"JPEGDATA").unwrap();
        let out = dir.path().join("out.png");

        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .times(1)
            .returning(|_| Ok(serde_json::json!({"output_url": "https://img/out.png"})));
        transport
            .expect_fetch()
            .times(1)
            .withf(|url| url.as_str() == "https://img/out.png")
            .returning(|_| Ok(b"cartoon".to_vec()));
        let client = Toonify::with_transport(configured(), transport);

        cartoonify(&client, &image_path, &SaveTarget::Path(out.clone()))
            .await
            .unwrap();

        assert_eq!(std::fs::read(&out).unwrap(), b"cartoon");
    }

    #[tokio::test]
    async fn test_cartoonify_missing_key_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let image_path = dir.path().join("photo.png");
        std::fs::write(&image_path, b"PNGDATA").unwrap();

        let mut transport = MockTransport::new();
        transport.expect_execute().times(0);
        let client = Toonify::with_transport(Config::default(), transport);

        let err = cartoonify(&client, &image_path, &SaveTarget::None)
            .await
            .unwrap_err();

        assert_eq!(
            err.downcast_ref::<ApiError>(),
            Some(&ApiError::MissingCredential(Service::Cartoonify))
        );
    }

    #[tokio::test]
    async fn test_cartoonify_rejects_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let image_path = dir.path().join("photo.bmp");
        std::fs::write(&image_path, b"BMDATA").unwrap();

        let mut transport = MockTransport::new();
        transport.expect_execute().times(0);
        let client = Toonify::with_transport(configured(), transport);

        let err = cartoonify(&client, &image_path, &SaveTarget::None)
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::InvalidFile(_))
        ));
    }
}
