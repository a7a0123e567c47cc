use anyhow::Result;
use log::debug;

use crate::api::Toonify;
use crate::avatar::{Avatar, find_style};
use crate::http::Transport;

use super::{SaveTarget, unix_millis};

/// Default file name for a saved avatar.
///
/// The id comes from the user, so anything other than ASCII letters, digits,
/// `-` and `_` is replaced to keep the name inside the current directory.
pub fn default_file_name(avatar_id: &str, millis: u128) -> String {
    let id: String = avatar_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("doppelme-avatar-{}-{}.png", id, millis)
}

/// Creates an avatar and prints its URL.
#[tracing::instrument(skip(client))]
pub async fn create_avatar<T: Transport>(
    client: &Toonify<T>,
    avatar_id: &str,
    style_id: &str,
    save: &SaveTarget,
) -> Result<()> {
    match find_style(style_id) {
        Some(style) => println!("Creating avatar {} ({})...", avatar_id.trim(), style.name),
        None => println!("Creating avatar {} (style {})...", avatar_id.trim(), style_id),
    }

    let avatar = client.create_avatar(avatar_id, style_id).await?;
    finish(client, avatar, save).await
}

/// Fetches an existing avatar and prints its URL.
#[tracing::instrument(skip(client))]
pub async fn get_avatar<T: Transport>(
    client: &Toonify<T>,
    avatar_id: &str,
    save: &SaveTarget,
) -> Result<()> {
    println!("Fetching avatar {}...", avatar_id.trim());

    let avatar = client.get_avatar(avatar_id).await?;
    finish(client, avatar, save).await
}

async fn finish<T: Transport>(client: &Toonify<T>, avatar: Avatar, save: &SaveTarget) -> Result<()> {
    debug!("Avatar result: {:?}", avatar);
    println!("{}", avatar.avatar_url);

    if let Some(path) = save.resolve(|| default_file_name(&avatar.avatar_id, unix_millis())) {
        let bytes = client.download(&avatar.avatar_url, &path).await?;
        println!("Saved {} ({} bytes)", path.display(), bytes);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::http::{ApiError, MockTransport};
    use reqwest::Method;

    fn configured() -> Config {
        Config {
            avatar_key: Some("rapid-real-key-456".to_string()),
            ..Config::default()
        }
    }

    #[test]
    fn test_default_file_name() {
        assert_eq!(
            default_file_name("DM1", 42),
            "doppelme-avatar-DM1-42.png"
        );
    }

    #[test]
    fn test_default_file_name_stays_in_current_dir() {
        for id in ["../../etc/passwd", "a/b", "a\\b", "..", "/abs"] {
            let name = default_file_name(id, 7);
            assert!(!name.contains('/'), "{}", name);
            assert!(!name.contains('\\'), "{}", name);
            assert!(!name.contains(".."), "{}", name);
            assert_eq!(
                std::path::Path::new(&name).file_name().unwrap().to_str(),
                Some(name.as_str())
            );
        }
        assert_eq!(
            default_file_name("../x", 1),
            "doppelme-avatar-___x-1.png"
        );
    }

    #[tokio::test]
    async fn test_create_avatar_prints_without_saving() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .times(1)
            .withf(|r| r.method == Method::PUT)
            .returning(|_| Ok(serde_json::json!({"avatar_url": "https://img/DM1.png"})));
        transport.expect_fetch().times(0);
        let client = Toonify::with_transport(configured(), transport);

        create_avatar(&client, "DM1", "61", &SaveTarget::None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_get_avatar_saves_result() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("avatar.png");

        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .times(1)
            .withf(|r| r.method == Method::GET)
            .returning(|_| Ok(serde_json::json!({"avatar_url": "https://img/DM1.png"})));
        transport
            .expect_fetch()
            .times(1)
            .returning(|_| Ok(b"avatar".to_vec()));
        let client = Toonify::with_transport(configured(), transport);

        get_avatar(&client, "DM1", &SaveTarget::Path(out.clone()))
            .await
            .unwrap();

        assert_eq!(std::fs::read(&out).unwrap(), b"avatar");
    }

    #[tokio::test]
    async fn test_empty_avatar_id_is_reported() {
        let mut transport = MockTransport::new();
        transport.expect_execute().times(0);
        let client = Toonify::with_transport(configured(), transport);

        let err = get_avatar(&client, "  ", &SaveTarget::None)
            .await
            .unwrap_err();

        assert_eq!(err.downcast_ref::<ApiError>(), Some(&ApiError::EmptyAvatarId));
    }
}
