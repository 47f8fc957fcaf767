//! Backup codec tests: lossless round-trip and the no-touch guarantee on
//! corrupted blobs.

use gatekey::db::Store;
use gatekey::models::token::{ExtendedAction, NewToken, TargetType, Token};
use gatekey::services::{
    Activation, ActivationEngine, BackupCodec, BackupError, SeaOrmTokenService, TokenService,
};

async fn test_store() -> Store {
    let db_path = std::env::temp_dir().join(format!(
        "gatekey-backup-test-{}.db",
        uuid::Uuid::new_v4()
    ));
    Store::new(&format!("sqlite:{}", db_path.display()))
        .await
        .expect("failed to open test store")
}

async fn seed_varied(store: &Store) -> Vec<Token> {
    let service = SeaOrmTokenService::new(store.clone());

    service
        .create(NewToken {
            token: Some("plain".to_string()),
            ..NewToken::default()
        })
        .await
        .unwrap();

    service
        .create(NewToken {
            token: Some("targeted".to_string()),
            enabled: true,
            target_type: TargetType::User,
            target_id: Some(42),
            limited: 3,
            time_limited: 86_400,
            action: Some((ExtendedAction::Group, "17".to_string())),
        })
        .await
        .unwrap();

    service
        .create(NewToken {
            token: Some("redirecting".to_string()),
            enabled: true,
            action: Some((
                ExtendedAction::Redirect,
                "https://example.org/welcome".to_string(),
            )),
            ..NewToken::default()
        })
        .await
        .unwrap();

    // One token with activation history, so scope and timelastuse survive
    // the round-trip too.
    let engine = ActivationEngine::new(store.clone());
    assert!(matches!(
        engine.activate("targeted").await.unwrap(),
        Activation::Activated(_)
    ));

    service.list(0, 0).await.unwrap()
}

#[tokio::test]
async fn export_then_wipe_then_import_restores_everything() {
    let store = test_store().await;
    let before = seed_varied(&store).await;

    let codec = BackupCodec::new(store.clone());
    let blob = codec.export().await.unwrap();

    let service = SeaOrmTokenService::new(store.clone());
    service.delete_all().await.unwrap();
    assert!(service.list(0, 0).await.unwrap().is_empty());

    let restored = codec.import(&blob).await.unwrap();
    assert_eq!(restored, before.len() as u64);

    let after = service.list(0, 0).await.unwrap();
    assert_eq!(after, before);
}

#[tokio::test]
async fn import_replaces_whatever_is_in_the_table() {
    let store = test_store().await;
    seed_varied(&store).await;

    let codec = BackupCodec::new(store.clone());
    let blob = codec.export().await.unwrap();

    let service = SeaOrmTokenService::new(store.clone());
    service
        .create(NewToken {
            token: Some("added-after-export".to_string()),
            ..NewToken::default()
        })
        .await
        .unwrap();

    codec.import(&blob).await.unwrap();

    let after = service.list(0, 0).await.unwrap();
    assert_eq!(after.len(), 3);
    assert!(after.iter().all(|t| t.token != "added-after-export"));
}

#[tokio::test]
async fn corrupted_blob_leaves_the_table_untouched() {
    let store = test_store().await;
    let before = seed_varied(&store).await;

    let codec = BackupCodec::new(store.clone());
    let service = SeaOrmTokenService::new(store.clone());

    let cases = [
        "!!! not base64 at all !!!".to_string(),
        base64_of(b"not zstd"),
        {
            // Valid base64+zstd, but the payload is not our envelope.
            let compressed = zstd::encode_all(&b"[1,2,3]"[..], 3).unwrap();
            base64_of(&compressed)
        },
        {
            // A truncated copy of a real export.
            let blob = codec.export().await.unwrap();
            blob[..blob.len() / 2].to_string()
        },
    ];

    for blob in cases {
        let err = codec.import(&blob).await.unwrap_err();
        assert!(matches!(err, BackupError::Malformed(_)));

        let after = service.list(0, 0).await.unwrap();
        assert_eq!(after, before, "table changed after rejecting {blob:?}");
    }
}

#[tokio::test]
async fn foreign_envelope_is_rejected_without_touching_the_table() {
    let store = test_store().await;
    let before = seed_varied(&store).await;

    let json = serde_json::json!({
        "format": "gatekey-tokens",
        "version": 999,
        "tokens": []
    });
    let compressed = zstd::encode_all(serde_json::to_vec(&json).unwrap().as_slice(), 3).unwrap();
    let blob = base64_of(&compressed);

    let codec = BackupCodec::new(store.clone());
    assert!(matches!(
        codec.import(&blob).await.unwrap_err(),
        BackupError::Unsupported(_)
    ));

    let service = SeaOrmTokenService::new(store.clone());
    assert_eq!(service.list(0, 0).await.unwrap(), before);
}

#[tokio::test]
async fn empty_table_round_trips() {
    let store = test_store().await;

    let codec = BackupCodec::new(store.clone());
    let blob = codec.export().await.unwrap();

    assert_eq!(codec.import(&blob).await.unwrap(), 0);

    let service = SeaOrmTokenService::new(store);
    assert!(service.list(0, 0).await.unwrap().is_empty());
}

fn base64_of(bytes: &[u8]) -> String {
    use base64::Engine as _;
    base64::engine::general_purpose::STANDARD.encode(bytes)
}
