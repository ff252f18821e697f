//! Migration orchestrator integration tests
//!
//! Exercise the full extract → map → normalize → persist sequence against
//! an in-memory store seeded with flat legacy keys.

use rmh_common::settings::{AuralSource, ChatSource};
use rmh_common::{HandSettings, NotificationMode, Scope, XCardSettings};
use rmh_notify::db::ensure_settings_table;
use rmh_notify::db::settings::{
    get_hand_settings, get_settings_era, get_xcard_settings, set_settings_era,
};
use rmh_notify::{migrate_settings_if_needed, MigrationOutcome, CURRENT_SETTINGS_ERA};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};

async fn setup_test_db() -> Pool<Sqlite> {
    let pool = SqlitePoolOptions::new()
        .connect("sqlite::memory:")
        .await
        .unwrap();
    ensure_settings_table(&pool).await.unwrap();
    pool
}

/// Seed a flat legacy key the way the old store held it: namespaced, TEXT.
async fn seed(pool: &Pool<Sqlite>, key: &str, raw_value: &str) {
    sqlx::query("INSERT INTO settings (key, value) VALUES (?, ?)")
        .bind(format!("raise-my-hand.{key}"))
        .bind(raw_value)
        .execute(pool)
        .await
        .unwrap();
}

async fn all_rows(pool: &Pool<Sqlite>) -> Vec<(String, String)> {
    sqlx::query_as("SELECT key, value FROM settings ORDER BY key")
        .fetch_all(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn fresh_install_writes_only_the_era_marker() {
    let db = setup_test_db().await;

    let outcome = migrate_settings_if_needed(&db).await.unwrap();
    assert_eq!(outcome, MigrationOutcome::FreshInstall);

    assert_eq!(get_settings_era(&db).await.unwrap(), CURRENT_SETTINGS_ERA);
    let rows = all_rows(&db).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0, "raise-my-hand.settings-era");

    // Defaults are served without having been written
    assert_eq!(get_hand_settings(&db).await.unwrap(), HandSettings::default());
    assert_eq!(
        get_xcard_settings(&db).await.unwrap(),
        XCardSettings::default()
    );
}

#[tokio::test]
async fn upgrade_maps_legacy_settings_into_nested_records() {
    let db = setup_test_db().await;
    seed(&db, "handToogleBehavior", "false").await;
    seed(&db, "showEmojiIndicator", "true").await;
    seed(&db, "playSound", "true").await;
    seed(&db, "playSoundGMOnly", "true").await;
    seed(&db, "showUiNotification", "true").await;
    seed(&db, "makeUiNotificationPermanent", "true").await;
    // Raw path text, not JSON-quoted, as old stores sometimes held it
    seed(&db, "warningsoundpath", "worlds/mine/gong.ogg").await;
    seed(&db, "warningsoundvolume", "0.8").await;
    seed(&db, "xcard", "true").await;
    seed(&db, "xcardsoundvolume", "0.3").await;

    let outcome = migrate_settings_if_needed(&db).await.unwrap();
    assert_eq!(outcome, MigrationOutcome::Migrated { legacy_keys: 10 });
    assert_eq!(get_settings_era(&db).await.unwrap(), CURRENT_SETTINGS_ERA);

    let hand = get_hand_settings(&db).await.unwrap();
    assert!(!hand.general.is_toggle);
    assert_eq!(
        hand.general.notification_modes,
        [
            NotificationMode::PlayerList,
            NotificationMode::Aural,
            NotificationMode::Ui
        ]
        .into()
    );
    assert_eq!(hand.aural.scope, Scope::GmOnly);
    assert_eq!(hand.aural.source, AuralSource::Custom);
    assert_eq!(hand.aural.override_path, "worlds/mine/gong.ogg");
    assert_eq!(hand.aural.sound_volume, 80);
    assert!(hand.ui.permanent);
    // New-in-this-era fields carry their defaults
    assert_eq!(hand.player_list.hold_time, 10);
    assert_eq!(hand.chat.source, ChatSource::None);

    let xcard = get_xcard_settings(&db).await.unwrap();
    assert!(xcard.is_enabled);
    assert_eq!(xcard.sound_volume, 30);
}

#[tokio::test]
async fn second_run_is_a_no_op() {
    let db = setup_test_db().await;
    seed(&db, "showUiChatMessage", "true").await;
    seed(&db, "chatimagewidth", "50").await;

    let first = migrate_settings_if_needed(&db).await.unwrap();
    assert!(matches!(first, MigrationOutcome::Migrated { .. }));
    let state_after_first = all_rows(&db).await;

    let second = migrate_settings_if_needed(&db).await.unwrap();
    assert_eq!(second, MigrationOutcome::UpToDate);
    assert_eq!(all_rows(&db).await, state_after_first);
}

#[tokio::test]
async fn rerunning_after_a_lost_marker_reproduces_the_same_state() {
    // A racing orchestrator that read the old marker before the first run
    // finished re-executes the whole sequence; the result must converge.
    let db = setup_test_db().await;
    seed(&db, "showDialogMessage", "true").await;
    seed(&db, "xcard", "true").await;
    seed(&db, "xcardgmonly", "true").await;

    migrate_settings_if_needed(&db).await.unwrap();
    let state_after_first = all_rows(&db).await;

    set_settings_era(&db, "1").await.unwrap();
    let rerun = migrate_settings_if_needed(&db).await.unwrap();
    assert!(matches!(rerun, MigrationOutcome::Migrated { .. }));
    assert_eq!(all_rows(&db).await, state_after_first);
}

#[tokio::test]
async fn current_era_store_is_left_untouched() {
    let db = setup_test_db().await;
    set_settings_era(&db, CURRENT_SETTINGS_ERA).await.unwrap();
    seed(&db, "playSound", "true").await;

    let outcome = migrate_settings_if_needed(&db).await.unwrap();
    assert_eq!(outcome, MigrationOutcome::UpToDate);

    // The stray legacy key is still there and no records were written
    let rows = all_rows(&db).await;
    assert_eq!(rows.len(), 2);
    assert!(!rows.iter().any(|(k, _)| k.ends_with("handSettings")));
}

#[tokio::test]
async fn future_era_store_is_left_untouched() {
    let db = setup_test_db().await;
    set_settings_era(&db, "10").await.unwrap();

    let outcome = migrate_settings_if_needed(&db).await.unwrap();
    assert_eq!(outcome, MigrationOutcome::UpToDate);
    assert_eq!(get_settings_era(&db).await.unwrap(), "10");
}

#[tokio::test]
async fn chat_scenario_from_flat_keys() {
    let db = setup_test_db().await;
    seed(&db, "showUiChatMessage", "true").await;
    seed(&db, "showUiChatMessageOnlyForGM", "true").await;
    seed(&db, "chatimagewidth", "50").await;

    migrate_settings_if_needed(&db).await.unwrap();

    let hand = get_hand_settings(&db).await.unwrap();
    assert_eq!(hand.chat.scope, Scope::GmOnly);
    assert_eq!(hand.chat.source, ChatSource::None);
    assert_eq!(hand.chat.width_percentage, 50);
}
