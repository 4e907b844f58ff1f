use anyhow::Result;
use raspisos_bot::database::{connection::DatabaseManager, models::Binding};
use tempfile::{tempdir, TempDir};

async fn setup_test_db() -> Result<(DatabaseManager, TempDir)> {
    let temp_dir = tempdir()?;
    let db_path = temp_dir.path().join("test.db");
    let database_url = format!("sqlite:{}", db_path.display());

    let db_manager = DatabaseManager::new(&database_url).await?;
    db_manager.run_migrations().await?;

    Ok((db_manager, temp_dir))
}

#[tokio::test]
async fn set_then_get_returns_the_group() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    Binding::upsert(&db.pool, 1001, "151-1").await?;

    let binding = Binding::find_by_chat_id(&db.pool, 1001).await?;
    assert_eq!(binding.map(|b| b.group_number).as_deref(), Some("151-1"));
    Ok(())
}

#[tokio::test]
async fn absent_binding_is_none_not_an_error() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    let binding = Binding::find_by_chat_id(&db.pool, 99999).await?;
    assert!(binding.is_none());
    Ok(())
}

#[tokio::test]
async fn rebinding_replaces_never_appends() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    Binding::upsert(&db.pool, 1001, "151-1").await?;
    Binding::upsert(&db.pool, 1001, "421").await?;

    let all = Binding::list_all(&db.pool).await?;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].chat_id, 1001);
    assert_eq!(all[0].group_number, "421");
    Ok(())
}

#[tokio::test]
async fn remove_then_get_is_absent() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    Binding::upsert(&db.pool, 1001, "151-1").await?;
    Binding::remove(&db.pool, 1001).await?;

    assert!(Binding::find_by_chat_id(&db.pool, 1001).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn removing_a_missing_binding_is_idempotent() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    Binding::remove(&db.pool, 777).await?;
    Binding::remove(&db.pool, 777).await?;
    Ok(())
}

#[tokio::test]
async fn list_all_yields_every_binding() -> Result<()> {
    let (db, _temp_dir) = setup_test_db().await?;

    Binding::upsert(&db.pool, 1001, "151-1").await?;
    Binding::upsert(&db.pool, 1002, "421").await?;
    Binding::upsert(&db.pool, 1003, "091-2").await?;

    let mut chats: Vec<i64> = Binding::list_all(&db.pool)
        .await?
        .into_iter()
        .map(|b| b.chat_id)
        .collect();
    chats.sort();
    assert_eq!(chats, vec![1001, 1002, 1003]);
    Ok(())
}

// The interactive query path with no explicit group resolves through the
// binding store; this covers that resolution step end to end.
#[tokio::test]
async fn bound_group_resolves_for_a_bare_query() -> Result<()> {
    use raspisos_bot::bot::commands::{classify, Intent};

    let (db, _temp_dir) = setup_test_db().await?;
    Binding::upsert(&db.pool, 1001, "151-1").await?;

    let intent = classify("расписос").expect("query intent");
    let Intent::Query { group, .. } = intent else {
        panic!("expected a schedule query");
    };
    assert!(group.is_none());

    let resolved = Binding::find_by_chat_id(&db.pool, 1001)
        .await?
        .map(|b| b.group_number);
    assert_eq!(resolved.as_deref(), Some("151-1"));
    Ok(())
}
