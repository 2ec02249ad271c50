use crate::*;
use assert_cmd::prelude::*;
use bucketeer::error::{Error, Result};
use bucketeer::storage::StorageClient;

pub fn tests(client: &StorageClient, tests: &mut Vec<Trial>) {
    tests.extend(async_trials!(
        client,
        test_move_file,
        test_move_folder_moves_every_key,
        test_move_missing_folder,
        test_move_folder_into_itself,
        test_move_folder_into_parent_keeps_nested_content,
        test_move_folder_stops_at_first_failed_copy,
        e2e_test_mv_folder_command
    ));
}

async fn test_move_file(client: StorageClient) -> Result<()> {
    let name = TEST_FIXTURE.new_folder_name();
    client.create_folder(&name).await?;
    let src = format!("{name}/old.bin");
    let dest = format!("{name}/new.bin");
    let content = put_random(&client, &src).await?;

    client.move_file(&src, &dest).await?;

    assert_eq!(client.operator().read(&dest).await?.to_vec(), content);
    let src_result = client.operator().read(&src).await;
    assert!(
        matches!(src_result.unwrap_err().kind(), opendal::ErrorKind::NotFound),
        "Source object should be deleted after move"
    );
    Ok(())
}

async fn test_move_folder_moves_every_key(client: StorageClient) -> Result<()> {
    let music = TEST_FIXTURE.new_folder_name();
    let albums = TEST_FIXTURE.new_folder_name();
    client.create_folder(&music).await?;
    client.create_folder(&format!("{music}/Rock")).await?;
    let first = put_random(&client, &format!("{music}/intro.mp3")).await?;
    let second = put_random(&client, &format!("{music}/Rock/live/encore.mp3")).await?;

    let before = list_keys(&client, &music, false).await?;
    let moved = client.move_folder(&music, &albums).await?;
    assert_eq!(moved, 2);

    let after = list_keys(&client, &albums, false).await?;
    let expected: Vec<String> = before
        .iter()
        .map(|key| key.replacen(&music, &albums, 1))
        .collect();
    for key in &expected {
        assert!(after.contains(key), "{key} missing from {after:?}");
    }

    assert!(list_keys(&client, &music, false).await?.is_empty());
    assert!(!client.folder_exists(&music).await?);
    assert!(client.folder_exists(&albums).await?);

    let intro = client.operator().read(&format!("{albums}/intro.mp3")).await?;
    assert_eq!(intro.to_vec(), first);
    let encore = client
        .operator()
        .read(&format!("{albums}/Rock/live/encore.mp3"))
        .await?;
    assert_eq!(encore.to_vec(), second);
    Ok(())
}

async fn test_move_missing_folder(client: StorageClient) -> Result<()> {
    let err = client
        .move_folder(&TEST_FIXTURE.new_folder_name(), &TEST_FIXTURE.new_folder_name())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MoveFolderFailed { .. }));
    assert!(matches!(err.root_cause(), Error::FolderNotFound { .. }));
    Ok(())
}

async fn test_move_folder_into_itself(client: StorageClient) -> Result<()> {
    let name = TEST_FIXTURE.new_folder_name();
    put_random(&client, &format!("{name}/a.bin")).await?;

    let err = client
        .move_folder(&name, &format!("{name}/inner"))
        .await
        .unwrap_err();
    assert!(matches!(err.root_cause(), Error::InvalidPath { .. }));
    assert!(client.object_exists(&format!("{name}/a.bin")).await?);
    Ok(())
}

async fn test_move_folder_into_parent_keeps_nested_content(client: StorageClient) -> Result<()> {
    let root = TEST_FIXTURE.new_folder_name();
    let outer = put_random(&client, &format!("{root}/b/f")).await?;
    let inner = put_random(&client, &format!("{root}/b/b/f")).await?;

    let err = client
        .move_folder(&format!("{root}/b"), &root)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MoveFolderFailed { .. }));
    assert!(matches!(err.root_cause(), Error::InvalidPath { .. }), "got {err}");

    let outer_now = client.operator().read(&format!("{root}/b/f")).await?;
    assert_eq!(outer_now.to_vec(), outer);
    let inner_now = client.operator().read(&format!("{root}/b/b/f")).await?;
    assert_eq!(inner_now.to_vec(), inner);
    assert!(!client.object_exists(&format!("{root}/f")).await?);
    Ok(())
}

async fn test_move_folder_stops_at_first_failed_copy(client: StorageClient) -> Result<()> {
    let src = TEST_FIXTURE.new_folder_name();
    let dest = TEST_FIXTURE.new_folder_name();
    put_random(&client, &format!("{src}/a.bin")).await?;
    put_random(&client, &format!("{src}/b.bin")).await?;
    // A directory sitting on the second target makes that copy fail.
    client.create_folder(&format!("{dest}/b.bin")).await?;

    let err = client.move_folder(&src, &dest).await.unwrap_err();
    assert!(matches!(err, Error::MoveFolderFailed { .. }), "got {err}");
    assert!(err.opendal_source().is_some());

    // Nothing is rolled back and nothing is deleted from the source.
    assert!(client.object_exists(&format!("{src}/a.bin")).await?);
    assert!(client.object_exists(&format!("{src}/b.bin")).await?);
    assert!(client.object_exists(&format!("{dest}/a.bin")).await?);
    Ok(())
}

async fn e2e_test_mv_folder_command(client: StorageClient) -> Result<()> {
    let src = TEST_FIXTURE.new_folder_name();
    let dest = TEST_FIXTURE.new_folder_name();
    let content = put_random(&client, &format!("{src}/song.mp3")).await?;

    bucketeer_cmd()
        .arg("mv")
        .arg(&src)
        .arg(&dest)
        .assert()
        .success();

    let moved = client.operator().read(&format!("{dest}/song.mp3")).await?;
    assert_eq!(moved.to_vec(), content);
    assert!(!client.folder_exists(&src).await?);
    Ok(())
}
