use crate::*;
use assert_cmd::prelude::*;
use bucketeer::error::{Error, Result};
use bucketeer::storage::StorageClient;
use predicates::prelude::*;

pub fn tests(client: &StorageClient, tests: &mut Vec<Trial>) {
    tests.extend(async_trials!(
        client,
        test_upload_uses_file_name_by_default,
        test_upload_collision_without_replace,
        test_upload_replace_overwrites,
        test_upload_missing_local_file,
        test_upload_to_folder_key_is_rejected,
        e2e_test_put_command
    ));
}

async fn test_upload_uses_file_name_by_default(client: StorageClient) -> Result<()> {
    let file_name = format!("{}.txt", TEST_FIXTURE.new_folder_name());
    let content = TEST_FIXTURE.new_content(1..4096);
    let local = TEST_FIXTURE.new_local_file(&file_name, &content);

    let written = client.upload_file(&local, None, false).await?;
    assert_eq!(written, content.len() as u64);

    let stored = client.operator().read(&file_name).await?;
    assert_eq!(content, stored.to_vec());
    Ok(())
}

async fn test_upload_collision_without_replace(client: StorageClient) -> Result<()> {
    let key = format!("{}/report.csv", TEST_FIXTURE.new_folder_name());
    let first = put_random(&client, &key).await?;

    let second = TEST_FIXTURE.new_content(1..4096);
    let local = TEST_FIXTURE.new_local_file("report.csv", &second);
    let err = client
        .upload_file(&local, Some(&key), false)
        .await
        .unwrap_err();
    assert!(
        matches!(err.root_cause(), Error::ObjectAlreadyExists { key: k } if *k == key),
        "expected a collision, got {err}"
    );

    let stored = client.operator().read(&key).await?;
    assert_eq!(first, stored.to_vec());
    Ok(())
}

async fn test_upload_replace_overwrites(client: StorageClient) -> Result<()> {
    let key = format!("{}/report.csv", TEST_FIXTURE.new_folder_name());
    put_random(&client, &key).await?;

    let latest = TEST_FIXTURE.new_content(1..4096);
    let local = TEST_FIXTURE.new_local_file("report.csv", &latest);
    client.upload_file(&local, Some(&key), true).await?;

    let stored = client.operator().read(&key).await?;
    assert_eq!(latest, stored.to_vec());
    Ok(())
}

async fn test_upload_missing_local_file(client: StorageClient) -> Result<()> {
    let missing = storage_root().join("does-not-exist").join("nothing.txt");
    let err = client.upload_file(&missing, None, false).await.unwrap_err();
    assert!(matches!(err.root_cause(), Error::PathNotFound { .. }));
    Ok(())
}

async fn test_upload_to_folder_key_is_rejected(client: StorageClient) -> Result<()> {
    let local = TEST_FIXTURE.new_local_file("a.txt", b"hello");
    let key = format!("{}/", TEST_FIXTURE.new_folder_name());
    let err = client
        .upload_file(&local, Some(&key), false)
        .await
        .unwrap_err();
    assert!(matches!(err.root_cause(), Error::InvalidPath { .. }));
    Ok(())
}

async fn e2e_test_put_command(client: StorageClient) -> Result<()> {
    let key = format!("{}/notes.txt", TEST_FIXTURE.new_folder_name());
    let local = TEST_FIXTURE.new_local_file("notes.txt", b"first version");

    bucketeer_cmd()
        .arg("put")
        .arg(&local)
        .arg(&key)
        .assert()
        .success()
        .stdout(predicate::str::contains("Upload"));

    bucketeer_cmd()
        .arg("put")
        .arg(&local)
        .arg(&key)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    let replacement = TEST_FIXTURE.new_local_file("notes.txt", b"second version");
    bucketeer_cmd()
        .arg("put")
        .arg(&replacement)
        .arg(&key)
        .arg("--replace")
        .assert()
        .success();

    let stored = client.operator().read(&key).await?;
    assert_eq!(stored.to_vec(), b"second version".to_vec());
    Ok(())
}
