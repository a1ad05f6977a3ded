//! Integration tests for the update workflow.
//!
//! These tests run the real HTTP fetcher, downloader and zip extractor
//! against a mock server:
//! - Fresh installation into an empty directory
//! - Upgrade with backup of the previous version
//! - No-op when already up to date
//! - Listing remote versions
//!
//! Run with: `cargo test --test update_integration`

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use mockito::{Server, ServerGuard};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use gaesdk::manager::{
    build_updater, ManagerConfig, ManagerError, UpdateOutcome, UpdateRequest, VersionRequest,
};

// ============================================================================
// Helper Functions
// ============================================================================

/// Build an SDK archive for `version` and return its bytes.
fn sdk_archive(temp: &TempDir, version: &str) -> Vec<u8> {
    let path = temp.path().join(format!("build-{}.zip", version));
    let mut zip = ZipWriter::new(File::create(&path).unwrap());

    let dir = SimpleFileOptions::default().unix_permissions(0o755);
    let file = SimpleFileOptions::default().unix_permissions(0o644);
    let exec = SimpleFileOptions::default().unix_permissions(0o755);

    zip.add_directory("go_appengine/", dir).unwrap();
    zip.start_file("go_appengine/VERSION", file).unwrap();
    write!(zip, "release: \"{}\"\ntimestamp: 1636596238\n", version).unwrap();
    zip.start_file("go_appengine/goapp", exec).unwrap();
    zip.write_all(b"#!/bin/sh\necho goapp\n").unwrap();
    zip.add_directory("go_appengine/lib/empty/", dir).unwrap();
    zip.finish().unwrap();

    fs::read(&path).unwrap()
}

/// Config pointing every endpoint at the mock server.
fn config(server: &ServerGuard, temp: &TempDir) -> ManagerConfig {
    ManagerConfig::new(temp.path().join("install"))
        .with_staging_dir(temp.path().join("staging"))
        .with_version_url(format!("{}/featured/VERSION", server.url()))
        .with_archive_base_url(format!("{}/featured", server.url()))
        .with_listing_url(format!("{}/", server.url()))
}

fn install_existing(install: &Path, version: &str) {
    let sdk = install.join("go_appengine");
    fs::create_dir_all(&sdk).unwrap();
    fs::write(sdk.join("VERSION"), format!("release: \"{}\"\n", version)).unwrap();
    fs::write(sdk.join("old-only.txt"), "from the old install").unwrap();
}

// ============================================================================
// Integration Tests
// ============================================================================

#[test]
fn test_fresh_install() {
    let temp = TempDir::new().unwrap();
    let mut server = Server::new();
    server
        .mock("GET", "/featured/VERSION")
        .with_body("release: \"1.9.98\"\n")
        .create();
    let archive = server
        .mock("GET", "/featured/go_appengine_sdk_linux_amd64-1.9.98.zip")
        .with_body(sdk_archive(&temp, "1.9.98"))
        .create();

    let updater = build_updater(config(&server, &temp)).unwrap();
    let outcome = updater.run(&UpdateRequest::default()).unwrap();

    archive.assert();
    let UpdateOutcome::Installed(report) = outcome else {
        panic!("expected an installation");
    };
    assert_eq!(report.version.as_str(), "1.9.98");
    assert!(report.previous.is_empty());
    assert!(report.backup_path.is_none());
    assert_eq!(report.files_extracted, 2);

    let install = temp.path().join("install");
    assert_eq!(
        fs::read_to_string(install.join("go_appengine/goapp")).unwrap(),
        "#!/bin/sh\necho goapp\n"
    );
    assert!(install.join("go_appengine/lib/empty").is_dir());
    assert_eq!(
        updater.store().installed_version().unwrap().as_str(),
        "1.9.98"
    );
    assert!(!temp
        .path()
        .join("staging/go_appengine_sdk_linux_amd64-1.9.98.zip")
        .exists());
}

#[test]
fn test_upgrade_backs_up_previous_version() {
    let temp = TempDir::new().unwrap();
    let install = temp.path().join("install");
    install_existing(&install, "1.9.90");

    let mut server = Server::new();
    server
        .mock("GET", "/featured/VERSION")
        .with_body("release: \"1.9.98\"\n")
        .create();
    server
        .mock("GET", "/featured/go_appengine_sdk_linux_amd64-1.9.98.zip")
        .with_body(sdk_archive(&temp, "1.9.98"))
        .create();

    let updater = build_updater(config(&server, &temp)).unwrap();
    let UpdateOutcome::Installed(report) = updater.run(&UpdateRequest::default()).unwrap() else {
        panic!("expected an installation");
    };

    let backup = install.join("go_appengine-1.9.90");
    assert_eq!(report.backup_path.as_deref(), Some(backup.as_path()));
    assert!(backup.join("old-only.txt").exists());
    assert!(!install.join("go_appengine/old-only.txt").exists());
    assert_eq!(
        updater.store().installed_version().unwrap().as_str(),
        "1.9.98"
    );
}

#[test]
fn test_up_to_date_downloads_nothing() {
    let temp = TempDir::new().unwrap();
    let install = temp.path().join("install");
    install_existing(&install, "1.9.98");

    let mut server = Server::new();
    server
        .mock("GET", "/featured/VERSION")
        .with_body("release: \"1.9.98\"\n")
        .create();
    let archive = server
        .mock("GET", "/featured/go_appengine_sdk_linux_amd64-1.9.98.zip")
        .expect(0)
        .create();

    let updater = build_updater(config(&server, &temp)).unwrap();
    let outcome = updater.run(&UpdateRequest::default()).unwrap();

    archive.assert();
    assert!(matches!(outcome, UpdateOutcome::UpToDate { .. }));
    assert!(install.join("go_appengine/old-only.txt").exists());
    assert!(!install.join("go_appengine-1.9.98").exists());
}

#[test]
fn test_missing_archive_keeps_backup() {
    let temp = TempDir::new().unwrap();
    let install = temp.path().join("install");
    install_existing(&install, "1.9.90");

    let mut server = Server::new();
    server
        .mock("GET", "/featured/go_appengine_sdk_linux_amd64-2.0.0.zip")
        .with_status(404)
        .create();

    let updater = build_updater(config(&server, &temp)).unwrap();
    let request = UpdateRequest::new(VersionRequest::parse(Some("2.0.0")));
    let err = updater.run(&request).unwrap_err();

    assert!(matches!(err, ManagerError::DownloadFailed { .. }));
    assert!(install.join("go_appengine-1.9.90/VERSION").exists());
}

#[test]
fn test_corrupt_download_is_an_archive_error() {
    let temp = TempDir::new().unwrap();
    let mut server = Server::new();
    server
        .mock("GET", "/featured/go_appengine_sdk_linux_amd64-1.9.98.zip")
        .with_body("<html>not a zip</html>")
        .create();

    let updater = build_updater(config(&server, &temp)).unwrap();
    let request = UpdateRequest::new(VersionRequest::parse(Some("1.9.98")));
    let err = updater.run(&request).unwrap_err();

    assert!(matches!(err, ManagerError::ExtractionFailed { .. }));
}

#[test]
fn test_list_remote_versions() {
    let temp = TempDir::new().unwrap();
    let mut server = Server::new();
    server
        .mock("GET", "/")
        .with_body(
            "<?xml version='1.0' encoding='UTF-8'?>\
             <ListBucketResult xmlns='http://doc.s3.amazonaws.com/2006-03-01'>\
             <Name>appengine-sdks</Name>\
             <Contents><Key>featured/go_appengine_sdk_linux_amd64-1.9.98.zip</Key></Contents>\
             <Contents><Key>featured/go_appengine_sdk_darwin_amd64-1.9.98.zip</Key></Contents>\
             <Contents><Key>featured/go_appengine_sdk_linux_amd64-1.9.91.zip</Key></Contents>\
             <Contents><Key>featured/unrelated.zip</Key></Contents>\
             </ListBucketResult>",
        )
        .create();

    let updater = build_updater(config(&server, &temp)).unwrap();
    let listing = updater.remote_versions().unwrap();
    let versions: Vec<&str> = listing.versions().map(|v| v.as_str()).collect();

    assert_eq!(versions, vec!["1.9.91", "1.9.98"]);
}
