use ftp_batch::config::ConnectionConfig;
use ftp_batch::error::DownloadError;
use ftp_batch::manifest::Manifest;
use std::fs;
use std::path::Path;

#[test]
fn test_load_manifest_from_disk() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("job.json");
    fs::write(
        &path,
        r#"{
            "remote_dir": "/pub/",
            "local_dir": "out",
            "filelists": [ { "files": ["a.txt"] } ]
        }"#,
    )
    .unwrap();

    let manifest = Manifest::load(&path).unwrap();
    let (config, filelists) = manifest
        .into_job(ConnectionConfig::new("ftp.example.com", "deploy", "secret"))
        .unwrap();

    assert_eq!(config.remote_dir.as_deref(), Some("/pub/"));
    assert_eq!(filelists.len(), 1);
    assert_eq!(filelists[0].files, vec!["a.txt"]);
}

#[test]
fn test_missing_manifest_is_a_read_error() {
    let err = Manifest::load(Path::new("/nonexistent/job.json")).unwrap_err();
    assert!(matches!(err, DownloadError::ManifestRead { .. }));
    assert!(err.to_string().contains("job.json"));
}

#[test]
fn test_malformed_manifest_is_a_parse_error() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("job.json");
    fs::write(&path, "{ not json").unwrap();

    let err = Manifest::load(&path).unwrap_err();
    assert!(matches!(err, DownloadError::ManifestParse { .. }));
}
