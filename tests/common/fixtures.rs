//! Mock registry and artifact host fixtures

use modrinth_dl::{BatchDownloader, BatchRequest, Config, Loader, PackageId, StabilityTier};
use serde_json::{Value, json};
use std::path::Path;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Game version every fixture registry answers for
pub const GAME_VERSION: &str = "1.20.1";

/// Registry release object with a single primary file served by `server`
pub fn release_json(
    server: &MockServer,
    version: &str,
    version_type: &str,
    published: &str,
    filename: &str,
) -> Value {
    json!({
        "id": format!("id-{version}"),
        "version_number": version,
        "version_type": version_type,
        "date_published": published,
        "loaders": ["fabric"],
        "game_versions": [GAME_VERSION],
        "files": [
            {
                "filename": format!("{filename}-sources.jar"),
                "url": format!("{}/cdn/{filename}-sources.jar", server.uri()),
                "primary": false
            },
            {
                "filename": filename,
                "url": format!("{}/cdn/{filename}", server.uri()),
                "primary": true,
                "size": 1234
            }
        ]
    })
}

/// Answer the version listing of `project` for fabric on [`GAME_VERSION`]
pub async fn mount_versions(server: &MockServer, project: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/project/{project}/version")))
        .and(query_param("loaders", "[\"fabric\"]"))
        .and(query_param("game_versions", format!("[\"{GAME_VERSION}\"]")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Answer the version listing of `project` with a bare status code
pub async fn mount_versions_status(server: &MockServer, project: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/project/{project}/version")))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Serve an artifact body under `/cdn/{filename}`
pub async fn mount_artifact(server: &MockServer, filename: &str, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path(format!("/cdn/{filename}")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
}

/// Fail an artifact request under `/cdn/{filename}` with `status`
pub async fn mount_artifact_status(server: &MockServer, filename: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/cdn/{filename}")))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Configuration pointing the registry at `server`
pub fn config_for(server: &MockServer, concurrency: usize) -> Config {
    let mut config = Config::default();
    config.registry.base_url = server.uri();
    config.download.max_concurrent_downloads = concurrency;
    config
}

/// HTTP-backed downloader pointing at `server`
pub fn downloader_for(server: &MockServer) -> BatchDownloader {
    BatchDownloader::new(&config_for(server, 1)).unwrap()
}

/// Fabric request for [`GAME_VERSION`] writing into `destination`
pub fn fabric_request(destination: &Path, minimum_tier: StabilityTier) -> BatchRequest {
    BatchRequest {
        platform_version: GAME_VERSION.to_string(),
        loader: Loader::Fabric,
        minimum_tier,
        destination: destination.to_path_buf(),
    }
}

/// Package ids from string literals
pub fn package_ids(ids: &[&str]) -> Vec<PackageId> {
    ids.iter().filter_map(|id| PackageId::parse(id)).collect()
}

/// Files in `dir`, sorted by name
pub fn dir_listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
