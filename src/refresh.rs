use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use log::info;
use reqwest::header;
use scraper::Html;
use url::Url;

use crate::{episode_list_parser, fs_util::write_with_backup};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

fn reqwest_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .default_headers(
            [(header::USER_AGENT, header::HeaderValue::from_static(USER_AGENT))]
                .into_iter()
                .collect(),
        )
        .build()
}

pub async fn download(url: &Url) -> anyhow::Result<String> {
    info!("Downloading {url}");
    let response = reqwest_client()?.get(url.clone()).send().await?;
    if !response.status().is_success() {
        bail!(
            "Unexpected error code: server returned {:?}",
            response.status()
        );
    }
    Ok(response.text().await?)
}

/// Replaces the local episode list by a fresh download.
///
/// The downloaded page is checked to contain a readable episode table first,
/// so a broken page never displaces a working copy.
/// Returns the backup location of the previous copy, if there was one.
pub async fn refresh(url: &Url, episode_file: &Path) -> anyhow::Result<Option<PathBuf>> {
    let page = download(url).await?;
    let episodes = episode_list_parser::parse(&Html::parse_document(&page))
        .with_context(|| format!("The page at {url} does not contain a readable episode list"))?;
    info!("Downloaded page lists {} episodes", episodes.len());
    write_with_backup(episode_file, &page)
}
