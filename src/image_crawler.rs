use std::fs::{self, File};
use std::io;
use std::path::Path;

use regex::Regex;
use ureq::Agent;
use url::Url;

use crate::error::HarvestError;
use crate::fetch;
use crate::models::{CrawlOutcome, DownloadFailure, ImageDownload, ImageSource};

const FALLBACK_EXTENSION: &str = "jpg";
const KNOWN_EXTENSIONS: [&str; 10] = [
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "svg", "avif", "ico", "tiff",
];

pub fn crawl_images(
    agent: &Agent,
    page_url: &str,
    save_folder: &Path,
) -> Result<CrawlOutcome, HarvestError> {
    Url::parse(page_url)?;
    let Some(html) = fetch::fetch_page(agent, page_url)? else {
        return Ok(CrawlOutcome::default());
    };

    let sources = extract_image_sources(&html);
    tracing::info!(page_url, images = sources.len(), "parsed image tags");
    fs::create_dir_all(save_folder)?;

    let mut outcome = CrawlOutcome::default();
    for source in sources {
        outcome.image_urls.push(source.url.clone());
        match download_image(agent, &source, save_folder) {
            Ok(download) => {
                tracing::info!(path = %download.path.display(), "downloaded image");
                outcome.downloads.push(download);
            }
            Err(error) => {
                tracing::warn!(url = %source.url, %error, "failed to download image");
                outcome.failures.push(DownloadFailure {
                    index: source.index,
                    url: source.url,
                    reason: error.to_string(),
                });
            }
        }
    }

    Ok(outcome)
}

/// Collects absolute `http(s)` sources of every `<img>` tag in document order.
pub fn extract_image_sources(html: &str) -> Vec<ImageSource> {
    let tag_re = Regex::new(r"(?is)<img\b[^>]*>").expect("hardcoded img tag regex is valid");
    let src_re = Regex::new(r#"(?is)[\s/]src\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("hardcoded src attribute regex is valid");

    tag_re
        .find_iter(html)
        .enumerate()
        .filter_map(|(index, tag)| {
            let capture = src_re.captures(tag.as_str())?;
            let raw = capture
                .get(1)
                .or_else(|| capture.get(2))
                .or_else(|| capture.get(3))?
                .as_str();
            let src = decode_entities(raw.trim());
            is_absolute_http(&src).then_some(ImageSource { index, url: src })
        })
        .collect()
}

fn is_absolute_http(src: &str) -> bool {
    Url::parse(src).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

fn decode_entities(input: &str) -> String {
    input
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

pub fn download_image(
    agent: &Agent,
    source: &ImageSource,
    folder: &Path,
) -> Result<ImageDownload, HarvestError> {
    let response = fetch::get(agent, &source.url)?;
    let status = response.status().as_u16();
    if status != 200 {
        return Err(HarvestError::Upstream(format!(
            "image request returned status {status}"
        )));
    }

    let extension = infer_extension(fetch::content_type(&response).as_deref(), &source.url);
    let path = folder.join(format!("image_{}.{extension}", source.index));
    let mut reader = response.into_body().into_reader();
    let mut file = File::create(&path)?;
    if let Err(error) = io::copy(&mut reader, &mut file) {
        drop(file);
        let _ = fs::remove_file(&path);
        return Err(error.into());
    }

    Ok(ImageDownload {
        index: source.index,
        url: source.url.clone(),
        path,
    })
}

/// Picks a file extension from the response type, then the URL path, then `jpg`.
pub fn infer_extension(content_type: Option<&str>, url: &str) -> String {
    let from_header = content_type.and_then(|value| {
        let mime = value.split(';').next()?.trim().to_ascii_lowercase();
        let subtype = mime.strip_prefix("image/")?;
        let extension = match subtype {
            "jpeg" | "jpg" | "pjpeg" => "jpg",
            "svg+xml" => "svg",
            "x-icon" | "vnd.microsoft.icon" => "ico",
            "x-ms-bmp" => "bmp",
            other => other,
        };
        KNOWN_EXTENSIONS
            .contains(&extension)
            .then(|| extension.to_string())
    });
    if let Some(extension) = from_header {
        return extension;
    }

    let from_path = Url::parse(url).ok().and_then(|parsed| {
        let name = parsed.path_segments()?.next_back()?.to_string();
        let (_, extension) = name.rsplit_once('.')?;
        let extension = extension.to_ascii_lowercase();
        KNOWN_EXTENSIONS
            .contains(&extension.as_str())
            .then_some(extension)
    });
    from_path.unwrap_or_else(|| FALLBACK_EXTENSION.to_string())
}
