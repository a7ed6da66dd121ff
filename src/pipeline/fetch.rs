//! Image download: resolved URLs → decoded `DynamicImage`s.
//!
//! One GET per URL, no retries. A failed request, a non-2xx status or an
//! undecodable body leaves that slot empty and is logged; it never fails the
//! batch. Downloads run concurrently through `buffered`, which yields results
//! in input order regardless of completion order.

use crate::error::ImageFetchError;
use crate::progress::ProgressCallback;
use futures::stream::{self, StreamExt};
use image::DynamicImage;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Build the HTTP client used for image downloads.
pub fn image_client(timeout_secs: u64) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
}

/// Download and decode one image.
pub async fn fetch_image(
    client: &reqwest::Client,
    url: &str,
) -> Result<DynamicImage, ImageFetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ImageFetchError::Transport {
            url: url.to_string(),
            detail: e.to_string(),
        })?;

    if !response.status().is_success() {
        return Err(ImageFetchError::Status {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ImageFetchError::Transport {
            url: url.to_string(),
            detail: e.to_string(),
        })?;

    let image = image::load_from_memory(&bytes).map_err(|e| ImageFetchError::Decode {
        url: url.to_string(),
        detail: e.to_string(),
    })?;

    debug!(
        "Fetched {} → {}x{} px",
        url,
        image.width(),
        image.height()
    );
    Ok(image)
}

/// Fetch every URL, returning one slot per input in the same order.
///
/// `None` or empty URLs produce `None` without touching the network.
pub async fn fetch_images(
    client: &reqwest::Client,
    urls: &[Option<String>],
    concurrency: usize,
    progress: Option<&ProgressCallback>,
) -> Vec<Option<DynamicImage>> {
    let total = urls.len();
    if let Some(cb) = progress {
        cb.on_fetch_start(total);
    }

    let images: Vec<Option<DynamicImage>> = stream::iter(urls.iter().enumerate().map(
        move |(index, url)| async move {
            let url = match url.as_deref().filter(|u| !u.is_empty()) {
                Some(u) => u,
                None => {
                    if let Some(cb) = progress {
                        cb.on_image_error(index, total, "no image URL");
                    }
                    return None;
                }
            };

            match fetch_image(client, url).await {
                Ok(img) => {
                    if let Some(cb) = progress {
                        cb.on_image_complete(index, total);
                    }
                    Some(img)
                }
                Err(e) => {
                    warn!("Skipping image for entry {}: {}", index + 1, e);
                    if let Some(cb) = progress {
                        cb.on_image_error(index, total, &e.to_string());
                    }
                    None
                }
            }
        },
    ))
    .buffered(concurrency.max(1))
    .collect()
    .await;

    let fetched = images.iter().filter(|i| i.is_some()).count();
    info!("Fetched {}/{} images", fetched, total);
    if let Some(cb) = progress {
        cb.on_fetch_complete(total, fetched);
    }

    images
}
