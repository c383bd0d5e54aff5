use crate::error::{AppError, Result};
use crate::events::{IconCommand, IconResult, UserEvent};
use eframe::egui;
use image::imageops::FilterType;
use log::{debug, error};
use std::collections::HashMap;
use std::io::Read;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::Duration;
use url::Url;

pub const FAVICON_ENDPOINT: &str = "https://www.google.com/s2/favicons";
const FETCH_TIMEOUT: Duration = Duration::from_secs(3);
const MAX_FAVICON_BYTES: u64 = 1024 * 1024;

pub const PLACEHOLDER_COLOR: egui::Color32 = egui::Color32::from_rgb(128, 128, 128);
const TRAY_ICON_SIDE: u32 = 64;
const TRAY_ICON_COLOR: [u8; 4] = [60, 63, 65, 255];

/// Something that can produce raw favicon bytes for a domain.
pub trait FaviconSource {
    fn fetch(&self, domain: &str) -> Result<Vec<u8>>;
}

/// Looks favicons up through Google's favicon-by-domain service.
pub struct GoogleFavicons {
    agent: ureq::Agent,
}

impl GoogleFavicons {
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(FETCH_TIMEOUT).build(),
        }
    }
}

impl FaviconSource for GoogleFavicons {
    fn fetch(&self, domain: &str) -> Result<Vec<u8>> {
        let response = self
            .agent
            .get(FAVICON_ENDPOINT)
            .query("domain", domain)
            .query("sz", "64")
            .call()
            .map_err(|err| AppError::FaviconFetch {
                domain: domain.to_string(),
                reason: err.to_string(),
            })?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_FAVICON_BYTES)
            .read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

/// Host part of a link, which is all that is sent to the favicon service.
pub fn favicon_domain(link_url: &str) -> String {
    let trimmed = link_url.trim();
    let host_of = |candidate: &str| {
        Url::parse(candidate)
            .ok()
            .and_then(|url| url.host_str().map(str::to_owned))
    };
    host_of(trimmed)
        .or_else(|| host_of(&format!("https://{trimmed}")))
        .unwrap_or_else(|| trimmed.to_string())
}

pub fn decode_icon(bytes: &[u8], side: u32) -> Result<egui::ColorImage> {
    let decoded = image::load_from_memory(bytes)?;
    let rgba = decoded
        .resize_exact(side, side, FilterType::Lanczos3)
        .to_rgba8();
    Ok(egui::ColorImage::from_rgba_unmultiplied(
        [side as usize, side as usize],
        rgba.as_raw(),
    ))
}

pub fn placeholder_icon(side: u32) -> egui::ColorImage {
    egui::ColorImage::new([side as usize, side as usize], PLACEHOLDER_COLOR)
}

/// URL → decoded icon at the current icon size. Misses are fetched through
/// the source; any failure caches a placeholder so it is not retried until
/// the next reset.
pub struct FaviconCache<S> {
    source: S,
    icon_size: u32,
    entries: HashMap<String, egui::ColorImage>,
}

impl<S: FaviconSource> FaviconCache<S> {
    pub fn new(source: S, icon_size: u32) -> Self {
        Self {
            source,
            icon_size,
            entries: HashMap::new(),
        }
    }

    pub fn icon_size(&self) -> u32 {
        self.icon_size
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Drops every entry; later lookups are decoded at `icon_size`.
    pub fn reset(&mut self, icon_size: u32) {
        self.entries.clear();
        self.icon_size = icon_size;
    }

    pub fn get(&mut self, url: &str) -> &egui::ColorImage {
        let source = &self.source;
        let side = self.icon_size;
        self.entries
            .entry(url.to_string())
            .or_insert_with(|| load_icon(source, url, side))
    }
}

fn load_icon<S: FaviconSource>(source: &S, url: &str, side: u32) -> egui::ColorImage {
    let domain = favicon_domain(url);
    match source
        .fetch(&domain)
        .and_then(|bytes| decode_icon(&bytes, side))
    {
        Ok(image) => image,
        Err(err) => {
            debug!("Using placeholder icon for {url}: {err}");
            placeholder_icon(side)
        }
    }
}

/// Runs the cache on its own thread so slow lookups never stall the panel.
pub fn spawn_icon_worker<S>(
    rx: Receiver<IconCommand>,
    tx: Sender<UserEvent>,
    ctx: egui::Context,
    source: S,
    icon_size: u32,
) where
    S: FaviconSource + Send + 'static,
{
    let spawned = thread::Builder::new()
        .name("favicon".into())
        .spawn(move || {
            let mut cache = FaviconCache::new(source, icon_size);
            let mut current = 0;
            while let Ok(command) = rx.recv() {
                match command {
                    IconCommand::Reset {
                        generation,
                        icon_size,
                    } => {
                        current = generation;
                        debug!(
                            "Favicon cache reset from {}px to {icon_size}px, {} entries dropped",
                            cache.icon_size(),
                            cache.len()
                        );
                        cache.reset(icon_size);
                    }
                    IconCommand::Fetch { generation, url } => {
                        if generation != current {
                            continue;
                        }
                        let image = cache.get(&url).clone();
                        let ready = IconResult {
                            generation,
                            url,
                            image,
                        };
                        if tx.send(UserEvent::IconReady(ready)).is_err() {
                            break;
                        }
                        ctx.request_repaint();
                    }
                }
            }
        });
    if let Err(err) = spawned {
        error!("Failed to start favicon worker: {err}");
    }
}

/// Solid square shown in the system tray.
pub fn tray_icon_rgba() -> (Vec<u8>, u32, u32) {
    let pixels = (TRAY_ICON_SIDE * TRAY_ICON_SIDE) as usize;
    (
        TRAY_ICON_COLOR.repeat(pixels),
        TRAY_ICON_SIDE,
        TRAY_ICON_SIDE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{mpsc, Arc};

    #[derive(Clone, Default)]
    struct Failing {
        attempts: Arc<AtomicUsize>,
    }

    impl FaviconSource for Failing {
        fn fetch(&self, domain: &str) -> Result<Vec<u8>> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(AppError::FaviconFetch {
                domain: domain.to_string(),
                reason: "offline".into(),
            })
        }
    }

    struct Png {
        domains: std::sync::Mutex<Vec<String>>,
    }

    impl FaviconSource for Png {
        fn fetch(&self, domain: &str) -> Result<Vec<u8>> {
            if let Ok(mut seen) = self.domains.lock() {
                seen.push(domain.to_string());
            }
            let img = image::RgbaImage::from_pixel(16, 16, image::Rgba([200, 10, 10, 255]));
            let mut bytes = std::io::Cursor::new(Vec::new());
            img.write_to(&mut bytes, image::ImageFormat::Png)?;
            Ok(bytes.into_inner())
        }
    }

    #[test]
    fn failed_fetch_is_cached_as_placeholder() {
        let source = Failing::default();
        let attempts = source.attempts.clone();
        let mut cache = FaviconCache::new(source, 24);

        let first = cache.get("https://down.test").clone();
        let second = cache.get("https://down.test").clone();

        assert_eq!(first, second);
        assert_eq!(first, placeholder_icon(24));
        assert_eq!(first.size, [24, 24]);
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn reset_clears_and_resizes() {
        let source = Failing::default();
        let attempts = source.attempts.clone();
        let mut cache = FaviconCache::new(source, 24);
        cache.get("https://down.test");
        assert_eq!(cache.len(), 1);

        cache.reset(48);
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.icon_size(), 48);
        assert_eq!(cache.get("https://down.test").size, [48, 48]);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn decoded_icons_are_resized_and_keyed_by_domain() {
        let source = Png {
            domains: std::sync::Mutex::new(Vec::new()),
        };
        let mut cache = FaviconCache::new(source, 32);
        let image = cache.get("https://www.example.com/some/page?q=1").clone();
        assert_eq!(image.size, [32, 32]);
        assert_eq!(image.pixels[0], egui::Color32::from_rgb(200, 10, 10));
        assert_eq!(
            cache.source.domains.lock().unwrap().as_slice(),
            ["www.example.com".to_string()]
        );
    }

    #[test]
    fn undecodable_bytes_fall_back() {
        assert!(decode_icon(b"<html>not an image</html>", 16).is_err());
    }

    #[test]
    fn domain_extraction() {
        assert_eq!(favicon_domain("https://example.com/a/b"), "example.com");
        assert_eq!(favicon_domain("http://sub.example.org:8080/"), "sub.example.org");
        assert_eq!(favicon_domain("example.com/path"), "example.com");
        assert_eq!(favicon_domain("  github.com "), "github.com");
    }

    #[test]
    fn worker_skips_stale_generations() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (ui_tx, ui_rx) = mpsc::channel();
        let source = Failing::default();
        let attempts = source.attempts.clone();
        spawn_icon_worker(cmd_rx, ui_tx, egui::Context::default(), source, 24);

        cmd_tx
            .send(IconCommand::Reset {
                generation: 2,
                icon_size: 16,
            })
            .unwrap();
        cmd_tx
            .send(IconCommand::Fetch {
                generation: 1,
                url: "https://stale.test".into(),
            })
            .unwrap();
        cmd_tx
            .send(IconCommand::Fetch {
                generation: 2,
                url: "https://fresh.test".into(),
            })
            .unwrap();

        let event = ui_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        match event {
            UserEvent::IconReady(result) => {
                assert_eq!(result.generation, 2);
                assert_eq!(result.url, "https://fresh.test");
                assert_eq!(result.image.size, [16, 16]);
            }
            other => panic!("unexpected event {other:?}"),
        }
        drop(cmd_tx);
        assert!(ui_rx.recv_timeout(Duration::from_secs(5)).is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn tray_icon_is_solid_square() {
        let (rgba, w, h) = tray_icon_rgba();
        assert_eq!((w, h), (64, 64));
        assert_eq!(rgba.len(), 64 * 64 * 4);
        assert_eq!(&rgba[..4], &TRAY_ICON_COLOR);
    }
}
