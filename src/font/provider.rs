//! # 字体探测链
//!
//! ## 设计思路
//!
//! 每个候选字体来源实现 `FontProvider`，返回 `Option<FontFace>`。
//! `FontChain` 按顺序短路扫描，第一个成功的来源胜出；全部失败时落到内置点阵字体，
//! 因此整条链永远不会失败。
//!
//! 默认顺序：
//!
//! ```text
//! 首选本地路径（Oswald Bold）
//!    ↓ 全部缺失
//! 网络下载 Oswald（已缓存则直接读缓存）
//!    ↓ 失败
//! 回退本地路径（Helvetica / Arial Bold / DejaVu Sans Bold ...）
//!    ↓ 全部缺失
//! 内置 5×7 点阵字体
//! ```
//!
//! ## 实现思路
//!
//! - 单个来源的失败只记 `debug` 日志，不向上抛。
//! - 下载是一次阻塞请求，带超时，不重试；下载成功且能解析时才写入缓存文件。

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::FontFace;
use crate::settings::FontSettings;

/// 字体候选来源。
pub trait FontProvider {
    /// 来源描述（用于日志）。
    fn name(&self) -> String;

    /// 尝试加载；任何失败都返回 `None`。
    fn load(&self) -> Option<FontFace>;
}

/// 本地字体文件。
pub struct LocalFontProvider {
    path: PathBuf,
}

impl LocalFontProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FontProvider for LocalFontProvider {
    fn name(&self) -> String {
        format!("local:{}", self.path.display())
    }

    fn load(&self) -> Option<FontFace> {
        load_font_file(&self.path)
    }
}

fn load_font_file(path: &Path) -> Option<FontFace> {
    if !path.exists() {
        log::debug!("🔍 字体文件不存在: {}", path.display());
        return None;
    }

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            log::debug!("⚠️ 读取字体文件失败 {}: {}", path.display(), err);
            return None;
        }
    };

    let face = FontFace::from_bytes(bytes, path.display().to_string());
    if face.is_none() {
        log::debug!("⚠️ 无法解析字体文件: {}", path.display());
    }
    face
}

/// 网络下载字体，并缓存到本地文件。
pub struct DownloadFontProvider {
    url: String,
    cache_path: PathBuf,
    timeout: Duration,
}

impl DownloadFontProvider {
    pub fn new(url: impl Into<String>, cache_path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            cache_path: cache_path.into(),
            timeout,
        }
    }

    fn download(&self) -> Result<Vec<u8>, String> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| format!("构建 HTTP 客户端失败：{}", e))?;

        let response = client
            .get(&self.url)
            .send()
            .map_err(|e| format!("请求失败：{}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status.as_u16()));
        }

        response
            .bytes()
            .map(|bytes| bytes.to_vec())
            .map_err(|e| format!("读取响应失败：{}", e))
    }

    fn store_cache(&self, bytes: &[u8]) {
        if let Some(parent) = self.cache_path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                log::warn!("⚠️ 创建字体缓存目录失败 {}: {}", parent.display(), err);
                return;
            }
        }
        if let Err(err) = fs::write(&self.cache_path, bytes) {
            log::warn!("⚠️ 写入字体缓存失败 {}: {}", self.cache_path.display(), err);
        }
    }
}

impl FontProvider for DownloadFontProvider {
    fn name(&self) -> String {
        format!("download:{}", self.url)
    }

    fn load(&self) -> Option<FontFace> {
        if self.cache_path.exists() {
            if let Some(face) = load_font_file(&self.cache_path) {
                return Some(face);
            }
        }

        log::info!("🌐 下载字体: {}", self.url);
        let bytes = match self.download() {
            Ok(bytes) => bytes,
            Err(err) => {
                log::debug!("⚠️ 字体下载失败: {}", err);
                return None;
            }
        };

        let face = FontFace::from_bytes(bytes.clone(), self.url.clone())?;
        self.store_cache(&bytes);
        Some(face)
    }
}

/// 内置点阵字体，永远成功。
pub struct BuiltinFontProvider;

impl FontProvider for BuiltinFontProvider {
    fn name(&self) -> String {
        "builtin".to_string()
    }

    fn load(&self) -> Option<FontFace> {
        Some(FontFace::Bitmap)
    }
}

/// 有序的字体来源列表。
pub struct FontChain {
    providers: Vec<Box<dyn FontProvider>>,
}

impl FontChain {
    pub fn new(providers: Vec<Box<dyn FontProvider>>) -> Self {
        Self { providers }
    }

    /// 只含内置字体的探测链（测试与离线场景）。
    pub fn builtin_only() -> Self {
        Self::new(vec![Box::new(BuiltinFontProvider)])
    }

    /// 按设置组装默认探测链。
    pub fn from_settings(settings: &FontSettings) -> Self {
        let mut providers: Vec<Box<dyn FontProvider>> = Vec::new();

        for path in &settings.preferred_paths {
            providers.push(Box::new(LocalFontProvider::new(path)));
        }
        if let Some(url) = settings.download_url.as_deref().filter(|url| !url.is_empty()) {
            providers.push(Box::new(DownloadFontProvider::new(
                url,
                &settings.download_cache,
                Duration::from_secs(settings.download_timeout_secs),
            )));
        }
        for path in &settings.fallback_paths {
            providers.push(Box::new(LocalFontProvider::new(path)));
        }
        providers.push(Box::new(BuiltinFontProvider));

        Self::new(providers)
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|provider| provider.name()).collect()
    }

    /// 取第一个成功加载的字体。
    pub fn acquire(&self) -> FontFace {
        let face = self
            .providers
            .iter()
            .find_map(|provider| {
                let face = provider.load();
                if face.is_none() {
                    log::debug!("↪️ 字体来源不可用，尝试下一个: {}", provider.name());
                }
                face
            })
            .unwrap_or(FontFace::Bitmap);

        if face.is_builtin() {
            log::warn!("⚠️ 未找到可用字体，使用内置点阵字体");
        } else {
            log::info!("🔤 使用字体: {}", face.describe());
        }
        face
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock error")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("logo-compositor-font-test-{nanos}"));
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    struct CountingProvider {
        result: bool,
        calls: std::rc::Rc<std::cell::Cell<u32>>,
    }

    impl FontProvider for CountingProvider {
        fn name(&self) -> String {
            "counting".to_string()
        }

        fn load(&self) -> Option<FontFace> {
            self.calls.set(self.calls.get() + 1);
            self.result.then_some(FontFace::Bitmap)
        }
    }

    #[test]
    fn missing_local_paths_fall_through_to_builtin() {
        let settings = FontSettings {
            preferred_paths: vec![PathBuf::from("/no/such/Oswald-Bold.ttf")],
            download_url: None,
            download_cache: PathBuf::from("/no/such/cache.ttf"),
            download_timeout_secs: 1,
            fallback_paths: vec![PathBuf::from("/no/such/Arial Bold.ttf")],
        };

        let face = FontChain::from_settings(&settings).acquire();

        assert!(face.is_builtin());
    }

    #[test]
    fn chain_stops_at_first_success() {
        let first = std::rc::Rc::new(std::cell::Cell::new(0));
        let second = std::rc::Rc::new(std::cell::Cell::new(0));
        let third = std::rc::Rc::new(std::cell::Cell::new(0));

        let chain = FontChain::new(vec![
            Box::new(CountingProvider { result: false, calls: first.clone() }),
            Box::new(CountingProvider { result: true, calls: second.clone() }),
            Box::new(CountingProvider { result: true, calls: third.clone() }),
        ]);
        chain.acquire();

        assert_eq!((first.get(), second.get(), third.get()), (1, 1, 0));
    }

    #[test]
    fn empty_chain_still_yields_a_face() {
        assert!(FontChain::new(Vec::new()).acquire().is_builtin());
    }

    #[test]
    fn unparseable_local_file_is_skipped() {
        let dir = unique_temp_dir();
        let path = dir.join("broken.ttf");
        fs::write(&path, b"not a font at all").expect("write broken font");

        assert!(LocalFontProvider::new(&path).load().is_none());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn chain_order_follows_settings() {
        let settings = FontSettings {
            preferred_paths: vec![PathBuf::from("a.ttf")],
            download_url: Some("http://fonts.invalid/oswald.ttf".to_string()),
            download_cache: PathBuf::from("cache.ttf"),
            download_timeout_secs: 1,
            fallback_paths: vec![PathBuf::from("b.ttf")],
        };

        let names = FontChain::from_settings(&settings).provider_names();

        assert_eq!(
            names,
            vec![
                "local:a.ttf".to_string(),
                "download:http://fonts.invalid/oswald.ttf".to_string(),
                "local:b.ttf".to_string(),
                "builtin".to_string(),
            ]
        );
    }

    #[test]
    fn download_of_non_font_body_returns_none_and_skips_cache() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server failed");
        let addr = listener.local_addr().expect("read local addr failed");

        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept failed");

            let mut req_buf = [0u8; 1024];
            let _ = stream.read(&mut req_buf);

            let body = b"<html>not a font</html>";
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: font/ttf\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );

            stream
                .write_all(response.as_bytes())
                .expect("write headers failed");
            stream.write_all(body).expect("write body failed");
            stream.flush().expect("flush failed");
        });

        let dir = unique_temp_dir();
        let cache = dir.join("fonts").join("Oswald.ttf");
        let provider = DownloadFontProvider::new(
            format!("http://127.0.0.1:{}/Oswald.ttf", addr.port()),
            &cache,
            Duration::from_secs(5),
        );

        let face = provider.load();
        server.join().expect("server thread failed");

        assert!(face.is_none());
        assert!(!cache.exists());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn local_provider_loads_system_font() {
        let Some(path) = crate::font::system_test_font() else {
            return;
        };

        let face = LocalFontProvider::new(&path).load().expect("load system font");
        assert!(!face.is_builtin());
    }

    #[test]
    fn download_of_real_font_is_cached_and_reused() {
        let Some(font_path) = crate::font::system_test_font() else {
            return;
        };
        let font_bytes = fs::read(&font_path).expect("read system font");
        let served = font_bytes.clone();

        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server failed");
        let addr = listener.local_addr().expect("read local addr failed");

        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept failed");

            let mut req_buf = [0u8; 1024];
            let _ = stream.read(&mut req_buf);

            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: font/ttf\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                served.len()
            );

            stream
                .write_all(response.as_bytes())
                .expect("write headers failed");
            stream.write_all(&served).expect("write body failed");
            stream.flush().expect("flush failed");
        });

        let dir = unique_temp_dir();
        let cache = dir.join("fonts").join("Oswald.ttf");
        let provider = DownloadFontProvider::new(
            format!("http://127.0.0.1:{}/Oswald.ttf", addr.port()),
            &cache,
            Duration::from_secs(5),
        );

        let face = provider.load().expect("download font");
        server.join().expect("server thread failed");

        assert!(!face.is_builtin());
        assert_eq!(fs::read(&cache).expect("read cache"), font_bytes);

        // 服务端已退出，第二次只能命中缓存
        let cached = provider.load().expect("load cached font");
        assert!(cached.describe().contains("Oswald.ttf"));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn download_http_error_returns_none() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server failed");
        let addr = listener.local_addr().expect("read local addr failed");

        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept failed");

            let mut req_buf = [0u8; 1024];
            let _ = stream.read(&mut req_buf);

            let response =
                "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";
            stream
                .write_all(response.as_bytes())
                .expect("write response failed");
            stream.flush().expect("flush failed");
        });

        let dir = unique_temp_dir();
        let provider = DownloadFontProvider::new(
            format!("http://127.0.0.1:{}/missing.ttf", addr.port()),
            dir.join("missing.ttf"),
            Duration::from_secs(5),
        );

        assert!(provider.load().is_none());
        server.join().expect("server thread failed");
        let _ = fs::remove_dir_all(dir);
    }
}
