use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub hand: HandConfig,
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub debug: DebugConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NetworkConfig {
    /// 送信先ホスト（ゲームエンジン側のTCPサーバー）
    #[serde(default = "default_host")]
    pub host: String,
    /// 送信先ポート
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CameraConfig {
    /// カメラデバイス番号
    #[serde(default = "default_camera_index")]
    pub index: i32,
    #[serde(default = "default_camera_width")]
    pub width: u32,
    #[serde(default = "default_camera_height")]
    pub height: u32,
    #[serde(default = "default_camera_fps")]
    pub fps: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HandConfig {
    /// ハンドランドマークONNXモデルのパス
    #[serde(default = "default_model_path")]
    pub model_path: String,
    /// 検出信頼度の閾値
    #[serde(default = "default_detection_confidence")]
    pub detection_confidence: f32,
    /// トラッキング信頼度の閾値
    #[serde(default = "default_tracking_confidence")]
    pub tracking_confidence: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// 再接続を試みる間隔（秒）
    #[serde(default = "default_reconnect_interval")]
    pub reconnect_interval_secs: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    /// デバッグウィンドウを表示するか
    #[serde(default = "default_debug_view")]
    pub view: bool,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 12345 }
fn default_camera_index() -> i32 { 0 }
fn default_camera_width() -> u32 { 640 }
fn default_camera_height() -> u32 { 480 }
fn default_camera_fps() -> u32 { 60 }
fn default_model_path() -> String { "models/hand_landmark.onnx".to_string() }
fn default_detection_confidence() -> f32 { 0.3 }
fn default_tracking_confidence() -> f32 { 0.3 }
fn default_reconnect_interval() -> f32 { 3.0 }
fn default_debug_view() -> bool { true }

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: default_camera_index(),
            width: default_camera_width(),
            height: default_camera_height(),
            fps: default_camera_fps(),
        }
    }
}

impl Default for HandConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            detection_confidence: default_detection_confidence(),
            tracking_confidence: default_tracking_confidence(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            reconnect_interval_secs: default_reconnect_interval(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            view: default_debug_view(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// 設定ファイルが読めない場合はデフォルト値を使う
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "Config not loaded ({}), using defaults: {}",
                    path.as_ref().display(),
                    e
                );
                Config::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.network.host, "127.0.0.1");
        assert_eq!(config.network.port, 12345);
        assert_eq!(config.camera.index, 0);
        assert!((config.hand.detection_confidence - 0.3).abs() < 1e-6);
        assert!((config.app.reconnect_interval_secs - 3.0).abs() < 1e-6);
        assert!(config.debug.view);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let toml_str = r#"
[network]
host = "192.168.1.20"

[hand]
detection_confidence = 0.5
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.network.host, "192.168.1.20");
        assert_eq!(config.network.port, 12345);
        assert!((config.hand.detection_confidence - 0.5).abs() < 1e-6);
        assert!((config.hand.tracking_confidence - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default("does_not_exist.toml");
        assert_eq!(config.network.port, 12345);
    }
}
