use anyhow::Result;
use opencv::core::Mat;
use std::time::Instant;

use yubi_tracker::camera::OpenCvCamera;
use yubi_tracker::config::Config;
use yubi_tracker::gesture::GestureExtractor;
use yubi_tracker::hand::{preprocess_for_hand_landmark, HandDetector, Handedness};
use yubi_tracker::net::{GestureClient, ReconnectPolicy};
use yubi_tracker::render::{Key, MinifbRenderer};

const CONFIG_PATH: &str = "config.toml";

fn main() -> Result<()> {
    let config = Config::load_or_default(CONFIG_PATH);

    println!("Yubi Tracker {}", env!("GIT_VERSION"));
    println!("Target: {}:{}", config.network.host, config.network.port);
    println!(
        "Detection confidence: {}, Tracking confidence: {}",
        config.hand.detection_confidence, config.hand.tracking_confidence
    );
    println!("Reconnect interval: {}s", config.app.reconnect_interval_secs);
    println!("Debug view: {}", if config.debug.view { "ON" } else { "OFF" });
    println!();
    println!("右手をカメラに向けてください");
    println!("操作: [Q] 終了  [V] オーバーレイ切替  [R] 再接続  [Esc] 終了");
    println!();

    let mut camera = OpenCvCamera::from_config(&config.camera)?;
    let (width, height) = camera.resolution();
    println!("Camera: {}x{}", width, height);

    let mut detector = HandDetector::new(
        &config.hand.model_path,
        config.hand.detection_confidence,
        config.hand.tracking_confidence,
    )?;
    println!("Model loaded");

    let mut extractor = GestureExtractor::new();
    let mut client = GestureClient::new(&config.network.host, config.network.port);
    let mut reconnect = ReconnectPolicy::from_secs(config.app.reconnect_interval_secs);

    let mut renderer = if config.debug.view {
        Some(MinifbRenderer::new(
            "Finger Tracker",
            width as usize,
            height as usize,
        )?)
    } else {
        None
    };
    let mut show_overlay = true;

    // FPS計測（1秒窓、表示専用）
    let mut frame_count = 0u32;
    let mut fps_timer = Instant::now();
    let mut was_connected = false;

    loop {
        if let Some(ref r) = renderer {
            if !r.is_open() {
                break;
            }
        }

        // カメラ異常は致命的エラー。接続と違って再試行しない。
        let frame = match camera.read_frame() {
            Ok(frame) => frame,
            Err(e) => {
                eprintln!("Camera error: {}", e);
                break;
            }
        };

        // 鏡像になるよう左右反転
        let mut mirrored = Mat::default();
        if let Err(e) = opencv::core::flip(&frame, &mut mirrored, 1) {
            eprintln!("Camera error: {}", e);
            break;
        }

        // 切断中でも検出と抽出は毎フレーム行う。スキップするのは送信だけ。
        let input = match preprocess_for_hand_landmark(&mirrored) {
            Ok(input) => input,
            Err(e) => {
                eprintln!("Preprocess error: {}", e);
                break;
            }
        };
        let result = match detector.detect(input) {
            Ok(result) => result,
            Err(e) => {
                eprintln!("Inference error: {}", e);
                break;
            }
        };
        let record = extractor.extract(&result);

        if !client.is_connected() && reconnect.should_attempt() {
            client.reconnect();
        }
        client.send(&record);

        if client.is_connected() != was_connected {
            was_connected = client.is_connected();
            if !was_connected {
                println!("Disconnected, retrying every {}s", config.app.reconnect_interval_secs);
            }
        }

        if let Some(ref mut r) = renderer {
            if let Err(e) = r.draw_frame(&mirrored) {
                eprintln!("Render error: {}", e);
                break;
            }
            if show_overlay {
                if let Some(hand) = result
                    .hands
                    .iter()
                    .find(|h| h.handedness == Handedness::Right)
                {
                    r.draw_hand(&hand.landmarks, &record);
                }
            }
            if let Err(e) = r.update() {
                eprintln!("Render error: {}", e);
                break;
            }

            if r.is_key_pressed(Key::Q) {
                break;
            }
            if r.is_key_pressed(Key::V) {
                show_overlay = !show_overlay;
                println!("Overlay: {}", if show_overlay { "ON" } else { "OFF" });
            }
            if r.is_key_pressed(Key::R) {
                // 次フレームの再接続チェックで間隔を待たずに試行される
                println!("Manual reconnect requested");
                reconnect.force();
            }
        }

        frame_count += 1;
        let elapsed = fps_timer.elapsed().as_secs_f32();
        if elapsed >= 1.0 {
            println!(
                "FPS: {:.1} | connected: {}",
                frame_count as f32 / elapsed,
                client.is_connected()
            );
            frame_count = 0;
            fps_timer = Instant::now();
        }
    }

    // 解放順はカメラ → ソケットで固定
    println!("Shutting down...");
    drop(renderer);
    drop(camera);
    client.close();
    println!("Cleanup complete");
    Ok(())
}
