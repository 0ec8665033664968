use anyhow::{Context, Result};
use ndarray::Array4;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;

use super::landmark::{
    DetectedHand, DetectionResult, HandLandmarkIndex, HandLandmarks, Handedness, Landmark,
};
use super::preprocess::HAND_INPUT_SIZE;

/// ハンドランドマーク検出器
///
/// MediaPipe Hands のランドマークモデル (ONNX) をラップする。
/// 1フレームにつき最大1つの手を返す。
pub struct HandDetector {
    session: Session,
    detection_confidence: f32,
    tracking_confidence: f32,
    /// 前フレームで手を検出できていたか。検出中は tracking_confidence を使う。
    tracking: bool,
}

impl HandDetector {
    /// ONNXモデルを読み込んで初期化
    pub fn new<P: AsRef<Path>>(
        model_path: P,
        detection_confidence: f32,
        tracking_confidence: f32,
    ) -> Result<Self> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(model_path.as_ref())
            .context("Failed to load ONNX model")?;

        Ok(Self {
            session,
            detection_confidence,
            tracking_confidence,
            tracking: false,
        })
    }

    /// 前処理済みテンソルから手を検出
    ///
    /// 入力: [1, 224, 224, 3] の f32 テンソル
    /// 出力:
    ///   - Identity:   [1, 63]  ランドマーク (x, y, z を入力ピクセル単位で21個)
    ///   - Identity_1: [1, 1]   手の存在スコア
    ///   - Identity_2: [1, 1]   右手スコア
    pub fn detect(&mut self, input: Array4<f32>) -> Result<DetectionResult> {
        let input_tensor = Tensor::from_array(input)?;
        let outputs = self
            .session
            .run(ort::inputs!["input_1" => input_tensor])
            .context("Inference failed")?;

        let presence: ndarray::ArrayViewD<f32> = outputs["Identity_1"]
            .try_extract_array()
            .context("Failed to extract presence score")?;
        let score = presence[[0, 0]];

        let threshold = if self.tracking {
            self.tracking_confidence
        } else {
            self.detection_confidence
        };

        if score < threshold {
            self.tracking = false;
            return Ok(DetectionResult::empty());
        }
        self.tracking = true;

        let raw: ndarray::ArrayViewD<f32> = outputs["Identity"]
            .try_extract_array()
            .context("Failed to extract landmark tensor")?;

        let scale = HAND_INPUT_SIZE as f32;
        let mut landmarks = [Landmark::default(); HandLandmarkIndex::COUNT];
        for i in 0..HandLandmarkIndex::COUNT {
            let x = raw[[0, i * 3]] / scale;
            let y = raw[[0, i * 3 + 1]] / scale;
            let z = raw[[0, i * 3 + 2]] / scale;
            landmarks[i] = Landmark::new(x, y, z);
        }

        let handedness_score: ndarray::ArrayViewD<f32> = outputs["Identity_2"]
            .try_extract_array()
            .context("Failed to extract handedness score")?;
        let handedness = Handedness::from_score(handedness_score[[0, 0]]);

        Ok(DetectionResult {
            hands: vec![DetectedHand {
                landmarks: HandLandmarks::new(landmarks),
                handedness,
            }],
        })
    }
}
