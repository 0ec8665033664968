use serde::{Deserialize, Serialize};

use crate::hand::{DetectionResult, HandLandmarkIndex, HandLandmarks, Handedness};

/// 指先の移動距離がこれを超えたら fast 扱い（正規化座標での3次元距離）
pub const FAST_MOVEMENT_THRESHOLD: f32 = 0.15;

/// 指が曲がっていると判定する閾値。
/// tip.y - mcp.y がこれより大きい（= 指先が関節より有意に上にない）場合は曲がっている。
/// 画像のy軸は下向きなので注意。
pub const CURL_THRESHOLD: f32 = -0.05;

/// 曲がり判定に使う4本の指 (先端, 付け根MCP)。親指は含めない。
const CURL_FINGERS: [(HandLandmarkIndex, HandLandmarkIndex); 4] = [
    (HandLandmarkIndex::IndexFingerTip, HandLandmarkIndex::IndexFingerMcp),
    (HandLandmarkIndex::MiddleFingerTip, HandLandmarkIndex::MiddleFingerMcp),
    (HandLandmarkIndex::RingFingerTip, HandLandmarkIndex::RingFingerMcp),
    (HandLandmarkIndex::PinkyTip, HandLandmarkIndex::PinkyMcp),
];

fn is_false(b: &bool) -> bool {
    !*b
}

/// ワイヤーフォーマット用に小数3桁へ丸める
fn round3(v: f32) -> f32 {
    (v * 1000.0).round() / 1000.0
}

/// 1フレーム分のジェスチャー信号
///
/// 1行1オブジェクトのJSONとしてそのまま送信される。
/// `f` は常に false で常に送るフィールド、`fast` は true のときだけ送る
/// フィールドで、受信側の互換性のため両方を観測された形のまま維持する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureRecord {
    /// 人差し指先端の正規化X座標。右手が見えないフレームでは null
    pub x: Option<f32>,
    /// 人差し指先端の正規化Y座標
    pub y: Option<f32>,
    /// 人差し指先端の深度
    pub z: Option<f32>,
    /// 右手が見えているか
    #[serde(rename = "h")]
    pub visible: bool,
    /// 握り拳ヒューリスティックの結果
    #[serde(rename = "c")]
    pub closed_fist: bool,
    /// 予約フィールド。常に false
    #[serde(rename = "f")]
    pub reserved: bool,
    /// 前フレームからの移動が閾値を超えたか。true のときだけシリアライズされる
    #[serde(rename = "fast", default, skip_serializing_if = "is_false")]
    pub fast_movement: bool,
}

impl GestureRecord {
    /// 右手が見えないフレーム用のレコード
    pub fn hidden() -> Self {
        Self {
            x: None,
            y: None,
            z: None,
            visible: false,
            closed_fist: false,
            reserved: false,
            fast_movement: false,
        }
    }

    /// 指先座標。不可視レコードでは None
    pub fn fingertip(&self) -> Option<[f32; 3]> {
        match (self.x, self.y, self.z) {
            (Some(x), Some(y), Some(z)) => Some([x, y, z]),
            _ => None,
        }
    }
}

fn euclidean_distance(a: [f32; 3], b: [f32; 3]) -> f32 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// 4本の指がすべて曲がっているか（握り拳ヒューリスティック）
///
/// 指先が付け根(MCP)より有意に上にあるかどうかのy座標比較だけで判定する。
/// 手が傾いていると誤検出しうるが、用途上は十分。
fn is_closed_fist(landmarks: &HandLandmarks) -> bool {
    CURL_FINGERS.iter().all(|(tip_idx, mcp_idx)| {
        let tip = landmarks.get(*tip_idx);
        let mcp = landmarks.get(*mcp_idx);
        tip.y - mcp.y > CURL_THRESHOLD
    })
}

/// 検出結果からジェスチャーレコードを導出する
///
/// 直前の可視レコード1つだけを保持し、速度推定の参照点に使う。
/// 右手が見えないフレームでは保持値を更新しない（元実装の挙動を維持）。
pub struct GestureExtractor {
    last: Option<GestureRecord>,
}

impl GestureExtractor {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// 保持中の「前回位置」レコード
    pub fn last(&self) -> Option<&GestureRecord> {
        self.last.as_ref()
    }

    /// 1フレーム分の検出結果をジェスチャーレコードに変換
    pub fn extract(&mut self, result: &DetectionResult) -> GestureRecord {
        let hand = match result
            .hands
            .iter()
            .find(|h| h.handedness == Handedness::Right)
        {
            Some(hand) => hand,
            None => return GestureRecord::hidden(),
        };

        let tip = hand.landmarks.get(HandLandmarkIndex::IndexFingerTip);
        let mut record = GestureRecord {
            x: Some(round3(tip.x)),
            y: Some(round3(tip.y)),
            z: Some(round3(tip.z)),
            visible: true,
            closed_fist: is_closed_fist(&hand.landmarks),
            reserved: false,
            fast_movement: false,
        };

        // 丸め後の座標同士で距離をとる（送信値と一致させる）
        if let Some(prev) = self.last.as_ref().and_then(|r| r.fingertip()) {
            if let Some(cur) = record.fingertip() {
                if euclidean_distance(cur, prev) > FAST_MOVEMENT_THRESHOLD {
                    record.fast_movement = true;
                }
            }
        }

        self.last = Some(record.clone());
        record
    }
}

impl Default for GestureExtractor {
    fn default() -> Self {
        Self::new()
    }
}
