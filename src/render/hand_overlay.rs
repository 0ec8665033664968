use crate::gesture::GestureRecord;
use crate::hand::HandLandmarkIndex;

/// 手の骨格の接続定義 (開始ランドマーク, 終了ランドマーク)
pub const HAND_CONNECTIONS: [(HandLandmarkIndex, HandLandmarkIndex); 21] = [
    // 親指
    (HandLandmarkIndex::Wrist, HandLandmarkIndex::ThumbCmc),
    (HandLandmarkIndex::ThumbCmc, HandLandmarkIndex::ThumbMcp),
    (HandLandmarkIndex::ThumbMcp, HandLandmarkIndex::ThumbIp),
    (HandLandmarkIndex::ThumbIp, HandLandmarkIndex::ThumbTip),
    // 人差し指
    (HandLandmarkIndex::Wrist, HandLandmarkIndex::IndexFingerMcp),
    (HandLandmarkIndex::IndexFingerMcp, HandLandmarkIndex::IndexFingerPip),
    (HandLandmarkIndex::IndexFingerPip, HandLandmarkIndex::IndexFingerDip),
    (HandLandmarkIndex::IndexFingerDip, HandLandmarkIndex::IndexFingerTip),
    // 中指
    (HandLandmarkIndex::IndexFingerMcp, HandLandmarkIndex::MiddleFingerMcp),
    (HandLandmarkIndex::MiddleFingerMcp, HandLandmarkIndex::MiddleFingerPip),
    (HandLandmarkIndex::MiddleFingerPip, HandLandmarkIndex::MiddleFingerDip),
    (HandLandmarkIndex::MiddleFingerDip, HandLandmarkIndex::MiddleFingerTip),
    // 薬指
    (HandLandmarkIndex::MiddleFingerMcp, HandLandmarkIndex::RingFingerMcp),
    (HandLandmarkIndex::RingFingerMcp, HandLandmarkIndex::RingFingerPip),
    (HandLandmarkIndex::RingFingerPip, HandLandmarkIndex::RingFingerDip),
    (HandLandmarkIndex::RingFingerDip, HandLandmarkIndex::RingFingerTip),
    // 小指
    (HandLandmarkIndex::RingFingerMcp, HandLandmarkIndex::PinkyMcp),
    (HandLandmarkIndex::Wrist, HandLandmarkIndex::PinkyMcp),
    (HandLandmarkIndex::PinkyMcp, HandLandmarkIndex::PinkyPip),
    (HandLandmarkIndex::PinkyPip, HandLandmarkIndex::PinkyDip),
    (HandLandmarkIndex::PinkyDip, HandLandmarkIndex::PinkyTip),
];

/// ランドマークの色 (RGB)
pub const LANDMARK_COLOR: u32 = 0x00FF00; // 緑

/// 骨格線の色 (RGB)
pub const SKELETON_COLOR: u32 = 0xFFFF00; // 黄色

/// 指先マーカーの外周リングの色 (RGB)
pub const FINGERTIP_RING_COLOR: u32 = 0xFFFFFF; // 白

/// ジェスチャー状態に応じた指先マーカーの色
///
/// 通常は緑、握り拳は赤、高速移動は黄色。
pub fn fingertip_color(record: &GestureRecord) -> u32 {
    if record.closed_fist {
        0xFF0000
    } else if record.fast_movement {
        0xFFFF00
    } else {
        0x00FF00
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingertip_color_by_state() {
        let mut record = GestureRecord::hidden();
        assert_eq!(fingertip_color(&record), 0x00FF00);

        record.fast_movement = true;
        assert_eq!(fingertip_color(&record), 0xFFFF00);

        // 握り拳が高速移動より優先
        record.closed_fist = true;
        assert_eq!(fingertip_color(&record), 0xFF0000);
    }
}
