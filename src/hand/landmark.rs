/// MediaPipe Hands 形式の 21 ランドマークインデックス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum HandLandmarkIndex {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexFingerMcp = 5,
    IndexFingerPip = 6,
    IndexFingerDip = 7,
    IndexFingerTip = 8,
    MiddleFingerMcp = 9,
    MiddleFingerPip = 10,
    MiddleFingerDip = 11,
    MiddleFingerTip = 12,
    RingFingerMcp = 13,
    RingFingerPip = 14,
    RingFingerDip = 15,
    RingFingerTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl HandLandmarkIndex {
    pub const COUNT: usize = 21;

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Wrist),
            1 => Some(Self::ThumbCmc),
            2 => Some(Self::ThumbMcp),
            3 => Some(Self::ThumbIp),
            4 => Some(Self::ThumbTip),
            5 => Some(Self::IndexFingerMcp),
            6 => Some(Self::IndexFingerPip),
            7 => Some(Self::IndexFingerDip),
            8 => Some(Self::IndexFingerTip),
            9 => Some(Self::MiddleFingerMcp),
            10 => Some(Self::MiddleFingerPip),
            11 => Some(Self::MiddleFingerDip),
            12 => Some(Self::MiddleFingerTip),
            13 => Some(Self::RingFingerMcp),
            14 => Some(Self::RingFingerPip),
            15 => Some(Self::RingFingerDip),
            16 => Some(Self::RingFingerTip),
            17 => Some(Self::PinkyMcp),
            18 => Some(Self::PinkyPip),
            19 => Some(Self::PinkyDip),
            20 => Some(Self::PinkyTip),
            _ => None,
        }
    }
}

/// 単一ランドマーク
///
/// x, y はフレーム幅・高さに対する正規化座標 (0.0〜1.0)。
/// z はカメラ相対の深度（手首付近が0、カメラに近いほど負）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// ピクセル座標に変換
    pub fn to_pixel(&self, width: u32, height: u32) -> (i32, i32) {
        let px = (self.x * width as f32) as i32;
        let py = (self.y * height as f32) as i32;
        (px, py)
    }
}

impl Default for Landmark {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }
}

/// 左右の分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    /// 分類スコアから判定。スコアは右手である確率。
    pub fn from_score(score: f32) -> Self {
        if score >= 0.5 {
            Self::Right
        } else {
            Self::Left
        }
    }
}

/// 21ランドマークからなる片手の骨格
#[derive(Debug, Clone)]
pub struct HandLandmarks {
    pub landmarks: [Landmark; HandLandmarkIndex::COUNT],
}

impl HandLandmarks {
    pub fn new(landmarks: [Landmark; HandLandmarkIndex::COUNT]) -> Self {
        Self { landmarks }
    }

    /// インデックスでランドマークを取得
    pub fn get(&self, index: HandLandmarkIndex) -> &Landmark {
        &self.landmarks[index as usize]
    }
}

impl Default for HandLandmarks {
    fn default() -> Self {
        Self {
            landmarks: [Landmark::default(); HandLandmarkIndex::COUNT],
        }
    }
}

/// 検出された手（骨格 + 左右分類）
#[derive(Debug, Clone)]
pub struct DetectedHand {
    pub landmarks: HandLandmarks,
    pub handedness: Handedness,
}

/// 1フレーム分の検出結果。手が見つからない場合は空。
///
/// モデルは単一の手だけを追跡する設定なので、実運用では要素数は0か1。
#[derive(Debug, Clone, Default)]
pub struct DetectionResult {
    pub hands: Vec<DetectedHand>,
}

impl DetectionResult {
    pub fn empty() -> Self {
        Self { hands: Vec::new() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmark_index_count() {
        assert_eq!(HandLandmarkIndex::COUNT, 21);
    }

    #[test]
    fn test_landmark_index_from_index() {
        assert_eq!(HandLandmarkIndex::from_index(0), Some(HandLandmarkIndex::Wrist));
        assert_eq!(
            HandLandmarkIndex::from_index(8),
            Some(HandLandmarkIndex::IndexFingerTip)
        );
        assert_eq!(HandLandmarkIndex::from_index(20), Some(HandLandmarkIndex::PinkyTip));
        assert_eq!(HandLandmarkIndex::from_index(21), None);
    }

    #[test]
    fn test_landmark_to_pixel() {
        let lm = Landmark::new(0.5, 0.25, -0.1);
        let (px, py) = lm.to_pixel(640, 480);
        assert_eq!(px, 320);
        assert_eq!(py, 120);
    }

    #[test]
    fn test_handedness_from_score() {
        assert_eq!(Handedness::from_score(0.9), Handedness::Right);
        assert_eq!(Handedness::from_score(0.5), Handedness::Right);
        assert_eq!(Handedness::from_score(0.1), Handedness::Left);
    }

    #[test]
    fn test_hand_landmarks_get() {
        let mut landmarks = [Landmark::default(); HandLandmarkIndex::COUNT];
        landmarks[HandLandmarkIndex::IndexFingerTip as usize] = Landmark::new(0.4, 0.3, -0.05);

        let hand = HandLandmarks::new(landmarks);
        let tip = hand.get(HandLandmarkIndex::IndexFingerTip);
        assert_eq!(tip.x, 0.4);
        assert_eq!(tip.y, 0.3);
        assert_eq!(tip.z, -0.05);
    }

    #[test]
    fn test_detection_result_empty() {
        let result = DetectionResult::empty();
        assert!(result.hands.is_empty());
    }
}
