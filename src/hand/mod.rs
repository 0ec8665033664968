pub mod detector;
pub mod landmark;
pub mod preprocess;

pub use detector::HandDetector;
pub use landmark::{
    DetectedHand, DetectionResult, HandLandmarkIndex, HandLandmarks, Handedness, Landmark,
};
pub use preprocess::{preprocess_for_hand_landmark, HAND_INPUT_SIZE};
