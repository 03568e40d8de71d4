use crate::model::BoundingBox;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningCode {
    NoTableDetected,
    RegionRecognitionFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractWarning {
    pub code: WarningCode,
    pub message: String,
    pub position: Option<BoundingBox>,
}

impl ExtractWarning {
    #[must_use]
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            position: None,
        }
    }

    #[must_use]
    pub fn with_position(mut self, position: BoundingBox) -> Self {
        self.position = Some(position);
        self
    }
}
