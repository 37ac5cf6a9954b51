/// Ephemeral state for the single active browser session.
///
/// Two fields, per the demo's scope: the most recently submitted image and
/// the most recent predicted label. Created empty at startup, overwritten on
/// each submission, never cleared — it lives exactly as long as the process.
#[derive(Debug, Default)]
pub struct SessionContext {
    image: Option<Vec<u8>>,
    last_prediction: Option<String>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new submission, replacing whatever came before it
    pub fn record_submission(&mut self, image: Vec<u8>, predicted_label: String) {
        self.image = Some(image);
        self.last_prediction = Some(predicted_label);
    }

    pub fn image(&self) -> Option<&[u8]> {
        self.image.as_deref()
    }

    pub fn last_prediction(&self) -> Option<&str> {
        self.last_prediction.as_deref()
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let session = SessionContext::new();
        assert!(!session.has_image());
        assert!(session.last_prediction().is_none());
    }

    #[test]
    fn test_submissions_overwrite() {
        let mut session = SessionContext::new();
        session.record_submission(vec![1, 2, 3], "cat".to_string());
        assert_eq!(session.image(), Some(&[1u8, 2, 3][..]));
        assert_eq!(session.last_prediction(), Some("cat"));

        session.record_submission(vec![4], "dog".to_string());
        assert_eq!(session.image(), Some(&[4u8][..]));
        assert_eq!(session.last_prediction(), Some("dog"));
    }
}
