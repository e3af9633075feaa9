use crate::controller::RecognitionController;
use crate::presentation::AnimationTicker;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The single player/recognition controller
    pub controller: Arc<RecognitionController>,

    /// Cosmetic animation, absent when not running
    pub animation: Option<Arc<AnimationTicker>>,
}

impl AppState {
    pub fn new(controller: Arc<RecognitionController>) -> Self {
        Self {
            controller,
            animation: None,
        }
    }

    pub fn with_animation(mut self, animation: Arc<AnimationTicker>) -> Self {
        self.animation = Some(animation);
        self
    }
}
