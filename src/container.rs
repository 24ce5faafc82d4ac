use crate::error::{AdError, Result};
use crate::models::{CompanionCreative, CreativeContent, InteractionPayload, VideoConfig};
use crate::viewability::{RegistrationHandle, ViewabilityTracker};
use crate::views::{
    AdOverlay, BlurEffectView, CompanionAdView, CreativeView, Layer, OverlayEvent, VideoPlayerView,
    ViewStack,
};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Lifecycle state of one creative presentation
///
/// Transitions are one-directional; `Dismissed` is terminal and reachable
/// from every other state.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub enum AdContainerState {
    /// Constructed, nothing played yet
    Initial,

    /// The video player is on screen and playing
    PlayingVideo,

    /// Playback finished and the blur obstruction covers the last frame
    VideoFinishedNoCompanion,

    /// Playback finished and the companion end card is on screen
    VideoFinishedWithCompanion,

    /// Terminal; all child views released
    Dismissed,
}

impl AdContainerState {
    fn name(self) -> &'static str {
        match self {
            Self::Initial => "Initial",
            Self::PlayingVideo => "PlayingVideo",
            Self::VideoFinishedNoCompanion => "VideoFinishedNoCompanion",
            Self::VideoFinishedWithCompanion => "VideoFinishedWithCompanion",
            Self::Dismissed => "Dismissed",
        }
    }

    /// Whether the presentation has ended
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Dismissed)
    }
}

/// Host-side observer of container lifecycle and user interactions
///
/// All callbacks arrive on the thread driving the container; payloads are
/// forwarded unmodified.
pub trait AdContainerObserver {
    fn on_state_changed(&mut self, _state: AdContainerState) {}
    fn on_user_interaction(&mut self, _payload: InteractionPayload) {}
    fn on_dismissed(&mut self) {}
}

/// Owns the full child-view stack for one creative presentation and
/// arbitrates which layer is visible in each lifecycle phase
///
/// Z-order is fixed at construction (base creative < video/companion/blur <
/// overlay) and the overlay is re-asserted to the front after every
/// visibility toggle so it keeps touch priority.
///
/// The blur view is allocated eagerly even though it is only shown in
/// `VideoFinishedNoCompanion`: pre-allocating the transition-critical view
/// trades a small constant memory cost for a smooth completion transition.
pub struct AdContainer {
    state: AdContainerState,
    is_video_finished: bool,
    stack: ViewStack,
    creative_view: Option<CreativeView>,
    video_player_view: Option<VideoPlayerView>,
    companion_ad_view: Option<CompanionAdView>,
    blur_effect_view: Option<BlurEffectView>,
    overlay: Option<AdOverlay>,
    blur_registration: Option<RegistrationHandle>,
    video_config: Option<Arc<VideoConfig>>,
    observer: Box<dyn AdContainerObserver>,
    tracker: Box<dyn ViewabilityTracker>,
}

impl AdContainer {
    /// Construct a container for one decoded creative
    ///
    /// The base creative is mandatory; an empty one fails with
    /// [`AdError::MissingAsset`] and the container must not be displayed.
    /// The video player view exists iff `video_config` is given; companion
    /// presence is fixed here and never changes at runtime.
    pub fn new(
        content: CreativeContent,
        video_config: Option<VideoConfig>,
        companion: Option<CompanionCreative>,
        observer: Box<dyn AdContainerObserver>,
        tracker: Box<dyn ViewabilityTracker>,
    ) -> Result<Self> {
        let creative_view = CreativeView::new(content)?;
        let video_config = video_config.map(Arc::new);
        let video_player_view = video_config.as_ref().map(|c| VideoPlayerView::new(c.clone()));
        let companion_ad_view = companion.map(CompanionAdView::new);

        Ok(Self {
            state: AdContainerState::Initial,
            is_video_finished: false,
            stack: ViewStack::new(),
            creative_view: Some(creative_view),
            video_player_view,
            companion_ad_view,
            blur_effect_view: Some(BlurEffectView::new()),
            overlay: Some(AdOverlay::new()),
            blur_registration: None,
            video_config,
            observer,
            tracker,
        })
    }

    /// Current lifecycle state
    pub fn state(&self) -> AdContainerState {
        self.state
    }

    /// False exactly while the state is `Initial` or `PlayingVideo`
    pub fn is_video_finished(&self) -> bool {
        self.is_video_finished
    }

    /// The front-most layer of the fixed z-order
    pub fn front_layer(&self) -> Layer {
        self.stack.front()
    }

    /// Layers currently visible, back to front
    pub fn visible_layers(&self) -> Vec<Layer> {
        self.stack
            .order()
            .iter()
            .copied()
            .filter(|layer| self.is_layer_visible(*layer))
            .collect()
    }

    fn is_layer_visible(&self, layer: Layer) -> bool {
        match layer {
            Layer::BaseCreative => self.creative_view.as_ref().is_some_and(|v| v.is_visible()),
            Layer::VideoPlayer => self
                .video_player_view
                .as_ref()
                .is_some_and(|v| v.is_visible()),
            Layer::Companion => self
                .companion_ad_view
                .as_ref()
                .is_some_and(|v| v.is_visible()),
            Layer::Blur => self.blur_effect_view.as_ref().is_some_and(|v| v.is_visible()),
            Layer::Overlay => self.overlay.as_ref().is_some_and(|v| v.is_visible()),
        }
    }

    /// Playback started; valid only from `Initial` with a configured video
    pub fn on_video_playback_started(&mut self) {
        let has_player = self.video_player_view.is_some();
        if self.state != AdContainerState::Initial || !has_player {
            self.reject("on_video_playback_started");
            return;
        }
        if let Some(player) = self.video_player_view.as_mut() {
            player.show();
        }
        self.set_state(AdContainerState::PlayingVideo);
    }

    /// Playback completed; valid only from `PlayingVideo`
    ///
    /// Hides the video player and shows the companion if one was configured,
    /// otherwise the blur obstruction. The companion always wins over blur.
    pub fn on_video_playback_finished(&mut self) {
        if self.state != AdContainerState::PlayingVideo {
            self.reject("on_video_playback_finished");
            return;
        }

        if let Some(player) = self.video_player_view.as_mut() {
            player.mark_finished();
            player.hide();
        }
        self.is_video_finished = true;

        let next = if self.companion_ad_view.is_some() {
            if let Some(companion) = self.companion_ad_view.as_mut() {
                companion.show();
            }
            AdContainerState::VideoFinishedWithCompanion
        } else {
            if let Some(blur) = self.blur_effect_view.as_mut() {
                blur.show();
            }
            self.register_blur_obstruction();
            AdContainerState::VideoFinishedNoCompanion
        };
        self.set_state(next);
    }

    /// Dismiss the presentation; valid from any state and idempotent
    ///
    /// This is also the cancellation path: it deterministically releases the
    /// player, deregisters any active obstruction and drops all child views.
    pub fn on_dismiss(&mut self) {
        if self.state.is_terminal() {
            debug!("on_dismiss ignored, already dismissed");
            return;
        }

        if let Some(handle) = self.blur_registration.take() {
            self.tracker.unregister(handle);
        }
        self.creative_view = None;
        self.video_player_view = None;
        self.companion_ad_view = None;
        self.blur_effect_view = None;
        self.overlay = None;

        self.state = AdContainerState::Dismissed;
        debug!("state -> {}", self.state.name());
        self.observer.on_state_changed(self.state);
        self.observer.on_dismissed();
    }

    /// Handle a control event from the overlay chrome
    ///
    /// Skip and close both route to the dismiss path; the tapped control is
    /// forwarded upward first so hosts can distinguish them. Progress ticks
    /// only drive skip-control availability.
    pub fn on_overlay_event(&mut self, event: OverlayEvent) {
        if self.state.is_terminal() {
            self.reject("on_overlay_event");
            return;
        }
        match event {
            OverlayEvent::ProgressTick(elapsed) => {
                let skippable = match self.video_config.as_ref().and_then(|c| c.skip_offset) {
                    Some(offset) => elapsed >= offset,
                    None => true,
                };
                if let Some(overlay) = self.overlay.as_mut() {
                    overlay.set_skip_enabled(skippable);
                }
            }
            OverlayEvent::Skip => {
                let enabled = self.overlay.as_ref().is_some_and(|o| o.is_skip_enabled());
                if !enabled {
                    debug!("skip tapped before skip offset, ignored");
                    return;
                }
                self.forward_overlay_interaction(event);
                self.on_dismiss();
            }
            OverlayEvent::Close => {
                self.forward_overlay_interaction(event);
                self.on_dismiss();
            }
        }
    }

    /// Handle a tap on the companion end card
    pub fn on_companion_click(&mut self) {
        let payload = match self.companion_ad_view.as_ref() {
            Some(view) if view.is_visible() => view.click(),
            _ => {
                self.reject("on_companion_click");
                return;
            }
        };
        self.observer.on_user_interaction(payload);
    }

    /// Handle a tap inside the base creative; `extra` is creative-defined
    pub fn on_creative_interaction(&mut self, extra: Option<serde_json::Value>) {
        let payload = match self.creative_view.as_ref() {
            Some(view) if view.is_visible() => view.interact(extra),
            _ => {
                self.reject("on_creative_interaction");
                return;
            }
        };
        self.observer.on_user_interaction(payload);
    }

    fn forward_overlay_interaction(&mut self, event: OverlayEvent) {
        let payload = InteractionPayload {
            source: crate::models::InteractionSource::Overlay,
            click_through: None,
            extra: serde_json::to_value(event).ok(),
        };
        self.observer.on_user_interaction(payload);
    }

    fn register_blur_obstruction(&mut self) {
        let kind = match self.blur_effect_view.as_ref() {
            Some(blur) => blur.obstruction_kind(),
            None => return,
        };
        match self.tracker.register(kind) {
            Ok(handle) => self.blur_registration = Some(handle),
            Err(e) => {
                // The ad still renders; viewability under-reports.
                warn!("degraded viewability: {}", e);
            }
        }
    }

    fn set_state(&mut self, next: AdContainerState) {
        self.state = next;
        // Overlay keeps touch priority across every visibility toggle.
        self.stack.bring_to_front(Layer::Overlay);
        debug!("state -> {}", next.name());
        self.observer.on_state_changed(next);
    }

    fn reject(&self, event: &'static str) {
        let err = AdError::InvalidTransition {
            from: self.state.name(),
            event,
        };
        warn!("{}", err);
    }
}

impl Drop for AdContainer {
    fn drop(&mut self) {
        // Navigation away without an explicit dismiss must still release the
        // obstruction registration.
        if let Some(handle) = self.blur_registration.take() {
            self.tracker.unregister(handle);
        }
    }
}

impl std::fmt::Debug for AdContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdContainer")
            .field("state", &self.state)
            .field("is_video_finished", &self.is_video_finished)
            .field("has_video", &self.video_player_view.is_some())
            .field("has_companion", &self.companion_ad_view.is_some())
            .field("blur_registered", &self.blur_registration.is_some())
            .finish_non_exhaustive()
    }
}
