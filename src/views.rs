use crate::error::{AdError, Result};
use crate::models::{
    CompanionCreative, CreativeContent, InteractionPayload, InteractionSource, VideoConfig,
};
use crate::viewability::ObstructionKind;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

bitflags::bitflags! {
    /// Per-view flags controlling rendering and touch handling.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ViewFlags: u8 {
        /// View is drawn.
        const VISIBLE     = 0b0000_0001;
        /// View receives touches.
        const INTERACTIVE = 0b0000_0010;
    }
}

impl Default for ViewFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::INTERACTIVE
    }
}

/// One layer of the container's fixed z-order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Bottom: the web/image base creative
    BaseCreative,

    /// Middle: the video player
    VideoPlayer,

    /// Middle: the companion end card
    Companion,

    /// Middle: the blur applied over the final video frame
    Blur,

    /// Top: skip/close/progress chrome
    Overlay,
}

/// Fixed-order layer stack for one creative presentation
///
/// The order is set at construction and only `bring_to_front` may touch it,
/// which the container uses solely to re-assert the overlay after visibility
/// toggles. Index 0 is the back; the last index is the front.
#[derive(Debug, Clone)]
pub struct ViewStack {
    order: Vec<Layer>,
}

impl ViewStack {
    pub fn new() -> Self {
        Self {
            order: vec![
                Layer::BaseCreative,
                Layer::VideoPlayer,
                Layer::Companion,
                Layer::Blur,
                Layer::Overlay,
            ],
        }
    }

    /// Back-to-front layer order
    pub fn order(&self) -> &[Layer] {
        &self.order
    }

    /// The front-most layer
    pub fn front(&self) -> Layer {
        *self.order.last().unwrap_or(&Layer::Overlay)
    }

    /// Move a layer to the front, preserving the relative order of the rest
    pub fn bring_to_front(&mut self, layer: Layer) {
        self.order.retain(|l| *l != layer);
        self.order.push(layer);
    }
}

impl Default for ViewStack {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders the base web or image creative at the bottom of the stack
#[derive(Debug)]
pub struct CreativeView {
    content: CreativeContent,
    flags: ViewFlags,
}

impl CreativeView {
    /// Create the base creative view; empty content is a construction failure
    pub fn new(content: CreativeContent) -> Result<Self> {
        if content.is_empty() {
            return Err(AdError::MissingAsset("base creative content".to_string()));
        }
        Ok(Self {
            content,
            flags: ViewFlags::default(),
        })
    }

    pub fn content(&self) -> &CreativeContent {
        &self.content
    }

    pub fn is_visible(&self) -> bool {
        self.flags.contains(ViewFlags::VISIBLE)
    }

    /// A tap inside the creative; the payload is creative-defined
    pub fn interact(&self, extra: Option<serde_json::Value>) -> InteractionPayload {
        InteractionPayload {
            source: InteractionSource::BaseCreative,
            click_through: None,
            extra,
        }
    }
}

/// Renders and controls playback of one video asset
///
/// Created lazily, only when the presentation has a `VideoConfig`. Completion
/// is latched so the finished event is observable at most once, and a hidden
/// player never reports completion again.
#[derive(Debug)]
pub struct VideoPlayerView {
    config: Arc<VideoConfig>,
    flags: ViewFlags,
    finished: bool,
}

impl VideoPlayerView {
    /// Create the player hidden; the container shows it when playback starts
    pub fn new(config: Arc<VideoConfig>) -> Self {
        Self {
            config,
            flags: ViewFlags::empty(),
            finished: false,
        }
    }

    pub fn config(&self) -> &VideoConfig {
        &self.config
    }

    pub fn show(&mut self) {
        self.flags = ViewFlags::default();
    }

    pub fn hide(&mut self) {
        self.flags = ViewFlags::empty();
    }

    pub fn is_visible(&self) -> bool {
        self.flags.contains(ViewFlags::VISIBLE)
    }

    /// Latch playback completion; returns true only on the first call
    pub fn mark_finished(&mut self) -> bool {
        if self.finished {
            return false;
        }
        self.finished = true;
        true
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Renders the static companion end card after video playback
#[derive(Debug)]
pub struct CompanionAdView {
    creative: CompanionCreative,
    flags: ViewFlags,
}

impl CompanionAdView {
    /// Create the companion hidden; shown at video completion
    pub fn new(creative: CompanionCreative) -> Self {
        Self {
            creative,
            flags: ViewFlags::empty(),
        }
    }

    pub fn creative(&self) -> &CompanionCreative {
        &self.creative
    }

    pub fn show(&mut self) {
        self.flags = ViewFlags::default();
    }

    pub fn hide(&mut self) {
        self.flags = ViewFlags::empty();
    }

    pub fn is_visible(&self) -> bool {
        self.flags.contains(ViewFlags::VISIBLE)
    }

    /// A tap on the companion; forwards the creative's click-through
    pub fn click(&self) -> InteractionPayload {
        InteractionPayload {
            source: InteractionSource::Companion,
            click_through: self.creative.click_through.clone(),
            extra: None,
        }
    }
}

/// Blur effect drawn over the last video frame when no companion exists
///
/// This is a friendly obstruction: while visible it must hold a registration
/// with the viewability tracker. Allocated eagerly at container construction
/// so the completion transition never waits on view allocation.
#[derive(Debug)]
pub struct BlurEffectView {
    flags: ViewFlags,
}

impl BlurEffectView {
    /// Create the blur hidden; the blur never receives touches
    pub fn new() -> Self {
        Self {
            flags: ViewFlags::empty(),
        }
    }

    pub fn obstruction_kind(&self) -> ObstructionKind {
        ObstructionKind::BlurEffect
    }

    pub fn show(&mut self) {
        self.flags = ViewFlags::VISIBLE;
    }

    pub fn hide(&mut self) {
        self.flags = ViewFlags::empty();
    }

    pub fn is_visible(&self) -> bool {
        self.flags.contains(ViewFlags::VISIBLE)
    }
}

impl Default for BlurEffectView {
    fn default() -> Self {
        Self::new()
    }
}

/// Control events emitted by the overlay chrome
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
pub enum OverlayEvent {
    /// The skip control was tapped
    Skip,

    /// The close control was tapped
    Close,

    /// Playback progress advanced to the given second
    ProgressTick(f64),
}

/// Always-on-top interactive chrome: skip, close and progress controls
#[derive(Debug)]
pub struct AdOverlay {
    flags: ViewFlags,
    skip_enabled: bool,
}

impl AdOverlay {
    /// Create the overlay visible and interactive, with skipping disabled
    pub fn new() -> Self {
        Self {
            flags: ViewFlags::default(),
            skip_enabled: false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.flags.contains(ViewFlags::VISIBLE)
    }

    pub fn hide(&mut self) {
        self.flags = ViewFlags::empty();
    }

    /// Whether the skip control currently accepts taps
    pub fn is_skip_enabled(&self) -> bool {
        self.skip_enabled
    }

    pub fn set_skip_enabled(&mut self, enabled: bool) {
        self.skip_enabled = enabled;
    }
}

impl Default for AdOverlay {
    fn default() -> Self {
        Self::new()
    }
}
