use crate::error::Result;
use serde::{Deserialize, Serialize};
use url::Url;

/// Represents the base creative content rendered at the bottom of the ad stack
///
/// Every presentation has exactly one base creative. Video and companion
/// layers are composed above it.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub enum CreativeContent {
    /// An HTML creative rendered in a web view
    Html {
        /// The creative markup
        markup: String,
    },

    /// A static image creative
    Image {
        /// The image asset URL
        url: String,
    },
}

impl CreativeContent {
    /// Whether the content carries no renderable data
    pub fn is_empty(&self) -> bool {
        match self {
            CreativeContent::Html { markup } => markup.trim().is_empty(),
            CreativeContent::Image { url } => url.trim().is_empty(),
        }
    }
}

/// Represents the decoded configuration of a single video asset
///
/// Produced by an external VAST decoder; immutable for the lifetime of the
/// presentation. The container and the video player view share it by
/// reference count.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct VideoConfig {
    /// The video asset URL
    pub asset_url: String,

    /// The expected duration in seconds, if the decoder provided one
    pub duration: Option<f64>,

    /// Seconds of playback before the skip control becomes available
    pub skip_offset: Option<f64>,

    /// The click-through URL opened when the video is tapped
    pub click_through: Option<String>,

    /// Whether an end card must be shown after playback completes
    pub end_card_required: bool,
}

impl VideoConfig {
    /// Create a video configuration, validating all URLs up front
    ///
    /// `end_card_required` has no implicit default; callers state it.
    pub fn new(
        asset_url: impl Into<String>,
        duration: Option<f64>,
        skip_offset: Option<f64>,
        click_through: Option<String>,
        end_card_required: bool,
    ) -> Result<Self> {
        let asset_url = asset_url.into();
        Url::parse(&asset_url)?;
        if let Some(ref url) = click_through {
            Url::parse(url)?;
        }
        Ok(Self {
            asset_url,
            duration,
            skip_offset,
            click_through,
            end_card_required,
        })
    }
}

/// Represents the renderable resource of a companion end card
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub enum CompanionResource {
    /// A static image resource URL
    StaticImage(String),

    /// Raw HTML markup
    Html(String),
}

/// Represents a companion ad: the static end card shown after video playback
///
/// Zero or one per presentation, fixed at construction time.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct CompanionCreative {
    /// The companion resource
    pub resource: CompanionResource,

    /// The companion width in points
    pub width: u32,

    /// The companion height in points
    pub height: u32,

    /// The click-through URL opened when the companion is tapped
    pub click_through: Option<String>,
}

impl CompanionCreative {
    /// Create a companion creative, validating all URLs up front
    pub fn new(
        resource: CompanionResource,
        width: u32,
        height: u32,
        click_through: Option<String>,
    ) -> Result<Self> {
        if let CompanionResource::StaticImage(ref url) = resource {
            Url::parse(url)?;
        }
        if let Some(ref url) = click_through {
            Url::parse(url)?;
        }
        Ok(Self {
            resource,
            width,
            height,
            click_through,
        })
    }
}

/// Represents where in the view stack a user interaction originated
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub enum InteractionSource {
    /// The base web/image creative
    BaseCreative,

    /// The companion end card
    Companion,

    /// The overlay chrome
    Overlay,
}

/// Represents an opaque user-interaction event forwarded upward unmodified
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct InteractionPayload {
    /// The layer the interaction came from
    pub source: InteractionSource,

    /// The click-through URL, if the creative defined one
    pub click_through: Option<String>,

    /// Creative-defined extra data, passed through without interpretation
    pub extra: Option<serde_json::Value>,
}
