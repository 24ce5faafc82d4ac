//! Creative rendering core for a mobile ad SDK — composes a video player,
//! companion end card, blur obstruction and overlay into one presentation
//! driven by a lifecycle state machine, plus the interstitial mediation
//! adapter contract.

pub mod adapter;
pub mod container;
pub mod error;
pub mod models;
pub mod viewability;
pub mod views;

pub use adapter::{AdNetworkEvent, InterstitialAdapter, InterstitialListener};
pub use container::{AdContainer, AdContainerObserver, AdContainerState};
pub use error::{AdError, Result};
pub use models::{
    CompanionCreative, CompanionResource, CreativeContent, InteractionPayload, InteractionSource,
    VideoConfig,
};
pub use viewability::{
    NoopViewabilityTracker, ObstructionKind, RegistrationHandle, SessionViewabilityTracker,
    ViewabilityTracker,
};
pub use views::{AdOverlay, Layer, OverlayEvent};
