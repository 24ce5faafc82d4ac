use log::{info, warn};

/// Delegate callbacks arriving from a third-party interstitial network SDK
#[derive(Debug, Clone, PartialEq)]
pub enum AdNetworkEvent {
    /// The network filled the ad request
    Loaded,

    /// The network could not fill the request
    Failed(String),

    /// The interstitial was presented full screen
    Shown,

    /// The interstitial was closed by the user or the network
    Dismissed,
}

/// Mediation-side listener the adapter reports into
///
/// The capability set is deliberately narrow; nothing about the network SDK
/// leaks through it.
pub trait InterstitialListener {
    fn on_ad_loaded(&mut self) {}
    fn on_ad_failed(&mut self, _reason: &str) {}
    fn on_ad_shown(&mut self) {}
    fn on_ad_dismissed(&mut self) {}
}

/// Adapts one third-party network SDK's delegate surface to the mediation
/// listener
///
/// The load result is latched: networks occasionally re-deliver a load
/// callback, and the mediation layer must see exactly one outcome per
/// request.
pub struct InterstitialAdapter<L: InterstitialListener> {
    listener: L,
    load_result: Option<bool>,
    shown: bool,
}

impl<L: InterstitialListener> InterstitialAdapter<L> {
    pub fn new(listener: L) -> Self {
        Self {
            listener,
            load_result: None,
            shown: false,
        }
    }

    /// Whether a filled, not-yet-shown interstitial is available
    pub fn is_ready(&self) -> bool {
        self.load_result == Some(true) && !self.shown
    }

    /// Feed one network delegate callback through the adapter
    pub fn handle_network_event(&mut self, event: AdNetworkEvent) {
        match event {
            AdNetworkEvent::Loaded => {
                if self.load_result.is_some() {
                    warn!("duplicate load result from network, dropped");
                    return;
                }
                self.load_result = Some(true);
                info!("interstitial loaded");
                self.listener.on_ad_loaded();
            }
            AdNetworkEvent::Failed(reason) => {
                if self.load_result.is_some() {
                    warn!("duplicate load result from network, dropped");
                    return;
                }
                self.load_result = Some(false);
                info!("interstitial failed: {}", reason);
                self.listener.on_ad_failed(&reason);
            }
            AdNetworkEvent::Shown => {
                self.shown = true;
                self.listener.on_ad_shown();
            }
            AdNetworkEvent::Dismissed => {
                self.listener.on_ad_dismissed();
            }
        }
    }
}

impl<L: InterstitialListener> std::fmt::Debug for InterstitialAdapter<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterstitialAdapter")
            .field("load_result", &self.load_result)
            .field("shown", &self.shown)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct RecordingListener {
        calls: Rc<RefCell<Vec<String>>>,
    }

    impl InterstitialListener for RecordingListener {
        fn on_ad_loaded(&mut self) {
            self.calls.borrow_mut().push("loaded".to_string());
        }
        fn on_ad_failed(&mut self, reason: &str) {
            self.calls.borrow_mut().push(format!("failed:{}", reason));
        }
        fn on_ad_shown(&mut self) {
            self.calls.borrow_mut().push("shown".to_string());
        }
        fn on_ad_dismissed(&mut self) {
            self.calls.borrow_mut().push("dismissed".to_string());
        }
    }

    fn adapter() -> (InterstitialAdapter<RecordingListener>, Rc<RefCell<Vec<String>>>) {
        let listener = RecordingListener::default();
        let calls = listener.calls.clone();
        (InterstitialAdapter::new(listener), calls)
    }

    #[test]
    fn full_lifecycle_is_forwarded() {
        let (mut adapter, calls) = adapter();
        adapter.handle_network_event(AdNetworkEvent::Loaded);
        assert!(adapter.is_ready());
        adapter.handle_network_event(AdNetworkEvent::Shown);
        adapter.handle_network_event(AdNetworkEvent::Dismissed);

        assert_eq!(*calls.borrow(), vec!["loaded", "shown", "dismissed"]);
        assert!(!adapter.is_ready());
    }

    // Networks re-delivering a load callback must not reach mediation twice.
    #[test]
    fn load_result_is_latched() {
        let (mut adapter, calls) = adapter();
        adapter.handle_network_event(AdNetworkEvent::Loaded);
        adapter.handle_network_event(AdNetworkEvent::Loaded);
        adapter.handle_network_event(AdNetworkEvent::Failed("no fill".to_string()));

        assert_eq!(*calls.borrow(), vec!["loaded"]);
    }

    #[test]
    fn failed_load_is_never_ready() {
        let (mut adapter, calls) = adapter();
        adapter.handle_network_event(AdNetworkEvent::Failed("no fill".to_string()));

        assert!(!adapter.is_ready());
        assert_eq!(*calls.borrow(), vec!["failed:no fill"]);
    }
}
