//! Scan lifecycle tests driven through the public API

use std::sync::Arc;
use std::time::Duration;

use fling_bridge::ObjectRef;
use fling_discovery::sim::SimulatedDiscovery;
use fling_discovery::{DiscoveryController, DiscoveryEvent, DiscoveryListener, RemotePlayerHandle};
use parking_lot::Mutex;

fn tv(id: &str) -> RemotePlayerHandle {
    RemotePlayerHandle::new(ObjectRef::new(id), format!("TV {id}"), id)
}

/// Listener that keeps every handle it is given.
#[derive(Clone, Default)]
struct Recorder {
    discovered: Arc<Mutex<Vec<RemotePlayerHandle>>>,
    lost: Arc<Mutex<Vec<RemotePlayerHandle>>>,
}

impl DiscoveryListener for Recorder {
    fn on_player_discovered(&mut self, player: &RemotePlayerHandle) {
        self.discovered.lock().push(player.clone());
    }

    fn on_player_lost(&mut self, player: &RemotePlayerHandle) {
        self.lost.lock().push(player.clone());
    }
}

#[test]
fn test_restart_carries_no_stale_handles() {
    let provider = SimulatedDiscovery::new();
    let recorder = Recorder::default();
    let mut controller = DiscoveryController::new(provider.clone(), recorder.clone());

    controller.start().unwrap();
    let first_scan = provider.current_sink().unwrap();
    provider.announce(tv("a"));
    controller.dispatch_pending();
    assert_eq!(controller.players(), &[tv("a")]);

    controller.stop();
    controller.start().unwrap();
    assert!(controller.players().is_empty());

    // A late report from the first scan must not surface.
    first_scan.player_discovered(tv("stale"));
    provider.announce(tv("b"));
    controller.dispatch_pending();

    assert_eq!(controller.players(), &[tv("b")]);
    let discovered = recorder.discovered.lock();
    assert_eq!(*discovered, vec![tv("a"), tv("b")]);
}

#[test]
fn test_rediscovery_after_restart_is_reported_again() {
    let provider = SimulatedDiscovery::new();
    let recorder = Recorder::default();
    let mut controller = DiscoveryController::new(provider.clone(), recorder.clone());

    controller.start().unwrap();
    provider.announce(tv("a"));
    controller.dispatch_pending();
    controller.stop();

    controller.start().unwrap();
    provider.announce(tv("a"));
    controller.dispatch_pending();

    assert_eq!(recorder.discovered.lock().len(), 2);
}

#[test]
fn test_custom_service_type_reaches_provider() {
    let provider = SimulatedDiscovery::new();
    let mut controller =
        DiscoveryController::new(provider.clone(), Recorder::default()).with_service_type("custom.pl");

    controller.start().unwrap();
    controller.stop();
    controller.start().unwrap();

    assert_eq!(provider.service_types(), vec!["custom.pl", "custom.pl"]);
}

#[tokio::test]
async fn test_events_from_another_thread_are_delivered_on_pump() {
    let provider = SimulatedDiscovery::new();
    let recorder = Recorder::default();
    let mut controller = DiscoveryController::new(provider.clone(), recorder.clone());
    controller.start().unwrap();

    let remote = provider.clone();
    std::thread::spawn(move || {
        remote.announce(tv("a"));
        remote.withdraw(tv("a"));
    })
    .join()
    .unwrap();

    let first = tokio::time::timeout(Duration::from_secs(1), controller.dispatch_next())
        .await
        .unwrap();
    assert_eq!(first, DiscoveryEvent::PlayerDiscovered(tv("a")));
    let second = tokio::time::timeout(Duration::from_secs(1), controller.dispatch_next())
        .await
        .unwrap();
    assert_eq!(second, DiscoveryEvent::PlayerLost(tv("a")));

    assert_eq!(recorder.lost.lock().len(), 1);
    assert!(controller.players().is_empty());
}
