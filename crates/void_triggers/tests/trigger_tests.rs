//! Integration tests for void_triggers

use glam::{Mat4, Vec3};
use parking_lot::Mutex;
use std::sync::Arc;
use void_triggers::*;

/// Drive a tracker from a volume the way a frame loop would
fn step(
    tracker: &mut TriggerTracker,
    overlaps: &mut VolumeOverlaps,
    volume: &TriggerVolume,
    scene: &mut SceneObjects,
) {
    for event in overlaps.update(1, volume, scene) {
        match event.event_type {
            TriggerEventType::Enter => tracker.enter(scene, event.object),
            TriggerEventType::Exit => tracker.exit(scene, event.object),
        };
    }
    for object in tracker.process_lifecycle(scene) {
        overlaps.forget(object);
    }
}

#[test]
fn test_volume_drives_tracker() {
    let mut scene = SceneObjects::new();
    let volume = TriggerVolume::box_shape(2.0, 2.0, 2.0);
    let mut overlaps = VolumeOverlaps::new();

    let entered = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&entered);
    let subscriber = scene.lifecycle_mut().register_subscriber();
    let mut tracker = TriggerTracker::new(
        subscriber,
        KeywordsFilter::new("player"),
        TriggerPolicy::new().on_enter(move |id, count| log.lock().push((id, count))),
    );

    let player = scene.spawn(ObjectDesc::at(Vec3::new(5.0, 0.0, 0.0)).with_keywords(["player"]));
    step(&mut tracker, &mut overlaps, &volume, &mut scene);
    assert!(tracker.is_empty());

    scene.set_position(player, Vec3::new(0.5, 0.0, 0.0));
    step(&mut tracker, &mut overlaps, &volume, &mut scene);
    assert!(tracker.contains(player));
    assert_eq!(*entered.lock(), vec![(player, 1)]);

    scene.set_position(player, Vec3::new(5.0, 0.0, 0.0));
    step(&mut tracker, &mut overlaps, &volume, &mut scene);
    assert!(tracker.is_empty());
    assert!(!scene.lifecycle().is_subscribed(player, subscriber));
}

#[test]
fn test_switch_follows_occupancy() {
    let mut scene = SceneObjects::new();
    let volume = TriggerVolume::new(
        Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)),
        Vec3::ZERO,
        Vec3::splat(2.0),
    );
    let mut overlaps = VolumeOverlaps::new();

    let states = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&states);
    let mut tracker = TriggerTracker::new(
        scene.lifecycle_mut().register_subscriber(),
        KeywordsFilter::any(),
        TriggerPolicy::switch(false, move |on| sink.lock().push(on)),
    );
    tracker.start();

    let a = scene.spawn(ObjectDesc::at(Vec3::new(10.0, 0.0, 0.0)).with_keywords(["a"]));
    let b = scene.spawn(ObjectDesc::at(Vec3::new(10.5, 0.0, 0.0)).with_keywords(["b"]));
    step(&mut tracker, &mut overlaps, &volume, &mut scene);
    assert_eq!(tracker.len(), 2);

    scene.destroy(a);
    step(&mut tracker, &mut overlaps, &volume, &mut scene);
    assert_eq!(*states.lock(), vec![false, true]);

    scene.set_active(b, false);
    step(&mut tracker, &mut overlaps, &volume, &mut scene);
    assert_eq!(*states.lock(), vec![false, true, false]);
    assert_eq!(scene.lifecycle().watched_count(), 0);
}

#[test]
fn test_destroy_outside_frame_loop() {
    let mut scene = SceneObjects::new();
    let subscriber = scene.lifecycle_mut().register_subscriber();
    let mut tracker = TriggerTracker::new(subscriber, KeywordsFilter::any(), TriggerPolicy::new());

    let object = scene.spawn(ObjectDesc::new().with_keywords(["crate"]));
    assert!(tracker.enter(&mut scene, object));

    scene.destroy(object);
    assert_eq!(tracker.process_lifecycle(&mut scene), vec![object]);
    assert!(tracker.is_empty());

    tracker.shutdown(&mut scene);
    assert!(!scene.lifecycle().is_registered(subscriber));
}

#[test]
fn test_filters_from_json() {
    let mask: LayerMask = serde_json::from_str("36").unwrap();
    assert!(mask.contains(2));
    assert!(mask.contains(5));
    assert!(!mask.contains(0));

    let filter: KeywordsFilter = serde_json::from_str(r#""player,npc""#).unwrap();
    let keywords: Keywords = ["npc"].into_iter().collect();
    assert!(filter.check(Some(&keywords)));
    assert!(!filter.check(None));

    assert_eq!(serde_json::to_string(&ObjectId(7)).unwrap(), "7");
}
