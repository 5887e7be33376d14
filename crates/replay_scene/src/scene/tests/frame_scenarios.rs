//! Frame sequences exercising pooling, selection and release together

use crate::config::ViewerSettings;
use crate::foundation::math::Vec3;
use crate::pool::{ShapeKind, ShapeSpec};
use crate::recording::{ColorData, Entity, EntityId, FrameData, Property, PropertyValue, Vec3Data};
use crate::render::{HeadlessBackend, OutlineStyle};
use crate::scene::ReplayScene;

fn session() -> ReplayScene<HeadlessBackend> {
    let settings = ViewerSettings {
        active_layers: vec!["physics".to_string(), "debug".to_string()],
        ..ViewerSettings::default()
    };
    let mut scene = ReplayScene::new(HeadlessBackend::new(), settings);
    scene.initialize(None).unwrap();
    scene
}

fn at(id: EntityId, position: Vec3Data) -> Entity {
    Entity::new(id).with_property(Property::new(1, "position", PropertyValue::Vec3 { value: position }))
}

fn sphere(id: u32, radius: f32, position: Vec3Data) -> Property {
    Property::new(
        id,
        "Collider",
        PropertyValue::Sphere { position, radius, color: ColorData::WHITE, layer: "physics".to_string() },
    )
}

fn every_shape(id: EntityId) -> Entity {
    let origin = Vec3Data::new(0.0, 0.0, 0.0);
    let color = ColorData::new(0.2, 0.4, 0.6, 1.0);
    let layer = || "physics".to_string();

    at(id, origin)
        .with_property(sphere(2, 0.5, origin))
        .with_property(Property::new(
            3,
            "Body",
            PropertyValue::Capsule {
                position: origin,
                direction: Vec3Data::new(0.0, 1.0, 0.0),
                radius: 0.3,
                height: 1.8,
                color,
                layer: layer(),
            },
        ))
        .with_property(Property::new(
            4,
            "Bounds",
            PropertyValue::Aabb { position: origin, size: Vec3Data::new(1.0, 2.0, 3.0), color, layer: layer() },
        ))
        .with_property(Property::new(
            5,
            "Hitbox",
            PropertyValue::Oobb {
                position: origin,
                size: Vec3Data::new(1.0, 1.0, 1.0),
                forward: Vec3Data::new(0.0, 0.0, 1.0),
                up: Vec3Data::new(0.0, 1.0, 0.0),
                color,
                layer: layer(),
            },
        ))
        .with_property(Property::new(
            6,
            "Ground",
            PropertyValue::Plane {
                position: origin,
                normal: Vec3Data::new(0.0, 1.0, 0.0),
                up: Vec3Data::new(0.0, 0.0, 1.0),
                width: 4.0,
                length: 2.0,
                color,
                layer: layer(),
            },
        ))
        .with_property(Property::new(
            7,
            "Velocity",
            PropertyValue::Line {
                origin,
                destination: Vec3Data::new(1.0, 0.0, 0.0),
                color,
                layer: "debug".to_string(),
            },
        ))
}

#[test]
fn test_sphere_instance_survives_empty_frame() {
    let mut scene = session();
    let signature = ShapeSpec::Sphere { radius: 0.5 }.signature();
    let origin = Vec3Data::new(0.0, 0.0, 0.0);

    let frame_a = FrameData::default().with_entity(at(1, origin).with_property(sphere(2, 0.5, origin)));
    scene.present_frame(&frame_a);
    let first = scene.binder().entity(1).unwrap().property_mesh(2).unwrap().mesh;

    scene.present_frame(&FrameData::default());
    let bucket = scene.binder().pools().pool(ShapeKind::Sphere).bucket(&signature);
    assert_eq!(bucket.len(), 1);
    assert!(!bucket[0].used);
    let node = scene.backend().node(first).unwrap();
    assert!(!node.enabled);
    assert!(!node.pickable);

    // 0.5004 rounds to the same bucket
    let frame_c = FrameData::default().with_entity(at(1, origin).with_property(sphere(2, 0.5004, origin)));
    scene.present_frame(&frame_c);
    let second = scene.binder().entity(1).unwrap().property_mesh(2).unwrap().mesh;
    assert_eq!(first, second);
    let node = scene.backend().node(second).unwrap();
    assert!(node.enabled);
    assert!(node.pickable);
    assert_eq!(scene.binder().pools().pool(ShapeKind::Sphere).stats().instances, 1);
}

#[test]
fn test_switching_selection_restores_previous_entity_once() {
    let mut scene = session();
    let frame = FrameData::default()
        .with_entity(at(3, Vec3Data::new(-2.0, 0.0, 0.0)))
        .with_entity(at(7, Vec3Data::new(6.0, 1.0, 2.0)));
    scene.present_frame(&frame);

    scene.mark_entity_as_selected(3);
    let base_3 = scene.binder().entity(3).unwrap().base_mesh();
    let base_7 = scene.binder().entity(7).unwrap().base_mesh();
    scene.backend_mut().clear_outline_log();

    scene.mark_entity_as_selected(7);

    let log = scene.backend().outline_log();
    assert_eq!(log.iter().filter(|(mesh, _)| *mesh == base_3).count(), 1);
    assert!(log.contains(&(base_3, None)));
    assert_eq!(log.iter().filter(|(mesh, _)| *mesh == base_7).count(), 1);
    assert!(log.contains(&(base_7, Some(OutlineStyle::selected()))));

    assert_eq!(scene.backend().gizmo_target(), Some(base_7));
    let destination = scene.selection().camera().active().unwrap().destination();
    assert_eq!(destination.target, Vec3::new(6.0, 1.0, 2.0));
}

#[test]
fn test_selection_outline_follows_rebound_meshes() {
    let mut scene = session();
    let frame = FrameData::default().with_entity(every_shape(1));
    scene.present_frame(&frame);
    scene.mark_entity_as_selected(1);

    scene.present_frame(&frame);
    let binding = scene.binder().entity(1).unwrap();
    for mesh in binding.meshes() {
        assert_eq!(scene.backend().node(mesh).unwrap().outline, Some(OutlineStyle::selected()));
    }
}

#[test]
fn test_remove_all_properties_frees_every_pool() {
    let mut scene = session();
    scene.present_frame(&FrameData::default().with_entity(every_shape(1)));
    assert_eq!(scene.binder().bound_property_count(1), 6);

    scene.remove_all_properties();

    assert_eq!(scene.binder().bound_property_count(1), 0);
    for (kind, stats) in scene.binder().pools().stats() {
        assert_eq!(stats.used, 0, "{kind} pool still has instances in use");
    }
    let base = scene.binder().entity(1).unwrap().base_mesh();
    assert!(scene.backend().node(base).unwrap().enabled);
}

#[test]
fn test_buckets_bounded_by_peak_usage() {
    let mut scene = session();
    let crowd = |count: u32| {
        (0..count).fold(FrameData::default(), |frame, id| {
            let position = Vec3Data::new(id as f32 * 2.0, 0.0, 0.0);
            frame.with_entity(at(id, position).with_property(sphere(2, 1.0, position)))
        })
    };

    for _ in 0..10 {
        scene.present_frame(&crowd(3));
    }
    let stats = scene.binder().pools().pool(ShapeKind::Sphere).stats();
    assert_eq!(stats.instances, 3);
    assert_eq!(stats.peak_used, 3);

    scene.present_frame(&crowd(5));
    scene.present_frame(&crowd(2));
    let stats = scene.binder().pools().pool(ShapeKind::Sphere).stats();
    assert_eq!(stats.instances, 5);
    assert_eq!(stats.used, 2);
    assert_eq!(stats.buckets, 1);
}

#[test]
fn test_hidden_entity_keeps_marker() {
    let mut scene = session();
    let origin = Vec3Data::new(0.0, 0.0, 0.0);
    scene.present_frame(&FrameData::default().with_entity(at(1, origin)).with_entity(at(2, origin)));
    let marker = scene.binder().entity(2).unwrap().base_mesh();

    scene.present_frame(&FrameData::default().with_entity(at(1, origin)));
    assert!(!scene.backend().node(marker).unwrap().enabled);

    scene.present_frame(&FrameData::default().with_entity(at(2, origin)));
    assert_eq!(scene.binder().entity(2).unwrap().base_mesh(), marker);
    assert!(scene.backend().node(marker).unwrap().enabled);
}
