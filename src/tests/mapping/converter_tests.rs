use super::*;

fn converter() -> ProjectConverter {
    ProjectConverter::new(Arc::new(IdentityMap::new()))
}

fn square() -> Vec<GeoPoint> {
    vec![
        GeoPoint { lat: 45.0, lon: 6.0 },
        GeoPoint { lat: 45.0, lon: 6.1 },
        GeoPoint { lat: 45.1, lon: 6.1 },
        GeoPoint { lat: 45.1, lon: 6.0 },
    ]
}

#[test]
fn unsynced_project_has_no_id_or_version() {
    let conv = converter();
    let owner = UserSnapshot {
        id: LocalId::new(),
        name: "Ana".to_string(),
    };
    let mut project = ProjectSnapshot::new("Farm Survey", owner);
    project.srs_epsg.clear();

    let wire = conv.project_to_wire(&project);
    assert_eq!(wire.id, None);
    assert_eq!(wire.v, None);
    assert_eq!(wire.epsg.as_deref(), Some(DEFAULT_EPSG));
    assert_eq!(wire.user.unwrap().display_name.as_deref(), Some("Ana"));
    assert!(wire.created.is_some());
}

#[test]
fn synced_entities_carry_recorded_version() {
    let conv = converter();
    let mission = MissionSnapshot::new("Flight 1");
    conv.identity().bind(mission.id, RemoteId::from("m1"));
    conv.identity().record_version(&RemoteId::from("m1"), 4);

    let wire = conv.mission_to_wire(&mission, &RemoteId::from("p1"));
    assert_eq!(wire.id.as_deref(), Some("m1"));
    assert_eq!(wire.v, Some(4));
    assert_eq!(wire.project.as_deref(), Some("p1"));
    assert_eq!(wire.reference_point, vec![0.0, 0.0]);
}

#[test]
fn goal_polygon_is_closed_lon_lat_ring() {
    let conv = converter();
    let goal = GoalSnapshot::new("north field", square());
    let wire = conv.goal_to_wire(&goal, &RemoteId::from("p1"), &RemoteId::from("m1"));

    let ring = &wire.feature.as_ref().unwrap().geometry.coordinates[0];
    assert_eq!(ring.len(), 5);
    assert_eq!(ring[0], vec![6.0, 45.0]);
    assert_eq!(ring.first(), ring.last());
    assert_eq!(wire.mission_id.as_deref(), Some("m1"));
    assert_eq!(wire.parameters.unwrap().name, "north field");
}

#[test]
fn goal_without_corners_has_empty_geometry() {
    let conv = converter();
    let goal = GoalSnapshot::new("empty", Vec::new());
    let wire = conv.goal_to_wire(&goal, &RemoteId::from("p1"), &RemoteId::from("m1"));
    assert!(wire.feature.unwrap().geometry.coordinates.is_empty());
}

#[test]
fn from_wire_mints_ids_records_versions_and_opens_rings() {
    let conv = converter();
    let closed: Vec<Vec<f64>> = square()
        .iter()
        .chain(square().first())
        .map(|p| vec![p.lon, p.lat])
        .collect();

    let hydrated = HydratedProject {
        project: Project {
            id: Some("p1".to_string()),
            v: Some(2),
            name: "Farm Survey".to_string(),
            epsg: None,
            created: Some("not a date".to_string()),
            modification_date: Some("2024-05-01T10:00:00Z".to_string()),
            user: Some(User {
                id: Some("u1".to_string()),
                display_name: Some("Ana".to_string()),
            }),
        },
        missions: vec![HydratedMission {
            mission: Mission {
                id: Some("m1".to_string()),
                v: Some(1),
                name: "Flight 1".to_string(),
                reference_point: vec![45.0],
                ..Mission::default()
            },
            annotations: vec![Annotation {
                id: Some("a1".to_string()),
                v: Some(1),
                feature: Some(Feature {
                    kind: "Feature".to_string(),
                    geometry: Geometry {
                        kind: "Polygon".to_string(),
                        coordinates: vec![closed],
                    },
                }),
                ..Annotation::default()
            }],
            flight_plans: vec![FlightPlan {
                id: Some("f1".to_string()),
                v: Some(0),
                name: "grid".to_string(),
                takeoff: vec![1.0, 2.0, 3.0],
                ..FlightPlan::default()
            }],
        }],
        flights: Vec::new(),
    };

    let snapshot = conv.project_from_wire(&hydrated);
    let map = conv.identity();

    assert_eq!(snapshot.srs_epsg, DEFAULT_EPSG);
    assert_eq!(snapshot.created, OffsetDateTime::UNIX_EPOCH);
    assert_eq!(snapshot.owner.name, "Ana");
    assert_eq!(map.remote_id_for(&snapshot.id), Some(RemoteId::from("p1")));
    assert_eq!(map.version_of(&RemoteId::from("p1")), Some(2));

    let mission = &snapshot.missions[0];
    assert_eq!((mission.origin_lat, mission.origin_lon), (0.0, 0.0));
    assert_eq!(mission.goals[0].corners, square());
    assert_eq!(mission.flight_plans[0].takeoff, Point3 { x: 1.0, y: 2.0, z: 3.0 });
    assert_eq!(map.version_of(&RemoteId::from("f1")), Some(0));

    // A second pass reuses the minted local ids.
    let again = conv.project_from_wire(&hydrated);
    assert_eq!(again.id, snapshot.id);
    assert_eq!(again.missions[0].goals[0].id, mission.goals[0].id);
}
