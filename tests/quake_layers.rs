use quakemap::prelude::*;
use quakemap::data::geojson::extract_earthquakes;
use quakemap::quake::classify::{ALL_EVENTS_LAYER_ID, MAJOR_EVENTS_LAYER_ID};

const FEED: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {"type": "Feature", "properties": {"mag": 4.8, "place": "10km NE of Testville"},
         "geometry": {"type": "Point", "coordinates": [10.0, 20.0, 5.0]}},
        {"type": "Feature", "properties": {"mag": 5.4, "place": "Ridge"},
         "geometry": {"type": "Point", "coordinates": [11.0, 21.0, 5.0]}},
        {"type": "Feature", "properties": {"mag": 5.95, "place": "Borderline"},
         "geometry": {"type": "Point", "coordinates": [12.0, 22.0, 5.0]}},
        {"type": "Feature", "properties": {"mag": 6.2, "place": "Trench"},
         "geometry": {"type": "Point", "coordinates": [13.0, 23.0, 5.0]}},
        {"type": "Feature", "properties": {"mag": "n/a", "place": "Broken"},
         "geometry": {"type": "Point", "coordinates": [14.0, 24.0, 5.0]}}
    ]
}"#;

fn config() -> QuakeMapConfig {
    QuakeMapConfig {
        access_token: "pk.test".to_string(),
        ..Default::default()
    }
}

// Without a tokio runtime the tile layers never start downloads
fn quakes() -> Vec<Earthquake> {
    let document = GeoJson::from_json_str(FEED).unwrap();
    let (quakes, summary) = extract_earthquakes(&document);
    assert_eq!(summary.skipped, 1);
    quakes
}

fn vector_layer<'a>(map: &'a Map, id: &str) -> &'a VectorLayer {
    map.get_layer(id)
        .and_then(|layer| layer.as_any().downcast_ref::<VectorLayer>())
        .unwrap()
}

#[test]
fn test_all_events_colors_follow_threshold_table() {
    let quakes = quakes();
    let layer = all_events_layer(&quakes);

    let colors: Vec<Color> = layer.markers().iter().map(|m| m.style.fill_color).collect();
    assert_eq!(
        colors,
        vec![
            Color::LIGHT_SALMON,
            Color::INDIAN_RED,
            Color::DARK_RED,
            Color::DARK_RED
        ]
    );

    for (marker, quake) in layer.markers().iter().zip(&quakes) {
        assert_eq!(marker.style.radius, quake.magnitude * 1.5);
        assert!(!marker.style.stroke);
        assert_eq!(marker.position, quake.position);
    }
}

#[test]
fn test_testville_example() {
    let quakes = quakes();
    let layer = all_events_layer(&quakes);
    let marker = &layer.markers()[0];

    assert!((marker.style.radius - 7.2).abs() < 1e-9);
    assert_eq!(MagnitudeBucket::classify(4.8), MagnitudeBucket::Moderate);
    let popup = marker.popup.as_deref().unwrap();
    assert!(popup.contains("Testville"));
    assert!(popup.contains("4.8"));
}

#[test]
fn test_major_layer_is_exact_subset() {
    let quakes = quakes();
    let major = major_events_layer(&quakes);

    // 5.95 is colored as major in the general layer but stays out of this one
    assert_eq!(major.len(), 1);
    let marker = &major.markers()[0];
    assert_eq!(marker.position, LatLng::new(23.0, 13.0));
    assert_eq!(marker.style.fill_color, Color::DARK_RED);
    assert!((marker.style.radius - 9.3).abs() < 1e-9);
    assert_eq!(
        quakes.iter().filter(|q| is_major(q)).count(),
        major.len()
    );
}

#[test]
fn test_composed_map_startup_state() {
    let quakes = quakes();
    let map = compose_map(&config(), &quakes).unwrap();

    assert_eq!(map.viewport().center, LatLng::new(26.3, 17.2));
    assert_eq!(map.viewport().zoom, 3.0);

    let visible_bases: Vec<_> = BaseStyle::ALL
        .iter()
        .filter(|style| map.get_layer(style.layer_id()).unwrap().is_visible())
        .collect();
    assert_eq!(visible_bases, vec![&BaseStyle::Dark]);

    assert_eq!(map.active_overlays(), vec![ALL_EVENTS_LAYER_ID]);
    assert!(!map.get_layer(MAJOR_EVENTS_LAYER_ID).unwrap().is_visible());
    assert!(!map.control().is_collapsed());

    let names: Vec<_> = map.control().overlays().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Month-to-date earthquakes (4.5+)",
            "Month-to-date earthquakes (6.0+)"
        ]
    );
    let bases: Vec<_> = map.control().base_layers().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(bases, vec!["Dark Map", "Light Map"]);

    assert_eq!(vector_layer(&map, ALL_EVENTS_LAYER_ID).len(), 4);
    assert_eq!(vector_layer(&map, MAJOR_EVENTS_LAYER_ID).len(), 1);
}

#[test]
fn test_switching_layers_keeps_one_base() {
    let quakes = quakes();
    let mut map = compose_map(&config(), &quakes).unwrap();

    map.select_base_layer(BaseStyle::Light.layer_id()).unwrap();
    map.set_overlay_visible(MAJOR_EVENTS_LAYER_ID, true).unwrap();

    assert!(!map.get_layer("dark-map").unwrap().is_visible());
    assert!(map.get_layer("light-map").unwrap().is_visible());
    assert_eq!(
        map.active_overlays(),
        vec![ALL_EVENTS_LAYER_ID, MAJOR_EVENTS_LAYER_ID]
    );
}

#[test]
fn test_render_draws_only_active_overlay_markers() {
    let quakes = quakes();
    let mut map = compose_map(&config(), &quakes).unwrap();

    let mut context = RenderContext::new(1200, 800);
    map.render(&mut context).unwrap();

    let circles = context
        .drawing_queue()
        .iter()
        .filter(|command| matches!(command, DrawCommand::Circle { .. }))
        .count();
    assert_eq!(circles, 4);

    map.set_overlay_visible(MAJOR_EVENTS_LAYER_ID, true).unwrap();
    map.render(&mut context).unwrap();
    let circles = context
        .drawing_queue()
        .iter()
        .filter(|command| matches!(command, DrawCommand::Circle { .. }))
        .count();
    assert_eq!(circles, 5);
}

#[tokio::test]
async fn test_static_feed_matches_direct_extraction() {
    let feed = StaticFeed::from_json_str(FEED).unwrap();
    let (loaded, summary) = load_earthquakes(&feed).await.unwrap();
    assert_eq!(summary.total, 5);
    assert_eq!(summary.accepted, 4);
    assert_eq!(loaded, quakes());
}

#[test]
fn test_missing_token_fails_composition() {
    let result = compose_map(&QuakeMapConfig::default(), &[]);
    assert!(matches!(result, Err(MapError::Config(_))));
}
