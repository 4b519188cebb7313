use std::path::PathBuf;

use assert_matches::assert_matches;
use carta::carta_format::{
    encode_to_file, CartaFormatError, MapData, MapReader, Node, TileWriter, Way,
};
use carta::carta_types::Coordinate;
use carta::{
    encode_pbf, render_file, render_map, CartaError, Color, RenderOptions, RenderSummary,
};

fn tags(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("carta-{}-{name}", std::process::id()))
}

// A forest square crossed by a road that continues into the next tile, a town and an untagged
// node.
fn sample_map() -> MapData {
    let node =
        |id, lat, lon, t: &[(&str, &str)]| Node::new(id, Coordinate::new(lat, lon), tags(t));
    let nodes = vec![
        node(1, 10.01, 20.01, &[]),
        node(2, 10.01, 20.07, &[]),
        node(3, 10.07, 20.07, &[]),
        node(4, 10.07, 20.01, &[]),
        node(5, 10.04, 20.02, &[]),
        node(6, 10.04, 20.06, &[]),
        node(7, 10.04, 20.12, &[]),
        node(8, 10.05, 20.05, &[("place", "town"), ("name", "Town")]),
        node(9, 10.03, 20.03, &[]),
    ];
    let ways = vec![
        Way::new(100, vec![1, 2, 3, 4, 1], tags(&[("landuse", "forest")])),
        Way::new(
            101,
            vec![5, 6, 7],
            tags(&[("highway", "primary"), ("name", "Elm Street")]),
        ),
    ];

    MapData::from_entities(nodes, ways)
}

fn options() -> RenderOptions {
    RenderOptions {
        width: 200,
        height: 200,
        background: Color::WHITE,
        ..Default::default()
    }
}

fn pixel(image: &image::RgbaImage, x: u32, y: u32) -> Color {
    let [r, g, b, a] = image.get_pixel(x, y).0;
    Color::rgba(r, g, b, a)
}

#[test]
fn encode_read_and_render() {
    let map = sample_map();
    let (bytes, encoded) = TileWriter::new(&map).encode().unwrap();
    assert_eq!(encoded.tiles, 2);
    assert_eq!(encoded.features, 5);

    let reader = MapReader::new(bytes).unwrap();
    let options = options();
    let (image, summary) = render_map(&reader, &options).unwrap();

    assert_eq!(
        summary,
        RenderSummary {
            features: 5,
            shapes: 4
        }
    );
    assert_eq!(image.dimensions(), (200, 200));

    // Inside of the forest, away from the road.
    assert_eq!(pixel(&image, 30, 110), options.palette.forest);
    // East of the forest and north of the road.
    assert_eq!(pixel(&image, 150, 50), Color::WHITE);
    // The road is drawn over the forest.
    assert!((138..152).any(|y| pixel(&image, 50, y) == options.palette.road.color));
}

#[test]
fn render_file_writes_png() {
    let map_path = temp_path("render.bin");
    let image_path = temp_path("render.png");

    encode_to_file(&sample_map(), &map_path).unwrap();
    let summary = render_file(&map_path, &image_path, &options()).unwrap();
    assert_eq!(summary.shapes, 4);

    let image = image::open(&image_path).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (200, 200));

    std::fs::remove_file(map_path).unwrap();
    std::fs::remove_file(image_path).unwrap();
}

#[test]
fn empty_map_renders_background() {
    let (bytes, _) = TileWriter::new(&MapData::default()).encode().unwrap();
    let reader = MapReader::new(bytes).unwrap();
    let (image, summary) = render_map(&reader, &options()).unwrap();

    assert_eq!(summary, RenderSummary::default());
    assert!(image.pixels().all(|p| p.0 == Color::WHITE.to_u8_array()));
}

#[test]
fn missing_tile_file() {
    let result = render_file(
        temp_path("does-not-exist.bin"),
        temp_path("never.png"),
        &options(),
    );
    assert_matches!(result, Err(CartaError::Format(CartaFormatError::Io(_))));
}

#[test]
fn missing_source_file() {
    let output = temp_path("never.bin");
    let result = encode_pbf(temp_path("does-not-exist.osm.pbf"), &output);
    assert_matches!(result, Err(CartaError::Source(_)));
    assert!(!output.exists());
}

#[test]
fn garbage_source_file() {
    let input = temp_path("garbage.osm.pbf");
    let output = temp_path("garbage.bin");
    std::fs::write(&input, b"definitely not a protobuf blob").unwrap();

    let result = encode_pbf(&input, &output);
    assert_matches!(result, Err(CartaError::Source(_)));
    assert!(!output.exists());

    std::fs::remove_file(input).unwrap();
}
