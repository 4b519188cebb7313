//! End-to-end operations: encoding of an OSM extract into a tile file and rendering of a tile file
//! into a PNG image.

use std::path::Path;

use carta_format::{encode_to_file, EncodeSummary, MapReader};
use carta_types::Rect;
use image::RgbaImage;

use crate::error::CartaError;
use crate::render::{render, RenderOptions};
use crate::source::read_pbf;
use crate::tessellate::Tessellator;

/// Statistics of a render run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary {
    /// Number of features read from the file.
    pub features: usize,
    /// Number of features that were classified into shapes.
    pub shapes: usize,
}

/// Reads an `.osm.pbf` extract and encodes it into a tile file.
pub fn encode_pbf(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> Result<EncodeSummary, CartaError> {
    let map = read_pbf(input)?;
    Ok(encode_to_file(&map, output)?)
}

/// Classifies all features of the tile file and renders them into an image.
pub fn render_map(
    reader: &MapReader,
    options: &RenderOptions,
) -> Result<(RgbaImage, RenderSummary), CartaError> {
    let mut tessellator = Tessellator::default();
    let mut summary = RenderSummary::default();

    for tile in reader.tiles() {
        let tile = tile?;
        log::debug!(
            "Tile {} has {} features",
            tile.tile_id,
            tile.features.len()
        );

        for feature in &tile.features {
            summary.features += 1;
            if tessellator.tessellate(feature) {
                summary.shapes += 1;
            }
        }
    }

    let (queue, bbox) = tessellator.finish();
    let bbox = bbox.unwrap_or_else(|| {
        log::info!("Map has no drawable features");
        Rect::new(0.0, 0.0, 0.0, 0.0)
    });

    Ok((render(queue, &bbox, options), summary))
}

/// Renders a tile file into a PNG image.
pub fn render_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &RenderOptions,
) -> Result<RenderSummary, CartaError> {
    let output = output.as_ref();
    let reader = MapReader::open(input)?;
    let (image, summary) = render_map(&reader, options)?;

    image.save(output)?;
    log::info!(
        "Rendered {} of {} features to {}",
        summary.shapes,
        summary.features,
        output.display()
    );

    Ok(summary)
}
