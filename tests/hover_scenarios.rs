use heatmap_hover::core::histogram_geometry;
use heatmap_hover::hover::{FrameCellLookup, NoRawRecords, layer_to_json};
use heatmap_hover::{
    BucketLayout, BucketMetadata, BucketTable, HeatmapData, HoverOptions, heatmap_tab, resolve,
    resolve_all,
};
use polars::prelude::*;
use pretty_assertions::assert_eq;

fn metadata(layout: BucketLayout, y_bucket_count: usize) -> BucketMetadata {
    BucketMetadata {
        x_bucket_size: Some(60_000.0),
        y_bucket_size: Some(10.0),
        y_bucket_count: Some(y_bucket_count),
        y_layout: Some(layout),
    }
}

fn single_column() -> DataFrame {
    df! {
        "xMin" => [0.0, 0.0, 0.0],
        "yMin" => [0.0, 10.0, 20.0],
        "count" => [5.0, 0.0, 9.0],
    }
    .unwrap()
}

#[test]
fn hovered_bar_is_full_height_and_highlighted() {
    let table = BucketTable::from_frame(&single_column(), &metadata(BucketLayout::Minimum, 3)).unwrap();
    let geometry = histogram_geometry(&table, 2, 150, 50);

    let drawn: Vec<usize> = geometry.bars.iter().map(|b| b.bucket_index).collect();
    assert_eq!(drawn, vec![0, 2]);

    let hovered = geometry.highlighted().next().unwrap();
    assert_eq!(hovered.bucket_index, 2);
    assert_eq!(hovered.rect.y, 0);
    assert_eq!(hovered.rect.height, 50);

    for bar in &geometry.bars {
        assert!(bar.rect.x >= -1 && bar.rect.right() <= 151);
        assert!(bar.rect.y >= -1 && bar.rect.bottom() <= 51);
    }
}

#[test]
fn less_than_or_equal_first_bucket_has_open_lower_bound() {
    let table = BucketTable::from_frame(&single_column(), &metadata(BucketLayout::LessThanOrEqual, 3)).unwrap();
    let d = resolve(&table, 0).unwrap();
    assert_eq!(d.y_range.min, None);
    assert_eq!(d.y_range.max, Some(0.0));
}

#[test]
fn missing_count_column_gives_no_descriptors() {
    let df = df! { "xMin" => [0.0], "yMin" => [0.0] }.unwrap();
    assert!(resolve_all(Some(&df), &BucketMetadata::default(), 0).is_empty());
}

#[test]
fn all_zero_column_draws_nothing() {
    let df = df! {
        "xMin" => [0.0, 0.0],
        "yMin" => [0.0, 10.0],
        "count" => [0.0, 0.0],
    }
    .unwrap();
    let table = BucketTable::from_frame(&df, &metadata(BucketLayout::Minimum, 2)).unwrap();
    assert!(histogram_geometry(&table, 1, 150, 50).is_empty());
}

#[test]
fn metadata_is_inferred_when_absent() {
    let df = df! {
        "xMin" => [0.0, 0.0, 30.0, 30.0],
        "yMin" => [1.0, 2.0, 1.0, 2.0],
        "count" => [1.0, 1.0, 1.0, 1.0],
    }
    .unwrap();
    let table = BucketTable::from_frame(&df, &BucketMetadata::default()).unwrap();
    assert_eq!(table.y_bucket_count, 2);
    let d = resolve(&table, 3).unwrap();
    assert_eq!(d.x_range.max, Some(60.0));
    assert_eq!(d.y_range.min, Some(2.0));
}

#[test]
fn hover_tab_with_raw_records() {
    let raw = df! {
        "time" => [1_000.0, 2_000.0, 90_000.0],
        "value" => [21.0, 25.0, 22.0],
    }
    .unwrap();
    let lookup = FrameCellLookup::new(raw, "time", "value", BucketLayout::Minimum);
    let data = HeatmapData {
        heatmap: Some(single_column()),
        metadata: metadata(BucketLayout::Minimum, 3),
        display_name: None,
    };
    let options = HoverOptions {
        show_histogram: true,
        ..HoverOptions::default()
    };

    let layers = heatmap_tab(&data, 2, &lookup, &options);
    assert_eq!(layers.len(), 1);
    let layer = &layers[0];
    assert_eq!(layer.name, "Heatmap");
    assert_eq!(layer.data[0].height(), 2);

    let json = layer_to_json(layer, 10);
    assert_eq!(json["header"]["yMin"], "20");
    assert_eq!(json["footer"]["width"], 150);
    assert_eq!(json["data"][0].as_array().unwrap().len(), 2);
}

#[test]
fn hover_tab_without_frame() {
    let layers = heatmap_tab(&HeatmapData::default(), 0, &NoRawRecords, &HoverOptions::default());
    assert_eq!(layers.len(), 1);
    assert_eq!(layers[0].name, "Heatmap");
    assert!(layers[0].data.is_empty());
}
