//! Load a GeoLite2-style block file and print the hottest points in a box.
//!
//! ```text
//! cargo run --example load_and_query -- GeoLite2-City-Blocks-IPv6.csv 35 60 -10 30
//! ```

use heatmap::prelude::*;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .ok_or("usage: load_and_query <csv> [minLat maxLat minLon maxLon]")?;
    let bounds: Vec<String> = args.collect();

    let config = Config::default().with_skip_missing_coordinates(true);
    let heatmap = Heatmap::builder().config(config).dataset(&path).build()?;
    let stats = heatmap.stats()?;
    println!(
        "indexed {} points ({} records) in a {}x{} grid",
        stats.points, stats.total_count, stats.grid_rows, stats.grid_cols
    );

    let result = match bounds.as_slice() {
        [min_lat, max_lat, min_lon, max_lon] => {
            heatmap.query_str(min_lat, max_lat, min_lon, max_lon)?
        }
        [] => heatmap.query(&QueryFilter::unbounded())?,
        _ => return Err("expected exactly four bounds".into()),
    };

    let mut points = result.points.clone();
    points.sort_by(|a, b| b.count.cmp(&a.count));
    println!("{} points, max count {}", result.len(), result.max_count);
    for point in points.iter().take(10) {
        println!("  {} x{}", point.coordinate, point.count);
    }

    Ok(())
}
