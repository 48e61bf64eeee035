use std::time::{SystemTime, UNIX_EPOCH};

use gridpath::{GridMap, PathFinder, PresetTable};
use log::info;

fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    let table = PresetTable::builtin()?;
    let seed = SystemTime::now().duration_since(UNIX_EPOCH)?.as_nanos() as u64;
    let preset = table.pick(seed);

    info!(
        "preset '{}': {} from {} to {}",
        preset.name,
        preset.matrix.to_text(),
        preset.source,
        preset.dest
    );

    let map: &GridMap = &preset.matrix;
    println!("{}", map);

    let (result, visited) = PathFinder::new(map, preset.source, preset.dest).finish(map);

    match result {
        Ok(found) => {
            println!("{}", map.render_path(&found.path));
            let walk: Vec<String> = found
                .source_to_destination()
                .iter()
                .map(|p| p.to_string())
                .collect();
            println!("{} steps: {}", found.steps, walk.join(" -> "));
        }
        Err(no_path) => println!("{}", no_path.user_message()),
    }

    // steps needed to reach every cell the search touched
    println!("{}", visited);

    Ok(())
}
