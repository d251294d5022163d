use anyhow::Result;
use std::path::PathBuf;

use crate::commands::open_store;
use crate::input::RunConfig;
use crate::output::{format_items, format_recommendations, write_recommendations};

/// Recommend courses for one query, or for several skills merged into one
/// list.
pub fn run_recommend(
    config: &RunConfig,
    queries: &[String],
    output: Option<&PathBuf>,
    json: bool,
) -> Result<()> {
    let store = open_store(config);
    let snapshot = store.current();
    let limit = config.engine.recommend_limit;

    let items = if let [query] = queries {
        let set = snapshot.recommend(query, limit)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&set)?);
        } else {
            print!("{}", format_recommendations(snapshot.catalog(), &set));
        }
        set.items
    } else {
        let items = snapshot.recommend_for_skills(queries, limit)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&items)?);
        } else {
            println!("Courses for skills {}:", queries.join(", "));
            print!("{}", format_items(&items));
        }
        items
    };

    if let Some(path) = output {
        write_recommendations(&items, path)?;
        log::info!("Recommendations written to {:?}", path);
    }
    Ok(())
}
