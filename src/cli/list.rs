//! `sheaf list`: what templates should reference for each bundle.

use std::collections::BTreeMap;

use anyhow::Result;
use owo_colors::OwoColorize;
use sheaf::{EmitMode, Engine};

pub fn run(engine: &Engine, bundles: &[String], files: bool, json: bool) -> Result<()> {
    let names = super::select(engine, bundles)?;
    let mode = if files {
        EmitMode::Files
    } else {
        engine.emit_mode()
    };

    let mut listing = BTreeMap::new();
    for name in names {
        let entries = engine.registry().emit(&name, mode)?;
        listing.insert(name, entries);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    for (name, entries) in &listing {
        match mode {
            EmitMode::Bundled => entries.iter().for_each(|entry| println!("{entry}")),
            EmitMode::Files => {
                println!("{}", name.bold());
                entries.iter().for_each(|entry| println!("  {entry}"));
            }
        }
    }
    Ok(())
}
