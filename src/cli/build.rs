//! `sheaf build`.

use anyhow::{Result, bail};
use sheaf::utils::plural::plural_count;
use sheaf::{BuildOutcome, Engine, debug, log};

/// Counts of one round of builds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub built: usize,
    pub fresh: usize,
    pub failed: usize,
}

pub fn run(engine: &Engine, bundles: &[String], clean: bool) -> Result<()> {
    let names = super::select(engine, bundles)?;

    if clean {
        for name in &names {
            if engine.clean(name)? {
                debug!("clean"; "removed {}", name);
            }
        }
    }

    let summary = build(engine, &names);
    if summary.failed > 0 {
        bail!("{} failed", plural_count(summary.failed, "bundle"));
    }

    log!(
        "build";
        "{} built, {} up to date",
        plural_count(summary.built, "bundle"),
        summary.fresh
    );
    Ok(())
}

/// Build `names` concurrently, logging each failure.
pub fn build(engine: &Engine, names: &[String]) -> Summary {
    let mut summary = Summary::default();

    for (name, result) in engine.build_many(names.iter().map(String::as_str)) {
        match result {
            Ok(BuildOutcome::Built) => summary.built += 1,
            Ok(BuildOutcome::Fresh) => summary.fresh += 1,
            Err(err) => {
                summary.failed += 1;
                log!("error"; "{}: {:#}", name, anyhow::Error::from(err));
            }
        }
    }

    summary
}
