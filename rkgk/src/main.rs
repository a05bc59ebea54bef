#![warn(clippy::pedantic)]

mod io;
mod preferences;
mod script;

use anyhow::Result as AnyResult;
use std::path::Path;

/// Play back one script, writing its result. Returns the output path.
fn render(path: &Path, library: &[rkgk_core::brush::Brush]) -> AnyResult<std::path::PathBuf> {
    use anyhow::Context;

    let script = script::Script::read(path).context("reading script")?;
    let session = script.run(path, library)?;
    let output = script.output_path(path);
    io::write_path(&output, &session.export())
        .with_context(|| format!("writing {output:?}"))?;
    Ok(output)
}

fn main() -> AnyResult<()> {
    let has_term = std::io::IsTerminal::is_terminal(&std::io::stdin());
    // Log to a terminal, if available. Else, log to "log.out" in the working directory.
    if has_term {
        env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        let _ = simple_logging::log_to_file("log.out", log::LevelFilter::Debug);
    }

    // Args are a simple list of script paths.
    let paths: Vec<std::path::PathBuf> = std::env::args_os().skip(1).map(Into::into).collect();
    if paths.is_empty() {
        eprintln!("usage: {} <script.toml>...", env!("CARGO_PKG_NAME"));
        return Ok(());
    }

    let preferences = preferences::Preferences::load();
    if preferences.did_fail_to_load() {
        log::info!("using the default brush library");
    }
    let library = &preferences.library.brushes;

    let failures = {
        use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
        // Scripts are independent, each gets its own session.
        paths
            .par_iter()
            .filter(|path| match render(path, library) {
                Ok(output) => {
                    log::info!("{path:?} -> {output:?}");
                    false
                }
                Err(e) => {
                    log::error!("failed to run {path:?}: {e:#}");
                    true
                }
            })
            .count()
    };

    // Give the user a documented file to edit, but never overwrite one.
    if preferences.is_missing() {
        if let Err(e) = preferences.save() {
            log::warn!("Failed to save brush library:\n{e:?}");
        };
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {} scripts failed", paths.len());
    }
    Ok(())
}
