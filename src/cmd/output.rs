use std::io::Read;

use anyhow::{Context, Result};

use textcast::Artifact;

/// Resolve a text argument, reading stdin for `-`
pub fn read_text(arg: &str) -> Result<String> {
    if arg != "-" {
        return Ok(arg.to_string());
    }
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("failed to read text from stdin")?;
    Ok(text)
}

/// Print an artifact to stdout
pub fn print_artifact(artifact: &Artifact, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(artifact)?);
        return Ok(());
    }

    println!("{}", artifact.path.display());
    eprintln!(
        "✅ {:?} saved: {} ({:.2} MB)",
        artifact.kind,
        artifact.file_name,
        artifact.size_mb()
    );
    Ok(())
}
