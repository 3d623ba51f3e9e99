use std::path::PathBuf;

use anyhow::Result;

use textcast::{Config, GenerationRequest, Generator};

use super::output::{print_artifact, read_text};

pub async fn cmd_speak(
    config: &Config,
    text: &str,
    output: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let text = read_text(text)?;
    let request = GenerationRequest::audio(text);
    request.validate()?;

    eprintln!("🔊 Synthesizing {} characters", request.text().chars().count());

    let generator = Generator::new(config)?;
    let artifact = match output {
        Some(path) => generator.generate_to(&request, &path).await?,
        None => generator.generate(&request).await?,
    };

    print_artifact(&artifact, json)
}
