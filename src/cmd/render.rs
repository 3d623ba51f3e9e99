use std::path::PathBuf;

use anyhow::Result;

use textcast::{ClipDuration, Config, GenerationRequest, Generator, VideoStyle};

use super::output::{print_artifact, read_text};

pub async fn cmd_render(
    config: &Config,
    text: &str,
    background: &str,
    color: &str,
    duration: ClipDuration,
    output: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let text = read_text(text)?;
    let style = VideoStyle::default()
        .with_background(background)
        .with_text_color(color)
        .with_duration(duration);
    let request = GenerationRequest::video(text, style.clone());
    request.validate()?;

    eprintln!("🎬 Rendering {duration} clip");
    eprintln!("   Background: {}", style.background);
    eprintln!("   Text color: {}", style.text_color);

    let generator = Generator::new(config)?;
    let start = std::time::Instant::now();
    let artifact = match output {
        Some(path) => generator.generate_to(&request, &path).await?,
        None => generator.generate(&request).await?,
    };
    eprintln!("   Done in {:.1}s", start.elapsed().as_secs_f64());

    print_artifact(&artifact, json)
}
