use anyhow::Result;

use textcast::{Config, Generator};

pub async fn cmd_check(config: &Config, json: bool) -> Result<()> {
    let generator = Generator::new(config)?;
    let report = generator.check_dependencies().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let mark = |ok: bool| if ok { "✅" } else { "❌" };
        println!("{} ffmpeg: {}", mark(report.ffmpeg_available), report.ffmpeg_path);
        println!("ℹ️  font: {}", report.font);
        println!(
            "{} output dir: {}",
            mark(report.output_dir_writable),
            report.output_dir.display()
        );
    }

    if !report.is_ready() {
        anyhow::bail!("video generation is not available on this system");
    }
    Ok(())
}
