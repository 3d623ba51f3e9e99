//! Integration tests for video rendering.
//!
//! Encoder behavior is simulated with small shell scripts standing in for
//! ffmpeg, so these run without ffmpeg installed. The real-ffmpeg test is
//! skipped when no ffmpeg binary is on `PATH`.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use textcast::video::{Encoder, EncoderConfig, VideoRenderer};
use textcast::{FailureKind, GenerationError};

/// Records its arguments and the number of input frames, then writes a
/// small output file.
const RECORDING_ENCODER: &str = r#"#!/bin/sh
prev=""
for arg; do
  if [ "$prev" = "-i" ]; then input="$arg"; fi
  prev="$arg"
  last="$arg"
done
ls "$(dirname "$input")" | wc -l | tr -d ' ' > "$last.frames"
echo "$@" > "$last.args"
printf 'fake mp4 payload' > "$last"
"#;

fn stand_in(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn renderer(dir: &Path, ffmpeg: &Path, timeout: Duration) -> VideoRenderer {
    VideoRenderer::default()
        .with_fonts(Vec::new())
        .with_work_dir(dir.join("work"))
        .with_encoder(Encoder::with_config(
            EncoderConfig::default()
                .with_ffmpeg_path(&ffmpeg.display().to_string())
                .with_timeout(timeout),
        ))
}

fn work_dir_is_empty(dir: &Path) -> bool {
    std::fs::read_dir(dir.join("work"))
        .map(|mut d| d.next().is_none())
        .unwrap_or(true)
}

// ─── Success ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn five_second_clip_has_75_frames() {
    let dir = tempfile::tempdir().unwrap();
    let ffmpeg = stand_in(dir.path(), "ffmpeg.sh", RECORDING_ENCODER);
    let renderer = renderer(dir.path(), &ffmpeg, Duration::from_secs(60));
    let out = dir.path().join("hello.mp4");

    let report = renderer
        .try_render("Hello World", &out, "#000000", "#FFFFFF", 5)
        .await
        .unwrap();

    assert_eq!(report.frames, 75);
    assert!(report.size_bytes > 0);
    let frames = std::fs::read_to_string(dir.path().join("hello.mp4.frames")).unwrap();
    assert_eq!(frames.trim(), "75");

    let args = std::fs::read_to_string(dir.path().join("hello.mp4.args")).unwrap();
    for flag in ["-y", "-framerate 15", "-c:v libx264", "-crf 28", "-preset fast", "-pix_fmt yuv420p", "-t 5"] {
        assert!(args.contains(flag), "missing {flag} in {args}");
    }

    assert!(work_dir_is_empty(dir.path()));
}

#[tokio::test]
async fn long_text_renders_with_bool_contract() {
    let dir = tempfile::tempdir().unwrap();
    let ffmpeg = stand_in(dir.path(), "ffmpeg.sh", RECORDING_ENCODER);
    let renderer = renderer(dir.path(), &ffmpeg, Duration::from_secs(60));
    let out = dir.path().join("long.mp4");
    let text = "word ".repeat(200);

    assert!(renderer.render_video(&text, &out, "#102030", "#F0E0D0", 10).await);
    let frames = std::fs::read_to_string(dir.path().join("long.mp4.frames")).unwrap();
    assert_eq!(frames.trim(), "150");
    assert!(work_dir_is_empty(dir.path()));
}

// ─── Encoder failures ────────────────────────────────────────────────────────

#[tokio::test]
async fn hanging_encoder_is_killed_and_cleaned_up() {
    let dir = tempfile::tempdir().unwrap();
    let ffmpeg = stand_in(dir.path(), "ffmpeg.sh", "#!/bin/sh\nexec sleep 30\n");
    let renderer = renderer(dir.path(), &ffmpeg, Duration::from_secs(1));
    let out = dir.path().join("hang.mp4");

    let start = Instant::now();
    let err = renderer
        .try_render("Hello", &out, "#000000", "#FFFFFF", 5)
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::EncoderTimeout(1)));
    assert!(start.elapsed() < Duration::from_secs(15));
    assert!(!out.exists());
    assert!(work_dir_is_empty(dir.path()));
}

#[tokio::test]
async fn failing_encoder_reports_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let ffmpeg = stand_in(
        dir.path(),
        "ffmpeg.sh",
        "#!/bin/sh\necho \"Unknown encoder 'libx264'\" >&2\nexit 1\n",
    );
    let renderer = renderer(dir.path(), &ffmpeg, Duration::from_secs(60));
    let out = dir.path().join("fail.mp4");

    let err = renderer
        .try_render("Hello", &out, "#000000", "#FFFFFF", 5)
        .await
        .unwrap_err();

    match err {
        GenerationError::Encoder { stderr, .. } => assert!(stderr.contains("libx264")),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!renderer.render_video("Hello", &out, "#000000", "#FFFFFF", 5).await);
    assert!(work_dir_is_empty(dir.path()));
}

#[tokio::test]
async fn empty_output_is_failure() {
    let dir = tempfile::tempdir().unwrap();
    let ffmpeg = stand_in(
        dir.path(),
        "ffmpeg.sh",
        "#!/bin/sh\nfor last; do :; done\n: > \"$last\"\n",
    );
    let renderer = renderer(dir.path(), &ffmpeg, Duration::from_secs(60));
    let out = dir.path().join("empty.mp4");

    let err = renderer
        .try_render("Hello", &out, "#000000", "#FFFFFF", 5)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::OutputVerification);
    assert!(!out.exists());
    assert!(!renderer.render_video("Hello", &out, "#000000", "#FFFFFF", 5).await);
    assert!(!out.exists());
    assert!(work_dir_is_empty(dir.path()));
}

#[tokio::test]
async fn missing_encoder_returns_false() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = renderer(
        dir.path(),
        Path::new("/nonexistent/ffmpeg-textcast"),
        Duration::from_secs(60),
    );
    let out = dir.path().join("none.mp4");

    assert!(!renderer.render_video("Hello", &out, "#000000", "#FFFFFF", 5).await);
    assert!(!out.exists());
    assert!(work_dir_is_empty(dir.path()));
}

// ─── Real ffmpeg ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn real_ffmpeg_produces_mp4() {
    let Ok(ffmpeg) = which::which("ffmpeg") else {
        eprintln!("ffmpeg not found, skipping");
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    let renderer = renderer(dir.path(), &ffmpeg, Duration::from_secs(60));
    let out = dir.path().join("real.mp4");

    let report = renderer
        .try_render("Hello World", &out, "#000000", "#FFFFFF", 5)
        .await
        .unwrap();
    assert!(report.size_bytes > 0);

    let header = std::fs::read(&out).unwrap();
    assert_eq!(&header[4..8], b"ftyp");
    assert!(work_dir_is_empty(dir.path()));
}
