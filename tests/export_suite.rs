#[allow(dead_code)]
#[path = "../src/bin/render_frames.rs"]
mod render_frames;

use clap::Parser;
use lounge_viz::palette::ColorScheme;
use lounge_viz::params::Mode;
use std::path::{Path, PathBuf};

#[test]
fn parse_args_defaults_are_stable() {
    let args = render_frames::Cli::try_parse_from(["render_frames"]).expect("parse should succeed");

    assert!(args.items.is_empty());
    assert_eq!(args.mode, Mode::Bars);
    assert_eq!(args.scheme, ColorScheme::Neon);
    assert_eq!(args.width, 320);
    assert_eq!(args.height, 180);
    assert_eq!(args.frames, 120);
    assert_eq!(args.fps, 30);
    assert_eq!(args.out, PathBuf::from("frames"));
    assert_eq!(args.log_level, "info");
}

#[test]
fn parse_args_overrides_work() {
    let args = render_frames::Cli::try_parse_from([
        "render_frames",
        "song.mp3",
        "cover.png",
        "--mode",
        "kaleido",
        "--scheme",
        "vaporwave",
        "--width",
        "64",
        "--height",
        "48",
        "--frames",
        "3",
        "--fps",
        "24",
        "--intensity",
        "90",
        "--out",
        "clips/run1",
        "--seed",
        "7",
    ])
    .expect("parse should succeed");

    assert_eq!(args.items, vec!["song.mp3".to_string(), "cover.png".to_string()]);
    assert_eq!(args.mode, Mode::Kaleidoscope);
    assert_eq!(args.scheme, ColorScheme::Vaporwave);
    assert_eq!((args.width, args.height), (64, 48));
    assert_eq!(args.frames, 3);
    assert_eq!(args.fps, 24);
    assert_eq!(args.intensity, 90.0);
    assert_eq!(args.out, PathBuf::from("clips/run1"));
    assert_eq!(args.seed, 7);
}

#[test]
fn parse_rejects_unknown_mode() {
    let err = render_frames::Cli::try_parse_from(["render_frames", "--mode", "lasers"]);
    assert!(err.is_err());
}

#[test]
fn validate_rejects_zero_sizes() {
    for flag in ["--width", "--height", "--frames", "--fps"] {
        let args = render_frames::Cli::try_parse_from(["render_frames", flag, "0"])
            .expect("parse should succeed");
        let err = render_frames::validate_args(&args).expect_err("zero must be rejected");
        assert!(err.to_string().contains(flag), "{flag}: {err}");
    }
    let ok = render_frames::Cli::try_parse_from(["render_frames"]).unwrap();
    assert!(render_frames::validate_args(&ok).is_ok());
}

#[test]
fn frame_paths_are_zero_padded() {
    assert_eq!(
        render_frames::frame_path(Path::new("out"), 7),
        PathBuf::from("out/frame_0007.ppm")
    );
    assert_eq!(
        render_frames::frame_path(Path::new("out"), 12345),
        PathBuf::from("out/frame_12345.ppm")
    );
}

#[test]
fn ppm_drops_alpha_and_writes_header() {
    let rgba = [1u8, 2, 3, 255, 4, 5, 6, 128];
    let mut out = Vec::new();
    render_frames::write_ppm(&mut out, 2, 1, &rgba).unwrap();
    let header = b"P6\n2 1\n255\n";
    assert_eq!(&out[..header.len()], header);
    assert_eq!(&out[header.len()..], &[1, 2, 3, 4, 5, 6]);
}

#[test]
fn ppm_rejects_short_buffer() {
    let mut out = Vec::new();
    assert!(render_frames::write_ppm(&mut out, 4, 4, &[0u8; 16]).is_err());
}
