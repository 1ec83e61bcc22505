//! Command line options.

use std::path::PathBuf;

use anyhow::{bail, Context};

/// Frames rendered by a headless run when `--frames` is not given.
const DEFAULT_HEADLESS_FRAMES: u64 = 120;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ViewerArgs {
    pub headless: bool,
    pub frames: Option<u64>,
    pub gltf: Option<PathBuf>,
    pub fps: Option<u32>,
    pub help: bool,
}

impl ViewerArgs {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::parse(std::env::args().skip(1))
    }

    pub fn parse(args: impl IntoIterator<Item = String>) -> anyhow::Result<Self> {
        let mut parsed = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => parsed.help = true,
                "--headless" => parsed.headless = true,
                "--frames" => {
                    let value = args.next().context("--frames needs a value")?;
                    let frames = value
                        .parse()
                        .with_context(|| format!("invalid frame count '{value}'"))?;
                    parsed.frames = Some(frames);
                }
                "--fps" => {
                    let value = args.next().context("--fps needs a value")?;
                    let fps = value
                        .parse()
                        .with_context(|| format!("invalid fps '{value}'"))?;
                    parsed.fps = Some(fps);
                }
                "--gltf" => {
                    parsed.gltf = Some(args.next().context("--gltf needs a path")?.into());
                }
                other => bail!("unknown argument '{other}' (see --help)"),
            }
        }

        Ok(parsed)
    }

    /// Iteration limit; headless runs always have one.
    pub fn frame_limit(&self) -> Option<u64> {
        self.frames
            .or_else(|| self.headless.then_some(DEFAULT_HEADLESS_FRAMES))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<ViewerArgs> {
        ViewerArgs::parse(args.iter().map(|arg| (*arg).to_string()))
    }

    #[test]
    fn empty_is_windowed_and_unbounded() {
        let args = parse(&[]).unwrap();
        assert_eq!(args, ViewerArgs::default());
        assert_eq!(args.frame_limit(), None);
    }

    #[test]
    fn parses_all_flags() {
        let args = parse(&[
            "--headless",
            "--frames",
            "10",
            "--fps",
            "30",
            "--gltf",
            "scene.glb",
        ])
        .unwrap();
        assert!(args.headless);
        assert_eq!(args.frame_limit(), Some(10));
        assert_eq!(args.fps, Some(30));
        assert_eq!(args.gltf, Some(PathBuf::from("scene.glb")));
    }

    #[test]
    fn headless_has_a_default_limit() {
        assert_eq!(
            parse(&["--headless"]).unwrap().frame_limit(),
            Some(DEFAULT_HEADLESS_FRAMES)
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse(&["--frames"]).is_err());
        assert!(parse(&["--fps", "fast"]).is_err());
        assert!(parse(&["--fullscreen"]).is_err());
    }
}
