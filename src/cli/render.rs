//! `render` command: generate one configuration straight to disk.

use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    config::AppConfig,
    log,
    render::{self, Output, Rasterizer},
    schema::AvatarConfig,
    validate::validate_config,
};

/// Render the configuration in `input`, returning the files written.
pub fn render_file(config: &AppConfig, input: &Path, output: Option<&Path>) -> Result<Vec<PathBuf>> {
    let avatar = read_config(input)?;
    let rasterizer = Rasterizer::new(config.render.load_system_fonts, config.render.font_dirs.as_slice());
    let artifact = render::produce(&avatar, &rasterizer)?;

    let written = write_output(artifact, output)?;
    for path in &written {
        log!("render"; "{}", path.display());
    }
    Ok(written)
}

/// Load and validate a bare configuration or a `{"config": ...}` envelope.
fn read_config(input: &Path) -> Result<AvatarConfig> {
    let content = fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", input.display()))?;

    let config = match value.get("config") {
        Some(inner) if inner.is_object() => inner,
        _ => &value,
    };
    match validate_config(config) {
        Ok(config) => Ok(config),
        Err(e) => match e.details() {
            Some(details) => bail!("{e}: {details}"),
            None => bail!("{e}"),
        },
    }
}

fn default_output(artifact: &Output) -> PathBuf {
    let ext = match artifact {
        Output::Svg(_) | Output::Favicons(_) => "svg",
        Output::Raster { format, .. } => format.extension(),
    };
    PathBuf::from(format!("avatar.{ext}"))
}

/// Write the artifact; favicon sets fan out to `<stem>-<size>.svg`.
fn write_output(artifact: Output, output: Option<&Path>) -> Result<Vec<PathBuf>> {
    let target = output.map_or_else(|| default_output(&artifact), Path::to_path_buf);
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    match artifact {
        Output::Favicons(set) => {
            let stem = target
                .file_stem()
                .map_or_else(|| "avatar".into(), |s| s.to_string_lossy());
            let dir = target.parent().unwrap_or_else(|| Path::new(""));
            set.iter()
                .map(|(size, svg)| {
                    let path = dir.join(format!("{stem}-{size}.svg"));
                    fs::write(&path, svg)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    Ok::<_, anyhow::Error>(path)
                })
                .collect()
        }
        other => {
            fs::write(&target, other.into_bytes())
                .with_context(|| format!("Failed to write {}", target.display()))?;
            Ok(vec![target])
        }
    }
}
