use anyhow::{anyhow, Context, Result};
use rec3d_model::{CameraSpec, SpaceSpec};
use std::collections::BTreeMap;

const SPACE_SECTION: &str = "SPACE";
const CAMERA_SECTION: &str = "CAMERA";
const BASIS_SEPARATOR: char = '|';

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub space: SpaceSpec,
    pub camera: CameraSpec,
}

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    line: usize,
}

type Section = BTreeMap<String, Entry>;

pub fn parse_engine_config(text: &str) -> Result<EngineConfig> {
    let sections = parse_sections(text)?;

    let space = sections
        .get(SPACE_SECTION)
        .ok_or_else(|| anyhow!("missing [{SPACE_SECTION}] section"))?;
    let space = parse_space(space)?;

    let camera = match sections.get(CAMERA_SECTION) {
        Some(section) => parse_camera(section)?,
        None => CameraSpec::default(),
    };

    Ok(EngineConfig { space, camera })
}

/// Parses a comma-separated list of reals, e.g. `1, 0.5, -2`.
pub fn parse_reals(text: &str) -> Result<Vec<f64>> {
    text.split(',')
        .map(|token| {
            let token = token.trim();
            if token.is_empty() {
                return Err(anyhow!("empty coordinate in {text:?}"));
            }
            let value: f64 = token
                .parse()
                .map_err(|_| anyhow!("invalid number: {token:?}"))?;
            if !value.is_finite() {
                return Err(anyhow!("non-finite number: {token:?}"));
            }
            Ok(value)
        })
        .collect()
}

fn parse_sections(text: &str) -> Result<BTreeMap<String, Section>> {
    let mut sections: BTreeMap<String, Section> = BTreeMap::new();
    let mut current: Option<String> = None;

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix('[') {
            let name = rest
                .strip_suffix(']')
                .ok_or_else(|| anyhow!("line {line_no}: unterminated section header"))?
                .trim()
                .to_ascii_uppercase();
            if name.is_empty() {
                return Err(anyhow!("line {line_no}: empty section name"));
            }
            sections.entry(name.clone()).or_default();
            current = Some(name);
            continue;
        }

        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| anyhow!("line {line_no}: expected `key = value`, got {line:?}"))?;
        let key = key.trim().to_ascii_lowercase();
        if key.is_empty() {
            return Err(anyhow!("line {line_no}: missing key"));
        }

        let section_name = current
            .as_ref()
            .ok_or_else(|| anyhow!("line {line_no}: `{key}` appears before any section header"))?;
        let section = sections.entry(section_name.clone()).or_default();
        if let Some(previous) = section.get(&key) {
            return Err(anyhow!(
                "line {line_no}: duplicate key `{key}` in [{section_name}] (first set on line {})",
                previous.line
            ));
        }
        section.insert(
            key,
            Entry {
                value: value.trim().to_string(),
                line: line_no,
            },
        );
    }

    Ok(sections)
}

fn strip_comment(line: &str) -> &str {
    match line.find(|c| c == ';' || c == '#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

fn parse_space(section: &Section) -> Result<SpaceSpec> {
    let init_point = required(section, SPACE_SECTION, "init_point")?;
    let basis = required(section, SPACE_SECTION, "basis")?;

    let init_point = parse_reals(&init_point.value)
        .with_context(|| format!("line {}: invalid init_point", init_point.line))?;

    let basis = basis
        .value
        .split(BASIS_SEPARATOR)
        .map(parse_reals)
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("line {}: invalid basis", basis.line))?;

    Ok(SpaceSpec { init_point, basis })
}

fn parse_camera(section: &Section) -> Result<CameraSpec> {
    let mut camera = CameraSpec::default();

    if let Some(entry) = section.get("position") {
        camera.position = Some(parse_triple(entry).context("invalid camera position")?);
    }
    if let Some(entry) = section.get("facing") {
        camera.facing = Some(parse_triple(entry).context("invalid camera facing")?);
    }
    if let Some(entry) = section.get("fov") {
        let fov: f64 = entry
            .value
            .parse()
            .map_err(|_| anyhow!("line {}: invalid fov: {:?}", entry.line, entry.value))?;
        camera.fov = Some(fov);
    }
    if let Some(entry) = section.get("height") {
        let height: usize = entry
            .value
            .parse()
            .map_err(|_| anyhow!("line {}: invalid height: {:?}", entry.line, entry.value))?;
        camera.height = Some(height);
    }

    Ok(camera)
}

fn parse_triple(entry: &Entry) -> Result<[f64; 3]> {
    let values = parse_reals(&entry.value).with_context(|| format!("line {}", entry.line))?;
    <[f64; 3]>::try_from(values.as_slice()).map_err(|_| {
        anyhow!(
            "line {}: expected 3 coordinates, found {}",
            entry.line,
            values.len()
        )
    })
}

fn required<'a>(section: &'a Section, section_name: &str, key: &str) -> Result<&'a Entry> {
    section
        .get(key)
        .ok_or_else(|| anyhow!("missing `{key}` in [{section_name}]"))
}
