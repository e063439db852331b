//! INI-like text format for timeline import/export.
//!
//! A timeline file is a sequence of named sections, each a flat set of `Key=Value`
//! pairs. Comments begin with `;` or `#`; blank lines are ignored:
//!
//! ```ini
//! [General]
//! Version=2
//! UseDegrees=1
//! PlaybackMode=1
//! LoopTimeOffset=2.5
//!
//! [TranslatePoint]
//! Time=0
//! X=10.5
//! Y=0
//! Z=-3
//! EaseIn=1
//! EaseOut=0
//! Interpolation=2
//! ```
//!
//! `[TranslatePoint]` and `[RotatePoint]` sections repeat, one per keyframe. Angles are
//! stored in degrees when `UseDegrees=1` and converted to/from radians on the way
//! through. This module only maps text to keyframes and back; the file I/O itself lives
//! with the caller.

use std::fmt::Write as _;

use log::warn;

use crate::errors::Error;
use crate::timelines::{
    Angles, Interpolation, PlaybackMode, RotationPoint, Timeline, Transition, TranslationPoint,
    Vector3,
};

/// Version written to exported files.
pub const FORMAT_VERSION: u32 = 2;

const SECTION_GENERAL: &str = "General";
const SECTION_TRANSLATE: &str = "TranslatePoint";
const SECTION_ROTATE: &str = "RotatePoint";

/// One `Key=Value` entry, with the line it came from for diagnostics.
#[derive(Clone, Debug)]
struct Entry {
    key: String,
    value: String,
    line: usize,
}

/// One named `[Section]` with its flat key/value entries.
#[derive(Clone, Debug)]
pub struct Section {
    name: String,
    line: usize,
    entries: Vec<Entry>,
}

impl Section {
    fn new<S: Into<String>>(name: S, line: usize) -> Self {
        Self {
            name: name.into(),
            line,
            entries: vec![],
        }
    }

    /// Returns the section name (without brackets).
    pub fn get_name(&self) -> &str {
        &self.name
    }

    /// Returns the raw value for `key`, if present (last occurrence wins).
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value.as_str())
    }

    fn get_f32(&self, key: &str) -> Result<Option<f32>, Error> {
        match self.entries.iter().rev().find(|entry| entry.key == key) {
            None => Ok(None),
            Some(entry) => entry.value.parse::<f32>().map(Some).map_err(|_| {
                Error::ParseFailure {
                    line: entry.line,
                    info: format!("invalid number for `{}`: `{}`", key, entry.value),
                }
            }),
        }
    }

    fn require_f32(&self, key: &str) -> Result<f32, Error> {
        self.get_f32(key)?.ok_or(Error::ParseFailure {
            line: self.line,
            info: format!("missing `{}` in [{}]", key, self.name),
        })
    }

    fn get_bool(&self, key: &str, default: bool) -> Result<bool, Error> {
        match self.entries.iter().rev().find(|entry| entry.key == key) {
            None => Ok(default),
            Some(entry) => match entry.value.as_str() {
                "0" => Ok(false),
                "1" => Ok(true),
                other => Err(Error::ParseFailure {
                    line: entry.line,
                    info: format!("invalid flag for `{}`: `{}` (expected 0 or 1)", key, other),
                }),
            },
        }
    }
}

/// Splits a timeline file into its sections.
pub fn parse_sections(text: &str) -> Result<Vec<Section>, Error> {
    let mut sections: Vec<Section> = vec![];

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with('#') {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix('[') {
            let name = rest.strip_suffix(']').ok_or(Error::ParseFailure {
                line,
                info: format!("unterminated section header `{}`", trimmed),
            })?;
            sections.push(Section::new(name.trim(), line));
        } else if let Some((key, value)) = trimmed.split_once('=') {
            let section = sections.last_mut().ok_or(Error::ParseFailure {
                line,
                info: "entry outside of any section".to_string(),
            })?;
            section.entries.push(Entry {
                key: key.trim().to_string(),
                value: value.trim().to_string(),
                line,
            });
        } else {
            return Err(Error::ParseFailure {
                line,
                info: format!("expected `Key=Value`, got `{}`", trimmed),
            });
        }
    }

    Ok(sections)
}

/// The staged content of a timeline file: fully parsed and validated before anything
/// touches a live timeline.
#[derive(Clone, Debug, Default)]
pub struct TimelineFile {
    pub playback_mode: PlaybackMode,
    pub loop_time_offset: f32,
    pub translation_points: Vec<TranslationPoint>,
    pub rotation_points: Vec<RotationPoint>,
}

impl TimelineFile {
    /// Captures the serializable content of a timeline.
    pub fn from_timeline(timeline: &Timeline) -> Self {
        Self {
            playback_mode: timeline.get_playback_mode(),
            loop_time_offset: timeline.get_loop_time_offset(),
            translation_points: timeline.translation().path().points().to_vec(),
            rotation_points: timeline.rotation().path().points().to_vec(),
        }
    }

    /// Replaces the content of `timeline` with this file's keyframes and settings.
    pub fn apply_to(&self, timeline: &mut Timeline) {
        timeline.clear();
        timeline.set_playback_mode(self.playback_mode);
        timeline.set_loop_time_offset(self.loop_time_offset);
        for point in &self.translation_points {
            timeline.translation_mut().path_mut().add_point(*point);
        }
        for point in &self.rotation_points {
            timeline.rotation_mut().path_mut().add_point(*point);
        }
    }

    /// Parses a complete timeline file.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let sections = parse_sections(text)?;

        let mut file = TimelineFile::default();
        let mut use_degrees = true;

        // [General] first, so the degrees flag is known before any point section.
        if let Some(general) = sections
            .iter()
            .find(|section| section.get_name() == SECTION_GENERAL)
        {
            if let Some(version) = general.get_f32("Version")? {
                if version as u32 > FORMAT_VERSION {
                    warn!(
                        "Timeline file version {} is newer than supported version {}",
                        version, FORMAT_VERSION
                    );
                }
            }
            use_degrees = general.get_bool("UseDegrees", true)?;
            if let Some(code) = general.get_f32("PlaybackMode")? {
                file.playback_mode =
                    PlaybackMode::from_code(code as u8).ok_or(Error::ParseFailure {
                        line: general.line,
                        info: format!("invalid playback mode `{}`", code),
                    })?;
            }
            file.loop_time_offset = general.get_f32("LoopTimeOffset")?.unwrap_or(0.0).max(0.0);
        }

        for section in &sections {
            match section.get_name() {
                SECTION_TRANSLATE => {
                    let transition = parse_transition(section)?;
                    let value = Vector3::new(
                        section.require_f32("X")?,
                        section.require_f32("Y")?,
                        section.require_f32("Z")?,
                    );
                    file.translation_points
                        .push(TranslationPoint::new(value, transition));
                }
                SECTION_ROTATE => {
                    let transition = parse_transition(section)?;
                    let mut pitch = section.require_f32("Pitch")?;
                    let mut yaw = section.require_f32("Yaw")?;
                    if use_degrees {
                        pitch = pitch.to_radians();
                        yaw = yaw.to_radians();
                    }
                    file.rotation_points
                        .push(RotationPoint::new(Angles::new(pitch, yaw), transition));
                }
                // Unknown sections are tolerated for forward compatibility.
                _ => (),
            }
        }

        Ok(file)
    }

    /// Serializes the file back to text. Angles are written in degrees when
    /// `use_degrees` is set.
    pub fn to_text(&self, use_degrees: bool) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "[{}]", SECTION_GENERAL);
        let _ = writeln!(out, "Version={}", FORMAT_VERSION);
        let _ = writeln!(out, "UseDegrees={}", u8::from(use_degrees));
        let _ = writeln!(out, "PlaybackMode={}", self.playback_mode.as_code());
        let _ = writeln!(out, "LoopTimeOffset={}", self.loop_time_offset);

        for point in &self.translation_points {
            let _ = writeln!(out);
            let _ = writeln!(out, "[{}]", SECTION_TRANSLATE);
            write_transition(&mut out, &point.transition);
            let _ = writeln!(out, "X={}", point.value.x);
            let _ = writeln!(out, "Y={}", point.value.y);
            let _ = writeln!(out, "Z={}", point.value.z);
        }

        for point in &self.rotation_points {
            let (pitch, yaw) = if use_degrees {
                (point.angles.pitch.to_degrees(), point.angles.yaw.to_degrees())
            } else {
                (point.angles.pitch, point.angles.yaw)
            };
            let _ = writeln!(out);
            let _ = writeln!(out, "[{}]", SECTION_ROTATE);
            write_transition(&mut out, &point.transition);
            let _ = writeln!(out, "Pitch={}", pitch);
            let _ = writeln!(out, "Yaw={}", yaw);
        }

        out
    }
}

fn parse_transition(section: &Section) -> Result<Transition, Error> {
    let time = section.require_f32("Time")?;
    // Ease flags default to 1 when absent.
    let ease_in = section.get_bool("EaseIn", true)?;
    let ease_out = section.get_bool("EaseOut", true)?;
    let interpolation = match section.get_f32("Interpolation")? {
        None => Interpolation::Linear,
        Some(code) => Interpolation::from_code(code as u8).ok_or(Error::ParseFailure {
            line: section.line,
            info: format!("invalid interpolation mode `{}`", code),
        })?,
    };
    Ok(Transition::new(time)
        .set_interpolation(interpolation)
        .set_ease_in(ease_in)
        .set_ease_out(ease_out))
}

fn write_transition(out: &mut String, transition: &Transition) {
    let _ = writeln!(out, "Time={}", transition.time);
    let _ = writeln!(out, "EaseIn={}", u8::from(transition.ease_in));
    let _ = writeln!(out, "EaseOut={}", u8::from(transition.ease_out));
    let _ = writeln!(
        out,
        "Interpolation={}",
        transition.interpolation.as_code()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_file() -> TimelineFile {
        let mut file = TimelineFile {
            playback_mode: PlaybackMode::Loop,
            loop_time_offset: 2.5,
            ..Default::default()
        };
        file.translation_points.push(TranslationPoint::new(
            Vector3::new(1.0, -2.0, 3.5),
            Transition::new(0.0)
                .set_interpolation(Interpolation::CubicHermite)
                .set_ease_in(true)
                .set_ease_out(false),
        ));
        file.translation_points.push(TranslationPoint::new(
            Vector3::new(10.0, 0.0, 0.0),
            Transition::new(4.25),
        ));
        file.rotation_points.push(RotationPoint::new(
            Angles::new(0.5, -1.25),
            Transition::new(1.5).set_ease_out(false),
        ));
        file
    }

    #[test]
    fn test_parse_sections_skips_comments_and_blanks() {
        let text = "\
; leading comment
[General]
Version=2

# another comment
UseDegrees=1
[TranslatePoint]
Time=0
";
        let sections = parse_sections(text).unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].get_name(), "General");
        assert_eq!(sections[0].get("Version"), Some("2"));
        assert_eq!(sections[0].get("UseDegrees"), Some("1"));
        assert_eq!(sections[1].get("Time"), Some("0"));
        assert_eq!(sections[1].get("Missing"), None);
    }

    #[test]
    fn test_parse_sections_failures() {
        let error = parse_sections("[General\nVersion=2\n").unwrap_err();
        assert!(matches!(error, Error::ParseFailure { line: 1, .. }));

        let error = parse_sections("Version=2\n").unwrap_err();
        assert!(matches!(error, Error::ParseFailure { line: 1, .. }));

        let error = parse_sections("[General]\nnot a pair\n").unwrap_err();
        assert!(matches!(error, Error::ParseFailure { line: 2, .. }));
    }

    #[test]
    fn test_parse_minimal_point_defaults() {
        let text = "\
[TranslatePoint]
Time=1.5
X=1
Y=2
Z=3
";
        let file = TimelineFile::parse(text).unwrap();
        assert_eq!(file.translation_points.len(), 1);
        let point = &file.translation_points[0];
        assert_eq!(point.transition.time, 1.5);
        // Ease flags default to 1 when absent; interpolation defaults to Linear.
        assert!(point.transition.ease_in);
        assert!(point.transition.ease_out);
        assert_eq!(point.transition.interpolation, Interpolation::Linear);
        // No [General] section: End mode, no loop offset.
        assert_eq!(file.playback_mode, PlaybackMode::End);
        assert_eq!(file.loop_time_offset, 0.0);
    }

    #[test]
    fn test_parse_missing_key_fails() {
        let text = "[TranslatePoint]\nTime=0\nX=1\nY=2\n";
        let error = TimelineFile::parse(text).unwrap_err();
        assert!(matches!(error, Error::ParseFailure { .. }));
        assert!(format!("{}", error).contains("`Z`"));
    }

    #[test]
    fn test_parse_invalid_values_fail() {
        let error = TimelineFile::parse("[TranslatePoint]\nTime=abc\nX=0\nY=0\nZ=0\n").unwrap_err();
        assert!(matches!(error, Error::ParseFailure { line: 2, .. }));

        let error =
            TimelineFile::parse("[TranslatePoint]\nTime=0\nX=0\nY=0\nZ=0\nEaseIn=2\n").unwrap_err();
        assert!(matches!(error, Error::ParseFailure { line: 6, .. }));

        let error = TimelineFile::parse("[General]\nPlaybackMode=4\n").unwrap_err();
        assert!(matches!(error, Error::ParseFailure { .. }));
    }

    #[test]
    fn test_degrees_conversion_on_parse() {
        let text = "\
[General]
UseDegrees=1
[RotatePoint]
Time=0
Pitch=90
Yaw=-180
";
        let file = TimelineFile::parse(text).unwrap();
        let point = &file.rotation_points[0];
        assert!((point.angles.pitch - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
        assert!((point.angles.yaw + std::f32::consts::PI).abs() < 1e-5);

        // UseDegrees=0 takes the values as radians.
        let text = "\
[General]
UseDegrees=0
[RotatePoint]
Time=0
Pitch=1.5
Yaw=-0.5
";
        let file = TimelineFile::parse(text).unwrap();
        let point = &file.rotation_points[0];
        assert_eq!(point.angles.pitch, 1.5);
        assert_eq!(point.angles.yaw, -0.5);
    }

    #[test]
    fn test_round_trip() {
        let file = sample_file();
        let text = file.to_text(true);
        let parsed = TimelineFile::parse(&text).unwrap();

        assert_eq!(parsed.playback_mode, PlaybackMode::Loop);
        assert_eq!(parsed.loop_time_offset, 2.5);
        assert_eq!(parsed.translation_points.len(), 2);
        assert_eq!(parsed.rotation_points.len(), 1);

        for (original, restored) in file
            .translation_points
            .iter()
            .zip(parsed.translation_points.iter())
        {
            // Times and flags survive exactly; values within floating-point tolerance.
            assert_eq!(original.transition, restored.transition);
            assert!(original.value.nearly_equals(&restored.value));
        }
        for (original, restored) in file.rotation_points.iter().zip(parsed.rotation_points.iter())
        {
            assert_eq!(original.transition, restored.transition);
            // Degree/radian conversion round-trips within 1e-4.
            assert!(original.angles.nearly_equals(&restored.angles));
        }
    }

    #[test]
    fn test_round_trip_radians() {
        let file = sample_file();
        let parsed = TimelineFile::parse(&file.to_text(false)).unwrap();
        assert_eq!(
            parsed.rotation_points[0].angles,
            file.rotation_points[0].angles
        );
    }

    #[test]
    fn test_apply_to_replaces_content() {
        use crate::timelines::Timeline;

        let mut timeline = Timeline::new(1);
        timeline.translation_mut().path_mut().add_point(TranslationPoint::new(
            Vector3::new(99.0, 99.0, 99.0),
            Transition::new(9.0),
        ));

        let file = sample_file();
        file.apply_to(&mut timeline);

        assert_eq!(timeline.translation().path().len(), 2);
        assert_eq!(timeline.rotation().path().len(), 1);
        assert_eq!(timeline.get_playback_mode(), PlaybackMode::Loop);
        assert_eq!(timeline.get_loop_time_offset(), 2.5);
        // The pre-existing point is gone.
        assert_eq!(timeline.translation().path().get_point(0).unwrap().value.x, 1.0);
    }

    #[test]
    fn test_unknown_sections_ignored() {
        let text = "\
[General]
Version=2
[FutureThing]
Whatever=1
[TranslatePoint]
Time=0
X=0
Y=0
Z=0
";
        let file = TimelineFile::parse(text).unwrap();
        assert_eq!(file.translation_points.len(), 1);
    }
}
