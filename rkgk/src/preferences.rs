use rkgk_core::brush::Brush;

const DOCUMENTATION: &str = r#"# rkgk brush library. You may edit this file, but be aware that
# formatting and comments will not be preserved, and all keys are case sensitive.

# Each [[brush]] table is one brush. Names must be unique, later duplicates are ignored.
# Fields left out take their default value.
#   size, min_size          diameter in canvas pixels. min_size is used at zero pressure,
#                           if size_pressure is set.
#   opacity, min_opacity    0 to 255. min_opacity is used at zero pressure,
#                           if opacity_pressure is set.
#   spacing                 distance between dabs, as a fraction of the diameter, 0 to 1.
#   softness                0 to 1. The edge fades out over 1/softness pixels, so 1 is a crisp
#                           antialiased edge and 0.1 a ten pixel falloff. 0 is a hard edge.

# Example:
# [[brush]]
# name = "pencil"
# size = 3.0
# size_pressure = true
# min_size = 0.5

"#;

#[must_use]
pub fn preferences_dir() -> Option<std::path::PathBuf> {
    let mut base_dir = dirs::preference_dir()?;
    base_dir.push(env!("CARGO_PKG_NAME"));
    Some(base_dir)
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct BrushLibrary {
    #[serde(rename = "brush", default)]
    pub brushes: Vec<Brush>,
}
impl Default for BrushLibrary {
    fn default() -> Self {
        Self {
            brushes: vec![
                Brush {
                    size: 8.0,
                    softness: 1.0,
                    ..Brush::new(rkgk_core::session::DEFAULT_BRUSH_NAME)
                },
                Brush {
                    size: 24.0,
                    min_size: 4.0,
                    size_pressure: true,
                    opacity: 200,
                    opacity_pressure: true,
                    softness: 0.1,
                    spacing: 0.1,
                    ..Brush::new("soft round")
                },
            ],
        }
    }
}

pub struct Preferences {
    failed_to_load: bool,
    /// No file existed to load from. Only then is it safe to write one without
    /// clobbering the user's edits.
    missing: bool,
    pub library: BrushLibrary,
}
impl Preferences {
    const FILENAME: &'static str = "brushes.toml";
    /// Brush library saved and loaded from user preferences.
    /// (Or defaulted, if unavailable for some reason)
    #[must_use]
    pub fn load() -> Self {
        let mut dir = preferences_dir();
        match dir.as_mut() {
            None => Self::no_path(),
            Some(dir) => {
                dir.push(Self::FILENAME);
                Self::load_or_default(dir)
            }
        }
    }
    #[must_use]
    pub fn no_path() -> Self {
        log::warn!("Brush library wasn't available, defaulting.");
        Self {
            failed_to_load: true,
            missing: false,
            library: BrushLibrary::default(),
        }
    }
    #[must_use]
    fn load_or_default(path: &std::path::Path) -> Self {
        let library: anyhow::Result<BrushLibrary> = try_block::try_block! {
            let string = std::fs::read_to_string(path)?;
            let library : BrushLibrary = toml::from_str(&string)?;

            Ok(library)
        };

        match library {
            Ok(library) => Self {
                failed_to_load: false,
                missing: false,
                library,
            },
            Err(e) => {
                log::debug!("reading {path:?}: {e:#}");
                let missing = !path.exists();
                Self {
                    missing,
                    ..Self::no_path()
                }
            }
        }
    }
    /// Return true if loading user's settings failed. This can be useful for
    /// displaying a warning.
    #[must_use]
    pub fn did_fail_to_load(&self) -> bool {
        self.failed_to_load
    }
    /// Return true if there was no library on disk, and [`Self::save`] would create one.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.missing
    }
    /// Write the library, documentation included.
    /// # Errors
    /// If there is no preferences dir, or the write fails.
    pub fn save(&self) -> anyhow::Result<()> {
        let mut preferences =
            preferences_dir().ok_or_else(|| anyhow::anyhow!("No preferences dir found"))?;
        // Explicity do *not* create recursively. If not found, the user probably has a good
        // reason. Ignore errors (could already exist). Real errors surface on the write below.
        let _ = std::fs::DirBuilder::new().create(&preferences);

        preferences.push(Self::FILENAME);
        let mut string = toml::ser::to_string_pretty(&self.library)?;
        // Prefix some documentation.
        string = DOCUMENTATION.to_owned() + &string;
        std::fs::write(preferences, string)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{BrushLibrary, Preferences};
    #[test]
    fn library_roundtrips_through_toml() {
        let library = BrushLibrary::default();
        let string = toml::ser::to_string_pretty(&library).unwrap();
        let parsed: BrushLibrary = toml::from_str(&string).unwrap();
        assert_eq!(parsed, library);
    }
    #[test]
    fn partial_brushes_take_defaults() {
        let parsed: BrushLibrary = toml::from_str(
            r#"
            [[brush]]
            name = "pencil"
            size = 3
            size_pressure = true
            "#,
        )
        .unwrap();
        let pencil = &parsed.brushes[0];
        assert_eq!(pencil.name, "pencil");
        assert_eq!(pencil.size, 3.0);
        assert!(pencil.size_pressure);
        assert_eq!(pencil.opacity, 255);
        assert_eq!(pencil.spacing, 0.05);
    }
    #[test]
    fn empty_file_is_empty_library() {
        let parsed: BrushLibrary = toml::from_str("").unwrap();
        assert!(parsed.brushes.is_empty());
    }
    #[test]
    fn missing_file_is_defaulted() {
        let path = std::env::temp_dir().join("rkgk-test-no-such-dir/brushes.toml");
        let preferences = Preferences::load_or_default(&path);
        assert!(preferences.did_fail_to_load());
        assert!(preferences.is_missing());
        assert_eq!(preferences.library, BrushLibrary::default());
    }
}
