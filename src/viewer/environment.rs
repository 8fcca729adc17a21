/// Fixed registry of image-based lighting presets.
///
/// The selector in the shell offers exactly this set, in this order. Each
/// preset maps a short key and display label to the lighting resource the
/// render widget consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnvironmentPreset {
    #[default]
    Neutral,
    SpruitSunrise,
    AircraftWorkshop,
    MusicHall,
    Pillars,
    WhippleCreek,
}

impl EnvironmentPreset {
    pub const ALL: [EnvironmentPreset; 6] = [
        EnvironmentPreset::Neutral,
        EnvironmentPreset::SpruitSunrise,
        EnvironmentPreset::AircraftWorkshop,
        EnvironmentPreset::MusicHall,
        EnvironmentPreset::Pillars,
        EnvironmentPreset::WhippleCreek,
    ];

    pub fn key(self) -> &'static str {
        match self {
            EnvironmentPreset::Neutral => "neutral",
            EnvironmentPreset::SpruitSunrise => "spruit-sunrise",
            EnvironmentPreset::AircraftWorkshop => "aircraft-workshop",
            EnvironmentPreset::MusicHall => "music-hall",
            EnvironmentPreset::Pillars => "pillars",
            EnvironmentPreset::WhippleCreek => "whipple-creek",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EnvironmentPreset::Neutral => "Neutral",
            EnvironmentPreset::SpruitSunrise => "Spruit Sunrise",
            EnvironmentPreset::AircraftWorkshop => "Aircraft Workshop",
            EnvironmentPreset::MusicHall => "Music Hall",
            EnvironmentPreset::Pillars => "Pillars",
            EnvironmentPreset::WhippleCreek => "Whipple Creek",
        }
    }

    pub fn image_path(self) -> &'static str {
        match self {
            EnvironmentPreset::Neutral => {
                "https://modelviewer.dev/shared-assets/environments/neutral.hdr"
            }
            EnvironmentPreset::SpruitSunrise => {
                "https://modelviewer.dev/shared-assets/environments/spruit_sunrise_1k_HDR.hdr"
            }
            EnvironmentPreset::AircraftWorkshop => {
                "https://modelviewer.dev/shared-assets/environments/aircraft_workshop_01_1k.hdr"
            }
            EnvironmentPreset::MusicHall => {
                "https://modelviewer.dev/shared-assets/environments/music_hall_01_1k.hdr"
            }
            EnvironmentPreset::Pillars => {
                "https://modelviewer.dev/shared-assets/environments/pillars_1k.hdr"
            }
            EnvironmentPreset::WhippleCreek => {
                "https://modelviewer.dev/shared-assets/environments/whipple_creek_regional_park_04_1k.hdr"
            }
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|preset| preset.key() == key)
    }
}

#[cfg(test)]
mod tests {
    use super::EnvironmentPreset;

    #[test]
    fn default_is_neutral() {
        assert_eq!(EnvironmentPreset::default(), EnvironmentPreset::Neutral);
    }

    #[test]
    fn registry_order_starts_with_neutral() {
        assert_eq!(EnvironmentPreset::ALL[0], EnvironmentPreset::Neutral);
        assert_eq!(EnvironmentPreset::ALL.len(), 6);
    }

    #[test]
    fn keys_round_trip_through_lookup() {
        for preset in EnvironmentPreset::ALL {
            assert_eq!(EnvironmentPreset::from_key(preset.key()), Some(preset));
        }
        assert_eq!(EnvironmentPreset::from_key("studio"), None);
    }

    #[test]
    fn every_preset_names_a_lighting_resource() {
        for preset in EnvironmentPreset::ALL {
            assert!(preset.image_path().ends_with(".hdr"));
            assert!(!preset.label().is_empty());
        }
    }
}
