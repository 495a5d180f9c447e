use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub camera: CameraConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub index: u32,
    pub model_path: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub font_family: String,
    pub font_size_pt: u32,
    pub text_scale: usize,
    pub thumb_color_hex: String,
    pub index_color_hex: String,
    pub pinch_color_hex: String,
    pub open_color_hex: String,
    pub trail_color_hex: String,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: 0,
            model_path: "models/hand_landmarker.onnx".to_string(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            font_family: "Monospace".to_string(),
            font_size_pt: 14,
            text_scale: 2,
            thumb_color_hex: "#00FF00".to_string(),
            index_color_hex: "#FF0000".to_string(),
            pinch_color_hex: "#FFFF00".to_string(),
            open_color_hex: "#FFFFFF".to_string(),
            trail_color_hex: "#0000FF".to_string(),
        }
    }
}

impl AppConfig {
    const PATH: &'static str = "config.json";

    pub fn load() -> Result<Self> {
        let config = if Path::new(Self::PATH).exists() {
            let content = fs::read_to_string(Self::PATH)?;
            // #[serde(default)] fills any missing fields
            match serde_json::from_str::<AppConfig>(&content) {
                Ok(c) => {
                    println!("Loaded configuration from {}", Self::PATH);
                    c
                }
                Err(e) => {
                    println!("Error parsing config: {}. Loading defaults.", e);
                    Self::default()
                }
            }
        } else {
            println!("Configuration file not found. Creating default at {}", Self::PATH);
            Self::default()
        };

        // Save back so new fields show up in the file
        config.save()?;

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(Self::PATH, content)?;
        Ok(())
    }
}

pub fn parse_hex(hex: &str) -> (u8, u8, u8) {
    if hex.len() == 7 && hex.starts_with('#') {
        let r = u8::from_str_radix(&hex[1..3], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[3..5], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[5..7], 16).unwrap_or(255);
        (r, g, b)
    } else {
        (255, 255, 255)
    }
}
