use serde::{Deserialize, Serialize};
use sinew_core::{Result, SinewError};

/// Largest skeleton the classic skinned shader path can address.
pub const DEFAULT_MAX_BONES: usize = 72;

/// How the output vertex buffer of a CPU-animated mesh is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BufferType {
    Default,
    Dynamic,
    #[default]
    DynamicWriteOnly,
}

impl BufferType {
    #[must_use]
    pub fn is_write_only(self) -> bool {
        self == Self::DynamicWriteOnly
    }
}

/// Settings for the animation processors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorSettings {
    /// Builds with a larger flattened skeleton fail.
    pub max_bones: usize,
    /// Resampling frequency in keyframes per second; `0` keeps the authored
    /// keyframes only.
    pub generate_keyframes_frequency: u32,
    /// Repairs the wrapped root bone some importers emit.
    pub fix_real_bone_root: bool,
    pub vertex_buffer_type: BufferType,
}

impl Default for ProcessorSettings {
    fn default() -> Self {
        Self {
            max_bones: DEFAULT_MAX_BONES,
            generate_keyframes_frequency: 0,
            fix_real_bone_root: false,
            vertex_buffer_type: BufferType::default(),
        }
    }
}

impl ProcessorSettings {
    /// Parses settings from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| SinewError::InvalidContent(format!("invalid processor settings: {e}")))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SinewError::InvalidContent(format!("cannot serialize settings: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_uses_defaults() {
        let settings = ProcessorSettings::from_json(r#"{ "generate_keyframes_frequency": 30 }"#)
            .unwrap();
        assert_eq!(settings.generate_keyframes_frequency, 30);
        assert_eq!(settings.max_bones, DEFAULT_MAX_BONES);
        assert!(!settings.fix_real_bone_root);
        assert_eq!(settings.vertex_buffer_type, BufferType::DynamicWriteOnly);
    }

    #[test]
    fn malformed_json_is_invalid_content() {
        assert!(matches!(
            ProcessorSettings::from_json("{ max_bones: }"),
            Err(SinewError::InvalidContent(_))
        ));
    }
}
