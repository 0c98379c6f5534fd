//! Model names offered by the text and vision nodes.

pub const DEFAULT_TEXT_MODEL: &str = "GLM-4.5-Flash";

pub const DEFAULT_VISION_MODEL: &str = "GLM-4v-flash";

pub const TEXT_MODELS: &[&str] = &[
    "GLM-4.5",
    "GLM-4.5-air",
    "GLM-4.5-x",
    "GLM-4.5-airx",
    "GLM-4.5-Flash",
    "GLM-4-plus",
    "GLM-4-air-250414",
    "GLM-4-airx",
    "GLM-4-Flashx",
    "GLM-4-Flashx-250414",
    "GLM-z1-air",
    "GLM-z1-airx",
    "GLM-z1-Flash",
    "GLM-z1-Flashx",
];

pub const VISION_MODELS: &[&str] = &[
    "GLM-4.5v",
    "GLM-4v-plus-0111",
    "GLM-4v-flash",
    "GLM-4.1v-thinking-flashx",
    "GLM-4.1v-thinking-flash",
];
