//! Model names and catalog metadata.

use crate::tools::Parameter;
use crate::utils::null_as_default;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

// Chat
pub const LLAMA_4_SCOUT_17B: &str = "@cf/meta/llama-4-scout-17b-16e-instruct";
pub const LLAMA_3_8B: &str = "@cf/meta/llama-3-8b-instruct";
pub const LLAMA_3_70B: &str = "@cf/meta/llama-3-70b-instruct";
pub const MISTRAL_7B: &str = "@cf/mistral/mistral-7b-instruct-v0.1";
pub const CODE_LLAMA_7B: &str = "@cf/meta/code-llama-7b-instruct";
pub const QWEN3_30B_A3B: &str = "@cf/qwen/qwen3-30b-a3b-fp8";

// Image generation
pub const STABLE_DIFFUSION_XL: &str = "@cf/stabilityai/stable-diffusion-xl-base-1.0";
pub const DREAMSHAPER_8: &str = "@cf/lykon/dreamshaper-8-lcm";

// Text-to-speech
pub const SPEECHT5_TTS: &str = "@cf/microsoft/speecht5-tts";

// Embeddings
pub const BGE_BASE_EN: &str = "@cf/baai/bge-base-en-v1.5";
pub const BGE_LARGE_EN: &str = "@cf/baai/bge-large-en-v1.5";

// Translation
pub const M2M100: &str = "@cf/meta/m2m100-1.2b";

/// Catalog entry for a single model
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ModelInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub task: ModelTask,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: ModelProperties,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: ModelSource,
    #[serde(default, deserialize_with = "null_as_default")]
    pub beta: bool,
    /// Input parameters the model accepts, keyed by name
    #[serde(default, deserialize_with = "null_as_default")]
    pub parameters: BTreeMap<String, Parameter>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ModelTask {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelProperties {
    #[serde(default, deserialize_with = "null_as_default")]
    pub max_batch_size: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub max_total_tokens: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ModelSource {
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

/// The catalog listing: model name to metadata
pub type ModelsResponse = HashMap<String, ModelInfo>;

/// Flattens a catalog listing into entries sorted by name, filling empty names from their keys.
pub fn catalog_entries(models: ModelsResponse) -> Vec<ModelInfo> {
    let mut entries: Vec<ModelInfo> = models
        .into_iter()
        .map(|(key, mut info)| {
            if info.name.is_empty() {
                info.name = key;
            }
            info
        })
        .collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}

/// Returns the model path used in run URLs: `@cf/` is added unless already present.
pub fn run_path(model: &str) -> String {
    if model.starts_with("@cf/") {
        model.to_string()
    } else {
        format!("@cf/{model}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_path() {
        assert_eq!(run_path(LLAMA_3_8B), "@cf/meta/llama-3-8b-instruct");
        assert_eq!(run_path("meta/llama-3-8b-instruct"), "@cf/meta/llama-3-8b-instruct");
    }

    #[test]
    fn test_model_info_decodes_with_nulls() {
        let info: ModelInfo = serde_json::from_str(
            r#"{
                "name": "@cf/meta/llama-3-8b-instruct",
                "description": "Generation over generation, Meta Llama 3 demonstrates state-of-the-art performance.",
                "task": {"name": "Text Generation", "description": null},
                "tags": null,
                "properties": {"max_total_tokens": 8192},
                "beta": true,
                "parameters": {
                    "temperature": {"type": "number", "default": 0.6, "minimum": 0, "maximum": 5}
                }
            }"#,
        )
        .unwrap();

        assert_eq!(info.task.name, "Text Generation");
        assert!(info.task.description.is_empty());
        assert!(info.tags.is_empty());
        assert_eq!(info.properties.max_total_tokens, 8192);
        assert_eq!(info.properties.max_batch_size, 0);
        assert!(info.beta);
        assert_eq!(info.parameters["temperature"].param_type, "number");
    }

    #[test]
    fn test_catalog_entries_sorted_and_named() {
        let models: ModelsResponse = serde_json::from_str(
            r#"{
                "@cf/meta/m2m100-1.2b": {"description": "translation"},
                "@cf/baai/bge-base-en-v1.5": {"name": "@cf/baai/bge-base-en-v1.5"}
            }"#,
        )
        .unwrap();

        let entries = catalog_entries(models);
        let names: Vec<&str> = entries.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec![BGE_BASE_EN, M2M100]);
        assert_eq!(entries[1].description, "translation");
    }
}
