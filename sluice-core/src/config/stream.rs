//! Stream configuration schema.
//!
//! A stream is described by four sections: `input`, `buffer`, `pipeline`
//! and `output`. Any section or field may be omitted from the source
//! document; decoding fills it from the defaults below and then runs
//! [`StreamConfig::resolve`] and [`StreamConfig::validate`], so two configs
//! compare equal exactly when every resolved field matches.
//!
//! Documents are always decoded with the YAML decoder. JSON is a subset of
//! YAML, so `.json` files and JSON request bodies go through the same path.

use crate::error::{Result, StreamError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Default input component type.
pub const DEFAULT_INPUT: &str = "stdin";
/// Default buffer component type.
pub const DEFAULT_BUFFER: &str = "none";
/// Default output component type.
pub const DEFAULT_OUTPUT: &str = "stdout";
/// Default number of processing threads.
pub const DEFAULT_THREADS: u32 = 1;

/// Stream identifier to configuration, ordered by identifier.
pub type StreamMap = BTreeMap<String, StreamConfig>;

/// A single pluggable component: its type name plus type-specific options.
///
/// Options are kept verbatim so a config read back from the registry is
/// the one that was submitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentConfig {
    /// Component type, e.g. `kafka` or `stdout`.
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Type-specific options.
    #[serde(flatten)]
    pub options: BTreeMap<String, serde_yaml::Value>,
}

impl ComponentConfig {
    /// Create a component with no options.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            options: BTreeMap::new(),
        }
    }

    /// Add an option.
    pub fn with_option(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_yaml::Value>,
    ) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Get an option as string.
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.options.get(key).and_then(|v| v.as_str())
    }

    fn fill_kind(&mut self, default: &str) {
        if self.kind.trim().is_empty() {
            self.kind = default.to_string();
        }
    }
}

/// Processing section of a stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSection {
    /// Number of parallel processing threads.
    pub threads: u32,

    /// Processors applied to every message, in order.
    pub processors: Vec<ComponentConfig>,
}

impl Default for PipelineSection {
    fn default() -> Self {
        Self {
            threads: DEFAULT_THREADS,
            processors: Vec::new(),
        }
    }
}

/// Full configuration of one stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Where messages come from.
    pub input: ComponentConfig,
    /// Buffer between input and pipeline.
    pub buffer: ComponentConfig,
    /// Processing stage.
    pub pipeline: PipelineSection,
    /// Where messages go.
    pub output: ComponentConfig,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            input: ComponentConfig::new(DEFAULT_INPUT),
            buffer: ComponentConfig::new(DEFAULT_BUFFER),
            pipeline: PipelineSection::default(),
            output: ComponentConfig::new(DEFAULT_OUTPUT),
        }
    }
}

impl StreamConfig {
    /// Set the input component.
    pub fn with_input(mut self, input: ComponentConfig) -> Self {
        self.input = input;
        self
    }

    /// Set the buffer component.
    pub fn with_buffer(mut self, buffer: ComponentConfig) -> Self {
        self.buffer = buffer;
        self
    }

    /// Set the output component.
    pub fn with_output(mut self, output: ComponentConfig) -> Self {
        self.output = output;
        self
    }

    /// Append a processor.
    pub fn with_processor(mut self, processor: ComponentConfig) -> Self {
        self.pipeline.processors.push(processor);
        self
    }

    /// Fill fields that serde defaults cannot reach.
    ///
    /// A section that is present but lacks a `type` (e.g. `input: {}` or
    /// `buffer: { type: "" }`) takes the section default.
    pub fn resolve(mut self) -> Self {
        self.input.fill_kind(DEFAULT_INPUT);
        self.buffer.fill_kind(DEFAULT_BUFFER);
        self.output.fill_kind(DEFAULT_OUTPUT);
        self
    }

    /// Check a resolved config against the schema.
    pub fn validate(&self) -> Result<()> {
        if self.pipeline.threads == 0 {
            return Err(StreamError::InvalidConfig {
                field: "pipeline.threads".to_string(),
                cause: "must be at least 1".to_string(),
            });
        }

        for (i, processor) in self.pipeline.processors.iter().enumerate() {
            if processor.kind.trim().is_empty() {
                return Err(StreamError::InvalidConfig {
                    field: format!("pipeline.processors[{}].type", i),
                    cause: "processor type is required".to_string(),
                });
            }
        }

        for (field, component) in [
            ("input.type", &self.input),
            ("buffer.type", &self.buffer),
            ("output.type", &self.output),
        ] {
            if component.kind.chars().any(char::is_whitespace) {
                return Err(StreamError::InvalidConfig {
                    field: field.to_string(),
                    cause: format!("'{}' is not a valid component type", component.kind),
                });
            }
        }

        Ok(())
    }

    /// Decode a YAML or JSON document into a resolved, validated config.
    ///
    /// An empty document yields the default config.
    pub fn from_document(text: &str) -> Result<Self> {
        Self::decode(text, None)
    }

    /// Read and decode a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| StreamError::Io {
            path: path.to_path_buf(),
            cause: e.to_string(),
        })?;
        Self::decode(&text, Some(path))
    }

    /// Decode a document holding a mapping of stream id to config.
    ///
    /// An empty document yields an empty mapping.
    pub fn map_from_document(text: &str) -> Result<StreamMap> {
        if text.trim().is_empty() {
            return Ok(StreamMap::new());
        }

        let raw: StreamMap = serde_yaml::from_str(text).map_err(|e| StreamError::Decode {
            path: None,
            cause: e.to_string(),
        })?;

        raw.into_iter()
            .map(|(id, config)| {
                if id.is_empty() {
                    return Err(StreamError::bad_request("stream id must not be empty"));
                }
                let config = config.resolve();
                config.validate().map_err(|e| prefix_field(&id, e))?;
                Ok((id, config))
            })
            .collect()
    }

    fn decode(text: &str, path: Option<&Path>) -> Result<Self> {
        let config = if text.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str::<Self>(text).map_err(|e| StreamError::Decode {
                path: path.map(Path::to_path_buf),
                cause: e.to_string(),
            })?
        };

        let config = config.resolve();
        config.validate()?;
        Ok(config)
    }
}

fn prefix_field(id: &str, err: StreamError) -> StreamError {
    match err {
        StreamError::InvalidConfig { field, cause } => StreamError::InvalidConfig {
            field: format!("{}.{}", id, field),
            cause,
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_DEFAULTS: &str = r#"
input:
  type: kafka
buffer:
  type: none
pipeline:
  threads: 1
  processors: []
output:
  type: http_client
"#;

    #[test]
    fn default_config() {
        let config = StreamConfig::default();
        assert_eq!(config.input.kind, "stdin");
        assert_eq!(config.buffer.kind, "none");
        assert_eq!(config.pipeline.threads, 1);
        assert!(config.pipeline.processors.is_empty());
        assert_eq!(config.output.kind, "stdout");
    }

    #[test]
    fn partial_document_matches_explicit_defaults() {
        let partial = r#"{"input": {"type": "kafka"}, "output": {"type": "http_client"}}"#;

        let from_partial = StreamConfig::from_document(partial).unwrap();
        let from_full = StreamConfig::from_document(FULL_DEFAULTS).unwrap();

        assert_eq!(from_partial, from_full);
    }

    #[test]
    fn json_and_yaml_decode_identically() {
        let json = r#"{"input":{"type":"file","path":"/tmp/in"},"pipeline":{"threads":4}}"#;
        let yaml = "input:\n  type: file\n  path: /tmp/in\npipeline:\n  threads: 4\n";

        let a = StreamConfig::from_document(json).unwrap();
        let b = StreamConfig::from_document(yaml).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.input.get_string("path"), Some("/tmp/in"));
        assert_eq!(a.pipeline.threads, 4);
    }

    #[test]
    fn present_section_without_type_takes_default() {
        let config = StreamConfig::from_document("buffer: {}\ninput:\n  type: \"\"\n").unwrap();
        assert_eq!(config, StreamConfig::default());
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(
            StreamConfig::from_document("  \n").unwrap(),
            StreamConfig::default()
        );
    }

    #[test]
    fn options_survive_round_trip() {
        let config = StreamConfig::default()
            .with_input(
                ComponentConfig::new("http_server").with_option("address", "0.0.0.0:4196"),
            )
            .with_processor(ComponentConfig::new("bloblang"));

        let yaml = serde_yaml::to_string(&config).unwrap();
        let decoded = StreamConfig::from_document(&yaml).unwrap();

        assert_eq!(decoded, config);
    }

    #[test]
    fn rejects_zero_threads() {
        let err = StreamConfig::from_document("pipeline:\n  threads: 0\n").unwrap_err();
        assert!(matches!(
            err,
            StreamError::InvalidConfig { ref field, .. } if field == "pipeline.threads"
        ));
    }

    #[test]
    fn rejects_untyped_processor() {
        let err = StreamConfig::from_document("pipeline:\n  processors:\n    - {}\n").unwrap_err();
        assert_eq!(err.code(), "E802");
    }

    #[test]
    fn malformed_document_is_decode_error() {
        let err = StreamConfig::from_document("input: [unclosed").unwrap_err();
        assert_eq!(err.code(), "E801");
    }

    #[test]
    fn stream_map_decodes_each_entry() {
        let doc = r#"
bar:
  buffer:
    type: memory
baz:
  input:
    type: kafka
"#;
        let map = StreamConfig::map_from_document(doc).unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map["bar"].buffer.kind, "memory");
        assert_eq!(map["bar"].input.kind, "stdin");
        assert_eq!(map["baz"].input.kind, "kafka");
    }

    #[test]
    fn stream_map_errors_name_the_stream() {
        let err =
            StreamConfig::map_from_document("foo:\n  pipeline:\n    threads: 0\n").unwrap_err();
        assert!(err.to_string().contains("foo.pipeline.threads"));
    }

    #[test]
    fn empty_stream_map() {
        assert!(StreamConfig::map_from_document("").unwrap().is_empty());
    }
}
