//! Codificación opaca del árbol para almacenamiento: JSON (`serde_json`) y
//! luego base64. Es el único punto que conoce el formato del blob.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::errors::DefinitionError;
use crate::model::ProcessDefinition;

pub fn encode_definition(definition: &ProcessDefinition) -> Result<String, DefinitionError> {
    let json = serde_json::to_string(definition).map_err(|e| DefinitionError::Encode(e.to_string()))?;
    Ok(STANDARD.encode(json.as_bytes()))
}

pub fn decode_definition(encoded: &str) -> Result<ProcessDefinition, DefinitionError> {
    let bytes = STANDARD.decode(encoded)
                        .map_err(|e| DefinitionError::Decode(format!("base64: {e}")))?;
    serde_json::from_slice(&bytes).map_err(|e| DefinitionError::Decode(format!("json: {e}")))
}
