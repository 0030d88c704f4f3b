use todo_core::Item;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed todo payload: {message}")]
    Malformed { message: String },
}

/// Decode a raw response body into an [`Item`]. Id validation is left to the
/// caller.
pub fn decode_item(bytes: &[u8]) -> Result<Item, DecodeError> {
    serde_json::from_slice(bytes).map_err(|err| DecodeError::Malformed {
        message: err.to_string(),
    })
}
