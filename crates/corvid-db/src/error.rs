use thiserror::Error;

#[derive(Debug, Error)]
#[error("Attempted to convert integer to enum. Got invalid value \"{0}\"")]
pub struct EnumConversionError(pub i32);
